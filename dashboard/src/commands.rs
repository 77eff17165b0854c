//! Parsing of shell command lines.
//!
//! Field assignments are `field=value`; a bare word after an assignment
//! continues its value, so `add name=Ann Lee email=ann@x.com` works.

use thiserror::Error;
use users_core::Field;

pub const HELP: &str = "\
Commands:
  list | refresh             show or reload the users
  open <path>                go to / or /user/<id>
  view <id>                  show one user
  add name=.. email=.. [phone=..]
  edit <id>                  load a user into the form
  set field=value ..         change form fields
  save | cancel              submit or close the form
  delete <id>                delete after confirmation
  dismiss                    clear the message banner
  back | help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Open(String),
    View(String),
    Add(Vec<(Field, String)>),
    Edit(String),
    Set(Vec<(Field, String)>),
    Save,
    Cancel,
    Delete(String),
    Dismiss,
    Back,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'; type 'help'")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("unknown field '{0}'; expected name, email or phone")]
    UnknownField(String),

    #[error("expected field=value, got '{0}'")]
    Malformed(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let rest: Vec<&str> = words.collect();
        let argument = |name: &'static str| {
            rest.first()
                .map(|s| s.to_string())
                .ok_or(CommandError::MissingArgument(name))
        };
        match verb.to_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "refresh" => Ok(Command::Refresh),
            "open" | "go" => argument("open").map(Command::Open),
            "view" | "show" => argument("view").map(Command::View),
            "add" | "new" => assignments(&rest).map(Command::Add),
            "edit" => argument("edit").map(Command::Edit),
            "set" => assignments(&rest).map(Command::Set),
            "save" | "submit" => Ok(Command::Save),
            "cancel" | "clear" => Ok(Command::Cancel),
            "delete" | "rm" => argument("delete").map(Command::Delete),
            "dismiss" => Ok(Command::Dismiss),
            "back" => Ok(Command::Back),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn assignments(words: &[&str]) -> Result<Vec<(Field, String)>, CommandError> {
    let mut out: Vec<(Field, String)> = Vec::new();
    for word in words {
        match word.split_once('=') {
            Some((key, value)) => {
                let field = Field::parse(&key.to_lowercase())
                    .ok_or_else(|| CommandError::UnknownField(key.to_string()))?;
                out.push((field, value.to_string()));
            }
            None => match out.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(CommandError::Malformed(word.to_string())),
            },
        }
    }
    Ok(out)
}
