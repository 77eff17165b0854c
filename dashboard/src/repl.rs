//! Read-eval-print loop over a [`Shell`].

use anyhow::Result;
use tracing::{debug, warn};
use users_core::{DashboardError, Field, Intent, Route, Shell, UserId};

use crate::commands::{Command, HELP};
use crate::console::Console;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Redraw the current route.
    Continue,
    Message(String),
    Quit,
}

/// Mount the shell, optionally open `path`, then execute lines until
/// `quit` or end of input.
pub async fn run(shell: &mut Shell, console: &Console, path: Option<&str>) -> Result<()> {
    shell.start().await;
    if let Some(path) = path {
        shell.navigate(path).await;
    }
    console.write(&shell.render())?;
    loop {
        console.write("> ")?;
        let Some(line) = console.read_line()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                console.write(&format!("{e}\n"))?;
                continue;
            }
        };
        match execute(shell, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Message(text)) => console.write(&text)?,
            Ok(Flow::Continue) => console.write(&shell.render())?,
            Err(e) => {
                warn!(error = %e, "Command refused");
                console.write(&format!("{e}\n"))?;
            }
        }
    }
    Ok(())
}

pub async fn execute(shell: &mut Shell, command: Command) -> Result<Flow, DashboardError> {
    debug!(?command, "Executing");
    match command {
        Command::List => {
            to_dashboard(shell);
        }
        Command::Refresh => {
            to_dashboard(shell);
            shell.dashboard().load().await;
        }
        Command::Open(path) => {
            shell.navigate(&path).await;
        }
        Command::View(raw) => {
            let id = resolve(shell, &raw);
            if let Some(route) = shell.dashboard().handle(Intent::View(id)).await? {
                shell.navigate(&route.path()).await;
            }
        }
        Command::Add(values) => {
            to_dashboard(shell);
            shell.dashboard().cancel_edit();
            fill(shell, &values);
            shell.dashboard().submit_form().await?;
        }
        Command::Edit(raw) => {
            to_dashboard(shell);
            let id = resolve(shell, &raw);
            shell.dashboard().handle(Intent::Edit(id)).await?;
        }
        Command::Set(values) => {
            to_dashboard(shell);
            fill(shell, &values);
        }
        Command::Save => {
            to_dashboard(shell);
            shell.dashboard().submit_form().await?;
        }
        Command::Cancel => {
            to_dashboard(shell);
            shell.dashboard().cancel_edit();
        }
        Command::Delete(raw) => {
            to_dashboard(shell);
            let id = resolve(shell, &raw);
            shell.dashboard().handle(Intent::Delete(id)).await?;
        }
        Command::Dismiss => shell.dashboard().dismiss_error(),
        Command::Back => {
            shell.back();
        }
        Command::Help => return Ok(Flow::Message(HELP.to_string())),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn to_dashboard(shell: &mut Shell) {
    if *shell.route() != Route::Dashboard {
        shell.open(&Route::Dashboard.path());
    }
}

fn fill(shell: &Shell, values: &[(Field, String)]) {
    for (field, value) in values {
        shell.dashboard().set_field(*field, value);
    }
}

/// Ids typed by the user are matched against the list first so that `3`
/// finds a numeric id and `temp-…` finds a pending one.
fn resolve(shell: &Shell, raw: &str) -> UserId {
    shell
        .dashboard()
        .view()
        .find_raw(raw)
        .map(|record| record.id().clone())
        .unwrap_or_else(|| UserId::parse(raw))
}
