//! Line-oriented terminal I/O shared by the command loop and the delete prompt.

use std::io::{self, BufRead, BufReader, Write};

use parking_lot::Mutex;
use users_core::Confirm;

pub struct Console {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl Console {
    pub fn new(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }

    /// Next line without its terminator, or `None` at end of input.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn write(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock();
        output.write_all(text.as_bytes())?;
        output.flush()
    }
}

impl Confirm for Console {
    /// Anything but `y`/`yes` declines, including end of input.
    fn confirm(&self, message: &str) -> bool {
        if self.write(&format!("{message} [y/N] ")).is_err() {
            return false;
        }
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_until_eof() {
        let console = Console::new(Cursor::new("list\r\nquit\n"), io::sink());
        assert_eq!(console.read_line().unwrap().as_deref(), Some("list"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("quit"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn confirm_accepts_only_yes() {
        let console = Console::new(Cursor::new("Y\nno\n\n"), io::sink());
        assert!(console.confirm("Delete?"));
        assert!(!console.confirm("Delete?"));
        assert!(!console.confirm("Delete?"));
        assert!(!console.confirm("Delete?"));
    }
}
