//! Line-oriented prompt I/O.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

/// Prompts on `output` and reads answers line by line from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{message}").context("failed to write to console")
    }

    /// Print `message`, then a `>` marker, and read one answer.
    ///
    /// Trailing newline characters are stripped. Closed input is an error.
    pub fn prompt(&mut self, message: impl Display) -> Result<String> {
        write!(self.output, "{message}\n>").context("failed to write to console")?;
        self.output.flush().context("failed to flush console")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from console")?;
        if read == 0 {
            bail!("input closed before the route was finished");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask a question; only the exact `yes` answer (surrounding spaces aside) confirms.
    pub fn confirm(&mut self, message: impl Display, yes: &str) -> Result<bool> {
        let answer = self.prompt(message)?;
        Ok(answer.trim() == yes)
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_reads_one_line() {
        let mut console = Console::new(Cursor::new("KSEA\r\nnext\n"), Vec::new());
        assert_eq!(console.prompt("departure").unwrap(), "KSEA");
        assert_eq!(console.prompt("again").unwrap(), "next");
        assert_eq!(
            String::from_utf8(console.output().clone()).unwrap(),
            "departure\n>again\n>"
        );
    }

    #[test]
    fn prompt_fails_on_closed_input() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        assert!(console.prompt("anything").is_err());
    }

    #[test]
    fn confirm_matches_exact_answer() {
        let mut console = Console::new(Cursor::new(" y \nY\nyes\n"), Vec::new());
        assert!(console.confirm("sure?", "y").unwrap());
        assert!(!console.confirm("sure?", "y").unwrap());
        assert!(!console.confirm("sure?", "y").unwrap());
    }
}
