//! Line-oriented console I/O.

use std::io::{self, BufRead, Stdin, Stdout, Write};

use crate::error::Result;

/// Where the session reads answers and writes output.
pub trait Console {
    /// Print `label` and read one line with the trailing newline removed.
    ///
    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>>;

    /// Output sink for menus, results and messages.
    fn writer(&mut self) -> &mut dyn Write;
}

/// [`Console`] over any buffered reader and writer.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl LineConsole<io::StdinLock<'static>, Stdout> {
    /// Console on the process's stdin and stdout.
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.output
    }
}
