//! # Console
//!
//! Line-oriented terminal I/O for the command loop. Generic over the reader
//! and writer so tests can script a whole session with `Cursor`.

use std::io::{BufRead, Write};

use crate::error::AppResult;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Prints one line.
    pub fn say(&mut self, line: impl AsRef<str>) -> AppResult<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }

    /// Prints several lines.
    pub fn say_all<I, S>(&mut self, lines: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// Shows `label` and reads one line, trimmed.
    ///
    /// `None` at end of input.
    pub fn prompt(&mut self, label: &str) -> AppResult<Option<String>> {
        write!(self.output, "{} ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Direct access to the writer, for the receipt printer.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_reads_trimmed_lines_until_eof() {
        let mut console = Console::new(Cursor::new("  hello \nworld\n"), Vec::new());

        assert_eq!(console.prompt(">").unwrap().as_deref(), Some("hello"));
        assert_eq!(console.prompt(">").unwrap().as_deref(), Some("world"));
        assert_eq!(console.prompt(">").unwrap(), None);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "> > > ");
    }
}
