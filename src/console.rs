use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use owo_colors::OwoColorize;
use stacked_errors::{bail, Result, StackableErr};

/// The operator facing side of the tool. Selection and confirmation block
/// until the operator answers.
pub trait Console {
    /// Echoes one resolved item
    fn echo(&mut self, item: &str) -> Result<()>;

    /// Prints a plain line
    fn line(&mut self, line: &str) -> Result<()>;

    /// Prints a clearly marked failure or abort notice
    fn failure(&mut self, message: &str) -> Result<()>;

    /// Presents `choices` and returns a copy of the one the operator picks
    fn select(&mut self, message: &str, choices: &[String]) -> Result<String>;

    /// Asks a yes/no question, an empty answer takes `default`
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// A [Console] over a line based reader and a writer, normally the standard
/// streams
#[derive(Debug)]
pub struct StdConsole<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl StdConsole<StdinLock<'static>, Stdout> {
    /// Uses stdin and stdout, with color if stdout is a terminal
    pub fn stdio() -> Self {
        let color = io::stdout().is_terminal();
        Self::new(io::stdin().lock(), io::stdout()).color(color)
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    /// Sets if ANSI colors are written
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Returns the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush().stack()?;
        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .stack_err("StdConsole -> failed to read the operator's answer")?;
        if read == 0 {
            bail!("StdConsole -> input ended before an answer was given")
        }
        Ok(answer.trim().to_owned())
    }

    fn question(&mut self, message: &str) -> Result<()> {
        if self.color {
            write!(self.output, "{} {}", "?".green(), message.bold()).stack()
        } else {
            write!(self.output, "? {message}").stack()
        }
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn echo(&mut self, item: &str) -> Result<()> {
        let item = format!("  - {item}");
        if self.color {
            writeln!(self.output, "{}", item.green()).stack()
        } else {
            writeln!(self.output, "{item}").stack()
        }
    }

    fn line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").stack()
    }

    fn failure(&mut self, message: &str) -> Result<()> {
        if self.color {
            writeln!(self.output, "{}", message.red().bold()).stack()
        } else {
            writeln!(self.output, "{message}").stack()
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<String> {
        if choices.is_empty() {
            bail!("StdConsole::select -> there are no choices to select from")
        }
        loop {
            self.question(message)?;
            writeln!(self.output).stack()?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(self.output, "  {}) {choice}", i + 1).stack()?;
            }
            write!(self.output, "  Answer [1-{}]: ", choices.len()).stack()?;
            let answer = self.read_answer()?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(choices[n - 1].clone()),
                _ => writeln!(
                    self.output,
                    "  Please enter a number from 1 to {}",
                    choices.len()
                )
                .stack()?,
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            self.question(message)?;
            write!(self.output, " {hint} ").stack()?;
            let answer = self.read_answer()?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  Please answer yes or no").stack()?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn console(input: &str) -> StdConsole<Cursor<Vec<u8>>, Vec<u8>> {
        StdConsole::new(Cursor::new(input.as_bytes().to_vec()), vec![])
    }

    fn output(console: StdConsole<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_inner().1).unwrap()
    }

    fn choices() -> Vec<String> {
        vec!["10.0.0.5".to_owned(), "10.0.0.6".to_owned()]
    }

    #[test]
    fn select_reprompts_until_valid() {
        let mut console = console("0\nabc\n2\n");
        assert_eq!(console.select("Pick", &choices()).unwrap(), "10.0.0.6");
        let output = output(console);
        assert_eq!(output.matches("Please enter a number").count(), 2);
        assert!(output.contains("  1) 10.0.0.5\n  2) 10.0.0.6\n"));
    }

    #[test]
    fn select_is_repeatable() {
        let mut console = console("1\n1\n");
        let choices = choices();
        let first = console.select("Pick", &choices).unwrap();
        let second = console.select("Pick", &choices).unwrap();
        assert_eq!(first, second);
        assert_eq!(choices, vec!["10.0.0.5".to_owned(), "10.0.0.6".to_owned()]);
    }

    #[test]
    fn select_fails_on_eof_or_no_choices() {
        assert!(console("").select("Pick", &choices()).is_err());
        assert!(console("1\n").select("Pick", &[]).is_err());
    }

    #[test]
    fn confirm_defaults_on_enter() {
        assert!(console("\n").confirm("Continue?", true).unwrap());
        assert!(!console("\n").confirm("Continue?", false).unwrap());
        assert!(!console("maybe\nNo\n").confirm("Continue?", true).unwrap());
        assert!(console(" YES \n").confirm("Continue?", false).unwrap());
        assert!(console("").confirm("Continue?", true).is_err());
    }

    #[test]
    fn echo_and_failure_without_color() {
        let mut console = console("");
        console.echo("i-1").unwrap();
        console.failure("Operation aborted. Exiting!").unwrap();
        assert_eq!(output(console), "  - i-1\nOperation aborted. Exiting!\n");
    }
}
