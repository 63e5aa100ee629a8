use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Yes/no gate between planning and writing.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Asks on the terminal. Anything but `y`/`yes` declines.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{} [y/N]: ", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;

        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Fixed answer, for `--yes` and tests.
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed = TerminalPrompt::new(answer.as_bytes(), &mut output)
            .confirm("Proceed?")
            .unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_terminal_prompt_answers() {
        assert!(ask("y\n").0);
        assert!(ask(" YES \n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("").0);
    }

    #[test]
    fn test_terminal_prompt_text() {
        let (_, printed) = ask("y\n");
        assert_eq!(printed, "Proceed? [y/N]: ");
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm(true).confirm("anything").unwrap());
        assert!(!AutoConfirm(false).confirm("anything").unwrap());
    }
}
