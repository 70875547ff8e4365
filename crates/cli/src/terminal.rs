//! Terminal-backed [`Prompter`].

use std::io::{BufRead, IsTerminal};

use dialoguer::Input;

use homeutils_core::errors::PromptError;
use homeutils_core::prompt::Prompter;

use crate::style;

/// Prompts with `dialoguer` on a terminal, or reads plain lines from stdin
/// when input is piped.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    piped: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            piped: !std::io::stdin().is_terminal(),
        }
    }

    fn read_piped_line(prompt: &str) -> Result<String, PromptError> {
        eprint!("{}: ", prompt);
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PromptError::Terminal(e.to_string()))?;
        if read == 0 {
            return Err(PromptError::EndOfInput(prompt.to_string()));
        }
        eprintln!();
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        if self.piped {
            return Self::read_piped_line(prompt);
        }
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PromptError::Terminal(e.to_string()))
    }

    fn inform(&mut self, message: &str) {
        println!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        eprintln!("{}", style::warn(message));
    }
}
