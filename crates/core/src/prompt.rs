//! Interactive question handling.
//!
//! The workflows only talk to the user through the [`Prompter`] trait so the
//! same confirmation loops run against a real terminal or a scripted input
//! in tests.

use tracing::debug;

use crate::errors::PromptError;

/// Line-oriented conversation with the user.
pub trait Prompter {
    /// Show `prompt` and read one line of input (without the newline).
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Print an informational message to standard output.
    fn inform(&mut self, message: &str);

    /// Print a complaint (invalid input, fallback taken) to standard error.
    fn warn(&mut self, message: &str);
}

/// Interpret a yes/no answer.
///
/// Yes: `y`, `yes`, `s`, `si`. No: `n`, `no`. Case-insensitive, surrounding
/// whitespace ignored. Anything else is undecided.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask until the answer is a recognizable yes or no.
pub fn confirm(prompter: &mut dyn Prompter, prompt: &str) -> Result<bool, PromptError> {
    loop {
        let answer = prompter.ask(prompt)?;
        match parse_answer(&answer) {
            Some(decision) => return Ok(decision),
            None => debug!(answer = %answer, "unrecognized answer, asking again"),
        }
    }
}

/// Ask once; an empty answer or any yes counts as yes, everything else as no.
pub fn confirm_default_yes(prompter: &mut dyn Prompter, prompt: &str) -> Result<bool, PromptError> {
    let answer = prompter.ask(prompt)?;
    Ok(answer.trim().is_empty() || parse_answer(&answer) == Some(true))
}

/// Ask until `parse` accepts the answer, warning with `complaint` otherwise.
pub fn ask_until<T, E>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    complaint: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, PromptError>
where
    E: std::fmt::Display,
{
    loop {
        let answer = prompter.ask(prompt)?;
        match parse(answer.trim()) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(error = %e, "rejected answer");
                prompter.warn(complaint);
            }
        }
    }
}
