//! Interactive prompts for options missing from the command line.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::cli::{StateArg, StatusArg};
use crate::error::CliError;
use crate::model::{IncidentStatus, OperationalState};

/// Asks the operator for values.
pub trait Prompter {
    /// Ask for free text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Prompt`] if no answer could be read.
    fn text(&self, prompt: &str, allow_empty: bool) -> Result<String, CliError>;

    /// Ask to pick one of `items`; returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Prompt`] if no answer could be read.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize, CliError>;
}

/// Prompter reading from the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    /// Create a terminal prompter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn text(&self, prompt: &str, allow_empty: bool) -> Result<String, CliError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()
            .map_err(|e| CliError::Prompt(e.to_string()))
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize, CliError> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(|e| CliError::Prompt(e.to_string()))
    }
}

/// `value`, or free text read from the operator.
pub fn text_or_prompt<P: Prompter + ?Sized>(
    prompter: &P,
    value: Option<String>,
    label: &str,
    flag: &str,
    allow_empty: bool,
) -> Result<String, CliError> {
    match value {
        Some(value) => Ok(value),
        None => prompter
            .text(label, allow_empty)
            .map_err(|e| with_flag_hint(e, flag)),
    }
}

/// `value`, or an incident status chosen by the operator.
pub fn status_or_prompt<P: Prompter + ?Sized>(
    prompter: &P,
    value: Option<StatusArg>,
    default: Option<IncidentStatus>,
) -> Result<IncidentStatus, CliError> {
    if let Some(value) = value {
        return Ok(value.into());
    }
    let items = IncidentStatus::ALL.map(IncidentStatus::as_str);
    let default = default
        .and_then(|d| IncidentStatus::ALL.iter().position(|s| *s == d))
        .unwrap_or(0);
    let index = prompter
        .select("Status", &items, default)
        .map_err(|e| with_flag_hint(e, "status"))?;
    pick(&IncidentStatus::ALL, index)
}

/// `value`, or an operational state chosen by the operator.
pub fn state_or_prompt<P: Prompter + ?Sized>(
    prompter: &P,
    value: Option<StateArg>,
) -> Result<OperationalState, CliError> {
    if let Some(value) = value {
        return Ok(value.into());
    }
    let items = OperationalState::ALL.map(OperationalState::as_str);
    let index = prompter
        .select("State", &items, 0)
        .map_err(|e| with_flag_hint(e, "state"))?;
    pick(&OperationalState::ALL, index)
}

fn pick<T: Copy>(choices: &[T], index: usize) -> Result<T, CliError> {
    choices
        .get(index)
        .copied()
        .ok_or_else(|| CliError::Prompt(format!("selection {index} out of range")))
}

fn with_flag_hint(error: CliError, flag: &str) -> CliError {
    match error {
        CliError::Prompt(msg) => CliError::Prompt(format!("{msg} (pass --{flag} instead)")),
        other => other,
    }
}

/// Prompter replaying scripted answers, for testing.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::cell::RefCell<std::collections::VecDeque<String>>,
    asked: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl ScriptedPrompter {
    /// Answer prompts with `answers` in order; selections are answered by item text.
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            answers: std::cell::RefCell::new(answers.into_iter().map(String::from).collect()),
            asked: std::cell::RefCell::new(Vec::new()),
        }
    }

    /// Prompts shown so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn next(&self, prompt: &str) -> Result<String, CliError> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| CliError::Prompt("not a terminal".into()))
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn text(&self, prompt: &str, allow_empty: bool) -> Result<String, CliError> {
        let answer = self.next(prompt)?;
        if answer.is_empty() && !allow_empty {
            return Err(CliError::Prompt("empty answer".into()));
        }
        Ok(answer)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize, CliError> {
        let answer = self.next(prompt)?;
        if answer.is_empty() {
            return Ok(default);
        }
        items
            .iter()
            .position(|item| *item == answer)
            .ok_or_else(|| CliError::Prompt(format!("'{answer}' is not a choice")))
    }
}
