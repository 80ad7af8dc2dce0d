//! Terminal and non-interactive prompt implementations

use crate::domain::prompt::Prompter;
use crate::shared::error::{AstarteError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// Asks questions on the terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt_choice(&self, question: &str, default: &str, allow_empty: bool) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(allow_empty);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }

        input
            .interact_text()
            .map_err(|e| AstarteError::Prompt(e.to_string()))
    }

    fn ask_confirmation(&self, question: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(true)
            .interact()
            .map_err(|e| AstarteError::Prompt(e.to_string()))
    }

    fn select(&self, question: &str, options: &[String]) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(question)
            .default(0)
            .items(options)
            .interact()
            .map_err(|e| AstarteError::Prompt(e.to_string()))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Answers yes to every confirmation and takes every default.
/// Questions without a default cannot be answered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn prompt_choice(&self, question: &str, default: &str, allow_empty: bool) -> Result<String> {
        if default.is_empty() && !allow_empty {
            return Err(AstarteError::missing_field(format!(
                "no default available for \"{}\" in non-interactive mode",
                question
            )));
        }
        Ok(default.to_string())
    }

    fn ask_confirmation(&self, _question: &str) -> Result<bool> {
        Ok(true)
    }

    fn select(&self, question: &str, _options: &[String]) -> Result<usize> {
        Err(AstarteError::missing_field(format!(
            "\"{}\" cannot be answered in non-interactive mode",
            question
        )))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
