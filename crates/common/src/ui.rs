//! User interface implementations

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use solar_runtime::{MessageStyle, ProgressIndicator, UserInterface};

/// Production UI implementation using indicatif and dialoguer
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            pb.set_style(spinner_style);
        }
        Box::new(RealProgressIndicator { pb })
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        let styled = match msg_style {
            MessageStyle::Normal => message.to_string(),
            MessageStyle::Bold => style(message).bold().to_string(),
            MessageStyle::Cyan => style(message).cyan().to_string(),
            MessageStyle::Dim => style(message).dim().to_string(),
            MessageStyle::Warning => style(message).yellow().bold().to_string(),
            MessageStyle::Error => style(message).red().bold().to_string(),
            MessageStyle::Success => style(message).green().bold().to_string(),
        };
        println!("{styled}");
    }

    fn is_interactive(&self) -> bool {
        atty::is(atty::Stream::Stdin)
    }

    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        use dialoguer::{Input, theme::ColorfulTheme};

        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(default.is_some());

        if let Some(default_val) = default {
            input = input.default(default_val.to_string());
        }

        input
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to get input: {e}"))
    }

    fn prompt_password(&self, prompt: &str) -> Result<String> {
        use dialoguer::{Password, theme::ColorfulTheme};

        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {e}"))
    }

    fn prompt_confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        use dialoguer::{Confirm, theme::ColorfulTheme};

        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to get confirmation: {e}"))
    }
}

struct RealProgressIndicator {
    pb: ProgressBar,
}

impl ProgressIndicator for RealProgressIndicator {
    fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }

    fn enable_steady_tick(&self, duration: Duration) {
        self.pb.enable_steady_tick(duration);
    }
}

/// Test UI implementation that captures output and replays scripted answers
///
/// Prompts consume queued answers in order. When the queue is empty, text
/// prompts fall back to their default (or `"test-value"`) and confirmations
/// to their default.
#[derive(Default)]
pub struct TestUserInterface {
    output: Arc<Mutex<Vec<String>>>,
    styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
    answers: Mutex<VecDeque<String>>,
    confirmations: Mutex<VecDeque<bool>>,
    interactive: bool,
}

impl TestUserInterface {
    /// Non-interactive UI with no scripted answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Interactive UI that answers text and password prompts in order
    #[must_use]
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            interactive: true,
            ..Self::default()
        }
    }

    /// Queue answers for yes/no prompts
    #[must_use]
    pub fn with_confirmations(self, confirmations: impl IntoIterator<Item = bool>) -> Self {
        Self {
            confirmations: Mutex::new(confirmations.into_iter().collect()),
            interactive: true,
            ..self
        }
    }

    /// Everything printed so far, styled or not
    pub fn get_output(&self) -> Vec<String> {
        lock(&self.output).clone()
    }

    /// Styled messages printed so far
    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        lock(&self.styled_output).clone()
    }

    /// Whether any printed line contains `needle`
    pub fn printed(&self, needle: &str) -> bool {
        lock(&self.output).iter().any(|line| line.contains(needle))
    }

    fn next_answer(&self) -> Option<String> {
        lock(&self.answers).pop_front()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl UserInterface for TestUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        Box::new(TestProgressIndicator)
    }

    fn print(&self, message: &str) {
        lock(&self.output).push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        lock(&self.styled_output).push((message.to_string(), style));
        lock(&self.output).push(message.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn prompt_input(&self, _prompt: &str, default: Option<&str>) -> Result<String> {
        Ok(self
            .next_answer()
            .unwrap_or_else(|| default.unwrap_or("test-value").to_string()))
    }

    fn prompt_password(&self, _prompt: &str) -> Result<String> {
        Ok(self
            .next_answer()
            .unwrap_or_else(|| "test-password".to_string()))
    }

    fn prompt_confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(lock(&self.confirmations).pop_front().unwrap_or(default))
    }
}

struct TestProgressIndicator;

impl ProgressIndicator for TestProgressIndicator {
    fn set_message(&self, _message: &str) {}

    fn finish_and_clear(&self) {}

    fn enable_steady_tick(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_real_user_interface_print_styled() {
        let ui = RealUserInterface;

        ui.print("plain");
        ui.print_styled("Bold text", MessageStyle::Bold);
        ui.print_styled("Dim text", MessageStyle::Dim);
        ui.print_styled("Error text", MessageStyle::Error);
        ui.print_styled("Success text", MessageStyle::Success);
    }

    #[test]
    fn test_real_progress_indicator() {
        let spinner = RealUserInterface.create_spinner();
        spinner.set_message("Loading...");
        spinner.finish_and_clear();
    }

    #[test]
    fn test_captures_plain_and_styled_output() {
        let ui = TestUserInterface::new();
        ui.print("one");
        ui.print_styled("two", MessageStyle::Success);

        assert_eq!(ui.get_output(), vec!["one", "two"]);
        assert_eq!(
            ui.get_styled_output(),
            vec![("two".to_string(), MessageStyle::Success)]
        );
        assert!(ui.printed("tw"));
    }

    #[test]
    fn test_scripted_answers_then_defaults() {
        let ui = TestUserInterface::with_answers(["admin", "secret"]).with_confirmations([false]);

        assert!(ui.is_interactive());
        assert_eq!(ui.prompt_input("Username", None).unwrap(), "admin");
        assert_eq!(ui.prompt_password("Password").unwrap(), "secret");
        assert_eq!(ui.prompt_input("Name", Some("kept")).unwrap(), "kept");
        assert!(!ui.prompt_confirm("Sure?", true).unwrap());
        assert!(ui.prompt_confirm("Sure?", true).unwrap());
    }
}
