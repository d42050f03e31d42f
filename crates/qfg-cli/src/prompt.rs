//! Interactive prompts for decisions the flags left open.
//!
//! Prompts only run when stdin and stderr are terminals, `--no-interactive`
//! is absent, and the binary was built with the `interactive` feature.
//! Otherwise commands must resolve every decision from flags and defaults.

use std::fmt::Display;
use std::io::IsTerminal as _;

use crate::cli::GlobalArgs;
use crate::error::CliResult;

pub struct Prompter {
    enabled: bool,
}

impl Prompter {
    pub fn new(global: &GlobalArgs) -> Self {
        let tty = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
        Self {
            enabled: cfg!(feature = "interactive") && tty && !global.no_interactive && !global.quiet,
        }
    }

    /// A prompter that never asks.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "interactive")]
mod imp {
    use super::*;
    use crate::error::CliError;
    use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};

    fn prompt_error(e: dialoguer::Error) -> CliError {
        CliError::Prompt {
            message: e.to_string(),
        }
    }

    impl Prompter {
        pub fn text(&self, prompt: &str, default: Option<&str>) -> CliResult<String> {
            let theme = ColorfulTheme::default();
            let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
            if let Some(default) = default {
                input = input.default(default.to_string());
            }
            input.interact_text().map_err(prompt_error)
        }

        pub fn select<T: Copy + Display>(&self, prompt: &str, items: &[T], default: usize) -> CliResult<T> {
            let labels: Vec<String> = items.iter().map(ToString::to_string).collect();
            let index = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .items(&labels)
                .default(default)
                .interact()
                .map_err(prompt_error)?;
            Ok(items[index])
        }

        pub fn multi_select<T: Copy + Display>(
            &self,
            prompt: &str,
            items: &[T],
            checked: &[bool],
        ) -> CliResult<Vec<T>> {
            let labels: Vec<String> = items.iter().map(ToString::to_string).collect();
            let picked = MultiSelect::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .items(&labels)
                .defaults(checked)
                .interact()
                .map_err(prompt_error)?;
            Ok(picked.into_iter().map(|i| items[i]).collect())
        }

        pub fn confirm(&self, prompt: &str, default: bool) -> CliResult<bool> {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(default)
                .interact()
                .map_err(prompt_error)
        }
    }
}

#[cfg(not(feature = "interactive"))]
mod imp {
    use super::*;
    use crate::error::CliError;

    const UNAVAILABLE: CliError = CliError::FeatureNotAvailable {
        feature: "interactive",
    };

    impl Prompter {
        pub fn text(&self, _prompt: &str, _default: Option<&str>) -> CliResult<String> {
            Err(UNAVAILABLE)
        }

        pub fn select<T: Copy + Display>(&self, _prompt: &str, _items: &[T], _default: usize) -> CliResult<T> {
            Err(UNAVAILABLE)
        }

        pub fn multi_select<T: Copy + Display>(
            &self,
            _prompt: &str,
            _items: &[T],
            _checked: &[bool],
        ) -> CliResult<Vec<T>> {
            Err(UNAVAILABLE)
        }

        pub fn confirm(&self, _prompt: &str, _default: bool) -> CliResult<bool> {
            Err(UNAVAILABLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_interactive_flag_disables_prompts() {
        let global = GlobalArgs {
            no_interactive: true,
            ..GlobalArgs::default()
        };
        assert!(!Prompter::new(&global).is_enabled());
    }

    #[test]
    fn quiet_disables_prompts() {
        let global = GlobalArgs {
            quiet: true,
            ..GlobalArgs::default()
        };
        assert!(!Prompter::new(&global).is_enabled());
    }

    #[test]
    fn disabled_never_asks() {
        assert!(!Prompter::disabled().is_enabled());
    }
}
