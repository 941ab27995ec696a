// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interactive input

use crate::params::ParamValue;
use anyhow::{Context, Result};
use colored::Colorize;
use inquire::validator::Validation;
use inquire::{CustomUserError, Select, Text};

/// One field of the params form
#[derive(Debug, Clone, PartialEq)]
pub struct PromptParam {
    pub name: String,
    pub default_value: Option<String>,
    pub optional: bool,
    /// Already satisfied elsewhere; shown but not asked.
    pub disabled: bool,
}

pub trait Prompter {
    fn ask_for_option(&self, message: &str, options: &[String]) -> Result<String>;

    /// Ask for every enabled param; empty answers are dropped.
    fn ask_for_params(&self, message: &str, params: &[PromptParam]) -> Result<Vec<ParamValue>>;
}

/// Prompts on the terminal; all rendering goes to stderr.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask_for_option(&self, message: &str, options: &[String]) -> Result<String> {
        Select::new(message, options.to_vec())
            .prompt()
            .context("Selection aborted")
    }

    fn ask_for_params(&self, message: &str, params: &[PromptParam]) -> Result<Vec<ParamValue>> {
        if params.iter().all(|param| param.disabled) {
            return Ok(Vec::new());
        }

        eprintln!("{}", message.bold());

        let mut values = Vec::new();
        for param in params {
            if param.disabled {
                eprintln!("  {} {}", param.name, "(hidden)".dimmed());
                continue;
            }

            let label = if param.optional {
                format!("{} (optional)", param.name)
            } else {
                param.name.clone()
            };

            let mut text = Text::new(&label);
            if let Some(default) = &param.default_value {
                text = text.with_initial_value(default);
            }
            if !param.optional {
                text = text.with_validator(|input: &str| -> Result<Validation, CustomUserError> {
                    if input.trim().is_empty() {
                        Ok(Validation::Invalid("This param is required".into()))
                    } else {
                        Ok(Validation::Valid)
                    }
                });
            }

            let answer = text
                .prompt()
                .with_context(|| format!("Prompt aborted at param \"{}\"", param.name))?;
            if !answer.is_empty() {
                values.push(ParamValue::new(&param.name, answer));
            }
        }

        Ok(values)
    }
}
