//! Prompt → validate → retry loop over an [`ArgProcessorList`]

use super::processor::{ArgOutput, ArgProcessorList, ArgsMap};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while collecting arguments
#[derive(Debug, Error)]
pub enum ArgError {
    /// A value was rejected and the parameter cannot be asked for interactively
    #[error("{0}")]
    Invalid(String),

    #[error("Missing value for --{0} (not running interactively)")]
    Missing(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Source of answers for parameters missing from the command line
pub trait Prompter {
    /// Ask a question and return the raw answer
    fn ask(&mut self, name: &str, prompt: &str) -> Result<String, ArgError>;

    /// Show why the previous value was rejected
    fn report_error(&mut self, message: &str);
}

/// Prompter for scripted runs: nothing is ever asked.
///
/// Each missing parameter gets one empty answer, so parameters that accept
/// an empty value (the output directory) fall back to their default while
/// all others fail as missing.
#[derive(Debug, Default)]
pub struct NonInteractive {
    errors: Vec<String>,
    pending: Option<String>,
    answered: BTreeSet<String>,
}

impl NonInteractive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages reported so far, most recent last
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Prompter for NonInteractive {
    fn ask(&mut self, name: &str, _prompt: &str) -> Result<String, ArgError> {
        if self.answered.contains(name) {
            self.pending = None;
            return Err(ArgError::Missing(name.to_string()));
        }
        if let Some(message) = self.pending.take() {
            return Err(ArgError::Invalid(message));
        }
        self.answered.insert(name.to_string());
        Ok(String::new())
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
        self.pending = Some(message.to_string());
    }
}

/// Run every processor over the provided values, prompting for what is missing or invalid.
///
/// Processors run in list order so conditions only see values of earlier
/// parameters (plus anything provided on the command line). Parameters whose
/// condition does not hold are left out of the result.
pub fn collect<P: Prompter + ?Sized>(
    provided: ArgsMap,
    processors: &ArgProcessorList,
    prompter: &mut P,
) -> Result<ArgsMap, ArgError> {
    let mut collected = provided;

    for processor in processors.iter() {
        if !processor.applies_to(&collected) {
            collected.remove(&processor.name);
            continue;
        }

        if let Some(raw) = collected.remove(&processor.name) {
            match processor.process(&raw) {
                ArgOutput::Valid(value) => {
                    collected.insert(processor.name.clone(), value);
                    continue;
                }
                ArgOutput::Invalid(message) => {
                    if processor.is_private() {
                        return Err(ArgError::Invalid(message));
                    }
                    prompter.report_error(&message);
                }
            }
        }

        let Some(prompt) = processor.prompt.as_deref() else {
            continue;
        };

        loop {
            let answer = prompter.ask(&processor.name, prompt)?;
            match processor.process(&answer) {
                ArgOutput::Valid(value) => {
                    collected.insert(processor.name.clone(), value);
                    break;
                }
                ArgOutput::Invalid(message) => prompter.report_error(&message),
            }
        }
    }

    Ok(collected)
}
