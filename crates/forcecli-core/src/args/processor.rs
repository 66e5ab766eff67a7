//! Argument processors: one named parameter, its prompt and its validation

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Collected argument values keyed by parameter name
pub type ArgsMap = BTreeMap<String, String>;

/// Predicate deciding whether a parameter applies, given the values collected so far
pub type Condition = Box<dyn Fn(&ArgsMap) -> bool + Send + Sync>;

/// Transformation applied to a value once it passed validation
pub type Postprocessor = Box<dyn Fn(String) -> String + Send + Sync>;

/// Rule a (trimmed) value must satisfy
pub enum Validation {
    /// Unanchored regex search, anchors must be part of the pattern
    Pattern(Regex),
    Predicate(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Validation {
    /// Build a pattern rule from a regex literal known at compile time
    pub fn pattern(pattern: &str) -> Self {
        Validation::Pattern(Regex::new(pattern).expect("validation pattern must compile"))
    }

    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Validation::Predicate(Box::new(f))
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Validation::Pattern(re) => re.is_match(value),
            Validation::Predicate(f) => f(value),
        }
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            Validation::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Result of processing a single value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgOutput {
    /// Value to store (after trimming and post-processing)
    Valid(String),
    /// Message explaining why the value was rejected
    Invalid(String),
}

/// A named parameter of an interactive command
pub struct ArgProcessor {
    pub name: String,
    /// Question shown to the user. `None` marks a private parameter that is never asked.
    pub prompt: Option<String>,
    /// Error message; `$val` is replaced with the rejected value
    pub error: String,
    pub validation: Validation,
    pub condition: Option<Condition>,
    pub postprocessor: Option<Postprocessor>,
}

impl ArgProcessor {
    pub fn new(
        name: impl Into<String>,
        prompt: Option<&str>,
        error: impl Into<String>,
        validation: Validation,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.map(str::to_string),
            error: error.into(),
            validation,
            condition: None,
            postprocessor: None,
        }
    }

    /// Only ask for this parameter when `condition` holds
    pub fn when(mut self, condition: impl Fn(&ArgsMap) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn map_value(mut self, postprocessor: impl Fn(String) -> String + Send + Sync + 'static) -> Self {
        self.postprocessor = Some(Box::new(postprocessor));
        self
    }

    pub fn is_private(&self) -> bool {
        self.prompt.is_none()
    }

    pub fn applies_to(&self, collected: &ArgsMap) -> bool {
        self.condition.as_ref().map_or(true, |c| c(collected))
    }

    /// Trim, validate and post-process a raw value
    pub fn process(&self, raw: &str) -> ArgOutput {
        let value = raw.trim();
        if self.validation.accepts(value) {
            let value = value.to_string();
            match &self.postprocessor {
                Some(post) => ArgOutput::Valid(post(value)),
                None => ArgOutput::Valid(value),
            }
        } else {
            ArgOutput::Invalid(self.error.replace("$val", value))
        }
    }
}

impl fmt::Debug for ArgProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgProcessor")
            .field("name", &self.name)
            .field("prompt", &self.prompt)
            .field("validation", &self.validation)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// Ordered list of processors for one command
#[derive(Debug, Default)]
pub struct ArgProcessorList {
    processors: Vec<ArgProcessor>,
}

impl ArgProcessorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, processor: ArgProcessor) -> &mut Self {
        self.processors.push(processor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgProcessor> {
        self.processors.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgProcessor> {
        self.processors.iter()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
