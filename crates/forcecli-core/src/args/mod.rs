//! Interactive argument collection
//!
//! A command declares its parameters as an [`ArgProcessorList`]. Values given
//! on the command line are validated first; anything missing or invalid is
//! asked for through a [`Prompter`] until it validates.

pub mod collector;
pub mod processor;

pub use collector::{collect, ArgError, NonInteractive, Prompter};
pub use processor::{ArgOutput, ArgProcessor, ArgProcessorList, ArgsMap, Validation};
