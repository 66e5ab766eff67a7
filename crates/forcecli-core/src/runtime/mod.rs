//! Toolchain detection and external process execution
//!
//! This module provides:
//! - Streaming execution of external commands (cordova, npm, gradle, xcodebuild)
//! - Tool detection with minimum version checks
//! - Generic tool management for installable tools like cordova

pub mod check;
pub mod process;
pub mod tool;
pub mod version;

pub use check::{
    check_requirements, check_tool, ensure_installed, requirements_for, ToolCheck, ToolStatus,
};
pub use process::{run, run_catch_error, run_throw_error, CommandSpec};
pub use tool::ToolManager;
pub use version::check_compatibility;
