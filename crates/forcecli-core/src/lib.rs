//! Forcecli Core - Shared library for the mobile SDK scaffolding CLIs
//!
//! This library provides the core functionality for generating mobile apps from templates.
//! It is used by the `forceios` and `forcedroid` binaries, which share the same
//! generation logic but target different platforms, and by the `test-force`
//! driver that generates and compiles every supported app type.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Argument processing, template checkout and copying,
//!   tool detection, external process execution
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, app generation
//!   ([`create`]) and the test matrix ([`matrix`])
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use forcecli_core::{args, config, create, ProductConfig};
//!
//! let processors = config::create_args_processor_list(product.app_types(), CreateKind::Create);
//! let collected = args::collect(provided, &processors, &mut args::NonInteractive::new())?;
//! let app = config::AppConfig::from_args_map(CreateKind::Create, &collected)?;
//!
//! let prepared = create::prepare_template(&product, &app).await?;
//! let created = create::generate(&product, &app, &prepared, &cwd).await?;
//! ```

pub mod app;
pub mod args;
pub mod config;
pub mod create;
pub mod matrix;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use app::{AppType, Os};
pub use config::{AppConfig, CreateKind};
pub use create::{generate, prepare_template, CreatedApp, PreparedTemplate};
pub use product::ProductConfig;
pub use runtime::{check_requirements, ToolCheck, ToolStatus};
pub use templates::{copy_template, TemplateManifest, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::{run, CreateRequest};
