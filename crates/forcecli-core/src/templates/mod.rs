//! Template sources, manifests and copying
//!
//! This module provides:
//! - Template/plugin repo references (git URL with optional `#branch`, or a local directory)
//! - The per-template manifest (`template.yaml`)
//! - Template copying with token replacement in paths and contents

pub mod copier;
pub mod manifest;
pub mod source;

pub use copier::{copy_template, TokenValues};
pub use manifest::{Replacements, TemplateManifest, MANIFEST_FILE};
pub use source::{template_name_from_url, TemplateSource};

use anyhow::Result;
use std::path::Path;

/// Check out a template repo and read the app type its manifest declares
pub async fn app_type_of_template(
    reference: &str,
    template_path: Option<&str>,
    work_dir: &Path,
) -> Result<crate::app::AppType> {
    let repo_dir = TemplateSource::parse(reference)?.checkout(work_dir).await?;
    let template_dir = match template_path {
        Some(path) => repo_dir.join(path),
        None => repo_dir,
    };
    Ok(TemplateManifest::load(&template_dir)?.app_type)
}
