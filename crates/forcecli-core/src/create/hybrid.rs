//! Hybrid apps: a cordova project with the SDK plugin and the template's web assets

use super::PreparedTemplate;
use crate::app::Os;
use crate::config::AppConfig;
use crate::runtime::process::{self, CommandSpec};
use crate::templates::{copy_template, TokenValues};
use anyhow::{Context, Result};
use std::path::Path;

/// Cordova commands in the order they run, before and after the template copy
pub(super) fn cordova_commands(
    os: Os,
    config: &AppConfig,
    project_dir: &Path,
    plugin: &str,
) -> (Vec<CommandSpec>, Vec<CommandSpec>) {
    let parent = project_dir.parent().unwrap_or(project_dir);
    let before = vec![
        CommandSpec::new("cordova")
            .arg("create")
            .arg(project_dir.to_string_lossy())
            .arg(config.package_name.as_str())
            .arg(config.app_name.as_str())
            .current_dir(parent),
        CommandSpec::new("cordova")
            .args(["platform", "add", os.as_str()])
            .current_dir(project_dir),
        CommandSpec::new("cordova")
            .args(["plugin", "add", plugin, "--force"])
            .current_dir(project_dir),
    ];
    let after = vec![CommandSpec::new("cordova")
        .arg("prepare")
        .current_dir(project_dir)];
    (before, after)
}

pub(super) async fn create_hybrid(
    os: Os,
    config: &AppConfig,
    prepared: &PreparedTemplate,
    project_dir: &Path,
    values: &TokenValues,
    plugin: &str,
) -> Result<Vec<String>> {
    if let Some(parent) = project_dir.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let (before, after) = cordova_commands(os, config, project_dir, plugin);
    for spec in &before {
        process::run_throw_error(spec).await?;
    }

    // The template's web assets replace cordova's sample app
    let www = project_dir.join("www");
    if www.exists() {
        std::fs::remove_dir_all(&www)
            .with_context(|| format!("Failed to remove {}", www.display()))?;
    }
    let files = copy_template(&prepared.template_dir, project_dir, &prepared.manifest, values)?;

    for spec in &after {
        process::run_throw_error(spec).await?;
    }

    Ok(files)
}
