//! Application generation from a template
//!
//! Generation runs in two phases so front ends can report between them:
//! [`prepare_template`] checks out the template and reads its manifest,
//! [`generate`] writes the app and runs the platform tooling.

mod hybrid;
mod native;

use crate::app::AppType;
use crate::config::{AppConfig, CreateKind};
use crate::product::ProductConfig;
use crate::templates::{TemplateManifest, TemplateSource, TokenValues};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A checked-out template, ready to generate from
#[derive(Debug)]
pub struct PreparedTemplate {
    /// Holds remote clones alive until generation is done
    _work_dir: TempDir,
    pub template_dir: PathBuf,
    pub manifest: TemplateManifest,
    pub app_type: AppType,
}

/// Result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedApp {
    pub project_dir: PathBuf,
    pub app_type: AppType,
    /// Files copied from the template, relative to `project_dir`
    pub files: Vec<String>,
}

/// Resolve, check out and read the template the configuration points at
pub async fn prepare_template<C: ProductConfig>(
    product: &C,
    config: &AppConfig,
) -> Result<PreparedTemplate> {
    let work_dir = tempfile::Builder::new()
        .prefix(&format!("{}-template-", product.name()))
        .tempdir()
        .context("Failed to create work directory")?;

    let (reference, default_path) = match config.kind {
        CreateKind::Create => {
            let app_type = config
                .app_type
                .context("An app type is required to pick a template")?;
            (
                product.template_repo_url(),
                Some(product.template_path(app_type)),
            )
        }
        CreateKind::CreateWithTemplate => (
            config
                .template_repo_url
                .clone()
                .context("A template repo URL is required")?,
            None,
        ),
    };

    let repo_dir = TemplateSource::parse(&reference)?
        .checkout(work_dir.path())
        .await?;
    let template_dir = match config.template_path.as_deref().or(default_path) {
        Some(path) if !path.is_empty() => repo_dir.join(path),
        _ => repo_dir,
    };

    let manifest = TemplateManifest::load(&template_dir)?;
    let app_type = resolve_app_type(product, config.app_type, &manifest)?;

    Ok(PreparedTemplate {
        _work_dir: work_dir,
        template_dir,
        manifest,
        app_type,
    })
}

fn resolve_app_type<C: ProductConfig>(
    product: &C,
    requested: Option<AppType>,
    manifest: &TemplateManifest,
) -> Result<AppType> {
    if let Some(requested) = requested {
        if requested != manifest.app_type {
            anyhow::bail!(
                "Template is a {} template but {} was requested",
                manifest.app_type,
                requested
            );
        }
    }
    if !product.supports(manifest.app_type) {
        anyhow::bail!(
            "{} cannot create {} apps",
            product.name(),
            manifest.app_type
        );
    }
    Ok(manifest.app_type)
}

/// Write the app into its project directory and run the platform tooling
pub async fn generate<C: ProductConfig>(
    product: &C,
    config: &AppConfig,
    prepared: &PreparedTemplate,
    cwd: &Path,
) -> Result<CreatedApp> {
    let project_dir = config.project_dir(cwd);
    ensure_empty(&project_dir)?;

    let values = TokenValues::from_manifest(
        &prepared.manifest,
        &config.app_name,
        &config.package_name,
        &config.organization,
        config.start_page.as_deref(),
    )?;
    let os = product.os();

    let files = match prepared.app_type {
        AppType::Native | AppType::NativeSwift => {
            native::create_native(os, prepared, &project_dir, &values).await?
        }
        AppType::ReactNative => {
            native::create_react_native(os, prepared, &project_dir, &values).await?
        }
        AppType::HybridLocal | AppType::HybridRemote => {
            let plugin = config
                .plugin_repo_url
                .clone()
                .unwrap_or_else(|| product.plugin_repo_url());
            hybrid::create_hybrid(os, config, prepared, &project_dir, &values, &plugin).await?
        }
    };

    Ok(CreatedApp {
        project_dir,
        app_type: prepared.app_type,
        files,
    })
}

fn ensure_empty(project_dir: &Path) -> Result<()> {
    if !project_dir.exists() {
        return Ok(());
    }
    if !project_dir.is_dir() {
        anyhow::bail!("{} exists and is not a directory", project_dir.display());
    }
    let has_entries = std::fs::read_dir(project_dir)
        .with_context(|| format!("Failed to read {}", project_dir.display()))?
        .next()
        .is_some();
    if has_entries {
        anyhow::bail!(
            "Directory {} already exists and is not empty",
            project_dir.display()
        );
    }
    Ok(())
}
