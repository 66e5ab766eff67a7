//! Template file copying with token replacement

use super::manifest::{TemplateManifest, MANIFEST_FILE};
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::path::Path;
use walkdir::WalkDir;

/// Token → value pairs applied to file paths and text contents
#[derive(Debug, Clone, Default)]
pub struct TokenValues {
    pairs: Vec<(String, String)>,
    /// Alternation of every token, longest first, so one pass replaces them all
    pattern: Option<Regex>,
}

impl TokenValues {
    /// Pair each manifest token with the user's value
    pub fn from_manifest(
        manifest: &TemplateManifest,
        app_name: &str,
        package_name: &str,
        organization: &str,
        start_page: Option<&str>,
    ) -> Result<Self> {
        let r = &manifest.replacements;
        let package_path = package_name.replace('.', "/");
        let mut values = Self::default();

        values.push(r.package_path.as_deref(), &package_path);
        values.push(r.package_name.as_deref(), package_name);
        values.push(r.organization.as_deref(), organization);
        values.push(r.app_name.as_deref(), app_name);
        if let Some(page) = start_page {
            values.push(r.start_page.as_deref(), page);
        }
        values.compile()?;
        Ok(values)
    }

    fn push(&mut self, token: Option<&str>, value: &str) {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return;
        };
        if !self.pairs.iter().any(|(t, _)| t == token) {
            self.pairs.push((token.to_string(), value.to_string()));
        }
    }

    fn compile(&mut self) -> Result<()> {
        if self.pairs.is_empty() {
            self.pattern = None;
            return Ok(());
        }
        // A token contained in a longer one must not win at the same position
        let mut tokens: Vec<&str> = self.pairs.iter().map(|(t, _)| t.as_str()).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        self.pattern =
            Some(Regex::new(&alternation).context("Failed to compile template tokens")?);
        Ok(())
    }

    /// Replace every token in one pass; replaced values are never rescanned
    pub fn apply(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| {
                let token = &caps[0];
                self.pairs
                    .iter()
                    .find(|(t, _)| t == token)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| token.to_string())
            })
            .into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Copy a template directory into `target_dir`, replacing tokens along the way.
///
/// Returns the copied paths relative to `target_dir` (after replacement).
pub fn copy_template(
    template_dir: &Path,
    target_dir: &Path,
    manifest: &TemplateManifest,
    values: &TokenValues,
) -> Result<Vec<String>> {
    std::fs::create_dir_all(target_dir).context("Failed to create target directory")?;

    let mut copied_files = Vec::new();
    let walker = WalkDir::new(template_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || (name != ".git" && !manifest.is_ignored(&name))
        });

    for entry in walker {
        let entry = entry.context("Failed to walk template directory")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(template_dir)
            .context("Template entry outside template directory")?;
        let relative = relative.to_string_lossy().replace('\\', "/");
        if relative == MANIFEST_FILE {
            continue;
        }

        let dest_relative = values.apply(&relative);
        let dest = target_dir.join(&dest_relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let bytes = std::fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => values.apply(&text).into_bytes(),
            // Binary files (images, jars) are copied untouched
            Err(e) => e.into_bytes(),
        };
        std::fs::write(&dest, content)
            .with_context(|| format!("Failed to write file: {}", dest.display()))?;

        copied_files.push(dest_relative);
    }

    for removed in &manifest.remove {
        let removed = values.apply(removed);
        let path = target_dir.join(&removed);
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        } else if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        let removed_prefix = format!("{}/", removed);
        copied_files.retain(|f| *f != removed && !f.starts_with(&removed_prefix));
    }

    Ok(copied_files)
}
