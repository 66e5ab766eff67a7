//! Template and plugin repositories: a git URL (optionally `#branch`) or a local directory

use crate::runtime::process::{self, CommandSpec};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use url::Url;

/// Where a repository comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Anything `git clone` understands: URLs and scp-style `user@host:path` remotes
    Remote { url: String, branch: Option<String> },
    Local(PathBuf),
}

/// `git@github.com:org/Repo.git`
fn is_scp_like(reference: &str) -> bool {
    static SCP: OnceLock<Regex> = OnceLock::new();
    SCP.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+:[^\s:]\S*$").expect("scp pattern must compile")
    })
    .is_match(reference)
}

impl TemplateSource {
    /// Parse a repo reference; existing directories are used in place
    pub fn parse(reference: &str) -> Result<Self> {
        let path = Path::new(reference);
        if path.is_dir() {
            return Ok(Self::Local(path.to_path_buf()));
        }

        let (location, fragment) = match reference.split_once('#') {
            Some((location, fragment)) => (location, Some(fragment)),
            None => (reference, None),
        };
        let branch = fragment.filter(|b| !b.is_empty()).map(str::to_string);

        let url = match Url::parse(location) {
            Ok(url) => url.to_string(),
            Err(_) if is_scp_like(location) => location.to_string(),
            Err(e) => {
                return Err(e).with_context(|| format!("Invalid repo URL: {}", reference));
            }
        };
        Ok(Self::Remote { url, branch })
    }

    /// Directory name a clone of this repo gets
    pub fn repo_name(&self) -> String {
        match self {
            Self::Remote { url, .. } => repo_name_from_location(url),
            Self::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "template".to_string()),
        }
    }

    /// The `git clone` invocation copying this repo to `dest`
    pub fn clone_command(&self, dest: &Path) -> CommandSpec {
        match self {
            Self::Remote { url, branch } => {
                let mut spec = CommandSpec::new("git").args(["clone", "--depth", "1"]);
                if let Some(branch) = branch {
                    spec = spec.args(["--branch", branch.as_str(), "--single-branch"]);
                }
                spec.arg(url.as_str()).arg(dest.to_string_lossy())
            }
            Self::Local(path) => CommandSpec::new("git")
                .arg("clone")
                .arg(path.to_string_lossy())
                .arg(dest.to_string_lossy()),
        }
    }

    /// Make the repo available for reading: local sources as-is, remote ones cloned into `work_dir`
    pub async fn checkout(&self, work_dir: &Path) -> Result<PathBuf> {
        match self {
            Self::Local(path) => Ok(path.clone()),
            Self::Remote { .. } => self.clone_into(work_dir).await,
        }
    }

    /// Clone into `work_dir` even when the source is local, for callers that modify the copy
    pub async fn clone_into(&self, work_dir: &Path) -> Result<PathBuf> {
        let dest = work_dir.join(self.repo_name());
        let location = match self {
            Self::Remote { url, .. } => url.clone(),
            Self::Local(path) => path.display().to_string(),
        };
        process::run_throw_error(&self.clone_command(&dest))
            .await
            .with_context(|| format!("Failed to clone {}", location))?;
        Ok(dest)
    }
}

fn repo_name_from_location(location: &str) -> String {
    let location = location.split(['?', '#']).next().unwrap_or(location);
    let name = location
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}

/// Template name shown in reports: last path segment of the URL, branch dropped
pub fn template_name_from_url(reference: &str) -> &str {
    let without_branch = reference.split('#').next().unwrap_or(reference);
    without_branch
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_branch)
}
