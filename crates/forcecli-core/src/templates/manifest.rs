//! Template manifest types and parsing

use crate::app::AppType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the manifest at the root of every template
pub const MANIFEST_FILE: &str = "template.yaml";

/// Placeholder strings in the template that get replaced by the user's values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacements {
    /// Token standing for the application name
    pub app_name: Option<String>,

    /// Token standing for the package identifier (com.mycompany.myapp)
    pub package_name: Option<String>,

    /// Token standing for the organization name
    pub organization: Option<String>,

    /// Token standing for the package as a path (com/mycompany/myapp), used by Android sources
    pub package_path: Option<String>,

    /// Token standing for the start page of hybrid remote apps
    pub start_page: Option<String>,
}

/// Per-template manifest (`<template>/template.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Kind of app the template produces
    pub app_type: AppType,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Minimum CLI version, for compatibility warnings
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub replacements: Replacements,

    /// File patterns never copied (`*suffix`, `prefix*` or exact names)
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Paths (relative to the generated app, after replacement) deleted once copied
    #[serde(default)]
    pub remove: Vec<String>,
}

impl TemplateManifest {
    /// Read `template.yaml` from a template directory
    pub fn load(template_dir: &Path) -> Result<Self> {
        let manifest_path = template_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))
    }

    /// Check if a file name is excluded from copying
    pub fn is_ignored(&self, filename: &str) -> bool {
        matches_any(filename, &self.ignore)
    }
}

/// Check if a filename matches any pattern in a list
pub fn matches_any(filename: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('*') {
            // Suffix match: *.xcuserstate matches foo.xcuserstate
            filename.ends_with(suffix)
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            // Prefix match: build* matches build.log
            filename.starts_with(prefix)
        } else {
            // Exact match
            filename == pattern
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE_MANIFEST: &str = r#"
app_type: native
description: Native iOS app in Objective-C
version: 0.1.0
replacements:
  app_name: iOSNativeTemplate
  package_name: com.salesforce.iosnativetemplate
  organization: iOSNativeTemplateOrganizationName
ignore:
  - "*.xcuserstate"
  - DerivedData
remove:
  - README.md
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: TemplateManifest = serde_yaml::from_str(NATIVE_MANIFEST).unwrap();
        assert_eq!(manifest.app_type, AppType::Native);
        assert_eq!(manifest.version.as_deref(), Some("0.1.0"));
        assert_eq!(
            manifest.replacements.app_name.as_deref(),
            Some("iOSNativeTemplate")
        );
        assert_eq!(manifest.replacements.start_page, None);
        assert_eq!(manifest.remove, vec!["README.md"]);
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest: TemplateManifest = serde_yaml::from_str("app_type: hybrid_local").unwrap();
        assert_eq!(manifest.app_type, AppType::HybridLocal);
        assert!(manifest.ignore.is_empty());
        assert_eq!(manifest.replacements, Replacements::default());
    }

    #[test]
    fn test_unknown_app_type_rejected() {
        assert!(serde_yaml::from_str::<TemplateManifest>("app_type: flutter").is_err());
    }

    #[test]
    fn test_ignore_patterns() {
        let manifest: TemplateManifest = serde_yaml::from_str(NATIVE_MANIFEST).unwrap();
        assert!(manifest.is_ignored("UserInterfaceState.xcuserstate"));
        assert!(manifest.is_ignored("DerivedData"));
        assert!(!manifest.is_ignored("AppDelegate.m"));
    }

    #[test]
    fn test_prefix_pattern() {
        let patterns = vec!["build*".to_string()];
        assert!(matches_any("build.log", &patterns));
        assert!(!matches_any("rebuild", &patterns));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), NATIVE_MANIFEST).unwrap();
        let manifest = TemplateManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.description, "Native iOS app in Objective-C");

        let empty = tempfile::tempdir().unwrap();
        assert!(TemplateManifest::load(empty.path()).is_err());
    }
}
