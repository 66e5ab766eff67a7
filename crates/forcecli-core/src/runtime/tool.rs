//! External tool management
//!
//! Provides a reusable abstraction for checking, and where possible
//! installing, the CLI tools app generation shells out to.

use super::process::{self, CommandSpec};
use anyhow::Result;
use colored::Colorize;
use std::time::Duration;

/// Timeout for installation (5 minutes, npm global installs are slow)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

const CORDOVA_INSTALL: &[&str] = &["npm", "install", "-g", "cordova"];
const COCOAPODS_INSTALL: &[&str] = &["gem", "install", "cocoapods"];

/// Configuration for a CLI tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Name of the tool binary (e.g., "cordova")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Argument that prints the version
    pub version_arg: &'static str,
    /// Oldest supported version, if any
    pub min_version: Option<&'static str>,
    /// Command installing the tool, when it can be installed for the user
    pub install_command: Option<&'static [&'static str]>,
    /// URL to the documentation
    pub docs_url: &'static str,
}

/// Manager for checking and installing CLI tools
#[derive(Debug, Clone)]
pub struct ToolManager {
    config: ToolConfig,
}

impl ToolManager {
    /// Create a new tool manager with the given configuration
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Get the tool configuration
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Install command as a runnable spec
    pub fn install_spec(&self) -> Option<CommandSpec> {
        let (program, args) = self.config.install_command?.split_first()?;
        Some(
            CommandSpec::new(*program)
                .args(args.iter().copied())
                .timeout(INSTALL_TIMEOUT),
        )
    }

    /// Get the install command string
    pub fn install_command(&self) -> Option<String> {
        self.config.install_command.map(|parts| parts.join(" "))
    }

    /// Check if the tool is installed and available in PATH
    pub fn is_installed(&self) -> bool {
        let finder = if cfg!(windows) { "where" } else { "which" };
        std::process::Command::new(finder)
            .arg(self.config.name)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Get the installed tool version (if available)
    pub fn get_version(&self) -> Option<String> {
        std::process::Command::new(self.config.name)
            .arg(self.config.version_arg)
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .and_then(|s| s.lines().next().map(|l| l.trim().to_string()))
                } else {
                    None
                }
            })
    }

    /// Install the tool with its install command, streaming output
    pub async fn install(&self) -> Result<()> {
        let Some(spec) = self.install_spec() else {
            anyhow::bail!(
                "{} cannot be installed automatically. See {}",
                self.config.display_name,
                self.config.docs_url
            );
        };

        println!();
        if let Err(e) = process::run_throw_error(&spec).await {
            anyhow::bail!(
                "{}\nPlease try installing manually: {}",
                e,
                self.install_command().unwrap_or_default()
            );
        }
        println!();
        Ok(())
    }

    /// Open the tool's documentation in the default browser
    pub fn open_docs(&self) -> Result<()> {
        println!(
            "{}",
            format!("Opening {} documentation in your browser...", self.config.display_name).cyan()
        );
        open::that(self.config.docs_url)?;
        Ok(())
    }
}

pub fn git_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "git",
        display_name: "git",
        version_arg: "--version",
        min_version: Some("2.13.0"),
        install_command: None,
        docs_url: "https://git-scm.com/downloads",
    })
}

pub fn node_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "node",
        display_name: "Node.js",
        version_arg: "--version",
        min_version: Some("8.0.0"),
        install_command: None,
        docs_url: "https://nodejs.org",
    })
}

pub fn npm_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "npm",
        display_name: "npm",
        version_arg: "--version",
        min_version: Some("3.10.0"),
        install_command: None,
        docs_url: "https://docs.npmjs.com/downloading-and-installing-node-js-and-npm",
    })
}

pub fn cordova_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "cordova",
        display_name: "Cordova",
        version_arg: "--version",
        min_version: Some("8.0.0"),
        install_command: Some(CORDOVA_INSTALL),
        docs_url: "https://cordova.apache.org/docs/en/latest/guide/cli/",
    })
}

pub fn xcodebuild_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "xcodebuild",
        display_name: "Xcode",
        version_arg: "-version",
        min_version: Some("9.0"),
        install_command: None,
        docs_url: "https://developer.apple.com/xcode/",
    })
}

pub fn cocoapods_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "pod",
        display_name: "CocoaPods",
        version_arg: "--version",
        min_version: Some("1.2.0"),
        install_command: Some(COCOAPODS_INSTALL),
        docs_url: "https://guides.cocoapods.org/using/getting-started.html",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_spec_for_installable_tool() {
        let spec = cordova_tool().install_spec().unwrap();
        assert_eq!(spec.program, "npm");
        assert_eq!(spec.args, vec!["install", "-g", "cordova"]);
        assert_eq!(spec.timeout, Some(INSTALL_TIMEOUT));
        assert_eq!(
            cordova_tool().install_command().as_deref(),
            Some("npm install -g cordova")
        );
    }

    #[test]
    fn test_no_install_spec_for_manual_tool() {
        assert!(xcodebuild_tool().install_spec().is_none());
        assert!(git_tool().install_command().is_none());
    }

    #[test]
    fn test_missing_tool_is_not_installed() {
        let tool = ToolManager::new(ToolConfig {
            name: "definitely-not-a-real-tool-xyz",
            display_name: "Nothing",
            version_arg: "--version",
            min_version: None,
            install_command: None,
            docs_url: "https://example.com",
        });
        assert!(!tool.is_installed());
        assert!(tool.get_version().is_none());
    }
}
