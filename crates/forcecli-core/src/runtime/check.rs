//! Toolchain detection for the app types each platform can generate

use super::tool::{self, ToolManager};
use super::version;
use crate::app::{AppType, Os};
use anyhow::Result;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
    /// Installed but older than the supported minimum
    pub outdated: bool,
}

/// Tools needed to generate (and build) an app of this type for this platform
pub fn requirements_for(os: Os, app_type: AppType) -> Vec<ToolManager> {
    let mut tools = vec![tool::git_tool()];

    match app_type {
        AppType::Native | AppType::NativeSwift => {}
        AppType::ReactNative => {
            tools.push(tool::node_tool());
            tools.push(tool::npm_tool());
        }
        AppType::HybridLocal | AppType::HybridRemote => {
            tools.push(tool::npm_tool());
            tools.push(tool::cordova_tool());
        }
    }

    if os == Os::Ios {
        tools.push(tool::xcodebuild_tool());
        if !app_type.is_hybrid() {
            tools.push(tool::cocoapods_tool());
        }
    }

    tools
}

/// Detect a single tool and compare it against its minimum version
pub fn check_tool(tool: &ToolManager) -> ToolStatus {
    let config = tool.config();
    if !tool.is_installed() {
        return ToolStatus {
            name: config.display_name,
            version: None,
            available: false,
            outdated: false,
        };
    }

    let installed = tool.get_version();
    let outdated = match (&installed, config.min_version) {
        (Some(installed), Some(minimum)) => !version::meets_minimum(installed, minimum),
        _ => false,
    };

    ToolStatus {
        name: config.display_name,
        version: installed,
        available: true,
        outdated,
    }
}

/// A required tool together with what was detected
#[derive(Debug, Clone)]
pub struct ToolCheck {
    pub tool: ToolManager,
    pub status: ToolStatus,
}

impl ToolCheck {
    /// Human readable description of what is wrong, `None` when the tool is usable
    pub fn problem(&self) -> Option<String> {
        let config = self.tool.config();
        if !self.status.available {
            return Some(format!(
                "{} is not installed (install from {})",
                config.display_name, config.docs_url
            ));
        }
        if self.status.outdated {
            return Some(format!(
                "{} {} is older than the supported {} ({})",
                config.display_name,
                self.status.version.as_deref().unwrap_or("unknown"),
                config.min_version.unwrap_or("minimum"),
                config.docs_url
            ));
        }
        None
    }
}

/// Detect every tool the app needs
pub fn check_requirements(os: Os, app_type: AppType) -> Vec<ToolCheck> {
    requirements_for(os, app_type)
        .into_iter()
        .map(|tool| {
            let status = check_tool(&tool);
            ToolCheck { tool, status }
        })
        .collect()
}

/// Fail listing every missing tool. Outdated tools only deserve a warning.
pub fn ensure_installed(checks: &[ToolCheck]) -> Result<()> {
    let missing: Vec<String> = checks
        .iter()
        .filter(|check| !check.status.available)
        .filter_map(ToolCheck::problem)
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(())
}
