//! Version comparison for tools, CLI and template compatibility

use anyhow::Result;
use semver::Version;

/// Compare CLI version against the minimum version a template declares
/// Returns a warning message if the CLI is older than the template expects
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli_ver = parse_version(cli_version).ok()?;
    let template_ver = parse_version(template_version).ok()?;

    if cli_ver < template_ver {
        Some(format!(
            "Warning: This template was designed for CLI version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            template_version, cli_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse version string, handling the formats tools print
///
/// Accepts a leading `v`, a product prefix (`Xcode 15.2`, `git version 2.39.1`),
/// missing minor/patch components and trailing build metadata in parentheses.
pub fn parse_version(version_str: &str) -> Result<Version> {
    let token = version_str
        .split_whitespace()
        .find(|word| {
            let word = word.strip_prefix('v').unwrap_or(word);
            word.starts_with(|c: char| c.is_ascii_digit())
        })
        .ok_or_else(|| anyhow::anyhow!("Invalid version '{}': no version number", version_str))?;
    let cleaned = token.strip_prefix('v').unwrap_or(token);

    if let Ok(version) = Version::parse(cleaned) {
        return Ok(version);
    }

    let numeric: String = cleaned
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut parts: Vec<&str> = numeric.split('.').filter(|p| !p.is_empty()).take(3).collect();
    while parts.len() < 3 {
        parts.push("0");
    }
    Version::parse(&parts.join("."))
        .map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Whether `installed` is at least `minimum`; unparseable versions are accepted
pub fn meets_minimum(installed: &str, minimum: &str) -> bool {
    match (parse_version(installed), parse_version(minimum)) {
        (Ok(installed), Ok(minimum)) => installed >= minimum,
        _ => true,
    }
}
