//! Product configuration trait for CLI binaries
//!
//! Each product (forceios, forcedroid) implements this trait to configure
//! the scaffolding behavior for its platform.

use crate::app::{AppType, Os};
use std::path::Path;

/// Default repo holding the app templates (branch after `#`)
pub const DEFAULT_TEMPLATE_REPO_URL: &str =
    "https://github.com/forcedotcom/SalesforceMobileSDK-Templates#unstable";

/// Default cordova plugin repo used by hybrid apps
pub const DEFAULT_PLUGIN_REPO_URL: &str =
    "https://github.com/forcedotcom/SalesforceMobileSDK-CordovaPlugin#unstable";

/// Environment variable overriding the plugin repo for every product
pub const PLUGIN_REPO_ENV: &str = "FORCE_PLUGIN_REPO_URL";

/// Configuration trait for different CLI products
///
/// Each product defines:
/// - Product identity (name, display name, target platform)
/// - The app types it can generate and where their templates live
/// - Documentation links and post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Platform every generated app targets
    fn os(&self) -> Os;

    /// App types accepted by `create`, in prompt order
    fn app_types(&self) -> &'static [AppType];

    /// Directory inside the template repo holding the template for an app type
    fn template_path(&self, app_type: AppType) -> &'static str;

    /// Environment variable name for overriding the template repo URL
    fn template_repo_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Generate the "next steps" instructions after app creation
    fn next_steps(&self, dir: &Path, app_name: &str, app_type: AppType) -> Vec<String>;

    /// Template repo, honoring the environment override
    fn template_repo_url(&self) -> String {
        std::env::var(self.template_repo_env())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_REPO_URL.to_string())
    }

    /// Cordova plugin repo, honoring the environment override
    fn plugin_repo_url(&self) -> String {
        std::env::var(PLUGIN_REPO_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PLUGIN_REPO_URL.to_string())
    }

    fn supports(&self, app_type: AppType) -> bool {
        self.app_types().contains(&app_type)
    }
}
