//! test-force - Generate and compile apps of every type with forceios and forcedroid

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use forcecli_core::matrix::{MatrixArgs, MatrixRunner};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "test-force")]
#[command(about = "Generates and compiles apps with forceios and forcedroid")]
#[command(version)]
pub struct Args {
    /// Show detailed usage and exit
    #[arg(long)]
    pub usage: bool,

    /// Comma separated platforms (ios, android)
    #[arg(long)]
    pub os: Option<String>,

    /// Comma separated app types
    #[arg(long = "apptype")]
    pub app_type: Option<String>,

    /// Template repo to test instead of app types
    #[arg(long = "templaterepourl")]
    pub template_repo_url: Option<String>,

    /// Cordova plugin repo used by hybrid apps
    #[arg(long = "pluginrepourl")]
    pub plugin_repo_url: Option<String>,

    /// SDK branch the plugin repo is updated to
    #[arg(long = "sdkbranch")]
    pub sdk_branch: Option<String>,
}

fn print_usage() {
    println!("{}", "Usage:\n".cyan());
    println!("{}", "  test-force --usage".magenta());
    println!("{}", "\n OR \n".cyan());
    println!("{}", "  test-force".magenta());
    println!("{}", "    --os=os1,os2,etc".magenta());
    println!(
        "{}",
        "    --apptype=appType1,appType2,etc OR --templaterepourl=TEMPLATE_REPO_URL".magenta()
    );
    println!(
        "{}",
        "    [--pluginrepourl=PLUGIN_REPO_URL (Defaults to the SDK cordova plugin repo)]".magenta()
    );
    println!(
        "{}",
        "    [--sdkbranch=SDK_BRANCH (Defaults to unstable)]".magenta()
    );
    println!();
    println!("{}", "  Where:".cyan());
    println!("{}", "  - osX is : ios or android".cyan());
    println!(
        "{}",
        "  - appTypeX is: native, native_swift, react_native, hybrid_local or hybrid_remote".cyan()
    );
    println!(
        "{}",
        "  - templaterepourl is a template repo url e.g. https://github.com/forcedotcom/SmartSyncExplorerReactNative#unstable".cyan()
    );
    println!();
    println!("{}", "  If hybrid is targeted, the following are first done:".cyan());
    println!("{}", "  - clones PLUGIN_REPO_URL".cyan());
    println!(
        "{}",
        "  - runs ./tools/update.sh -b SDK_BRANCH to update clone of plugin repo".cyan()
    );
    println!();
    println!("{}", "  If ios is targeted:".cyan());
    println!(
        "{}",
        "  - installs forceios into a temporary directory".cyan()
    );
    println!(
        "{}",
        "  - creates and compiles the application types using specified template and plugin".cyan()
    );
    println!();
    println!("{}", "  If android is targeted:".cyan());
    println!(
        "{}",
        "  - installs forcedroid into a temporary directory".cyan()
    );
    println!(
        "{}",
        "  - creates and compiles the application types using specified template and plugin".cyan()
    );
}

/// Root of the workspace holding the CLI crates
fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.usage {
        print_usage();
        return Ok(());
    }

    let matrix = match MatrixArgs::from_raw(
        args.os.as_deref(),
        args.app_type.as_deref(),
        args.template_repo_url.as_deref(),
        args.plugin_repo_url.as_deref(),
        args.sdk_branch.as_deref(),
    ) {
        Ok(matrix) => matrix,
        Err(e) => {
            eprintln!("{}\n", e.to_string().red());
            print_usage();
            std::process::exit(1);
        }
    };

    // Kept on disk so generated apps can be inspected after the run
    let tmp_dir = tempfile::Builder::new()
        .prefix("test-force-")
        .tempdir()
        .context("Failed to create temporary directory")?
        .keep();
    println!("{}", format!("Working in {}", tmp_dir.display()).cyan());

    let mut runner = MatrixRunner::new(tmp_dir, workspace_root());
    if !runner.run(&matrix).await? {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "test-force",
            "--os=ios,android",
            "--apptype=native,hybrid_local",
            "--sdkbranch=dev",
        ]);
        assert_eq!(args.os.as_deref(), Some("ios,android"));
        assert_eq!(args.app_type.as_deref(), Some("native,hybrid_local"));
        assert_eq!(args.sdk_branch.as_deref(), Some("dev"));
        assert!(args.template_repo_url.is_none());
        assert!(!args.usage);
    }

    #[test]
    fn test_workspace_root_holds_cli_crates() {
        assert!(workspace_root().join("crates").join("forceios").is_dir());
        assert!(workspace_root().join("crates").join("forcedroid").is_dir());
    }
}
