//! Executes a test matrix and keeps score

use super::{plan_target, MatrixArgs, Target};
use crate::app::{AppType, Os};
use crate::runtime::process::{self, CommandSpec};
use crate::templates::{self, TemplateSource};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Step of a target that passed or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Template,
    Generation,
    Compilation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Template => "template",
            Stage::Generation => "generation",
            Stage::Compilation => "compilation",
        })
    }
}

/// Outcome of one stage of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResult {
    pub target: String,
    pub stage: Stage,
    pub passed: bool,
}

/// Runs every target of a matrix inside one temporary directory
pub struct MatrixRunner {
    tmp_dir: PathBuf,
    /// Workspace holding the CLI crates that get installed for the run
    workspace_root: PathBuf,
    results: Vec<TargetResult>,
}

impl MatrixRunner {
    pub fn new(tmp_dir: PathBuf, workspace_root: PathBuf) -> Self {
        Self {
            tmp_dir,
            workspace_root,
            results: Vec::new(),
        }
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    pub fn results(&self) -> &[TargetResult] {
        &self.results
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// `cargo install` of the platform CLI into `<tmp>/bin`
    pub fn install_command(&self, os: Os) -> CommandSpec {
        let crate_dir = self.workspace_root.join("crates").join(os.cli_name());
        CommandSpec::new("cargo")
            .arg("install")
            .arg("--path")
            .arg(crate_dir.to_string_lossy())
            .arg("--root")
            .arg(self.tmp_dir.to_string_lossy())
            .arg("--force")
    }

    /// `tools/update.sh` of the cordova plugin repo
    pub fn plugin_update_command(plugin_dir: &Path, os: Os, sdk_branch: &str) -> CommandSpec {
        CommandSpec::new(plugin_dir.join("tools").join("update.sh").to_string_lossy())
            .args(["-b", sdk_branch, "-o", os.as_str()])
            .current_dir(plugin_dir)
    }

    /// Run the whole matrix. Setup failures are errors; target failures are recorded.
    pub async fn run(&mut self, args: &MatrixArgs) -> Result<bool> {
        for os in &args.operating_systems {
            process::run_throw_error(&self.install_command(*os))
                .await
                .with_context(|| format!("Failed to install {}", os.cli_name()))?;
        }

        let plugin = if args.tests_hybrid() {
            self.prepare_plugin(args).await?
        } else {
            args.plugin_repo_url.clone()
        };

        for os in &args.operating_systems {
            for app_type in &args.app_types {
                if let Some(target) =
                    plan_target(&self.tmp_dir, *os, *app_type, None, &plugin, cfg!(windows))
                {
                    self.run_target(&target).await;
                }
            }
            if let Some(url) = &args.template_repo_url {
                self.run_template(*os, url, &plugin).await;
            }
        }

        self.print_summary();
        Ok(self.all_passed())
    }

    /// Clone the plugin repo and bring it to the SDK branch for every platform.
    /// Local repos are cloned too, the update never touches the user's checkout.
    async fn prepare_plugin(&self, args: &MatrixArgs) -> Result<String> {
        let source = TemplateSource::parse(&args.plugin_repo_url)?;
        let plugin_dir = source.clone_into(&self.tmp_dir).await?;
        for os in &args.operating_systems {
            println!(
                "{}",
                format!("Updating cordova plugin at {}", args.sdk_branch).cyan()
            );
            process::run_throw_error(&Self::plugin_update_command(
                &plugin_dir,
                *os,
                &args.sdk_branch,
            ))
            .await?;
        }
        Ok(plugin_dir.to_string_lossy().into_owned())
    }

    async fn run_template(&mut self, os: Os, url: &str, plugin: &str) {
        let description = format!(
            "template {} for {}",
            templates::template_name_from_url(url),
            os
        );
        let app_type = match self.template_app_type(url).await {
            Ok(app_type) => app_type,
            Err(e) => {
                eprintln!("{} {:#}", "Could not read template:".red(), e);
                self.record(description, Stage::Template, false);
                return;
            }
        };

        match plan_target(&self.tmp_dir, os, app_type, Some(url), plugin, cfg!(windows)) {
            Some(target) => self.run_target(&target).await,
            None => println!(
                "{}",
                format!("Skipping {}: {} apps do not exist for {}", description, app_type, os)
                    .yellow()
            ),
        }
    }

    async fn template_app_type(&self, url: &str) -> Result<AppType> {
        let work_dir = tempfile::Builder::new()
            .prefix("template-")
            .tempdir_in(&self.tmp_dir)
            .context("Failed to create template work directory")?;
        templates::app_type_of_template(url, None, work_dir.path()).await
    }

    async fn run_target(&mut self, target: &Target) {
        let description = target.description();

        let generated = process::run_catch_error(
            &target.generate,
            &format!("GENERATING {}", description),
        )
        .await;
        self.record(description.clone(), Stage::Generation, generated);
        if !generated {
            return;
        }

        let compiled =
            process::run_catch_error(&target.compile, &format!("COMPILING {}", description)).await;
        self.record(description, Stage::Compilation, compiled);
    }

    fn record(&mut self, target: String, stage: Stage, passed: bool) {
        self.results.push(TargetResult {
            target,
            stage,
            passed,
        });
    }

    fn print_summary(&self) {
        println!();
        println!("{}", "Summary".cyan().bold());
        for result in &self.results {
            let status = if result.passed {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            println!("  {} {} ({})", status, result.target, result.stage);
        }
        let failed = self.results.iter().filter(|r| !r.passed).count();
        println!();
        if failed == 0 {
            println!("{}", format!("All {} steps passed", self.results.len()).green());
        } else {
            println!(
                "{}",
                format!("{} of {} steps failed", failed, self.results.len()).red()
            );
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_install_command() {
        let runner = MatrixRunner::new(PathBuf::from("/tmp/run"), PathBuf::from("/src/forcecli"));
        let spec = runner.install_command(Os::Android);
        assert_eq!(spec.program, "cargo");
        assert_eq!(
            spec.args,
            vec![
                "install",
                "--path",
                "/src/forcecli/crates/forcedroid",
                "--root",
                "/tmp/run",
                "--force"
            ]
        );
    }

    #[test]
    fn test_plugin_update_command() {
        let spec = MatrixRunner::plugin_update_command(Path::new("/tmp/run/Plugin"), Os::Ios, "dev");
        assert_eq!(spec.program, "/tmp/run/Plugin/tools/update.sh");
        assert_eq!(spec.args, vec!["-b", "dev", "-o", "ios"]);
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/tmp/run/Plugin")));
    }

    #[tokio::test]
    async fn test_failed_generation_skips_compilation() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runner = MatrixRunner::new(tmp.path().to_path_buf(), PathBuf::from("/unused"));
        let target = Target {
            os: Os::Android,
            app_type: AppType::Native,
            template_repo_url: None,
            app_name: "nativeandroidApp".to_string(),
            output_dir: tmp.path().join("nativeandroidApp"),
            generate: CommandSpec::new("sh").args(["-c", "exit 1"]),
            compile: CommandSpec::new("sh").args(["-c", "exit 0"]),
        };

        runner.run_target(&target).await;

        assert_eq!(
            runner.results(),
            &[TargetResult {
                target: "native app for android".to_string(),
                stage: Stage::Generation,
                passed: false,
            }]
        );
        assert!(!runner.all_passed());
    }

    #[tokio::test]
    async fn test_successful_target_records_both_stages() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runner = MatrixRunner::new(tmp.path().to_path_buf(), PathBuf::from("/unused"));
        let target = Target {
            os: Os::Ios,
            app_type: AppType::HybridLocal,
            template_repo_url: None,
            app_name: "hybrid_localiosApp".to_string(),
            output_dir: tmp.path().join("hybrid_localiosApp"),
            generate: CommandSpec::new("sh").args(["-c", "exit 0"]),
            compile: CommandSpec::new("sh").args(["-c", "exit 0"]),
        };

        runner.run_target(&target).await;

        let stages: Vec<Stage> = runner.results().iter().map(|r| r.stage).collect();
        assert_eq!(stages, vec![Stage::Generation, Stage::Compilation]);
        assert!(runner.all_passed());
    }

    #[tokio::test]
    async fn test_local_plugin_is_never_updated_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let plugin = tempfile::tempdir().unwrap();
        let tools = plugin.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        // Not a git repo, so cloning it fails before any update runs
        std::fs::write(tools.join("update.sh"), "#!/bin/sh\ntouch updated\n").unwrap();

        let runner = MatrixRunner::new(tmp.path().to_path_buf(), PathBuf::from("/unused"));
        let args = MatrixArgs {
            operating_systems: vec![Os::Android],
            app_types: vec![AppType::HybridLocal],
            template_repo_url: None,
            plugin_repo_url: plugin.path().to_string_lossy().into_owned(),
            sdk_branch: "dev".to_string(),
        };

        assert!(runner.prepare_plugin(&args).await.is_err());
        assert!(!plugin.path().join("updated").exists());
        assert!(!tools.join("updated").exists());
    }

    #[tokio::test]
    async fn test_unreadable_template_is_recorded() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tempfile::tempdir().unwrap();
        let mut runner = MatrixRunner::new(tmp.path().to_path_buf(), PathBuf::from("/unused"));

        // Local template directory without a template.yaml
        runner
            .run_template(Os::Android, template.path().to_str().unwrap(), "plugin")
            .await;

        assert_eq!(runner.results().len(), 1);
        assert_eq!(runner.results()[0].stage, Stage::Template);
        assert!(!runner.results()[0].passed);
    }
}
