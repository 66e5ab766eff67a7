//! Test matrix: generate and compile apps for every requested platform and app type
//!
//! [`MatrixArgs`] validates the requested combination, [`plan_target`] turns
//! one (os, app type) pair into the generation and compilation commands, and
//! [`runner::MatrixRunner`] executes them.

pub mod runner;

use crate::app::{AppType, Os, ParseAppError};
use crate::product::{DEFAULT_PLUGIN_REPO_URL, PLUGIN_REPO_ENV};
use crate::runtime::process::CommandSpec;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use runner::{MatrixRunner, Stage, TargetResult};

/// Branch of the SDK the plugin repo is updated to by default
pub const DEFAULT_SDK_BRANCH: &str = "unstable";

/// Values used for every generated app
pub const TEST_PACKAGE_NAME: &str = "com.mycompany";
pub const TEST_ORGANIZATION: &str = "MyCompany";
pub const TEST_START_PAGE: &str = "/apex/testPage";

/// Invalid test matrix requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("You need to specify at least one os")]
    NoOs,
    #[error("Invalid os: {0}")]
    InvalidOs(String),
    #[error("You need to specify apptype or templaterepourl (but not both)")]
    AppTypeXorTemplate,
    #[error("Invalid appType: {0}")]
    InvalidAppType(String),
}

impl From<ParseAppError> for MatrixError {
    fn from(e: ParseAppError) -> Self {
        match e {
            ParseAppError::Os(s) => MatrixError::InvalidOs(s),
            ParseAppError::AppType(s) => MatrixError::InvalidAppType(s),
        }
    }
}

/// Like split, but a missing or empty string gives no items
pub fn clean_split(value: Option<&str>, delimiter: char) -> Vec<String> {
    match value {
        None | Some("") => Vec::new(),
        Some(s) => s.split(delimiter).map(str::to_string).collect(),
    }
}

/// Validated test matrix request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixArgs {
    pub operating_systems: Vec<Os>,
    pub app_types: Vec<AppType>,
    pub template_repo_url: Option<String>,
    pub plugin_repo_url: String,
    pub sdk_branch: String,
}

impl MatrixArgs {
    /// Validate raw flag values (comma separated lists for `os` and `apptype`)
    pub fn from_raw(
        os: Option<&str>,
        app_types: Option<&str>,
        template_repo_url: Option<&str>,
        plugin_repo_url: Option<&str>,
        sdk_branch: Option<&str>,
    ) -> Result<Self, MatrixError> {
        let operating_systems = parse_operating_systems(&clean_split(os, ','), cfg!(windows))?;

        let app_type_names = clean_split(app_types, ',');
        let template_repo_url = template_repo_url.filter(|u| !u.is_empty());
        if app_type_names.is_empty() == template_repo_url.is_none() {
            return Err(MatrixError::AppTypeXorTemplate);
        }
        let app_types = app_type_names
            .iter()
            .map(|name| name.parse::<AppType>())
            .collect::<Result<Vec<_>, _>>()?;

        let plugin_repo_url = plugin_repo_url
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| std::env::var(PLUGIN_REPO_ENV).ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| DEFAULT_PLUGIN_REPO_URL.to_string());

        Ok(Self {
            operating_systems,
            app_types,
            template_repo_url: template_repo_url.map(str::to_string),
            plugin_repo_url,
            sdk_branch: sdk_branch
                .filter(|b| !b.is_empty())
                .unwrap_or(DEFAULT_SDK_BRANCH)
                .to_string(),
        })
    }

    /// Whether any hybrid app is requested (the cordova plugin repo is then needed)
    pub fn tests_hybrid(&self) -> bool {
        self.app_types.iter().any(AppType::is_hybrid)
    }
}

fn parse_operating_systems(names: &[String], on_windows: bool) -> Result<Vec<Os>, MatrixError> {
    if names.is_empty() {
        return Err(MatrixError::NoOs);
    }
    names
        .iter()
        .map(|name| match name.parse::<Os>() {
            Ok(Os::Ios) if on_windows => Err(MatrixError::InvalidOs(name.clone())),
            Ok(os) => Ok(os),
            Err(e) => Err(e.into()),
        })
        .collect()
}

/// Everything needed to generate and compile one app of the matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub os: Os,
    pub app_type: AppType,
    pub template_repo_url: Option<String>,
    pub app_name: String,
    pub output_dir: PathBuf,
    /// Invocation of the scaffolding CLI
    pub generate: CommandSpec,
    pub compile: CommandSpec,
}

impl Target {
    /// Human readable description, e.g. `native app for ios based on template X`
    pub fn description(&self) -> String {
        match &self.template_repo_url {
            Some(url) => format!(
                "{} app for {} based on template {}",
                self.app_type,
                self.os,
                crate::templates::template_name_from_url(url)
            ),
            None => format!("{} app for {}", self.app_type, self.os),
        }
    }
}

/// Directory the CLIs get installed into (`<tmp>/bin`)
pub fn cli_path(tmp_dir: &Path, os: Os) -> PathBuf {
    let exe = if cfg!(windows) {
        format!("{}.exe", os.cli_name())
    } else {
        os.cli_name().to_string()
    };
    tmp_dir.join("bin").join(exe)
}

/// Plan one target; `None` for combinations that do not exist (swift apps on android).
///
/// `template_repo_url` switches generation to `createWithTemplate`; the app
/// type must then be the one the template declares.
pub fn plan_target(
    tmp_dir: &Path,
    os: Os,
    app_type: AppType,
    template_repo_url: Option<&str>,
    plugin: &str,
    on_windows: bool,
) -> Option<Target> {
    if !app_type.supported_on(os) {
        return None;
    }

    let app_name = format!("{}{}App", app_type, os);
    let output_dir = tmp_dir.join(&app_name);

    let mut generate = CommandSpec::new(cli_path(tmp_dir, os).to_string_lossy());
    generate = match template_repo_url {
        Some(url) => generate
            .arg("createWithTemplate")
            .arg(format!("--templaterepourl={}", url)),
        None => generate
            .arg("create")
            .arg(format!("--apptype={}", app_type)),
    };
    generate = generate
        .arg(format!("--appname={}", app_name))
        .arg(format!("--packagename={}", TEST_PACKAGE_NAME))
        .arg(format!("--organization={}", TEST_ORGANIZATION))
        .arg(format!("--outputdir={}", output_dir.display()));
    if app_type == AppType::HybridRemote {
        generate = generate.arg(format!("--startpage={}", TEST_START_PAGE));
    }
    if !app_type.is_native() {
        generate = generate.arg(format!("--pluginrepourl={}", plugin));
    }

    let compile = compile_command(os, app_type, &app_name, &output_dir, on_windows);

    Some(Target {
        os,
        app_type,
        template_repo_url: template_repo_url.map(str::to_string),
        app_name,
        output_dir,
        generate,
        compile,
    })
}

/// Platform build of a generated app
pub fn compile_command(
    os: Os,
    app_type: AppType,
    app_name: &str,
    output_dir: &Path,
    on_windows: bool,
) -> CommandSpec {
    let app_dir = if app_type == AppType::ReactNative {
        output_dir.join(os.as_str())
    } else {
        output_dir.to_path_buf()
    };
    let gradle = |dir: PathBuf| {
        let wrapper = dir.join(if on_windows { "gradlew.bat" } else { "gradlew" });
        CommandSpec::new(wrapper.to_string_lossy())
            .arg("assembleDebug")
            .current_dir(dir)
    };

    match (os, app_type.is_native()) {
        (Os::Ios, true) => {
            let workspace = app_dir.join(format!("{}.xcworkspace", app_name));
            CommandSpec::new("xcodebuild")
                .arg("-workspace")
                .arg(workspace.to_string_lossy())
                .args(["-scheme", app_name])
                .args([
                    "clean",
                    "build",
                    "CODE_SIGN_IDENTITY=",
                    "CODE_SIGNING_REQUIRED=NO",
                ])
        }
        (Os::Android, true) => gradle(app_dir),
        (Os::Ios, false) => CommandSpec::new("cordova").arg("build").current_dir(app_dir),
        (Os::Android, false) => gradle(app_dir.join("platforms").join("android")),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn raw(
        os: Option<&str>,
        app_types: Option<&str>,
        template: Option<&str>,
    ) -> Result<MatrixArgs, MatrixError> {
        MatrixArgs::from_raw(os, app_types, template, Some("https://example.com/plugin"), None)
    }

    #[test]
    fn test_clean_split() {
        assert!(clean_split(None, ',').is_empty());
        assert!(clean_split(Some(""), ',').is_empty());
        assert_eq!(clean_split(Some("ios,android"), ','), vec!["ios", "android"]);
        assert_eq!(clean_split(Some("ios"), ','), vec!["ios"]);
    }

    #[test]
    fn test_requires_os() {
        assert_eq!(raw(None, Some("native"), None), Err(MatrixError::NoOs));
        assert_eq!(raw(Some(""), Some("native"), None), Err(MatrixError::NoOs));
    }

    #[test]
    fn test_rejects_unknown_os() {
        assert_eq!(
            raw(Some("ios,windows"), Some("native"), None),
            Err(MatrixError::InvalidOs("windows".to_string()))
        );
    }

    #[test]
    fn test_ios_rejected_on_windows_hosts() {
        assert_eq!(
            parse_operating_systems(&["android".to_string(), "ios".to_string()], true),
            Err(MatrixError::InvalidOs("ios".to_string()))
        );
        assert_eq!(
            parse_operating_systems(&["ios".to_string()], false),
            Ok(vec![Os::Ios])
        );
    }

    #[test]
    fn test_app_type_xor_template() {
        assert_eq!(
            raw(Some("android"), None, None),
            Err(MatrixError::AppTypeXorTemplate)
        );
        assert_eq!(
            raw(Some("android"), Some("native"), Some("https://github.com/org/Template")),
            Err(MatrixError::AppTypeXorTemplate)
        );
        assert!(raw(Some("android"), None, Some("https://github.com/org/Template")).is_ok());
    }

    #[test]
    fn test_rejects_unknown_app_type() {
        assert_eq!(
            raw(Some("android"), Some("native,flutter"), None),
            Err(MatrixError::InvalidAppType("flutter".to_string()))
        );
    }

    #[test]
    fn test_defaults() {
        let args = raw(Some("android"), Some("native,hybrid_local"), None).unwrap();
        assert_eq!(args.sdk_branch, DEFAULT_SDK_BRANCH);
        assert_eq!(args.plugin_repo_url, "https://example.com/plugin");
        assert_eq!(args.app_types, vec![AppType::Native, AppType::HybridLocal]);
        assert!(args.tests_hybrid());
    }

    #[test]
    fn test_swift_skipped_on_android() {
        let tmp = Path::new("/tmp/test-force");
        assert!(plan_target(tmp, Os::Android, AppType::NativeSwift, None, "p", false).is_none());
        assert!(plan_target(tmp, Os::Ios, AppType::NativeSwift, None, "p", false).is_some());
    }

    #[test]
    fn test_plan_native_ios() {
        let tmp = Path::new("/tmp/test-force");
        let target = plan_target(tmp, Os::Ios, AppType::Native, None, "plugin", false).unwrap();

        assert_eq!(target.app_name, "nativeiosApp");
        assert_eq!(target.output_dir, tmp.join("nativeiosApp"));
        assert_eq!(target.generate.program, "/tmp/test-force/bin/forceios");
        assert_eq!(
            target.generate.args,
            vec![
                "create",
                "--apptype=native",
                "--appname=nativeiosApp",
                "--packagename=com.mycompany",
                "--organization=MyCompany",
                "--outputdir=/tmp/test-force/nativeiosApp",
            ]
        );
        assert_eq!(target.compile.program, "xcodebuild");
        assert_eq!(
            target.compile.args,
            vec![
                "-workspace",
                "/tmp/test-force/nativeiosApp/nativeiosApp.xcworkspace",
                "-scheme",
                "nativeiosApp",
                "clean",
                "build",
                "CODE_SIGN_IDENTITY=",
                "CODE_SIGNING_REQUIRED=NO",
            ]
        );
        assert_eq!(target.description(), "native app for ios");
    }

    #[test]
    fn test_plan_hybrid_remote_android() {
        let tmp = Path::new("/tmp/test-force");
        let target =
            plan_target(tmp, Os::Android, AppType::HybridRemote, None, "/tmp/test-force/plugin", false)
                .unwrap();

        assert!(target
            .generate
            .args
            .contains(&"--startpage=/apex/testPage".to_string()));
        assert!(target
            .generate
            .args
            .contains(&"--pluginrepourl=/tmp/test-force/plugin".to_string()));
        assert_eq!(
            target.compile.program,
            "/tmp/test-force/hybrid_remoteandroidApp/platforms/android/gradlew"
        );
        assert_eq!(
            target.compile.cwd,
            Some(tmp.join("hybrid_remoteandroidApp/platforms/android"))
        );
    }

    #[test]
    fn test_plan_react_native_dirs() {
        let tmp = Path::new("/tmp/test-force");
        let android =
            plan_target(tmp, Os::Android, AppType::ReactNative, None, "p", true).unwrap();
        assert_eq!(
            android.compile.program,
            "/tmp/test-force/react_nativeandroidApp/android/gradlew.bat"
        );
        assert_eq!(
            android.compile.cwd,
            Some(tmp.join("react_nativeandroidApp").join("android"))
        );
        assert!(!android.generate.args.iter().any(|a| a.starts_with("--pluginrepourl")));

        let ios = plan_target(tmp, Os::Ios, AppType::ReactNative, None, "p", false).unwrap();
        assert_eq!(
            ios.compile.args[1],
            "/tmp/test-force/react_nativeiosApp/ios/react_nativeiosApp.xcworkspace"
        );
    }

    #[test]
    fn test_plan_with_template() {
        let tmp = Path::new("/tmp/test-force");
        let url = "https://github.com/forcedotcom/SmartSyncExplorerReactNative#unstable";
        let target =
            plan_target(tmp, Os::Ios, AppType::ReactNative, Some(url), "p", false).unwrap();

        assert_eq!(target.generate.args[0], "createWithTemplate");
        assert_eq!(target.generate.args[1], format!("--templaterepourl={}", url));
        assert_eq!(
            target.description(),
            "react_native app for ios based on template SmartSyncExplorerReactNative"
        );
    }

    #[test]
    fn test_plan_hybrid_ios_uses_cordova() {
        let tmp = Path::new("/tmp/test-force");
        let target = plan_target(tmp, Os::Ios, AppType::HybridLocal, None, "p", false).unwrap();
        assert_eq!(target.compile.program, "cordova");
        assert_eq!(target.compile.args, vec!["build"]);
        assert_eq!(target.compile.cwd, Some(tmp.join("hybrid_localiosApp")));
    }
}
