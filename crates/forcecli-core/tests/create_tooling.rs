//! Hybrid and React Native generation against stand-in `cordova`, `npm` and `pod` scripts
#![cfg(unix)]

use forcecli_core::args::{self, NonInteractive};
use forcecli_core::config::{self, create_args_processor_list, AppConfig, CreateKind};
use forcecli_core::{create, AppType, Os, ProductConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// PATH is process wide, tests touching it run one at a time
static PATH_LOCK: Mutex<()> = Mutex::new(());

#[derive(Clone)]
struct TestProduct {
    os: Os,
    repo: PathBuf,
}

impl ProductConfig for TestProduct {
    fn name(&self) -> &'static str {
        "testforce"
    }

    fn display_name(&self) -> &'static str {
        "testforce"
    }

    fn os(&self) -> Os {
        self.os
    }

    fn app_types(&self) -> &'static [AppType] {
        &AppType::ALL
    }

    fn template_path(&self, app_type: AppType) -> &'static str {
        match app_type {
            AppType::ReactNative => "ReactNativeTemplate",
            AppType::HybridRemote => "HybridRemoteTemplate",
            _ => "Unused",
        }
    }

    fn template_repo_env(&self) -> &'static str {
        "TESTFORCE_TEMPLATE_REPO_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://example.com/docs"
    }

    fn cli_description(&self) -> &'static str {
        "test product"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install testforce --force"
    }

    fn next_steps(&self, _dir: &Path, _app_name: &str, _app_type: AppType) -> Vec<String> {
        Vec::new()
    }

    fn template_repo_url(&self) -> String {
        self.repo.to_string_lossy().into_owned()
    }
}

/// Put logging stand-ins for the platform tools first on PATH.
///
/// Every invocation appends `<tool> <args> @ <physical cwd>` to the returned log.
fn install_fake_tools(root: &Path) -> PathBuf {
    let bin = root.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let log = root.join("tools.log");

    let scripts = [
        (
            "cordova",
            // `cordova create` leaves a sample app the template must replace
            "if [ \"$1\" = create ]; then mkdir -p \"$2/www\" && echo sample > \"$2/www/index.html\"; fi\n",
        ),
        ("npm", ""),
        ("pod", ""),
    ];
    for (name, extra) in scripts {
        let script = bin.join(name);
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"{} $* @ $(pwd -P)\" >> \"{}\"\n{}",
                name,
                log.display(),
                extra
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    }

    let path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{}", bin.display(), path));
    log
}

fn read_log(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn app_config(app_types: &[AppType], provided: &[(&str, &str)]) -> AppConfig {
    let provided = provided
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let processors = create_args_processor_list(app_types, CreateKind::Create);
    let collected = args::collect(provided, &processors, &mut NonInteractive::new()).unwrap();
    AppConfig::from_args_map(CreateKind::Create, &collected).unwrap()
}

fn canonical(path: &Path) -> String {
    fs::canonicalize(path).unwrap().display().to_string()
}

#[tokio::test]
async fn test_hybrid_remote_runs_cordova_around_template() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let tools = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    let log = install_fake_tools(tools.path());

    let template = repo.path().join("HybridRemoteTemplate");
    fs::create_dir_all(template.join("www")).unwrap();
    fs::write(
        template.join("template.yaml"),
        "app_type: hybrid_remote\nreplacements:\n  app_name: HybridRemoteTemplate\n  start_page: __START_PAGE__\n",
    )
    .unwrap();
    fs::write(
        template.join("www/bootconfig.json"),
        "{ \"appName\": \"HybridRemoteTemplate\", \"startPage\": \"__START_PAGE__\" }",
    )
    .unwrap();

    let product = TestProduct {
        os: Os::Android,
        repo: repo.path().to_path_buf(),
    };
    let config = app_config(
        &AppType::ALL,
        &[
            (config::APP_TYPE, "hybrid_remote"),
            (config::APP_NAME, "HybridApp"),
            (config::PACKAGE_NAME, "com.acme.hybrid"),
            (config::ORGANIZATION, "Acme"),
            (config::START_PAGE, "/apex/testPage"),
            (config::PLUGIN_REPO_URL, "/work/plugin"),
        ],
    );

    let prepared = create::prepare_template(&product, &config).await.unwrap();
    let created = create::generate(&product, &config, &prepared, cwd.path())
        .await
        .unwrap();

    let project = cwd.path().join("HybridApp");
    assert_eq!(created.project_dir, project);
    let project_real = canonical(&project);
    assert_eq!(
        read_log(&log),
        vec![
            format!(
                "cordova create {} com.acme.hybrid HybridApp @ {}",
                project.display(),
                canonical(cwd.path())
            ),
            format!("cordova platform add android @ {}", project_real),
            format!("cordova plugin add /work/plugin --force @ {}", project_real),
            format!("cordova prepare @ {}", project_real),
        ]
    );

    // The sample app is gone, the template's web assets took its place
    assert!(!project.join("www/index.html").exists());
    assert_eq!(
        fs::read_to_string(project.join("www/bootconfig.json")).unwrap(),
        "{ \"appName\": \"HybridApp\", \"startPage\": \"/apex/testPage\" }"
    );
}

#[tokio::test]
async fn test_react_native_ios_installs_dependencies() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let tools = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    let log = install_fake_tools(tools.path());

    let template = repo.path().join("ReactNativeTemplate");
    fs::create_dir_all(template.join("ios")).unwrap();
    fs::write(
        template.join("template.yaml"),
        "app_type: react_native\nreplacements:\n  app_name: ReactNativeTemplate\n",
    )
    .unwrap();
    fs::write(
        template.join("package.json"),
        "{ \"name\": \"ReactNativeTemplate\" }",
    )
    .unwrap();
    fs::write(
        template.join("ios/Podfile"),
        "target 'ReactNativeTemplate' do\nend\n",
    )
    .unwrap();

    let product = TestProduct {
        os: Os::Ios,
        repo: repo.path().to_path_buf(),
    };
    let config = app_config(
        &AppType::ALL,
        &[
            (config::APP_TYPE, "react_native"),
            (config::APP_NAME, "RnApp"),
            (config::PACKAGE_NAME, "com.acme.rn"),
            (config::ORGANIZATION, "Acme"),
        ],
    );

    let prepared = create::prepare_template(&product, &config).await.unwrap();
    let created = create::generate(&product, &config, &prepared, cwd.path())
        .await
        .unwrap();

    let project = created.project_dir;
    assert_eq!(
        read_log(&log),
        vec![
            format!("npm install @ {}", canonical(&project)),
            format!("pod install @ {}", canonical(&project.join("ios"))),
        ]
    );
    assert_eq!(
        fs::read_to_string(project.join("package.json")).unwrap(),
        "{ \"name\": \"RnApp\" }"
    );
    assert_eq!(
        fs::read_to_string(project.join("ios/Podfile")).unwrap(),
        "target 'RnApp' do\nend\n"
    );
}
