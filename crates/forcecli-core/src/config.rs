//! Parameters of the `create` and `createWithTemplate` commands

use crate::app::{join_app_types, AppType};
use crate::args::{ArgProcessor, ArgProcessorList, ArgsMap, Validation};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const TEMPLATE_REPO_URL: &str = "templaterepourl";
pub const APP_TYPE: &str = "apptype";
pub const APP_NAME: &str = "appname";
pub const PACKAGE_NAME: &str = "packagename";
pub const ORGANIZATION: &str = "organization";
pub const START_PAGE: &str = "startpage";
pub const OUTPUT_DIR: &str = "outputdir";
pub const TEMPLATE_PATH: &str = "templatepath";
pub const PLUGIN_REPO_URL: &str = "pluginrepourl";

/// Which of the two create commands is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    /// Pick one of the product's app types, template comes from the default repo
    Create,
    /// Use the template found at a user-supplied repo URL
    CreateWithTemplate,
}

/// Build the processor list for a create command
pub fn create_args_processor_list(app_types: &[AppType], kind: CreateKind) -> ArgProcessorList {
    let mut list = ArgProcessorList::new();
    let type_names = join_app_types(app_types);

    match kind {
        CreateKind::CreateWithTemplate => {
            list.add(ArgProcessor::new(
                TEMPLATE_REPO_URL,
                Some("Enter URL of repo containing template application:"),
                "Invalid value for template repo url: '$val'.",
                Validation::pattern(r"^\S+$"),
            ));
        }
        CreateKind::Create => {
            let allowed = app_types.to_vec();
            list.add(ArgProcessor::new(
                APP_TYPE,
                Some(format!("Enter your application type ({type_names}):").as_str()),
                format!("App type must be {type_names}."),
                Validation::predicate(move |v| {
                    v.parse::<AppType>().is_ok_and(|t| allowed.contains(&t))
                }),
            ));
        }
    }

    list.add(ArgProcessor::new(
        APP_NAME,
        Some("Enter your application name:"),
        "Invalid value for application name: '$val'.",
        Validation::pattern(r"^\S+$"),
    ))
    .add(ArgProcessor::new(
        PACKAGE_NAME,
        Some("Enter the package name for your app (com.mycompany.myapp):"),
        "'$val' is not a valid package name.",
        Validation::pattern(r"^[a-z]+[a-z0-9_]*(\.[a-z]+[a-z0-9_]*)*$"),
    ))
    .add(ArgProcessor::new(
        ORGANIZATION,
        Some("Enter your organization name (Acme, Inc.):"),
        "Invalid value for organization: '$val'.",
        Validation::pattern(r"\S+"),
    ))
    .add(
        ArgProcessor::new(
            START_PAGE,
            Some("Enter the start page for your app:"),
            "Invalid value for start page: '$val'.",
            Validation::pattern(r"\S+"),
        )
        .when(|m| m.get(APP_TYPE).map(String::as_str) == Some(AppType::HybridRemote.as_str())),
    )
    .add(ArgProcessor::new(
        OUTPUT_DIR,
        Some("Enter the output directory for your app (leave empty for the current directory):"),
        "Invalid value for output directory: '$val'.",
        Validation::pattern(".*"),
    ))
    // Private parameters: not in the usage text, never prompted for
    .add(ArgProcessor::new(
        TEMPLATE_PATH,
        None,
        "Invalid value for template path: '$val'.",
        Validation::pattern(".*"),
    ))
    .add(ArgProcessor::new(
        PLUGIN_REPO_URL,
        None,
        "Invalid value for plugin repo url: '$val'.",
        Validation::pattern(".*"),
    ));

    list
}

/// Typed view of the collected create arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub kind: CreateKind,
    pub app_type: Option<AppType>,
    pub app_name: String,
    pub package_name: String,
    pub organization: String,
    pub start_page: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub template_repo_url: Option<String>,
    pub template_path: Option<String>,
    pub plugin_repo_url: Option<String>,
}

impl AppConfig {
    pub fn from_args_map(kind: CreateKind, map: &ArgsMap) -> Result<Self> {
        let optional = |name: &str| map.get(name).filter(|v| !v.is_empty()).cloned();
        let required = |name: &str| {
            optional(name).with_context(|| format!("Missing value for --{name}"))
        };

        let app_type = match kind {
            CreateKind::Create => Some(required(APP_TYPE)?.parse::<AppType>()?),
            CreateKind::CreateWithTemplate => None,
        };
        let template_repo_url = match kind {
            CreateKind::Create => None,
            CreateKind::CreateWithTemplate => Some(required(TEMPLATE_REPO_URL)?),
        };

        Ok(Self {
            kind,
            app_type,
            app_name: required(APP_NAME)?,
            package_name: required(PACKAGE_NAME)?,
            organization: required(ORGANIZATION)?,
            start_page: optional(START_PAGE),
            output_dir: optional(OUTPUT_DIR).map(PathBuf::from),
            template_repo_url,
            template_path: optional(TEMPLATE_PATH),
            plugin_repo_url: optional(PLUGIN_REPO_URL),
        })
    }

    /// Directory the app is generated into: `outputdir` if given, else `<cwd>/<appname>`
    pub fn project_dir(&self, cwd: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.join(&self.app_name),
        }
    }
}
