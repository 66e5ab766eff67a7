//! forceios - Create iOS apps with the Salesforce Mobile SDK

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args as ClapArgs, CommandFactory, FromArgMatches, Parser, Subcommand};
use forcecli_core::app::join_app_types;
use forcecli_core::config::{self, CreateKind};
use forcecli_core::tui::CreateRequest;
use forcecli_core::{AppType, Os, ProductConfig};
use std::path::Path;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// iOS product configuration
#[derive(Clone)]
pub struct ForceIosConfig;

impl ProductConfig for ForceIosConfig {
    fn name(&self) -> &'static str {
        "forceios"
    }

    fn display_name(&self) -> &'static str {
        "forceios"
    }

    fn os(&self) -> Os {
        Os::Ios
    }

    fn app_types(&self) -> &'static [AppType] {
        &[
            AppType::Native,
            AppType::NativeSwift,
            AppType::ReactNative,
            AppType::HybridLocal,
            AppType::HybridRemote,
        ]
    }

    fn template_path(&self, app_type: AppType) -> &'static str {
        match app_type {
            AppType::Native => "iOSNativeTemplate",
            AppType::NativeSwift => "iOSNativeSwiftTemplate",
            AppType::ReactNative => "ReactNativeTemplate",
            AppType::HybridLocal => "HybridLocalTemplate",
            AppType::HybridRemote => "HybridRemoteTemplate",
        }
    }

    fn template_repo_env(&self) -> &'static str {
        "FORCEIOS_TEMPLATE_REPO_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://developer.salesforce.com/docs/platform/mobile-sdk/guide"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for creating iOS apps with the Salesforce Mobile SDK"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install forceios --force"
    }

    fn next_steps(&self, dir: &Path, app_name: &str, app_type: AppType) -> Vec<String> {
        let mut steps = Vec::new();

        match app_type {
            AppType::Native | AppType::NativeSwift => {
                steps.push(format!(
                    "Open {} in Xcode",
                    dir.join(format!("{}.xcworkspace", app_name)).display()
                ));
            }
            AppType::ReactNative => {
                steps.push(format!("cd {}", dir.display()));
                steps.push("npm start".to_string());
                steps.push(format!(
                    "Open {} in Xcode",
                    dir.join("ios")
                        .join(format!("{}.xcworkspace", app_name))
                        .display()
                ));
            }
            AppType::HybridLocal | AppType::HybridRemote => {
                steps.push(format!("cd {}", dir.display()));
                steps.push("cordova prepare (after changing files in www)".to_string());
                steps.push(format!(
                    "Open {} in Xcode",
                    dir.join("platforms")
                        .join("ios")
                        .join(format!("{}.xcworkspace", app_name))
                        .display()
                ));
            }
        }

        steps.push("Build and run the app".to_string());
        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "forceios")]
#[command(about = "CLI for creating iOS apps with the Salesforce Mobile SDK")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an iOS app from one of the standard templates
    Create(CliCreateArgs),
    /// Create an iOS app from a template in a git repo
    #[command(name = "create-with-template", alias = "createWithTemplate")]
    CreateWithTemplate(CliCreateWithTemplateArgs),
    /// Show version
    Version,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Application type (native, native_swift, react_native, hybrid_local or hybrid_remote)
    #[arg(long = "apptype")]
    pub app_type: Option<String>,

    #[command(flatten)]
    pub app: AppArgs,
}

#[derive(Parser, Debug)]
pub struct CliCreateWithTemplateArgs {
    /// Repo holding the template, optionally followed by #branch
    #[arg(long = "templaterepourl")]
    pub template_repo_url: Option<String>,

    #[command(flatten)]
    pub app: AppArgs,
}

/// Parameters shared by both create commands
#[derive(ClapArgs, Debug)]
pub struct AppArgs {
    /// Application name
    #[arg(long = "appname")]
    pub app_name: Option<String>,

    /// Package name (com.mycompany.myapp)
    #[arg(long = "packagename")]
    pub package_name: Option<String>,

    /// Organization name (Acme, Inc.)
    #[arg(long = "organization")]
    pub organization: Option<String>,

    /// Start page (hybrid_remote apps only)
    #[arg(long = "startpage")]
    pub start_page: Option<String>,

    /// Output directory (defaults to ./<appname>)
    #[arg(long = "outputdir")]
    pub output_dir: Option<String>,

    #[arg(long = "templatepath", hide = true)]
    pub template_path: Option<String>,

    #[arg(long = "pluginrepourl", hide = true)]
    pub plugin_repo_url: Option<String>,

    /// Never prompt (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl AppArgs {
    fn into_request(self, kind: CreateKind) -> CreateRequest {
        let mut request = CreateRequest::new(kind);
        request
            .provide(config::APP_NAME, self.app_name)
            .provide(config::PACKAGE_NAME, self.package_name)
            .provide(config::ORGANIZATION, self.organization)
            .provide(config::START_PAGE, self.start_page)
            .provide(config::OUTPUT_DIR, self.output_dir)
            .provide(config::TEMPLATE_PATH, self.template_path)
            .provide(config::PLUGIN_REPO_URL, self.plugin_repo_url);
        request.yes = self.yes;
        request
    }
}

impl From<CliCreateArgs> for CreateRequest {
    fn from(args: CliCreateArgs) -> Self {
        let mut request = args.app.into_request(CreateKind::Create);
        request.provide(config::APP_TYPE, args.app_type);
        request
    }
}

impl From<CliCreateWithTemplateArgs> for CreateRequest {
    fn from(args: CliCreateWithTemplateArgs) -> Self {
        let mut request = args.app.into_request(CreateKind::CreateWithTemplate);
        request.provide(config::TEMPLATE_REPO_URL, args.template_repo_url);
        request
    }
}

/// Command line with the product's app types listed below the help
fn cli() -> clap::Command {
    Args::command().after_help(format!(
        "Application types: {}",
        join_app_types(ForceIosConfig.app_types())
    ))
}

fn try_parse_from<I, T>(itr: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut command = cli();
    let matches = command.try_get_matches_from_mut(itr)?;
    Args::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
}

/// Help and version exit 0, every usage error exits 1
fn parse_args() -> Args {
    match try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = parse_args();
    let product = ForceIosConfig;

    let request: CreateRequest = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        Some(Command::CreateWithTemplate(create_args)) => create_args.into(),
        Some(Command::Version) => {
            println!("{} version {}", product.name(), CLI_VERSION);
            return Ok(());
        }
        None => {
            cli().print_help()?;
            std::process::exit(1);
        }
    };

    let result = forcecli_core::run(&product, request, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result.map(|_| ())
}
