//! Charm-style CLI prompts using cliclack

use crate::app::AppType;
use crate::args::{self, ArgError, ArgsMap, NonInteractive, Prompter};
use crate::config::{create_args_processor_list, AppConfig, CreateKind};
use crate::create::{self, CreatedApp, PreparedTemplate};
use crate::product::ProductConfig;
use crate::runtime::check::{self, ToolCheck};
use crate::runtime::version;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// What the user asked for on the command line
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub kind: CreateKind,
    /// Parameter values given as flags, keyed by parameter name
    pub provided: ArgsMap,
    /// Never prompt; missing or invalid values are errors
    pub yes: bool,
}

impl CreateRequest {
    pub fn new(kind: CreateKind) -> Self {
        Self {
            kind,
            provided: ArgsMap::new(),
            yes: false,
        }
    }

    /// Record a flag value if it was given
    pub fn provide(&mut self, name: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.provided.insert(name.to_string(), value);
        }
        self
    }
}

/// Prompts for missing parameters with cliclack inputs
struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn ask(&mut self, _name: &str, prompt: &str) -> Result<String, ArgError> {
        let answer: String = cliclack::input(prompt).required(false).interact()?;
        Ok(answer)
    }

    fn report_error(&mut self, message: &str) {
        let _ = cliclack::log::error(message);
    }
}

/// Run a create command with interactive prompts
pub async fn run<C: ProductConfig>(
    product: &C,
    request: CreateRequest,
    cli_version: &str,
) -> Result<CreatedApp> {
    cliclack::intro(product.display_name())?;

    let interactive = !request.yes && console::user_attended();

    // Step 1: Collect parameters
    let config = collect_config(product, &request, interactive)?;

    // Step 2: Fetch the template
    let prepared = fetch_template(product, &config).await?;

    if let Some(min_version) = prepared.manifest.version.as_deref() {
        if let Some(warning) =
            version::check_compatibility(cli_version, min_version, product.upgrade_command())
        {
            cliclack::log::warning(format!(
                "Version warning: {}",
                warning.lines().next().unwrap_or(&warning)
            ))?;
        }
    }

    // Step 3: Check the tools generation shells out to
    check_tools(product, prepared.app_type, interactive).await?;

    // Step 4: Generate
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let created = generate_app(product, &config, &prepared, &cwd).await?;

    // Step 5: Show next steps
    print_next_steps(product, &created, &config.app_name)?;

    Ok(created)
}

fn collect_config<C: ProductConfig>(
    product: &C,
    request: &CreateRequest,
    interactive: bool,
) -> Result<AppConfig> {
    let processors = create_args_processor_list(product.app_types(), request.kind);

    let collected = if interactive {
        args::collect(request.provided.clone(), &processors, &mut CliclackPrompter)?
    } else {
        let mut prompter = NonInteractive::new();
        match args::collect(request.provided.clone(), &processors, &mut prompter) {
            Ok(collected) => collected,
            Err(e) => {
                cliclack::log::error(e.to_string())?;
                return Err(e.into());
            }
        }
    };

    AppConfig::from_args_map(request.kind, &collected)
}

async fn fetch_template<C: ProductConfig>(
    product: &C,
    config: &AppConfig,
) -> Result<PreparedTemplate> {
    let spinner = cliclack::spinner();
    spinner.start("Fetching template...");

    match create::prepare_template(product, config).await {
        Ok(prepared) => {
            let description = if prepared.manifest.description.is_empty() {
                String::new()
            } else {
                format!(" - {}", prepared.manifest.description)
            };
            spinner.stop(format!("Template: {}{}", prepared.app_type, description));
            Ok(prepared)
        }
        Err(e) => {
            spinner.stop("Failed to fetch template");
            Err(e)
        }
    }
}

async fn check_tools<C: ProductConfig>(
    product: &C,
    app_type: AppType,
    interactive: bool,
) -> Result<()> {
    let checks = check::check_requirements(product.os(), app_type);

    let detected: Vec<String> = checks
        .iter()
        .filter(|c| c.status.available)
        .map(|c| {
            format!(
                "{} ({})",
                c.status.name,
                c.status.version.as_deref().unwrap_or("unknown")
            )
        })
        .collect();
    if !detected.is_empty() {
        cliclack::log::success(format!("Detected tools: {}", detected.join(", ")))?;
    }

    let mut unresolved = Vec::new();
    for tool_check in checks {
        let Some(problem) = tool_check.problem() else {
            continue;
        };
        if interactive && tool_check.tool.install_spec().is_some() {
            handle_installable_tool(&tool_check, &problem).await?;
        } else if tool_check.status.outdated {
            cliclack::log::warning(problem)?;
        } else {
            unresolved.push(tool_check);
        }
    }

    if let Err(e) = check::ensure_installed(&unresolved) {
        cliclack::log::error(format!("{}", e))?;
        anyhow::bail!("Please install the missing tools and try again.");
    }

    Ok(())
}

async fn handle_installable_tool(tool_check: &ToolCheck, problem: &str) -> Result<()> {
    let tool = &tool_check.tool;
    let display_name = tool.config().display_name;
    cliclack::log::warning(problem)?;

    let action: &str = cliclack::select("What would you like to do?")
        .item(
            "install",
            format!("Install {} automatically", display_name),
            "",
        )
        .item(
            "docs",
            format!("Open documentation ({})", tool.config().docs_url),
            "",
        )
        .item("skip", format!("Skip and continue without {}", display_name), "")
        .interact()?;

    match action {
        "install" => {
            cliclack::log::info(format!(
                "This will execute: {}",
                tool.install_command().unwrap_or_default()
            ))?;

            let confirm: bool = cliclack::confirm("Proceed with installation?")
                .initial_value(true)
                .interact()?;
            if !confirm {
                anyhow::bail!("Setup cancelled.");
            }

            if let Err(e) = tool.install().await {
                cliclack::log::error(format!("{}", e))?;
                anyhow::bail!("{} is required to generate this app.", display_name);
            }
            cliclack::log::success(format!("{} installed successfully", display_name))?;
        }
        "docs" => {
            tool.open_docs()?;
            cliclack::outro(format!(
                "After installing {}, run this command again.",
                display_name
            ))?;
            std::process::exit(0);
        }
        _ => {
            cliclack::log::info(format!(
                "Continuing without {}. Refer to the docs for installation instructions: ({})",
                display_name,
                tool.config().docs_url
            ))?;
        }
    }

    Ok(())
}

async fn generate_app<C: ProductConfig>(
    product: &C,
    config: &AppConfig,
    prepared: &PreparedTemplate,
    cwd: &Path,
) -> Result<CreatedApp> {
    // Platform tooling streams its own output, so no spinner here
    cliclack::log::info(format!(
        "Creating {} app {} in {}",
        prepared.app_type,
        config.app_name,
        config.project_dir(cwd).display()
    ))?;

    match create::generate(product, config, prepared, cwd).await {
        Ok(created) => {
            cliclack::log::success(format!(
                "Created {} files in {}",
                created.files.len(),
                created.project_dir.display()
            ))?;
            Ok(created)
        }
        Err(e) => {
            cliclack::log::error(format!("{:#}", e))?;
            Err(e)
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    product: &C,
    created: &CreatedApp,
    app_name: &str,
) -> Result<()> {
    let steps = product.next_steps(&created.project_dir, app_name, created.app_type);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    println!();
    println!("  Documentation: {}", product.docs_url());

    cliclack::outro("Happy coding!")?;

    Ok(())
}
