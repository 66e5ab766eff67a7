//! Running external toolchain commands with streamed output

use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// A program invocation: no shell involved, arguments are passed verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        if let Some(cwd) = &self.cwd {
            write!(f, " (in {})", cwd.display())?;
        }
        Ok(())
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(reader: R, is_stderr: bool) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if is_stderr => eprintln!("  {}", line.yellow()),
            Ok(Some(line)) => println!("  {}", line),
            Ok(None) => break,
            Err(e) => {
                eprintln!("{} {}", "Error reading output:".red(), e);
                break;
            }
        }
    }
}

/// Spawn the command, stream its stdout/stderr, and wait for it to exit
pub async fn run(spec: &CommandSpec) -> Result<ExitStatus> {
    let mut command = TokioCommand::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = &spec.cwd {
        command.current_dir(cwd);
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to start: {}", spec))?;

    let stdout = child.stdout.take().context("Failed to capture stdout")?;
    let stderr = child.stderr.take().context("Failed to capture stderr")?;

    let completion = async {
        tokio::join!(forward_lines(stdout, false), forward_lines(stderr, true));
        child.wait().await
    };

    let status = match spec.timeout {
        Some(limit) => match timeout(limit, completion).await {
            Ok(status) => status,
            // kill_on_drop takes the child down on return
            Err(_) => anyhow::bail!("Timed out after {} seconds: {}", limit.as_secs(), spec),
        },
        None => completion.await,
    };

    status.with_context(|| format!("Failed to wait for: {}", spec))
}

/// Run the command and turn a non-zero exit into an error
pub async fn run_throw_error(spec: &CommandSpec) -> Result<()> {
    println!("{} {}", "Running:".dimmed(), spec.to_string().yellow());
    let status = run(spec).await?;
    if !status.success() {
        anyhow::bail!(
            "Command failed with exit code {}: {}",
            status.code().unwrap_or(-1),
            spec
        );
    }
    Ok(())
}

/// Run the command under a banner and report success instead of failing
pub async fn run_catch_error(spec: &CommandSpec, label: &str) -> bool {
    println!();
    println!("{}", format!("=== {} ===", label).cyan().bold());
    println!("{} {}", "Running:".dimmed(), spec.to_string().yellow());

    match run(spec).await {
        Ok(status) if status.success() => {
            println!("{}", format!("*** SUCCEEDED {} ***", label).green().bold());
            true
        }
        Ok(status) => {
            println!(
                "{}",
                format!(
                    "!!! FAILED {} (exit code {}) !!!",
                    label,
                    status.code().unwrap_or(-1)
                )
                .red()
                .bold()
            );
            false
        }
        Err(e) => {
            println!("{}", format!("!!! FAILED {}: {} !!!", label, e).red().bold());
            false
        }
    }
}
