pub mod clean;
pub mod enhance;
pub mod init;
pub mod report;
pub mod search;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use tracing::info;

use stubdoc_core::config::{CONFIG_FILE_NAME, StubdocConfig};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default stubdoc.toml
    Init(init::InitArgs),
    /// Match stubs against JavaDoc and write enhanced files
    Enhance(enhance::EnhanceArgs),
    /// Run matching only and print the matching report
    Report(report::ReportArgs),
    /// Validate stub files and written enhanced files
    Validate(validate::ValidateArgs),
    /// Search the generated method index
    Search(search::SearchArgs),
    /// Delete old backups of enhanced files
    Clean(clean::CleanArgs),
}

/// How a command that did not error finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Some classes or files failed; the rest were processed.
    Partial,
}

impl Outcome {
    pub fn from_failures(failures: usize) -> Self {
        if failures == 0 { Self::Success } else { Self::Partial }
    }
}

/// `--config` shared by every command that reads configuration.
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    /// Config file (default: ./stubdoc.toml when present, else built-in defaults)
    #[arg(short, long, env = "STUBDOC_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConfigArg {
    pub fn load(&self) -> anyhow::Result<StubdocConfig> {
        match &self.config {
            Some(path) => load_config(path),
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.is_file() {
                    load_config(default)
                } else {
                    info!("No {CONFIG_FILE_NAME} found, using defaults");
                    let cwd = std::env::current_dir().context("Cannot resolve path: current directory")?;
                    let mut config = StubdocConfig::default();
                    config.resolve_paths(&cwd);
                    Ok(config)
                }
            }
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<StubdocConfig> {
    StubdocConfig::load(path).with_context(|| format!("Cannot load config: {}", path.display()))
}

pub fn run(cmd: Command, quiet: bool) -> anyhow::Result<Outcome> {
    match cmd {
        Command::Init(args) => init::run(&args),
        Command::Enhance(args) => enhance::run(&args, quiet),
        Command::Report(args) => report::run(&args),
        Command::Validate(args) => validate::run(&args),
        Command::Search(args) => search::run(&args),
        Command::Clean(args) => clean::run(&args),
    }
}
