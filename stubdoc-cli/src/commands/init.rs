use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use stubdoc_core::config::{CONFIG_FILE_NAME, StubdocConfig};

use super::Outcome;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write stubdoc.toml into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing stubdoc.toml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<Outcome> {
    if !args.path.is_dir() {
        anyhow::bail!("Cannot resolve path: {}", args.path.display());
    }
    let target = args.path.join(CONFIG_FILE_NAME);
    if target.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
    }

    let rendered = StubdocConfig::default()
        .to_toml()
        .context("Cannot render default config")?;
    std::fs::write(&target, rendered)
        .with_context(|| format!("Cannot write config: {}", target.display()))?;

    println!("Wrote {}", target.display());
    Ok(Outcome::Success)
}
