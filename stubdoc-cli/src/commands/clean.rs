use clap::Args;

use stubdoc_core::render::json_writer::EnhancedJsonWriter;

use super::{ConfigArg, Outcome};

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Keep backups newer than this many days (default: [backups] keep_days)
    #[arg(long)]
    pub days: Option<u32>,
}

pub fn run(args: &CleanArgs) -> anyhow::Result<Outcome> {
    let config = args.config.load()?;
    if !config.backups.enabled {
        println!("Backups are disabled; nothing to clean");
        return Ok(Outcome::Success);
    }

    let days = args.days.unwrap_or(config.backups.keep_days);
    let deleted = EnhancedJsonWriter::from_config(&config).cleanup_backups(days);
    println!(
        "Deleted {deleted} backup(s) older than {days} day(s) from {}",
        config.backups.directory.display()
    );
    Ok(Outcome::Success)
}
