use clap::Parser;

mod commands;

use commands::Outcome;

#[derive(Parser, Debug)]
#[command(
    name = "stubdoc",
    version,
    about = "Enhance reflection-derived Python stubs with JavaDoc documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Exit codes:
///   0   success
///   1   general/unknown error
///   2   configuration error
///   3   input not found (stub directory, JavaDoc tree, method index)
///   10  partial success (some classes failed)
const EXIT_PARTIAL: i32 = 10;

fn classify_exit_code(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}");
    let lower = msg.to_lowercase();

    if lower.contains("config") || lower.contains("threshold") {
        2 // configuration error
    } else if lower.contains("not found")
        || lower.contains("cannot resolve path")
        || lower.contains("does not exist")
    {
        3 // input not found
    } else {
        1 // general error
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match commands::run(cli.command, cli.quiet) {
        Ok(Outcome::Success) => std::process::exit(0),
        Ok(Outcome::Partial) => std::process::exit(EXIT_PARTIAL),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}
