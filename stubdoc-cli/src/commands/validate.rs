use std::path::{Path, PathBuf};

use clap::Args;
use tracing::warn;

use stubdoc_core::config::StubdocConfig;
use stubdoc_core::extract::stubs::{StubReader, validate_structure};
use stubdoc_core::render::json_writer::validate_enhanced_file;

use super::{ConfigArg, Outcome};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Validate written enhanced files instead of input stubs
    #[arg(long)]
    pub enhanced: bool,

    /// Print warnings as well as errors
    #[arg(long)]
    pub warnings: bool,
}

pub fn run(args: &ValidateArgs) -> anyhow::Result<Outcome> {
    let config = args.config.load()?;
    if args.enhanced {
        validate_enhanced(&config, args.warnings)
    } else {
        validate_stubs(&config, args.warnings)
    }
}

fn validate_stubs(config: &StubdocConfig, show_warnings: bool) -> anyhow::Result<Outcome> {
    let reader = StubReader::new(&config.stubs.directory, &config.stubs.file_pattern)
        .skip_suffix(&config.output.enhanced_suffix);
    let files = reader.find_stub_files()?;

    let mut invalid = 0usize;
    for path in &files {
        let (errors, warnings) = match reader.load_stub(path) {
            Ok(stub) => {
                let validation = validate_structure(&stub);
                (validation.errors, validation.warnings)
            }
            Err(e) => (vec![e.to_string()], Vec::new()),
        };
        if !errors.is_empty() {
            invalid += 1;
        }
        let warnings: &[String] = if show_warnings { &warnings } else { &[] };
        print_file(path, &errors, warnings);
    }

    println!();
    println!("  Stub files: {}", files.len());
    println!("  Valid:      {}", files.len() - invalid);
    println!("  Invalid:    {invalid}");
    Ok(Outcome::from_failures(invalid))
}

fn validate_enhanced(config: &StubdocConfig, show_warnings: bool) -> anyhow::Result<Outcome> {
    let dir = &config.output.directory;
    if !dir.is_dir() {
        anyhow::bail!("Output directory does not exist: {}", dir.display());
    }
    let files = enhanced_files(dir, &config.output.enhanced_suffix);

    let mut invalid = 0usize;
    let mut methods = 0usize;
    let mut with_javadoc = 0usize;
    for path in &files {
        let validation = validate_enhanced_file(path);
        if !validation.valid {
            invalid += 1;
        }
        methods += validation.statistics.methods_count;
        with_javadoc += validation.statistics.methods_with_javadoc;
        let warnings: &[String] = if show_warnings { &validation.warnings } else { &[] };
        print_file(path, &validation.errors, warnings);
    }

    println!();
    println!("  Enhanced files:       {}", files.len());
    println!("  Invalid:              {invalid}");
    println!("  Methods:              {methods}");
    println!("  With JavaDoc text:    {with_javadoc}");
    Ok(Outcome::from_failures(invalid))
}

fn enhanced_files(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/*{}.json",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(suffix)
    );
    let mut files = Vec::new();
    match glob::glob(&pattern) {
        Ok(paths) => files.extend(paths.flatten().filter(|p| p.is_file())),
        Err(e) => warn!(pattern = %pattern, error = %e, "Invalid glob pattern"),
    }
    files.sort();
    files
}

fn print_file(path: &Path, errors: &[String], warnings: &[String]) {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
    if errors.is_empty() {
        println!("ok    {name}");
    } else {
        println!("FAIL  {name}");
    }
    for e in errors {
        println!("        error: {e}");
    }
    for w in warnings {
        println!("        warning: {w}");
    }
}
