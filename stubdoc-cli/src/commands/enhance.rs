use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use similar::TextDiff;

use stubdoc_core::pipeline::{PipelineOptions, PipelineResult, StubdocPipeline};
use stubdoc_core::progress::{IndicatifReporter, NoopReporter, ProgressReporter};
use stubdoc_core::render::json_writer::EnhancedJsonWriter;

use super::{ConfigArg, Outcome};

#[derive(Args, Debug)]
pub struct EnhanceArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Only enhance these classes (repeatable)
    #[arg(long = "class", value_name = "NAME")]
    pub classes: Vec<String>,

    /// Write enhanced files here instead of [output] directory (backups
    /// kept under [output] move here too)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Run matching and enhancement without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print a unified diff against existing enhanced files (implies --dry-run)
    #[arg(long)]
    pub diff: bool,
}

pub fn run(args: &EnhanceArgs, quiet: bool) -> anyhow::Result<Outcome> {
    let config = args.config.load()?;
    let pipeline = StubdocPipeline::new(config);
    let options = PipelineOptions {
        classes: (!args.classes.is_empty()).then(|| args.classes.clone()),
        dry_run: args.dry_run || args.diff,
        output_dir: args.output_dir.clone(),
    };

    let reporter: Box<dyn ProgressReporter> = if quiet {
        Box::new(NoopReporter)
    } else {
        Box::new(IndicatifReporter::new())
    };
    let result = pipeline
        .run(&options, reporter.as_ref())
        .context("Pipeline execution failed")?;

    if args.diff {
        print_diffs(&pipeline.writer(&options), &result)?;
    }
    if !quiet {
        print_summary(&result, options.dry_run);
    }

    Ok(Outcome::from_failures(result.errors.len()))
}

fn print_summary(result: &PipelineResult, dry_run: bool) {
    let summary = &result.enhancement_report.summary;
    let matches = &result.match_report.summary;

    if dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Enhanced stubs written");
    }
    println!();
    println!("  Stubs loaded:     {}", result.stubs_loaded);
    println!("  JavaDoc parsed:   {}", result.javadoc_parsed);
    println!("  Classes enhanced: {}", result.enhanced.len());
    println!(
        "  Method matches:   {} ({:.1}% of JavaDoc methods)",
        matches.total_method_matches, matches.overall_match_percentage
    );
    println!("  Avg quality:      {:.3}", summary.average_enhancement_quality);
    println!("  Files written:    {}", result.written.len());
    println!("  Duration:         {:.2?}", result.duration);

    if !result.missing_javadoc.is_empty() {
        println!();
        println!("  No JavaDoc page ({}):", result.missing_javadoc.len());
        for class in &result.missing_javadoc {
            println!("    - {class}");
        }
    }

    if !result.errors.is_empty() {
        println!();
        println!("  Warnings ({}):", result.errors.len());
        for error in &result.errors {
            println!("    - {error}");
        }
    }
}

fn print_diffs(writer: &EnhancedJsonWriter, result: &PipelineResult) -> anyhow::Result<()> {
    let mut changed = 0usize;
    for (name, stub) in &result.enhanced {
        let target = writer.target_path(name);
        let new = EnhancedJsonWriter::render(stub).with_context(|| format!("Cannot render {name}"))?;
        let old = if target.is_file() {
            std::fs::read_to_string(&target)
                .with_context(|| format!("Cannot read {}", target.display()))?
        } else {
            String::new()
        };
        if old == new {
            continue;
        }
        changed += 1;

        let label = target.display().to_string();
        let old_label = if old.is_empty() { "/dev/null".to_string() } else { label.clone() };
        let diff = TextDiff::from_lines(&old, &new);
        print!("{}", diff.unified_diff().context_radius(3).header(&old_label, &label));
    }
    if changed == 0 {
        println!("No changes");
    }
    Ok(())
}
