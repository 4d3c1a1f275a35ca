use anyhow::Context;
use clap::Args;

use stubdoc_core::pipeline::{PipelineOptions, StubdocPipeline};
use stubdoc_core::progress::NoopReporter;
use stubdoc_core::render::traits::to_sorted_json;

use super::{ConfigArg, Outcome};

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Only report on these classes (repeatable)
    #[arg(long = "class", value_name = "NAME")]
    pub classes: Vec<String>,

    /// Print the full matching report as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of most common issues to list
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

pub fn run(args: &ReportArgs) -> anyhow::Result<Outcome> {
    let config = args.config.load()?;
    let options = PipelineOptions {
        classes: (!args.classes.is_empty()).then(|| args.classes.clone()),
        dry_run: true,
        output_dir: None,
    };
    let result = StubdocPipeline::new(config)
        .run(&options, &NoopReporter)
        .context("Pipeline execution failed")?;
    let report = &result.match_report;

    if args.json {
        println!("{}", to_sorted_json(report).context("Cannot serialize report")?);
        return Ok(Outcome::from_failures(result.errors.len()));
    }

    let s = &report.summary;
    let dist = &report.match_type_distribution;
    println!("Matching report");
    println!();
    println!("  Classes:          {}", s.total_classes);
    println!("    with both:      {}", s.classes_with_both_data);
    println!("    JavaDoc only:   {}", s.classes_javadoc_only);
    println!("    stub only:      {}", s.classes_json_only);
    println!("  JavaDoc methods:  {}", s.total_javadoc_methods);
    println!("  Stub methods:     {}", s.total_json_methods);
    println!(
        "  Matches:          {} ({:.1}%)",
        s.total_method_matches, s.overall_match_percentage
    );
    println!(
        "    exact {} / signature {} / fuzzy {}",
        dist.exact, dist.signature, dist.fuzzy
    );

    println!();
    println!("  {:<32} {:>7} {:>8} {:>8}", "Class", "Match%", "Unm.Doc", "Unm.Stub");
    for (name, entry) in &report.class_results {
        println!(
            "  {:<32} {:>6.1}% {:>8} {:>8}",
            name, entry.match_percentage, entry.unmatched_javadoc, entry.unmatched_json
        );
    }

    let issues = &report.issues_summary;
    if !issues.common_issues.is_empty() {
        println!();
        println!("  Common issues ({} classes affected):", issues.classes_with_issues);
        for (issue, count) in issues.common_issues.iter().take(args.top) {
            println!("    {count:>4}  {issue}");
        }
    }

    Ok(Outcome::from_failures(result.errors.len()))
}
