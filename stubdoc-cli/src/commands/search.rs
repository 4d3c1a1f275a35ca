use clap::Args;

use stubdoc_core::render::index::{IndexFilter, METHOD_INDEX_FILE, MethodIndex};
use stubdoc_core::types::MethodCategory;

use super::{ConfigArg, Outcome};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for in method names, descriptions and return types
    pub query: String,

    #[command(flatten)]
    pub config: ConfigArg,

    /// Restrict to a category label, e.g. "Getters"
    #[arg(long)]
    pub category: Option<String>,

    /// Restrict to classes whose name contains this text
    #[arg(long = "class")]
    pub class_name: Option<String>,

    /// Restrict to Python return types containing this text
    #[arg(long)]
    pub returns: Option<String>,

    /// Include deprecated methods
    #[arg(long)]
    pub include_deprecated: bool,

    /// Maximum results to print
    #[arg(long, default_value_t = 25)]
    pub limit: usize,
}

pub fn run(args: &SearchArgs) -> anyhow::Result<Outcome> {
    let config = args.config.load()?;
    let path = config.output.directory.join(METHOD_INDEX_FILE);
    if !path.is_file() {
        anyhow::bail!(
            "Method index does not exist: {} (run `stubdoc enhance` first)",
            path.display()
        );
    }

    let category = match args.category.as_deref() {
        Some(label) => Some(MethodCategory::from_label(label).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown category '{label}'; expected one of: {}",
                MethodCategory::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?),
        None => None,
    };

    let index = MethodIndex::load(&path)?;
    let filter = IndexFilter {
        class_name: args.class_name.clone(),
        return_type: args.returns.clone(),
        category,
        include_deprecated: args.include_deprecated,
    };
    let hits = index.query(&args.query, &filter);

    if hits.is_empty() {
        println!("No methods match '{}'", args.query);
        return Ok(Outcome::Success);
    }

    for entry in hits.iter().take(args.limit) {
        let deprecated = if entry.deprecated { " [deprecated]" } else { "" };
        println!(
            "{}.{}  {}  [{}]{deprecated}",
            entry.class_name, entry.method_name, entry.signature, entry.category
        );
        println!("    {}", entry.short_description);
    }
    if hits.len() > args.limit {
        println!("... {} more", hits.len() - args.limit);
    }
    Ok(Outcome::Success)
}
