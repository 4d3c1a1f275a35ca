//! Name-based method categories.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::types::MethodCategory;

/// Ordered classification rules; the first category with a matching pattern wins.
const RULES: &[(MethodCategory, &[&str])] = &[
    (
        MethodCategory::Getters,
        &[r"^get[A-Z]", r"^is[A-Z]", r"^has[A-Z]", r"^can[A-Z]", r"count$", r"size$", r"length$"],
    ),
    (
        MethodCategory::Setters,
        &[r"^(set|add|remove|clear|enable|disable|toggle)[A-Z]"],
    ),
    (
        MethodCategory::Analysis,
        &[r"analyz", r"calculat", r"measur", r"comput", r"statistic", r"metric", r"evaluat"],
    ),
    (
        MethodCategory::IoOperations,
        &[r"^(load|save|read|write|import|export)[A-Z]", r"file", r"path"],
    ),
    (
        MethodCategory::Visualization,
        &[r"^(draw|render|display|show|plot|paint)[A-Z]", r"color", r"view"],
    ),
];

static COMPILED: LazyLock<Vec<(MethodCategory, Vec<Regex>)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(category, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .expect("static pattern is valid")
                })
                .collect();
            (*category, compiled)
        })
        .collect()
});

static STATIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^static\s+").expect("static pattern is valid"));

/// Classify a method by name. Patterns are tried against the raw stub name;
/// a method that matches none falls back to `Static Methods` when it is
/// static (by flag or by a `static ` name prefix), else `Utilities`.
pub fn categorize(name: &str, is_static: bool) -> MethodCategory {
    let name = name.trim();
    for (category, patterns) in COMPILED.iter() {
        if patterns.iter().any(|p| p.is_match(name)) {
            return *category;
        }
    }
    if is_static || STATIC_PREFIX.is_match(name) {
        MethodCategory::StaticMethods
    } else {
        MethodCategory::Utilities
    }
}
