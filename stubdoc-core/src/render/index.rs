//! Cross-class method index (`method_index.json`) with search and filtering.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::WriteError;
use crate::types::{EnhancedMethod, EnhancedStub, MethodCategory};

use super::traits::{Renderer, to_sorted_json};
use super::RenderInput;

/// File name the index is written under, relative to the output directory.
pub const METHOD_INDEX_FILE: &str = "method_index.json";

const SHORT_DESCRIPTION_LIMIT: usize = 120;
const NO_DESCRIPTION: &str = "No description available";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodIndexEntry {
    pub method_name: String,
    pub class_name: String,
    pub package: String,
    pub full_class_name: String,
    pub category: MethodCategory,
    pub short_description: String,
    /// Full method description; search runs over this, not the short form.
    #[serde(default)]
    pub javadoc_description: String,
    pub signature: String,
    pub return_type: String,
    pub java_return_type: String,
    #[serde(default)]
    pub return_description: String,
    /// `(name, type, description)` of the first overload's parameters.
    pub parameters: Vec<(String, String, String)>,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub has_examples: bool,
    #[serde(skip)]
    searchable_text: String,
}

impl MethodIndexEntry {
    pub fn new(method: &EnhancedMethod, class_name: &str, package: &str) -> Self {
        let full_class_name = if package.is_empty() {
            class_name.to_string()
        } else {
            format!("{package}.{class_name}")
        };
        let (signature, return_type, java_return_type, return_description, parameters) =
            match method.overloads.first() {
                Some(first) => (
                    first.signature.clone(),
                    first.return_type.clone(),
                    first.java_return_type.clone(),
                    first.return_description.clone(),
                    first
                        .params
                        .iter()
                        .map(|p| (p.name.clone(), p.ty.clone(), p.description.clone()))
                        .collect(),
                ),
                None => (
                    format!("{}()", method.name),
                    "void".into(),
                    "void".into(),
                    String::new(),
                    Vec::new(),
                ),
            };

        let mut entry = Self {
            method_name: method.name.clone(),
            class_name: class_name.to_string(),
            package: package.to_string(),
            full_class_name,
            category: method.category,
            short_description: short_description(&method.javadoc_description),
            javadoc_description: method.javadoc_description.clone(),
            signature,
            return_type,
            java_return_type,
            return_description,
            parameters,
            deprecated: method.deprecated,
            since_version: method.since_version.clone(),
            has_examples: !method.examples.is_empty(),
            searchable_text: String::new(),
        };
        entry.searchable_text = entry.build_searchable_text();
        entry
    }

    fn build_searchable_text(&self) -> String {
        let description = HTML_TAG.replace_all(&self.javadoc_description, "");
        let param_types: Vec<&str> = self.parameters.iter().map(|(_, ty, _)| ty.as_str()).collect();
        let param_names: Vec<&str> = self.parameters.iter().map(|(name, _, _)| name.as_str()).collect();
        let types = param_types.join(" ");
        let names = param_names.join(" ");
        [
            self.method_name.as_str(),
            self.class_name.as_str(),
            self.package.as_str(),
            self.category.as_str(),
            &*description,
            self.return_type.as_str(),
            types.as_str(),
            names.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }

    /// Case-insensitive substring search; an empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        query.is_empty() || self.searchable_text.contains(&query.to_lowercase())
    }
}

/// Strip markup, collapse whitespace, and cut at a word boundary past 120
/// characters.
pub fn short_description(description: &str) -> String {
    let stripped = HTML_TAG.replace_all(description, "");
    let clean = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return NO_DESCRIPTION.to_string();
    }
    if clean.chars().count() <= SHORT_DESCRIPTION_LIMIT {
        return clean;
    }
    let cut: String = clean.chars().take(SHORT_DESCRIPTION_LIMIT).collect();
    let head = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{head}...")
}

/// Filters for [`MethodIndex::filter`]; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct IndexFilter {
    /// Case-insensitive substring of the class name.
    pub class_name: Option<String>,
    /// Case-insensitive substring of the Python return type.
    pub return_type: Option<String>,
    pub category: Option<MethodCategory>,
    pub include_deprecated: bool,
}

impl IndexFilter {
    fn accepts(&self, entry: &MethodIndexEntry) -> bool {
        if !self.include_deprecated && entry.deprecated {
            return false;
        }
        let contains = |haystack: &str, needle: &str| haystack.to_lowercase().contains(&needle.to_lowercase());
        self.class_name.as_deref().is_none_or(|c| contains(&entry.class_name, c))
            && self.return_type.as_deref().is_none_or(|r| contains(&entry.return_type, r))
            && self.category.is_none_or(|c| c == entry.category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodIndex {
    pub methods: Vec<MethodIndexEntry>,
    pub categories: Vec<MethodCategory>,
    pub classes: Vec<String>,
    pub return_types: Vec<String>,
    pub packages: Vec<String>,
    pub generation_timestamp: String,
    pub total_methods: usize,
    pub deprecated_methods: usize,
}

impl MethodIndex {
    /// Entries ordered by class key, then stub method order.
    #[instrument(skip_all, name = "method_index")]
    pub fn build(enhanced: &BTreeMap<String, EnhancedStub>) -> Self {
        let methods: Vec<MethodIndexEntry> = enhanced
            .values()
            .flat_map(|stub| {
                stub.methods
                    .iter()
                    .map(|m| MethodIndexEntry::new(m, &stub.class_name, &stub.package))
            })
            .collect();

        let categories: BTreeSet<MethodCategory> = methods.iter().map(|e| e.category).collect();
        let classes: BTreeSet<&str> = methods.iter().map(|e| e.class_name.as_str()).collect();
        let return_types: BTreeSet<&str> = methods.iter().map(|e| e.return_type.as_str()).collect();
        let packages: BTreeSet<&str> = methods
            .iter()
            .map(|e| e.package.as_str())
            .filter(|p| !p.is_empty())
            .collect();

        let index = Self {
            categories: categories.into_iter().collect(),
            classes: classes.into_iter().map(str::to_string).collect(),
            return_types: return_types.into_iter().map(str::to_string).collect(),
            packages: packages.into_iter().map(str::to_string).collect(),
            generation_timestamp: chrono::Utc::now().to_rfc3339(),
            total_methods: methods.len(),
            deprecated_methods: methods.iter().filter(|e| e.deprecated).count(),
            methods,
        };
        info!(methods = index.total_methods, classes = index.classes.len(), "Method index built");
        index
    }

    /// Load a previously written `method_index.json`, rebuilding search text
    /// from the stored full descriptions. Entries written without one fall
    /// back to their short description.
    pub fn load(path: &Path) -> Result<Self, WriteError> {
        let raw = std::fs::read_to_string(path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut index: Self = serde_json::from_str(&raw)?;
        for entry in &mut index.methods {
            if entry.javadoc_description.is_empty() && entry.short_description != NO_DESCRIPTION {
                entry.javadoc_description.clone_from(&entry.short_description);
            }
            entry.searchable_text = entry.build_searchable_text();
        }
        Ok(index)
    }

    pub fn search(&self, query: &str) -> Vec<&MethodIndexEntry> {
        self.methods.iter().filter(|e| e.matches_query(query)).collect()
    }

    pub fn filter(&self, filter: &IndexFilter) -> Vec<&MethodIndexEntry> {
        self.methods.iter().filter(|e| filter.accepts(e)).collect()
    }

    /// Search then filter.
    pub fn query(&self, query: &str, filter: &IndexFilter) -> Vec<&MethodIndexEntry> {
        self.methods
            .iter()
            .filter(|e| e.matches_query(query) && filter.accepts(e))
            .collect()
    }
}

#[derive(Debug)]
pub struct MethodIndexRenderer;

impl Renderer for MethodIndexRenderer {
    fn name(&self) -> &'static str {
        "method_index"
    }

    fn output_path(&self) -> &'static str {
        METHOD_INDEX_FILE
    }

    fn render(&self, input: &RenderInput<'_>) -> crate::error::Result<String> {
        let index = MethodIndex::build(input.enhanced);
        Ok(to_sorted_json(&index)?)
    }
}
