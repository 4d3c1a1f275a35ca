use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analyze::matcher::ClassMatchStats;

// ── JavaDoc records ────────────────────────────────────────────────

/// One documented parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDoc {
    pub name: String,
    pub description: String,
    /// Declared type as rendered in the member signature, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// JavaDoc-extracted documentation for a single method section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDoc {
    pub name: String,
    /// Raw member signature text (whitespace-normalized).
    pub signature: String,
    pub description: String,
    pub parameters: Vec<ParameterDoc>,
    pub return_description: String,
    pub return_type: String,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub see_also: Vec<String>,
    /// Exception type → description.
    pub throws: BTreeMap<String, String>,
    pub modifiers: Vec<String>,
    pub examples: Vec<String>,
    pub overrides: Option<String>,
}

impl MethodDoc {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDoc {
    pub name: String,
    pub type_name: String,
    pub description: String,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub modifiers: Vec<String>,
    /// Listed only in an "inherited from" summary block.
    pub inherited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDoc {
    pub signature: String,
    pub description: String,
    pub parameters: Vec<ParameterDoc>,
    pub throws: BTreeMap<String, String>,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inheritance {
    pub extends: Vec<String>,
    pub implements: Vec<String>,
}

/// Complete JavaDoc documentation for one class page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDoc {
    pub class_name: String,
    pub package: String,
    pub description: String,
    pub inheritance: Inheritance,
    pub methods: Vec<MethodDoc>,
    pub fields: Vec<FieldDoc>,
    pub constructors: Vec<ConstructorDoc>,
    pub nested_classes: Vec<String>,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub see_also: Vec<String>,
}

// ── Reflection stub records ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubParam {
    pub name: String,
    /// Python-side type hint.
    #[serde(rename = "type")]
    pub ty: String,
    pub java_type: String,
}

/// One concrete parameter-list variant of a stub method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overload {
    pub signature: String,
    pub params: Vec<StubParam>,
    pub return_type: String,
    pub java_return_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubMethod {
    pub name: String,
    pub overloads: Vec<Overload>,
    #[serde(default)]
    pub documentation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubConstructor {
    pub name: String,
    pub overloads: Vec<Overload>,
    #[serde(default)]
    pub documentation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub java_type: String,
    #[serde(default)]
    pub documentation: String,
}

/// A reflection-derived stub file for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StubClass {
    pub class_name: String,
    pub package: String,
    pub extracted_at: String,
    pub extractor_version: String,
    pub methods: Vec<StubMethod>,
    pub fields: Vec<StubField>,
    pub constructors: Vec<StubConstructor>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
}

impl StubClass {
    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty()
    }

    /// `package.ClassName`, or the bare class name when the package is empty.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }
}

// ── Match & category labels ────────────────────────────────────────

/// Which matcher pass produced a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Signature,
    Fuzzy,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Signature => "signature",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic grouping of a method by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MethodCategory {
    Getters,
    Setters,
    Analysis,
    #[serde(rename = "I/O Operations")]
    IoOperations,
    Visualization,
    #[serde(rename = "Static Methods")]
    StaticMethods,
    Utilities,
}

impl MethodCategory {
    pub const ALL: [Self; 7] = [
        Self::Getters,
        Self::Setters,
        Self::Analysis,
        Self::IoOperations,
        Self::Visualization,
        Self::StaticMethods,
        Self::Utilities,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Getters => "Getters",
            Self::Setters => "Setters",
            Self::Analysis => "Analysis",
            Self::IoOperations => "I/O Operations",
            Self::Visualization => "Visualization",
            Self::StaticMethods => "Static Methods",
            Self::Utilities => "Utilities",
        }
    }

    /// Case-insensitive lookup by display label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for MethodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Enhanced records ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub java_type: String,
    pub description: String,
    pub javadoc_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedOverload {
    pub signature: String,
    pub params: Vec<EnhancedParam>,
    pub return_type: String,
    pub java_return_type: String,
    pub return_description: String,
    pub throws: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedMethod {
    pub name: String,
    pub overloads: Vec<EnhancedOverload>,
    pub documentation: String,
    pub javadoc_description: String,
    pub category: MethodCategory,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub see_also: Vec<String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub java_type: String,
    pub documentation: String,
    pub javadoc_description: String,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedConstructorOverload {
    pub signature: String,
    pub params: Vec<EnhancedParam>,
    pub javadoc_description: String,
    pub throws: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedConstructor {
    pub name: String,
    pub overloads: Vec<EnhancedConstructorOverload>,
    pub documentation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancementMetadata {
    pub javadoc_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_statistics: Option<ClassMatchStats>,
    pub unmatched_javadoc_methods: usize,
    pub unmatched_json_methods: usize,
    pub enhancement_quality_score: f64,
}

/// A stub class merged with its JavaDoc documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedStub {
    pub class_name: String,
    pub package: String,
    pub extracted_at: String,
    pub extractor_version: String,
    pub enhancement_timestamp: String,
    pub enhancement_version: String,

    pub javadoc_description: String,
    pub inheritance: Inheritance,
    pub nested_classes: Vec<String>,
    pub deprecated: bool,
    pub since_version: Option<String>,
    pub see_also: Vec<String>,

    pub methods: Vec<EnhancedMethod>,
    pub fields: Vec<EnhancedField>,
    pub constructors: Vec<EnhancedConstructor>,

    pub enhancement_metadata: EnhancementMetadata,
}
