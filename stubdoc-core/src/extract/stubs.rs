use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::StubError;
use crate::types::{Overload, StubClass, StubConstructor, StubField, StubMethod, StubParam};

use super::LoadStats;

const REQUIRED_TOP_LEVEL: &[&str] = &[
    "class_name",
    "package",
    "extracted_at",
    "extractor_version",
    "methods",
];
const REQUIRED_OVERLOAD: &[&str] = &["signature", "params", "return_type", "java_return_type"];
const REQUIRED_TYPED: &[&str] = &["name", "type", "java_type"];

/// How many entries `stub_statistics` keeps in its most-common tables.
const TOP_ISSUES: usize = 10;

static GENERIC_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^arg\d+$").expect("generic param pattern is valid"));

/// Reflection leaves parameter names as `arg0`, `arg1`, ... when the
/// bytecode has no debug info.
pub fn is_generic_param_name(name: &str) -> bool {
    GENERIC_PARAM.is_match(name)
}

/// Reads reflection-derived JSON stub files from a directory.
#[derive(Debug, Clone)]
pub struct StubReader {
    directory: PathBuf,
    file_pattern: String,
    skip_suffix: String,
}

impl StubReader {
    pub fn new(directory: &Path, file_pattern: &str) -> Self {
        Self {
            directory: directory.to_path_buf(),
            file_pattern: file_pattern.to_string(),
            skip_suffix: "_enhanced".to_string(),
        }
    }

    /// Files whose stem ends with `suffix` are enhanced output, not stubs.
    #[must_use]
    pub fn skip_suffix(mut self, suffix: &str) -> Self {
        self.skip_suffix = suffix.to_string();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Stub files matching the pattern, sorted.
    pub fn find_stub_files(&self) -> Result<Vec<PathBuf>, StubError> {
        if !self.directory.is_dir() {
            return Err(StubError::DirectoryNotFound {
                path: self.directory.clone(),
            });
        }

        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&self.directory.to_string_lossy()),
            self.file_pattern
        );
        let mut files = Vec::new();
        match glob::glob(&full_pattern) {
            Ok(paths) => {
                for entry in paths.flatten() {
                    let is_output = entry
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|s| !self.skip_suffix.is_empty() && s.ends_with(&self.skip_suffix));
                    if entry.is_file() && !is_output {
                        files.push(entry);
                    }
                }
            }
            Err(e) => warn!(pattern = %self.file_pattern, error = %e, "Invalid glob pattern"),
        }

        files.sort();
        info!(count = files.len(), dir = %self.directory.display(), "Found stub files");
        Ok(files)
    }

    /// Load one stub file.
    ///
    /// Unreadable or undecodable files are errors. Schema problems are
    /// recorded in `validation_errors` and the stub is still returned.
    pub fn load_stub(&self, path: &Path) -> Result<StubClass, StubError> {
        load_stub_file(path)
    }

    /// Load every stub in the directory, keyed by class name.
    ///
    /// A second class with the same simple name is keyed `package.ClassName`.
    #[instrument(skip_all, name = "stub_load")]
    pub fn load_all(&self) -> Result<(BTreeMap<String, StubClass>, LoadStats), StubError> {
        let start = Instant::now();
        let mut stats = LoadStats::default();
        let mut stubs = BTreeMap::new();

        for path in self.find_stub_files()? {
            match load_stub_file(&path) {
                Ok(stub) => {
                    let mut key = stub.class_name.clone();
                    if stubs.contains_key(&key) {
                        key = stub.qualified_name();
                        warn!(
                            class = %stub.class_name,
                            key = %key,
                            "Duplicate class name, using qualified key"
                        );
                    }
                    stats.loaded += 1;
                    stubs.insert(key, stub);
                }
                Err(e) => {
                    let path_str = path.to_string_lossy().to_string();
                    warn!(path = %path_str, error = %e, "Failed to load stub");
                    stats.record_error(path_str, e);
                }
            }
        }

        stats.duration = start.elapsed();
        info!(
            loaded = stats.loaded,
            failed = stats.errors.len(),
            duration = ?stats.duration,
            "Stub loading complete"
        );
        Ok((stubs, stats))
    }
}

/// Read, decode, and validate one stub file.
pub fn load_stub_file(path: &Path) -> Result<StubClass, StubError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StubError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| StubError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Some(object) = value.as_object() else {
        return Err(StubError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    let mut stub = stub_from_object(object);
    stub.file_path = Some(path.to_path_buf());
    if stub.is_valid() {
        debug!(class = %stub.class_name, "Loaded stub");
    } else {
        warn!(
            path = %path.display(),
            errors = stub.validation_errors.len(),
            "Stub has validation errors"
        );
        for error in &stub.validation_errors {
            debug!(path = %path.display(), "{error}");
        }
    }
    Ok(stub)
}

// ── Schema walk ────────────────────────────────────────────────────

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn text_or(object: &Map<String, Value>, key: &str, fallback: &str) -> String {
    text(object, key).unwrap_or_else(|| fallback.to_string())
}

fn entries<'a>(object: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    object
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Build a stub from a decoded JSON object, collecting schema violations.
pub fn stub_from_object(object: &Map<String, Value>) -> StubClass {
    let mut errors: Vec<String> = REQUIRED_TOP_LEVEL
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| format!("Missing required field: {field}"))
        .collect();

    let mut stub = StubClass {
        class_name: text_or(object, "class_name", "Unknown"),
        package: text_or(object, "package", "unknown"),
        extracted_at: text_or(object, "extracted_at", ""),
        extractor_version: text_or(object, "extractor_version", ""),
        methods: Vec::new(),
        fields: Vec::new(),
        constructors: Vec::new(),
        file_path: None,
        validation_errors: Vec::new(),
    };
    if !errors.is_empty() {
        stub.validation_errors = errors;
        return stub;
    }

    stub.methods = entries(object, "methods")
        .filter_map(|v| parse_method(v, &mut errors))
        .collect();
    stub.fields = entries(object, "fields")
        .filter_map(|v| parse_field(v, &mut errors))
        .collect();
    stub.constructors = entries(object, "constructors")
        .filter_map(|v| parse_constructor(v, &mut errors))
        .collect();
    stub.validation_errors = errors;
    stub
}

/// Name and overloads shared by methods and constructors.
fn parse_overloaded(
    value: &Value,
    kind: &str,
    errors: &mut Vec<String>,
) -> Option<(String, Vec<Overload>, String)> {
    let Some(object) = value.as_object() else {
        errors.push(format!("{kind} entry is not an object"));
        return None;
    };
    let Some(name) = text(object, "name") else {
        errors.push(format!("{kind} missing 'name' field"));
        return None;
    };
    if !object.contains_key("overloads") {
        errors.push(format!("{kind} {name} missing 'overloads' field"));
        return None;
    }
    let overloads = entries(object, "overloads")
        .filter_map(|o| parse_overload(o, kind, &name, errors))
        .collect();
    let documentation = text_or(object, "documentation", "");
    Some((name, overloads, documentation))
}

fn parse_method(value: &Value, errors: &mut Vec<String>) -> Option<StubMethod> {
    let (name, overloads, documentation) = parse_overloaded(value, "Method", errors)?;
    Some(StubMethod {
        name,
        overloads,
        documentation,
    })
}

fn parse_constructor(value: &Value, errors: &mut Vec<String>) -> Option<StubConstructor> {
    let (name, overloads, documentation) = parse_overloaded(value, "Constructor", errors)?;
    Some(StubConstructor {
        name,
        overloads,
        documentation,
    })
}

fn parse_overload(value: &Value, kind: &str, owner: &str, errors: &mut Vec<String>) -> Option<Overload> {
    let object = value.as_object()?;
    if let Some(field) = REQUIRED_OVERLOAD.iter().find(|f| !object.contains_key(**f)) {
        errors.push(format!("{kind} {owner} overload missing '{field}' field"));
        return None;
    }
    let params = entries(object, "params")
        .filter_map(|p| {
            let param = p.as_object()?;
            if let Some(field) = REQUIRED_TYPED.iter().find(|f| !param.contains_key(**f)) {
                errors.push(format!("{kind} {owner} parameter missing '{field}' field"));
                return None;
            }
            Some(StubParam {
                name: text_or(param, "name", ""),
                ty: text_or(param, "type", ""),
                java_type: text_or(param, "java_type", ""),
            })
        })
        .collect();

    Some(Overload {
        signature: text_or(object, "signature", ""),
        params,
        return_type: text_or(object, "return_type", ""),
        java_return_type: text_or(object, "java_return_type", ""),
    })
}

fn parse_field(value: &Value, errors: &mut Vec<String>) -> Option<StubField> {
    let object = value.as_object()?;
    if let Some(field) = REQUIRED_TYPED.iter().find(|f| !object.contains_key(**f)) {
        errors.push(format!("Field missing '{field}' field"));
        return None;
    }
    Some(StubField {
        name: text_or(object, "name", ""),
        ty: text_or(object, "type", ""),
        java_type: text_or(object, "java_type", ""),
        documentation: text_or(object, "documentation", ""),
    })
}

// ── Structural validation ──────────────────────────────────────────

/// Deeper checks on a loaded stub than schema presence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StubValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub statistics: StubStructureStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StubStructureStats {
    pub total_methods: usize,
    pub total_constructors: usize,
    pub total_fields: usize,
    pub methods_with_overloads: usize,
    pub constructors_with_overloads: usize,
    pub methods_with_documentation: usize,
    pub unique_method_names: usize,
    /// Parameter count → number of overloads.
    pub parameter_count_distribution: BTreeMap<usize, usize>,
}

pub fn validate_structure(stub: &StubClass) -> StubValidation {
    let mut errors = stub.validation_errors.clone();
    let mut warnings = Vec::new();
    let mut stats = StubStructureStats {
        total_methods: stub.methods.len(),
        total_constructors: stub.constructors.len(),
        total_fields: stub.fields.len(),
        ..StubStructureStats::default()
    };
    let mut names = BTreeSet::new();

    for method in &stub.methods {
        names.insert(method.name.as_str());
        if method.overloads.len() > 1 {
            stats.methods_with_overloads += 1;
        }
        let placeholder = format!("Java method: {}", method.name);
        if !method.documentation.is_empty() && method.documentation != placeholder {
            stats.methods_with_documentation += 1;
        }
        for overload in &method.overloads {
            *stats
                .parameter_count_distribution
                .entry(overload.params.len())
                .or_default() += 1;
            let generic: Vec<&str> = overload
                .params
                .iter()
                .map(|p| p.name.as_str())
                .filter(|n| is_generic_param_name(n))
                .collect();
            if !generic.is_empty() {
                warnings.push(format!(
                    "Method {} has generic parameter names: {}",
                    method.name,
                    generic.join(", ")
                ));
            }
        }
    }
    stats.unique_method_names = names.len();
    stats.constructors_with_overloads = stub
        .constructors
        .iter()
        .filter(|c| c.overloads.len() > 1)
        .count();

    if stats.methods_with_documentation == 0 && stats.total_methods > 0 {
        warnings.push("No methods have meaningful documentation".to_string());
    }
    if names.len() != stub.methods.len() {
        errors.push("Duplicate method names found (should use overloads)".to_string());
    }

    StubValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
        statistics: stats,
    }
}

/// Aggregate view over a loaded stub set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StubStatistics {
    pub total_classes: usize,
    pub valid_classes: usize,
    pub invalid_classes: usize,
    pub total_methods: usize,
    pub total_constructors: usize,
    pub total_fields: usize,
    pub packages: BTreeSet<String>,
    pub extractor_versions: BTreeSet<String>,
    pub classes_by_package: BTreeMap<String, Vec<String>>,
    pub classes_with_errors: usize,
    pub classes_with_warnings: usize,
    /// Most frequent messages first.
    pub common_errors: Vec<(String, usize)>,
    pub common_warnings: Vec<(String, usize)>,
}

pub fn stub_statistics(stubs: &BTreeMap<String, StubClass>) -> StubStatistics {
    let mut stats = StubStatistics {
        total_classes: stubs.len(),
        ..StubStatistics::default()
    };
    let mut errors: BTreeMap<String, usize> = BTreeMap::new();
    let mut warnings: BTreeMap<String, usize> = BTreeMap::new();

    for (key, stub) in stubs {
        if stub.is_valid() {
            stats.valid_classes += 1;
        } else {
            stats.invalid_classes += 1;
        }
        stats.total_methods += stub.methods.len();
        stats.total_constructors += stub.constructors.len();
        stats.total_fields += stub.fields.len();
        stats.packages.insert(stub.package.clone());
        stats.extractor_versions.insert(stub.extractor_version.clone());
        stats
            .classes_by_package
            .entry(stub.package.clone())
            .or_default()
            .push(key.clone());

        let validation = validate_structure(stub);
        if !validation.errors.is_empty() {
            stats.classes_with_errors += 1;
        }
        if !validation.warnings.is_empty() {
            stats.classes_with_warnings += 1;
        }
        for e in validation.errors {
            *errors.entry(e).or_default() += 1;
        }
        for w in validation.warnings {
            *warnings.entry(w).or_default() += 1;
        }
    }

    stats.common_errors = most_common(errors);
    stats.common_warnings = most_common(warnings);
    stats
}

fn most_common(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_ISSUES);
    ranked
}
