//! Writing `<ClassName>_enhanced.json` files, with timestamped backups.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::StubdocConfig;
use crate::error::WriteError;
use crate::types::EnhancedStub;

use super::traits::{atomic_write, to_sorted_json};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Top-level keys every enhanced file must carry.
const REQUIRED_FIELDS: [&str; 7] = [
    "class_name",
    "package",
    "extracted_at",
    "extractor_version",
    "enhancement_timestamp",
    "enhancement_version",
    "methods",
];

#[derive(Debug, Clone)]
pub struct EnhancedJsonWriter {
    output_dir: PathBuf,
    suffix: String,
    backup_dir: Option<PathBuf>,
}

/// Outcome of [`EnhancedJsonWriter::write_all`].
#[derive(Debug, Default)]
pub struct WriteStats {
    pub written: Vec<PathBuf>,
    pub backups: usize,
    pub errors: Vec<(String, WriteError)>,
}

impl EnhancedJsonWriter {
    pub fn new(output_dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            suffix: suffix.into(),
            backup_dir: None,
        }
    }

    /// Copy existing targets into `dir` before overwriting them.
    #[must_use]
    pub fn with_backups(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    pub fn from_config(config: &StubdocConfig) -> Self {
        let writer = Self::new(&config.output.directory, &config.output.enhanced_suffix);
        if config.backups.enabled {
            writer.with_backups(&config.backups.directory)
        } else {
            writer
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn backup_dir(&self) -> Option<&Path> {
        self.backup_dir.as_deref()
    }

    /// Point the writer at a different directory, keeping other settings.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn target_path(&self, class_name: &str) -> PathBuf {
        self.output_dir.join(format!("{class_name}{}.json", self.suffix))
    }

    /// Serialized form of an enhanced stub, exactly as it is written.
    pub fn render(stub: &EnhancedStub) -> Result<String, WriteError> {
        to_sorted_json(stub)
    }

    /// Write one stub under its simple class name, backing up any existing
    /// file first.
    pub fn write(&self, stub: &EnhancedStub) -> Result<PathBuf, WriteError> {
        self.write_named(&stub.class_name, stub)
    }

    /// Write one stub to `<name><suffix>.json`.
    pub fn write_named(&self, name: &str, stub: &EnhancedStub) -> Result<PathBuf, WriteError> {
        let target = self.target_path(name);
        let content = Self::render(stub)?;
        if target.exists() {
            self.backup(&target)?;
        }
        atomic_write(&target, content.as_bytes())?;
        debug!(class = %name, path = %target.display(), "Wrote enhanced stub");
        Ok(target)
    }

    /// Write every stub under its map key, so classes sharing a simple
    /// name land in separate files. Failures are recorded and the batch
    /// continues.
    #[instrument(skip_all, name = "write_enhanced")]
    pub fn write_all(&self, stubs: &BTreeMap<String, EnhancedStub>) -> WriteStats {
        let mut stats = WriteStats::default();
        for (name, stub) in stubs {
            let had_target = self.backup_dir.is_some() && self.target_path(name).exists();
            match self.write_named(name, stub) {
                Ok(path) => {
                    if had_target {
                        stats.backups += 1;
                    }
                    stats.written.push(path);
                }
                Err(e) => {
                    warn!(class = %name, error = %e, "Failed to write enhanced stub");
                    stats.errors.push((name.clone(), e));
                }
            }
        }
        info!(
            written = stats.written.len(),
            failed = stats.errors.len(),
            "Enhanced stubs written"
        );
        stats
    }

    /// Copy `path` to `<backup_dir>/<stem>_<YYYYmmdd_HHMMSS>.json`. A no-op
    /// when backups are disabled.
    pub fn backup(&self, path: &Path) -> Result<Option<PathBuf>, WriteError> {
        let Some(dir) = &self.backup_dir else {
            return Ok(None);
        };
        std::fs::create_dir_all(dir).map_err(|source| WriteError::Io {
            path: dir.clone(),
            source,
        })?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("backup");
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let backup = dir.join(format!("{stem}_{stamp}.json"));
        std::fs::copy(path, &backup).map_err(|source| WriteError::Io {
            path: backup.clone(),
            source,
        })?;
        debug!(path = %backup.display(), "Created backup");
        Ok(Some(backup))
    }

    /// Delete backups whose modification time is older than `keep_days`.
    /// Returns the number of files removed.
    pub fn cleanup_backups(&self, keep_days: u32) -> usize {
        let Some(dir) = &self.backup_dir else {
            return 0;
        };
        if !dir.is_dir() {
            return 0;
        }
        let retention = Duration::from_secs(u64::from(keep_days) * SECONDS_PER_DAY);
        let Some(cutoff) = SystemTime::now().checked_sub(retention) else {
            return 0;
        };

        let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));
        let mut deleted = 0;
        match glob::glob(&pattern) {
            Ok(paths) => {
                for entry in paths.flatten() {
                    let modified = std::fs::metadata(&entry).and_then(|m| m.modified());
                    match modified {
                        Ok(mtime) if mtime < cutoff => match std::fs::remove_file(&entry) {
                            Ok(()) => {
                                debug!(path = %entry.display(), "Deleted old backup");
                                deleted += 1;
                            }
                            Err(e) => warn!(path = %entry.display(), error = %e, "Cannot delete backup"),
                        },
                        Ok(_) => {}
                        Err(e) => warn!(path = %entry.display(), error = %e, "Cannot stat backup"),
                    }
                }
            }
            Err(e) => warn!(pattern = %pattern, error = %e, "Invalid glob pattern"),
        }
        info!(deleted, keep_days, "Backup cleanup complete");
        deleted
    }
}

// ── Validation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnhancedFileValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub statistics: EnhancedFileStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnhancedFileStats {
    pub file_size: u64,
    pub methods_count: usize,
    /// Methods with at least one overload carrying a return description or throws.
    pub enhanced_methods_count: usize,
    pub methods_with_javadoc: usize,
    pub methods_with_examples: usize,
    pub categories: BTreeMap<String, usize>,
}

/// Check a written enhanced file for required fields and gather statistics.
pub fn validate_enhanced_file(path: &Path) -> EnhancedFileValidation {
    let mut validation = EnhancedFileValidation::default();

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            validation.errors.push(format!("File does not exist: {}", path.display()));
            return validation;
        }
        Err(e) => {
            validation.errors.push(format!("Cannot read {}: {e}", path.display()));
            return validation;
        }
    };
    validation.statistics.file_size = raw.len() as u64;

    let data: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            validation.errors.push(format!("JSON decode error: {e}"));
            return validation;
        }
    };
    let Some(object) = data.as_object() else {
        validation.errors.push("Top level is not a JSON object".into());
        return validation;
    };

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            validation.errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(methods) = object.get("methods").and_then(Value::as_array) {
        let stats = &mut validation.statistics;
        stats.methods_count = methods.len();
        for method in methods {
            if method["javadoc_description"].as_str().is_some_and(|s| !s.is_empty()) {
                stats.methods_with_javadoc += 1;
            }
            if method["examples"].as_array().is_some_and(|a| !a.is_empty()) {
                stats.methods_with_examples += 1;
            }
            let category = method["category"].as_str().unwrap_or("Unknown").to_string();
            *stats.categories.entry(category).or_default() += 1;

            let enhanced = method["overloads"].as_array().is_some_and(|overloads| {
                overloads.iter().any(|o| {
                    o["return_description"].as_str().is_some_and(|s| !s.is_empty())
                        || o["throws"].as_object().is_some_and(|t| !t.is_empty())
                })
            });
            if enhanced {
                stats.enhanced_methods_count += 1;
            }
        }
    }

    if !object.contains_key("enhancement_metadata") {
        validation.warnings.push("Missing enhancement metadata".into());
    }
    let class_description = object.get("javadoc_description").and_then(Value::as_str);
    if !class_description.is_some_and(|s| !s.is_empty()) {
        validation.warnings.push("No class-level JavaDoc description".into());
    }

    validation.valid = validation.errors.is_empty();
    validation
}
