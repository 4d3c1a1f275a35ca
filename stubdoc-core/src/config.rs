use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stubdoc.toml";

/// How the signature pass scores individual parameter positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParamTypeScoring {
    /// Flat 0.5 per shared parameter; reproduces historical match reports.
    #[default]
    Neutral,
    /// Compare JavaDoc signature types against the stub's Java types.
    Typed,
}

/// Top-level stubdoc configuration, matching `stubdoc.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubdocConfig {
    #[serde(default)]
    pub javadoc: JavadocSection,
    #[serde(default)]
    pub stubs: StubsSection,
    #[serde(default)]
    pub matching: MatchingSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub backups: BackupSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JavadocSection {
    /// Extracted JavaDoc tree (the directory holding `index.html`, or a parent of it).
    pub root: PathBuf,
    /// Packages tried in order when looking up a class page.
    pub packages: Vec<String>,
}

impl Default for JavadocSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("javadoc"),
            packages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StubsSection {
    pub directory: PathBuf,
    pub file_pattern: String,
}

impl Default for StubsSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("stubs"),
            file_pattern: "*.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSection {
    pub fuzzy_threshold: f64,
    pub signature_threshold: f64,
    pub param_type_scoring: ParamTypeScoring,
}

impl Default for MatchingSection {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            signature_threshold: 0.7,
            param_type_scoring: ParamTypeScoring::Neutral,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub directory: PathBuf,
    pub enhanced_suffix: String,
    pub write_index: bool,
    pub write_reports: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("enhanced"),
            enhanced_suffix: "_enhanced".into(),
            write_index: true,
            write_reports: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSection {
    pub enabled: bool,
    pub directory: PathBuf,
    pub keep_days: u32,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("enhanced/.backups"),
            keep_days: 7,
        }
    }
}

impl StubdocConfig {
    /// Read, parse, and validate a config file.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&raw)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse and validate TOML text without touching the filesystem.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render this config as TOML, as written by `stubdoc init`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("matching.fuzzy_threshold", self.matching.fuzzy_threshold),
            ("matching.signature_threshold", self.matching.signature_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.stubs.file_pattern.trim().is_empty() {
            return Err(ConfigError::Invalid("stubs.file_pattern is empty".into()));
        }
        Ok(())
    }

    /// Anchor every relative path at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.javadoc.root,
            &mut self.stubs.directory,
            &mut self.output.directory,
            &mut self.backups.directory,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
