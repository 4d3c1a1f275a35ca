use std::path::PathBuf;

/// Top-level stubdoc error type.
///
/// All fallible operations in `stubdoc-core` return [`Result<T, StubdocError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum StubdocError {
    /// Error reading or parsing JavaDoc HTML.
    #[error("JavaDoc error: {0}")]
    Javadoc(#[from] JavadocError),

    /// Error reading or decoding a JSON stub file.
    #[error("Stub error: {0}")]
    Stub(#[from] StubError),

    /// Error writing enhanced output or side artifacts.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the JavaDoc HTML parser.
#[derive(thiserror::Error, Debug)]
pub enum JavadocError {
    /// No HTML page exists for the class in any searched location.
    #[error("No JavaDoc page for {class} (searched {searched})")]
    NotFound {
        /// Simple class name that was looked up.
        class: String,
        /// Human-readable list of the locations tried.
        searched: String,
    },

    /// The HTML page exists but could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// Page that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the JSON stub reader.
#[derive(thiserror::Error, Debug)]
pub enum StubError {
    /// The configured stub directory is missing.
    #[error("Stub directory not found: {}", path.display())]
    DirectoryNotFound {
        /// Directory that was expected to hold stub files.
        path: PathBuf,
    },

    /// The stub file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// Stub file that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The stub file is not valid JSON.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        /// Stub file that failed to decode.
        path: PathBuf,
        /// Decoder failure, with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// The stub file decoded but its top level is not a JSON object.
    #[error("Stub {} is not a JSON object", path.display())]
    NotAnObject {
        /// Offending stub file.
        path: PathBuf,
    },
}

/// Errors while writing enhanced stubs, indexes, reports, or backups.
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// Filesystem I/O error writing output.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The temporary file could not be renamed over the target.
    #[error("Atomic rename to {} failed: {source}", path.display())]
    Persist {
        /// Final target path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Errors in stubdoc configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, StubdocError>`.
pub type Result<T> = std::result::Result<T, StubdocError>;
