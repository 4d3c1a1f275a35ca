use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::WriteError;

use super::RenderInput;

/// Common interface for derived output artifacts.
pub trait Renderer {
    /// Human-readable name for this renderer.
    fn name(&self) -> &'static str;

    /// Output file name relative to the output directory.
    fn output_path(&self) -> &'static str;

    /// Generate the artifact content.
    fn render(&self, input: &RenderInput<'_>) -> crate::error::Result<String>;

    /// Render and atomically write the artifact, returning its path.
    fn write(&self, input: &RenderInput<'_>, output_dir: &Path) -> crate::error::Result<PathBuf> {
        let content = self.render(input)?;
        let output = output_dir.join(self.output_path());
        atomic_write(&output, content.as_bytes())?;
        Ok(output)
    }
}

/// Pretty JSON with object keys in sorted order.
pub fn to_sorted_json<T: Serialize + ?Sized>(value: &T) -> Result<String, WriteError> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Write through a temp file in the target directory, then rename over the
/// target. The parent directory is created if needed.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|source| WriteError::Io {
            path: tmp.path().to_path_buf(),
            source,
        })?;
    tmp.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
