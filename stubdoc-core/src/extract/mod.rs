pub mod html_text;
pub mod javadoc;
pub mod signature;
pub mod stubs;

use std::time::Duration;

use crate::error::StubdocError;

/// Statistics returned by a loader after a batch run.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
    pub duration: Duration,
    pub errors: Vec<(String, StubdocError)>,
}

impl LoadStats {
    /// Record a per-item failure without aborting the batch.
    pub fn record_error(&mut self, name: impl Into<String>, error: impl Into<StubdocError>) {
        self.skipped += 1;
        self.errors.push((name.into(), error.into()));
    }
}
