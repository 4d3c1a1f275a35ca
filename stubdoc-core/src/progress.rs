//! Progress reporting for pipeline stages.
//!
//! The CLI uses `IndicatifReporter` for a per-stage progress bar.
//! Library callers can use `NoopReporter` or provide their own implementation.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadStubs,
    ParseJavadoc,
    Enhance,
    Write,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::LoadStubs => "Loading stubs",
            Self::ParseJavadoc => "Parsing JavaDoc",
            Self::Enhance => "Enhancing",
            Self::Write => "Writing output",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives stage and per-class progress from the pipeline.
pub trait ProgressReporter {
    /// A stage begins; `total` is the number of classes it will touch, if known.
    fn begin_stage(&self, stage: Stage, total: Option<u64>);

    /// One class finished within the current stage.
    fn class_done(&self, class: &str);

    /// The current stage finished.
    fn end_stage(&self);

    /// A non-fatal problem worth surfacing to the user.
    fn warn(&self, message: &str);
}

/// No-op reporter for library callers that don't need progress output.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn begin_stage(&self, _stage: Stage, _total: Option<u64>) {}
    fn class_done(&self, _class: &str) {}
    fn end_stage(&self) {}
    fn warn(&self, _message: &str) {}
}

/// Reporter backed by an `indicatif` bar on stderr.
#[derive(Debug)]
pub struct IndicatifReporter {
    bar: ProgressBar,
}

impl Default for IndicatifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatifReporter {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A reporter that tracks state but never draws.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(0), target),
        }
    }

    /// Classes completed in the current stage.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

fn counted_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("=> "))
}

fn open_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix} {pos} classes {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl ProgressReporter for IndicatifReporter {
    fn begin_stage(&self, stage: Stage, total: Option<u64>) {
        self.bar.reset();
        match total {
            Some(total) => {
                self.bar.set_length(total);
                self.bar.set_style(counted_style());
            }
            None => {
                self.bar.set_length(0);
                self.bar.set_style(open_style());
            }
        }
        self.bar.set_prefix(stage.label());
        self.bar.set_message("");
    }

    fn class_done(&self, class: &str) {
        self.bar.set_message(class.to_string());
        self.bar.inc(1);
    }

    fn end_stage(&self) {
        self.bar.finish_and_clear();
    }

    fn warn(&self, message: &str) {
        self.bar.suspend(|| eprintln!("warning: {message}"));
    }
}
