// Pipeline orchestrator: load stubs → parse JavaDoc → match and enhance →
// write, collecting per-stage errors instead of aborting.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::analyze::enhance::{EnhancementReport, Enhancer};
use crate::analyze::matcher::MatchReport;
use crate::config::StubdocConfig;
use crate::error::{JavadocError, StubdocError};
use crate::extract::javadoc::{ClassRequest, JavadocParser};
use crate::extract::stubs::StubReader;
use crate::progress::{ProgressReporter, Stage};
use crate::render::RenderInput;
use crate::render::index::MethodIndexRenderer;
use crate::render::json_writer::EnhancedJsonWriter;
use crate::render::report::{EnhancementReportRenderer, MatchReportRenderer};
use crate::render::traits::Renderer;
use crate::types::EnhancedStub;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Restrict the run to these class names (simple or stub keys).
    pub classes: Option<Vec<String>>,
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Overrides `[output] directory`.
    pub output_dir: Option<PathBuf>,
}

/// A non-fatal failure attributed to one stage and one subject.
#[derive(Debug, Clone)]
pub struct StageError {
    pub stage: Stage,
    pub subject: String,
    pub message: String,
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.subject, self.message)
    }
}

#[derive(Debug)]
pub struct PipelineResult {
    pub stubs_loaded: usize,
    pub javadoc_parsed: usize,
    /// Classes whose JavaDoc page could not be found; they are enhanced
    /// with categories only.
    pub missing_javadoc: Vec<String>,
    pub enhanced: BTreeMap<String, EnhancedStub>,
    pub match_report: MatchReport,
    pub enhancement_report: EnhancementReport,
    pub written: Vec<PathBuf>,
    pub errors: Vec<StageError>,
    pub duration: Duration,
}

impl PipelineResult {
    /// Some classes or artifacts failed while the rest succeeded.
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs the whole enhancement flow for one configuration.
#[derive(Debug)]
pub struct StubdocPipeline {
    config: StubdocConfig,
}

impl StubdocPipeline {
    pub fn new(config: StubdocConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StubdocConfig {
        &self.config
    }

    /// The enhanced-file writer this pipeline uses, honoring an output override.
    ///
    /// With an output override, a backup directory that lives under the
    /// configured output directory moves along with it.
    pub fn writer(&self, options: &PipelineOptions) -> EnhancedJsonWriter {
        let writer = EnhancedJsonWriter::from_config(&self.config);
        let Some(dir) = &options.output_dir else {
            return writer;
        };
        let backups = &self.config.backups;
        let writer = writer.in_dir(dir);
        match backups.directory.strip_prefix(&self.config.output.directory) {
            Ok(relative) if backups.enabled => writer.with_backups(dir.join(relative)),
            _ => writer,
        }
    }

    /// Execute the pipeline.
    ///
    /// Only a missing or unreadable stub directory is fatal; every other
    /// failure lands in [`PipelineResult::errors`].
    #[instrument(skip_all, name = "pipeline")]
    pub fn run(
        &self,
        options: &PipelineOptions,
        reporter: &dyn ProgressReporter,
    ) -> crate::error::Result<PipelineResult> {
        let start = Instant::now();
        let mut errors = Vec::new();

        // ── Stubs ──
        reporter.begin_stage(Stage::LoadStubs, None);
        let reader = StubReader::new(&self.config.stubs.directory, &self.config.stubs.file_pattern)
            .skip_suffix(&self.config.output.enhanced_suffix);
        let (mut stubs, load_stats) = reader.load_all()?;
        for (subject, e) in load_stats.errors {
            reporter.warn(&format!("{subject}: {e}"));
            errors.push(StageError {
                stage: Stage::LoadStubs,
                subject,
                message: e.to_string(),
            });
        }
        for (key, stub) in &stubs {
            if !stub.is_valid() {
                warn!(class = %key, issues = stub.validation_errors.len(), "Stub has schema problems");
            }
            reporter.class_done(key);
        }
        reporter.end_stage();

        if let Some(wanted) = &options.classes {
            let wanted: BTreeSet<&str> = wanted.iter().map(String::as_str).collect();
            stubs.retain(|key, stub| {
                wanted.contains(key.as_str()) || wanted.contains(stub.class_name.as_str())
            });
            for name in wanted {
                let present = stubs.iter().any(|(key, s)| key == name || s.class_name == name);
                if !present {
                    errors.push(StageError {
                        stage: Stage::LoadStubs,
                        subject: name.to_string(),
                        message: "no stub file for this class".into(),
                    });
                }
            }
        }
        let stubs_loaded = stubs.len();

        // ── JavaDoc ──
        let requests: Vec<ClassRequest> = stubs
            .iter()
            .map(|(key, stub)| ClassRequest::for_stub(key, stub))
            .collect();
        reporter.begin_stage(Stage::ParseJavadoc, Some(requests.len() as u64));
        let parser = JavadocParser::new(&self.config.javadoc.root, &self.config.javadoc.packages);
        let (javadoc, parse_stats) = parser.parse_all(Some(&requests));
        let mut missing_javadoc = Vec::new();
        for (subject, e) in parse_stats.errors {
            match e {
                StubdocError::Javadoc(JavadocError::NotFound { .. }) => missing_javadoc.push(subject),
                other => {
                    reporter.warn(&format!("{subject}: {other}"));
                    errors.push(StageError {
                        stage: Stage::ParseJavadoc,
                        subject,
                        message: other.to_string(),
                    });
                }
            }
        }
        for name in javadoc.keys() {
            reporter.class_done(name);
        }
        reporter.end_stage();

        // ── Match and enhance ──
        reporter.begin_stage(Stage::Enhance, Some(stubs.len() as u64));
        let enhancer = Enhancer::new(&self.config.matching);
        let batch = enhancer.enhance_all_with(&stubs, &javadoc, |class| reporter.class_done(class));
        reporter.end_stage();

        let match_report = MatchReport::from_results(&batch.match_results);
        let enhancement_report = EnhancementReport::from_stubs(&batch.enhanced);

        // ── Write ──
        let mut written = Vec::new();
        if options.dry_run {
            info!(classes = batch.enhanced.len(), "Dry run, nothing written");
        } else {
            let input = RenderInput {
                enhanced: &batch.enhanced,
                match_report: &match_report,
                enhancement_report: &enhancement_report,
            };
            written = self.write_outputs(options, &input, &mut errors, reporter);
        }

        let result = PipelineResult {
            stubs_loaded,
            javadoc_parsed: javadoc.len(),
            missing_javadoc,
            enhanced: batch.enhanced,
            match_report,
            enhancement_report,
            written,
            errors,
            duration: start.elapsed(),
        };
        info!(
            stubs = result.stubs_loaded,
            javadoc = result.javadoc_parsed,
            written = result.written.len(),
            errors = result.errors.len(),
            duration = ?result.duration,
            "Pipeline complete"
        );
        Ok(result)
    }

    fn write_outputs(
        &self,
        options: &PipelineOptions,
        input: &RenderInput<'_>,
        errors: &mut Vec<StageError>,
        reporter: &dyn ProgressReporter,
    ) -> Vec<PathBuf> {
        let writer = self.writer(options);
        reporter.begin_stage(Stage::Write, Some(input.enhanced.len() as u64));
        let stats = writer.write_all(input.enhanced);
        for path in &stats.written {
            let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            reporter.class_done(name);
        }
        for (subject, e) in stats.errors {
            reporter.warn(&format!("{subject}: {e}"));
            errors.push(StageError {
                stage: Stage::Write,
                subject,
                message: e.to_string(),
            });
        }
        let mut written = stats.written;

        let mut renderers: Vec<Box<dyn Renderer>> = Vec::new();
        if self.config.output.write_index {
            renderers.push(Box::new(MethodIndexRenderer));
        }
        if self.config.output.write_reports {
            renderers.push(Box::new(MatchReportRenderer));
            renderers.push(Box::new(EnhancementReportRenderer));
        }
        for renderer in renderers {
            match renderer.write(input, writer.output_dir()) {
                Ok(path) => written.push(path),
                Err(e) => {
                    warn!(renderer = renderer.name(), error = %e, "Renderer failed");
                    errors.push(StageError {
                        stage: Stage::Write,
                        subject: renderer.output_path().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        reporter.end_stage();
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopReporter;

    const STUB: &str = r#"{
        "class_name": "Tree",
        "package": "sc.fiji.snt",
        "extracted_at": "2025-01-01T00:00:00",
        "extractor_version": "1.0",
        "methods": [
            {"name": "getLength", "overloads": [
                {"signature": "() -> float", "params": [], "return_type": "float", "java_return_type": "double"}
            ]}
        ],
        "fields": [],
        "constructors": []
    }"#;

    fn config_in(root: &std::path::Path) -> StubdocConfig {
        let stubs = root.join("stubs");
        std::fs::create_dir_all(&stubs).unwrap();
        std::fs::write(stubs.join("Tree.json"), STUB).unwrap();
        std::fs::write(stubs.join("Broken.json"), "{ not json").unwrap();

        let mut config = StubdocConfig::default();
        config.resolve_paths(root);
        config
    }

    #[test]
    fn stubs_without_javadoc_are_enhanced_and_written() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let pipeline = StubdocPipeline::new(config);

        let result = pipeline.run(&PipelineOptions::default(), &NoopReporter).unwrap();
        assert_eq!(result.stubs_loaded, 1);
        assert_eq!(result.javadoc_parsed, 0);
        assert_eq!(result.missing_javadoc, vec!["Tree"]);
        assert!(result.is_partial(), "broken stub is reported");
        assert_eq!(result.errors[0].stage, Stage::LoadStubs);

        let out = tmp.path().join("enhanced");
        assert!(out.join("Tree_enhanced.json").is_file());
        assert!(out.join("method_index.json").is_file());
        assert!(out.join("matching_report.json").is_file());
        assert!(out.join("enhancement_report.json").is_file());
        assert_eq!(result.written.len(), 4);
        assert_eq!(result.match_report.summary.classes_json_only, 1);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = StubdocPipeline::new(config_in(tmp.path()));
        let options = PipelineOptions {
            dry_run: true,
            ..PipelineOptions::default()
        };
        let result = pipeline.run(&options, &NoopReporter).unwrap();
        assert!(result.written.is_empty());
        assert_eq!(result.enhanced.len(), 1);
        assert!(!tmp.path().join("enhanced").exists());
    }

    #[test]
    fn unknown_requested_class_is_an_error_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = StubdocPipeline::new(config_in(tmp.path()));
        let options = PipelineOptions {
            classes: Some(vec!["Tree".into(), "Graph".into()]),
            dry_run: true,
            ..PipelineOptions::default()
        };
        let result = pipeline.run(&options, &NoopReporter).unwrap();
        assert_eq!(result.stubs_loaded, 1);
        assert!(result.errors.iter().any(|e| e.subject == "Graph"));
    }

    #[test]
    fn output_override_carries_nested_backup_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = StubdocPipeline::new(config_in(tmp.path()));
        let elsewhere = tmp.path().join("out");
        let options = PipelineOptions {
            output_dir: Some(elsewhere.clone()),
            ..PipelineOptions::default()
        };
        let writer = pipeline.writer(&options);
        assert_eq!(writer.output_dir(), elsewhere.as_path());
        assert_eq!(writer.backup_dir(), Some(elsewhere.join(".backups").as_path()));

        // A backup directory outside the output directory stays put.
        let mut config = config_in(tmp.path());
        config.backups.directory = tmp.path().join("saved");
        let writer = StubdocPipeline::new(config).writer(&options);
        assert_eq!(writer.backup_dir(), Some(tmp.path().join("saved").as_path()));

        let writer = pipeline.writer(&PipelineOptions::default());
        assert_eq!(writer.backup_dir(), Some(tmp.path().join("enhanced/.backups").as_path()));
    }

    #[test]
    fn missing_stub_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = StubdocConfig::default();
        config.resolve_paths(tmp.path());
        let err = StubdocPipeline::new(config)
            .run(&PipelineOptions::default(), &NoopReporter)
            .unwrap_err();
        assert!(matches!(err, StubdocError::Stub(_)));
        assert!(err.to_string().contains("not found"));
    }
}
