use serde::Serialize;
use tracing::{info, instrument};

use super::RenderInput;
use super::traits::{Renderer, to_sorted_json};

/// A report wrapped with its generation time.
#[derive(Serialize)]
struct Stamped<'a, T: Serialize> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a T,
}

fn stamped<T: Serialize>(report: &T) -> crate::error::Result<String> {
    let out = to_sorted_json(&Stamped {
        generated_at: chrono::Utc::now().to_rfc3339(),
        report,
    })?;
    Ok(out)
}

/// Writes `matching_report.json`.
#[derive(Debug)]
pub struct MatchReportRenderer;

impl Renderer for MatchReportRenderer {
    fn name(&self) -> &'static str {
        "matching_report"
    }

    fn output_path(&self) -> &'static str {
        "matching_report.json"
    }

    #[instrument(skip_all, name = "match_report_render")]
    fn render(&self, input: &RenderInput<'_>) -> crate::error::Result<String> {
        let out = stamped(input.match_report)?;
        info!(bytes = out.len(), "Matching report rendered");
        Ok(out)
    }
}

/// Writes `enhancement_report.json`.
#[derive(Debug)]
pub struct EnhancementReportRenderer;

impl Renderer for EnhancementReportRenderer {
    fn name(&self) -> &'static str {
        "enhancement_report"
    }

    fn output_path(&self) -> &'static str {
        "enhancement_report.json"
    }

    #[instrument(skip_all, name = "enhancement_report_render")]
    fn render(&self, input: &RenderInput<'_>) -> crate::error::Result<String> {
        let out = stamped(input.enhancement_report)?;
        info!(bytes = out.len(), "Enhancement report rendered");
        Ok(out)
    }
}
