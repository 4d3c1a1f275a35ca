pub mod index;
pub mod json_writer;
pub mod report;
pub mod traits;

use std::collections::BTreeMap;

use crate::analyze::enhance::EnhancementReport;
use crate::analyze::matcher::MatchReport;
use crate::types::EnhancedStub;

/// Everything a renderer may draw on, borrowed from a finished pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub enhanced: &'a BTreeMap<String, EnhancedStub>,
    pub match_report: &'a MatchReport,
    pub enhancement_report: &'a EnhancementReport,
}
