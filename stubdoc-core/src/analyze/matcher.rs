//! Pairing JavaDoc methods with stub overloads.
//!
//! Three passes run in order (exact name, signature shape, fuzzy name). Each
//! pass only sees JavaDoc methods that are still unmatched and overloads
//! that are still unused, so no overload ever serves two methods.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{MatchingSection, ParamTypeScoring};
use crate::extract::stubs::is_generic_param_name;
use crate::types::{ClassDoc, MatchType, MethodDoc, Overload, StubClass, StubMethod};

use super::percentage;
use super::similarity::{clean_method_name, name_ratio, overload_similarity};

/// Tolerance for threshold and tie comparisons on computed scores.
const SCORE_EPSILON: f64 = 1e-9;

// ── Records ────────────────────────────────────────────────────────

/// One JavaDoc method paired with one stub overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodMatch {
    pub javadoc_index: usize,
    pub javadoc_name: String,
    pub json_method_index: usize,
    pub json_method_name: String,
    pub overload_index: usize,
    pub overload_signature: String,
    pub confidence: f64,
    pub match_type: MatchType,
    /// `(json_param, javadoc_param)` in positional order.
    pub parameter_mapping: Vec<(String, String)>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMatchStats {
    pub total_javadoc_methods: usize,
    pub total_json_methods: usize,
    pub total_matches: usize,
    pub exact_matches: usize,
    pub signature_matches: usize,
    pub fuzzy_matches: usize,
    pub unmatched_javadoc: usize,
    pub unmatched_json: usize,
    pub match_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMatchResult {
    pub class_name: String,
    pub has_javadoc: bool,
    pub has_stub: bool,
    pub matches: Vec<MethodMatch>,
    pub unmatched_javadoc_methods: Vec<String>,
    pub unmatched_json_methods: Vec<String>,
    pub stats: ClassMatchStats,
}

impl ClassMatchResult {
    /// Degraded result for a class that has JavaDoc but no stub.
    pub fn javadoc_only(doc: &ClassDoc) -> Self {
        Self {
            class_name: doc.class_name.clone(),
            has_javadoc: true,
            has_stub: false,
            matches: Vec::new(),
            unmatched_javadoc_methods: doc.methods.iter().map(|m| m.name.clone()).collect(),
            unmatched_json_methods: Vec::new(),
            stats: ClassMatchStats {
                total_javadoc_methods: doc.methods.len(),
                unmatched_javadoc: doc.methods.len(),
                ..ClassMatchStats::default()
            },
        }
    }

    /// Degraded result for a class that has a stub but no JavaDoc.
    pub fn stub_only(stub: &StubClass) -> Self {
        Self {
            class_name: stub.class_name.clone(),
            has_javadoc: false,
            has_stub: true,
            matches: Vec::new(),
            unmatched_javadoc_methods: Vec::new(),
            unmatched_json_methods: stub.methods.iter().map(|m| m.name.clone()).collect(),
            stats: ClassMatchStats {
                total_json_methods: stub.methods.len(),
                unmatched_json: stub.methods.len(),
                ..ClassMatchStats::default()
            },
        }
    }

    /// The match that consumed a given overload, if any.
    pub fn match_for_overload(&self, method_index: usize, overload_index: usize) -> Option<&MethodMatch> {
        self.matches
            .iter()
            .find(|m| m.json_method_index == method_index && m.overload_index == overload_index)
    }

    pub fn issue_count(&self) -> usize {
        self.matches.iter().map(|m| m.issues.len()).sum()
    }
}

// ── Matcher ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Matcher {
    fuzzy_threshold: f64,
    signature_threshold: f64,
    scoring: ParamTypeScoring,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(&MatchingSection::default())
    }
}

/// Mutable bookkeeping for one class.
struct MatchState {
    doc_matched: Vec<bool>,
    used: BTreeSet<(usize, usize)>,
    matches: Vec<MethodMatch>,
}

impl MatchState {
    fn is_available(&self, method: usize, overload: usize) -> bool {
        !self.used.contains(&(method, overload))
    }
}

impl Matcher {
    pub fn new(config: &MatchingSection) -> Self {
        Self {
            fuzzy_threshold: config.fuzzy_threshold,
            signature_threshold: config.signature_threshold,
            scoring: config.param_type_scoring,
        }
    }

    pub fn match_class(&self, doc: &ClassDoc, stub: &StubClass) -> ClassMatchResult {
        self.match_methods(&doc.class_name, &doc.methods, &stub.methods)
    }

    /// Run all three passes over one class's method lists.
    pub fn match_methods(&self, class_name: &str, docs: &[MethodDoc], stubs: &[StubMethod]) -> ClassMatchResult {
        let doc_names: Vec<String> = docs.iter().map(|d| clean_method_name(&d.name)).collect();
        let stub_names: Vec<String> = stubs.iter().map(|s| clean_method_name(&s.name)).collect();
        let mut state = MatchState {
            doc_matched: vec![false; docs.len()],
            used: BTreeSet::new(),
            matches: Vec::new(),
        };

        self.exact_pass(docs, stubs, &doc_names, &stub_names, &mut state);
        self.signature_pass(docs, stubs, &doc_names, &stub_names, &mut state);
        self.fuzzy_pass(docs, stubs, &doc_names, &stub_names, &mut state);

        let unmatched_javadoc_methods: Vec<String> = docs
            .iter()
            .zip(&state.doc_matched)
            .filter(|(_, matched)| !**matched)
            .map(|(d, _)| d.name.clone())
            .collect();
        let unmatched_json_methods: Vec<String> = stubs
            .iter()
            .enumerate()
            .filter(|(mi, _)| !state.used.iter().any(|(used_mi, _)| used_mi == mi))
            .map(|(_, s)| s.name.clone())
            .collect();

        let count = |kind: MatchType| state.matches.iter().filter(|m| m.match_type == kind).count();
        let stats = ClassMatchStats {
            total_javadoc_methods: docs.len(),
            total_json_methods: stubs.len(),
            total_matches: state.matches.len(),
            exact_matches: count(MatchType::Exact),
            signature_matches: count(MatchType::Signature),
            fuzzy_matches: count(MatchType::Fuzzy),
            unmatched_javadoc: unmatched_javadoc_methods.len(),
            unmatched_json: unmatched_json_methods.len(),
            match_percentage: percentage(state.matches.len(), docs.len()),
        };
        debug!(
            class = class_name,
            exact = stats.exact_matches,
            signature = stats.signature_matches,
            fuzzy = stats.fuzzy_matches,
            unmatched = stats.unmatched_javadoc,
            "Matched class"
        );

        ClassMatchResult {
            class_name: class_name.to_string(),
            has_javadoc: true,
            has_stub: true,
            matches: state.matches,
            unmatched_javadoc_methods,
            unmatched_json_methods,
            stats,
        }
    }

    /// Match every class; classes present in only one source get a
    /// degraded result.
    #[instrument(skip_all, name = "match_classes")]
    pub fn match_classes(
        &self,
        javadoc: &BTreeMap<String, ClassDoc>,
        stubs: &BTreeMap<String, StubClass>,
    ) -> BTreeMap<String, ClassMatchResult> {
        let mut results = BTreeMap::new();
        for (name, stub) in stubs {
            let result = match javadoc.get(name) {
                Some(doc) => self.match_class(doc, stub),
                None => ClassMatchResult::stub_only(stub),
            };
            results.insert(name.clone(), result);
        }
        for (name, doc) in javadoc {
            if !stubs.contains_key(name) {
                results.insert(name.clone(), ClassMatchResult::javadoc_only(doc));
            }
        }
        info!(
            classes = results.len(),
            both = results.values().filter(|r| r.has_javadoc && r.has_stub).count(),
            "Matching complete"
        );
        results
    }

    fn best_available_overload(
        &self,
        doc: &MethodDoc,
        method_index: usize,
        method: &StubMethod,
        state: &MatchState,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (oi, overload) in method.overloads.iter().enumerate() {
            if !state.is_available(method_index, oi) {
                continue;
            }
            let score = overload_similarity(doc, overload, self.scoring);
            if best.is_none_or(|(_, s)| score > s + SCORE_EPSILON) {
                best = Some((oi, score));
            }
        }
        best
    }

    fn exact_pass(
        &self,
        docs: &[MethodDoc],
        stubs: &[StubMethod],
        doc_names: &[String],
        stub_names: &[String],
        state: &mut MatchState,
    ) {
        for (di, doc) in docs.iter().enumerate() {
            if state.doc_matched[di] {
                continue;
            }
            for (mi, method) in stubs.iter().enumerate() {
                if stub_names[mi] != doc_names[di] {
                    continue;
                }
                if let Some((oi, _)) = self.best_available_overload(doc, mi, method, state) {
                    record(state, di, doc, mi, method, oi, 1.0, MatchType::Exact, Vec::new());
                    break;
                }
            }
        }
    }

    fn signature_pass(
        &self,
        docs: &[MethodDoc],
        stubs: &[StubMethod],
        doc_names: &[String],
        stub_names: &[String],
        state: &mut MatchState,
    ) {
        struct Candidate {
            method: usize,
            overload: usize,
            score: f64,
            ratio: f64,
        }

        for (di, doc) in docs.iter().enumerate() {
            if state.doc_matched[di] {
                continue;
            }
            let mut best: Option<Candidate> = None;
            for (mi, method) in stubs.iter().enumerate() {
                let ratio = name_ratio(&doc_names[di], &stub_names[mi]);
                for (oi, overload) in method.overloads.iter().enumerate() {
                    if !state.is_available(mi, oi) {
                        continue;
                    }
                    let score = overload_similarity(doc, overload, self.scoring);
                    let better = best.as_ref().is_none_or(|b| {
                        score > b.score + SCORE_EPSILON
                            || ((score - b.score).abs() <= SCORE_EPSILON && ratio > b.ratio + SCORE_EPSILON)
                    });
                    if better {
                        best = Some(Candidate {
                            method: mi,
                            overload: oi,
                            score,
                            ratio,
                        });
                    }
                }
            }

            if let Some(c) = best.filter(|c| c.score + SCORE_EPSILON >= self.signature_threshold) {
                let method = &stubs[c.method];
                record(state, di, doc, c.method, method, c.overload, c.score, MatchType::Signature, Vec::new());
            }
        }
    }

    fn fuzzy_pass(
        &self,
        docs: &[MethodDoc],
        stubs: &[StubMethod],
        doc_names: &[String],
        stub_names: &[String],
        state: &mut MatchState,
    ) {
        for (di, doc) in docs.iter().enumerate() {
            if state.doc_matched[di] {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;
            for (mi, method) in stubs.iter().enumerate() {
                let has_room = (0..method.overloads.len()).any(|oi| state.is_available(mi, oi));
                if !has_room {
                    continue;
                }
                let ratio = name_ratio(&doc_names[di], &stub_names[mi]);
                if best.is_none_or(|(_, r)| ratio > r + SCORE_EPSILON) {
                    best = Some((mi, ratio));
                }
            }

            let Some((mi, ratio)) = best.filter(|(_, r)| r + SCORE_EPSILON >= self.fuzzy_threshold) else {
                continue;
            };
            let method = &stubs[mi];
            if let Some((oi, _)) = self.best_available_overload(doc, mi, method, state) {
                let note = format!("Fuzzy name match: '{}' -> '{}'", doc.name, method.name);
                record(state, di, doc, mi, method, oi, ratio, MatchType::Fuzzy, vec![note]);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    state: &mut MatchState,
    doc_index: usize,
    doc: &MethodDoc,
    method_index: usize,
    method: &StubMethod,
    overload_index: usize,
    confidence: f64,
    match_type: MatchType,
    mut issues: Vec<String>,
) {
    let overload = &method.overloads[overload_index];
    issues.extend(signature_issues(doc, overload));
    state.doc_matched[doc_index] = true;
    state.used.insert((method_index, overload_index));
    state.matches.push(MethodMatch {
        javadoc_index: doc_index,
        javadoc_name: doc.name.clone(),
        json_method_index: method_index,
        json_method_name: method.name.clone(),
        overload_index,
        overload_signature: overload.signature.clone(),
        confidence: confidence.clamp(0.0, 1.0),
        match_type,
        parameter_mapping: map_parameters(doc, overload),
        issues,
    });
}

/// JSON parameter *i* maps to JavaDoc parameter *i*, or `param_i` past the
/// end of the JavaDoc list.
pub fn map_parameters(doc: &MethodDoc, overload: &Overload) -> Vec<(String, String)> {
    overload
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let doc_name = doc
                .parameters
                .get(i)
                .map_or_else(|| format!("param_{i}"), |d| d.name.clone());
            (p.name.clone(), doc_name)
        })
        .collect()
}

fn signature_issues(doc: &MethodDoc, overload: &Overload) -> Vec<String> {
    let mut issues = Vec::new();
    if doc.parameters.len() != overload.params.len() {
        issues.push(format!(
            "Parameter count mismatch: JavaDoc={}, JSON={}",
            doc.parameters.len(),
            overload.params.len()
        ));
    }
    let generic: Vec<&str> = overload
        .params
        .iter()
        .map(|p| p.name.as_str())
        .filter(|n| is_generic_param_name(n))
        .collect();
    if !generic.is_empty() {
        issues.push(format!("Generic parameter names in JSON: {}", generic.join(", ")));
    }
    issues
}

// ── Report ─────────────────────────────────────────────────────────

/// Cross-class matching summary, written as `matching_report.json`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub summary: MatchSummary,
    pub match_type_distribution: MatchTypeDistribution,
    pub class_results: BTreeMap<String, ClassMatchEntry>,
    pub issues_summary: IssuesSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchSummary {
    pub total_classes: usize,
    pub classes_with_both_data: usize,
    pub classes_javadoc_only: usize,
    pub classes_json_only: usize,
    pub total_method_matches: usize,
    pub total_javadoc_methods: usize,
    pub total_json_methods: usize,
    pub overall_match_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchTypeDistribution {
    pub exact: usize,
    pub signature: usize,
    pub fuzzy: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassMatchEntry {
    pub has_javadoc: bool,
    pub has_stub: bool,
    pub match_percentage: f64,
    pub total_matches: usize,
    pub unmatched_javadoc: usize,
    pub unmatched_json: usize,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IssuesSummary {
    pub classes_with_issues: usize,
    /// Most frequent issue text first.
    pub common_issues: Vec<(String, usize)>,
}

impl MatchReport {
    pub fn from_results(results: &BTreeMap<String, ClassMatchResult>) -> Self {
        let mut report = Self::default();
        let mut issue_counts: BTreeMap<&str, usize> = BTreeMap::new();
        report.summary.total_classes = results.len();

        for (name, result) in results {
            match (result.has_javadoc, result.has_stub) {
                (true, true) => report.summary.classes_with_both_data += 1,
                (true, false) => report.summary.classes_javadoc_only += 1,
                (false, true) => report.summary.classes_json_only += 1,
                (false, false) => {}
            }
            report.summary.total_method_matches += result.matches.len();
            report.summary.total_javadoc_methods += result.stats.total_javadoc_methods;
            report.summary.total_json_methods += result.stats.total_json_methods;

            for m in &result.matches {
                match m.match_type {
                    MatchType::Exact => report.match_type_distribution.exact += 1,
                    MatchType::Signature => report.match_type_distribution.signature += 1,
                    MatchType::Fuzzy => report.match_type_distribution.fuzzy += 1,
                }
            }

            let issues: Vec<String> = result.matches.iter().flat_map(|m| m.issues.iter().cloned()).collect();
            if !issues.is_empty() {
                report.issues_summary.classes_with_issues += 1;
            }
            for m in &result.matches {
                for issue in &m.issues {
                    *issue_counts.entry(issue.as_str()).or_default() += 1;
                }
            }

            report.class_results.insert(
                name.clone(),
                ClassMatchEntry {
                    has_javadoc: result.has_javadoc,
                    has_stub: result.has_stub,
                    match_percentage: result.stats.match_percentage,
                    total_matches: result.matches.len(),
                    unmatched_javadoc: result.unmatched_javadoc_methods.len(),
                    unmatched_json: result.unmatched_json_methods.len(),
                    issues,
                },
            );
        }

        report.summary.overall_match_percentage = percentage(
            report.summary.total_method_matches,
            report.summary.total_javadoc_methods,
        );
        let mut common: Vec<(String, usize)> = issue_counts
            .into_iter()
            .map(|(issue, n)| (issue.to_string(), n))
            .collect();
        common.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        report.issues_summary.common_issues = common;
        report
    }
}
