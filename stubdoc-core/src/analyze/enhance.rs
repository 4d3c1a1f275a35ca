//! Merging matched JavaDoc into stub records.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::MatchingSection;
use crate::types::{
    ClassDoc, ConstructorDoc, EnhancedConstructor, EnhancedConstructorOverload, EnhancedField,
    EnhancedMethod, EnhancedOverload, EnhancedParam, EnhancedStub, EnhancementMetadata, FieldDoc,
    Inheritance, MatchType, MethodCategory, MethodDoc, Overload, ParameterDoc, StubClass,
    StubConstructor, StubField, StubMethod,
};

use super::category::categorize;
use super::matcher::{ClassMatchResult, Matcher, MethodMatch};
use super::round_to;

/// Version stamped into every enhanced file.
pub const ENHANCEMENT_VERSION: &str = "1.0.0";

const EXACT_BONUS_WEIGHT: f64 = 0.2;
const ISSUE_PENALTY: f64 = 0.05;
const MAX_ISSUE_PENALTY: f64 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    matcher: Matcher,
}

/// Output of [`Enhancer::enhance_all`].
#[derive(Debug, Default)]
pub struct BatchEnhancement {
    /// Keyed like the input stub map.
    pub enhanced: BTreeMap<String, EnhancedStub>,
    /// Every class seen in either source, including one-sided ones.
    pub match_results: BTreeMap<String, ClassMatchResult>,
}

impl Enhancer {
    pub fn new(config: &MatchingSection) -> Self {
        Self {
            matcher: Matcher::new(config),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Enhance one stub. Without JavaDoc only categories are derived.
    pub fn enhance(
        &self,
        stub: &StubClass,
        doc: Option<&ClassDoc>,
    ) -> (EnhancedStub, Option<ClassMatchResult>) {
        let mut enhanced = EnhancedStub {
            class_name: stub.class_name.clone(),
            package: stub.package.clone(),
            extracted_at: stub.extracted_at.clone(),
            extractor_version: stub.extractor_version.clone(),
            enhancement_timestamp: chrono::Utc::now().to_rfc3339(),
            enhancement_version: ENHANCEMENT_VERSION.to_string(),
            javadoc_description: String::new(),
            inheritance: Inheritance::default(),
            nested_classes: Vec::new(),
            deprecated: false,
            since_version: None,
            see_also: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            enhancement_metadata: EnhancementMetadata::default(),
        };

        let Some(doc) = doc else {
            enhanced.methods = stub.methods.iter().map(plain_method).collect();
            enhanced.fields = stub.fields.iter().map(|f| enhance_field(f, None)).collect();
            enhanced.constructors = stub
                .constructors
                .iter()
                .map(|c| enhance_constructor(c, &[]))
                .collect();
            debug!(
                class = %stub.class_name,
                methods = enhanced.methods.len(),
                "Categorized without JavaDoc"
            );
            return (enhanced, None);
        };

        let result = self.matcher.match_class(doc, stub);

        enhanced.javadoc_description.clone_from(&doc.description);
        enhanced.inheritance = doc.inheritance.clone();
        enhanced.nested_classes.clone_from(&doc.nested_classes);
        enhanced.deprecated = doc.deprecated;
        enhanced.since_version.clone_from(&doc.since_version);
        enhanced.see_also.clone_from(&doc.see_also);

        enhanced.methods = stub
            .methods
            .iter()
            .enumerate()
            .map(|(mi, method)| enhance_method(mi, method, &doc.methods, &result))
            .collect();
        enhanced.fields = stub
            .fields
            .iter()
            .map(|f| enhance_field(f, find_field_doc(doc, &f.name)))
            .collect();
        enhanced.constructors = stub
            .constructors
            .iter()
            .map(|c| enhance_constructor(c, &doc.constructors))
            .collect();

        enhanced.enhancement_metadata = EnhancementMetadata {
            javadoc_available: true,
            matching_statistics: Some(result.stats.clone()),
            unmatched_javadoc_methods: result.unmatched_javadoc_methods.len(),
            unmatched_json_methods: result.unmatched_json_methods.len(),
            enhancement_quality_score: quality_score(&result),
        };
        debug!(
            class = %stub.class_name,
            matches = result.matches.len(),
            quality = enhanced.enhancement_metadata.enhancement_quality_score,
            "Enhanced class"
        );
        (enhanced, Some(result))
    }

    /// Enhance every stub. `javadoc` is keyed like `stubs`, so a stub
    /// stored under `pkg.Tree` only picks up the page stored under the same key.
    pub fn enhance_all(
        &self,
        stubs: &BTreeMap<String, StubClass>,
        javadoc: &BTreeMap<String, ClassDoc>,
    ) -> BatchEnhancement {
        self.enhance_all_with(stubs, javadoc, |_| {})
    }

    /// [`enhance_all`](Self::enhance_all), calling `on_class` after each stub.
    #[instrument(skip_all, name = "enhance")]
    pub fn enhance_all_with(
        &self,
        stubs: &BTreeMap<String, StubClass>,
        javadoc: &BTreeMap<String, ClassDoc>,
        mut on_class: impl FnMut(&str),
    ) -> BatchEnhancement {
        let mut batch = BatchEnhancement::default();
        for (key, stub) in stubs {
            let (enhanced, result) = self.enhance(stub, javadoc.get(key));
            let result = result.unwrap_or_else(|| ClassMatchResult::stub_only(stub));
            batch.match_results.insert(key.clone(), result);
            batch.enhanced.insert(key.clone(), enhanced);
            on_class(key);
        }
        for (name, doc) in javadoc {
            if !stubs.contains_key(name) {
                batch.match_results.insert(name.clone(), ClassMatchResult::javadoc_only(doc));
            }
        }
        info!(
            classes = batch.enhanced.len(),
            with_javadoc = batch
                .enhanced
                .values()
                .filter(|e| e.enhancement_metadata.javadoc_available)
                .count(),
            "Enhancement complete"
        );
        batch
    }
}

/// `match% / 100 + 0.2 * exact / total - min(0.05 * issues, 0.3)`,
/// capped at 1.0 and rounded to three decimals. Zero when nothing matched.
#[allow(clippy::cast_precision_loss)]
pub fn quality_score(result: &ClassMatchResult) -> f64 {
    let total = result.stats.total_javadoc_methods;
    if result.matches.is_empty() || total == 0 {
        return 0.0;
    }
    let base = result.stats.match_percentage / 100.0;
    let exact_bonus = result.stats.exact_matches as f64 / total as f64 * EXACT_BONUS_WEIGHT;
    let penalty = (result.issue_count() as f64 * ISSUE_PENALTY).min(MAX_ISSUE_PENALTY);
    round_to((base + exact_bonus - penalty).min(1.0), 3)
}

// ── Methods ────────────────────────────────────────────────────────

fn plain_method(method: &StubMethod) -> EnhancedMethod {
    EnhancedMethod {
        name: method.name.clone(),
        overloads: method.overloads.iter().map(plain_overload).collect(),
        documentation: method.documentation.clone(),
        javadoc_description: String::new(),
        category: categorize(&method.name, false),
        deprecated: false,
        since_version: None,
        see_also: Vec::new(),
        examples: Vec::new(),
    }
}

fn enhance_method(
    method_index: usize,
    method: &StubMethod,
    docs: &[MethodDoc],
    result: &ClassMatchResult,
) -> EnhancedMethod {
    let mut lead: Option<&MethodDoc> = None;
    let overloads = method
        .overloads
        .iter()
        .enumerate()
        .map(|(oi, overload)| match result.match_for_overload(method_index, oi) {
            Some(m) => {
                let doc = &docs[m.javadoc_index];
                lead.get_or_insert(doc);
                matched_overload(overload, doc, m)
            }
            None => plain_overload(overload),
        })
        .collect();

    let Some(doc) = lead else {
        let mut plain = plain_method(method);
        plain.overloads = overloads;
        return plain;
    };
    EnhancedMethod {
        name: method.name.clone(),
        overloads,
        documentation: method.documentation.clone(),
        javadoc_description: doc.description.clone(),
        category: categorize(&method.name, doc.is_static()),
        deprecated: doc.deprecated,
        since_version: doc.since_version.clone(),
        see_also: doc.see_also.clone(),
        examples: doc.examples.clone(),
    }
}

fn plain_overload(overload: &Overload) -> EnhancedOverload {
    EnhancedOverload {
        signature: overload.signature.clone(),
        params: overload
            .params
            .iter()
            .map(|p| EnhancedParam {
                name: p.name.clone(),
                ty: p.ty.clone(),
                java_type: p.java_type.clone(),
                description: String::new(),
                javadoc_name: None,
            })
            .collect(),
        return_type: overload.return_type.clone(),
        java_return_type: overload.java_return_type.clone(),
        return_description: String::new(),
        throws: BTreeMap::new(),
        match_type: None,
        match_confidence: None,
    }
}

fn matched_overload(overload: &Overload, doc: &MethodDoc, m: &MethodMatch) -> EnhancedOverload {
    let params = overload
        .params
        .iter()
        .map(|p| {
            let javadoc_name = m
                .parameter_mapping
                .iter()
                .find(|(json, _)| json == &p.name)
                .map(|(_, javadoc)| javadoc.clone());
            let description = javadoc_name
                .as_deref()
                .and_then(|name| doc.parameters.iter().find(|d| d.name == name))
                .map(|d| d.description.clone())
                .unwrap_or_default();
            EnhancedParam {
                name: p.name.clone(),
                ty: p.ty.clone(),
                java_type: p.java_type.clone(),
                description,
                javadoc_name,
            }
        })
        .collect();

    EnhancedOverload {
        signature: overload.signature.clone(),
        params,
        return_type: overload.return_type.clone(),
        java_return_type: overload.java_return_type.clone(),
        return_description: doc.return_description.clone(),
        throws: doc.throws.clone(),
        match_type: Some(m.match_type),
        match_confidence: Some(m.confidence),
    }
}

// ── Fields and constructors ────────────────────────────────────────

/// Declared fields win over inherited ones with the same name.
fn find_field_doc<'a>(doc: &'a ClassDoc, name: &str) -> Option<&'a FieldDoc> {
    let mut candidates = doc.fields.iter().filter(|f| f.name == name);
    let first = candidates.next()?;
    if first.inherited {
        Some(candidates.find(|f| !f.inherited).unwrap_or(first))
    } else {
        Some(first)
    }
}

fn enhance_field(field: &StubField, doc: Option<&FieldDoc>) -> EnhancedField {
    EnhancedField {
        name: field.name.clone(),
        ty: field.ty.clone(),
        java_type: field.java_type.clone(),
        documentation: field.documentation.clone(),
        javadoc_description: doc.map(|d| d.description.clone()).unwrap_or_default(),
        deprecated: doc.is_some_and(|d| d.deprecated),
    }
}

/// Constructor overloads pair with the first JavaDoc constructor of the
/// same arity.
fn enhance_constructor(ctor: &StubConstructor, docs: &[ConstructorDoc]) -> EnhancedConstructor {
    let overloads = ctor
        .overloads
        .iter()
        .map(|overload| {
            let doc = docs.iter().find(|d| d.parameters.len() == overload.params.len());
            let params = overload
                .params
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let documented: Option<&ParameterDoc> = doc.and_then(|d| d.parameters.get(i));
                    EnhancedParam {
                        name: p.name.clone(),
                        ty: p.ty.clone(),
                        java_type: p.java_type.clone(),
                        description: documented.map(|d| d.description.clone()).unwrap_or_default(),
                        javadoc_name: documented.map(|d| d.name.clone()),
                    }
                })
                .collect();
            EnhancedConstructorOverload {
                signature: overload.signature.clone(),
                params,
                javadoc_description: doc.map(|d| d.description.clone()).unwrap_or_default(),
                throws: doc.map(|d| d.throws.clone()).unwrap_or_default(),
            }
        })
        .collect();

    EnhancedConstructor {
        name: ctor.name.clone(),
        overloads,
        documentation: ctor.documentation.clone(),
    }
}

// ── Report ─────────────────────────────────────────────────────────

/// Cross-class enhancement summary, written as `enhancement_report.json`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnhancementReport {
    pub summary: EnhancementSummary,
    pub categorization: BTreeMap<MethodCategory, usize>,
    pub quality_distribution: QualityDistribution,
    pub class_details: BTreeMap<String, ClassEnhancementDetail>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnhancementSummary {
    pub total_classes: usize,
    pub classes_with_javadoc: usize,
    pub classes_without_javadoc: usize,
    pub total_enhanced_methods: usize,
    pub methods_with_javadoc_descriptions: usize,
    pub methods_with_examples: usize,
    pub average_enhancement_quality: f64,
}

/// Buckets: high > 0.8, medium >= 0.5, low > 0, no JavaDoc at 0.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityDistribution {
    pub high_quality: usize,
    pub medium_quality: usize,
    pub low_quality: usize,
    pub no_javadoc: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassEnhancementDetail {
    pub has_javadoc: bool,
    pub method_count: usize,
    pub methods_with_descriptions: usize,
    pub quality_score: f64,
    pub categories: BTreeMap<MethodCategory, usize>,
}

impl EnhancementReport {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_stubs(enhanced: &BTreeMap<String, EnhancedStub>) -> Self {
        let mut report = Self {
            categorization: MethodCategory::ALL.into_iter().map(|c| (c, 0)).collect(),
            ..Self::default()
        };
        report.summary.total_classes = enhanced.len();
        let mut scores = Vec::new();

        for (name, stub) in enhanced {
            let has_javadoc = stub.enhancement_metadata.javadoc_available;
            if has_javadoc {
                report.summary.classes_with_javadoc += 1;
            } else {
                report.summary.classes_without_javadoc += 1;
            }

            let mut detail = ClassEnhancementDetail {
                has_javadoc,
                method_count: stub.methods.len(),
                ..ClassEnhancementDetail::default()
            };
            for method in &stub.methods {
                if !method.javadoc_description.is_empty() {
                    detail.methods_with_descriptions += 1;
                }
                if !method.examples.is_empty() {
                    report.summary.methods_with_examples += 1;
                }
                *report.categorization.entry(method.category).or_default() += 1;
                *detail.categories.entry(method.category).or_default() += 1;
            }
            report.summary.total_enhanced_methods += stub.methods.len();
            report.summary.methods_with_javadoc_descriptions += detail.methods_with_descriptions;

            let score = stub.enhancement_metadata.enhancement_quality_score;
            detail.quality_score = score;
            if score > 0.0 {
                scores.push(score);
                let bucket = match score {
                    s if s > 0.8 => &mut report.quality_distribution.high_quality,
                    s if s >= 0.5 => &mut report.quality_distribution.medium_quality,
                    _ => &mut report.quality_distribution.low_quality,
                };
                *bucket += 1;
            } else {
                report.quality_distribution.no_javadoc += 1;
            }
            report.class_details.insert(name.clone(), detail);
        }

        if !scores.is_empty() {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            report.summary.average_enhancement_quality = round_to(mean, 3);
        }
        report
    }

    /// Overloads that received a match of the given kind, across all classes.
    pub fn count_overloads_with(enhanced: &BTreeMap<String, EnhancedStub>, kind: MatchType) -> usize {
        enhanced
            .values()
            .flat_map(|s| &s.methods)
            .flat_map(|m| &m.overloads)
            .filter(|o| o.match_type == Some(kind))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StubParam;

    fn param_doc(name: &str, description: &str) -> ParameterDoc {
        ParameterDoc {
            name: name.into(),
            description: description.into(),
            type_hint: None,
        }
    }

    fn method_doc(name: &str, ret: &str, params: Vec<ParameterDoc>) -> MethodDoc {
        MethodDoc {
            name: name.into(),
            signature: String::new(),
            description: format!("{name} docs"),
            parameters: params,
            return_description: format!("the {name} result"),
            return_type: ret.into(),
            deprecated: false,
            since_version: Some("4.0".into()),
            see_also: vec!["Path".into()],
            throws: BTreeMap::new(),
            modifiers: vec!["public".into()],
            examples: vec![],
            overrides: None,
        }
    }

    fn overload(ret: &str, params: &[&str]) -> Overload {
        Overload {
            signature: format!("({}) -> {ret}", params.join(", ")),
            params: params
                .iter()
                .map(|p| StubParam {
                    name: (*p).into(),
                    ty: "float".into(),
                    java_type: "double".into(),
                })
                .collect(),
            return_type: ret.into(),
            java_return_type: ret.into(),
        }
    }

    fn tree_doc() -> ClassDoc {
        let mut scale = method_doc(
            "scale",
            "void",
            vec![param_doc("xScale", "the X scaling factor"), param_doc("yScale", "the Y scaling factor")],
        );
        scale.throws.insert("IllegalArgumentException".into(), "if a factor is negative".into());
        scale.examples.push("tree.scale(2, 2);".into());
        ClassDoc {
            class_name: "Tree".into(),
            package: "sc.fiji.snt".into(),
            description: "A Tree is a collection of Paths.".into(),
            inheritance: Inheritance {
                extends: vec!["Object".into()],
                implements: vec!["TreeProperties".into()],
            },
            methods: vec![method_doc("getLength", "double", vec![]), scale],
            fields: vec![FieldDoc {
                name: "MAX_NODES".into(),
                type_name: "int".into(),
                description: "Upper bound on node count.".into(),
                deprecated: false,
                since_version: None,
                modifiers: vec!["static".into(), "final".into()],
                inherited: false,
            }],
            constructors: vec![
                ConstructorDoc {
                    signature: "public Tree()".into(),
                    description: "Creates an empty tree.".into(),
                    parameters: vec![],
                    throws: BTreeMap::new(),
                    deprecated: false,
                    since_version: None,
                    modifiers: vec!["public".into()],
                },
                ConstructorDoc {
                    signature: "public Tree(String label)".into(),
                    description: "Creates a labelled tree.".into(),
                    parameters: vec![param_doc("label", "the tree label")],
                    throws: BTreeMap::new(),
                    deprecated: false,
                    since_version: None,
                    modifiers: vec!["public".into()],
                },
            ],
            nested_classes: vec!["Tree.Builder".into()],
            deprecated: false,
            since_version: Some("3.0".into()),
            see_also: vec!["Path".into()],
        }
    }

    fn tree_stub() -> StubClass {
        StubClass {
            class_name: "Tree".into(),
            package: "sc.fiji.snt".into(),
            extracted_at: "2025-01-01T00:00:00".into(),
            extractor_version: "1.0".into(),
            methods: vec![
                StubMethod {
                    name: "getLength".into(),
                    overloads: vec![overload("double", &[])],
                    documentation: String::new(),
                },
                StubMethod {
                    name: "scale".into(),
                    overloads: vec![overload("void", &["x", "y"]), overload("void", &["x", "y", "z"])],
                    documentation: String::new(),
                },
                StubMethod {
                    name: "list".into(),
                    overloads: vec![overload("java.util.List", &["a", "b", "c", "d"])],
                    documentation: String::new(),
                },
            ],
            fields: vec![StubField {
                name: "MAX_NODES".into(),
                ty: "int".into(),
                java_type: "int".into(),
                documentation: String::new(),
            }],
            constructors: vec![StubConstructor {
                name: "Tree".into(),
                overloads: vec![overload("Tree", &[]), overload("Tree", &["arg0"])],
                documentation: String::new(),
            }],
            file_path: None,
            validation_errors: vec![],
        }
    }

    #[test]
    fn matched_methods_carry_javadoc() {
        let (enhanced, result) = Enhancer::default().enhance(&tree_stub(), Some(&tree_doc()));
        let result = result.expect("javadoc was supplied");
        assert_eq!(result.stats.exact_matches, 2);

        assert_eq!(enhanced.javadoc_description, "A Tree is a collection of Paths.");
        assert_eq!(enhanced.nested_classes, vec!["Tree.Builder"]);
        assert_eq!(enhanced.enhancement_version, ENHANCEMENT_VERSION);

        let get_length = &enhanced.methods[0];
        assert_eq!(get_length.category, MethodCategory::Getters);
        assert_eq!(get_length.javadoc_description, "getLength docs");
        assert_eq!(get_length.overloads[0].return_description, "the getLength result");
        assert_eq!(get_length.overloads[0].match_type, Some(MatchType::Exact));

        let scale = &enhanced.methods[1];
        assert_eq!(scale.examples, vec!["tree.scale(2, 2);"]);
        let matched = &scale.overloads[0];
        assert_eq!(matched.params[0].description, "the X scaling factor");
        assert_eq!(matched.params[1].javadoc_name.as_deref(), Some("yScale"));
        assert!(matched.throws.contains_key("IllegalArgumentException"));
        let unmatched = &scale.overloads[1];
        assert_eq!(unmatched.match_type, None);
        assert!(unmatched.params.iter().all(|p| p.description.is_empty()));

        let list = &enhanced.methods[2];
        assert!(list.javadoc_description.is_empty());
        assert_eq!(list.category, MethodCategory::Utilities);

        let meta = &enhanced.enhancement_metadata;
        assert!(meta.javadoc_available);
        assert_eq!(meta.unmatched_javadoc_methods, 0);
        assert_eq!(meta.unmatched_json_methods, 1);
        assert!((meta.enhancement_quality_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fields_and_constructors_pick_up_descriptions() {
        let (enhanced, _) = Enhancer::default().enhance(&tree_stub(), Some(&tree_doc()));
        assert_eq!(enhanced.fields[0].javadoc_description, "Upper bound on node count.");

        let ctor = &enhanced.constructors[0];
        assert_eq!(ctor.overloads[0].javadoc_description, "Creates an empty tree.");
        assert_eq!(ctor.overloads[1].javadoc_description, "Creates a labelled tree.");
        assert_eq!(ctor.overloads[1].params[0].description, "the tree label");
        assert_eq!(ctor.overloads[1].params[0].javadoc_name.as_deref(), Some("label"));
    }

    #[test]
    fn without_javadoc_only_categories_are_added() {
        let (enhanced, result) = Enhancer::default().enhance(&tree_stub(), None);
        assert!(result.is_none());
        assert!(!enhanced.enhancement_metadata.javadoc_available);
        assert!(enhanced.enhancement_metadata.enhancement_quality_score.abs() < f64::EPSILON);
        assert_eq!(enhanced.methods[0].category, MethodCategory::Getters);
        assert!(enhanced.methods.iter().all(|m| m.javadoc_description.is_empty()));
        assert!(enhanced.fields[0].javadoc_description.is_empty());
    }

    #[test]
    fn quality_score_penalizes_issues() {
        let docs = vec![
            method_doc("add", "void", vec![param_doc("value", "")]),
            method_doc("clear", "void", vec![]),
        ];
        let stubs = vec![StubMethod {
            name: "add".into(),
            overloads: vec![overload("void", &["arg0", "arg1"])],
            documentation: String::new(),
        }];
        let result = Matcher::default().match_methods("Bag", &docs, &stubs);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.issue_count(), 2);
        // 0.5 base + 0.1 exact bonus - 0.1 penalty
        assert!((quality_score(&result) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn enhance_all_reports_one_sided_classes() {
        let stubs = BTreeMap::from([("Tree".to_string(), tree_stub())]);
        let mut lonely = tree_doc();
        lonely.class_name = "Graph".into();
        let javadoc = BTreeMap::from([("Tree".to_string(), tree_doc()), ("Graph".to_string(), lonely)]);

        let batch = Enhancer::default().enhance_all(&stubs, &javadoc);
        assert_eq!(batch.enhanced.len(), 1);
        assert_eq!(batch.match_results.len(), 2);
        assert!(!batch.match_results["Graph"].has_stub);

        let report = EnhancementReport::from_stubs(&batch.enhanced);
        assert_eq!(report.summary.classes_with_javadoc, 1);
        assert_eq!(report.summary.total_enhanced_methods, 3);
        assert_eq!(report.summary.methods_with_examples, 1);
        assert_eq!(report.quality_distribution.high_quality, 1);
        assert_eq!(report.categorization[&MethodCategory::Getters], 1);
        assert_eq!(report.categorization[&MethodCategory::Visualization], 0);
        assert_eq!(EnhancementReport::count_overloads_with(&batch.enhanced, MatchType::Exact), 2);

        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["categorization"]["I/O Operations"], 0);
    }

    #[test]
    fn same_named_classes_take_javadoc_by_key() {
        let mut other = tree_stub();
        other.package = "b.two".into();
        let stubs = BTreeMap::from([
            ("Tree".to_string(), tree_stub()),
            ("b.two.Tree".to_string(), other),
        ]);
        let mut other_doc = tree_doc();
        other_doc.package = "b.two".into();
        other_doc.description = "A second tree.".into();
        let javadoc = BTreeMap::from([
            ("Tree".to_string(), tree_doc()),
            ("b.two.Tree".to_string(), other_doc),
        ]);

        let batch = Enhancer::default().enhance_all(&stubs, &javadoc);
        assert_eq!(batch.enhanced.len(), 2);
        assert_eq!(batch.match_results.len(), 2);
        assert_eq!(batch.enhanced["b.two.Tree"].javadoc_description, "A second tree.");
        assert_ne!(batch.enhanced["Tree"].javadoc_description, "A second tree.");
    }

    #[test]
    fn report_buckets_stubs_without_javadoc() {
        let (plain, _) = Enhancer::default().enhance(&tree_stub(), None);
        let report = EnhancementReport::from_stubs(&BTreeMap::from([("Tree".to_string(), plain)]));
        assert_eq!(report.quality_distribution.no_javadoc, 1);
        assert_eq!(report.summary.classes_without_javadoc, 1);
        assert!(report.summary.average_enhancement_quality.abs() < f64::EPSILON);
    }
}
