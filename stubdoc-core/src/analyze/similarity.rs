//! Name and type similarity used by the matcher.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ParamTypeScoring;
use crate::types::{MethodDoc, Overload};

/// Score contribution weights for the signature comparison.
const PARAM_COUNT_WEIGHT: f64 = 0.4;
const RETURN_TYPE_WEIGHT: f64 = 0.3;
const PARAM_TYPES_WEIGHT: f64 = 0.3;

/// Per-parameter score when nothing is known about the types.
const NEUTRAL_PARAM_SCORE: f64 = 0.5;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

static STATIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| regex(r"^static\s+"));
static GENERIC_ARGS: LazyLock<Regex> = LazyLock::new(|| regex(r"<[^>]*>"));
static PACKAGE_PREFIX: LazyLock<Regex> = LazyLock::new(|| regex(r"^[a-z.]+\."));

/// Strip a leading `static `, generic fragments, and surrounding whitespace.
pub fn clean_method_name(name: &str) -> String {
    let name = STATIC_PREFIX.replace(name.trim(), "");
    GENERIC_ARGS.replace_all(&name, "").trim().to_string()
}

/// Reduce a Java type to its simple name: `java.util.List<Path>[]` → `List`.
pub fn clean_type_name(ty: &str) -> String {
    let ty = PACKAGE_PREFIX.replace(ty.trim(), "");
    let ty = GENERIC_ARGS.replace_all(&ty, "");
    ty.replace("[]", "").trim().to_string()
}

/// Edit-distance similarity in `[0, 1]`; symmetric, 1.0 for equal strings.
pub fn name_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// 1.0 when the cleaned names agree, else their edit-distance ratio.
/// An empty type on either side scores 0.
pub fn type_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    let (a, b) = (clean_type_name(a), clean_type_name(b));
    if a == b { 1.0 } else { name_ratio(&a, &b) }
}

/// Weighted resemblance between a JavaDoc method and one stub overload.
///
/// 40% parameter count (full when equal, half when off by one), 30% return
/// type, 30% mean per-parameter score over the shared positions.
#[allow(clippy::cast_precision_loss)]
pub fn overload_similarity(doc: &MethodDoc, overload: &Overload, scoring: ParamTypeScoring) -> f64 {
    let doc_count = doc.parameters.len();
    let stub_count = overload.params.len();

    let mut score = match doc_count.abs_diff(stub_count) {
        0 => PARAM_COUNT_WEIGHT,
        1 => PARAM_COUNT_WEIGHT / 2.0,
        _ => 0.0,
    };

    score += RETURN_TYPE_WEIGHT * type_similarity(&doc.return_type, &overload.java_return_type);

    let shared = doc_count.min(stub_count);
    if shared > 0 {
        let total: f64 = doc
            .parameters
            .iter()
            .zip(&overload.params)
            .map(|(doc_param, stub_param)| match scoring {
                ParamTypeScoring::Neutral => NEUTRAL_PARAM_SCORE,
                ParamTypeScoring::Typed => doc_param
                    .type_hint
                    .as_deref()
                    .map_or(NEUTRAL_PARAM_SCORE, |hint| type_similarity(hint, &stub_param.java_type)),
            })
            .sum();
        score += PARAM_TYPES_WEIGHT * (total / shared as f64);
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParameterDoc, StubParam};
    use proptest::prelude::*;

    fn doc(ret: &str, params: &[(&str, Option<&str>)]) -> MethodDoc {
        MethodDoc {
            name: "m".into(),
            signature: String::new(),
            description: String::new(),
            parameters: params
                .iter()
                .map(|(n, t)| ParameterDoc {
                    name: (*n).into(),
                    description: String::new(),
                    type_hint: t.map(str::to_string),
                })
                .collect(),
            return_description: String::new(),
            return_type: ret.into(),
            deprecated: false,
            since_version: None,
            see_also: vec![],
            throws: Default::default(),
            modifiers: vec![],
            examples: vec![],
            overrides: None,
        }
    }

    fn overload(ret: &str, params: &[&str]) -> Overload {
        Overload {
            signature: String::new(),
            params: params
                .iter()
                .enumerate()
                .map(|(i, t)| StubParam {
                    name: format!("p{i}"),
                    ty: String::new(),
                    java_type: (*t).into(),
                })
                .collect(),
            return_type: String::new(),
            java_return_type: ret.into(),
        }
    }

    #[test]
    fn method_name_cleaning() {
        assert_eq!(clean_method_name("static getLength"), "getLength");
        assert_eq!(clean_method_name(" collect<T> "), "collect");
        assert_eq!(clean_method_name("staticValue"), "staticValue");
    }

    #[test]
    fn type_name_cleaning() {
        assert_eq!(clean_type_name("java.util.List<sc.fiji.snt.Path>"), "List");
        assert_eq!(clean_type_name("double[]"), "double");
        assert_eq!(clean_type_name("Tree"), "Tree");
    }

    #[test]
    fn type_similarity_edges() {
        assert!((type_similarity("java.lang.String", "String") - 1.0).abs() < 1e-12);
        assert!(type_similarity("", "String").abs() < 1e-12);
        let partial = type_similarity("java.lang.Double", "double");
        assert!(partial > 0.0 && partial < 1.0);
    }

    #[test]
    fn identical_shape_scores_full_neutral() {
        let d = doc("void", &[("a", Some("String"))]);
        let o = overload("void", &["java.lang.String"]);
        let neutral = overload_similarity(&d, &o, ParamTypeScoring::Neutral);
        assert!((neutral - 0.85).abs() < 1e-9, "{neutral}");
        let typed = overload_similarity(&d, &o, ParamTypeScoring::Typed);
        assert!((typed - 1.0).abs() < 1e-9, "{typed}");
    }

    #[test]
    fn off_by_one_gets_half_count_credit() {
        let d = doc("void", &[]);
        let o = overload("void", &["int"]);
        let score = overload_similarity(&d, &o, ParamTypeScoring::Neutral);
        assert!((score - 0.5).abs() < 1e-9, "{score}");
    }

    #[test]
    fn typed_mode_without_hint_falls_back_to_neutral() {
        let d = doc("int", &[("a", None), ("b", Some("int"))]);
        let o = overload("int", &["double", "int"]);
        let score = overload_similarity(&d, &o, ParamTypeScoring::Typed);
        assert!((score - (0.4 + 0.3 + 0.3 * 0.75)).abs() < 1e-9, "{score}");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn ratio_is_symmetric(a in "[a-zA-Z]{0,12}", b in "[a-zA-Z]{0,12}") {
            prop_assert!((name_ratio(&a, &b) - name_ratio(&b, &a)).abs() < 1e-12);
        }

        #[test]
        fn ratio_is_bounded(a in "\\PC{0,16}", b in "\\PC{0,16}") {
            let r = name_ratio(&a, &b);
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }
}
