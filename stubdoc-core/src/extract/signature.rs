//! Member signature parsing for rendered JavaDoc `div.member-signature` text.
//!
//! Signatures arrive as flattened DOM text such as
//! `public static <T> List<T> collect(Collection<? extends T> items, int limit) throws IOException`.

use std::sync::LazyLock;

use regex::Regex;

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "strictfp",
    "default",
    "transient",
    "volatile",
];

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@[A-Za-z_][\w.]*(?:\([^)]*\))?").expect("annotation pattern is valid")
});

/// Structured view of one member signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSignature {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    pub type_params: Option<String>,
    /// Empty for constructors.
    pub return_type: String,
    pub name: String,
    /// `(type, name)` pairs in declaration order.
    pub params: Vec<(String, String)>,
    pub throws: Vec<String>,
}

impl ParsedSignature {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

/// Collapse whitespace, including non-breaking and zero-width spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace(['\u{00a0}', '\u{200b}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a method, constructor, or field signature.
///
/// Fields have no parameter list; their declared type lands in `return_type`.
pub fn parse_member_signature(raw: &str) -> ParsedSignature {
    let normalized = normalize_whitespace(raw);
    let mut sig = ParsedSignature {
        annotations: ANNOTATION
            .find_iter(&normalized)
            .map(|m| m.as_str().to_string())
            .collect(),
        ..ParsedSignature::default()
    };
    let text = normalize_whitespace(&ANNOTATION.replace_all(&normalized, " "));

    let (head, params, tail) = match text.find('(') {
        Some(open) => {
            let close = matching_paren(&text, open).unwrap_or(text.len());
            let inner = text.get(open + 1..close).unwrap_or_default();
            let tail = text.get(close + 1..).unwrap_or_default();
            (&text[..open], Some(inner), tail)
        }
        None => (text.as_str(), None, ""),
    };

    let mut rest = Vec::new();
    for token in split_top_level(head.trim(), ' ') {
        if MODIFIERS.contains(&token.as_str()) {
            sig.modifiers.push(token);
        } else if token.starts_with('<') && rest.is_empty() && sig.type_params.is_none() {
            sig.type_params = Some(token);
        } else {
            rest.push(token);
        }
    }
    if let Some(name) = rest.pop() {
        sig.name = name;
    }
    sig.return_type = rest.join(" ");

    if let Some(inner) = params {
        sig.params = split_top_level(inner, ',')
            .iter()
            .map(|p| split_param(p))
            .collect();
    }

    if let Some(clause) = tail.trim().strip_prefix("throws") {
        sig.throws = split_top_level(clause, ',');
    }

    sig
}

/// Split on `sep` outside of `<…>` and `(…)` nesting. Pieces are trimmed.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in text.chars() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                let piece = current.trim();
                if !piece.is_empty() {
                    parts.push(piece.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    let piece = current.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
    parts
}

fn split_param(param: &str) -> (String, String) {
    let mut tokens = split_top_level(param, ' ');
    tokens.retain(|t| t != "final");
    match tokens.len() {
        0 => (String::new(), String::new()),
        1 => (tokens.remove(0), String::new()),
        _ => {
            let name = tokens.pop().unwrap_or_default();
            (tokens.join(" "), name)
        }
    }
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices().skip_while(|(i, _)| *i < open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
