//! Turning JavaDoc HTML fragments into clean prose.
//!
//! Code is lifted out into placeholders before whitespace normalization so
//! that indentation inside `<pre>` survives, then restored as inline code or
//! fenced blocks.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Code shorter than this (and single-line) stays as plain text.
const MIN_PRESERVED_CODE: usize = 20;
/// Single-line code under this width renders inline.
const MAX_INLINE_CODE: usize = 80;
/// `<code>` examples must be at least this long and multi-line.
const MIN_CODE_EXAMPLE: usize = 50;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

static TAG_REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (regex(r"@param\s+(\w+)"), "Parameter ${1}:"),
        (regex(r"@return\s+"), "Returns: "),
        (regex(r"@deprecated\s+"), "Deprecated: "),
        (regex(r"@since\s+"), "Since: "),
        (regex(r"@see\s+"), "See: "),
        (regex(r"@(?:throws|exception)\s+(\w+)"), "Throws ${1}:"),
        (regex(r"@author\s+"), "Author: "),
        (regex(r"@version\s+"), "Version: "),
    ]
});

static UNICODE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"[\u{00a0}\u{2000}-\u{200b}\u{2028}\u{2029}]"));
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| regex(r"\n\s*\n"));
static RUN_OF_SPACES: LazyLock<Regex> = LazyLock::new(|| regex(r"[ \t]+"));

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "ul", "ol", "li", "table", "tr", "blockquote", "dl", "dt", "dd", "h1", "h2",
    "h3", "h4", "h5", "h6",
];

/// Clean the contents of a JavaDoc `div.block` (or any element).
pub fn clean_javadoc_html(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    let mut code_blocks = Vec::new();
    collect_text(element, &mut raw, &mut code_blocks);

    let mut text = normalize_formatting(&rewrite_javadoc_tags(&raw));
    for (i, code) in code_blocks.iter().enumerate() {
        text = text.replace(&placeholder(i), &format_code_block(code));
    }
    text.trim().to_string()
}

/// Parse an HTML fragment and clean it.
pub fn clean_fragment(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    clean_javadoc_html(fragment.root_element())
}

fn placeholder(index: usize) -> String {
    format!("__CODE_BLOCK_{index}__")
}

fn collect_text(element: ElementRef<'_>, out: &mut String, code_blocks: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "pre" | "code" => {
                        let code: String = child_el.text().collect();
                        if code.len() > MIN_PRESERVED_CODE || code.contains('\n') {
                            out.push_str(&placeholder(code_blocks.len()));
                            code_blocks.push(code);
                        } else {
                            out.push_str(&code);
                        }
                    }
                    "br" => out.push('\n'),
                    name if BLOCK_ELEMENTS.contains(&name) => {
                        out.push_str("\n\n");
                        collect_text(child_el, out, code_blocks);
                        out.push_str("\n\n");
                    }
                    "script" | "style" => {}
                    _ => collect_text(child_el, out, code_blocks),
                }
            }
            _ => {}
        }
    }
}

/// Rewrite inline JavaDoc tags (`@param x`, `@return`, ...) as prose labels.
pub fn rewrite_javadoc_tags(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in TAG_REWRITES.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

/// Normalize whitespace while keeping paragraph breaks.
///
/// Unicode spaces become plain spaces, single newlines fold into spaces, and
/// at most one blank line separates paragraphs. Every line is trimmed.
pub fn normalize_formatting(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = UNICODE_SPACE.replace_all(text, " ");
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = PARAGRAPH_BREAK.replace_all(&text, "\n\n");
    let text = text
        .split("\n\n")
        .map(|paragraph| paragraph.replace('\n', " "))
        .collect::<Vec<_>>()
        .join("\n\n");
    let text = RUN_OF_SPACES.replace_all(&text, " ");

    text.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Render preserved code as `` `inline` `` or as a dedented fenced block.
pub fn format_code_block(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if !trimmed.contains('\n') && trimmed.len() < MAX_INLINE_CODE {
        return format!("`{trimmed}`");
    }

    // Keep the first line's indentation so dedent sees it.
    let code = code.trim_end().trim_start_matches(['\n', '\r']);
    let lines: Vec<&str> = code.split('\n').collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let body = lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                *l
            } else {
                l.get(indent..).unwrap_or(l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n```\n{body}\n```\n")
}

/// Code snippets in a description: every `<pre>`, plus long multi-line `<code>`.
pub fn code_examples(block: ElementRef<'_>) -> Vec<String> {
    let mut examples = Vec::new();
    for el in block.descendants().filter_map(ElementRef::wrap) {
        match el.value().name() {
            "pre" => {
                let code = el.text().collect::<String>().trim().to_string();
                if !code.is_empty() {
                    examples.push(code);
                }
            }
            "code" if !inside_pre(el) => {
                let code = el.text().collect::<String>().trim().to_string();
                if code.len() > MIN_CODE_EXAMPLE && code.contains('\n') {
                    examples.push(code);
                }
            }
            _ => {}
        }
    }
    examples
}

fn inside_pre(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .any(|a| a.value().as_element().is_some_and(|e| e.name() == "pre"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_code_stays_inline_text() {
        let text = clean_fragment("<div class=\"block\">Returns the <code>Tree</code> length.</div>");
        assert_eq!(text, "Returns the Tree length.");
    }

    #[test]
    fn long_code_becomes_backticked() {
        let text = clean_fragment(
            "<div>Call <code>tree.getLength(Tree.UNITS_MICRONS)</code> first.</div>",
        );
        assert_eq!(text, "Call `tree.getLength(Tree.UNITS_MICRONS)` first.");
    }

    #[test]
    fn pre_block_is_fenced_and_dedented() {
        let text = clean_fragment(
            "<div>Example:<pre>\n    Tree t = new Tree();\n    t.scale(2);\n</pre></div>",
        );
        assert!(text.contains("```\nTree t = new Tree();\nt.scale(2);\n```"), "{text}");
    }

    #[test]
    fn javadoc_tags_become_labels() {
        assert_eq!(
            rewrite_javadoc_tags("@param radius the radius @return the area @throws IOException if"),
            "Parameter radius: the radius Returns: the area Throws IOException: if"
        );
        assert_eq!(rewrite_javadoc_tags("@since 4.0"), "Since: 4.0");
    }

    #[test]
    fn paragraphs_survive_single_newlines_fold() {
        let text = normalize_formatting("first\nline\n\n\n\nsecond\u{00a0} para  \n");
        assert_eq!(text, "first line\n\nsecond para");
    }

    #[test]
    fn paragraph_elements_break_paragraphs() {
        let text = clean_fragment("<div>Intro.<p>Details here.</p></div>");
        assert_eq!(text, "Intro.\n\nDetails here.");
    }

    #[test]
    fn inline_format_threshold() {
        assert_eq!(format_code_block("  x = 1 "), "`x = 1`");
        let long = "a".repeat(90);
        assert!(format_code_block(&long).starts_with("\n```\n"));
        assert_eq!(format_code_block("   "), "");
    }

    #[test]
    fn examples_come_from_pre_and_long_code() {
        let long_code = format!("{}\n{}", "x".repeat(30), "y".repeat(30));
        let html = Html::parse_fragment(&format!(
            "<div><pre><code>var t = 1;</code></pre><code>short</code><code>{long_code}</code></div>"
        ));
        let examples = code_examples(html.root_element());
        assert_eq!(examples, vec!["var t = 1;".to_string(), long_code]);
    }
}
