use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::analyze::percentage;
use crate::error::JavadocError;
use crate::types::{
    ClassDoc, ConstructorDoc, FieldDoc, Inheritance, MethodDoc, ParameterDoc, StubClass,
};

use super::LoadStats;
use super::html_text::{clean_javadoc_html, code_examples, normalize_formatting};
use super::signature::{normalize_whitespace, parse_member_signature};

/// A class page with more warnings than this is reported as invalid.
const MAX_VALIDATION_WARNINGS: usize = 10;

/// Generated directories that never hold class pages.
const SKIPPED_DIRS: &[&str] = &[
    "class-use",
    "doc-files",
    "src-html",
    "legal",
    "resources",
    "script-dir",
    "__MACOSX",
];

/// Page stems without a dash that are still not classes.
const NON_CLASS_STEMS: &[&str] = &["index", "allclasses", "allpackages", "overview", "search"];

// ── Selectors ──────────────────────────────────────────────────────

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

macro_rules! selectors {
    ($($name:ident = $css:literal;)*) => {
        $(static $name: LazyLock<Selector> = LazyLock::new(|| selector($css));)*
    };
}

selectors! {
    CLASS_DESCRIPTION = "section.class-description";
    BLOCK = "div.block";
    TYPE_SIGNATURE = "div.type-signature";
    EXTENDS_IMPLEMENTS = "div.type-signature span.extends-implements";
    METHOD_DETAILS = "section.method-details section.detail";
    CONSTRUCTOR_DETAILS = "section.constructor-details section.detail";
    FIELD_DETAILS = "section.field-details section.detail";
    INHERITED_FIELDS = "section.field-summary div.inherited-list";
    NESTED_CLASS_LINKS = "section.nested-class-summary a.type-name-link";
    MEMBER_SIGNATURE = "div.member-signature";
    DEPRECATION_BLOCK = "div.deprecation-block";
    NOTES = "dl.notes";
    H3 = "h3";
    LINK = "a";
    CODE_LINK = "code a";
}

static SINCE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)@since\s+([\d.]+)").expect("since pattern is valid")
});

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

// ── Parser ─────────────────────────────────────────────────────────

/// One class page to look up. Results are keyed by `key`; a non-empty
/// `package` is tried before the configured packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRequest {
    pub key: String,
    pub class_name: String,
    pub package: String,
}

impl ClassRequest {
    /// Look a class up by simple name only, keyed by that name.
    pub fn simple(class_name: &str) -> Self {
        Self {
            key: class_name.to_string(),
            class_name: class_name.to_string(),
            package: String::new(),
        }
    }

    /// Look up the page for a stub, preferring the stub's own package.
    pub fn for_stub(key: &str, stub: &StubClass) -> Self {
        Self {
            key: key.to_string(),
            class_name: stub.class_name.clone(),
            package: stub.package.clone(),
        }
    }
}

/// Parses JavaDoc HTML pages (Java 17+ layout) into [`ClassDoc`] records.
#[derive(Debug, Clone)]
pub struct JavadocParser {
    root: PathBuf,
    packages: Vec<String>,
}

impl JavadocParser {
    /// `root` may be the JavaDoc directory itself or a directory that an
    /// archive was extracted into; the real root is located up to two
    /// levels down.
    pub fn new(root: &Path, packages: &[String]) -> Self {
        Self {
            root: find_javadoc_root(root),
            packages: packages.to_vec(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All `(class_name, package)` pairs with a page under the root.
    pub fn discover_classes(&self) -> Vec<(String, String)> {
        let pattern = format!("{}/**/*.html", glob::Pattern::escape(&self.root.to_string_lossy()));
        let mut classes = Vec::new();

        match glob::glob(&pattern) {
            Ok(paths) => {
                for entry in paths.flatten() {
                    if let Some(found) = self.class_page(&entry) {
                        classes.push(found);
                    }
                }
            }
            Err(e) => warn!(pattern = %pattern, error = %e, "Invalid glob pattern"),
        }

        classes.sort();
        classes.dedup();
        info!(count = classes.len(), "Discovered JavaDoc class pages");
        classes
    }

    /// Find the page for a simple class name: configured packages first, in
    /// order, then anywhere under the root.
    pub fn locate(&self, class_name: &str) -> Option<(PathBuf, String)> {
        for package in &self.packages {
            let path = self.page_path(class_name, package);
            if path.is_file() {
                return Some((path, package.clone()));
            }
            debug!(class = class_name, package = %package, "Not in configured package");
        }

        let pattern = format!(
            "{}/**/{}.html",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            glob::Pattern::escape(class_name)
        );
        let mut candidates: Vec<_> = glob::glob(&pattern)
            .map(|paths| {
                paths
                    .flatten()
                    .filter_map(|p| self.class_page(&p).map(|(_, pkg)| (p, pkg)))
                    .collect()
            })
            .unwrap_or_default();
        candidates.sort();
        candidates.into_iter().next()
    }

    /// [`locate`](Self::locate), trying `package` before anything else.
    pub fn locate_in(&self, class_name: &str, package: &str) -> Option<(PathBuf, String)> {
        if !package.is_empty() {
            let path = self.page_path(class_name, package);
            if path.is_file() {
                return Some((path, package.to_string()));
            }
            debug!(class = class_name, package, "Not in the stub's own package");
        }
        self.locate(class_name)
    }

    fn page_path(&self, class_name: &str, package: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.join(format!("{class_name}.html"))
    }

    fn class_page(&self, path: &Path) -> Option<(String, String)> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let stem = relative.file_stem()?.to_str()?;
        if stem.contains('-') || NON_CLASS_STEMS.contains(&stem) {
            return None;
        }
        let mut package = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                let Component::Normal(segment) = component else {
                    continue;
                };
                let segment = segment.to_str()?;
                if SKIPPED_DIRS.contains(&segment) || segment.starts_with('.') {
                    return None;
                }
                package.push(segment);
            }
        }
        Some((stem.to_string(), package.join(".")))
    }

    /// Read and parse `<root>/<package path>/<class_name>.html`.
    pub fn parse_class(&self, class_name: &str, package: &str) -> Result<ClassDoc, JavadocError> {
        let path = self.page_path(class_name, package);
        if !path.is_file() {
            return Err(JavadocError::NotFound {
                class: class_name.to_string(),
                searched: path.display().to_string(),
            });
        }
        self.parse_file(class_name, package, &path)
    }

    fn parse_file(&self, class_name: &str, package: &str, path: &Path) -> Result<ClassDoc, JavadocError> {
        let html = std::fs::read_to_string(path).map_err(|source| JavadocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = parse_class_html(class_name, package, &html);
        debug!(
            class = class_name,
            methods = doc.methods.len(),
            constructors = doc.constructors.len(),
            fields = doc.fields.len(),
            "Parsed JavaDoc page"
        );
        Ok(doc)
    }

    /// Parse the requested classes, or every discovered class (keyed by
    /// simple name) when `None`.
    ///
    /// Missing or unreadable pages are logged and recorded in the stats;
    /// they never abort the batch.
    #[instrument(skip_all, name = "javadoc_parse")]
    pub fn parse_all(
        &self,
        requests: Option<&[ClassRequest]>,
    ) -> (BTreeMap<String, ClassDoc>, LoadStats) {
        let start = Instant::now();
        let mut stats = LoadStats::default();
        let mut docs = BTreeMap::new();

        let targets: Vec<(String, String, Option<(PathBuf, String)>)> = match requests {
            Some(requests) => requests
                .iter()
                .map(|r| {
                    let location = self.locate_in(&r.class_name, &r.package);
                    (r.key.clone(), r.class_name.clone(), location)
                })
                .collect(),
            None => self
                .discover_classes()
                .into_iter()
                .map(|(name, package)| {
                    let path = self.page_path(&name, &package);
                    (name.clone(), name, Some((path, package)))
                })
                .collect(),
        };
        info!(count = targets.len(), root = %self.root.display(), "Parsing JavaDoc");

        for (key, class_name, location) in targets {
            if docs.contains_key(&key) {
                debug!(class = %key, "Duplicate class page skipped");
                continue;
            }
            let Some((path, package)) = location else {
                warn!(class = %key, "No JavaDoc page found in any package");
                stats.record_error(
                    key,
                    JavadocError::NotFound {
                        searched: self.searched_locations(&class_name),
                        class: class_name,
                    },
                );
                continue;
            };
            match self.parse_file(&class_name, &package, &path) {
                Ok(doc) => {
                    stats.loaded += 1;
                    docs.insert(key, doc);
                }
                Err(e) => {
                    warn!(class = %key, error = %e, "Failed to parse JavaDoc page");
                    stats.record_error(key, e);
                }
            }
        }

        stats.duration = start.elapsed();
        info!(
            parsed = stats.loaded,
            failed = stats.errors.len(),
            duration = ?stats.duration,
            "JavaDoc parsing complete"
        );
        (docs, stats)
    }

    fn searched_locations(&self, class_name: &str) -> String {
        let mut places: Vec<String> = self
            .packages
            .iter()
            .map(|p| format!("{p}.{class_name}"))
            .collect();
        places.push(format!("{}/**/{class_name}.html", self.root.display()));
        places.join(", ")
    }
}

fn find_javadoc_root(dir: &Path) -> PathBuf {
    if !dir.exists() {
        warn!(path = %dir.display(), "JavaDoc directory does not exist");
        return dir.to_path_buf();
    }
    if dir.join("index.html").is_file() {
        return dir.to_path_buf();
    }
    for child in visible_subdirs(dir) {
        if child.join("index.html").is_file() {
            info!(path = %child.display(), "Found JavaDoc root in subdirectory");
            return child;
        }
        for grandchild in visible_subdirs(&child) {
            if grandchild.join("index.html").is_file() {
                info!(path = %grandchild.display(), "Found JavaDoc root in nested subdirectory");
                return grandchild;
            }
        }
    }
    warn!(path = %dir.display(), "No index.html found, using directory as JavaDoc root");
    dir.to_path_buf()
}

fn visible_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.') && n != "__MACOSX")
        })
        .collect();
    dirs.sort();
    dirs
}

// ── Page parsing ───────────────────────────────────────────────────

/// Parse one class page from its HTML text.
pub fn parse_class_html(class_name: &str, package: &str, html: &str) -> ClassDoc {
    let document = Html::parse_document(html);
    let region = document.select(&CLASS_DESCRIPTION).next();
    let inheritance = extract_inheritance(&document);

    let class_notes = region.and_then(|r| r.select(&NOTES).next()).map(Notes::read);
    let mut see_also: Vec<String> = class_notes
        .as_ref()
        .map(|n| n.links("See Also:"))
        .unwrap_or_default();
    see_also.extend(inheritance.extends.iter().cloned());
    see_also.extend(inheritance.implements.iter().cloned());
    see_also.sort();
    see_also.dedup();

    let since_version = class_notes
        .as_ref()
        .and_then(|n| n.plain("Since:"))
        .or_else(|| {
            let text = region.map(|r| r.text().collect::<String>())?;
            SINCE_TEXT.captures(&text).map(|c| c[1].to_string())
        });

    let deprecated = document
        .select(&TYPE_SIGNATURE)
        .next()
        .is_some_and(|sig| element_text(sig).contains("@Deprecated"))
        || region.is_some_and(|r| r.select(&DEPRECATION_BLOCK).next().is_some())
        || class_notes.as_ref().is_some_and(Notes::mentions_deprecation);

    let mut fields: Vec<FieldDoc> = document.select(&FIELD_DETAILS).filter_map(parse_field).collect();
    fields.extend(extract_inherited_fields(&document));

    ClassDoc {
        class_name: class_name.to_string(),
        package: package.to_string(),
        description: extract_class_description(&document, region),
        inheritance,
        methods: document.select(&METHOD_DETAILS).filter_map(parse_method).collect(),
        fields,
        constructors: document
            .select(&CONSTRUCTOR_DETAILS)
            .filter_map(parse_constructor)
            .collect(),
        nested_classes: extract_nested_classes(&document),
        deprecated,
        since_version,
        see_also,
    }
}

fn extract_class_description(document: &Html, region: Option<ElementRef<'_>>) -> String {
    if let Some(region) = region {
        return region
            .select(&BLOCK)
            .next()
            .map(clean_javadoc_html)
            .unwrap_or_default();
    }

    // Pages without a class-description section: the block after the type
    // signature, else the first block on the page.
    let after_signature = document.select(&TYPE_SIGNATURE).next().and_then(|sig| {
        sig.next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "div" && el.value().classes().any(|c| c == "block"))
    });
    after_signature
        .or_else(|| document.select(&BLOCK).next())
        .map(clean_javadoc_html)
        .unwrap_or_default()
}

fn extract_inheritance(document: &Html) -> Inheritance {
    let mut inheritance = Inheritance::default();
    let Some(span) = document.select(&EXTENDS_IMPLEMENTS).next() else {
        return inheritance;
    };

    #[derive(Clone, Copy)]
    enum Clause {
        Extends,
        Implements,
    }
    let mut clause = None;
    let mut generic_depth = 0usize;

    for child in span.children() {
        match child.value() {
            Node::Text(text) => {
                let lower = text.to_lowercase();
                match (lower.rfind("extends"), lower.rfind("implements")) {
                    (Some(e), Some(i)) => {
                        clause = Some(if i > e { Clause::Implements } else { Clause::Extends });
                    }
                    (Some(_), None) => clause = Some(Clause::Extends),
                    (None, Some(_)) => clause = Some(Clause::Implements),
                    (None, None) => {}
                }
                for ch in text.chars() {
                    match ch {
                        '<' => generic_depth += 1,
                        '>' => generic_depth = generic_depth.saturating_sub(1),
                        _ => {}
                    }
                }
            }
            Node::Element(_) if generic_depth == 0 => {
                let Some(el) = ElementRef::wrap(child) else {
                    continue;
                };
                let names: Vec<String> = if el.value().name() == "a" {
                    vec![element_text(el)]
                } else {
                    el.select(&LINK).map(element_text).collect()
                };
                let target = match clause {
                    Some(Clause::Extends) => &mut inheritance.extends,
                    Some(Clause::Implements) => &mut inheritance.implements,
                    None => continue,
                };
                target.extend(names.into_iter().filter(|n| !n.is_empty()));
            }
            _ => {}
        }
    }
    inheritance
}

fn extract_nested_classes(document: &Html) -> Vec<String> {
    let mut nested: Vec<String> = Vec::new();
    for name in document.select(&NESTED_CLASS_LINKS).map(element_text) {
        if !name.is_empty() && !nested.contains(&name) {
            nested.push(name);
        }
    }
    nested
}

fn extract_inherited_fields(document: &Html) -> Vec<FieldDoc> {
    let mut fields = Vec::new();
    for list in document.select(&INHERITED_FIELDS) {
        let Some(heading) = list.select(&H3).next() else {
            continue;
        };
        if !element_text(heading).to_lowercase().contains("inherited") {
            continue;
        }
        let owner = heading
            .select(&LINK)
            .next()
            .map_or_else(|| element_text(heading), element_text);
        for link in list.select(&CODE_LINK) {
            let name = element_text(link);
            if name.is_empty() {
                continue;
            }
            fields.push(FieldDoc {
                name,
                type_name: "inherited".into(),
                description: format!("Inherited from {owner}"),
                deprecated: false,
                since_version: None,
                modifiers: Vec::new(),
                inherited: true,
            });
        }
    }
    fields
}

// ── Member sections ────────────────────────────────────────────────

fn parse_method(section: ElementRef<'_>) -> Option<MethodDoc> {
    let signature = element_text(section.select(&MEMBER_SIGNATURE).next()?);
    let parsed = parse_member_signature(&signature);
    let name = section
        .select(&H3)
        .next()
        .map(element_text)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| parsed.name.clone());
    if name.is_empty() {
        return None;
    }

    let block = section.select(&BLOCK).next();
    let notes = section.select(&NOTES).next().map(Notes::read).unwrap_or_default();
    let return_type = if parsed.return_type.is_empty() {
        "void".to_string()
    } else {
        parsed.return_type.clone()
    };

    Some(MethodDoc {
        name,
        description: block.map(clean_javadoc_html).unwrap_or_default(),
        parameters: merge_parameters(&parsed.params, notes.code_entries("Parameters:")),
        return_description: notes.rich("Returns:"),
        return_type,
        deprecated: is_member_deprecated(section, &signature, &notes),
        since_version: notes.plain("Since:"),
        see_also: notes.links("See Also:"),
        throws: notes.code_entries("Throws:").into_iter().collect(),
        modifiers: parsed.modifiers,
        examples: block.map(code_examples).unwrap_or_default(),
        overrides: notes.plain("Overrides:"),
        signature,
    })
}

fn parse_constructor(section: ElementRef<'_>) -> Option<ConstructorDoc> {
    let signature = element_text(section.select(&MEMBER_SIGNATURE).next()?);
    let parsed = parse_member_signature(&signature);
    let notes = section.select(&NOTES).next().map(Notes::read).unwrap_or_default();

    Some(ConstructorDoc {
        description: section
            .select(&BLOCK)
            .next()
            .map(clean_javadoc_html)
            .unwrap_or_default(),
        parameters: merge_parameters(&parsed.params, notes.code_entries("Parameters:")),
        throws: notes.code_entries("Throws:").into_iter().collect(),
        deprecated: is_member_deprecated(section, &signature, &notes),
        since_version: notes.plain("Since:"),
        modifiers: parsed.modifiers,
        signature,
    })
}

fn parse_field(section: ElementRef<'_>) -> Option<FieldDoc> {
    let signature = element_text(section.select(&MEMBER_SIGNATURE).next()?);
    let parsed = parse_member_signature(&signature);
    let name = section
        .select(&H3)
        .next()
        .map(element_text)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| parsed.name.clone());
    if name.is_empty() {
        return None;
    }
    let notes = section.select(&NOTES).next().map(Notes::read).unwrap_or_default();

    Some(FieldDoc {
        name,
        type_name: if parsed.return_type.is_empty() {
            "Object".to_string()
        } else {
            parsed.return_type
        },
        description: section
            .select(&BLOCK)
            .next()
            .map(clean_javadoc_html)
            .unwrap_or_default(),
        deprecated: is_member_deprecated(section, &signature, &notes),
        since_version: notes.plain("Since:"),
        modifiers: parsed.modifiers,
        inherited: false,
    })
}

fn is_member_deprecated(section: ElementRef<'_>, signature: &str, notes: &Notes<'_>) -> bool {
    signature.contains("@Deprecated")
        || section.select(&DEPRECATION_BLOCK).next().is_some()
        || notes.mentions_deprecation()
}

/// Parameters in signature order, decorated with their documented
/// descriptions; documented names absent from the signature are appended.
fn merge_parameters(signature: &[(String, String)], documented: Vec<(String, String)>) -> Vec<ParameterDoc> {
    let mut params: Vec<ParameterDoc> = signature
        .iter()
        .map(|(ty, name)| ParameterDoc {
            name: name.clone(),
            description: documented
                .iter()
                .find(|(doc_name, _)| doc_name == name)
                .map(|(_, d)| d.clone())
                .unwrap_or_default(),
            type_hint: (!ty.is_empty()).then(|| ty.clone()),
        })
        .collect();

    for (name, description) in documented {
        if !params.iter().any(|p| p.name == name) {
            params.push(ParameterDoc {
                name,
                description,
                type_hint: None,
            });
        }
    }
    params
}

// ── dl.notes ───────────────────────────────────────────────────────

/// Term → definitions view of a `dl.notes` list. Every `dd` up to the next
/// `dt` belongs to the preceding term.
#[derive(Debug, Default)]
struct Notes<'a> {
    terms: Vec<(String, Vec<ElementRef<'a>>)>,
}

impl<'a> Notes<'a> {
    fn read(dl: ElementRef<'a>) -> Self {
        let mut terms: Vec<(String, Vec<ElementRef<'a>>)> = Vec::new();
        for child in dl.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "dt" => terms.push((element_text(child), Vec::new())),
                "dd" => {
                    if let Some((_, dds)) = terms.last_mut() {
                        dds.push(child);
                    }
                }
                _ => {}
            }
        }
        Self { terms }
    }

    fn definitions<'s>(&'s self, term: &'s str) -> impl Iterator<Item = ElementRef<'a>> + 's {
        self.terms
            .iter()
            .filter(move |(t, _)| t == term)
            .flat_map(|(_, dds)| dds.iter().copied())
    }

    fn mentions_deprecation(&self) -> bool {
        self.terms
            .iter()
            .any(|(t, _)| t.to_lowercase().contains("deprecated"))
    }

    /// Whitespace-normalized text of the definitions, or `None` when empty.
    fn plain(&self, term: &str) -> Option<String> {
        let text = self
            .definitions(term)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    }

    /// Fully cleaned text of the definitions.
    fn rich(&self, term: &str) -> String {
        self.definitions(term)
            .map(clean_javadoc_html)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Link texts, or the whole definition when it holds no link.
    fn links(&self, term: &str) -> Vec<String> {
        let mut out = Vec::new();
        for dd in self.definitions(term) {
            let links: Vec<String> = dd
                .select(&LINK)
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect();
            if links.is_empty() {
                let text = element_text(dd);
                if !text.is_empty() {
                    out.push(text);
                }
            } else {
                out.extend(links);
            }
        }
        out
    }

    /// `<code>name</code> - description` entries, as used for parameters
    /// and exceptions.
    fn code_entries(&self, term: &str) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for dd in self.definitions(term) {
            let mut current: Option<(String, String)> = None;
            for child in dd.children() {
                match child.value() {
                    Node::Element(el) if el.name() == "code" => {
                        entries.extend(current.take());
                        let name = ElementRef::wrap(child).map(element_text).unwrap_or_default();
                        current = Some((name, String::new()));
                    }
                    Node::Text(text) => {
                        if let Some((_, desc)) = current.as_mut() {
                            desc.push_str(text);
                        }
                    }
                    Node::Element(_) => {
                        if let (Some((_, desc)), Some(el)) = (current.as_mut(), ElementRef::wrap(child)) {
                            desc.extend(el.text());
                        }
                    }
                    _ => {}
                }
            }
            entries.extend(current);
        }

        entries
            .into_iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, desc)| {
                let desc = normalize_formatting(&desc);
                let desc = desc.strip_prefix('-').unwrap_or(&desc).trim().to_string();
                (name, desc)
            })
            .collect()
    }
}

// ── Validation ─────────────────────────────────────────────────────

/// Completeness report for one parsed class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassDocValidation {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub statistics: ClassDocStatistics,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassDocStatistics {
    pub total_methods: usize,
    pub total_constructors: usize,
    pub total_fields: usize,
    pub methods_with_descriptions: usize,
    pub methods_with_parameters: usize,
    pub methods_with_return_docs: usize,
    pub constructors_with_descriptions: usize,
    pub fields_with_descriptions: usize,
    pub method_description_percentage: Option<f64>,
    pub constructor_description_percentage: Option<f64>,
}

/// Check how completely a class page was documented.
pub fn validate_class_doc(doc: &ClassDoc) -> ClassDocValidation {
    let mut warnings = Vec::new();
    let mut stats = ClassDocStatistics {
        total_methods: doc.methods.len(),
        total_constructors: doc.constructors.len(),
        total_fields: doc.fields.len(),
        ..ClassDocStatistics::default()
    };

    if doc.description.trim().is_empty() {
        warnings.push("Class has no description".to_string());
    }

    for method in &doc.methods {
        if !method.description.trim().is_empty() {
            stats.methods_with_descriptions += 1;
        }
        if !method.parameters.is_empty() {
            stats.methods_with_parameters += 1;
        }
        for param in method.parameters.iter().filter(|p| p.description.trim().is_empty()) {
            warnings.push(format!(
                "Method {} parameter {} has no description",
                method.name, param.name
            ));
        }
        if !method.return_description.trim().is_empty() {
            stats.methods_with_return_docs += 1;
        }
    }
    stats.constructors_with_descriptions = doc
        .constructors
        .iter()
        .filter(|c| !c.description.trim().is_empty())
        .count();
    stats.fields_with_descriptions = doc
        .fields
        .iter()
        .filter(|f| !f.description.trim().is_empty())
        .count();

    if stats.total_methods > 0 {
        stats.method_description_percentage =
            Some(percentage(stats.methods_with_descriptions, stats.total_methods));
    }
    if stats.total_constructors > 0 {
        stats.constructor_description_percentage = Some(percentage(
            stats.constructors_with_descriptions,
            stats.total_constructors,
        ));
    }

    ClassDocValidation {
        valid: warnings.len() <= MAX_VALIDATION_WARNINGS,
        warnings,
        statistics: stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE_PAGE: &str = r##"<!DOCTYPE HTML>
<html lang="en">
<head><title>Tree</title></head>
<body class="class-declaration-page">
<main role="main">
<div class="header">
<h1 title="Class Tree" class="title">Class Tree</h1>
</div>
<section class="class-description" id="class-description">
<div class="type-signature"><span class="modifiers">public class </span><span class="element-name type-name-label">Tree</span>
<span class="extends-implements">extends <a href="../../../java/lang/Object.html">Object</a>
implements <a href="TreeProperties.html">TreeProperties</a>, <a href="Comparable.html">Comparable</a>&lt;<a href="Tree.html">Tree</a>&gt;</span></div>
<div class="block">Utility class to access a <code>Collection</code> of Paths.
<p>A Tree is a collection of paths.</p></div>
<dl class="notes">
<dt>Since:</dt>
<dd>3.0</dd>
<dt>See Also:</dt>
<dd><ul class="see-list"><li><a href="Path.html"><code>Path</code></a></li></ul></dd>
</dl>
</section>
<section class="summary">
<ul class="summary-list">
<li><section class="nested-class-summary" id="nested-class-summary"><h2>Nested Class Summary</h2>
<div class="summary-table"><div class="col-second"><code><a href="Tree.Builder.html" class="type-name-link">Tree.Builder</a></code></div></div>
</section></li>
<li><section class="field-summary" id="field-summary"><h2>Field Summary</h2>
<div class="inherited-list">
<h3 id="fields-inherited-from-class-TreeProperties">Fields inherited from interface&nbsp;<a href="TreeProperties.html">TreeProperties</a></h3>
<code><a href="TreeProperties.html#TREE_COLOR">TREE_COLOR</a>, <a href="TreeProperties.html#TREE_LABEL">TREE_LABEL</a></code></div>
</section></li>
</ul>
</section>
<section class="details">
<ul class="details-list">
<li><section class="field-details" id="field-detail"><h2>Field Details</h2>
<ul class="member-list"><li><section class="detail" id="MAX_NODES"><h3>MAX_NODES</h3>
<div class="member-signature"><span class="modifiers">public static final</span>&nbsp;<span class="return-type">int</span>&nbsp;<span class="element-name">MAX_NODES</span></div>
<div class="block">Maximum number of nodes.</div>
</section></li></ul></section></li>
<li><section class="constructor-details" id="constructor-detail"><h2>Constructor Details</h2>
<ul class="member-list">
<li><section class="detail" id="&lt;init&gt;()"><h3>Tree</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="element-name">Tree</span>()</div>
<div class="block">Instantiates a new empty Tree.</div></section></li>
<li><section class="detail" id="&lt;init&gt;(java.util.Collection)"><h3>Tree</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="element-name">Tree</span><wbr><span class="parameters">(<a href="Collection.html">Collection</a>&lt;<a href="Path.html">Path</a>&gt;&nbsp;paths)</span></div>
<div class="block">Instantiates a new Tree from a set of paths.</div>
<dl class="notes"><dt>Parameters:</dt><dd><code>paths</code> - the Collection of paths forming this tree.</dd></dl>
</section></li></ul></section></li>
<li><section class="method-details" id="method-detail"><h2>Method Details</h2>
<ul class="member-list">
<li><section class="detail" id="getLength()"><h3>getLength</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="return-type">double</span>&nbsp;<span class="element-name">getLength</span>()</div>
<div class="block">Gets the cable length.</div>
<dl class="notes"><dt>Returns:</dt><dd>the cable length of the tree</dd></dl>
</section></li>
<li><section class="detail" id="scale(double,double)"><h3>scale</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="return-type">void</span>&nbsp;<span class="element-name">scale</span><wbr><span class="parameters">(double&nbsp;xScale,
 double&nbsp;yScale)</span>
                throws <span class="exceptions"><a href="IAE.html">IllegalArgumentException</a></span></div>
<div class="block">Scales the tree.
<pre>
    tree.scale(2, 2);
    tree.show();
</pre></div>
<dl class="notes">
<dt>Parameters:</dt>
<dd><code>xScale</code> - the scaling factor for x coordinates</dd>
<dd><code>yScale</code> - the scaling factor for y coordinates</dd>
<dt>Throws:</dt>
<dd><code><a href="IAE.html">IllegalArgumentException</a></code> - if a factor is zero</dd>
<dt>Since:</dt>
<dd>4.0.2</dd>
<dt>See Also:</dt>
<dd><ul class="see-list"><li><a href="#translate(double,double)"><code>translate(double, double)</code></a></li></ul></dd>
</dl>
</section></li>
<li><section class="detail" id="load(java.lang.String)"><h3>load</h3>
<div class="member-signature"><span class="annotations">@Deprecated
</span><span class="modifiers">public static</span>&nbsp;<span class="return-type"><a href="Tree.html">Tree</a></span>&nbsp;<span class="element-name">load</span><wbr><span class="parameters">(<a href="String.html">String</a>&nbsp;filePath)</span></div>
<div class="deprecation-block"><span class="deprecated-label">Deprecated.</span>
<div class="deprecation-comment">use the constructor instead</div></div>
<div class="block">Loads a tree from a file.</div>
</section></li>
<li><section class="detail" id="toString()"><h3>toString</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="return-type"><a href="String.html">String</a></span>&nbsp;<span class="element-name">toString</span>()</div>
<dl class="notes">
<dt>Overrides:</dt>
<dd><code>toString</code>&nbsp;in class&nbsp;<code>Object</code></dd>
</dl>
</section></li>
</ul></section></li></ul></section></main></body></html>"##;

    fn tree() -> ClassDoc {
        parse_class_html("Tree", "sc.fiji.snt", TREE_PAGE)
    }

    #[test]
    fn class_level_documentation() {
        let doc = tree();
        assert_eq!(doc.class_name, "Tree");
        assert_eq!(doc.package, "sc.fiji.snt");
        assert_eq!(
            doc.description,
            "Utility class to access a Collection of Paths.\n\nA Tree is a collection of paths."
        );
        assert_eq!(doc.since_version.as_deref(), Some("3.0"));
        assert!(!doc.deprecated);
        assert_eq!(doc.nested_classes, vec!["Tree.Builder"]);
        assert_eq!(doc.see_also, vec!["Comparable", "Object", "Path", "TreeProperties"]);
    }

    #[test]
    fn inheritance_skips_generic_arguments() {
        let doc = tree();
        assert_eq!(doc.inheritance.extends, vec!["Object"]);
        assert_eq!(doc.inheritance.implements, vec!["TreeProperties", "Comparable"]);
    }

    #[test]
    fn methods_in_page_order() {
        let names: Vec<_> = tree().methods.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["getLength", "scale", "load", "toString"]);
    }

    #[test]
    fn simple_getter() {
        let doc = tree();
        let m = &doc.methods[0];
        assert_eq!(m.signature, "public double getLength()");
        assert_eq!(m.return_type, "double");
        assert_eq!(m.description, "Gets the cable length.");
        assert_eq!(m.return_description, "the cable length of the tree");
        assert!(m.parameters.is_empty());
        assert!(!m.deprecated);
    }

    #[test]
    fn every_dd_after_a_term_is_collected() {
        let doc = tree();
        let scale = &doc.methods[1];
        assert_eq!(scale.parameters.len(), 2);
        assert_eq!(scale.parameters[0].name, "xScale");
        assert_eq!(scale.parameters[0].type_hint.as_deref(), Some("double"));
        assert_eq!(scale.parameters[1].description, "the scaling factor for y coordinates");
        assert_eq!(
            scale.throws.get("IllegalArgumentException").map(String::as_str),
            Some("if a factor is zero")
        );
        assert_eq!(scale.since_version.as_deref(), Some("4.0.2"));
        assert_eq!(scale.see_also, vec!["translate(double, double)"]);
    }

    #[test]
    fn pre_blocks_become_examples_and_fenced_text() {
        let doc = tree();
        let scale = &doc.methods[1];
        assert_eq!(scale.examples.len(), 1);
        assert!(scale.examples[0].starts_with("tree.scale(2, 2);"));
        assert!(scale.description.starts_with("Scales the tree."));
        assert!(scale.description.contains("```\ntree.scale(2, 2);\ntree.show();\n```"));
    }

    #[test]
    fn deprecated_static_method() {
        let doc = tree();
        let load = &doc.methods[2];
        assert!(load.deprecated);
        assert!(load.is_static());
        assert_eq!(load.return_type, "Tree");
        assert_eq!(load.description, "Loads a tree from a file.");
        assert_eq!(load.parameters[0].name, "filePath");
        assert!(load.parameters[0].description.is_empty());
    }

    #[test]
    fn overrides_note() {
        let doc = tree();
        assert_eq!(doc.methods[3].overrides.as_deref(), Some("toString in class Object"));
        assert!(doc.methods[3].description.is_empty());
    }

    #[test]
    fn constructors_and_fields() {
        let doc = tree();
        assert_eq!(doc.constructors.len(), 2);
        assert!(doc.constructors[0].parameters.is_empty());
        let ctor = &doc.constructors[1];
        assert_eq!(ctor.parameters[0].name, "paths");
        assert_eq!(ctor.parameters[0].type_hint.as_deref(), Some("Collection<Path>"));
        assert_eq!(ctor.parameters[0].description, "the Collection of paths forming this tree.");

        assert_eq!(doc.fields.len(), 3);
        let max = &doc.fields[0];
        assert_eq!(max.name, "MAX_NODES");
        assert_eq!(max.type_name, "int");
        assert_eq!(max.modifiers, vec!["public", "static", "final"]);
        assert!(!max.inherited);
        assert!(doc.fields[1].inherited);
        assert_eq!(doc.fields[1].name, "TREE_COLOR");
        assert_eq!(doc.fields[1].description, "Inherited from TreeProperties");
    }

    #[test]
    fn documented_names_missing_from_signature_are_appended() {
        let params = merge_parameters(
            &[("int".into(), "a".into())],
            vec![("b".into(), "extra".into()), ("a".into(), "first".into())],
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].description, "first");
        assert_eq!(params[1].name, "b");
        assert!(params[1].type_hint.is_none());
    }

    #[test]
    fn legacy_layout_description_fallback() {
        let html = r#"<html><body><div class="type-signature">public class Old</div>
<div class="block">Old style description.</div></body></html>"#;
        let doc = parse_class_html("Old", "", html);
        assert_eq!(doc.description, "Old style description.");
        assert!(doc.methods.is_empty());
    }

    #[test]
    fn validation_counts_and_warnings() {
        let report = validate_class_doc(&tree());
        assert!(report.valid);
        assert_eq!(report.statistics.total_methods, 4);
        assert_eq!(report.statistics.methods_with_descriptions, 3);
        assert_eq!(report.statistics.methods_with_return_docs, 1);
        assert_eq!(report.statistics.method_description_percentage, Some(75.0));
        assert!(
            report
                .warnings
                .contains(&"Method load parameter filePath has no description".to_string())
        );
    }

    #[test]
    fn too_many_warnings_is_invalid() {
        let mut doc = tree();
        doc.description.clear();
        let method = doc.methods[0].clone();
        for i in 0..11 {
            let mut m = method.clone();
            m.parameters.push(ParameterDoc {
                name: format!("p{i}"),
                description: String::new(),
                type_hint: None,
            });
            doc.methods.push(m);
        }
        assert!(!validate_class_doc(&doc).valid);
    }

    #[test]
    fn discovery_and_lookup_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("snt-javadoc");
        let pkg = root.join("sc/fiji/snt");
        std::fs::create_dir_all(pkg.join("class-use")).unwrap();
        std::fs::write(root.join("index.html"), "<html></html>").unwrap();
        std::fs::write(pkg.join("Tree.html"), TREE_PAGE).unwrap();
        std::fs::write(pkg.join("package-summary.html"), "<html></html>").unwrap();
        std::fs::write(pkg.join("class-use/Tree.html"), "<html></html>").unwrap();

        // Root is found one level below the extract directory.
        let parser = JavadocParser::new(tmp.path(), &[]);
        assert_eq!(parser.root(), root.as_path());
        assert_eq!(
            parser.discover_classes(),
            vec![("Tree".to_string(), "sc.fiji.snt".to_string())]
        );

        let (path, package) = parser.locate("Tree").unwrap();
        assert_eq!(package, "sc.fiji.snt");
        assert_eq!(path, pkg.join("Tree.html"));

        let requests = [ClassRequest::simple("Tree"), ClassRequest::simple("Missing")];
        let (docs, stats) = parser.parse_all(Some(&requests));
        assert_eq!(docs.len(), 1);
        assert_eq!(stats.loaded, 1);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].0, "Missing");
    }

    #[test]
    fn configured_packages_are_tried_first() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), "").unwrap();
        for pkg in ["a/b", "c"] {
            let dir = tmp.path().join(pkg);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("Tree.html"), TREE_PAGE).unwrap();
        }
        let parser = JavadocParser::new(tmp.path(), &["c".to_string(), "a.b".to_string()]);
        assert_eq!(parser.locate("Tree").unwrap().1, "c");

        let parser = JavadocParser::new(tmp.path(), &[]);
        assert_eq!(parser.locate("Tree").unwrap().1, "a.b");
    }

    #[test]
    fn same_simple_name_resolves_to_each_stubs_package() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), "").unwrap();
        for (pkg, method) in [("a/one", "alpha"), ("b/two", "beta")] {
            let dir = tmp.path().join(pkg);
            std::fs::create_dir_all(&dir).unwrap();
            let page = TREE_PAGE.replace("getLength", method);
            std::fs::write(dir.join("Tree.html"), page).unwrap();
        }
        let parser = JavadocParser::new(tmp.path(), &[]);
        let requests = [
            ClassRequest {
                key: "a.one.Tree".to_string(),
                class_name: "Tree".to_string(),
                package: "a.one".to_string(),
            },
            ClassRequest {
                key: "b.two.Tree".to_string(),
                class_name: "Tree".to_string(),
                package: "b.two".to_string(),
            },
        ];
        let (docs, stats) = parser.parse_all(Some(&requests));
        assert_eq!(stats.loaded, 2);
        assert_eq!(docs["a.one.Tree"].package, "a.one");
        assert_eq!(docs["b.two.Tree"].package, "b.two");
        assert!(docs["a.one.Tree"].methods.iter().any(|m| m.name == "alpha"));
        assert!(docs["b.two.Tree"].methods.iter().any(|m| m.name == "beta"));
    }

    #[test]
    fn parse_class_reports_missing_page() {
        let tmp = tempfile::tempdir().unwrap();
        let parser = JavadocParser::new(tmp.path(), &[]);
        let err = parser.parse_class("Nope", "x.y").unwrap_err();
        assert!(matches!(err, JavadocError::NotFound { .. }));
    }
}
