// Integration test utilities and fixture management for stubdoc.

use std::path::{Path, PathBuf};

use stubdoc_core::config::{CONFIG_FILE_NAME, StubdocConfig};

/// JavaDoc page for `sc.fiji.snt.Tree` in the Java 17 layout.
pub const TREE_PAGE: &str = r##"<!DOCTYPE HTML>
<html lang="en">
<head><title>Tree</title></head>
<body class="class-declaration-page">
<main role="main">
<section class="class-description" id="class-description">
<div class="type-signature"><span class="modifiers">public class </span><span class="element-name type-name-label">Tree</span>
<span class="extends-implements">extends <a href="Object.html">Object</a></span></div>
<div class="block">Utility class to access a <code>Collection</code> of Paths.</div>
<dl class="notes"><dt>Since:</dt><dd>3.0</dd></dl>
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
</ul></section></li>
<li><section class="method-details" id="method-detail"><h2>Method Details</h2>
<ul class="member-list">
<li><section class="detail" id="getLength()"><h3>getLength</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="return-type">double</span>&nbsp;<span class="element-name">getLength</span>()</div>
<div class="block">Gets the cable length.</div>
<dl class="notes"><dt>Returns:</dt><dd>the cable length of the tree</dd></dl>
</section></li>
<li><section class="detail" id="scale(double,double)"><h3>scale</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="return-type">void</span>&nbsp;<span class="element-name">scale</span><wbr><span class="parameters">(double&nbsp;xScale,
 double&nbsp;yScale)</span></div>
<div class="block">Scales the tree.</div>
<dl class="notes">
<dt>Parameters:</dt>
<dd><code>xScale</code> - the scaling factor for x coordinates</dd>
<dd><code>yScale</code> - the scaling factor for y coordinates</dd>
</dl>
</section></li>
<li><section class="detail" id="saveAsSWC(java.lang.String)"><h3>saveAsSWC</h3>
<div class="member-signature"><span class="modifiers">public</span>&nbsp;<span class="return-type">boolean</span>&nbsp;<span class="element-name">saveAsSWC</span><wbr><span class="parameters">(<a href="String.html">String</a>&nbsp;filePath)</span></div>
<div class="block">Exports this tree to an SWC file.</div>
<dl class="notes"><dt>Returns:</dt><dd>true if the file was written</dd></dl>
</section></li>
<li><section class="detail" id="load(java.lang.String)"><h3>load</h3>
<div class="member-signature"><span class="annotations">@Deprecated
</span><span class="modifiers">public static</span>&nbsp;<span class="return-type"><a href="Tree.html">Tree</a></span>&nbsp;<span class="element-name">load</span><wbr><span class="parameters">(<a href="String.html">String</a>&nbsp;filePath)</span></div>
<div class="deprecation-block"><span class="deprecated-label">Deprecated.</span></div>
<div class="block">Loads a tree from a file.</div>
</section></li>
</ul></section></li></ul></section></main></body></html>"##;

/// Stub for `Tree`, as written by the reflection extractor.
pub const TREE_STUB: &str = r#"{
  "class_name": "Tree",
  "package": "sc.fiji.snt",
  "extracted_at": "2025-01-01T00:00:00",
  "extractor_version": "1.0",
  "methods": [
    {"name": "getLength", "overloads": [
      {"signature": "() -> float", "params": [], "return_type": "float", "java_return_type": "double"}
    ], "documentation": "Java method: getLength"},
    {"name": "scale", "overloads": [
      {"signature": "(arg0: float, arg1: float) -> None",
       "params": [
         {"name": "arg0", "type": "float", "java_type": "double"},
         {"name": "arg1", "type": "float", "java_type": "double"}
       ],
       "return_type": "None", "java_return_type": "void"}
    ]},
    {"name": "saveAsSWC", "overloads": [
      {"signature": "(arg0: str) -> bool",
       "params": [{"name": "arg0", "type": "str", "java_type": "java.lang.String"}],
       "return_type": "bool", "java_return_type": "boolean"}
    ]},
    {"name": "load", "overloads": [
      {"signature": "(arg0: str) -> Tree",
       "params": [{"name": "arg0", "type": "str", "java_type": "java.lang.String"}],
       "return_type": "Tree", "java_return_type": "sc.fiji.snt.Tree"}
    ]},
    {"name": "getRoot", "overloads": [
      {"signature": "() -> PointInImage", "params": [], "return_type": "PointInImage", "java_return_type": "sc.fiji.snt.util.PointInImage"}
    ]}
  ],
  "fields": [
    {"name": "MAX_NODES", "type": "int", "java_type": "int"}
  ],
  "constructors": [
    {"name": "Tree", "overloads": [
      {"signature": "() -> None", "params": [], "return_type": "None", "java_return_type": "void"}
    ]}
  ]
}"#;

/// Stub for `Path`, which has no JavaDoc page in the fixture tree.
pub const PATH_STUB: &str = r#"{
  "class_name": "Path",
  "package": "sc.fiji.snt",
  "extracted_at": "2025-01-01T00:00:00",
  "extractor_version": "1.0",
  "methods": [
    {"name": "setColor", "overloads": [
      {"signature": "(arg0: Color) -> None",
       "params": [{"name": "arg0", "type": "Color", "java_type": "java.awt.Color"}],
       "return_type": "None", "java_return_type": "void"}
    ]},
    {"name": "isPrimary", "overloads": [
      {"signature": "() -> bool", "params": [], "return_type": "bool", "java_return_type": "boolean"}
    ]}
  ],
  "fields": [],
  "constructors": []
}"#;

/// A temporary project with a JavaDoc tree and a stub directory.
///
/// Layout:
/// ```text
/// <root>/javadoc/index.html
/// <root>/javadoc/sc/fiji/snt/Tree.html
/// <root>/stubs/Tree.json
/// <root>/stubs/Path.json
/// ```
#[derive(Debug)]
pub struct TestProject {
    pub dir: tempfile::TempDir,
}

impl TestProject {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `Tree` with a JavaDoc page and `Path` without one.
    pub fn snt() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let root = dir.path();

        let package = root.join("javadoc/sc/fiji/snt");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::write(root.join("javadoc/index.html"), "<html><body>SNT API</body></html>").unwrap();
        std::fs::write(package.join("Tree.html"), TREE_PAGE).unwrap();
        std::fs::write(package.join("package-summary.html"), "<html></html>").unwrap();

        let stubs = root.join("stubs");
        std::fs::create_dir_all(&stubs).unwrap();
        std::fs::write(stubs.join("Tree.json"), TREE_STUB).unwrap();
        std::fs::write(stubs.join("Path.json"), PATH_STUB).unwrap();

        Self { dir }
    }

    /// Two classes named `Tree`, in `a.one` and `b.two`, each with a
    /// JavaDoc page and a stub declaring one method (`alpha` or `beta`).
    pub fn same_named_classes() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let root = dir.path();
        std::fs::create_dir_all(root.join("stubs")).unwrap();
        std::fs::create_dir_all(root.join("javadoc")).unwrap();
        std::fs::write(root.join("javadoc/index.html"), "<html></html>").unwrap();

        for (package, method) in [("a.one", "alpha"), ("b.two", "beta")] {
            let package_dir = root.join("javadoc").join(package.replace('.', "/"));
            std::fs::create_dir_all(&package_dir).unwrap();
            let page = TREE_PAGE
                .replace("getLength", method)
                .replace("Gets the cable length.", &format!("Documents {method}."));
            std::fs::write(package_dir.join("Tree.html"), page).unwrap();

            let stub = serde_json::json!({
                "class_name": "Tree",
                "package": package,
                "extracted_at": "2025-01-01T00:00:00",
                "extractor_version": "1.0",
                "methods": [{"name": method, "overloads": [{
                    "signature": "() -> float",
                    "params": [],
                    "return_type": "float",
                    "java_return_type": "double"
                }]}],
                "fields": [],
                "constructors": []
            });
            let file = root.join("stubs").join(format!("{}_Tree.json", package.replace('.', "_")));
            std::fs::write(file, stub.to_string()).unwrap();
        }

        Self { dir }
    }

    /// Add a stub file that is not valid JSON.
    pub fn with_broken_stub(self) -> Self {
        std::fs::write(self.stubs_dir().join("Broken.json"), "{ \"class_name\": ").unwrap();
        self
    }

    pub fn stubs_dir(&self) -> PathBuf {
        self.path().join("stubs")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join("enhanced")
    }

    /// Default configuration resolved against the project root, with the
    /// fixture package listed first.
    pub fn config(&self) -> StubdocConfig {
        let mut config = StubdocConfig::default();
        config.javadoc.packages = vec!["sc.fiji.snt".into()];
        config.resolve_paths(self.path());
        config
    }

    /// Write `stubdoc.toml` with relative paths and return its location.
    pub fn write_config(&self) -> PathBuf {
        let mut config = StubdocConfig::default();
        config.javadoc.packages = vec!["sc.fiji.snt".into()];
        let path = self.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();
        path
    }

    /// Read and decode a written enhanced file.
    pub fn enhanced_json(&self, class_name: &str) -> serde_json::Value {
        let path = self.output_dir().join(format!("{class_name}_enhanced.json"));
        let raw = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
        serde_json::from_str(&raw).unwrap()
    }
}
