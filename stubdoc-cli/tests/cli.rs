use assert_cmd::Command;
use predicates::prelude::*;

use stubdoc_test::TestProject;

fn stubdoc() -> Command {
    let mut cmd = Command::cargo_bin("stubdoc").unwrap();
    cmd.env_remove("STUBDOC_CONFIG").env_remove("RUST_LOG");
    cmd
}

// ── init ─────────────────────────────────────────────────────────

#[test]
fn init_writes_default_config_once() {
    let tmp = tempfile::tempdir().unwrap();

    stubdoc()
        .arg("init")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("stubdoc.toml"));

    let written = std::fs::read_to_string(tmp.path().join("stubdoc.toml")).unwrap();
    assert!(written.contains("[matching]"));
    assert!(written.contains("fuzzy_threshold = 0.8"));

    stubdoc()
        .arg("init")
        .arg(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    stubdoc().arg("init").arg(tmp.path()).arg("--force").assert().success();
}

// ── enhance ──────────────────────────────────────────────────────

#[test]
fn enhance_writes_output_and_summary() {
    let project = TestProject::snt();
    let config = project.write_config();

    stubdoc()
        .args(["enhance", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Classes enhanced: 2"))
        .stdout(predicate::str::contains("No JavaDoc page (1)"));

    assert!(project.output_dir().join("Tree_enhanced.json").is_file());
    assert!(project.output_dir().join("method_index.json").is_file());
}

#[test]
fn enhance_uses_stubdoc_toml_in_working_directory() {
    let project = TestProject::snt();
    project.write_config();

    stubdoc()
        .current_dir(project.path())
        .args(["enhance", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(project.output_dir().join("Path_enhanced.json").is_file());
}

#[test]
fn enhance_partial_failure_exit_code() {
    let project = TestProject::snt().with_broken_stub();
    let config = project.write_config();

    stubdoc()
        .args(["enhance", "--config"])
        .arg(&config)
        .assert()
        .code(10)
        .stdout(predicate::str::contains("Warnings (1)"));
}

#[test]
fn enhance_missing_stub_directory_exit_code() {
    let project = TestProject::snt();
    let config = project.write_config();
    std::fs::remove_dir_all(project.stubs_dir()).unwrap();

    stubdoc()
        .args(["enhance", "--config"])
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Stub directory not found"));
}

#[test]
fn invalid_threshold_is_a_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("stubdoc.toml");
    std::fs::write(&config, "[matching]\nfuzzy_threshold = 1.5\n").unwrap();

    stubdoc()
        .args(["enhance", "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fuzzy_threshold"));
}

#[test]
fn diff_shows_changes_without_writing() {
    let project = TestProject::snt();
    let config = project.write_config();

    stubdoc()
        .args(["enhance", "--diff", "--class", "Tree", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("+++"))
        .stdout(predicate::str::contains("Gets the cable length."))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!project.output_dir().exists());
}

// ── report / validate ────────────────────────────────────────────

#[test]
fn report_json_is_machine_readable() {
    let project = TestProject::snt();
    let config = project.write_config();

    let output = stubdoc()
        .args(["report", "--json", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["total_classes"], 2);
    assert_eq!(report["match_type_distribution"]["exact"], 4);
    assert!(!project.output_dir().exists(), "report never writes files");
}

#[test]
fn validate_stubs_then_enhanced_files() {
    let project = TestProject::snt();
    let config = project.write_config();

    stubdoc()
        .args(["validate", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid:    0"));

    stubdoc().args(["enhance", "-q", "--config"]).arg(&config).assert().success();

    stubdoc()
        .args(["validate", "--enhanced", "--warnings", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Enhanced files:       2"))
        .stdout(predicate::str::contains("No class-level JavaDoc description"));
}

#[test]
fn validate_reports_undecodable_stub() {
    let project = TestProject::snt().with_broken_stub();
    let config = project.write_config();

    stubdoc()
        .args(["validate", "--config"])
        .arg(&config)
        .assert()
        .code(10)
        .stdout(predicate::str::contains("FAIL  Broken.json"));
}

// ── search / clean ───────────────────────────────────────────────

#[test]
fn search_requires_an_index() {
    let project = TestProject::snt();
    let config = project.write_config();

    stubdoc()
        .args(["search", "length", "--config"])
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn search_finds_methods_by_description_and_category() {
    let project = TestProject::snt();
    let config = project.write_config();
    stubdoc().args(["enhance", "-q", "--config"]).arg(&config).assert().success();

    stubdoc()
        .args(["search", "cable", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tree.getLength"));

    stubdoc()
        .args(["search", "", "--category", "setters", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Path.setColor"))
        .stdout(predicate::str::contains("Tree.").not());

    stubdoc()
        .args(["search", "x", "--category", "Nonsense", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn clean_keeps_recent_backups() {
    let project = TestProject::snt();
    let config = project.write_config();
    for _ in 0..2 {
        stubdoc().args(["enhance", "-q", "--config"]).arg(&config).assert().success();
    }

    stubdoc()
        .args(["clean", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 backup(s)"));
    assert_eq!(std::fs::read_dir(project.output_dir().join(".backups")).unwrap().count(), 2);
}
