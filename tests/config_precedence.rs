//! Configuration merging and discovery tests.
//!
//! Covers the precedence chain (built-in defaults, user file, project
//! file, command-line overrides) and project-file discovery by walking
//! parent directories.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use pycheck::checkers::CheckerKind;
use pycheck::config::{self, Config, DEFAULT_FORMAT};
use pycheck::issue::Severity;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

#[test]
fn test_project_discovery_walks_up_from_package_dir() {
    let start = testdata_path().join("project").join("pkg");
    let found = config::find_project_config(&start).expect("should find project config");
    assert_eq!(found, testdata_path().join("project").join("setup.cfg"));
}

#[test]
fn test_testdata_project_config_applies() {
    let path = config::find_project_config(&testdata_path().join("project")).unwrap();
    let mut config = Config::default();
    config.apply_file(&path).unwrap();

    assert_eq!(config.ignore, vec!["W291"]);
    assert_eq!(config.severities.classify("F401"), Severity::Warning);
    // Keys the file does not set keep their defaults
    assert_eq!(config.format, DEFAULT_FORMAT);
    assert_eq!(
        config.checkers,
        vec![CheckerKind::Pycodestyle, CheckerKind::Pyflakes]
    );
}

#[test]
fn test_precedence_chain_replaces_per_key() {
    let mut config = Config::default();

    // User level sets two keys
    config
        .apply_section("[pycheck]\nignore = E1\nformat = {code}\n")
        .unwrap();
    // Project level replaces one of them
    config.apply_section("[pycheck]\nignore = E2,W5\n").unwrap();

    assert_eq!(config.ignore, vec!["E2", "W5"]);
    assert_eq!(config.format, "{code}");

    // Command-line override replaces again
    config.ignore = config::split_list("E3");
    assert_eq!(config.ignore, vec!["E3"]);
}

#[test]
fn test_severity_overrides_layer_in_precedence_order() {
    let mut config = Config::default();

    // User file classifies the whole F family as info
    config.apply_section("[pycheck]\ninfo = F\n").unwrap();
    assert_eq!(config.severities.classify("F401"), Severity::Info);

    // Project file pins one exact code back to error
    config.apply_section("[pycheck]\nerrors = F401\n").unwrap();
    assert_eq!(config.severities.classify("F401"), Severity::Error);
    assert_eq!(config.severities.classify("F841"), Severity::Info);

    // Command line has the last word
    config.severities.insert_list("F401", Severity::Warning);
    assert_eq!(config.severities.classify("F401"), Severity::Warning);
}

#[test]
fn test_discovery_prefers_nearest_ancestor() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let nested = root.join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();
    fs::write(root.join("pycheck.cfg"), "[pycheck]\nignore = OUTER\n").unwrap();
    fs::write(
        root.join("src").join("tox.ini"),
        "[pycheck]\nignore = INNER\n",
    )
    .unwrap();

    let found = config::find_project_config(&nested).unwrap();
    assert_eq!(found, root.join("src").join("tox.ini"));

    let mut config = Config::default();
    config.apply_file(&found).unwrap();
    assert_eq!(config.ignore, vec!["INNER"]);
}

#[test]
fn test_discovery_candidate_order_within_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("tox.ini"), "").unwrap();
    fs::write(root.join("setup.cfg"), "").unwrap();
    fs::write(root.join(".pycheckrc"), "").unwrap();

    let found = config::find_project_config(root).unwrap();
    assert_eq!(found, root.join(".pycheckrc"));
}

#[test]
fn test_classification_is_deterministic_given_merged_config() {
    let mut config = Config::default();
    config
        .apply_section("[pycheck]\nerrors = W6\nwarnings = E501\ninfo = F000\n")
        .unwrap();

    for _ in 0..3 {
        assert_eq!(config.severities.classify("W605"), Severity::Error);
        assert_eq!(config.severities.classify("E501"), Severity::Warning);
        assert_eq!(config.severities.classify("E502"), Severity::Error);
        assert_eq!(config.severities.classify("F000"), Severity::Info);
        assert_eq!(config.severities.classify("F401"), Severity::Error);
    }
}
