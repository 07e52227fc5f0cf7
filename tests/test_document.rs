use std::fs;

use git2::Repository;
use hookwire::registry::{RegistryError, discover_document, load_document};
use tempfile::TempDir;

const CONFIG: &str = r#"# See https://pre-commit.com for more information
exclude: ^docs/_build/
fail_fast: true
repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v4.6.0
    hooks:
      - id: trailing-whitespace
      - id: check-yaml
        exclude: ^chart/templates/
"#;

fn setup_repo() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    Repository::init(dir.path()).expect("Failed to initialize git repository");
    dir
}

#[test]
fn test_load_document_from_file() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("hooks.yaml");
    fs::write(&path, CONFIG).expect("Failed to write config");

    let doc = load_document(&path).expect("config should load");
    assert!(doc.fail_fast);
    assert_eq!(doc.exclude.as_deref(), Some("^docs/_build/"));
    assert_eq!(doc.repos[0].hooks[1].exclude.as_deref(), Some("^chart/templates/"));
}

#[test]
fn test_load_malformed_document_reports_line() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("hooks.yaml");
    fs::write(
        &path,
        "repos:\n  - repo: https://example.com/hooks\n    rev: v1\n    hooks:\n      - id: a\n        language: python\n",
    )
    .expect("Failed to write config");

    let err = load_document(&path).expect_err("unknown hook key should fail");
    assert!(matches!(err, RegistryError::MalformedDocument { .. }));
    assert!(err.entry().and_then(|e| e.line).is_some());
}

#[test]
fn test_discover_document_from_subdirectory() {
    let dir = setup_repo();
    fs::write(dir.path().join(".pre-commit-config.yaml"), CONFIG).expect("Failed to write config");
    let nested = dir.path().join("src").join("pkg");
    fs::create_dir_all(&nested).expect("Failed to create nested directory");

    let found = discover_document(&nested).expect("config should be discovered");
    assert_eq!(
        found.file_name().and_then(|n| n.to_str()),
        Some(".pre-commit-config.yaml")
    );
    assert!(found.exists());
}

#[test]
fn test_discover_document_missing() {
    let dir = setup_repo();
    let err = discover_document(dir.path()).expect_err("no config was written");
    assert!(matches!(err, RegistryError::DocumentNotFound { .. }));
}
