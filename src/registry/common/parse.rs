use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use log::debug;

use super::{DOCUMENT_FILE_NAME, EntryRef, RegistryError, Result};
use crate::registry::models::document::Document;

/// Parse a hook configuration document from YAML text.
///
/// The schema is strict: unknown keys, duplicate keys and wrongly typed values
/// are all reported as [`RegistryError::MalformedDocument`] with the line and
/// column `serde_yaml` stopped at. The semantic invariants are checked right
/// after, so a returned document is always valid.
pub fn parse_document(content: &str) -> Result<Document> {
    let document: Document = serde_yaml::from_str(content).map_err(|e| {
        let entry = e
            .location()
            .map(|l| EntryRef::position(l.line(), l.column()))
            .unwrap_or_default();
        RegistryError::malformed(entry, e.to_string())
    })?;
    document.validate()?;
    Ok(document)
}

/// Read and parse the document at `path`.
pub fn load_document(path: &Path) -> Result<Document> {
    debug!("Loading hook configuration from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| RegistryError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&content)?;
    debug!(
        "Loaded {} sources with {} hook invocations",
        document.repos.len(),
        document.invocation_count()
    );
    Ok(document)
}

/// Root of the git working tree containing `start`.
pub fn repo_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start).map_err(|source| RegistryError::RepositoryRoot { source })?;
    let workdir = repo.workdir().ok_or_else(|| RegistryError::RepositoryRoot {
        source: git2::Error::from_str("repository has no working directory"),
    })?;
    Ok(workdir.to_path_buf())
}

/// Locate `.pre-commit-config.yaml` at the root of the working tree
/// containing `start`.
pub fn discover_document(start: &Path) -> Result<PathBuf> {
    let path = repo_root(start)?.join(DOCUMENT_FILE_NAME);
    if !path.exists() {
        return Err(RegistryError::DocumentNotFound { path });
    }
    Ok(path)
}
