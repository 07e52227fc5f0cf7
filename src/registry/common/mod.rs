pub mod parse;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Name of the hook configuration document at the root of a working tree.
pub const DOCUMENT_FILE_NAME: &str = ".pre-commit-config.yaml";

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Structural or schema violation in the configuration document.
    #[error("malformed hook configuration{entry}: {reason}")]
    MalformedDocument { entry: EntryRef, reason: String },

    /// A source could not be dereferenced by the hook catalog.
    #[error("unresolvable hook source{entry}: {reason}")]
    UnresolvableSource { entry: EntryRef, reason: String },

    #[error("could not read {}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("there is no {DOCUMENT_FILE_NAME} at {}", path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("not inside a git working tree")]
    RepositoryRoot {
        #[source]
        source: git2::Error,
    },

    #[error("no hook with id '{id}' in the execution plan")]
    NoMatchingHook { id: String },

    #[error("invalid file pattern{entry}: '{pattern}'")]
    InvalidFilePattern {
        entry: EntryRef,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RegistryError {
    pub(crate) fn malformed(entry: EntryRef, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            entry,
            reason: reason.into(),
        }
    }

    /// The document entry the error points at, if any.
    pub fn entry(&self) -> Option<&EntryRef> {
        match self {
            Self::MalformedDocument { entry, .. }
            | Self::UnresolvableSource { entry, .. }
            | Self::InvalidFilePattern { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

/// Points at the place in the document an error refers to.
///
/// Every field is optional: YAML errors only know a line and column, while
/// validation and resolution errors know which source and hook they were
/// looking at. `Display` renders whatever is known, prefixed with `" at "`,
/// or nothing at all for an empty reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRef {
    pub repo_index: Option<usize>,
    pub location: Option<String>,
    pub revision: Option<String>,
    pub hook_index: Option<usize>,
    pub hook_id: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl EntryRef {
    pub fn position(line: usize, column: usize) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            ..Self::default()
        }
    }

    pub fn source(repo_index: usize, location: &str, revision: &str) -> Self {
        Self {
            repo_index: Some(repo_index),
            location: non_empty(location),
            revision: non_empty(revision),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hook(mut self, hook_index: usize, hook_id: &str) -> Self {
        self.hook_index = Some(hook_index);
        self.hook_id = non_empty(hook_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str(" at")?;
        if let Some(line) = self.line {
            write!(f, " line {line}")?;
            if let Some(column) = self.column {
                write!(f, " column {column}")?;
            }
        }
        if let Some(i) = self.repo_index {
            write!(f, " repos[{i}]")?;
        }
        match (&self.location, &self.revision) {
            (Some(location), Some(revision)) => write!(f, " ({location}@{revision})")?,
            (Some(location), None) => write!(f, " ({location})")?,
            (None, Some(revision)) => write!(f, " (@{revision})")?,
            (None, None) => {}
        }
        if let Some(i) = self.hook_index {
            write!(f, " hooks[{i}]")?;
        }
        if let Some(ref id) = self.hook_id {
            write!(f, " '{id}'")?;
        }
        Ok(())
    }
}
