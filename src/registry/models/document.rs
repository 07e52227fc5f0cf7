use serde::{Deserialize, Serialize};

use crate::registry::common::{EntryRef, RegistryError, Result};

/// A hook configuration document as read from `.pre-commit-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Paths matching this pattern never trigger any hook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    /// Asks the runner to stop after the first failing hook
    #[serde(default)]
    pub fail_fast: bool,
    pub repos: Vec<RepositorySource>,
}

/// An external hook provider pinned to a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySource {
    #[serde(rename = "repo")]
    pub location: String,
    #[serde(rename = "rev")]
    pub revision: String,
    pub hooks: Vec<HookInvocation>,
}

/// One invocation of a hook exposed by a [`RepositorySource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookInvocation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replaces the hook's default arguments when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl Document {
    pub fn new(repos: Vec<RepositorySource>) -> Self {
        Self {
            exclude: None,
            fail_fast: false,
            repos,
        }
    }

    /// Total number of hook invocations across all sources.
    pub fn invocation_count(&self) -> usize {
        self.repos.iter().map(|r| r.hooks.len()).sum()
    }

    /// Check the invariants the YAML schema alone cannot express.
    pub fn validate(&self) -> Result<()> {
        for (i, source) in self.repos.iter().enumerate() {
            source.validate(i)?;
        }
        Ok(())
    }
}

impl RepositorySource {
    pub fn new(location: &str, revision: &str, hooks: Vec<HookInvocation>) -> Self {
        Self {
            location: location.to_string(),
            revision: revision.to_string(),
            hooks,
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        let entry = || EntryRef::source(index, &self.location, &self.revision);

        if self.location.trim().is_empty() {
            return Err(RegistryError::malformed(entry(), "`repo` must not be empty"));
        }
        if self.revision.trim().is_empty() {
            return Err(RegistryError::malformed(entry(), "`rev` must not be empty"));
        }
        if self.hooks.is_empty() {
            return Err(RegistryError::malformed(
                entry(),
                "`hooks` must list at least one hook",
            ));
        }

        for (j, hook) in self.hooks.iter().enumerate() {
            if hook.id.trim().is_empty() {
                return Err(RegistryError::malformed(
                    entry().hook(j, &hook.id),
                    "hook `id` must not be empty",
                ));
            }
        }
        Ok(())
    }
}

impl HookInvocation {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            args: None,
            files: None,
            exclude: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: &str) -> Self {
        self.files = Some(files.to_string());
        self
    }
}
