//! Hook defaults supplied by the sources themselves.
//!
//! A source repository describes the hooks it provides in a manifest
//! (`.pre-commit-hooks.yaml`). Fetching that manifest is the job of an
//! external collaborator; the resolver only sees it through [`HookCatalog`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

/// File name of a source's hook manifest.
pub const MANIFEST_FILE_NAME: &str = ".pre-commit-hooks.yaml";

/// Defaults a source declares for one of its hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub files: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
}

pub trait HookCatalog {
    /// Look up the defaults of `hook_id` in the source pinned at
    /// `location`@`revision`.
    ///
    /// `Ok(None)` means the catalog has no opinion and the invocation is used
    /// as declared. An error means the source cannot be dereferenced.
    fn lookup(&self, location: &str, revision: &str, hook_id: &str)
    -> Result<Option<HookDefinition>>;
}

/// Catalog that knows nothing; every invocation resolves as declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredOnly;

impl HookCatalog for DeclaredOnly {
    fn lookup(&self, _: &str, _: &str, _: &str) -> Result<Option<HookDefinition>> {
        Ok(None)
    }
}

type SourceKey = (String, String);

/// Catalog backed by manifests already available locally.
#[derive(Debug, Default)]
pub struct ManifestCatalog {
    manifests: HashMap<SourceKey, Vec<HookDefinition>>,
}

impl ManifestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the manifest of `location`@`revision` from its YAML text.
    pub fn insert_manifest(&mut self, location: &str, revision: &str, yaml: &str) -> Result<()> {
        let hooks: Vec<HookDefinition> = serde_yaml::from_str(yaml)
            .with_context(|| format!("invalid hook manifest for {location}@{revision}"))?;
        debug!(
            "Registered {} hook definitions for {location}@{revision}",
            hooks.len()
        );
        self.manifests
            .insert((location.to_string(), revision.to_string()), hooks);
        Ok(())
    }

    /// Register the manifest found in a checkout of `location`@`revision`.
    pub fn load_dir(&mut self, location: &str, revision: &str, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let yaml = fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        self.insert_manifest(location, revision, &yaml)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

impl HookCatalog for ManifestCatalog {
    fn lookup(
        &self,
        location: &str,
        revision: &str,
        hook_id: &str,
    ) -> Result<Option<HookDefinition>> {
        let hooks = self
            .manifests
            .get(&(location.to_string(), revision.to_string()))
            .ok_or_else(|| anyhow!("no manifest is available for this source"))?;
        let definition = hooks
            .iter()
            .find(|h| h.id == hook_id)
            .ok_or_else(|| anyhow!("hook '{hook_id}' is not provided by this source"))?;
        Ok(Some(definition.clone()))
    }
}
