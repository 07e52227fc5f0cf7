use log::{debug, info};

use super::catalog::{DeclaredOnly, HookCatalog};
use super::common::{EntryRef, RegistryError, Result};
use super::models::document::{Document, HookInvocation, RepositorySource};
use super::models::plan::{ExecutionPlan, FileFilter, PlanStep};

/// Resolve a document into its execution plan, using only what it declares.
pub fn resolve(document: &Document) -> Result<ExecutionPlan> {
    Resolver::new().resolve(document)
}

/// Turns a [`Document`] into an [`ExecutionPlan`].
///
/// Resolution is a single pass over the document in declaration order. It
/// either yields a step for every invocation or fails as a whole.
pub struct Resolver<'a> {
    catalog: &'a dyn HookCatalog,
}

impl Default for Resolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        Self {
            catalog: &DeclaredOnly,
        }
    }

    /// Fall back to `catalog` for whatever an invocation leaves undeclared.
    pub fn with_catalog(catalog: &'a dyn HookCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, document: &Document) -> Result<ExecutionPlan> {
        document.validate()?;

        let mut steps = Vec::with_capacity(document.invocation_count());
        for (repo_index, source) in document.repos.iter().enumerate() {
            for (hook_index, hook) in source.hooks.iter().enumerate() {
                steps.push(self.resolve_step(source, repo_index, hook, hook_index)?);
            }
        }

        info!(
            "Resolved {} steps from {} sources",
            steps.len(),
            document.repos.len()
        );

        Ok(ExecutionPlan {
            steps,
            exclude: document.exclude.clone(),
            fail_fast: document.fail_fast,
        })
    }

    fn resolve_step(
        &self,
        source: &RepositorySource,
        repo_index: usize,
        hook: &HookInvocation,
        hook_index: usize,
    ) -> Result<PlanStep> {
        let definition = self
            .catalog
            .lookup(&source.location, &source.revision, &hook.id)
            .map_err(|e| RegistryError::UnresolvableSource {
                entry: EntryRef::source(repo_index, &source.location, &source.revision)
                    .hook(hook_index, &hook.id),
                reason: format!("{e:#}"),
            })?;
        let definition = definition.as_ref();

        let effective_name = hook
            .name
            .clone()
            .or_else(|| definition.and_then(|d| d.name.clone()))
            .unwrap_or_else(|| hook.id.clone());

        // Declared args replace the defaults outright, even when empty.
        let effective_args = match (&hook.args, definition) {
            (Some(args), _) => args.clone(),
            (None, Some(d)) => d.args.clone(),
            (None, None) => Vec::new(),
        };

        let files = hook
            .files
            .as_deref()
            .or_else(|| definition.and_then(|d| d.files.as_deref()));
        let exclude = hook
            .exclude
            .clone()
            .or_else(|| definition.and_then(|d| d.exclude.clone()));

        debug!(
            "Step {}/{}: {} ({}@{})",
            repo_index, hook_index, hook.id, source.location, source.revision
        );

        Ok(PlanStep {
            source_location: source.location.clone(),
            revision: source.revision.clone(),
            hook_id: hook.id.clone(),
            effective_name,
            effective_args,
            file_filter: FileFilter::from_declared(files),
            exclude,
            repo_index,
            hook_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::catalog::ManifestCatalog;

    const HOOKS: &str = "https://github.com/pre-commit/pre-commit-hooks";

    fn document() -> Document {
        Document::new(vec![RepositorySource::new(
            HOOKS,
            "v4.6.0",
            vec![
                HookInvocation::new("trailing-whitespace"),
                HookInvocation::new("check-yaml").with_args(["--unsafe"]),
            ],
        )])
    }

    #[test]
    fn test_resolve_without_catalog() {
        let plan = resolve(&document()).expect("document should resolve");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps[0].effective_name, "trailing-whitespace");
        assert!(plan.steps[0].effective_args.is_empty());
        assert_eq!(plan.steps[0].file_filter, FileFilter::All);
        assert_eq!(plan.steps[1].effective_args, vec!["--unsafe"]);
    }

    #[test]
    fn test_resolve_with_catalog_defaults() {
        let mut catalog = ManifestCatalog::new();
        catalog
            .insert_manifest(
                HOOKS,
                "v4.6.0",
                "- id: trailing-whitespace\n  name: trim trailing whitespace\n  args: [--markdown-linebreak-ext=md]\n  exclude: \\.patch$\n- id: check-yaml\n  name: check yaml\n  args: [--allow-multiple-documents]\n  files: \\.ya?ml$\n",
            )
            .expect("manifest should parse");

        let plan = Resolver::with_catalog(&catalog)
            .resolve(&document())
            .expect("document should resolve");

        let trailing = &plan.steps[0];
        assert_eq!(trailing.effective_name, "trim trailing whitespace");
        assert_eq!(trailing.effective_args, vec!["--markdown-linebreak-ext=md"]);
        assert_eq!(trailing.exclude.as_deref(), Some(r"\.patch$"));

        let yaml = &plan.steps[1];
        assert_eq!(yaml.effective_args, vec!["--unsafe"]);
        assert_eq!(yaml.file_filter.pattern(), Some(r"\.ya?ml$"));
    }

    #[test]
    fn test_declared_empty_args_replace_defaults() {
        let mut catalog = ManifestCatalog::new();
        catalog
            .insert_manifest(HOOKS, "v4.6.0", "- id: check-yaml\n  args: [--unsafe]\n")
            .expect("manifest should parse");
        let doc = Document::new(vec![RepositorySource::new(
            HOOKS,
            "v4.6.0",
            vec![HookInvocation::new("check-yaml").with_args(Vec::<String>::new())],
        )]);

        let plan = Resolver::with_catalog(&catalog)
            .resolve(&doc)
            .expect("document should resolve");
        assert!(plan.steps[0].effective_args.is_empty());
    }

    #[test]
    fn test_catalog_failure_is_unresolvable() {
        let catalog = ManifestCatalog::new();
        let err = Resolver::with_catalog(&catalog)
            .resolve(&document())
            .expect_err("empty catalog cannot dereference the source");
        match err {
            RegistryError::UnresolvableSource { entry, reason } => {
                assert_eq!(entry.location.as_deref(), Some(HOOKS));
                assert_eq!(entry.revision.as_deref(), Some("v4.6.0"));
                assert_eq!(entry.hook_id.as_deref(), Some("trailing-whitespace"));
                assert!(reason.contains("no manifest"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
