use serde::{Deserialize, Serialize};

use crate::registry::common::{EntryRef, RegistryError, Result};

/// Which changed paths a step should run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "pattern")]
pub enum FileFilter {
    All,
    /// A regular expression, kept uncompiled until a path is matched
    Pattern(String),
}

impl FileFilter {
    pub fn from_declared(files: Option<&str>) -> Self {
        files.map_or(Self::All, |p| Self::Pattern(p.to_string()))
    }

    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Pattern(p) => Some(p),
        }
    }
}

/// A fully materialized hook invocation, ready for a runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub source_location: String,
    pub revision: String,
    pub hook_id: String,
    pub effective_name: String,
    pub effective_args: Vec<String>,
    pub file_filter: FileFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    /// Index of the source in the document's `repos`
    pub repo_index: usize,
    /// Index of the invocation in its source's `hooks`
    pub hook_index: usize,
}

impl PlanStep {
    pub fn entry(&self) -> EntryRef {
        EntryRef::source(self.repo_index, &self.source_location, &self.revision)
            .hook(self.hook_index, &self.hook_id)
    }
}

/// Ordered list of steps resolved from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub steps: Vec<PlanStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    #[serde(default)]
    pub fail_fast: bool,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanStep> {
        self.steps.iter()
    }

    /// Keep only the steps invoking `hook_id`, preserving order.
    pub fn retain_hook(mut self, hook_id: &str) -> Result<Self> {
        self.steps.retain(|s| s.hook_id == hook_id);
        if self.steps.is_empty() {
            return Err(RegistryError::NoMatchingHook {
                id: hook_id.to_string(),
            });
        }
        Ok(self)
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a PlanStep;
    type IntoIter = std::slice::Iter<'a, PlanStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(hook_id: &str, hook_index: usize) -> PlanStep {
        PlanStep {
            source_location: "https://github.com/astral-sh/ruff-pre-commit".to_string(),
            revision: "v0.4.4".to_string(),
            hook_id: hook_id.to_string(),
            effective_name: hook_id.to_string(),
            effective_args: vec![],
            file_filter: FileFilter::All,
            exclude: None,
            repo_index: 0,
            hook_index,
        }
    }

    #[test]
    fn test_file_filter_from_declared() {
        assert_eq!(FileFilter::from_declared(None), FileFilter::All);
        assert_eq!(
            FileFilter::from_declared(Some(r"\.py$")).pattern(),
            Some(r"\.py$")
        );
    }

    #[test]
    fn test_retain_hook_keeps_order() {
        let plan = ExecutionPlan {
            steps: vec![step("ruff", 0), step("ruff-format", 1), step("ruff", 2)],
            ..ExecutionPlan::default()
        };
        let plan = plan.retain_hook("ruff").expect("ruff steps should remain");
        let indexes: Vec<_> = plan.iter().map(|s| s.hook_index).collect();
        assert_eq!(indexes, vec![0, 2]);
    }

    #[test]
    fn test_retain_hook_without_match() {
        let plan = ExecutionPlan {
            steps: vec![step("ruff", 0)],
            ..ExecutionPlan::default()
        };
        let err = plan.retain_hook("black").expect_err("no black step exists");
        assert!(matches!(err, RegistryError::NoMatchingHook { ref id } if id == "black"));
    }
}
