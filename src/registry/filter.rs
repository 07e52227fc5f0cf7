use std::borrow::Cow;

use log::debug;
use once_cell::sync::OnceCell;
use regex::Regex;

use super::common::{EntryRef, RegistryError, Result};
use super::models::plan::{ExecutionPlan, PlanStep};

/// A pattern compiled on first use.
#[derive(Debug)]
struct LazyPattern {
    source: String,
    entry: EntryRef,
    compiled: OnceCell<Regex>,
}

impl LazyPattern {
    fn new(source: &str, entry: EntryRef) -> Self {
        Self {
            source: source.to_string(),
            entry,
            compiled: OnceCell::new(),
        }
    }

    fn regex(&self) -> Result<&Regex> {
        self.compiled.get_or_try_init(|| {
            debug!("Compiling file pattern '{}'", self.source);
            Regex::new(&self.source).map_err(|source| RegistryError::InvalidFilePattern {
                entry: self.entry.clone(),
                pattern: self.source.clone(),
                source,
            })
        })
    }

    /// Search semantics: the pattern may match anywhere in the path.
    fn is_match(&self, path: &str) -> Result<bool> {
        Ok(self.regex()?.is_match(path))
    }
}

#[derive(Debug)]
struct StepPatterns {
    files: Option<LazyPattern>,
    exclude: Option<LazyPattern>,
}

/// A step together with the paths that trigger it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'p> {
    pub step: &'p PlanStep,
    pub paths: Vec<String>,
}

/// Matches changed paths against the file filters of an [`ExecutionPlan`].
///
/// Patterns stay uncompiled in the plan; each one is compiled the first time
/// a path is tested against it and reused afterwards.
#[derive(Debug)]
pub struct PlanMatcher<'p> {
    plan: &'p ExecutionPlan,
    global_exclude: Option<LazyPattern>,
    steps: Vec<StepPatterns>,
}

impl<'p> PlanMatcher<'p> {
    pub fn new(plan: &'p ExecutionPlan) -> Self {
        let global_exclude = plan
            .exclude
            .as_deref()
            .map(|p| LazyPattern::new(p, EntryRef::default()));
        let steps = plan
            .iter()
            .map(|step| StepPatterns {
                files: step
                    .file_filter
                    .pattern()
                    .map(|p| LazyPattern::new(p, step.entry())),
                exclude: step
                    .exclude
                    .as_deref()
                    .map(|p| LazyPattern::new(p, step.entry())),
            })
            .collect();
        Self {
            plan,
            global_exclude,
            steps,
        }
    }

    /// Whether the step at `index` in the plan is triggered by `path`.
    pub fn triggers(&self, index: usize, path: &str) -> Result<bool> {
        let Some(patterns) = self.steps.get(index) else {
            return Ok(false);
        };
        let path = normalize_path(path);

        if let Some(ref exclude) = self.global_exclude
            && exclude.is_match(&path)?
        {
            return Ok(false);
        }
        if let Some(ref files) = patterns.files
            && !files.is_match(&path)?
        {
            return Ok(false);
        }
        if let Some(ref exclude) = patterns.exclude
            && exclude.is_match(&path)?
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// Steps triggered by at least one of `paths`, in plan order.
    pub fn select<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<Selection<'p>>> {
        let mut selected = Vec::new();
        for (index, step) in self.plan.iter().enumerate() {
            let mut matched = Vec::new();
            for path in paths {
                if self.triggers(index, path.as_ref())? {
                    matched.push(normalize_path(path.as_ref()).into_owned());
                }
            }
            if !matched.is_empty() {
                selected.push(Selection {
                    step,
                    paths: matched,
                });
            }
        }
        Ok(selected)
    }

    /// Compile every pattern of the plan and collect the ones that fail.
    pub fn invalid_patterns(&self) -> Vec<RegistryError> {
        self.global_exclude
            .iter()
            .chain(
                self.steps
                    .iter()
                    .flat_map(|s| s.files.iter().chain(s.exclude.iter())),
            )
            .filter_map(|p| p.regex().err())
            .collect()
    }
}

/// Paths are matched with forward slashes, whatever the platform.
fn normalize_path(path: &str) -> Cow<'_, str> {
    let path = path.strip_prefix("./").unwrap_or(path);
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}
