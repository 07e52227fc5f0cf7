use log::info;

use super::common::RegistryError;
use super::filter::PlanMatcher;
use super::models::plan::ExecutionPlan;

/// Outcome of checking a resolved plan.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub steps: usize,
    pub problems: Vec<RegistryError>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Compile every file pattern the plan carries, so mistakes surface before a
/// runner trips over them halfway through a commit.
pub fn check(plan: &ExecutionPlan) -> CheckReport {
    let problems = PlanMatcher::new(plan).invalid_patterns();
    info!(
        "Checked {} steps, {} invalid patterns",
        plan.len(),
        problems.len()
    );
    CheckReport {
        steps: plan.len(),
        problems,
    }
}
