pub mod catalog;
pub mod check;
pub mod common;
pub mod filter;
pub mod models;
pub mod resolve;

pub use catalog::{DeclaredOnly, HookCatalog, HookDefinition, ManifestCatalog};
pub use common::parse::{discover_document, load_document, parse_document};
pub use common::{EntryRef, RegistryError};
pub use filter::{PlanMatcher, Selection};
pub use models::document::{Document, HookInvocation, RepositorySource};
pub use models::plan::{ExecutionPlan, FileFilter, PlanStep};
pub use resolve::{Resolver, resolve};

pub fn init_logger() {
    env_logger::init();
}
