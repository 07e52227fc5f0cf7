pub mod config;
pub mod registry;

pub use config::{OutputFormat, Settings};

pub use registry::{
    Document, ExecutionPlan, HookCatalog, HookInvocation, PlanStep, RegistryError,
    RepositorySource, Resolver, init_logger, resolve,
};
