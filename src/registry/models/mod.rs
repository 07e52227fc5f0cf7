pub mod document;
pub mod plan;
