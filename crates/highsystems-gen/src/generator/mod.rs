pub mod document;
pub mod metrics;
pub(crate) mod naming;
pub(crate) mod operation_compiler;
pub mod orchestrator;
pub mod overrides;
pub(crate) mod schema;
pub(crate) mod schema_walker;
pub mod template;
pub(crate) mod type_transformer;

#[cfg(test)]
mod tests;
