use crate::{
  generator::{
    document::ApiDocument,
    orchestrator::{CodegenConfig, GeneratedOutput, Orchestrator},
    overrides::OverrideConfig,
    template::Template,
  },
  utils::spec,
};

pub(super) const MINIMAL_TEMPLATE: &str = "import { AxiosRequestConfig, AxiosResponse } from 'axios';\n\
  //** REQUEST TYPES **//\n\
  //** RESPONSE TYPES **//\n\
  export class HighSystems {\n\
  //** METHODS **//\n\
  }\n";

pub(super) fn parse_document(json: &str) -> ApiDocument {
  spec::parse_document(json.as_bytes()).expect("failed to parse test document")
}

pub(super) fn parse_overrides(json: &str) -> OverrideConfig {
  OverrideConfig::from_slice(json.as_bytes()).expect("failed to parse test overrides")
}

pub(super) fn generate_with(document_json: &str, template: &str, config: CodegenConfig) -> GeneratedOutput {
  let template = Template::parse(template).expect("failed to parse test template");
  Orchestrator::new(parse_document(document_json), template, config).generate()
}

pub(super) fn generate(document_json: &str) -> GeneratedOutput {
  generate_with(document_json, MINIMAL_TEMPLATE, CodegenConfig::default())
}

/// Wraps one operation in a document with a single path.
pub(super) fn single_operation(path: &str, method: &str, operation: &serde_json::Value) -> String {
  serde_json::json!({
    "host": "api.highsystems.io",
    "paths": { path: { method: operation } }
  })
  .to_string()
}

pub(super) fn widgets_document() -> &'static str {
  include_str!("../../../fixtures/widgets.json")
}

pub(super) fn client_template() -> &'static str {
  include_str!("../../../fixtures/base.ts")
}

pub(super) fn widgets_overrides() -> OverrideConfig {
  parse_overrides(include_str!("../../../fixtures/overrides.json"))
}
