use serde_json::json;

use super::support::{
  MINIMAL_TEMPLATE, generate_with, parse_overrides, single_operation, widgets_document, widgets_overrides,
};
use crate::generator::{metrics::GenerationWarning, orchestrator::CodegenConfig, overrides::OverrideMode};

fn with_overrides(mode: OverrideMode) -> CodegenConfig {
  CodegenConfig::builder()
    .overrides(widgets_overrides())
    .override_mode(mode)
    .build()
}

#[test]
fn test_renamed_argument_is_forwarded_under_original_key() {
  let output = generate_with(widgets_document(), MINIMAL_TEMPLATE, with_overrides(OverrideMode::Persistent));
  let code = &output.code;

  assert!(code.contains("export type HighSystemsRequestGetWidget = {\n\t/**\n\t * Widget identifier\n\t */\n\twidgetId: string;"));
  assert!(code.contains("public async getWidget({ widgetId, requestOptions, returnAxios = false }: HighSystemsRequestGetWidget)"));
  assert!(code.contains("\t\t\turl: `/widgets/${widgetId}`,\n\t\t\tparams: { id: widgetId }"));
  assert!(code.contains("\t * @param widgetId Widget identifier"));
  assert_eq!(output.stats.arguments_renamed, 1);
}

#[test]
fn test_renames_only_apply_to_their_operation() {
  let output = generate_with(widgets_document(), MINIMAL_TEMPLATE, with_overrides(OverrideMode::Persistent));
  assert!(output.code.contains("public async deleteWidget({ id, requestOptions, returnAxios = false }"));
}

#[test]
fn test_response_patch_marks_required_and_union_false() {
  let output = generate_with(widgets_document(), MINIMAL_TEMPLATE, with_overrides(OverrideMode::Persistent));
  assert!(
    output.code.contains(
      "export type HighSystemsResponseListWidgets = {\n\
       \tsuccess: boolean;\n\
       \tresults: {\n\
       \t\tx: number;\n\
       \t\ttags?: string[] | false;\n\
       \t}[];\n\
       };"
    ),
    "{}",
    output.code
  );
}

#[test]
fn test_request_patch_can_remove_and_replace_fields() {
  let document = single_operation(
    "/widgets",
    "post",
    &json!({
      "operationId": "create-widget",
      "requestBody": {
        "content": {
          "application/json": {
            "schema": {
              "type": "object",
              "properties": {
                "name": { "type": "string" },
                "legacy": { "type": "string" },
                "ids": { "type": "array", "items": { "type": "integer" } }
              }
            }
          }
        }
      },
      "responses": {}
    }),
  );
  let overrides = parse_overrides(
    r#"{
      "create-widget": {
        "request": {
          "schema": {
            "properties": { "legacy": null, "ids": { "unionProp": true } },
            "required": ["name"]
          }
        }
      }
    }"#,
  );

  let config = CodegenConfig::builder().overrides(overrides).build();
  let output = generate_with(&document, MINIMAL_TEMPLATE, config);
  let code = &output.code;
  assert!(code.contains("\tname: string;\n\tids?: number[] | false;\n\trequestOptions?: AxiosRequestConfig;"));
  assert!(!code.contains("legacy"));
  assert!(code.contains("({ requestOptions, returnAxios = false, ...body }: HighSystemsRequestCreateWidget)"));
}

#[test]
fn test_response_description_is_never_emitted() {
  let output = generate_with(widgets_document(), MINIMAL_TEMPLATE, CodegenConfig::default());
  assert!(!output.code.contains("A widget"));
}

#[test]
fn test_consume_mode_applies_rename_once_per_operation() {
  let document = single_operation(
    "/widgets/{id}",
    "get",
    &json!({
      "operationId": "get-widget",
      "parameters": [
        { "name": "id", "in": "path", "required": true, "type": "string" },
        { "name": "id", "in": "query", "type": "string" }
      ],
      "responses": {}
    }),
  );
  let overrides = parse_overrides(r#"{ "get-widget": { "request": { "args": { "id": "widgetId" } } } }"#);

  let persistent = generate_with(
    &document,
    MINIMAL_TEMPLATE,
    CodegenConfig::builder().overrides(overrides.clone()).build(),
  );
  assert!(persistent.code.contains("\twidgetId: string;\n\trequestOptions?: AxiosRequestConfig;"));
  assert_eq!(persistent.code.matches("widgetId?: string;").count(), 0);
  assert_eq!(persistent.stats.arguments_renamed, 1);
  assert_eq!(
    persistent.stats.warnings,
    vec![GenerationWarning::DuplicateField {
      operation_id: "get-widget".to_string(),
      field: "widgetId".to_string(),
    }]
  );

  let consume = generate_with(
    &document,
    MINIMAL_TEMPLATE,
    CodegenConfig::builder()
      .overrides(overrides)
      .override_mode(OverrideMode::Consume)
      .build(),
  );
  assert!(consume.code.contains("\twidgetId: string;\n\tid?: string;"));
  assert_eq!(consume.stats.arguments_renamed, 1);
}

#[test]
fn test_unused_override_entries_are_reported() {
  let output = generate_with(widgets_document(), MINIMAL_TEMPLATE, with_overrides(OverrideMode::Persistent));
  assert!(output.stats.warnings.contains(&GenerationWarning::UnusedOverride {
    operation_id: "retired-operation".to_string(),
  }));
}
