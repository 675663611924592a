use itertools::Itertools;
use serde_json::Value;

use super::naming::string_literal;

pub(crate) const ANY_TYPE: &str = "any";

/// Maps a primitive schema type name to its TypeScript counterpart.
///
/// Unknown or empty type names degrade to `any`.
pub(crate) fn transform(primitive: &str) -> &'static str {
  match primitive {
    "integer" | "number" => "number",
    "string" => "string",
    "boolean" => "boolean",
    "object" => "object",
    "array" => "any[]",
    _ => ANY_TYPE,
  }
}

/// Renders a list of allowed values as a union of literal types, e.g. `'A' | 'B'`.
pub(crate) fn enum_union(values: &[Value]) -> String {
  if values.is_empty() {
    return ANY_TYPE.to_string();
  }
  values.iter().map(literal).join(" | ")
}

fn literal(value: &Value) -> String {
  match value {
    Value::String(s) => string_literal(s),
    Value::Null => "null".to_string(),
    Value::Bool(_) | Value::Number(_) => value.to_string(),
    Value::Array(_) | Value::Object(_) => ANY_TYPE.to_string(),
  }
}
