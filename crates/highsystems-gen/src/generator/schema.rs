//! Recursive schema model consumed by the schema walker.
//!
//! Schemas arrive as raw JSON so that override patches can be deep-merged before
//! classification. Conversion from JSON is total: any shape the generator does not
//! understand still produces a node, and the walker decides how to degrade it.

use indexmap::IndexMap;
use serde_json::{Map, Value};

pub(crate) const UNION_FALSE_KEY: &str = "unionProp";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SchemaNode {
  pub description: Option<String>,
  /// Widens an array field to `T[] | false`.
  pub union_false: bool,
  pub kind: SchemaKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SchemaKind {
  Primitive {
    type_name: Option<String>,
    literals: Option<Vec<Value>>,
  },
  Array {
    items: Option<Box<SchemaNode>>,
  },
  Object {
    properties: Option<IndexMap<String, SchemaNode>>,
    required: Required,
  },
}

/// The `required` keyword of an object node.
///
/// Absence and `false` are both treated as "nothing required".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Required {
  #[default]
  Nothing,
  Keys(Vec<String>),
}

impl Required {
  pub(crate) fn from_value(value: Option<&Value>) -> Self {
    match value {
      Some(Value::Array(keys)) => Self::Keys(keys.iter().filter_map(Value::as_str).map(String::from).collect()),
      _ => Self::Nothing,
    }
  }

  pub(crate) fn contains(&self, key: &str) -> bool {
    match self {
      Self::Nothing => false,
      Self::Keys(keys) => keys.iter().any(|k| k == key),
    }
  }
}

impl SchemaNode {
  pub(crate) fn from_value(value: &Value) -> Self {
    let Value::Object(map) = value else {
      return Self::untyped();
    };

    let description = map.get("description").and_then(Value::as_str).map(String::from);
    let union_false = map.get(UNION_FALSE_KEY).and_then(Value::as_bool).unwrap_or(false);

    let kind = match type_name(map).as_deref() {
      Some("array") => SchemaKind::Array {
        items: map.get("items").map(|items| Box::new(Self::from_value(items))),
      },
      Some("object") => SchemaKind::Object {
        properties: map.get("properties").and_then(Value::as_object).map(Self::properties),
        required: Required::from_value(map.get("required")),
      },
      other => SchemaKind::Primitive {
        type_name: other.map(String::from),
        literals: map.get("enum").and_then(Value::as_array).cloned(),
      },
    };

    Self {
      description,
      union_false,
      kind,
    }
  }

  /// Builds a required-everything object node from already converted properties.
  pub(crate) fn object(properties: IndexMap<String, SchemaNode>) -> Self {
    let required = Required::Keys(properties.keys().cloned().collect());
    Self {
      description: None,
      union_false: false,
      kind: SchemaKind::Object {
        properties: Some(properties),
        required,
      },
    }
  }

  pub(crate) fn primitive(type_name: &str) -> Self {
    Self {
      description: None,
      union_false: false,
      kind: SchemaKind::Primitive {
        type_name: Some(type_name.to_string()),
        literals: None,
      },
    }
  }

  pub(crate) fn untyped() -> Self {
    Self {
      description: None,
      union_false: false,
      kind: SchemaKind::Primitive {
        type_name: None,
        literals: None,
      },
    }
  }

  fn properties(map: &Map<String, Value>) -> IndexMap<String, SchemaNode> {
    map
      .iter()
      .map(|(name, schema)| (name.clone(), Self::from_value(schema)))
      .collect()
  }
}

/// Reads `type`, accepting both a single name and a list such as `["string", "null"]`.
fn type_name(map: &Map<String, Value>) -> Option<String> {
  match map.get("type")? {
    Value::String(name) if !name.is_empty() => Some(name.clone()),
    Value::Array(names) => names
      .iter()
      .filter_map(Value::as_str)
      .find(|name| *name != "null")
      .map(String::from),
    _ => None,
  }
}
