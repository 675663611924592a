use indexmap::IndexMap;

use super::{
  metrics::GenerationWarning,
  naming::property_key,
  schema::{Required, SchemaKind, SchemaNode},
  type_transformer::{ANY_TYPE, enum_union, transform},
};

pub(crate) const INDENT: &str = "\t";

pub(crate) fn indent(tab_level: usize) -> String {
  INDENT.repeat(tab_level)
}

/// Turns schema nodes into TypeScript type-declaration lines.
///
/// The walker is unaware of whether it is building a request or a response type.
/// Shapes it does not understand are typed as `any` and reported as warnings.
pub(crate) struct SchemaWalker<'a> {
  operation_id: &'a str,
  field_path: Vec<String>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> SchemaWalker<'a> {
  pub(crate) fn new(operation_id: &'a str) -> Self {
    Self {
      operation_id,
      field_path: vec![],
      warnings: vec![],
    }
  }

  pub(crate) fn into_warnings(self) -> Vec<GenerationWarning> {
    self.warnings
  }

  /// Emits the declaration of one named node.
  ///
  /// With `nested` the node is a property (`key?: T;`); otherwise it is the type being
  /// declared (`key = T;`) and is never marked optional.
  pub(crate) fn build_type(
    &mut self,
    key: &str,
    node: &SchemaNode,
    required: bool,
    tab_level: usize,
    nested: bool,
  ) -> Vec<String> {
    self.field_path.push(key.to_string());

    let pad = indent(tab_level);
    let head = if nested {
      format!("{pad}{}{}: ", property_key(key), if required { "" } else { "?" })
    } else {
      format!("{pad}{key} = ")
    };

    let mut lines = doc_comment(node.description.as_deref(), tab_level);

    match &node.kind {
      SchemaKind::Array { items } => {
        let union = if node.union_false { " | false" } else { "" };
        match items.as_deref() {
          Some(SchemaNode {
            kind: SchemaKind::Object {
              properties: Some(properties),
              required: item_required,
            },
            ..
          }) => {
            lines.push(format!("{head}{{"));
            lines.extend(self.build_body_type(properties, item_required, tab_level + 1));
            lines.push(format!("{pad}}}[]{union};"));
          }
          Some(item) => {
            let element = self.element_type(item);
            lines.push(format!("{head}{element}[]{union};"));
          }
          None => {
            self.warn("array has no items schema, using any[]");
            lines.push(format!("{head}{ANY_TYPE}[]{union};"));
          }
        }
      }
      SchemaKind::Object {
        properties: Some(properties),
        required: child_required,
      } => {
        lines.push(format!("{head}{{"));
        lines.extend(self.build_body_type(properties, child_required, tab_level + 1));
        lines.push(format!("{pad}}};"));
      }
      SchemaKind::Object { properties: None, .. } => {
        self.warn("object has no properties, using any");
        lines.push(format!("{head}{ANY_TYPE};"));
      }
      SchemaKind::Primitive { .. } => {
        let ty = self.primitive_type(node);
        lines.push(format!("{head}{ty};"));
      }
    }

    self.field_path.pop();
    lines
  }

  /// Emits one property line block per entry, in declaration order.
  pub(crate) fn build_body_type(
    &mut self,
    properties: &IndexMap<String, SchemaNode>,
    required: &Required,
    tab_level: usize,
  ) -> Vec<String> {
    properties
      .iter()
      .flat_map(|(name, node)| self.build_type(name, node, required.contains(name), tab_level, true))
      .collect()
  }

  /// Type expression for an array element that is not an object with properties.
  fn element_type(&mut self, item: &SchemaNode) -> String {
    match &item.kind {
      SchemaKind::Primitive {
        type_name: None,
        literals: None,
      } => {
        self.warn("array items have no type, using any[]");
        ANY_TYPE.to_string()
      }
      SchemaKind::Primitive { literals: Some(_), .. } => format!("({})", self.primitive_type(item)),
      SchemaKind::Primitive { .. } => self.primitive_type(item),
      SchemaKind::Array { items: Some(inner) } => format!("{}[]", self.element_type(inner)),
      SchemaKind::Array { items: None } => {
        self.warn("nested array has no items schema, using any[][]");
        format!("{ANY_TYPE}[]")
      }
      SchemaKind::Object { properties: None, .. } => {
        self.warn("array items are objects without properties, using any[]");
        ANY_TYPE.to_string()
      }
      SchemaKind::Object { properties: Some(_), .. } => {
        self.warn("object nested inside an array of arrays, using object");
        "object".to_string()
      }
    }
  }

  fn primitive_type(&mut self, node: &SchemaNode) -> String {
    let SchemaKind::Primitive { type_name, literals } = &node.kind else {
      return ANY_TYPE.to_string();
    };

    if let Some(values) = literals
      && !values.is_empty()
    {
      return enum_union(values);
    }

    match type_name.as_deref() {
      Some(name) => {
        let ty = transform(name);
        if ty == ANY_TYPE && name != ANY_TYPE {
          self.warn(&format!("unknown type '{name}', using any"));
        }
        ty.to_string()
      }
      None => {
        self.warn("no type given, using any");
        ANY_TYPE.to_string()
      }
    }
  }

  fn warn(&mut self, message: &str) {
    let field = self.field_path.join(".");
    self.warn_at(&field, message);
  }

  /// Records a warning against an explicit field path.
  pub(crate) fn warn_at(&mut self, field: &str, message: &str) {
    self.warnings.push(GenerationWarning::Schema {
      operation_id: self.operation_id.to_string(),
      field: field.to_string(),
      message: message.to_string(),
    });
  }
}

/// Renders a JSDoc block for a non-empty description.
pub(crate) fn doc_comment(description: Option<&str>, tab_level: usize) -> Vec<String> {
  let Some(text) = description.map(str::trim).filter(|d| !d.is_empty()) else {
    return vec![];
  };

  let pad = indent(tab_level);
  let mut lines = vec![format!("{pad}/**")];
  lines.extend(text.lines().map(|line| {
    let line = line.trim_end().replace("*/", "*\\/");
    if line.is_empty() {
      format!("{pad} *")
    } else {
      format!("{pad} * {line}")
    }
  }));
  lines.push(format!("{pad} */"));
  lines
}
