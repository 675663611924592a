//! The API document the client is generated from.
//!
//! Only the subset of Swagger/OpenAPI the generator reads is modelled; every other key
//! is ignored. Schemas are kept as raw JSON until overrides have been merged onto them.

use indexmap::IndexMap;
use mediatype::MediaType;
use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumIter, IntoEnumIterator};

pub(crate) const SUCCESS_STATUS: &str = "200";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
  #[serde(default)]
  pub host: Option<String>,
  #[serde(default)]
  pub base_path: Option<String>,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
  #[serde(default)]
  pub delete: Option<Operation>,
  #[serde(default)]
  pub get: Option<Operation>,
  #[serde(default)]
  pub post: Option<Operation>,
  #[serde(default)]
  pub put: Option<Operation>,
}

/// HTTP verbs in the order the generator visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HttpMethod {
  Delete,
  Get,
  Post,
  Put,
}

impl HttpMethod {
  pub fn as_upper(self) -> &'static str {
    match self {
      Self::Delete => "DELETE",
      Self::Get => "GET",
      Self::Post => "POST",
      Self::Put => "PUT",
    }
  }
}

impl PathItem {
  pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
    match method {
      HttpMethod::Delete => self.delete.as_ref(),
      HttpMethod::Get => self.get.as_ref(),
      HttpMethod::Post => self.post.as_ref(),
      HttpMethod::Put => self.put.as_ref(),
    }
  }

  /// Operations declared on this path, in visiting order.
  pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
    HttpMethod::iter().filter_map(|method| self.operation(method).map(|op| (method, op)))
  }
}

impl ApiDocument {
  /// Every operation as `(path, method, operation)`, in document order.
  pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
    self
      .paths
      .iter()
      .flat_map(|(path, item)| item.operations().map(move |(method, op)| (path.as_str(), method, op)))
  }

  pub fn base_url(&self) -> Option<String> {
    let host = self.host.as_deref()?;
    Some(format!("{host}{}", self.base_path.as_deref().unwrap_or_default()))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
  pub operation_id: String,
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub parameters: Vec<Parameter>,
  #[serde(default)]
  pub request_body: Option<RequestBody>,
  #[serde(default)]
  pub responses: IndexMap<String, Response>,
}

impl Operation {
  /// Description if present, otherwise the summary.
  pub fn documentation(&self) -> Option<&str> {
    self
      .description
      .as_deref()
      .or(self.summary.as_deref())
      .filter(|text| !text.trim().is_empty())
  }

  pub fn body_schema(&self) -> Option<&Value> {
    self.request_body.as_ref().and_then(|body| json_schema(&body.content))
  }

  pub fn success_schema(&self) -> Option<&Value> {
    self
      .responses
      .get(SUCCESS_STATUS)
      .and_then(|response| json_schema(&response.content))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  #[default]
  Query,
  Header,
  Cookie,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default, rename = "in")]
  pub location: ParameterLocation,
  /// Swagger 2 style inline type.
  #[serde(default, rename = "type")]
  pub type_name: Option<String>,
  #[serde(default, rename = "enum")]
  pub literals: Option<Vec<Value>>,
  /// OpenAPI 3 style schema.
  #[serde(default)]
  pub schema: Option<Value>,
}

impl Parameter {
  /// Path parameters are always required, whatever the document says.
  pub fn is_required(&self) -> bool {
    self.required || self.location == ParameterLocation::Path
  }

  /// The parameter's type as a schema value, whichever style the document uses.
  pub fn schema_value(&self) -> Value {
    if let Some(schema) = &self.schema {
      return schema.clone();
    }
    let mut schema = serde_json::Map::new();
    if let Some(type_name) = &self.type_name {
      schema.insert("type".to_string(), Value::String(type_name.clone()));
    }
    if let Some(literals) = &self.literals {
      schema.insert("enum".to_string(), Value::Array(literals.clone()));
    }
    Value::Object(schema)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaTypeObject {
  #[serde(default)]
  pub schema: Option<Value>,
}

/// Returns true for `application/json` and any `+json` structured syntax suffix.
pub(crate) fn is_json_media_type(content_type: &str) -> bool {
  let Ok(media) = MediaType::parse(content_type) else {
    return false;
  };
  let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);
  matches!(
    (media.ty.as_str(), media.subty.as_str(), suffix),
    ("application", "json", _) | (_, _, Some("json"))
  )
}

fn json_schema(content: &IndexMap<String, MediaTypeObject>) -> Option<&Value> {
  content
    .iter()
    .find(|(content_type, _)| is_json_media_type(content_type))
    .and_then(|(_, media)| media.schema.as_ref())
}
