//! Per-operation overrides: argument renames and schema patches.
//!
//! Overrides are static configuration keyed by `operationId`. The resolver is created
//! once per generation run and threaded through the operation compiler explicitly.

use std::{collections::HashSet, path::Path};

use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct OverrideConfig {
  entries: IndexMap<String, OperationOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OperationOverride {
  pub request: RequestOverride,
  pub response: ResponseOverride,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestOverride {
  /// Original argument name to replacement name.
  pub args: IndexMap<String, String>,
  /// Partial schema deep-merged onto the request body schema.
  pub schema: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResponseOverride {
  /// Partial schema deep-merged onto the 200 response schema.
  pub schema: Option<Value>,
}

impl OverrideConfig {
  pub async fn load(path: &Path) -> anyhow::Result<Self> {
    let content = tokio::fs::read(path)
      .await
      .with_context(|| format!("failed to read overrides file {}", path.display()))?;
    Self::from_slice(&content).with_context(|| format!("failed to parse overrides file {}", path.display()))
  }

  pub fn from_slice(content: &[u8]) -> anyhow::Result<Self> {
    let deserializer = &mut serde_json::Deserializer::from_slice(content);
    Ok(serde_path_to_error::deserialize(deserializer)?)
  }

  pub fn get(&self, operation_id: &str) -> Option<&OperationOverride> {
    self.entries.get(operation_id)
  }

  pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

/// Whether an argument rename applies on every lookup or only on the first one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverrideMode {
  /// Lookups are read-only and always return the same answer.
  #[default]
  Persistent,
  /// A rename is consumed by its first lookup; later lookups see the original name.
  Consume,
}

pub(crate) struct OverrideResolver<'a> {
  config: &'a OverrideConfig,
  mode: OverrideMode,
  consumed: HashSet<(String, String)>,
}

impl<'a> OverrideResolver<'a> {
  pub(crate) fn new(config: &'a OverrideConfig, mode: OverrideMode) -> Self {
    Self {
      config,
      mode,
      consumed: HashSet::new(),
    }
  }

  /// Returns the replacement for an argument name, or the name itself.
  pub(crate) fn argument_name(&mut self, operation_id: &str, name: &str) -> String {
    let Some(replacement) = self
      .config
      .get(operation_id)
      .and_then(|entry| entry.request.args.get(name))
    else {
      return name.to_string();
    };

    match self.mode {
      OverrideMode::Persistent => replacement.clone(),
      OverrideMode::Consume => {
        if self.consumed.insert((operation_id.to_string(), name.to_string())) {
          replacement.clone()
        } else {
          name.to_string()
        }
      }
    }
  }

  pub(crate) fn body_schema(&self, operation_id: &str, raw: &Value) -> Value {
    let mut schema = raw.clone();
    if let Some(patch) = self.config.get(operation_id).and_then(|e| e.request.schema.as_ref()) {
      deep_merge(&mut schema, patch);
    }
    schema
  }

  /// The response schema always has its description blanked before any patch applies,
  /// so the envelope's `results` field never carries the endpoint's prose.
  pub(crate) fn response_schema(&self, operation_id: &str, raw: &Value) -> Value {
    let mut schema = raw.clone();
    deep_merge(&mut schema, &json!({ "description": "" }));
    if let Some(patch) = self.config.get(operation_id).and_then(|e| e.response.schema.as_ref()) {
      deep_merge(&mut schema, patch);
    }
    schema
  }
}

/// Recursively merges `patch` into `base`.
///
/// Objects merge key by key; any other patch value replaces the base value. A `null`
/// in the patch removes the key from the base object.
pub(crate) fn deep_merge(base: &mut Value, patch: &Value) {
  match (base, patch) {
    (Value::Object(base_map), Value::Object(patch_map)) => {
      for (key, patch_value) in patch_map {
        if patch_value.is_null() {
          base_map.shift_remove(key);
          continue;
        }
        match base_map.get_mut(key) {
          Some(base_value) => deep_merge(base_value, patch_value),
          None => {
            base_map.insert(key.clone(), patch_value.clone());
          }
        }
      }
    }
    (base, patch) => *base = patch.clone(),
  }
}
