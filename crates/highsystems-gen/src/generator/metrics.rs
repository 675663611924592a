use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub paths_visited: usize,
  pub operations_compiled: usize,
  pub request_types_generated: usize,
  pub response_types_generated: usize,
  pub operations_with_body: usize,
  pub arguments_renamed: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_paths(&mut self, count: usize) {
    self.paths_visited += count;
  }

  pub fn record_operation(&mut self, has_request_type: bool, has_response_type: bool, has_body: bool) {
    self.operations_compiled += 1;
    if has_request_type {
      self.request_types_generated += 1;
    }
    if has_response_type {
      self.response_types_generated += 1;
    }
    if has_body {
      self.operations_with_body += 1;
    }
  }

  pub fn record_renames(&mut self, count: usize) {
    self.arguments_renamed += count;
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

/// Non-fatal conditions noticed while compiling operations.
///
/// Every warning corresponds to output that was still produced, only with a looser type.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "[{operation_id}] {field}: {message}")]
  Schema {
    operation_id: String,
    field: String,
    message: String,
  },
  #[strum(to_string = "[{operation_id}] path placeholder '{{{placeholder}}}' has no matching parameter")]
  UnknownPathPlaceholder { operation_id: String, placeholder: String },
  #[strum(to_string = "[{operation_id}] method '{method_name}' is already generated by an earlier operation, skipped")]
  DuplicateMethod { operation_id: String, method_name: String },
  #[strum(to_string = "[{operation_id}] request field '{field}' is already declared, skipped")]
  DuplicateField { operation_id: String, field: String },
  #[strum(to_string = "[{operation_id}] override entry does not match any operation")]
  UnusedOverride { operation_id: String },
}

impl GenerationWarning {
  pub fn operation_id(&self) -> &str {
    match self {
      Self::Schema { operation_id, .. }
      | Self::UnknownPathPlaceholder { operation_id, .. }
      | Self::DuplicateMethod { operation_id, .. }
      | Self::DuplicateField { operation_id, .. }
      | Self::UnusedOverride { operation_id } => operation_id,
    }
  }

  /// Skipped items change what ends up in the client and are always reported.
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::DuplicateMethod { .. } | Self::DuplicateField { .. })
  }
}
