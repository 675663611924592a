use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) const REQUEST_TYPE_PREFIX: &str = "HighSystemsRequest";
pub(crate) const RESPONSE_TYPE_PREFIX: &str = "HighSystemsResponse";

/// Words that cannot be used as a bare binding in a destructuring pattern.
pub(crate) static RESERVED_WORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do", "else", "enum",
    "export", "extends", "false", "finally", "for", "function", "if", "import", "in", "instanceof", "new", "null",
    "return", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    "let", "static", "implements", "interface", "package", "private", "protected", "public", "await", "arguments",
    "eval",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_$]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, replaces characters that cannot appear in an identifier
/// with underscores, collapses runs of underscores and trims them from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Returns true when `name` can be written as an unquoted property key.
pub(crate) fn is_valid_property_key(name: &str) -> bool {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return false;
  };
  (first.is_ascii_alphabetic() || first == '_' || first == '$')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Returns true when `name` can be used as a local binding.
pub(crate) fn is_valid_binding(name: &str) -> bool {
  is_valid_property_key(name) && !RESERVED_WORDS.contains(name)
}

/// Renders a property key, quoting it when it is not a plain identifier.
pub(crate) fn property_key(name: &str) -> String {
  if is_valid_property_key(name) {
    name.to_string()
  } else {
    string_literal(name)
  }
}

/// Single-quoted JS string literal. Line terminators and other control characters are escaped.
pub(crate) fn string_literal(value: &str) -> String {
  let mut literal = String::with_capacity(value.len() + 2);
  literal.push('\'');
  for c in value.chars() {
    match c {
      '\\' => literal.push_str("\\\\"),
      '\'' => literal.push_str("\\'"),
      '\n' => literal.push_str("\\n"),
      '\r' => literal.push_str("\\r"),
      '\t' => literal.push_str("\\t"),
      '\u{2028}' => literal.push_str("\\u2028"),
      '\u{2029}' => literal.push_str("\\u2029"),
      c if c.is_control() => literal.push_str(&format!("\\u{:04x}", u32::from(c))),
      c => literal.push(c),
    }
  }
  literal.push('\'');
  literal
}

/// Converts an argument name into a local binding usable in a destructuring pattern.
///
/// # Rules:
/// 1. Valid bindings are kept verbatim.
/// 2. Otherwise the name is sanitized and converted to `camelCase`.
/// 3. Reserved words and names starting with a digit are prefixed with `_`.
/// 4. An empty result becomes `_arg`.
pub(crate) fn to_binding_name(name: &str) -> String {
  if is_valid_binding(name) {
    return name.to_string();
  }

  let ident = sanitize(name).to_camel_case();
  if ident.is_empty() {
    return "_arg".to_string();
  }
  if RESERVED_WORDS.contains(ident.as_str()) || ident.starts_with(|c: char| c.is_ascii_digit()) {
    return format!("_{ident}");
  }
  ident
}

/// Derives the client method name from an `operationId`, e.g. `get-widget` -> `getWidget`.
pub(crate) fn method_name(operation_id: &str) -> String {
  let ident = sanitize(operation_id).to_camel_case();
  if ident.is_empty() {
    return "operation".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    return format!("_{ident}");
  }
  ident
}

/// Capitalizes each word of a method name, e.g. `getWidget` -> `GetWidget`.
pub(crate) fn type_suffix(method_name: &str) -> String {
  method_name.to_pascal_case()
}

pub(crate) fn request_type_name(suffix: &str) -> String {
  format!("{REQUEST_TYPE_PREFIX}{suffix}")
}

pub(crate) fn response_type_name(suffix: &str) -> String {
  format!("{RESPONSE_TYPE_PREFIX}{suffix}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_method_name_from_dashed_operation_id() {
    assert_eq!(method_name("get-widget"), "getWidget");
    assert_eq!(method_name("get-all-widgets"), "getAllWidgets");
    assert_eq!(method_name("getWidget"), "getWidget");
  }

  #[test]
  fn test_type_suffix_capitalizes_words() {
    assert_eq!(type_suffix("getWidget"), "GetWidget");
    assert_eq!(request_type_name(&type_suffix("getWidget")), "HighSystemsRequestGetWidget");
    assert_eq!(
      response_type_name(&type_suffix("getWidget")),
      "HighSystemsResponseGetWidget"
    );
  }

  #[test]
  fn test_property_key_quotes_invalid_identifiers() {
    assert_eq!(property_key("name"), "name");
    assert_eq!(property_key("$select"), "$select");
    assert_eq!(property_key("x-request-id"), "'x-request-id'");
    assert_eq!(property_key("it's"), "'it\\'s'");
    assert_eq!(property_key("1st"), "'1st'");
    assert_eq!(property_key("line\nbreak"), "'line\\nbreak'");
  }

  #[test]
  fn test_string_literal_escapes_line_terminators() {
    assert_eq!(string_literal("a\r\nb"), "'a\\r\\nb'");
    assert_eq!(string_literal("x\u{2028}y\u{2029}"), "'x\\u2028y\\u2029'");
    assert_eq!(string_literal("bell\u{7}"), "'bell\\u0007'");
    assert_eq!(string_literal("tab\there"), "'tab\\there'");
    assert_eq!(string_literal("C:\\dir"), "'C:\\\\dir'");
  }

  #[test]
  fn test_to_binding_name() {
    assert_eq!(to_binding_name("appId"), "appId");
    assert_eq!(to_binding_name("x-request-id"), "xRequestId");
    assert_eq!(to_binding_name("default"), "_default");
    assert_eq!(to_binding_name("---"), "_arg");
  }

  #[test]
  fn test_sanitize() {
    assert_eq!(sanitize("héllo wörld"), "hello_world");
    assert_eq!(sanitize("__a--b__"), "a_b");
    assert_eq!(sanitize(""), "");
  }
}
