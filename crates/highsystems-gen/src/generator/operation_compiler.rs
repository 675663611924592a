use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;

use super::{
  document::{HttpMethod, Operation},
  metrics::GenerationWarning,
  naming::{method_name, property_key, request_type_name, response_type_name, to_binding_name, type_suffix},
  overrides::OverrideResolver,
  schema::{SchemaKind, SchemaNode},
  schema_walker::{INDENT, SchemaWalker, doc_comment},
};

pub(crate) const REQUEST_OPTIONS_ARG: &str = "requestOptions";
pub(crate) const RETURN_AXIOS_ARG: &str = "returnAxios";
pub(crate) const BODY_BINDING: &str = "body";
/// Locals every generated method declares besides the parameter bindings.
const RESERVED_BINDINGS: [&str; 4] = [REQUEST_OPTIONS_ARG, RETURN_AXIOS_ARG, BODY_BINDING, "results"];
const REQUEST_OPTIONS_DOC: &str = "Override the default Axios request configuration";
const RETURN_AXIOS_DOC: &str = "If true, the full Axios response is returned instead of the unwrapped `results`";

/// Generated source for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Fragment {
  pub function_definition: String,
  pub types: FragmentTypes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FragmentTypes {
  pub req: String,
  pub res: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledOperation {
  pub method_name: String,
  pub fragment: Fragment,
  pub has_body: bool,
  pub renamed_arguments: usize,
  pub warnings: Vec<GenerationWarning>,
}

/// A parameter as it appears on the generated method.
#[derive(Debug, Clone)]
struct Argument {
  /// Name sent to the API.
  original: String,
  /// Property name on the request type, after overrides.
  key: String,
  /// Local variable bound by the destructuring pattern.
  binding: String,
  description: Option<String>,
}

impl Argument {
  fn pattern(&self) -> String {
    if self.key == self.binding {
      self.binding.clone()
    } else {
      format!("{}: {}", property_key(&self.key), self.binding)
    }
  }

  fn forward(&self) -> String {
    if self.original == self.binding {
      self.binding.clone()
    } else {
      format!("{}: {}", property_key(&self.original), self.binding)
    }
  }
}

/// Compiles single operations into method definitions and their request/response types.
pub(crate) struct OperationCompiler<'r, 'c> {
  overrides: &'r mut OverrideResolver<'c>,
}

impl<'r, 'c> OperationCompiler<'r, 'c> {
  pub(crate) fn new(overrides: &'r mut OverrideResolver<'c>) -> Self {
    Self { overrides }
  }

  pub(crate) fn compile(&mut self, path: &str, method: HttpMethod, operation: &Operation) -> CompiledOperation {
    let operation_id = operation.operation_id.as_str();
    let method_name = method_name(operation_id);
    let suffix = type_suffix(&method_name);
    let request_type = request_type_name(&suffix);
    let response_type = response_type_name(&suffix);

    let mut walker = SchemaWalker::new(operation_id);
    let mut request_lines = vec![format!("{request_type} = {{")];
    let mut arguments = vec![];
    let mut renamed_arguments = 0;
    let mut has_required_field = false;

    let mut taken_keys = HashSet::from([REQUEST_OPTIONS_ARG.to_string(), RETURN_AXIOS_ARG.to_string()]);
    let mut taken_bindings = RESERVED_BINDINGS.iter().map(ToString::to_string).collect::<HashSet<_>>();
    let mut skipped_fields = vec![];

    for parameter in &operation.parameters {
      let key = self.overrides.argument_name(operation_id, &parameter.name);
      if !taken_keys.insert(key.clone()) {
        skipped_fields.push(key);
        continue;
      }
      if key != parameter.name {
        renamed_arguments += 1;
      }

      let mut node = SchemaNode::from_value(&parameter.schema_value());
      if parameter.description.is_some() {
        node.description.clone_from(&parameter.description);
      }
      let required = parameter.is_required();
      request_lines.extend(walker.build_type(&key, &node, required, 1, true));
      has_required_field |= required;

      arguments.push(Argument {
        original: parameter.name.clone(),
        binding: unique_binding(&key, &mut taken_bindings),
        key,
        description: node.description.clone(),
      });
    }

    let response_node = operation.success_schema().map_or_else(
      || SchemaNode::primitive("any"),
      |raw| SchemaNode::from_value(&self.overrides.response_schema(operation_id, raw)),
    );
    let envelope = SchemaNode::object(IndexMap::from([
      ("success".to_string(), SchemaNode::primitive("boolean")),
      ("results".to_string(), response_node),
    ]));
    let response_lines = walker.build_type(&response_type, &envelope, true, 0, false);

    let has_body = if let Some(raw) = operation.body_schema() {
      let node = SchemaNode::from_value(&self.overrides.body_schema(operation_id, raw));
      match &node.kind {
        SchemaKind::Object {
          properties: Some(properties),
          required,
        } => {
          let mut fields = IndexMap::new();
          for (name, field) in properties {
            if taken_keys.contains(name) {
              skipped_fields.push(name.clone());
            } else {
              fields.insert(name.clone(), field.clone());
            }
          }
          request_lines.extend(walker.build_body_type(&fields, required, 1));
          has_required_field |= fields.keys().any(|key| required.contains(key));
        }
        _ => {
          walker.warn_at(&request_type, "request body is not an object with properties, accepting any fields");
          request_lines.push(format!("{INDENT}[key: string]: any;"));
        }
      }
      true
    } else {
      false
    };

    request_lines.push(format!("{INDENT}{REQUEST_OPTIONS_ARG}?: AxiosRequestConfig;"));
    request_lines.push(format!("{INDENT}{RETURN_AXIOS_ARG}?: boolean;"));
    request_lines.push("};".to_string());

    let (url, unknown_placeholders) = render_url(path, &arguments);
    let mut warnings = walker.into_warnings();
    warnings.extend(
      skipped_fields
        .into_iter()
        .map(|field| GenerationWarning::DuplicateField {
          operation_id: operation_id.to_string(),
          field,
        }),
    );
    warnings.extend(
      unknown_placeholders
        .into_iter()
        .map(|placeholder| GenerationWarning::UnknownPathPlaceholder {
          operation_id: operation_id.to_string(),
          placeholder,
        }),
    );

    let signature = MethodSignature {
      method_name: &method_name,
      request_type: &request_type,
      response_type: &response_type,
      options_optional: !has_required_field,
    };
    let mut function_lines = method_doc(&method_name, operation.documentation(), &arguments);
    function_lines.extend(signature.overloads());
    function_lines.push(signature.implementation(&arguments, has_body));
    function_lines.extend(method_body(method, &url, &response_type, &arguments, has_body));

    CompiledOperation {
      fragment: Fragment {
        function_definition: function_lines.join("\n"),
        types: FragmentTypes {
          req: request_lines.join("\n"),
          res: response_lines.join("\n"),
        },
      },
      method_name,
      has_body,
      renamed_arguments,
      warnings,
    }
  }
}

struct MethodSignature<'a> {
  method_name: &'a str,
  request_type: &'a str,
  response_type: &'a str,
  /// The options object may be omitted when no field is required.
  options_optional: bool,
}

impl MethodSignature<'_> {
  fn unwrapped(&self) -> String {
    format!("{}['results']", self.response_type)
  }

  fn envelope(&self) -> String {
    format!("AxiosResponse<{}>", self.response_type)
  }

  /// One overload per `returnAxios` flavour: unwrapped payload, full envelope, or either.
  fn overloads(&self) -> Vec<String> {
    let optional = if self.options_optional { "?" } else { "" };
    let Self {
      method_name,
      request_type,
      ..
    } = self;
    vec![
      format!(
        "public {method_name}(options{optional}: {request_type} & {{ {RETURN_AXIOS_ARG}?: false }}): Promise<{}>;",
        self.unwrapped()
      ),
      format!(
        "public {method_name}(options: {request_type} & {{ {RETURN_AXIOS_ARG}: true }}): Promise<{}>;",
        self.envelope()
      ),
      format!(
        "public {method_name}(options{optional}: {request_type} & {{ {RETURN_AXIOS_ARG}?: boolean }}): Promise<{} | {}>;",
        self.unwrapped(),
        self.envelope()
      ),
    ]
  }

  fn implementation(&self, arguments: &[Argument], has_body: bool) -> String {
    let mut pattern = arguments.iter().map(Argument::pattern).collect_vec();
    pattern.push(REQUEST_OPTIONS_ARG.to_string());
    pattern.push(format!("{RETURN_AXIOS_ARG} = false"));
    if has_body {
      pattern.push(format!("...{BODY_BINDING}"));
    }
    let default = if self.options_optional { " = {}" } else { "" };

    format!(
      "public async {}({{ {} }}: {}{default}): Promise<{} | {}> {{",
      self.method_name,
      pattern.join(", "),
      self.request_type,
      self.unwrapped(),
      self.envelope()
    )
  }
}

/// Binds `key` to a local that no other argument or generated local uses.
fn unique_binding(key: &str, taken: &mut HashSet<String>) -> String {
  let mut binding = to_binding_name(key);
  while taken.contains(&binding) {
    binding.insert(0, '_');
  }
  taken.insert(binding.clone());
  binding
}

fn method_doc(method_name: &str, description: Option<&str>, arguments: &[Argument]) -> Vec<String> {
  let mut lines = vec!["/**".to_string(), format!(" * {method_name}")];

  let described = doc_comment(description, 0);
  if described.len() > 2 {
    lines.push(" *".to_string());
    lines.extend(described[1..described.len() - 1].iter().cloned());
  }

  lines.push(" *".to_string());
  for argument in arguments {
    match argument.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
      Some(description) => {
        let first_line = description.lines().next().unwrap_or_default().replace("*/", "*\\/");
        lines.push(format!(" * @param {} {first_line}", argument.binding));
      }
      None => lines.push(format!(" * @param {}", argument.binding)),
    }
  }
  lines.push(format!(" * @param {REQUEST_OPTIONS_ARG} {REQUEST_OPTIONS_DOC}"));
  lines.push(format!(" * @param {RETURN_AXIOS_ARG} {RETURN_AXIOS_DOC}"));
  lines.push(" */".to_string());
  lines
}

fn method_body(
  method: HttpMethod,
  url: &str,
  response_type: &str,
  arguments: &[Argument],
  has_body: bool,
) -> Vec<String> {
  let mut call = vec![
    format!("{INDENT}const results = await this.api<{response_type}>({{"),
    format!("{INDENT}{INDENT}method: '{}'", method.as_upper()),
    format!("{INDENT}{INDENT}url: `{url}`"),
  ];
  if has_body {
    call.push(format!("{INDENT}{INDENT}data: {BODY_BINDING}"));
  }
  if !arguments.is_empty() {
    let params = arguments.iter().map(Argument::forward).join(", ");
    call.push(format!("{INDENT}{INDENT}params: {{ {params} }}"));
  }

  let last = call.len() - 1;
  let mut lines = call
    .into_iter()
    .enumerate()
    .map(|(i, line)| if i == 0 || i == last { line } else { format!("{line},") })
    .collect_vec();
  lines.push(format!("{INDENT}}}, {REQUEST_OPTIONS_ARG});"));
  lines.push(String::new());
  lines.push(format!(
    "{INDENT}return {RETURN_AXIOS_ARG} ? results : (typeof results.data === 'object' ? results.data.results : results.data);"
  ));
  lines.push("}".to_string());
  lines
}

/// Replaces each `{name}` placeholder with an interpolation of the matching argument.
///
/// Returns the template literal body and the placeholders no argument matched; those are
/// left in place.
fn render_url(path: &str, arguments: &[Argument]) -> (String, Vec<String>) {
  let mut url = String::new();
  let mut unknown = vec![];
  let mut rest = path;

  while let Some(open) = rest.find('{') {
    let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
      break;
    };
    url.push_str(&escape_template_text(&rest[..open]));

    let placeholder = &rest[open + 1..close];
    match arguments.iter().find(|argument| argument.original == placeholder) {
      Some(argument) => {
        url.push_str("${");
        url.push_str(&argument.binding);
        url.push('}');
      }
      None => {
        unknown.push(placeholder.to_string());
        url.push_str(&escape_template_text(&rest[open..=close]));
      }
    }
    rest = &rest[close + 1..];
  }
  url.push_str(&escape_template_text(rest));

  (url, unknown)
}

fn escape_template_text(text: &str) -> String {
  text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn argument(original: &str, key: &str) -> Argument {
    Argument {
      original: original.to_string(),
      key: key.to_string(),
      binding: to_binding_name(key),
      description: None,
    }
  }

  #[test]
  fn test_render_url_substitutes_placeholders() {
    let (url, unknown) = render_url(
      "/apps/{appId}/tables/{tableId}",
      &[argument("appId", "appId"), argument("tableId", "tableId")],
    );
    assert_eq!(url, "/apps/${appId}/tables/${tableId}");
    assert!(unknown.is_empty());
  }

  #[test]
  fn test_render_url_uses_renamed_binding() {
    let (url, _) = render_url("/widgets/{id}", &[argument("id", "widgetId")]);
    assert_eq!(url, "/widgets/${widgetId}");
  }

  #[test]
  fn test_render_url_keeps_unknown_placeholders() {
    let (url, unknown) = render_url("/widgets/{id}/parts/{partId}", &[argument("id", "id")]);
    assert_eq!(url, "/widgets/${id}/parts/{partId}");
    assert_eq!(unknown, vec!["partId".to_string()]);
  }

  #[test]
  fn test_render_url_escapes_template_syntax() {
    let (url, _) = render_url("/odd`path/$x/{id}", &[argument("id", "id")]);
    assert_eq!(url, "/odd\\`path/$x/${id}");
  }

  #[test]
  fn test_unique_binding_avoids_generated_locals() {
    let mut taken = RESERVED_BINDINGS.iter().map(ToString::to_string).collect::<HashSet<_>>();
    assert_eq!(unique_binding("body", &mut taken), "_body");
    assert_eq!(unique_binding("results", &mut taken), "_results");
    assert_eq!(unique_binding("limit", &mut taken), "limit");
    assert_eq!(unique_binding("_body", &mut taken), "__body");
  }

  #[test]
  fn test_method_body_fields_have_single_commas() {
    let lines = method_body(
      HttpMethod::Post,
      "/widgets",
      "Res",
      &[argument("limit", "limit")],
      true,
    );
    assert_eq!(
      lines[..5],
      [
        "\tconst results = await this.api<Res>({",
        "\t\tmethod: 'POST',",
        "\t\turl: `/widgets`,",
        "\t\tdata: body,",
        "\t\tparams: { limit }",
      ]
    );
    assert!(lines.iter().all(|line| !line.contains(",,")));
  }

  #[test]
  fn test_argument_patterns() {
    assert_eq!(argument("id", "id").pattern(), "id");
    assert_eq!(argument("id", "id").forward(), "id");
    assert_eq!(argument("id", "widgetId").pattern(), "widgetId");
    assert_eq!(argument("id", "widgetId").forward(), "id: widgetId");
    assert_eq!(argument("x-trace", "x-trace").pattern(), "'x-trace': xTrace");
    assert_eq!(argument("x-trace", "x-trace").forward(), "'x-trace': xTrace");
  }
}
