//! The client template, parsed into static text and three insertion slots.
//!
//! Parsing happens once, before any generated content exists, so generated code that
//! happens to contain a marker string is never mistaken for an insertion point.

use strum::{Display, EnumIter, IntoEnumIterator};

/// Lines carrying this tag exist only for the template's own type checking and are
/// dropped from the generated client.
pub const REMOVE_LINE_TAG: &str = "/* @generator-remove */";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Slot {
  #[strum(to_string = "methods")]
  Methods,
  #[strum(to_string = "request types")]
  RequestTypes,
  #[strum(to_string = "response types")]
  ResponseTypes,
}

impl Slot {
  pub const fn marker(self) -> &'static str {
    match self {
      Self::Methods => "//** METHODS **//",
      Self::RequestTypes => "//** REQUEST TYPES **//",
      Self::ResponseTypes => "//** RESPONSE TYPES **//",
    }
  }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
  #[error("template is missing the {slot} marker '{marker}'")]
  MissingMarker { slot: Slot, marker: &'static str },
  #[error("template contains the {slot} marker '{marker}' more than once (lines {first} and {second})")]
  DuplicateMarker {
    slot: Slot,
    marker: &'static str,
    first: usize,
    second: usize,
  },
  #[error("line {line} contains more than one marker")]
  CrowdedLine { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Text(String),
  Slot(Slot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  segments: Vec<Segment>,
}

/// Content for each slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotContent {
  pub methods: String,
  pub request_types: String,
  pub response_types: String,
}

impl SlotContent {
  fn get(&self, slot: Slot) -> &str {
    match slot {
      Slot::Methods => &self.methods,
      Slot::RequestTypes => &self.request_types,
      Slot::ResponseTypes => &self.response_types,
    }
  }
}

impl Template {
  /// Parses template source.
  ///
  /// Tagged lines are removed first. Every marker must then appear exactly once, on a
  /// line of its own; that whole line becomes the slot.
  pub fn parse(source: &str) -> Result<Self, TemplateError> {
    let mut segments = vec![];
    let mut text = String::new();
    let mut seen: Vec<(Slot, usize)> = vec![];

    for (index, line) in source.split_inclusive('\n').enumerate() {
      let line_number = index + 1;
      if line.contains(REMOVE_LINE_TAG) {
        continue;
      }

      let mut slots_on_line = Slot::iter().filter(|slot| line.contains(slot.marker()));
      let Some(slot) = slots_on_line.next() else {
        text.push_str(line);
        continue;
      };
      if slots_on_line.next().is_some() {
        return Err(TemplateError::CrowdedLine { line: line_number });
      }

      if let Some(&(_, first)) = seen.iter().find(|(s, _)| *s == slot) {
        return Err(TemplateError::DuplicateMarker {
          slot,
          marker: slot.marker(),
          first,
          second: line_number,
        });
      }
      seen.push((slot, line_number));

      if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(&mut text)));
      }
      segments.push(Segment::Slot(slot));
    }

    if !text.is_empty() {
      segments.push(Segment::Text(text));
    }

    if let Some(slot) = Slot::iter().find(|slot| !seen.iter().any(|(s, _)| s == slot)) {
      return Err(TemplateError::MissingMarker {
        slot,
        marker: slot.marker(),
      });
    }

    Ok(Self { segments })
  }

  /// Renders the template with each slot replaced by its content.
  ///
  /// Slot content always ends with a newline so that the following template line stays
  /// on its own line.
  pub fn render(&self, content: &SlotContent) -> String {
    let mut output = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Text(text) => output.push_str(text),
        Segment::Slot(slot) => {
          let body = content.get(*slot);
          output.push_str(body);
          if !body.is_empty() && !body.ends_with('\n') {
            output.push('\n');
          }
        }
      }
    }
    output
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TEMPLATE: &str = "import axios from 'axios';\n\
    //** REQUEST TYPES **//\n\
    //** RESPONSE TYPES **//\n\
    export class HighSystems {\n\
    \t//** METHODS **//\n\
    }\n";

  #[test]
  fn test_parse_and_render() {
    let template = Template::parse(TEMPLATE).unwrap();
    let output = template.render(&SlotContent {
      methods: "\tpublic a() {}".to_string(),
      request_types: "export type A = {};\n".to_string(),
      response_types: "export type B = {};".to_string(),
    });

    assert_eq!(
      output,
      "import axios from 'axios';\nexport type A = {};\nexport type B = {};\nexport class HighSystems {\n\tpublic a() {}\n}\n"
    );
  }

  #[test]
  fn test_empty_slots_remove_marker_lines() {
    let template = Template::parse(TEMPLATE).unwrap();
    let output = template.render(&SlotContent::default());
    assert_eq!(output, "import axios from 'axios';\nexport class HighSystems {\n}\n");
  }

  #[test]
  fn test_generated_content_with_marker_is_not_reinterpreted() {
    let template = Template::parse(TEMPLATE).unwrap();
    let output = template.render(&SlotContent {
      methods: "\t// //** REQUEST TYPES **//\n".to_string(),
      request_types: String::new(),
      response_types: String::new(),
    });
    assert!(output.contains("\t// //** REQUEST TYPES **//\n}"));
  }

  #[test]
  fn test_remove_tag_lines_are_dropped() {
    let source = format!("// @ts-nocheck {REMOVE_LINE_TAG}\n{TEMPLATE}");
    let template = Template::parse(&source).unwrap();
    let output = template.render(&SlotContent::default());
    assert!(!output.contains("@ts-nocheck"));
    assert!(output.starts_with("import axios"));
  }

  #[test]
  fn test_marker_on_removed_line_is_missing() {
    let source = TEMPLATE.replace("//** METHODS **//", &format!("//** METHODS **// {REMOVE_LINE_TAG}"));
    assert_eq!(
      Template::parse(&source),
      Err(TemplateError::MissingMarker {
        slot: Slot::Methods,
        marker: "//** METHODS **//",
      })
    );
  }

  #[test]
  fn test_missing_marker() {
    let source = TEMPLATE.replace("//** RESPONSE TYPES **//\n", "");
    let err = Template::parse(&source).unwrap_err();
    assert_eq!(
      err.to_string(),
      "template is missing the response types marker '//** RESPONSE TYPES **//'"
    );
  }

  #[test]
  fn test_duplicate_marker() {
    let source = format!("{TEMPLATE}//** METHODS **//\n");
    assert_eq!(
      Template::parse(&source),
      Err(TemplateError::DuplicateMarker {
        slot: Slot::Methods,
        marker: "//** METHODS **//",
        first: 5,
        second: 7,
      })
    );
  }

  #[test]
  fn test_two_markers_on_one_line() {
    let source = "//** METHODS **// //** REQUEST TYPES **//\n//** RESPONSE TYPES **//\n";
    assert_eq!(Template::parse(source), Err(TemplateError::CrowdedLine { line: 1 }));
  }
}
