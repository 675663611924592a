use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{document::ApiDocument, naming::method_name},
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::spec::DocumentLoader,
};

/// One row of the operations table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OperationRow {
  operation_id: String,
  method: &'static str,
  path: String,
  method_name: String,
}

/// Rows in generation order.
fn operation_rows(document: &ApiDocument) -> Vec<OperationRow> {
  document
    .operations()
    .map(|(path, method, operation)| OperationRow {
      operation_id: operation.operation_id.clone(),
      method: method.as_upper(),
      path: path.to_string(),
      method_name: method_name(&operation.operation_id),
    })
    .collect()
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = DocumentLoader::open(input).await?.parse()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["OPERATION ID", "METHOD", "PATH", "CLIENT METHOD"] {
    header.add_cell(Cell::new(title).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(header);

  for row in operation_rows(&document) {
    let mut cells = Row::new();
    cells.add_cell(
      Cell::new(row.operation_id)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    cells.add_cell(
      Cell::new(row.method)
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    cells.add_cell(Cell::new(row.path).fg(IntoComfyColor::into(colors.primary())));
    cells.add_cell(Cell::new(row.method_name).fg(IntoComfyColor::into(colors.info())));
    table.add_row(cells);
  }

  println!("{table}");

  Ok(())
}
