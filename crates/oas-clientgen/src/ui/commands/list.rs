use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{
    GeneratorConfig,
    document::SchemaDocument,
    emitter::syntax::Language,
    naming::operations::strip_tag_prefix,
    operation_parser::DEFAULT_TAG,
    orchestrator::Orchestrator,
  },
  ui::{Colors, term_width},
  utils::spec::SpecLoader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OperationRow {
  function: String,
  tag: String,
  method: String,
  path: String,
}

/// Operations as the TypeScript clients name them, sorted by tag then name.
fn operation_rows(document: SchemaDocument, source: &str) -> Vec<OperationRow> {
  let (functions, _) = Orchestrator::new(document, GeneratorConfig::default(), source).operations();
  let mut rows = functions
    .iter()
    .map(|function| OperationRow {
      function: Language::TypeScript.function_name(strip_tag_prefix(&function.name, function.tag.as_deref())),
      tag: function.tag.clone().unwrap_or_else(|| DEFAULT_TAG.to_string()),
      method: function.method.to_string(),
      path: function.path.clone(),
    })
    .collect::<Vec<_>>();
  rows.sort_by(|a, b| (&a.tag, &a.function).cmp(&(&b.tag, &b.function)));
  rows
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::open(input).await?.parse()?;
  let rows = operation_rows(document, &input.display().to_string());

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["FUNCTION", "TAG", "METHOD", "PATH"] {
    header.add_cell(Cell::new(title).fg(Colors::cell(colors.label())));
  }
  table.set_header(header);

  for OperationRow {
    function,
    tag,
    method,
    path,
  } in rows
  {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(function)
        .fg(Colors::cell(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(tag).fg(Colors::cell(colors.info())));
    row.add_cell(
      Cell::new(method)
        .fg(Colors::cell(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(Colors::cell(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
