use crate::{
  generator::{
    descriptor::Descriptor,
    formatter::TypeFormatter,
    naming::identifiers::to_ts_property_key,
    type_model::{EnumValue, Primitive, TypeMeta},
    type_registry::TypeRegistry,
  },
  utils::text::{jsdoc_lines, ts_string_literal},
};

const INDENT: &str = "  ";

/// Structural formatter: interfaces, string/number enums and type aliases.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TypeScriptFormatter;

impl TypeFormatter for TypeScriptFormatter {
  fn primitive(&self, primitive: Primitive) -> &'static str {
    match primitive {
      Primitive::Int32 | Primitive::Int64 | Primitive::Float | Primitive::Double | Primitive::Decimal => "number",
      Primitive::Boolean => "boolean",
      Primitive::String
      | Primitive::DateTime
      | Primitive::Date
      | Primitive::Time
      | Primitive::Uuid
      | Primitive::Byte => "string",
      Primitive::Binary => "Blob",
      Primitive::Object => "any",
      Primitive::Void => "void",
    }
  }

  fn untyped(&self) -> &'static str {
    "any"
  }

  fn list(&self, item: &str) -> String {
    if item.contains(" | ") {
      format!("({item})[]")
    } else {
      format!("{item}[]")
    }
  }

  fn dictionary(&self, value: &str) -> String {
    format!("Record<string, {value}>")
  }

  fn nullable(&self, text: &str) -> String {
    if text.ends_with("| null") || text == "any" {
      text.to_string()
    } else {
      format!("{text} | null")
    }
  }

  fn generate_model(&self, meta: &TypeMeta, registry: &TypeRegistry) -> String {
    let mut lines = jsdoc_lines(meta.comment_summary.as_deref().unwrap_or_default(), "");

    if meta.is_enum {
      lines.push(format!("export enum {} {{", meta.name));
      for member in &meta.properties {
        lines.extend(jsdoc_lines(member.comment_summary.as_deref().unwrap_or_default(), INDENT));
        let value = match &member.enum_value {
          Some(EnumValue::Number(number)) => number.to_string(),
          Some(EnumValue::Text(text)) => ts_string_literal(text),
          None => ts_string_literal(&member.name),
        };
        lines.push(format!("{INDENT}{} = {value},", member.name));
      }
      lines.push("}".to_string());
      return lines.join("\n") + "\n";
    }

    if let Some(alias) = &meta.alias_of {
      let target = self.format_descriptor(&registry.resolve(&Descriptor::parse(alias)).descriptor);
      lines.push(format!("export type {} = {target};", meta.declared_name()));
      return lines.join("\n") + "\n";
    }

    lines.push(format!("export interface {} {{", meta.declared_name()));
    for property in &meta.properties {
      lines.extend(jsdoc_lines(property.comment_summary.as_deref().unwrap_or_default(), INDENT));
      let optional = if property.is_required { "" } else { "?" };
      lines.push(format!(
        "{INDENT}{}{optional}: {};",
        to_ts_property_key(&property.name),
        self.property_type(meta, property, registry)
      ));
    }
    lines.push("}".to_string());
    lines.join("\n") + "\n"
  }
}
