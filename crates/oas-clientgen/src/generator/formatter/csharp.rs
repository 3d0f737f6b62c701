use std::collections::BTreeSet;

use crate::{
  generator::{
    descriptor::Descriptor,
    formatter::TypeFormatter,
    naming::identifiers::{ensure_unique, to_type_name},
    type_model::{EnumValue, Primitive, TypeMeta},
    type_registry::TypeRegistry,
  },
  utils::text::{csharp_string_literal, xml_summary_lines},
};

const INDENT: &str = "    ";

/// Object formatter: classes with `System.Text.Json` attributes, enums and
/// collection-derived aliases.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CSharpFormatter;

impl TypeFormatter for CSharpFormatter {
  fn primitive(&self, primitive: Primitive) -> &'static str {
    match primitive {
      Primitive::Int32 => "int",
      Primitive::Int64 => "long",
      Primitive::Float => "float",
      Primitive::Double => "double",
      Primitive::Decimal => "decimal",
      Primitive::Boolean => "bool",
      Primitive::String => "string",
      Primitive::DateTime => "DateTimeOffset",
      Primitive::Date => "DateOnly",
      Primitive::Time => "TimeOnly",
      Primitive::Uuid => "Guid",
      Primitive::Binary => "Stream",
      Primitive::Byte => "byte[]",
      Primitive::Object => "object",
      Primitive::Void => "void",
    }
  }

  fn untyped(&self) -> &'static str {
    "object"
  }

  fn list(&self, item: &str) -> String {
    format!("List<{item}>")
  }

  fn dictionary(&self, value: &str) -> String {
    format!("Dictionary<string, {value}>")
  }

  fn nullable(&self, text: &str) -> String {
    if text.ends_with('?') {
      text.to_string()
    } else {
      format!("{text}?")
    }
  }

  fn generate_model(&self, meta: &TypeMeta, registry: &TypeRegistry) -> String {
    let mut lines = xml_summary_lines(meta.comment_summary.as_deref().unwrap_or_default(), "");

    if meta.is_enum {
      lines.extend(Self::enum_declaration(meta));
      return lines.join("\n") + "\n";
    }

    if let Some(alias) = &meta.alias_of {
      let target = self.format_descriptor(&registry.resolve(&Descriptor::parse(alias)).descriptor);
      lines.push(format!("public class {} : {target}", meta.declared_name()));
      lines.push("{".to_string());
      lines.push("}".to_string());
      return lines.join("\n") + "\n";
    }

    lines.push(format!("public class {}", meta.declared_name()));
    lines.push("{".to_string());
    let mut used = BTreeSet::new();
    for (index, property) in meta.properties.iter().enumerate() {
      if index > 0 {
        lines.push(String::new());
      }
      let mut member = to_type_name(&property.name);
      if member == meta.name {
        member.push_str("Value");
      }
      let member = ensure_unique(&member, &used);
      used.insert(member.clone());

      lines.extend(xml_summary_lines(
        property.comment_summary.as_deref().unwrap_or_default(),
        INDENT,
      ));
      lines.push(format!(
        "{INDENT}[JsonPropertyName({})]",
        csharp_string_literal(&property.name)
      ));
      let required = if property.is_required { "required " } else { "" };
      lines.push(format!(
        "{INDENT}public {required}{} {member} {{ get; set; }}",
        self.property_type(meta, property, registry)
      ));
    }
    lines.push("}".to_string());
    lines.join("\n") + "\n"
  }
}

impl CSharpFormatter {
  fn enum_declaration(meta: &TypeMeta) -> Vec<String> {
    let is_string_enum = meta
      .properties
      .iter()
      .any(|member| matches!(member.enum_value, Some(EnumValue::Text(_))));

    let mut lines = vec![];
    if is_string_enum {
      lines.push(format!(
        "[JsonConverter(typeof(JsonStringEnumConverter<{}>))]",
        meta.name
      ));
    }
    lines.push(format!("public enum {}", meta.name));
    lines.push("{".to_string());
    for member in &meta.properties {
      lines.extend(xml_summary_lines(
        member.comment_summary.as_deref().unwrap_or_default(),
        INDENT,
      ));
      match &member.enum_value {
        Some(EnumValue::Number(number)) if !is_string_enum => {
          lines.push(format!("{INDENT}{} = {number},", member.name));
        }
        Some(value) => {
          lines.push(format!(
            "{INDENT}[JsonStringEnumMemberName({})]",
            csharp_string_literal(&value.to_string())
          ));
          lines.push(format!("{INDENT}{},", member.name));
        }
        None => lines.push(format!("{INDENT}{},", member.name)),
      }
    }
    lines.push("}".to_string());
    lines
  }
}
