//! Call-site syntax that differs between the structural and the object target.

use crate::{
  generator::{
    formatter::{TypeFormatter, csharp::CSharpFormatter, typescript::TypeScriptFormatter},
    naming::identifiers::{to_camel_name, to_csharp_parameter, to_ts_identifier, to_type_name},
  },
  utils::text::{doc_lines, jsdoc_lines, xml_escape, xml_summary_lines},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
  TypeScript,
  CSharp,
}

/// Parameter documentation entry of a function comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParamDoc {
  pub(crate) name: String,
  pub(crate) text: String,
}

impl Language {
  pub(crate) fn formatter(self) -> &'static dyn TypeFormatter {
    match self {
      Self::TypeScript => &TypeScriptFormatter,
      Self::CSharp => &CSharpFormatter,
    }
  }

  /// Call-site casing of a function name: `getItem` or `GetItemAsync`.
  pub(crate) fn function_name(self, raw: &str) -> String {
    match self {
      Self::TypeScript => to_camel_name(raw),
      Self::CSharp => {
        let name = to_type_name(raw);
        if name.ends_with("Async") { name } else { format!("{name}Async") }
      }
    }
  }

  pub(crate) fn identifier(self, wire_name: &str) -> String {
    match self {
      Self::TypeScript => to_ts_identifier(wire_name),
      Self::CSharp => to_csharp_parameter(wire_name),
    }
  }

  /// `name: Type` or `Type name`.
  pub(crate) fn param(self, name: &str, type_text: &str) -> String {
    match self {
      Self::TypeScript => format!("{name}: {type_text}"),
      Self::CSharp => format!("{type_text} {name}"),
    }
  }

  /// String interpolation hole inside a URL template.
  pub(crate) fn interpolate(self, expression: &str) -> String {
    match self {
      Self::TypeScript => format!("${{{expression}}}"),
      Self::CSharp => format!("{{{expression}}}"),
    }
  }

  /// A `{name}` placeholder kept as literal URL text.
  pub(crate) fn literal_placeholder(self, name: &str) -> String {
    match self {
      Self::TypeScript => format!("{{{name}}}"),
      Self::CSharp => format!("{{{{{name}}}}}"),
    }
  }

  /// Expression for an optional query value that renders a missing value as
  /// the empty string. C# interpolation already formats `null` as `""`.
  pub(crate) fn coalesce_empty(self, expression: &str) -> String {
    match self {
      Self::TypeScript => format!("{expression} ?? ''"),
      Self::CSharp => expression.to_string(),
    }
  }

  /// Type of the single data argument that carries form fields and files.
  pub(crate) fn form_data_type(self) -> &'static str {
    match self {
      Self::TypeScript => "FormData",
      Self::CSharp => "MultipartFormDataContent",
    }
  }

  pub(crate) fn ext_options_param(self) -> &'static str {
    match self {
      Self::TypeScript => "extOptions?: RequestOptions",
      Self::CSharp => "RequestOptions? options = null",
    }
  }

  pub(crate) fn ext_options_arg(self) -> &'static str {
    match self {
      Self::TypeScript => "extOptions",
      Self::CSharp => "options",
    }
  }

  /// Function doc comment lines, without indentation.
  pub(crate) fn function_comment(self, text: &str, params: &[ParamDoc], deprecated: bool) -> Vec<String> {
    match self {
      Self::TypeScript => {
        let mut body = doc_lines(text);
        if !params.is_empty() || deprecated {
          if !body.is_empty() {
            body.push(String::new());
          }
          body.extend(params.iter().map(|doc| format!("@param {} {}", doc.name, doc.text)));
          if deprecated {
            body.push("@deprecated".to_string());
          }
        }
        jsdoc_lines(&body.join("\n"), "")
      }
      Self::CSharp => {
        let mut lines = xml_summary_lines(text, "");
        lines.extend(params.iter().map(|doc| {
          format!("/// <param name=\"{}\">{}</param>", doc.name.trim_start_matches('@'), xml_escape(&doc.text))
        }));
        lines
      }
    }
  }
}

/// A TypeScript class method whose body is a single `return {call};`.
pub(crate) fn typescript_method(comment: &[String], name: &str, signature: &str, return_type: &str, call: &str) -> String {
  const INDENT: &str = "  ";
  let mut lines = comment.iter().map(|line| format!("{INDENT}{line}")).collect::<Vec<_>>();
  lines.push(format!("{INDENT}{name}({signature}): {return_type} {{"));
  lines.push(format!("{INDENT}{INDENT}return {call};"));
  lines.push(format!("{INDENT}}}"));
  lines.join("\n") + "\n"
}
