//! The per-operation algorithm every client variant shares: call-site name,
//! parameter signature, URL template, data argument and generic materialization.

use std::{collections::BTreeSet, sync::LazyLock};

use itertools::Itertools;
use regex::{Captures, Regex};

use crate::generator::{
  emitter::syntax::{Language, ParamDoc},
  generic_name::{GenericName, parse_generic_name, placeholder_index},
  naming::{identifiers::ensure_unique, operations::strip_tag_prefix},
  path_template::render_template,
  type_model::{ParamInfo, ParameterLocation, Primitive, RequestFunction},
  type_registry::TypeRegistry,
};

/// A `<...>` list made only of generic placeholders, e.g. `<T>` or `<T, T2>`.
static PLACEHOLDER_LIST_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<\s*T\d*(?:\s*,\s*T\d*)*\s*>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataKind {
  None,
  Json,
  /// Form fields or a raw file, sent as multipart content.
  Form,
}

/// Rendered pieces of one client function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FunctionParts {
  pub(crate) name: String,
  pub(crate) params_signature: String,
  /// Doc comment lines without indentation.
  pub(crate) comment: Vec<String>,
  /// Trailing call arguments after the URL, each prefixed with `, `.
  pub(crate) data_arg_suffix: String,
  /// URL template body, without the surrounding quotes.
  pub(crate) path: String,
  /// `None` when the operation returns nothing.
  pub(crate) response_type: Option<String>,
  pub(crate) data_kind: DataKind,
  pub(crate) is_download: bool,
  pub(crate) deprecated: bool,
}

/// Builds functions of one tag group; call-site names stay unique within it.
pub(crate) struct FunctionBuilder<'a> {
  registry: &'a TypeRegistry,
  language: Language,
  used_names: BTreeSet<String>,
}

impl<'a> FunctionBuilder<'a> {
  pub(crate) fn new(registry: &'a TypeRegistry, language: Language) -> Self {
    Self {
      registry,
      language,
      used_names: BTreeSet::new(),
    }
  }

  pub(crate) fn build_function_common(&mut self, function: &RequestFunction, include_ext_options: bool) -> FunctionParts {
    let language = self.language;
    let formatter = language.formatter();

    let base_name = language.function_name(strip_tag_prefix(&function.name, function.tag.as_deref()));
    let name = ensure_unique(&base_name, &self.used_names);
    self.used_names.insert(name.clone());

    let mut identifiers = BTreeSet::new();
    let mut bound = vec![];
    let mut ordered = function
      .params
      .iter()
      .filter(|param| param.location != ParameterLocation::Form)
      .collect::<Vec<_>>();
    ordered.sort_by_key(|param| !param.is_required);
    for param in ordered {
      let ident = ensure_unique(&language.identifier(&param.name), &identifiers);
      identifiers.insert(ident.clone());
      bound.push((param, ident));
    }

    let mut signature = vec![];
    let mut docs = vec![];
    for (param, ident) in &bound {
      let type_text = self.materialize(&param.type_text, param.ref_name.as_deref());
      let type_text = if param.is_required {
        type_text
      } else {
        formatter.nullable(&type_text)
      };
      signature.push(language.param(ident, &type_text));
      if let Some(description) = param.description.as_deref().filter(|d| !d.trim().is_empty()) {
        docs.push(ParamDoc {
          name: ident.clone(),
          text: description.trim().to_string(),
        });
      }
    }

    let form_params = function
      .params
      .iter()
      .filter(|param| param.location == ParameterLocation::Form)
      .collect::<Vec<_>>();
    let (data_kind, data_ident) = if !form_params.is_empty() {
      let base = function
        .file_param()
        .map_or_else(|| "formData".to_string(), |param| language.identifier(&param.name));
      let ident = ensure_unique(&base, &identifiers);
      signature.push(language.param(&ident, language.form_data_type()));
      docs.push(ParamDoc {
        name: ident.clone(),
        text: form_fields_doc(&form_params),
      });
      (DataKind::Form, Some(ident))
    } else if let Some(request_type) = &function.request_type_text {
      let ident = ensure_unique("data", &identifiers);
      let type_text = self.materialize(request_type, function.request_ref_name.as_deref());
      signature.push(language.param(&ident, &type_text));
      (DataKind::Json, Some(ident))
    } else {
      (DataKind::None, None)
    };

    let mut call_args = data_ident.into_iter().collect::<Vec<_>>();
    if include_ext_options {
      signature.push(language.ext_options_param().to_string());
      if call_args.is_empty() {
        call_args.push("null".to_string());
      }
      call_args.push(language.ext_options_arg().to_string());
    }

    let response_type = if function.is_download {
      Some(formatter.primitive(Primitive::Binary).to_string())
    } else {
      function
        .response_type_text
        .as_deref()
        .filter(|text| *text != formatter.primitive(Primitive::Void))
        .map(|text| self.materialize(text, function.response_ref_name.as_deref()))
    };

    let comment_text = [function.summary.as_deref(), function.description.as_deref()]
      .into_iter()
      .flatten()
      .map(str::trim)
      .filter(|text| !text.is_empty())
      .unique()
      .join("\n\n");

    FunctionParts {
      name,
      params_signature: signature.join(", "),
      comment: language.function_comment(&comment_text, &docs, function.deprecated),
      data_arg_suffix: call_args.iter().map(|arg| format!(", {arg}")).collect(),
      path: self.url_template(&function.path, &bound),
      response_type,
      data_kind,
      is_download: function.is_download,
      deprecated: function.deprecated,
    }
  }

  /// Path placeholders become interpolation holes; query parameters are
  /// appended as `name=value` pairs with optional values coalesced to `''`.
  fn url_template(&self, path: &str, bound: &[(&ParamInfo, String)]) -> String {
    let language = self.language;
    let mut url = render_template(path, |placeholder| {
      let hole = bound
        .iter()
        .find(|(param, _)| param.in_path && param.name == placeholder)
        .map_or_else(
          || language.literal_placeholder(placeholder),
          |(_, ident)| language.interpolate(ident),
        );
      Some(hole)
    });

    let query = bound
      .iter()
      .filter(|(param, _)| param.location == ParameterLocation::Query)
      .map(|(param, ident)| {
        let value = if param.is_required {
          ident.clone()
        } else {
          language.coalesce_empty(ident)
        };
        format!("{}={}", param.name, language.interpolate(&value))
      })
      .join("&");

    if !query.is_empty() {
      url.push(if url.contains('?') { '&' } else { '?' });
      url.push_str(&query);
    }
    url
  }

  /// Replaces a placeholder-only argument list in `type_text` with the
  /// concrete arguments encoded in the raw generic reference name.
  ///
  /// The argument list of a parsed key never includes the outer container,
  /// so `PageList<T>` against ``PageList`1[[NS.ItemDto]]`` becomes `PageList<ItemDto>`.
  pub(crate) fn materialize(&self, type_text: &str, ref_name: Option<&str>) -> String {
    let Some(parsed) = ref_name
      .and_then(|name| parse_generic_name(name).ok())
      .filter(GenericName::is_generic)
    else {
      return type_text.to_string();
    };
    if parsed.args.is_empty() {
      return type_text.to_string();
    }

    let formatter = self.language.formatter();
    let args = parsed
      .args
      .iter()
      .map(|arg| formatter.format_descriptor(&self.registry.resolve_descriptor(&arg.descriptor()).descriptor))
      .collect::<Vec<_>>();

    PLACEHOLDER_LIST_RE
      .replace_all(type_text, |caps: &Captures| {
        let inner = caps[0].trim_start_matches('<').trim_end_matches('>');
        let replaced = inner
          .split(',')
          .map(str::trim)
          .map(|token| {
            placeholder_index(token)
              .and_then(|index| args.get(index))
              .cloned()
              .unwrap_or_else(|| token.to_string())
          })
          .join(", ");
        format!("<{replaced}>")
      })
      .into_owned()
  }
}

fn form_fields_doc(form_params: &[&ParamInfo]) -> String {
  let fields = form_params
    .iter()
    .map(|param| {
      let mut field = param.name.clone();
      if param.is_file {
        field.push_str(" (file)");
      }
      if param.is_required {
        field.push_str(" (required)");
      }
      field
    })
    .join(", ");
  format!("Form fields: {fields}")
}
