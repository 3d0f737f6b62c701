//! Converts the document's operations into [`RequestFunction`]s.

use http::Method;
use indexmap::IndexMap;
use strum::Display;

use crate::generator::{
  descriptor::Descriptor,
  document::{ContentCategory, MediaTypeObject, Operation, Parameter, PathItem, SchemaDocument, SchemaNode},
  formatter::TypeFormatter,
  metrics::{GenerationStats, GenerationWarning},
  naming::operations::synthesize_function_name,
  path_template::extract_template_params,
  schema_parser::SchemaParser,
  type_model::{ParamInfo, ParameterLocation, Primitive, RequestFunction},
  type_registry::TypeRegistry,
};

/// Tag given to operations that declare none.
pub(crate) const DEFAULT_TAG: &str = "Default";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum OperationError {
  #[strum(to_string = "parameter reference '{reference}' cannot be resolved")]
  UnresolvedParameter { reference: String },
  #[strum(to_string = "a {location} parameter has no name")]
  UnnamedParameter { location: String },
}

impl std::error::Error for OperationError {}

/// Schema type information after registry resolution and formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypedSchema {
  source: String,
  type_text: String,
  ref_name: Option<String>,
}

pub(crate) struct OperationParser<'a, F: TypeFormatter + ?Sized> {
  document: &'a SchemaDocument,
  registry: &'a TypeRegistry,
  schemas: SchemaParser<'a>,
  formatter: &'a F,
}

impl<'a, F: TypeFormatter + ?Sized> OperationParser<'a, F> {
  pub(crate) fn new(document: &'a SchemaDocument, registry: &'a TypeRegistry, formatter: &'a F) -> Self {
    Self {
      document,
      registry,
      schemas: SchemaParser::new(document),
      formatter,
    }
  }

  /// Parses every operation; a failing operation is skipped and reported.
  pub(crate) fn parse_all(&self, stats: &mut GenerationStats) -> Vec<RequestFunction> {
    let mut functions = vec![];
    for (path, method, item, operation) in self.document.operations() {
      match self.parse_operation(path, &method, item, operation) {
        Ok((function, warnings)) => {
          stats.record_warnings(warnings);
          functions.push(function);
        }
        Err(error) => stats.record_warning(GenerationWarning::OperationConversionFailed {
          method: method.to_string(),
          path: path.to_string(),
          error: error.to_string(),
        }),
      }
    }
    stats.record_operations(&functions);
    functions
  }

  pub(crate) fn parse_operation(
    &self,
    path: &str,
    method: &Method,
    item: &PathItem,
    operation: &Operation,
  ) -> Result<(RequestFunction, Vec<GenerationWarning>), OperationError> {
    let name = operation
      .operation_id
      .clone()
      .filter(|id| !id.trim().is_empty())
      .unwrap_or_else(|| synthesize_function_name(method, path));
    let tag = operation
      .tags
      .first()
      .cloned()
      .unwrap_or_else(|| DEFAULT_TAG.to_string());

    let mut warnings = vec![];
    let mut params = self.parameters(&name, item, operation, &mut warnings)?;

    let mut request = None;
    if let Some(declared) = &operation.request_body {
      let context = format!("{name} request body");
      match self.document.request_body(declared) {
        None => {
          warnings.push(GenerationWarning::UnresolvedReference {
            context,
            reference: declared.reference.clone().unwrap_or_default(),
          });
          request = Some(self.untyped());
        }
        Some(body) => {
          if let Some((content_type, media)) = body.content.first() {
            let category = ContentCategory::from_content_type(content_type);
            if category.is_form() || category == ContentCategory::Binary {
              params.extend(self.form_params(&name, category, media, body.required, &mut warnings));
            } else if let Some(schema) = &media.schema {
              request = Some(self.type_of(schema, &context, &mut warnings));
            }
          }
        }
      }
    }

    let (response, is_download) = self.response(&name, operation, &mut warnings);

    for placeholder in extract_template_params(path) {
      if !params.iter().any(|param| param.in_path && param.name == placeholder) {
        warnings.push(GenerationWarning::UnmatchedPathParameter {
          function: name.clone(),
          path: path.to_string(),
          parameter: placeholder.to_string(),
        });
      }
    }

    let function = RequestFunction::builder()
      .name(name)
      .method(method.clone())
      .path(path)
      .tag(tag)
      .maybe_summary(operation.summary.clone())
      .maybe_description(operation.description.clone())
      .maybe_request_type_text(request.as_ref().map(|r| r.type_text.clone()))
      .maybe_request_source_text(request.as_ref().map(|r| r.source.clone()))
      .maybe_request_ref_name(request.and_then(|r| r.ref_name))
      .maybe_response_type_text(response.as_ref().map(|r| r.type_text.clone()))
      .maybe_response_source_text(response.as_ref().map(|r| r.source.clone()))
      .maybe_response_ref_name(response.and_then(|r| r.ref_name))
      .params(params)
      .is_download(is_download)
      .deprecated(operation.deprecated)
      .build();

    Ok((function, warnings))
  }

  /// Path-level parameters merged with operation-level ones; a redeclared
  /// `(name, location)` pair keeps its position and takes the operation's definition.
  fn parameters(
    &self,
    function: &str,
    item: &PathItem,
    operation: &Operation,
    warnings: &mut Vec<GenerationWarning>,
  ) -> Result<Vec<ParamInfo>, OperationError> {
    let mut merged: IndexMap<(String, String), &Parameter> = IndexMap::new();
    for declared in item.parameters.iter().chain(&operation.parameters) {
      let parameter = self
        .document
        .parameter(declared)
        .ok_or_else(|| OperationError::UnresolvedParameter {
          reference: declared.reference.clone().unwrap_or_default(),
        })?;
      if parameter.name.trim().is_empty() {
        return Err(OperationError::UnnamedParameter {
          location: parameter.location.clone(),
        });
      }
      merged.insert(
        (parameter.name.clone(), parameter.location.to_ascii_lowercase()),
        parameter,
      );
    }

    let mut params = vec![];
    for parameter in merged.into_values() {
      let location = match parameter.location.parse::<ParameterLocation>() {
        Ok(location @ (ParameterLocation::Path | ParameterLocation::Query)) => location,
        _ => {
          warnings.push(GenerationWarning::UnsupportedParameter {
            function: function.to_string(),
            name: parameter.name.clone(),
            location: parameter.location.clone(),
          });
          continue;
        }
      };

      let typed = match &parameter.schema {
        Some(schema) => self.type_of(schema, &format!("{function} parameter '{}'", parameter.name), warnings),
        None => self.untyped(),
      };
      let in_path = location == ParameterLocation::Path;

      params.push(
        ParamInfo::builder()
          .name(parameter.name.clone())
          .source_type_text(typed.source)
          .type_text(typed.type_text)
          .is_required(parameter.required || in_path)
          .in_path(in_path)
          .location(location)
          .maybe_description(parameter.description.clone())
          .maybe_ref_name(typed.ref_name)
          .build(),
      );
    }
    Ok(params)
  }

  /// Form bodies become one `Form` parameter per field; a raw binary body
  /// becomes a single `file` parameter.
  fn form_params(
    &self,
    function: &str,
    category: ContentCategory,
    media: &MediaTypeObject,
    body_required: bool,
    warnings: &mut Vec<GenerationWarning>,
  ) -> Vec<ParamInfo> {
    let file_param = |name: &str, is_required: bool, description: Option<String>| {
      ParamInfo::builder()
        .name(name)
        .source_type_text(Primitive::Binary.to_string())
        .type_text(self.formatter.primitive(Primitive::Binary))
        .is_required(is_required)
        .location(ParameterLocation::Form)
        .maybe_description(description)
        .is_file(true)
        .build()
    };

    let Some(schema) = media.schema.as_ref().filter(|_| category.is_form()) else {
      return vec![file_param("file", body_required, None)];
    };

    let properties = match self.schemas.object_properties(schema) {
      Ok(properties) if !properties.is_empty() => properties,
      _ => return vec![file_param("file", body_required, None)],
    };

    properties
      .into_iter()
      .map(|property| {
        let context = format!("{function} form field '{}'", property.name);
        let typed = self.type_of_source(&property.source_type_text, None, &context, warnings);
        let descriptor = Descriptor::parse(&typed.source);
        let is_file = descriptor.primitive() == Some(Primitive::Binary)
          || descriptor.list_item().and_then(Descriptor::primitive) == Some(Primitive::Binary);
        if is_file {
          return file_param(&property.name, property.is_required, property.comment_summary);
        }
        ParamInfo::builder()
          .name(property.name)
          .source_type_text(typed.source)
          .type_text(typed.type_text)
          .is_required(property.is_required)
          .location(ParameterLocation::Form)
          .maybe_description(property.comment_summary)
          .build()
      })
      .collect()
  }

  /// The first 2xx response with content; binary payloads mark a download.
  /// A dangling response reference falls back to an untyped result.
  fn response(
    &self,
    function: &str,
    operation: &Operation,
    warnings: &mut Vec<GenerationWarning>,
  ) -> (Option<TypedSchema>, bool) {
    let mut content = None;
    for (_, declared) in operation.responses.iter().filter(|(status, _)| status.starts_with('2')) {
      let Some(response) = self.document.response(declared) else {
        warnings.push(GenerationWarning::UnresolvedReference {
          context: format!("{function} response"),
          reference: declared.reference.clone().unwrap_or_default(),
        });
        return (Some(self.untyped()), false);
      };
      if let Some(entry) = response.content.first() {
        content = Some(entry);
        break;
      }
    }
    let Some((content_type, media)) = content else {
      return (None, false);
    };

    let category = ContentCategory::from_content_type(content_type);
    let typed = match &media.schema {
      Some(schema) => self.type_of(schema, &format!("{function} response"), warnings),
      None if category == ContentCategory::Binary => self.type_of_source(&Primitive::Binary.to_string(), None, "", warnings),
      None => return (None, false),
    };

    let is_download =
      category == ContentCategory::Binary || Descriptor::parse(&typed.source).primitive() == Some(Primitive::Binary);
    if is_download {
      let binary = Primitive::Binary.to_string();
      return (Some(self.type_of_source(&binary, None, "", warnings)), true);
    }
    (Some(typed), false)
  }

  fn untyped(&self) -> TypedSchema {
    TypedSchema {
      source: Primitive::Object.to_string(),
      type_text: self.formatter.untyped().to_string(),
      ref_name: None,
    }
  }

  fn type_of(&self, schema: &SchemaNode, context: &str, warnings: &mut Vec<GenerationWarning>) -> TypedSchema {
    let shape = self.schemas.shape_of(schema);
    let top_level_ref = shape
      .ref_key
      .clone()
      .filter(|_| !shape.is_list && Descriptor::parse(&shape.source).dictionary_value().is_none());
    let mut typed = self.type_of_source(&shape.source, top_level_ref.as_deref(), context, warnings);
    typed.ref_name = shape.ref_key;
    typed
  }

  /// Resolves `source` through the registry. A top-level reference to a
  /// generic declaration keeps its declared `Name<T>` form; the concrete
  /// arguments are recovered from the raw ref name when rendering.
  fn type_of_source(
    &self,
    source: &str,
    top_level_ref: Option<&str>,
    context: &str,
    warnings: &mut Vec<GenerationWarning>,
  ) -> TypedSchema {
    let resolved = self.registry.resolve_descriptor(source);
    for reference in &resolved.unresolved {
      warnings.push(GenerationWarning::UnresolvedReference {
        context: context.to_string(),
        reference: reference.clone(),
      });
    }

    let declared = top_level_ref
      .and_then(|key| self.registry.by_raw_key(key))
      .filter(|meta| meta.is_generic())
      .map(|meta| Descriptor::parse(&meta.declared_name()));

    let type_text = match &declared {
      Some(declared) => self.formatter.format_descriptor(declared),
      None => self.formatter.format_descriptor(&resolved.descriptor),
    };

    TypedSchema {
      source: resolved.text(),
      type_text,
      ref_name: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::generator::formatter::{csharp::CSharpFormatter, typescript::TypeScriptFormatter};

  fn document(value: serde_json::Value) -> SchemaDocument {
    serde_json::from_value(value).expect("valid document")
  }

  fn parse_ts(document: &SchemaDocument) -> (Vec<RequestFunction>, GenerationStats) {
    let mut stats = GenerationStats::default();
    let registry = TypeRegistry::build(document, &mut stats);
    let functions = OperationParser::new(document, &registry, &TypeScriptFormatter).parse_all(&mut stats);
    (functions, stats)
  }

  #[test]
  fn test_path_parameter_and_response() {
    let document = document(json!({
      "paths": {
        "/items/{id}": {
          "get": {
            "operationId": "Items_GetItem",
            "tags": ["Items"],
            "summary": "Fetch one item",
            "parameters": [{ "name": "id", "in": "path", "schema": { "type": "string" } }],
            "responses": {
              "200": {
                "description": "ok",
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Item" } } }
              }
            }
          }
        }
      },
      "components": { "schemas": { "Item": { "type": "object" } } }
    }));
    let (functions, stats) = parse_ts(&document);
    assert!(stats.warnings.is_empty(), "{:?}", stats.warnings);
    let function = &functions[0];
    assert_eq!(function.name, "Items_GetItem");
    assert_eq!(function.tag.as_deref(), Some("Items"));
    assert_eq!(function.method, Method::GET);
    assert_eq!(function.response_type_text.as_deref(), Some("Item"));
    assert_eq!(function.response_ref_name.as_deref(), Some("Item"));
    assert_eq!(function.params.len(), 1);
    assert!(function.params[0].in_path);
    assert!(function.params[0].is_required);
    assert_eq!(function.params[0].type_text, "string");
    assert_eq!(stats.operations_converted, 1);
  }

  #[test]
  fn test_defaults_for_missing_id_and_tag() {
    let document = document(json!({
      "paths": { "/api/orders/{orderId}": { "delete": { "parameters": [
        { "name": "orderId", "in": "PATH", "required": true, "schema": { "type": "integer" } }
      ] } } }
    }));
    let (functions, _) = parse_ts(&document);
    assert_eq!(functions[0].name, "deleteOrdersByOrderId");
    assert_eq!(functions[0].tag.as_deref(), Some(DEFAULT_TAG));
    assert!(functions[0].params[0].in_path);
    assert_eq!(functions[0].response_type_text, None);
  }

  #[test]
  fn test_parameters_merge_and_skip_headers() {
    let document = document(json!({
      "paths": {
        "/items": {
          "parameters": [
            { "name": "page", "in": "query", "schema": { "type": "integer" } },
            { "name": "tenant", "in": "header", "schema": { "type": "string" } }
          ],
          "get": {
            "operationId": "list",
            "parameters": [
              { "name": "page", "in": "query", "required": true, "schema": { "type": "integer", "format": "int64" } },
              { "$ref": "#/components/parameters/Search" }
            ]
          }
        }
      },
      "components": {
        "parameters": { "Search": { "name": "q", "in": "query", "schema": { "type": "string" } } }
      }
    }));
    let (functions, stats) = parse_ts(&document);
    let params = &functions[0].params;
    let names = params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["page", "q"]);
    assert!(params[0].is_required);
    assert_eq!(params[0].source_type_text, "int64");
    assert!(matches!(
      stats.warnings.as_slice(),
      [GenerationWarning::UnsupportedParameter { .. }]
    ));
  }

  #[test]
  fn test_unresolvable_parameter_fails_only_that_operation() {
    let document = document(json!({
      "paths": {
        "/a": { "get": { "operationId": "broken", "parameters": [{ "$ref": "#/components/parameters/Missing" }] } },
        "/b": { "get": { "operationId": "fine" } }
      }
    }));
    let (functions, stats) = parse_ts(&document);
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name, "fine");
    assert!(stats.warnings[0].is_skipped_item());
  }

  #[test]
  fn test_unmatched_path_parameter_is_reported() {
    let document = document(json!({
      "paths": { "/items/{id}": { "get": { "operationId": "get" } } }
    }));
    let (functions, stats) = parse_ts(&document);
    assert_eq!(functions.len(), 1);
    assert!(matches!(
      stats.warnings.as_slice(),
      [GenerationWarning::UnmatchedPathParameter { parameter, .. }] if parameter == "id"
    ));
  }

  #[test]
  fn test_generic_response_keeps_declared_form() {
    let key = "NS.PageList`1[[NS.ItemDto, App]]";
    let document = document(json!({
      "paths": { "/items": { "get": {
        "operationId": "list",
        "responses": { "200": { "content": { "application/json": {
          "schema": { "$ref": format!("#/components/schemas/{key}") }
        } } } }
      } } },
      "components": { "schemas": {
        key: { "type": "object", "properties": {
          "items": { "type": "array", "items": { "$ref": "#/components/schemas/NS.ItemDto" } }
        } },
        "NS.ItemDto": { "type": "object" }
      } }
    }));
    let (functions, _) = parse_ts(&document);
    let function = &functions[0];
    assert_eq!(function.response_type_text.as_deref(), Some("PageList<T>"));
    assert_eq!(function.response_source_text.as_deref(), Some("PageList<ItemDto>"));
    assert_eq!(function.response_ref_name.as_deref(), Some(key));
  }

  #[test]
  fn test_multipart_body_is_exploded() {
    let document = document(json!({
      "paths": { "/files": { "post": {
        "operationId": "upload",
        "requestBody": { "content": { "multipart/form-data": { "schema": {
          "type": "object",
          "required": ["file"],
          "properties": {
            "file": { "type": "string", "format": "binary" },
            "note": { "type": "string" }
          }
        } } } }
      } } }
    }));
    let (functions, _) = parse_ts(&document);
    let function = &functions[0];
    assert_eq!(function.request_type_text, None);
    let file = function.file_param().expect("file param");
    assert_eq!(file.name, "file");
    assert!(file.is_required);
    assert_eq!(file.type_text, "Blob");
    assert_eq!(function.params[1].location, ParameterLocation::Form);
    assert!(!function.params[1].is_file);
  }

  #[test]
  fn test_binary_body_and_download() {
    let document = document(json!({
      "paths": { "/blobs": { "put": {
        "operationId": "replace",
        "requestBody": { "required": true, "content": { "application/octet-stream": {
          "schema": { "type": "string", "format": "binary" }
        } } },
        "responses": { "200": { "content": { "application/pdf": {
          "schema": { "type": "string", "format": "binary" }
        } } } }
      } } }
    }));
    let mut stats = GenerationStats::default();
    let registry = TypeRegistry::build(&document, &mut stats);
    let functions = OperationParser::new(&document, &registry, &CSharpFormatter).parse_all(&mut stats);
    let function = &functions[0];
    assert!(function.is_download);
    assert_eq!(function.response_type_text.as_deref(), Some("Stream"));
    let file = function.file_param().expect("file param");
    assert_eq!(file.name, "file");
    assert!(file.is_required);
  }

  #[test]
  fn test_component_body_and_response_references() {
    let document = document(json!({
      "paths": { "/items": { "post": {
        "operationId": "Items_Create",
        "tags": ["Items"],
        "requestBody": { "$ref": "#/components/requestBodies/ItemBody" },
        "responses": { "200": { "$ref": "#/components/responses/ItemResponse" } }
      } } },
      "components": {
        "schemas": { "Item": { "type": "object" } },
        "requestBodies": { "ItemBody": { "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Item" }
        } } } },
        "responses": { "ItemResponse": { "description": "ok", "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Item" }
        } } } }
      }
    }));
    let (functions, stats) = parse_ts(&document);
    assert!(stats.warnings.is_empty(), "{:?}", stats.warnings);
    let function = &functions[0];
    assert_eq!(function.request_type_text.as_deref(), Some("Item"));
    assert_eq!(function.request_ref_name.as_deref(), Some("Item"));
    assert_eq!(function.response_type_text.as_deref(), Some("Item"));
  }

  #[test]
  fn test_dangling_body_and_response_references_fall_back() {
    let document = document(json!({
      "paths": { "/items": { "post": {
        "operationId": "create",
        "requestBody": { "$ref": "#/components/requestBodies/Missing" },
        "responses": { "201": { "$ref": "#/components/responses/Gone" } }
      } } }
    }));
    let (functions, stats) = parse_ts(&document);
    let function = &functions[0];
    assert_eq!(function.request_type_text.as_deref(), Some("any"));
    assert_eq!(function.response_type_text.as_deref(), Some("any"));
    let references = stats
      .warnings
      .iter()
      .filter_map(|warning| match warning {
        GenerationWarning::UnresolvedReference { reference, .. } => Some(reference.as_str()),
        _ => None,
      })
      .collect::<Vec<_>>();
    assert_eq!(
      references,
      ["#/components/requestBodies/Missing", "#/components/responses/Gone"]
    );
  }

  #[test]
  fn test_unresolved_response_reference_falls_back() {
    let document = document(json!({
      "paths": { "/x": { "get": {
        "operationId": "x",
        "responses": { "200": { "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Missing" }
        } } } }
      } } }
    }));
    let (functions, stats) = parse_ts(&document);
    assert_eq!(functions[0].response_type_text.as_deref(), Some("any"));
    assert!(matches!(
      stats.warnings.as_slice(),
      [GenerationWarning::UnresolvedReference { reference, .. }] if reference == "Missing"
    ));
  }
}
