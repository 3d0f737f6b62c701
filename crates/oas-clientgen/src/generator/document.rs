//! Lenient serde model of an OpenAPI 3.0/3.1 document.
//!
//! Only the parts the generator reads are modelled. Unknown keys are ignored so
//! documents produced by real-world tooling (with vendor extensions, examples,
//! security schemes and so on) deserialize without complaint.

use http::Method;
use indexmap::IndexMap;
use mediatype::MediaType;
use serde::Deserialize;
use serde_json::Value;

pub(crate) const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub(crate) const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";
pub(crate) const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";
pub(crate) const RESPONSE_REF_PREFIX: &str = "#/components/responses/";

/// Upper bound on `$ref` chains followed by [`SchemaDocument::resolve`].
const MAX_REF_HOPS: usize = 16;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDocument {
  #[serde(default)]
  pub info: Info,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
  #[serde(default)]
  pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, SchemaNode>,
  #[serde(default)]
  pub parameters: IndexMap<String, Parameter>,
  #[serde(default)]
  pub request_bodies: IndexMap<String, RequestBody>,
  #[serde(default)]
  pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
  #[serde(default)]
  pub parameters: Vec<Parameter>,
  pub get: Option<Operation>,
  pub put: Option<Operation>,
  pub post: Option<Operation>,
  pub delete: Option<Operation>,
  pub options: Option<Operation>,
  pub head: Option<Operation>,
  pub patch: Option<Operation>,
  pub trace: Option<Operation>,
}

impl PathItem {
  /// Declared operations in a fixed method order.
  pub fn methods(&self) -> impl Iterator<Item = (Method, &Operation)> {
    [
      (Method::GET, self.get.as_ref()),
      (Method::PUT, self.put.as_ref()),
      (Method::POST, self.post.as_ref()),
      (Method::DELETE, self.delete.as_ref()),
      (Method::OPTIONS, self.options.as_ref()),
      (Method::HEAD, self.head.as_ref()),
      (Method::PATCH, self.patch.as_ref()),
      (Method::TRACE, self.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.map(|op| (method, op)))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub parameters: Vec<Parameter>,
  pub request_body: Option<RequestBody>,
  #[serde(default)]
  pub responses: IndexMap<String, Response>,
  #[serde(default)]
  pub deprecated: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(default)]
  pub name: String,
  #[serde(rename = "in", default)]
  pub location: String,
  #[serde(default)]
  pub required: bool,
  pub description: Option<String>,
  pub schema: Option<SchemaNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
  #[serde(default)]
  pub required: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaTypeObject {
  pub schema: Option<SchemaNode>,
}

/// `type` is a single string in 3.0 and may be a list (including `"null"`) in 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaTypeSet {
  Single(String),
  Multiple(Vec<String>),
}

impl SchemaTypeSet {
  /// The first non-null type name.
  pub fn primary(&self) -> Option<&str> {
    match self {
      Self::Single(name) => Some(name.as_str()).filter(|n| *n != "null"),
      Self::Multiple(names) => names.iter().map(String::as_str).find(|n| *n != "null"),
    }
  }

  pub fn includes_null(&self) -> bool {
    match self {
      Self::Single(name) => name == "null",
      Self::Multiple(names) => names.iter().any(|n| n == "null"),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
  Flag(bool),
  Schema(Box<SchemaNode>),
}

/// One entry of the `x-enumData` extension: an explicit name/value/description triple.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumDataEntry {
  pub name: String,
  pub value: Value,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(rename = "type")]
  pub schema_type: Option<SchemaTypeSet>,
  pub format: Option<String>,
  pub nullable: Option<bool>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub items: Option<Box<SchemaNode>>,
  #[serde(default)]
  pub properties: IndexMap<String, SchemaNode>,
  #[serde(default)]
  pub required: Vec<String>,
  pub additional_properties: Option<AdditionalProperties>,
  #[serde(default)]
  pub all_of: Vec<SchemaNode>,
  #[serde(default)]
  pub one_of: Vec<SchemaNode>,
  #[serde(default)]
  pub any_of: Vec<SchemaNode>,
  #[serde(rename = "enum", default)]
  pub enum_values: Vec<Value>,
  #[serde(rename = "x-enumData", default)]
  pub enum_data: Vec<EnumDataEntry>,
  #[serde(rename = "x-enumNames", default)]
  pub enum_names: Vec<String>,
}

impl SchemaNode {
  pub fn primary_type(&self) -> Option<&str> {
    self.schema_type.as_ref().and_then(SchemaTypeSet::primary)
  }

  pub fn is_array(&self) -> bool {
    self.primary_type() == Some("array")
  }

  pub fn is_nullable(&self) -> bool {
    self.nullable.unwrap_or(false) || self.schema_type.as_ref().is_some_and(SchemaTypeSet::includes_null)
  }

  pub fn is_enum(&self) -> bool {
    !self.enum_data.is_empty() || !self.enum_values.is_empty()
  }

  /// The component key this node points at, if it is an internal schema reference.
  pub fn ref_key(&self) -> Option<String> {
    self.reference.as_deref().and_then(parse_schema_ref_path)
  }

  /// A free-form map: no declared properties and an `additionalProperties` value type.
  pub fn is_dictionary(&self) -> bool {
    self.properties.is_empty()
      && matches!(
        self.additional_properties,
        Some(AdditionalProperties::Schema(_) | AdditionalProperties::Flag(true))
      )
  }

  pub fn dictionary_value(&self) -> Option<&SchemaNode> {
    match &self.additional_properties {
      Some(AdditionalProperties::Schema(schema)) => Some(schema),
      _ => None,
    }
  }

  /// Unwraps the `allOf: [{ $ref }]` / `oneOf: [{ $ref }]` encoding used for nullable references.
  pub fn single_wrapped_ref(&self) -> Option<&SchemaNode> {
    if self.reference.is_some() || !self.properties.is_empty() {
      return None;
    }
    [&self.all_of, &self.one_of, &self.any_of]
      .into_iter()
      .find(|variants| variants.len() == 1)
      .and_then(|variants| variants.first())
      .filter(|variant| variant.reference.is_some())
  }
}

impl SchemaDocument {
  pub fn schema(&self, key: &str) -> Option<&SchemaNode> {
    self.components.schemas.get(key)
  }

  /// Follows `$ref` links until a concrete node is reached. Dangling or cyclic
  /// chains stop at the last node that could be resolved.
  pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> &'a SchemaNode {
    let mut current = node;
    for _ in 0..MAX_REF_HOPS {
      let Some(target) = current.ref_key().and_then(|key| self.schema(&key)) else {
        break;
      };
      current = target;
    }
    current
  }

  /// Resolves a `#/components/parameters/...` reference; inline parameters are returned as is.
  pub fn parameter<'a>(&'a self, parameter: &'a Parameter) -> Option<&'a Parameter> {
    match parameter.reference.as_deref() {
      None => Some(parameter),
      Some(reference) => reference
        .strip_prefix(PARAMETER_REF_PREFIX)
        .and_then(|key| self.components.parameters.get(key)),
    }
  }

  /// Resolves a `#/components/requestBodies/...` reference; inline bodies are returned as is.
  pub fn request_body<'a>(&'a self, body: &'a RequestBody) -> Option<&'a RequestBody> {
    match body.reference.as_deref() {
      None => Some(body),
      Some(reference) => reference
        .strip_prefix(REQUEST_BODY_REF_PREFIX)
        .and_then(|key| self.components.request_bodies.get(key)),
    }
  }

  /// Resolves a `#/components/responses/...` reference; inline responses are returned as is.
  pub fn response<'a>(&'a self, response: &'a Response) -> Option<&'a Response> {
    match response.reference.as_deref() {
      None => Some(response),
      Some(reference) => reference
        .strip_prefix(RESPONSE_REF_PREFIX)
        .and_then(|key| self.components.responses.get(key)),
    }
  }

  /// Every `(path, method, path item, operation)` in document order.
  pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &PathItem, &Operation)> {
    self.paths.iter().flat_map(|(path, item)| {
      item
        .methods()
        .map(move |(method, operation)| (path.as_str(), method, item, operation))
    })
  }
}

/// Extracts the component key from a `#/components/schemas/...` pointer, undoing
/// JSON Pointer escapes.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  let key = ref_path.strip_prefix(SCHEMA_REF_PREFIX)?;
  if key.is_empty() {
    return None;
  }
  Some(key.replace("~1", "/").replace("~0", "~"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentCategory {
  #[default]
  Json,
  FormUrlEncoded,
  Multipart,
  Text,
  Binary,
}

impl ContentCategory {
  #[must_use]
  pub fn from_content_type(content_type: &str) -> Self {
    let Some(media) = MediaType::parse(content_type).ok() else {
      return Self::Json;
    };

    let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);

    match (media.ty.as_str(), media.subty.as_str(), suffix) {
      ("multipart", _, _) => Self::Multipart,
      ("application", "x-www-form-urlencoded", _) => Self::FormUrlEncoded,
      ("application", "json", _) | (_, _, Some("json")) => Self::Json,
      ("image" | "audio" | "video", _, _) | ("application", "pdf" | "octet-stream" | "zip", _) => Self::Binary,
      ("text", _, _) => Self::Text,
      _ => Self::Json,
    }
  }

  pub fn is_form(self) -> bool {
    matches!(self, Self::Multipart | Self::FormUrlEncoded)
  }
}
