//! Intermediate representation consumed by every formatter and emitter.

use std::fmt;

use http::Method;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::generator::generic_name::placeholder;

/// Closed vocabulary of pre-mapping primitive descriptors.
///
/// Anything that does not parse into a `Primitive` is treated as a reference to
/// a named type (or a `List<..>` / `Dictionary<..>` / generic shape around one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Primitive {
  #[strum(serialize = "int32")]
  Int32,
  #[strum(serialize = "int64")]
  Int64,
  #[strum(serialize = "float")]
  Float,
  #[strum(serialize = "double")]
  Double,
  #[strum(serialize = "decimal")]
  Decimal,
  #[strum(serialize = "boolean")]
  Boolean,
  #[strum(serialize = "string")]
  String,
  #[strum(serialize = "date-time")]
  DateTime,
  #[strum(serialize = "date")]
  Date,
  #[strum(serialize = "time")]
  Time,
  #[strum(serialize = "uuid")]
  Uuid,
  #[strum(serialize = "binary")]
  Binary,
  #[strum(serialize = "byte")]
  Byte,
  #[strum(serialize = "object")]
  Object,
  #[strum(serialize = "void")]
  Void,
}

impl Primitive {
  /// Maps an OpenAPI `type`/`format` pair onto a descriptor.
  pub fn from_schema_type(schema_type: Option<&str>, format: Option<&str>) -> Self {
    match (schema_type, format) {
      (Some("integer"), Some("int64")) => Self::Int64,
      (Some("integer"), _) => Self::Int32,
      (Some("number"), Some("float")) => Self::Float,
      (Some("number"), Some("decimal")) => Self::Decimal,
      (Some("number"), _) => Self::Double,
      (Some("boolean"), _) => Self::Boolean,
      (Some("string"), Some("date-time")) => Self::DateTime,
      (Some("string"), Some("date")) => Self::Date,
      (Some("string"), Some("time")) => Self::Time,
      (Some("string"), Some("uuid")) => Self::Uuid,
      (Some("string"), Some("binary")) | (Some("file"), _) => Self::Binary,
      (Some("string"), Some("byte")) => Self::Byte,
      (Some("string"), _) => Self::String,
      _ => Self::Object,
    }
  }

  pub fn parse(descriptor: &str) -> Option<Self> {
    descriptor.trim().parse().ok()
  }

  pub fn is_primitive(descriptor: &str) -> bool {
    Self::parse(descriptor).is_some()
  }
}

/// Value carried by an enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValue {
  Number(i64),
  Text(String),
}

impl EnumValue {
  pub fn from_json(value: &Value) -> Option<Self> {
    match value {
      Value::Number(number) => number.as_i64().map(Self::Number),
      Value::String(text) => match text.parse::<i64>() {
        Ok(number) => Some(Self::Number(number)),
        Err(_) => Some(Self::Text(text.clone())),
      },
      Value::Bool(flag) => Some(Self::Number(i64::from(*flag))),
      _ => None,
    }
  }
}

impl fmt::Display for EnumValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(number) => write!(f, "{number}"),
      Self::Text(text) => write!(f, "{text}"),
    }
  }
}

/// One field of a model, one member of an enum, or one parameter shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
#[allow(clippy::struct_excessive_bools)]
pub struct PropertyInfo {
  #[builder(into)]
  pub name: String,
  #[builder(into, default)]
  pub source_type_text: String,
  #[builder(default)]
  pub is_nullable: bool,
  #[builder(default)]
  pub is_required: bool,
  #[builder(default)]
  pub is_enum: bool,
  #[builder(default)]
  pub is_list: bool,
  #[builder(default)]
  pub is_navigation: bool,
  #[builder(into)]
  pub navigation_name: Option<String>,
  #[builder(into)]
  pub comment_summary: Option<String>,
  pub enum_value: Option<EnumValue>,
}

impl PropertyInfo {
  /// Nullability as rendered: a required property is never nullable.
  pub fn renders_nullable(&self) -> bool {
    self.is_nullable && !self.is_required
  }
}

/// One named type (model class or enum) of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
#[allow(clippy::struct_excessive_bools)]
pub struct TypeMeta {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub full_name: String,
  #[builder(into, default)]
  pub raw_key: String,
  #[builder(into)]
  pub namespace_hint: Option<String>,
  #[builder(default)]
  pub is_enum: bool,
  #[builder(default)]
  pub is_list: bool,
  #[builder(default)]
  pub is_reference: bool,
  #[builder(default)]
  pub is_nullable: bool,
  #[builder(into)]
  pub reference_name: Option<String>,
  /// Descriptor of the aliased shape when the declaration is not an object.
  #[builder(into)]
  pub alias_of: Option<String>,
  #[builder(default)]
  pub properties: Vec<PropertyInfo>,
  /// Stand-ins named `T`, `T2`, ... whose `full_name` is the concrete argument
  /// descriptor they were extracted from.
  #[builder(default)]
  pub generic_params: Vec<TypeMeta>,
  #[builder(into)]
  pub comment_summary: Option<String>,
}

impl TypeMeta {
  pub fn stand_in(index: usize, argument_descriptor: impl Into<String>) -> Self {
    let argument_descriptor = argument_descriptor.into();
    Self {
      name: placeholder(index),
      is_reference: !Primitive::is_primitive(&argument_descriptor),
      full_name: argument_descriptor,
      ..Default::default()
    }
  }

  pub fn is_generic(&self) -> bool {
    !self.generic_params.is_empty()
  }

  /// The name as written in a declaration: `PageList<T>` for generics, the bare name otherwise.
  pub fn declared_name(&self) -> String {
    if self.generic_params.is_empty() {
      return self.name.clone();
    }
    let params = self.generic_params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    format!("{}<{}>", self.name, params.join(", "))
  }

  /// An alias to a bare primitive is inlined at every use site instead of emitted.
  pub fn is_primitive_alias(&self) -> bool {
    !self.is_enum && self.alias_of.as_deref().is_some_and(Primitive::is_primitive)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ParameterLocation {
  #[strum(serialize = "path")]
  Path,
  #[strum(serialize = "query")]
  Query,
  #[strum(serialize = "header")]
  Header,
  #[strum(serialize = "cookie")]
  Cookie,
  /// A field of a `multipart/form-data` or url-encoded request body.
  #[strum(serialize = "form")]
  Form,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParamInfo {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub source_type_text: String,
  #[builder(into)]
  pub type_text: String,
  #[builder(default)]
  pub is_required: bool,
  #[builder(default)]
  pub in_path: bool,
  pub location: ParameterLocation,
  #[builder(into)]
  pub description: Option<String>,
  #[builder(into)]
  pub ref_name: Option<String>,
  /// Binary form field or raw binary body, passed as the data argument.
  #[builder(default)]
  pub is_file: bool,
}

/// One schema operation, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct RequestFunction {
  #[builder(into)]
  pub name: String,
  pub method: Method,
  #[builder(into)]
  pub path: String,
  #[builder(into)]
  pub tag: Option<String>,
  #[builder(into)]
  pub summary: Option<String>,
  #[builder(into)]
  pub description: Option<String>,
  #[builder(into)]
  pub request_type_text: Option<String>,
  #[builder(into)]
  pub request_source_text: Option<String>,
  #[builder(into)]
  pub request_ref_name: Option<String>,
  #[builder(into)]
  pub response_type_text: Option<String>,
  #[builder(into)]
  pub response_source_text: Option<String>,
  #[builder(into)]
  pub response_ref_name: Option<String>,
  #[builder(default)]
  pub params: Vec<ParamInfo>,
  #[builder(default)]
  pub is_download: bool,
  #[builder(default)]
  pub deprecated: bool,
}

impl RequestFunction {
  pub fn file_param(&self) -> Option<&ParamInfo> {
    self.params.iter().find(|p| p.is_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_primitive_round_trip_through_descriptor() {
    for descriptor in ["int32", "int64", "date-time", "uuid", "binary", "object", "void"] {
      let primitive = Primitive::parse(descriptor).expect("known descriptor");
      assert_eq!(primitive.to_string(), descriptor);
    }
    assert_eq!(Primitive::parse("Item"), None);
    assert_eq!(Primitive::parse("List<int32>"), None);
  }

  #[test]
  fn test_primitive_from_schema_type() {
    assert_eq!(Primitive::from_schema_type(Some("integer"), Some("int64")), Primitive::Int64);
    assert_eq!(Primitive::from_schema_type(Some("integer"), None), Primitive::Int32);
    assert_eq!(Primitive::from_schema_type(Some("number"), None), Primitive::Double);
    assert_eq!(
      Primitive::from_schema_type(Some("string"), Some("date-time")),
      Primitive::DateTime
    );
    assert_eq!(Primitive::from_schema_type(Some("string"), Some("binary")), Primitive::Binary);
    assert_eq!(Primitive::from_schema_type(None, None), Primitive::Object);
  }

  #[test]
  fn test_enum_value_from_json() {
    assert_eq!(EnumValue::from_json(&serde_json::json!(3)), Some(EnumValue::Number(3)));
    assert_eq!(EnumValue::from_json(&serde_json::json!("7")), Some(EnumValue::Number(7)));
    assert_eq!(
      EnumValue::from_json(&serde_json::json!("active")),
      Some(EnumValue::Text("active".to_string()))
    );
    assert_eq!(EnumValue::from_json(&serde_json::json!(null)), None);
  }

  #[test]
  fn test_required_wins_over_nullable() {
    let property = PropertyInfo::builder()
      .name("id")
      .source_type_text("int32")
      .is_nullable(true)
      .is_required(true)
      .build();
    assert!(!property.renders_nullable());
  }

  #[test]
  fn test_declared_name() {
    let meta = TypeMeta::builder()
      .name("Pair")
      .full_name("Pair<T,T2>")
      .generic_params(vec![TypeMeta::stand_in(0, "Item"), TypeMeta::stand_in(1, "int32")])
      .build();
    assert_eq!(meta.declared_name(), "Pair<T, T2>");
    assert!(meta.generic_params[0].is_reference);
    assert!(!meta.generic_params[1].is_reference);
  }

  #[test]
  fn test_parameter_location_is_case_insensitive() {
    assert_eq!("PATH".parse::<ParameterLocation>().ok(), Some(ParameterLocation::Path));
    assert_eq!("Query".parse::<ParameterLocation>().ok(), Some(ParameterLocation::Query));
    assert!("body".parse::<ParameterLocation>().is_err());
  }
}
