//! Converts component schemas into [`TypeMeta`] declarations.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use strum::Display;

use crate::generator::{
  document::{SchemaDocument, SchemaNode},
  generic_name::{GenericName, parse_generic_name, placeholder},
  naming::identifiers::{ensure_unique, to_type_name},
  type_model::{EnumValue, Primitive, PropertyInfo, TypeMeta},
};

/// `allOf` parents followed before giving up on a schema.
const MAX_INHERITANCE_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SchemaError {
  #[strum(to_string = "inheritance chain of '{key}' is deeper than {limit} levels")]
  InheritanceTooDeep { key: String, limit: usize },
  #[strum(to_string = "enum '{key}' has a member value {value} that is neither an integer nor a string")]
  UnsupportedEnumValue { key: String, value: String },
}

impl std::error::Error for SchemaError {}

/// Identity of a schema key: display name, registry key and namespace bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemaKey {
  pub(crate) name: String,
  pub(crate) full_name: String,
  pub(crate) namespace: Option<String>,
  pub(crate) generic: Option<GenericName>,
}

impl SchemaKey {
  /// Keys that fail to parse as generic names fall back to their sanitized text.
  pub(crate) fn parse(raw_key: &str) -> Self {
    match parse_generic_name(raw_key) {
      Ok(parsed) if parsed.is_generic() => Self {
        name: parsed.type_name(),
        full_name: parsed.normalized_full_name(),
        namespace: parsed.namespace.clone(),
        generic: Some(parsed),
      },
      Ok(parsed) => Self {
        name: parsed.type_name(),
        full_name: raw_key.to_string(),
        namespace: parsed.namespace,
        generic: None,
      },
      Err(_) => Self {
        name: to_type_name(raw_key),
        full_name: raw_key.to_string(),
        namespace: None,
        generic: None,
      },
    }
  }
}

/// Source descriptor used wherever `raw_key` is referenced.
pub(crate) fn reference_descriptor(raw_key: &str) -> String {
  parse_generic_name(raw_key).map_or_else(|_| to_type_name(raw_key), |parsed| parsed.descriptor())
}

/// Type information of a property, parameter or body schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeShape {
  pub(crate) source: String,
  pub(crate) is_list: bool,
  pub(crate) is_enum: bool,
  pub(crate) is_nullable: bool,
  /// Component key of the referenced schema, looking through arrays and maps.
  pub(crate) ref_key: Option<String>,
}

impl TypeShape {
  fn primitive(primitive: Primitive, is_nullable: bool) -> Self {
    Self {
      source: primitive.to_string(),
      is_list: false,
      is_enum: false,
      is_nullable,
      ref_key: None,
    }
  }
}

pub(crate) struct SchemaParser<'a> {
  document: &'a SchemaDocument,
}

impl<'a> SchemaParser<'a> {
  pub(crate) fn new(document: &'a SchemaDocument) -> Self {
    Self { document }
  }

  pub(crate) fn parse_schema(&self, raw_key: &str, node: &SchemaNode) -> Result<TypeMeta, SchemaError> {
    let key = SchemaKey::parse(raw_key);
    let comment_summary = node.description.clone().or_else(|| node.title.clone());

    if node.is_enum() {
      return Ok(TypeMeta {
        name: key.name,
        full_name: key.full_name,
        raw_key: raw_key.to_string(),
        namespace_hint: key.namespace,
        is_enum: true,
        is_nullable: node.is_nullable(),
        properties: self.enum_members(raw_key, node)?,
        comment_summary,
        ..Default::default()
      });
    }

    let generic_params = key
      .generic
      .as_ref()
      .map(|generic| {
        (0..generic.arity)
          .map(|index| match generic.args.get(index) {
            Some(arg) => TypeMeta::stand_in(index, arg.descriptor()),
            None => TypeMeta::stand_in(index, placeholder(index)),
          })
          .collect::<Vec<_>>()
      })
      .unwrap_or_default();

    let mut meta = TypeMeta {
      name: key.name,
      full_name: key.full_name,
      raw_key: raw_key.to_string(),
      namespace_hint: key.namespace,
      is_nullable: node.is_nullable(),
      generic_params,
      comment_summary,
      ..Default::default()
    };

    if let Some(target) = node.single_wrapped_ref().or(node.reference.as_ref().map(|_| node)) {
      let shape = self.shape_of(target);
      meta.is_reference = true;
      meta.reference_name = target.ref_key();
      meta.alias_of = Some(shape.source);
      return Ok(meta);
    }

    if node.is_array() || node.is_dictionary() {
      let shape = self.shape_of(node);
      meta.is_list = shape.is_list;
      meta.alias_of = Some(shape.source);
      return Ok(meta);
    }

    if self.is_untyped_composition(node) {
      meta.alias_of = Some(Primitive::Object.to_string());
      return Ok(meta);
    }

    if node.properties.is_empty() && node.all_of.is_empty() && node.primary_type().is_some_and(|t| t != "object") {
      meta.alias_of = Some(Primitive::from_schema_type(node.primary_type(), node.format.as_deref()).to_string());
      return Ok(meta);
    }

    meta.properties = self.collect_properties(raw_key, node, 0)?.into_values().collect();
    Ok(meta)
  }

  /// Describes `node` as a source descriptor, unwrapping single-element
  /// `allOf`/`oneOf` reference wrappers and nested arrays or maps.
  pub(crate) fn shape_of(&self, node: &SchemaNode) -> TypeShape {
    let is_nullable = node.is_nullable();
    let target = node.single_wrapped_ref().unwrap_or(node);

    if target.reference.is_some() {
      let Some(key) = target.ref_key() else {
        return TypeShape::primitive(Primitive::Object, is_nullable);
      };
      let is_enum = self
        .document
        .schema(&key)
        .is_some_and(|schema| self.document.resolve(schema).is_enum());
      return TypeShape {
        source: reference_descriptor(&key),
        is_list: false,
        is_enum,
        is_nullable,
        ref_key: Some(key),
      };
    }

    if target.is_array() {
      let inner = target
        .items
        .as_deref()
        .map_or_else(|| TypeShape::primitive(Primitive::Object, false), |items| self.shape_of(items));
      return TypeShape {
        source: format!("List<{}>", inner.source),
        is_list: true,
        is_enum: inner.is_enum,
        is_nullable,
        ref_key: inner.ref_key,
      };
    }

    if target.is_dictionary() {
      let value = target
        .dictionary_value()
        .map_or_else(|| TypeShape::primitive(Primitive::Object, false), |value| self.shape_of(value));
      return TypeShape {
        source: format!("Dictionary<string, {}>", value.source),
        is_list: false,
        is_enum: false,
        is_nullable,
        ref_key: value.ref_key,
      };
    }

    if !target.properties.is_empty() || self.is_untyped_composition(target) {
      return TypeShape::primitive(Primitive::Object, is_nullable);
    }

    TypeShape::primitive(
      Primitive::from_schema_type(target.primary_type(), target.format.as_deref()),
      is_nullable,
    )
  }

  /// Properties of an inline or referenced object schema, such as a form body.
  pub(crate) fn object_properties(&self, node: &SchemaNode) -> Result<Vec<PropertyInfo>, SchemaError> {
    let key = node.ref_key().unwrap_or_default();
    let resolved = self.document.resolve(node);
    Ok(self.collect_properties(&key, resolved, 0)?.into_values().collect())
  }

  /// `oneOf`/`anyOf` unions and multi-variant compositions have no single target type.
  fn is_untyped_composition(&self, node: &SchemaNode) -> bool {
    node.one_of.len() > 1 || node.any_of.len() > 1 || (node.all_of.len() > 1 && !self.is_inheritance(node))
  }

  /// `allOf: [parent, own]` where the parent is a reference.
  fn is_inheritance(&self, node: &SchemaNode) -> bool {
    node.all_of.first().is_some_and(|parent| parent.reference.is_some())
  }

  /// Properties in declaration order: inherited first, then those of later
  /// `allOf` members, then the node's own. A redeclared name keeps its first
  /// position and takes the latest definition.
  fn collect_properties(
    &self,
    key: &str,
    node: &SchemaNode,
    depth: usize,
  ) -> Result<IndexMap<String, PropertyInfo>, SchemaError> {
    if depth > MAX_INHERITANCE_DEPTH {
      return Err(SchemaError::InheritanceTooDeep {
        key: key.to_string(),
        limit: MAX_INHERITANCE_DEPTH,
      });
    }

    let mut properties = IndexMap::new();

    if node.single_wrapped_ref().is_none() {
      for member in &node.all_of {
        let resolved = self.document.resolve(member);
        properties.extend(self.collect_properties(key, resolved, depth + 1)?);
      }
    }

    for (name, property) in &node.properties {
      properties.insert(name.clone(), self.property(name, property));
    }

    for name in &node.required {
      if let Some(property) = properties.get_mut(name) {
        property.is_required = true;
      }
    }

    Ok(properties)
  }

  fn property(&self, name: &str, node: &SchemaNode) -> PropertyInfo {
    let shape = self.shape_of(node);
    let is_navigation = shape.ref_key.is_some() && !shape.is_enum;
    let navigation_name = shape
      .ref_key
      .as_deref()
      .filter(|_| is_navigation)
      .map(|key| SchemaKey::parse(key).name);

    PropertyInfo {
      name: name.to_string(),
      source_type_text: shape.source,
      is_nullable: shape.is_nullable,
      is_required: false,
      is_enum: shape.is_enum,
      is_list: shape.is_list,
      is_navigation,
      navigation_name,
      comment_summary: node.description.clone(),
      enum_value: None,
    }
  }

  /// Members from `x-enumData` when present, otherwise from `enum` with names
  /// taken from `x-enumNames` or derived from the values.
  fn enum_members(&self, key: &str, node: &SchemaNode) -> Result<Vec<PropertyInfo>, SchemaError> {
    let unsupported = |value: &serde_json::Value| SchemaError::UnsupportedEnumValue {
      key: key.to_string(),
      value: value.to_string(),
    };

    let mut raw_members = vec![];
    if node.enum_data.is_empty() {
      for (index, value) in node.enum_values.iter().enumerate() {
        if value.is_null() {
          continue;
        }
        let enum_value = EnumValue::from_json(value).ok_or_else(|| unsupported(value))?;
        let name = node
          .enum_names
          .get(index)
          .map_or_else(|| member_name(&enum_value), |name| to_type_name(name));
        raw_members.push((name, enum_value, None));
      }
    } else {
      for entry in &node.enum_data {
        let enum_value = EnumValue::from_json(&entry.value).ok_or_else(|| unsupported(&entry.value))?;
        raw_members.push((to_type_name(&entry.name), enum_value, entry.description.clone()));
      }
    }

    let mut used = BTreeSet::new();
    let members = raw_members
      .into_iter()
      .map(|(name, enum_value, comment_summary)| {
        let name = ensure_unique(&name, &used);
        used.insert(name.clone());
        let source = match enum_value {
          EnumValue::Number(_) => Primitive::Int32,
          EnumValue::Text(_) => Primitive::String,
        };
        PropertyInfo {
          name,
          source_type_text: source.to_string(),
          is_required: true,
          comment_summary,
          enum_value: Some(enum_value),
          ..Default::default()
        }
      })
      .collect();
    Ok(members)
  }
}

fn member_name(value: &EnumValue) -> String {
  match value {
    EnumValue::Number(number) if *number < 0 => format!("ValueMinus{}", number.unsigned_abs()),
    EnumValue::Number(number) => format!("Value{number}"),
    EnumValue::Text(text) => to_type_name(text),
  }
}
