//! Source-descriptor to target-language type mapping and model rendering.

pub(crate) mod csharp;
pub(crate) mod typescript;

#[cfg(test)]
mod tests;

use crate::generator::{
  descriptor::Descriptor,
  type_model::{Primitive, PropertyInfo, TypeMeta},
  type_registry::TypeRegistry,
};

pub(crate) trait TypeFormatter {
  fn primitive(&self, primitive: Primitive) -> &'static str;

  /// Fallback for empty or unmappable descriptors.
  fn untyped(&self) -> &'static str;

  fn list(&self, item: &str) -> String;

  fn dictionary(&self, value: &str) -> String;

  fn nullable(&self, text: &str) -> String;

  fn generic(&self, base: &str, args: &[String]) -> String {
    format!("{base}<{}>", args.join(", "))
  }

  /// Renders a declaration body: enum, alias or class, without imports.
  fn generate_model(&self, meta: &TypeMeta, registry: &TypeRegistry) -> String;

  fn format_descriptor(&self, descriptor: &Descriptor) -> String {
    if descriptor.is_empty() {
      return self.untyped().to_string();
    }
    if let Some(item) = descriptor.list_item() {
      return self.list(&self.format_descriptor(item));
    }
    if let Some(value) = descriptor.dictionary_value() {
      return self.dictionary(&self.format_descriptor(value));
    }
    if let Some(primitive) = descriptor.primitive() {
      return self.primitive(primitive).to_string();
    }
    if descriptor.name.is_empty() {
      return self.untyped().to_string();
    }
    if descriptor.args.is_empty() {
      return descriptor.name.clone();
    }
    let args = descriptor
      .args
      .iter()
      .map(|arg| self.format_descriptor(arg))
      .collect::<Vec<_>>();
    self.generic(&descriptor.name, &args)
  }

  /// Maps a source descriptor to target type text. `is_enum` marks the text
  /// as an enum type name; `is_list` wraps a bare item descriptor as a list.
  fn format_type(&self, source: &str, is_enum: bool, is_list: bool, is_nullable: bool) -> String {
    let descriptor = Descriptor::parse(source);
    let mut text = if is_enum && descriptor.args.is_empty() && !descriptor.name.is_empty() {
      descriptor.name.clone()
    } else {
      self.format_descriptor(&descriptor)
    };
    if is_list && descriptor.list_item().is_none() {
      text = self.list(&text);
    }
    if is_nullable { self.nullable(&text) } else { text }
  }

  /// Type text of a model property. Generic declarations already carry
  /// placeholders; a bare self-reference renders in its declared form.
  fn property_type(&self, meta: &TypeMeta, property: &PropertyInfo, registry: &TypeRegistry) -> String {
    let descriptor = Descriptor::parse(&property.source_type_text);
    let declared = Descriptor::parse(&meta.declared_name());
    let descriptor = descriptor.map_names(&mut |name| {
      if name == meta.name && meta.is_generic() {
        declared.clone()
      } else {
        Descriptor::named(name)
      }
    });
    let resolved = registry.resolve(&descriptor).descriptor;
    let text = self.format_descriptor(&resolved);
    if property.renders_nullable() { self.nullable(&text) } else { text }
  }
}
