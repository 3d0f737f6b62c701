
use serde_json::json;

use crate::generator::{
  document::SchemaDocument, metrics::GenerationStats, type_model::TypeMeta, type_registry::TypeRegistry,
};

pub(super) fn registry(schemas: serde_json::Value) -> TypeRegistry {
  let document: SchemaDocument =
    serde_json::from_value(json!({ "components": { "schemas": schemas } })).expect("valid document");
  TypeRegistry::build(&document, &mut GenerationStats::default())
}

pub(super) fn meta<'r>(registry: &'r TypeRegistry, name: &str) -> &'r TypeMeta {
  registry.by_name(name).expect("type registered")
}

pub(super) fn sample_registry() -> TypeRegistry {
  registry(json!({
    "Color": {
      "type": "integer",
      "description": "Paint color",
      "enum": [0, 1],
      "x-enumData": [
        { "name": "Red", "value": 0, "description": "Warm" },
        { "name": "Blue", "value": 1 }
      ]
    },
    "Status": { "type": "string", "enum": ["active", "on-hold"] },
    "Code": { "type": "string", "format": "uuid" },
    "Item": {
      "type": "object",
      "required": ["id", "item"],
      "properties": {
        "id": { "type": "integer", "format": "int64", "nullable": true },
        "name": { "type": "string", "nullable": true, "description": "Display name" },
        "code": { "$ref": "#/components/schemas/Code" },
        "color": { "$ref": "#/components/schemas/Color" },
        "tags": { "type": "array", "items": { "type": "string" } },
        "scores": { "type": "object", "additionalProperties": { "type": "number" } },
        "content-type": { "type": "string" },
        "item": { "type": "boolean" }
      }
    },
    "Node": {
      "type": "object",
      "properties": {
        "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
      }
    },
    "NS.PageList`1[[NS.Item, App]]": {
      "type": "object",
      "required": ["items"],
      "properties": {
        "items": { "type": "array", "items": { "$ref": "#/components/schemas/Item" } },
        "total": { "type": "integer" }
      }
    },
    "Tags": { "type": "array", "items": { "type": "string" } }
  }))
}

/// A generic instantiated with a primitive that its scalar members share.
pub(super) fn primitive_page_registry() -> TypeRegistry {
  registry(json!({
    "NS.PageList`1[[System.Int32, System.Private.CoreLib]]": {
      "type": "object",
      "required": ["items", "total"],
      "properties": {
        "items": { "type": "array", "items": { "type": "integer", "format": "int32" } },
        "total": { "type": "integer", "format": "int32" },
        "pageIndex": { "type": "integer", "format": "int32" }
      }
    }
  }))
}
