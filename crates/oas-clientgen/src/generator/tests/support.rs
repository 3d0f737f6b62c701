use serde_json::json;

use crate::generator::{
  document::SchemaDocument, emitter::syntax::Language, metrics::GenerationStats, operation_parser::OperationParser,
  type_model::RequestFunction, type_registry::TypeRegistry,
};

pub(crate) const PAGE_LIST_KEY: &str = "NS.PageList`1[[NS.ItemDto, App]]";

pub(crate) fn document(value: serde_json::Value) -> SchemaDocument {
  serde_json::from_value(value).expect("valid document")
}

/// A small catalog API covering path, query, JSON body, multipart upload,
/// download and a generic paged response.
pub(crate) fn shop_document() -> SchemaDocument {
  document(json!({
    "openapi": "3.0.1",
    "info": { "title": "Shop API", "version": "1.2.0" },
    "paths": {
      "/items/{id}": {
        "get": {
          "operationId": "Items_GetItem",
          "tags": ["Items"],
          "summary": "Fetch one item",
          "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
          "responses": { "200": { "description": "ok", "content": { "application/json": {
            "schema": { "$ref": "#/components/schemas/Item" }
          } } } }
        }
      },
      "/items": {
        "get": {
          "operationId": "Items_List",
          "tags": ["Items"],
          "parameters": [
            { "name": "page", "in": "query", "schema": { "type": "integer", "format": "int32" } },
            { "name": "search", "in": "query", "required": true, "description": "Free text filter", "schema": { "type": "string" } }
          ],
          "responses": { "200": { "description": "ok", "content": { "application/json": {
            "schema": { "$ref": format!("#/components/schemas/{PAGE_LIST_KEY}") }
          } } } }
        },
        "post": {
          "operationId": "Items_Create",
          "tags": ["Items"],
          "requestBody": { "required": true, "content": { "application/json": {
            "schema": { "$ref": "#/components/schemas/Item" }
          } } },
          "responses": { "201": { "description": "created", "content": { "application/json": {
            "schema": { "$ref": "#/components/schemas/Item" }
          } } } }
        }
      },
      "/files": {
        "post": {
          "operationId": "Files_Upload",
          "tags": ["Files"],
          "requestBody": { "content": { "multipart/form-data": { "schema": {
            "type": "object",
            "required": ["file"],
            "properties": {
              "file": { "type": "string", "format": "binary" },
              "note": { "type": "string" }
            }
          } } } },
          "responses": { "204": { "description": "stored" } }
        }
      },
      "/files/{name}": {
        "get": {
          "operationId": "Files_Download",
          "tags": ["Files"],
          "parameters": [{ "name": "name", "in": "path", "required": true, "schema": { "type": "string" } }],
          "responses": { "200": { "description": "ok", "content": { "application/octet-stream": {
            "schema": { "type": "string", "format": "binary" }
          } } } }
        }
      }
    },
    "components": {
      "schemas": {
        "Color": { "type": "string", "enum": ["Red", "Green"] },
        "Item": {
          "type": "object",
          "required": ["id"],
          "properties": {
            "id": { "type": "string", "nullable": true },
            "color": { "$ref": "#/components/schemas/Color" },
            "parent": { "$ref": "#/components/schemas/Item" }
          }
        },
        "NS.ItemDto": {
          "type": "object",
          "properties": { "name": { "type": "string" } }
        },
        PAGE_LIST_KEY: {
          "type": "object",
          "properties": {
            "items": { "type": "array", "items": { "$ref": "#/components/schemas/NS.ItemDto" } },
            "total": { "type": "integer", "format": "int32" }
          }
        },
        "Unused": { "type": "object", "properties": { "flag": { "type": "boolean" } } }
      }
    }
  }))
}

/// Registry and operations of `document` with type text for `language`.
pub(crate) fn parse_functions(document: &SchemaDocument, language: Language) -> (TypeRegistry, Vec<RequestFunction>) {
  let mut stats = GenerationStats::default();
  let registry = TypeRegistry::build(document, &mut stats);
  let functions = OperationParser::new(document, &registry, language.formatter()).parse_all(&mut stats);
  (registry, functions)
}

pub(crate) fn function<'f>(functions: &'f [RequestFunction], name: &str) -> &'f RequestFunction {
  functions
    .iter()
    .find(|function| function.name == name)
    .unwrap_or_else(|| panic!("no operation named {name}"))
}
