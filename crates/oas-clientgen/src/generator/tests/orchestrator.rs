use serde_json::json;

use super::support::{document, shop_document};
use crate::generator::{
  GeneratorConfig,
  emitter::{ClientVariant, GenFile},
  orchestrator::{Orchestrator, VariantOutput},
};

fn output(outputs: &[VariantOutput], variant: ClientVariant) -> &[GenFile] {
  &outputs
    .iter()
    .find(|output| output.variant == variant)
    .unwrap_or_else(|| panic!("no output for {variant}"))
    .files
}

fn file<'f>(files: &'f [GenFile], relative_path: &str) -> Option<&'f GenFile> {
  files
    .iter()
    .find(|file| file.relative_path() == std::path::Path::new(relative_path))
}

fn color_and_item_document() -> crate::generator::document::SchemaDocument {
  document(json!({
    "info": { "title": "Catalog", "version": "1" },
    "paths": { "/items/{id}": { "get": {
      "operationId": "Items_GetItem",
      "tags": ["Items"],
      "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
      "responses": { "200": { "content": { "application/json": {
        "schema": { "$ref": "#/components/schemas/Item" }
      } } } }
    } } },
    "components": { "schemas": {
      "Color": { "type": "string", "enum": ["Red", "Green"] },
      "Item": {
        "type": "object",
        "properties": { "color": { "$ref": "#/components/schemas/Color" } }
      }
    } }
  }))
}

#[test]
fn test_every_variant_renders_the_path_operation() {
  let orchestrator = Orchestrator::new(color_and_item_document(), GeneratorConfig::default(), "catalog.json");
  let (outputs, stats) = orchestrator.generate();

  assert_eq!(
    outputs.iter().map(|output| output.variant).collect::<Vec<_>>(),
    [ClientVariant::Reactive, ClientVariant::Promise, ClientVariant::CSharp]
  );

  let reactive = file(output(&outputs, ClientVariant::Reactive), "services/base/items.base.service.ts")
    .expect("reactive service");
  assert!(reactive.content.contains("getItem(id: string): Observable<Item> {"));

  let promise = file(output(&outputs, ClientVariant::Promise), "services/items.service.ts").expect("promise service");
  assert!(promise.content.contains("getItem(id: string, extOptions?: RequestOptions): Promise<Item> {"));

  let csharp = file(output(&outputs, ClientVariant::CSharp), "Services/ItemsService.cs").expect("csharp service");
  assert!(csharp.content.contains("public Task<Item> GetItemAsync(string id)"));

  let item = file(output(&outputs, ClientVariant::Reactive), "models/item.ts").expect("item model");
  assert!(item.content.contains("import { Color } from './enums/color';"));
  assert!(file(output(&outputs, ClientVariant::Reactive), "models/enums/color.ts").is_some());
  assert!(file(output(&outputs, ClientVariant::CSharp), "Models/Enums/Color.cs").is_some());

  assert_eq!(stats.operations_converted, 1);
  assert_eq!(stats.services_emitted, 3);
  assert_eq!(stats.models_emitted, 6);
  assert!(stats.warnings.is_empty(), "{:?}", stats.warnings);
}

#[test]
fn test_generic_response_imports_its_argument() {
  let orchestrator = Orchestrator::new(shop_document(), GeneratorConfig::default(), "openapi.json");
  let (outputs, _) = orchestrator.generate();
  let files = output(&outputs, ClientVariant::Promise);

  let service = file(files, "services/items.service.ts").expect("items service");
  assert!(service.content.contains("Promise<PageList<ItemDto>>"));
  assert!(service.content.contains("import { ItemDto } from '../models/item-dto';"));
  assert!(service.content.contains("import { PageList } from '../models/page-list';"));

  for file in files {
    assert!(!file.content.contains("PageList`1"), "{}", file.file_name);
  }
}

#[test]
fn test_primitive_generic_instantiation_keeps_scalar_members() {
  let ints = "NS.PageList`1[[System.Int32, System.Private.CoreLib]]";
  let items = "NS.PageList`1[[NS.Item, App]]";
  let page = |item: serde_json::Value| {
    json!({
      "type": "object",
      "required": ["items", "total"],
      "properties": {
        "items": { "type": "array", "items": item },
        "total": { "type": "integer", "format": "int32" }
      }
    })
  };
  let response = |key: &str| {
    json!({ "200": { "content": { "application/json": {
      "schema": { "$ref": format!("#/components/schemas/{key}") }
    } } } })
  };
  let document = document(json!({
    "paths": {
      "/counts": { "get": { "operationId": "Stats_Counts", "tags": ["Stats"], "responses": response(ints) } },
      "/items": { "get": { "operationId": "Stats_Items", "tags": ["Stats"], "responses": response(items) } }
    },
    "components": { "schemas": {
      ints: page(json!({ "type": "integer", "format": "int32" })),
      items: page(json!({ "$ref": "#/components/schemas/NS.Item" })),
      "NS.Item": { "type": "object" }
    } }
  }));
  let config = GeneratorConfig::builder().variants(vec![ClientVariant::Promise]).build();
  let (outputs, _) = Orchestrator::new(document, config, "stats.json").generate();
  let files = output(&outputs, ClientVariant::Promise);

  let service = file(files, "services/stats.service.ts").expect("stats service");
  assert!(service.content.contains("Promise<PageList<number>>"), "{}", service.content);
  assert!(service.content.contains("Promise<PageList<Item>>"), "{}", service.content);

  let model = file(files, "models/page-list.ts").expect("page list model");
  assert!(model.content.contains("export interface PageList<T> {"));
  assert!(model.content.contains("  items: T[];\n"));
  assert!(model.content.contains("  total: number;\n"));
}

#[test]
fn test_upload_is_sent_as_form_data_without_query() {
  let orchestrator = Orchestrator::new(shop_document(), GeneratorConfig::default(), "openapi.json");
  let (outputs, _) = orchestrator.generate();

  let reactive = file(output(&outputs, ClientVariant::Reactive), "services/base/files.base.service.ts")
    .expect("files service");
  assert!(reactive.content.contains("upload(file: FormData): Observable<void> {"));
  assert!(reactive.content.contains("`/files`, file)"));
  assert!(!reactive.content.contains("/files?"));
}

#[test]
fn test_generation_is_deterministic() {
  let first = Orchestrator::new(shop_document(), GeneratorConfig::default(), "openapi.json").generate();
  let second = Orchestrator::new(shop_document(), GeneratorConfig::default(), "openapi.json").generate();
  assert_eq!(first, second);
}

#[test]
fn test_self_reference_has_no_self_import() {
  let document = document(json!({
    "paths": { "/nodes": { "get": {
      "operationId": "tree",
      "responses": { "200": { "content": { "application/json": {
        "schema": { "$ref": "#/components/schemas/Node" }
      } } } }
    } } },
    "components": { "schemas": { "Node": {
      "type": "object",
      "properties": {
        "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
      }
    } } }
  }));
  let config = GeneratorConfig::builder().variants(vec![ClientVariant::Promise]).build();
  let (outputs, stats) = Orchestrator::new(document, config, "nodes.json").generate();

  let node = file(output(&outputs, ClientVariant::Promise), "models/node.ts").expect("node model");
  assert!(!node.content.contains("import"));
  assert!(node.content.contains("children?: Node[];"));
  assert_eq!(stats.cycle_details, [vec!["Node".to_string()]]);
}

#[test]
fn test_required_nullable_property_is_not_nullable() {
  let config = GeneratorConfig::builder()
    .variants(vec![ClientVariant::Reactive, ClientVariant::CSharp])
    .build();
  let (outputs, _) = Orchestrator::new(shop_document(), config, "openapi.json").generate();

  let typescript = file(output(&outputs, ClientVariant::Reactive), "models/item.ts").expect("ts item");
  assert!(typescript.content.contains("  id: string;\n"));

  let csharp = file(output(&outputs, ClientVariant::CSharp), "Models/Item.cs").expect("cs item");
  assert!(!csharp.content.contains("string? Id"));
}

#[test]
fn test_only_reachable_models_unless_all_models() {
  let promise_only = || GeneratorConfig::builder().variants(vec![ClientVariant::Promise]);

  let (outputs, stats) = Orchestrator::new(shop_document(), promise_only().build(), "openapi.json").generate();
  let files = output(&outputs, ClientVariant::Promise);
  assert!(file(files, "models/unused.ts").is_none());
  assert!(file(files, "models/enums/color.ts").is_some());
  assert_eq!(stats.models_emitted, 4);

  let (outputs, stats) =
    Orchestrator::new(shop_document(), promise_only().all_models(true).build(), "openapi.json").generate();
  assert!(file(output(&outputs, ClientVariant::Promise), "models/unused.ts").is_some());
  assert_eq!(stats.models_emitted, 5);
}

#[test]
fn test_names_derive_from_title_unless_configured() {
  let orchestrator = Orchestrator::new(shop_document(), GeneratorConfig::default(), "openapi.json");
  assert_eq!(orchestrator.root_namespace(), "ShopApi");
  assert_eq!(orchestrator.client_name(), "ShopApiClient");

  let config = GeneratorConfig::builder()
    .root_namespace("Acme.Store")
    .client_name("store api")
    .variants(vec![ClientVariant::CSharp])
    .build();
  let orchestrator = Orchestrator::new(shop_document(), config, "openapi.json");
  assert_eq!(orchestrator.root_namespace(), "Acme.Store");
  assert_eq!(orchestrator.client_name(), "StoreApi");

  let (outputs, _) = orchestrator.generate();
  let files = output(&outputs, ClientVariant::CSharp);
  assert!(file(files, "StoreApi.cs").is_some());
  assert!(file(files, "Acme.Store.csproj").is_some());
  assert!(
    file(files, "Services/ItemsService.cs")
      .expect("items service")
      .content
      .contains("namespace Acme.Store.Services;")
  );

  let untitled = Orchestrator::new(document(json!({})), GeneratorConfig::default(), "empty.json");
  assert_eq!(untitled.root_namespace(), "ApiClient");
  assert_eq!(untitled.client_name(), "ApiClientClient");
}

#[test]
fn test_parse_warnings_are_recorded_once() {
  let document = || {
    document(json!({
      "paths": { "/x": { "get": {
        "operationId": "x",
        "responses": { "200": { "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Missing" }
        } } } }
      } } }
    }))
  };
  let single = GeneratorConfig::builder().variants(vec![ClientVariant::Promise]).build();
  let (_, one) = Orchestrator::new(document(), single, "x.json").generate();
  let (_, all) = Orchestrator::new(document(), GeneratorConfig::default(), "x.json").generate();

  assert!(!one.warnings.is_empty());
  assert_eq!(one.warnings, all.warnings);
  assert_eq!(all.operations_converted, 1);
}

#[test]
fn test_header_marks_regenerated_files_only() {
  let (outputs, _) = Orchestrator::new(shop_document(), GeneratorConfig::default(), "specs/shop.json").generate();
  let files = output(&outputs, ClientVariant::Reactive);

  let service = file(files, "services/base/items.base.service.ts").expect("base service");
  assert!(service.content.starts_with(
    "// <auto-generated>\n\
     //   AUTO-GENERATED CODE - DO NOT EDIT!\n\
     //   Shop API 1.2.0\n\
     //   Source: specs/shop.json\n"
  ));
  let derived = file(files, "services/items.service.ts").expect("derived service");
  assert!(!derived.content.contains("auto-generated"));
}
