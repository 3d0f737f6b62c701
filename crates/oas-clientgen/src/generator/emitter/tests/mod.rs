
use crate::generator::{
  emitter::{EmitContext, FileHeader, GenFile},
  type_registry::TypeRegistry,
};

pub(super) const ROOT_NAMESPACE: &str = "Shop";
pub(super) const CLIENT_NAME: &str = "ShopClient";

pub(super) fn header() -> FileHeader {
  FileHeader {
    title: "Shop API".to_string(),
    version: "1.2.0".to_string(),
    source: "openapi.json".to_string(),
  }
}

pub(super) fn context<'a>(registry: &'a TypeRegistry, header: &'a FileHeader) -> EmitContext<'a> {
  EmitContext {
    registry,
    header,
    root_namespace: ROOT_NAMESPACE,
    client_name: CLIENT_NAME,
  }
}

pub(super) fn find<'f>(files: &'f [GenFile], relative_path: &str) -> &'f GenFile {
  files
    .iter()
    .find(|file| file.relative_path() == std::path::Path::new(relative_path))
    .unwrap_or_else(|| {
      let paths = files.iter().map(GenFile::relative_path).collect::<Vec<_>>();
      panic!("{relative_path} not among {paths:?}")
    })
}
