use crate::generator::{
  emitter::{
    EmitContext, GenFile,
    imports::{csharp_usings, resolve_imports, typescript_imports},
    layout::model_location,
    syntax::Language,
  },
  type_model::TypeMeta,
};

/// One file per declaration, importing every other declaration it uses.
pub(crate) fn emit_models(language: Language, metas: &[&TypeMeta], ctx: &EmitContext<'_>) -> Vec<GenFile> {
  metas.iter().map(|meta| emit_model(language, meta, ctx)).collect()
}

fn emit_model(language: Language, meta: &TypeMeta, ctx: &EmitContext<'_>) -> GenFile {
  let location = model_location(language, meta, ctx.root_namespace);
  let dependencies = resolve_imports(ctx.registry, &ctx.registry.dependencies_of(meta), Some(&meta.name));
  let declaration = language.formatter().generate_model(meta, ctx.registry);

  let mut content = ctx.header.comment();
  match language {
    Language::TypeScript => {
      let imports = typescript_imports(&dependencies, &location.directory);
      if !imports.is_empty() {
        content.push_str(&imports.join("\n"));
        content.push_str("\n\n");
      }
    }
    Language::CSharp => {
      let usings = csharp_usings(&dependencies, ctx.root_namespace, Some(&location.module));
      if !usings.is_empty() {
        content.push_str(&usings.join("\n"));
        content.push_str("\n\n");
      }
      content.push_str(&format!("namespace {};\n\n", location.module));
    }
  }
  content.push_str(&declaration);

  GenFile::builder()
    .relative_directory(location.directory)
    .file_name(location.file_name)
    .content(content)
    .build()
}
