//! RxJS services: a regenerated `<tag>.base.service.ts` per tag plus a
//! write-once subclass meant for hand edits.

use crate::generator::{
  emitter::{
    ClientEmitter, EmitContext, GenFile, OverwritePolicy, TagGroups,
    function_builder::{FunctionBuilder, FunctionParts},
    imports::{referenced_type_names, resolve_imports, typescript_imports},
    layout::{TS_SERVICES_DIR, relative_module},
    syntax::{Language, typescript_method},
  },
  naming::identifiers::{to_file_stem, to_type_name},
  type_model::RequestFunction,
};

const RUNTIME_MODULE: &str = "services/base.service";

const BASE_SERVICE_TS: &str = r"import { Observable, from } from 'rxjs';

export interface BaseServiceOptions {
  baseUrl?: string;
  headers?: Record<string, string>;
}

export abstract class BaseService {
  constructor(protected readonly options: BaseServiceOptions = {}) {}

  protected request<T>(method: string, url: string, data?: unknown): Observable<T> {
    return from(
      this.send(method, url, data).then(async (response) => {
        const text = await response.text();
        return (text ? JSON.parse(text) : undefined) as T;
      }),
    );
  }

  protected downloadFile(method: string, url: string, data?: unknown): Observable<Blob> {
    return from(this.send(method, url, data).then((response) => response.blob()));
  }

  private async send(method: string, url: string, data?: unknown): Promise<Response> {
    const isForm = data instanceof FormData;
    const hasBody = data !== undefined && data !== null;
    const headers: Record<string, string> = { ...this.options.headers };
    if (hasBody && !isForm) {
      headers['Content-Type'] = 'application/json';
    }
    const response = await fetch(`${this.options.baseUrl ?? ''}${url}`, {
      method,
      headers,
      body: !hasBody ? undefined : isForm ? data : JSON.stringify(data),
    });
    if (!response.ok) {
      throw new Error(`${method} ${url} failed with status ${response.status}`);
    }
    return response;
  }
}
";

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ReactiveEmitter;

impl ClientEmitter for ReactiveEmitter {
  fn language(&self) -> Language {
    Language::TypeScript
  }

  fn emit_services(&self, groups: &TagGroups<'_>, ctx: &EmitContext<'_>) -> Vec<GenFile> {
    let mut files = vec![];
    for (tag, functions) in groups {
      files.push(base_service(tag, functions, ctx));
      files.push(derived_service(tag));
    }
    files.push(
      GenFile::builder()
        .relative_directory(TS_SERVICES_DIR)
        .file_name("base.service.ts")
        .content(BASE_SERVICE_TS)
        .overwrite_policy(OverwritePolicy::WriteOnce)
        .build(),
    );
    files
  }
}

fn base_service(tag: &str, functions: &[&RequestFunction], ctx: &EmitContext<'_>) -> GenFile {
  let directory = format!("{TS_SERVICES_DIR}/base");
  let class_name = format!("{}BaseService", to_type_name(tag));

  let imports = resolve_imports(ctx.registry, &referenced_type_names(functions.iter().copied()), None);
  let mut content = ctx.header.comment();
  content.push_str("import { Observable } from 'rxjs';\n");
  content.push_str(&format!(
    "import {{ BaseService }} from '{}';\n",
    relative_module(&directory, RUNTIME_MODULE)
  ));
  for line in typescript_imports(&imports, &directory) {
    content.push_str(&line);
    content.push('\n');
  }

  content.push_str(&format!("\nexport abstract class {class_name} extends BaseService {{\n"));
  let mut builder = FunctionBuilder::new(ctx.registry, Language::TypeScript);
  let methods = functions
    .iter()
    .map(|function| render_method(function, &builder.build_function_common(function, false)))
    .collect::<Vec<_>>();
  content.push_str(&methods.join("\n"));
  content.push_str("}\n");

  GenFile::builder()
    .relative_directory(directory)
    .file_name(format!("{}.base.service.ts", to_file_stem(tag)))
    .content(content)
    .build()
}

fn derived_service(tag: &str) -> GenFile {
  let type_name = to_type_name(tag);
  let stem = to_file_stem(tag);
  let content = format!(
    "import {{ {type_name}BaseService }} from './base/{stem}.base.service';\n\n\
     export class {type_name}Service extends {type_name}BaseService {{}}\n"
  );
  GenFile::builder()
    .relative_directory(TS_SERVICES_DIR)
    .file_name(format!("{stem}.service.ts"))
    .content(content)
    .overwrite_policy(OverwritePolicy::WriteOnce)
    .build()
}

fn render_method(function: &RequestFunction, parts: &FunctionParts) -> String {
  let method = function.method.as_str();
  let (return_type, call) = if parts.is_download {
    (
      "Observable<Blob>".to_string(),
      format!("this.downloadFile('{method}', `{}`{})", parts.path, parts.data_arg_suffix),
    )
  } else {
    let response = parts.response_type.as_deref().unwrap_or("void");
    (
      format!("Observable<{response}>"),
      format!(
        "this.request<{response}>('{method}', `{}`{})",
        parts.path, parts.data_arg_suffix
      ),
    )
  };
  typescript_method(&parts.comment, &parts.name, &parts.params_signature, &return_type, &call)
}
