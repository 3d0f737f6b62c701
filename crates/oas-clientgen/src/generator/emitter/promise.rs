//! Promise services: one regenerated class per tag over a write-once `request.ts`.

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

const RUNTIME_MODULE: &str = "request";

const REQUEST_TS: &str = r"export interface RequestOptions {
  baseUrl?: string;
  headers?: Record<string, string>;
  signal?: AbortSignal;
}

export const defaultRequestOptions: RequestOptions = {};

export async function request<T>(
  method: string,
  url: string,
  data?: unknown,
  extOptions?: RequestOptions,
): Promise<T> {
  const response = await send(method, url, data, extOptions);
  const text = await response.text();
  return (text ? JSON.parse(text) : undefined) as T;
}

export async function download(
  method: string,
  url: string,
  data?: unknown,
  extOptions?: RequestOptions,
): Promise<Blob> {
  const response = await send(method, url, data, extOptions);
  return response.blob();
}

async function send(method: string, url: string, data?: unknown, extOptions?: RequestOptions): Promise<Response> {
  const options = { ...defaultRequestOptions, ...extOptions };
  const isForm = data instanceof FormData;
  const hasBody = data !== undefined && data !== null;
  const headers: Record<string, string> = { ...options.headers };
  if (hasBody && !isForm) {
    headers['Content-Type'] = 'application/json';
  }
  const response = await fetch(`${options.baseUrl ?? ''}${url}`, {
    method,
    headers,
    signal: options.signal,
    body: !hasBody ? undefined : isForm ? data : JSON.stringify(data),
  });
  if (!response.ok) {
    throw new Error(`${method} ${url} failed with status ${response.status}`);
  }
  return response;
}
";

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PromiseEmitter;

impl ClientEmitter for PromiseEmitter {
  fn language(&self) -> Language {
    Language::TypeScript
  }

  fn emit_services(&self, groups: &TagGroups<'_>, ctx: &EmitContext<'_>) -> Vec<GenFile> {
    let mut files = groups
      .iter()
      .map(|(tag, functions)| service(tag, functions, ctx))
      .collect::<Vec<_>>();
    files.push(
      GenFile::builder()
        .file_name("request.ts")
        .content(REQUEST_TS)
        .overwrite_policy(OverwritePolicy::WriteOnce)
        .build(),
    );
    files
  }
}

fn service(tag: &str, functions: &[&RequestFunction], ctx: &EmitContext<'_>) -> GenFile {
  let mut builder = FunctionBuilder::new(ctx.registry, Language::TypeScript);
  let methods = functions
    .iter()
    .map(|function| (*function, builder.build_function_common(function, true)))
    .collect::<Vec<_>>();

  let mut helpers = vec![];
  if methods.iter().any(|(_, parts)| parts.is_download) {
    helpers.push("download");
  }
  if methods.iter().any(|(_, parts)| !parts.is_download) {
    helpers.push("request");
  }
  helpers.push("RequestOptions");

  let imports = resolve_imports(ctx.registry, &referenced_type_names(functions.iter().copied()), None);
  let mut content = ctx.header.comment();
  content.push_str(&format!(
    "import {{ {} }} from '{}';\n",
    helpers.join(", "),
    relative_module(TS_SERVICES_DIR, RUNTIME_MODULE)
  ));
  for line in typescript_imports(&imports, TS_SERVICES_DIR) {
    content.push_str(&line);
    content.push('\n');
  }

  content.push_str(&format!("\nexport class {}Service {{\n", to_type_name(tag)));
  let rendered = methods
    .iter()
    .map(|(function, parts)| render_method(function, parts))
    .collect::<Vec<_>>();
  content.push_str(&rendered.join("\n"));
  content.push_str("}\n");

  GenFile::builder()
    .relative_directory(TS_SERVICES_DIR)
    .file_name(format!("{}.service.ts", to_file_stem(tag)))
    .content(content)
    .build()
}

fn render_method(function: &RequestFunction, parts: &FunctionParts) -> String {
  let method = function.method.as_str();
  let (return_type, call) = if parts.is_download {
    (
      "Promise<Blob>".to_string(),
      format!("download('{method}', `{}`{})", parts.path, parts.data_arg_suffix),
    )
  } else {
    let response = parts.response_type.as_deref().unwrap_or("void");
    (
      format!("Promise<{response}>"),
      format!("request<{response}>('{method}', `{}`{})", parts.path, parts.data_arg_suffix),
    )
  };
  typescript_method(&parts.comment, &parts.name, &parts.params_signature, &return_type, &call)
}
