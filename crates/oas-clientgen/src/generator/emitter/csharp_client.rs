//! `HttpClient` services, an aggregating client class and the project scaffolding.

use http::Method;

use crate::generator::{
  emitter::{
    ClientEmitter, EmitContext, GenFile, OverwritePolicy, TagGroups,
    function_builder::{DataKind, FunctionBuilder, FunctionParts},
    imports::{csharp_usings, referenced_type_names, resolve_imports},
    layout::CS_SERVICES_DIR,
    syntax::Language,
  },
  naming::identifiers::to_type_name,
  type_model::RequestFunction,
};

const INDENT: &str = "    ";

const GLOBAL_USINGS: &str = "global using System.Net.Http;
global using System.Net.Http.Json;
global using System.Text.Json.Serialization;
";

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CSharpClientEmitter;

impl ClientEmitter for CSharpClientEmitter {
  fn language(&self) -> Language {
    Language::CSharp
  }

  fn emit_services(&self, groups: &TagGroups<'_>, ctx: &EmitContext<'_>) -> Vec<GenFile> {
    let mut files = groups
      .iter()
      .map(|(tag, functions)| service(tag, functions, ctx))
      .collect::<Vec<_>>();
    files.push(client(groups, ctx));
    files.push(base_service(ctx.root_namespace));
    files.push(
      GenFile::builder()
        .file_name(format!("{}.csproj", ctx.root_namespace))
        .content(project_file(ctx))
        .overwrite_policy(OverwritePolicy::WriteOnce)
        .build(),
    );
    files.push(
      GenFile::builder()
        .file_name("GlobalUsings.cs")
        .content(GLOBAL_USINGS)
        .overwrite_policy(OverwritePolicy::Merge)
        .build(),
    );
    files
  }
}

fn service(tag: &str, functions: &[&RequestFunction], ctx: &EmitContext<'_>) -> GenFile {
  let class_name = format!("{}Service", to_type_name(tag));
  let imports = resolve_imports(ctx.registry, &referenced_type_names(functions.iter().copied()), None);

  let mut content = ctx.header.comment();
  let usings = csharp_usings(&imports, ctx.root_namespace, None);
  if !usings.is_empty() {
    content.push_str(&usings.join("\n"));
    content.push_str("\n\n");
  }
  content.push_str(&format!("namespace {}.{CS_SERVICES_DIR};\n\n", ctx.root_namespace));
  content.push_str(&format!(
    "public partial class {class_name}(HttpClient httpClient) : BaseService(httpClient)\n{{\n"
  ));

  let mut builder = FunctionBuilder::new(ctx.registry, Language::CSharp);
  let methods = functions
    .iter()
    .map(|function| render_method(function, &builder.build_function_common(function, false)))
    .collect::<Vec<_>>();
  content.push_str(&methods.join("\n"));
  content.push_str("}\n");

  GenFile::builder()
    .relative_directory(CS_SERVICES_DIR)
    .file_name(format!("{class_name}.cs"))
    .content(content)
    .build()
}

fn http_method(method: &Method) -> String {
  to_type_name(&method.as_str().to_ascii_lowercase())
}

/// The `BaseService` helper call for one function.
fn call_expression(function: &RequestFunction, parts: &FunctionParts) -> String {
  let url = format!("$\"{}\"", parts.path);
  let verb = http_method(&function.method);
  let type_args = parts
    .response_type
    .as_deref()
    .map(|response| format!("<{response}>"))
    .unwrap_or_default();

  if parts.is_download {
    return format!("DownloadFileAsync(HttpMethod.{verb}, {url}{})", parts.data_arg_suffix);
  }

  match parts.data_kind {
    DataKind::Form if function.method == Method::POST => {
      format!("PostFormAsync{type_args}({url}{})", parts.data_arg_suffix)
    }
    DataKind::Form => format!("SendFormAsync{type_args}(HttpMethod.{verb}, {url}{})", parts.data_arg_suffix),
    DataKind::Json | DataKind::None if parts.response_type.is_none() => {
      format!("SendAsync(HttpMethod.{verb}, {url}{})", parts.data_arg_suffix)
    }
    DataKind::Json | DataKind::None => match function.method {
      Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE => {
        format!("{verb}JsonAsync{type_args}({url}{})", parts.data_arg_suffix)
      }
      _ => format!("SendJsonAsync{type_args}(HttpMethod.{verb}, {url}{})", parts.data_arg_suffix),
    },
  }
}

fn render_method(function: &RequestFunction, parts: &FunctionParts) -> String {
  let mut lines = parts
    .comment
    .iter()
    .map(|line| format!("{INDENT}{line}"))
    .collect::<Vec<_>>();
  if parts.deprecated {
    lines.push(format!("{INDENT}[Obsolete]"));
  }

  let return_type = match &parts.response_type {
    Some(response) => format!("Task<{response}>"),
    None => "Task".to_string(),
  };
  lines.push(format!(
    "{INDENT}public {return_type} {}({})",
    parts.name, parts.params_signature
  ));
  lines.push(format!("{INDENT}{{"));
  lines.push(format!("{INDENT}{INDENT}return {};", call_expression(function, parts)));
  lines.push(format!("{INDENT}}}"));
  lines.join("\n") + "\n"
}

/// One read-only service property per tag, all sharing the injected `HttpClient`.
fn client(groups: &TagGroups<'_>, ctx: &EmitContext<'_>) -> GenFile {
  let mut content = ctx.header.comment();
  content.push_str(&format!("using {}.{CS_SERVICES_DIR};\n\n", ctx.root_namespace));
  content.push_str(&format!("namespace {};\n\n", ctx.root_namespace));
  content.push_str(&format!("public partial class {}(HttpClient httpClient)\n{{\n", ctx.client_name));
  for tag in groups.keys() {
    let type_name = to_type_name(tag);
    content.push_str(&format!(
      "{INDENT}public {type_name}Service {type_name} {{ get; }} = new(httpClient);\n"
    ));
  }
  content.push_str("}\n");

  GenFile::builder()
    .file_name(format!("{}.cs", ctx.client_name))
    .content(content)
    .build()
}

fn project_file(ctx: &EmitContext<'_>) -> String {
  let version = if ctx.header.version.is_empty() {
    "1.0.0"
  } else {
    ctx.header.version.as_str()
  };
  format!(
    r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFramework>net9.0</TargetFramework>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <RootNamespace>{}</RootNamespace>
    <Version>{version}</Version>
  </PropertyGroup>

</Project>
"#,
    ctx.root_namespace
  )
}

fn base_service(root_namespace: &str) -> GenFile {
  let content = format!(
    r#"namespace {root_namespace}.{CS_SERVICES_DIR};

public abstract class BaseService(HttpClient httpClient)
{{
    protected HttpClient HttpClient {{ get; }} = httpClient;

    protected Task<T> GetJsonAsync<T>(string url, object? data = null) => SendJsonAsync<T>(HttpMethod.Get, url, data);

    protected Task<T> PostJsonAsync<T>(string url, object? data = null) => SendJsonAsync<T>(HttpMethod.Post, url, data);

    protected Task<T> PutJsonAsync<T>(string url, object? data = null) => SendJsonAsync<T>(HttpMethod.Put, url, data);

    protected Task<T> PatchJsonAsync<T>(string url, object? data = null) => SendJsonAsync<T>(HttpMethod.Patch, url, data);

    protected Task<T> DeleteJsonAsync<T>(string url, object? data = null) => SendJsonAsync<T>(HttpMethod.Delete, url, data);

    protected async Task<T> SendJsonAsync<T>(HttpMethod method, string url, object? data = null)
    {{
        using var response = await SendCoreAsync(method, url, ToContent(data));
        return (await response.Content.ReadFromJsonAsync<T>())!;
    }}

    protected async Task SendAsync(HttpMethod method, string url, object? data = null)
    {{
        using var response = await SendCoreAsync(method, url, ToContent(data));
    }}

    protected Task<T> PostFormAsync<T>(string url, MultipartFormDataContent content) => SendFormAsync<T>(HttpMethod.Post, url, content);

    protected Task PostFormAsync(string url, MultipartFormDataContent content) => SendFormAsync(HttpMethod.Post, url, content);

    protected async Task<T> SendFormAsync<T>(HttpMethod method, string url, MultipartFormDataContent content)
    {{
        using var response = await SendCoreAsync(method, url, content);
        return (await response.Content.ReadFromJsonAsync<T>())!;
    }}

    protected async Task SendFormAsync(HttpMethod method, string url, MultipartFormDataContent content)
    {{
        using var response = await SendCoreAsync(method, url, content);
    }}

    protected async Task<Stream> DownloadFileAsync(HttpMethod method, string url, object? data = null)
    {{
        var response = await SendCoreAsync(method, url, ToContent(data));
        return await response.Content.ReadAsStreamAsync();
    }}

    private static HttpContent? ToContent(object? data) => data switch
    {{
        null => null,
        HttpContent content => content,
        _ => JsonContent.Create(data),
    }};

    private async Task<HttpResponseMessage> SendCoreAsync(HttpMethod method, string url, HttpContent? content)
    {{
        using var request = new HttpRequestMessage(method, url) {{ Content = content }};
        var response = await HttpClient.SendAsync(request, HttpCompletionOption.ResponseHeadersRead);
        response.EnsureSuccessStatusCode();
        return response;
    }}
}}
"#
  );
  GenFile::builder()
    .relative_directory(CS_SERVICES_DIR)
    .file_name("BaseService.cs")
    .content(content)
    .overwrite_policy(OverwritePolicy::WriteOnce)
    .build()
}
