#![deny(clippy::all)]

use hyperpug_compiler::ast::Node;
use hyperpug_compiler::{Compiler, CompilerOptions, OutputOptions};
use napi_derive::napi;
use serde::Deserialize;

/// Options accepted from JavaScript as a JSON string
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct BindingOptions {
  tag: Option<String>,
  name: Option<String>,
  filename: Option<String>,
  output_options: Option<OutputOptions>,
}

impl BindingOptions {
  fn from_json(options_json: Option<&str>) -> napi::Result<Self> {
    match options_json {
      Some(json) if !json.trim().is_empty() => serde_json::from_str(json)
        .map_err(|e| napi::Error::from_reason(format!("Invalid compiler options: {}", e))),
      _ => Ok(BindingOptions::default()),
    }
  }

  fn into_compiler_options(self, ast: Node) -> CompilerOptions {
    let mut options = CompilerOptions::new().with_ast(ast);
    if let Some(tag) = self.tag {
      options = options.with_tag(tag);
    }
    if let Some(name) = self.name {
      options = options.with_name(name);
    }
    if let Some(filename) = self.filename {
      options = options.with_filename(filename);
    }
    if let Some(output_options) = self.output_options {
      options = options.with_output_options(output_options);
    }
    options
  }
}

fn compile(ast_json: &str, options_json: Option<&str>) -> napi::Result<Compiler> {
  let ast = Node::from_json(ast_json).map_err(|e| napi::Error::from_reason(e.to_string()))?;
  let options = BindingOptions::from_json(options_json)?.into_compiler_options(ast);
  Compiler::new(options).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Compile a template AST (JSON) into the source of a named function.
#[napi]
pub fn compile_template(ast_json: String, options_json: Option<String>) -> napi::Result<String> {
  Ok(compile(&ast_json, options_json.as_deref())?.to_source())
}

/// Compile a template AST (JSON) into module source with its imports.
#[napi]
pub fn compile_module(ast_json: String, options_json: Option<String>) -> napi::Result<String> {
  Ok(compile(&ast_json, options_json.as_deref())?.as_module(""))
}

#[napi]
pub struct TemplateCompiler {
  options_json: Option<String>,
}

#[napi]
impl TemplateCompiler {
  #[napi(constructor)]
  pub fn new(options_json: Option<String>) -> napi::Result<Self> {
    BindingOptions::from_json(options_json.as_deref())?;
    Ok(TemplateCompiler { options_json })
  }

  #[napi]
  pub fn compile(&self, ast_json: String, args: Option<String>) -> napi::Result<String> {
    let compiler = compile(&ast_json, self.options_json.as_deref())?;
    Ok(compiler.as_function(args.as_deref().unwrap_or("")))
  }

  #[napi]
  pub fn compile_module(&self, ast_json: String, args: Option<String>) -> napi::Result<String> {
    let compiler = compile(&ast_json, self.options_json.as_deref())?;
    Ok(compiler.as_module(args.as_deref().unwrap_or("")))
  }
}
