//! Compiler Entry
//!
//! Constructing a [`Compiler`] compiles the template: the populated node
//! tree is available as soon as construction returns.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;

use crate::ast::Node;
use crate::error::{CompileError, Result};
use crate::nodes::RootNode;
use crate::output::{Format, OutputOptions};
use crate::visitor::visit_template;

pub const DEFAULT_TAG: &str = "html";
pub const DEFAULT_NAME: &str = "template";

/// Everything the parsing collaborator receives
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    pub source: &'a str,
    pub filename: &'a str,
    pub lex_options: &'a Value,
    pub parse_options: &'a Value,
}

/// External lexer/parser producing the template AST
pub trait TemplateParser: Send + Sync {
    fn parse(&self, request: ParseRequest<'_>) -> anyhow::Result<Node>;
}

impl<F> TemplateParser for F
where
    F: Fn(ParseRequest<'_>) -> anyhow::Result<Node> + Send + Sync,
{
    fn parse(&self, request: ParseRequest<'_>) -> anyhow::Result<Node> {
        self(request)
    }
}

#[derive(Clone)]
pub struct CompilerOptions {
    pub source: String,
    /// Host tag for template literals
    pub tag: String,
    /// Name of the compiled function
    pub name: String,
    /// Defaults to `<name>.pug`
    pub filename: Option<String>,
    pub lex_options: Value,
    pub parse_options: Value,
    pub output_options: OutputOptions,
    /// Pre-parsed AST; when set, the parser is not consulted
    pub ast: Option<Node>,
    pub parser: Option<Arc<dyn TemplateParser>>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            source: String::new(),
            tag: DEFAULT_TAG.to_string(),
            name: DEFAULT_NAME.to_string(),
            filename: None,
            lex_options: Value::Object(Default::default()),
            parse_options: Value::Object(Default::default()),
            output_options: OutputOptions::default(),
            ast: None,
            parser: None,
        }
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("has_ast", &self.ast.is_some())
            .field("has_parser", &self.parser.is_some())
            .finish_non_exhaustive()
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_lex_options(mut self, lex_options: Value) -> Self {
        self.lex_options = lex_options;
        self
    }

    pub fn with_parse_options(mut self, parse_options: Value) -> Self {
        self.parse_options = parse_options;
        self
    }

    pub fn with_output_options(mut self, output_options: OutputOptions) -> Self {
        self.output_options = output_options;
        self
    }

    pub fn with_ast(mut self, ast: Node) -> Self {
        self.ast = Some(ast);
        self
    }

    pub fn with_parser(mut self, parser: impl TemplateParser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn filename(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("{}.pug", self.name))
    }
}

/// A compiled template
#[derive(Debug, Clone)]
pub struct Compiler {
    tag: String,
    name: String,
    filename: String,
    output_options: OutputOptions,
    ast: Node,
    target: RootNode,
}

impl Compiler {
    #[tracing::instrument(level = "debug", skip_all, fields(name = %options.name))]
    pub fn new(options: CompilerOptions) -> Result<Self> {
        let filename = options.filename();

        let ast = match (options.ast, &options.parser) {
            (Some(ast), _) => ast,
            (None, Some(parser)) => parser
                .parse(ParseRequest {
                    source: &options.source,
                    filename: &filename,
                    lex_options: &options.lex_options,
                    parse_options: &options.parse_options,
                })
                .map_err(|source| CompileError::Parse {
                    filename: filename.clone(),
                    source,
                })?,
            (None, None) => return Err(CompileError::MissingAst { filename }),
        };

        let target = visit_template(&ast, &options.name, &options.output_options)?;

        tracing::debug!(
            filename = %filename,
            nodes = target.count(),
            imports = target.imports.len(),
            "compiled template"
        );

        Ok(Compiler {
            tag: options.tag,
            name: options.name,
            filename,
            output_options: options.output_options,
            ast,
            target,
        })
    }

    pub fn target(&self) -> &RootNode {
        &self.target
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn output_options(&self) -> &OutputOptions {
        &self.output_options
    }

    pub fn format(&self) -> Format<'_> {
        Format::new(&self.tag, &self.output_options)
    }

    /// The compiled function, taking `args` as its parameter list.
    pub fn as_function(&self, args: &str) -> String {
        self.target.as_function(&self.format(), args)
    }

    /// The compiled function as a module with its hoisted imports.
    pub fn as_module(&self, args: &str) -> String {
        self.target.as_module(&self.format(), args)
    }

    pub fn to_source(&self) -> String {
        self.target.to_source(&self.format())
    }
}

/// Compile independent templates in parallel. Results keep input order.
pub fn compile_batch(options: Vec<CompilerOptions>) -> Vec<Result<Compiler>> {
    options.into_par_iter().map(Compiler::new).collect()
}
