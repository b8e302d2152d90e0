//! Hyperpug Compiler
//!
//! Compiles a pug template AST into JavaScript source that renders the
//! template through tagged template literals.

#![deny(clippy::all)]

pub mod ast;
pub mod attributes;
pub mod cache;
pub mod compiler;
pub mod error;
pub mod nodes;
pub mod output;
pub mod util;
pub mod visitor;

pub use ast::Node;
pub use cache::{compile_tagged, raw_source, RawTemplate, TemplateCache};
pub use compiler::{compile_batch, Compiler, CompilerOptions, ParseRequest, TemplateParser};
pub use error::{CompileError, Result};
pub use output::{OutputOptions, OutputTemplate, Placeholders};
pub use visitor::visit_template;
