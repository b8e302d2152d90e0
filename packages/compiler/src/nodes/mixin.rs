//! Mixin Node
//!
//! A reusable fragment: either its definition, rendered as a named
//! function, or a use site rendered through the `mixins` template.

use super::BlockNode;
use crate::attributes::{AttributeOutput, NormalizedAttribute};
use crate::output::{Format, Placeholders};
use crate::util::{escape_template_text, property_key};

#[derive(Debug, Clone, PartialEq)]
pub enum MixinKind {
    /// Declared with a body and an optional parameter list
    Definition { args: Option<String> },
    /// Invoked by name with attributes and optional nested content
    Call { attrs: Vec<NormalizedAttribute> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixinNode {
    pub block: BlockNode,
    pub kind: MixinKind,
}

impl MixinNode {
    pub fn definition(name: impl Into<String>, args: Option<String>) -> Self {
        MixinNode {
            block: BlockNode::new(name),
            kind: MixinKind::Definition { args },
        }
    }

    /// Use site whose content will be visited into the block.
    pub fn call(name: impl Into<String>, attrs: Vec<NormalizedAttribute>) -> Self {
        MixinNode {
            block: BlockNode::new(name),
            kind: MixinKind::Call { attrs },
        }
    }

    /// Use site without nested content.
    pub fn bodyless_call(name: impl Into<String>, attrs: Vec<NormalizedAttribute>) -> Self {
        MixinNode {
            block: BlockNode::empty(name),
            kind: MixinKind::Call { attrs },
        }
    }

    pub fn name(&self) -> &str {
        &self.block.name
    }

    pub fn to_source(&self, format: &Format<'_>) -> String {
        match &self.kind {
            MixinKind::Definition { args } => {
                self.block.as_function(format, args.as_deref().unwrap_or(""))
            }
            MixinKind::Call { attrs } => format.options.mixins.render(
                &Placeholders::new()
                    .with("mixin", self.name())
                    .with_deferred("props", || render_props(attrs))
                    .with_deferred("attrs", || render_attrs(attrs))
                    .with_deferred("children", || self.block.as_expression(format))
                    .with_deferred("content", || self.block.as_html(format)),
            ),
        }
    }
}

/// Attributes as the body of an object literal
fn render_props(attrs: &[NormalizedAttribute]) -> String {
    attrs
        .iter()
        .map(|attr| {
            let value = match &attr.value {
                AttributeOutput::Bare => "true".to_string(),
                AttributeOutput::Static(text) => {
                    serde_json::Value::String(text.clone()).to_string()
                }
                AttributeOutput::Code(source) => source.clone(),
            };
            format!("{}:{}", property_key(&attr.name), value)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Attributes as markup; static values arrive already escaped.
fn render_attrs(attrs: &[NormalizedAttribute]) -> String {
    attrs
        .iter()
        .map(|attr| match &attr.value {
            AttributeOutput::Bare => attr.name.clone(),
            AttributeOutput::Static(text) => {
                format!("{}=\"{}\"", attr.name, escape_template_text(text))
            }
            AttributeOutput::Code(source) => format!("{}=${{{}}}", attr.name, source),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
