//! Compiled Node Model
//!
//! Intermediate nodes produced by the visitor. Every kind embeds a
//! [`BlockNode`] accumulator and differs only in how it renders itself
//! at the top level, so nesting composes at any depth.

pub mod block;
pub mod condition;
pub mod each;
pub mod mixin;
pub mod root;

pub use block::BlockNode;
pub use condition::ConditionNode;
pub use each::EachNode;
pub use mixin::{MixinKind, MixinNode};
pub use root::RootNode;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::output::Format;

/// A leading statement of a block
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Unbuffered code from the template
    Source(String),
    /// A hoisted fragment definition
    Fragment(MixinNode),
}

impl Statement {
    /// Whether the statement can be sequenced with the comma operator.
    pub fn is_expression(&self) -> bool {
        match self {
            Statement::Source(source) => is_expression_source(source),
            Statement::Fragment(_) => false,
        }
    }

    pub fn render(&self, format: &Format<'_>) -> String {
        match self {
            Statement::Source(source) => source.clone(),
            Statement::Fragment(mixin) => mixin.to_source(format),
        }
    }
}

/// Whether `source` is exactly one JavaScript expression.
fn is_expression_source(source: &str) -> bool {
    let source = source.trim();
    if source.is_empty() {
        return false;
    }

    let allocator = Allocator::default();
    match Parser::new(&allocator, source, SourceType::default()).parse_expression() {
        Ok(expression) => expression.span().end as usize == source.len(),
        Err(_) => false,
    }
}

/// An interpolation slot
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Embedded expression source
    Source(String),
    /// A nested node rendered in expression mode
    Node(TemplateNode),
}

impl Slot {
    pub fn render(&self, format: &Format<'_>) -> String {
        match self {
            Slot::Source(source) => source.clone(),
            Slot::Node(node) => node.to_source(format),
        }
    }
}

/// Closed union of compiled node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Block(BlockNode),
    Each(EachNode),
    Condition(ConditionNode),
    Mixin(MixinNode),
    Root(RootNode),
}

impl TemplateNode {
    pub fn block(&self) -> &BlockNode {
        match self {
            TemplateNode::Block(block) => block,
            TemplateNode::Each(each) => &each.block,
            TemplateNode::Condition(condition) => &condition.block,
            TemplateNode::Mixin(mixin) => &mixin.block,
            TemplateNode::Root(root) => &root.block,
        }
    }

    pub fn block_mut(&mut self) -> &mut BlockNode {
        match self {
            TemplateNode::Block(block) => block,
            TemplateNode::Each(each) => &mut each.block,
            TemplateNode::Condition(condition) => &mut condition.block,
            TemplateNode::Mixin(mixin) => &mut mixin.block,
            TemplateNode::Root(root) => &mut root.block,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TemplateNode::Block(_) => "Block",
            TemplateNode::Each(_) => "Each",
            TemplateNode::Condition(_) => "Condition",
            TemplateNode::Mixin(_) => "Mixin",
            TemplateNode::Root(_) => "Root",
        }
    }

    /// Top-level stringification of the node.
    pub fn to_source(&self, format: &Format<'_>) -> String {
        match self {
            TemplateNode::Block(block) => block.as_expression(format),
            TemplateNode::Each(each) => each.to_source(format),
            TemplateNode::Condition(condition) => condition.to_source(format),
            TemplateNode::Mixin(mixin) => mixin.to_source(format),
            TemplateNode::Root(root) => root.to_source(format),
        }
    }

    /// Count of this node and every node nested beneath it.
    pub fn count(&self) -> usize {
        let alternate = match self {
            TemplateNode::Condition(condition) => condition.alternate.as_ref().map_or(0, count_block),
            _ => 0,
        };
        count_block(self.block()) + alternate
    }
}

pub(crate) fn count_block(block: &BlockNode) -> usize {
    let slots: usize = block
        .expressions
        .iter()
        .map(|slot| match slot {
            Slot::Node(node) => node.count(),
            Slot::Source(_) => 0,
        })
        .sum();
    let fragments: usize = block
        .code
        .iter()
        .map(|statement| match statement {
            Statement::Fragment(mixin) => count_block(&mixin.block),
            Statement::Source(_) => 0,
        })
        .sum();
    1 + slots + fragments
}
