//! Root Node
//!
//! Top-level block of a compilation. Also collects the imports hoisted
//! out of inclusion constructs at any depth.

use super::{count_block, BlockNode};
use crate::output::{Format, Placeholders};

#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    pub block: BlockNode,
    /// Module-level import statements, in encounter order
    pub imports: Vec<String>,
}

impl RootNode {
    pub fn new(name: impl Into<String>) -> Self {
        RootNode {
            block: BlockNode::new(name),
            imports: Vec::new(),
        }
    }

    pub fn as_function(&self, format: &Format<'_>, args: &str) -> String {
        self.block.as_function(format, args)
    }

    /// The compiled function wrapped with its hoisted imports.
    pub fn as_module(&self, format: &Format<'_>, args: &str) -> String {
        format.options.modules.render(
            &Placeholders::new()
                .with("imports", self.imports.join("\n"))
                .with_deferred("function", || self.as_function(format, args)),
        )
    }

    pub fn to_source(&self, format: &Format<'_>) -> String {
        self.as_function(format, "")
    }

    /// Number of compiled nodes in the tree, the root included.
    pub fn count(&self) -> usize {
        count_block(&self.block)
    }
}
