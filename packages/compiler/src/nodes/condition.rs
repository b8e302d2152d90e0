//! Condition Node
//!
//! The node's own body is the consequent; the alternate, when present,
//! is a bare block.

use super::BlockNode;
use crate::output::{Format, Placeholders};

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub block: BlockNode,
    pub test: String,
    pub alternate: Option<BlockNode>,
}

impl ConditionNode {
    pub fn new(name: impl Into<String>, test: impl Into<String>) -> Self {
        ConditionNode {
            block: BlockNode::new(name),
            test: test.into(),
            alternate: None,
        }
    }

    pub fn to_source(&self, format: &Format<'_>) -> String {
        let consequent = self.block.as_expression(format);
        let alternate = match &self.alternate {
            Some(alternate) => alternate.as_expression(format),
            None => format.options.else_.clone(),
        };

        format.options.if_.render(
            &Placeholders::new()
                .with("test", self.test.as_str())
                .with("consequent", consequent)
                .with("alternate", alternate),
        )
    }
}
