//! Each Node
//!
//! Iteration over an object's entries.

use super::BlockNode;
use crate::output::{Format, Placeholders};

/// Binding used when the template names no key
pub const DEFAULT_KEY_BINDING: &str = "_";

#[derive(Debug, Clone, PartialEq)]
pub struct EachNode {
    pub block: BlockNode,
    /// Iterable expression
    pub object: String,
    /// Element binding
    pub value: String,
    /// Key binding
    pub key: Option<String>,
}

impl EachNode {
    pub fn new(
        name: impl Into<String>,
        object: impl Into<String>,
        value: impl Into<String>,
        key: Option<String>,
    ) -> Self {
        EachNode {
            block: BlockNode::new(name),
            object: object.into(),
            value: value.into(),
            key,
        }
    }

    pub fn to_source(&self, format: &Format<'_>) -> String {
        let key = self.key.as_deref().unwrap_or(DEFAULT_KEY_BINDING);
        let args = match &self.key {
            Some(key) => format!("{},{}", self.value, key),
            None => self.value.clone(),
        };

        format.options.each.render(
            &Placeholders::new()
                .with("key", key)
                .with("value", self.value.as_str())
                .with("args", args)
                .with("object", self.object.as_str())
                .with_deferred("code", || self.block.join_code(format, ";"))
                .with_deferred("child", || self.block.as_tagged_template(format)),
        )
    }
}
