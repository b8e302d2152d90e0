//! Block Node
//!
//! The accumulator shared by every compiled node kind: leading statements,
//! literal segments (quasis) and the interpolation slots between them.

use super::{Slot, Statement};
use crate::output::{Format, Placeholders};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub name: String,
    /// Statements run before the body, in source order
    pub code: Vec<Statement>,
    pub quasis: Vec<String>,
    /// Slot `i` sits between `quasis[i]` and `quasis[i + 1]`
    pub expressions: Vec<Slot>,
}

impl BlockNode {
    pub fn new(name: impl Into<String>) -> Self {
        BlockNode {
            name: name.into(),
            code: Vec::new(),
            quasis: Vec::new(),
            expressions: Vec::new(),
        }
    }

    /// A block with no body, already closed.
    pub fn empty(name: impl Into<String>) -> Self {
        let mut block = BlockNode::new(name);
        block.quasis.push(String::new());
        block
    }

    pub fn push_statement(&mut self, statement: Statement) {
        self.code.push(statement);
    }

    /// Close the pending literal segment and open slot after it.
    pub fn push_slot(&mut self, quasi: String, slot: Slot) {
        self.quasis.push(quasi);
        self.expressions.push(slot);
    }

    /// Flush the final literal segment.
    pub fn close(&mut self, quasi: String) {
        self.quasis.push(quasi);
    }

    pub fn is_closed(&self) -> bool {
        self.quasis.len() == self.expressions.len() + 1
    }

    /// Interleave quasis and slots into one literal body.
    pub fn as_html(&self, format: &Format<'_>) -> String {
        let mut result = String::new();

        for (index, quasi) in self.quasis.iter().enumerate() {
            result.push_str(quasi);

            if let Some(slot) = self.expressions.get(index) {
                result.push_str("${");
                result.push_str(&slot.render(format));
                result.push('}');
            }
        }
        result
    }

    pub fn as_tagged_template(&self, format: &Format<'_>) -> String {
        format.tagged(&self.as_html(format))
    }

    /// The body as a single expression, running leading statements first.
    pub fn as_expression(&self, format: &Format<'_>) -> String {
        let tag = self.as_tagged_template(format);

        if self.code.is_empty() {
            return tag;
        }

        if self.code.iter().all(Statement::is_expression) {
            return format!("({},{})", self.join_code(format, ","), tag);
        }

        format!("(()=>{{{};return {}}})()", self.join_code(format, ";"), tag)
    }

    /// A named function returning the body.
    pub fn as_function(&self, format: &Format<'_>, args: &str) -> String {
        let code = self.join_code(format, ";");
        let child = self.as_tagged_template(format);

        format.options.functions.render(
            &Placeholders::new()
                .with("name", self.name.as_str())
                .with("args", args)
                .with("code", code)
                .with("child", child),
        )
    }

    pub(crate) fn join_code(&self, format: &Format<'_>, separator: &str) -> String {
        self.code
            .iter()
            .map(|statement| statement.render(format))
            .collect::<Vec<_>>()
            .join(separator)
    }
}
