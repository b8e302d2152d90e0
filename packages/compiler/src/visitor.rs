//! Template Visitor
//!
//! Lowers the template AST into compiled nodes in a single pass. The
//! node currently being written is threaded through the recursion as
//! `target`; ancestors stay suspended on the call stack. Literal markup
//! accumulates in `buffer` until an interpolation slot or a block
//! boundary closes the pending segment.

use std::mem;

use crate::ast::{self, Node};
use crate::attributes::{normalize_attributes, AttributeOutput};
use crate::error::{CompileError, Result};
use crate::nodes::{
    BlockNode, ConditionNode, EachNode, MixinNode, RootNode, Slot, Statement, TemplateNode,
};
use crate::output::OutputOptions;
use crate::util::escape_template_text;

/// Lower `ast` into a [`RootNode`] named `name`.
pub fn visit_template(ast: &Node, name: &str, options: &OutputOptions) -> Result<RootNode> {
    TemplateVisitor::new(name, options).visit_root(ast)
}

pub struct TemplateVisitor<'o> {
    options: &'o OutputOptions,
    /// Name given to every block that is not a fragment
    name: String,
    /// Pending literal segment of the current node
    buffer: String,
    /// Number of block boundaries between the root and the current node
    depth: usize,
    /// Counter for hoisted include bindings, scoped to this visitor
    includes: usize,
    /// Leading statements of the root, including hoisted fragments
    root_code: Vec<Statement>,
    imports: Vec<String>,
}

impl<'o> TemplateVisitor<'o> {
    pub fn new(name: &str, options: &'o OutputOptions) -> Self {
        TemplateVisitor {
            options,
            name: name.to_string(),
            buffer: String::new(),
            depth: 0,
            includes: 0,
            root_code: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn visit_root(mut self, ast: &Node) -> Result<RootNode> {
        let mut root = RootNode::new(self.name.clone());

        self.visit(ast, &mut root.block)?;
        root.block.close(mem::take(&mut self.buffer));
        root.block.code = self.root_code;
        root.imports = self.imports;

        Ok(root)
    }

    fn visit(&mut self, node: &Node, target: &mut BlockNode) -> Result<()> {
        tracing::trace!(kind = node.kind(), depth = self.depth, "visit");

        match node {
            Node::Block(block) => self.visit_nodes(&block.nodes, target),
            Node::Doctype(doctype) => {
                self.push_text(&format!("<!DOCTYPE {}>", doctype.val));
                Ok(())
            }
            Node::Text(text) => {
                self.push_text(&text.val);
                Ok(())
            }
            Node::Code(code) => {
                self.visit_code(code, target);
                Ok(())
            }
            Node::Tag(tag) => self.visit_tag(tag, target),
            Node::Each(each) => self.visit_each(each, target),
            Node::Conditional(conditional) => self.visit_conditional(conditional, target),
            Node::Mixin(mixin) => self.visit_mixin(mixin, target),
            Node::RawInclude(include) => {
                self.visit_raw_include(include, target);
                Ok(())
            }
            Node::Unsupported { kind } => Err(CompileError::unhandled(kind.as_str())),
        }
    }

    fn visit_nodes(&mut self, nodes: &[Node], target: &mut BlockNode) -> Result<()> {
        for node in nodes {
            self.visit(node, target)?;
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        self.buffer.push_str(&escape_template_text(text));
    }

    /// Close the pending literal segment with `slot` after it.
    fn add_expression(&mut self, target: &mut BlockNode, slot: Slot) {
        target.push_slot(mem::take(&mut self.buffer), slot);
    }

    fn push_statement(&mut self, target: &mut BlockNode, statement: Statement) {
        if self.depth == 0 {
            self.root_code.push(statement);
        } else {
            target.push_statement(statement);
        }
    }

    /// Traverse `nodes` into `block` with a fresh buffer, then flush it.
    fn descend(&mut self, nodes: &[Node], block: &mut BlockNode) -> Result<()> {
        let suspended = mem::take(&mut self.buffer);
        self.depth += 1;

        let result = self.visit_nodes(nodes, block);

        self.depth -= 1;
        result?;
        block.close(mem::replace(&mut self.buffer, suspended));
        Ok(())
    }

    /// Register `node` as the next slot of `target` and visit `nodes`
    /// into it.
    fn add_block(&mut self, target: &mut BlockNode, mut node: TemplateNode, nodes: &[Node]) -> Result<()> {
        let quasi = mem::take(&mut self.buffer);
        self.descend(nodes, node.block_mut())?;
        target.push_slot(quasi, Slot::Node(node));
        Ok(())
    }

    fn visit_code(&mut self, code: &ast::Code, target: &mut BlockNode) {
        if code.buffer {
            self.add_expression(target, Slot::Source(code.val.clone()));
        } else {
            self.push_statement(target, Statement::Source(code.val.clone()));
        }
    }

    fn visit_tag(&mut self, tag: &ast::Tag, target: &mut BlockNode) -> Result<()> {
        self.buffer.push('<');
        self.buffer.push_str(&tag.name);

        if !tag.attrs.is_empty() {
            self.visit_attributes(&tag.attrs, target);
        }

        if tag.self_closing {
            self.buffer.push_str("/>");
            return Ok(());
        }

        self.buffer.push('>');
        if let Some(block) = &tag.block {
            self.visit_nodes(&block.nodes, target)?;
        }
        self.buffer.push_str("</");
        self.buffer.push_str(&tag.name);
        self.buffer.push('>');
        Ok(())
    }

    fn visit_attributes(&mut self, attrs: &[ast::Attribute], target: &mut BlockNode) {
        for attr in normalize_attributes(attrs, self.options) {
            self.buffer.push(' ');
            self.buffer.push_str(&attr.name);

            match attr.value {
                AttributeOutput::Bare => {}
                AttributeOutput::Static(text) => {
                    self.buffer.push_str("=\"");
                    self.push_text(&text);
                    self.buffer.push('"');
                }
                AttributeOutput::Code(source) => {
                    self.buffer.push('=');
                    self.add_expression(target, Slot::Source(source));
                }
            }
        }
    }

    fn visit_each(&mut self, each: &ast::Each, target: &mut BlockNode) -> Result<()> {
        let Some(block) = &each.block else {
            tracing::debug!(object = %each.obj, "each without a body emits nothing");
            return Ok(());
        };

        let node = EachNode::new(self.name.as_str(), each.obj.as_str(), each.val.as_str(), each.key.clone());
        self.add_block(target, TemplateNode::Each(node), &block.nodes)
    }

    fn visit_conditional(&mut self, conditional: &ast::Conditional, target: &mut BlockNode) -> Result<()> {
        let mut node = ConditionNode::new(self.name.as_str(), conditional.test.as_str());
        let quasi = mem::take(&mut self.buffer);

        self.descend(&conditional.consequent.nodes, &mut node.block)?;

        if let Some(alternate) = &conditional.alternate {
            let mut block = BlockNode::new(self.name.as_str());
            let nodes = match alternate.as_ref() {
                Node::Block(block) => block.nodes.as_slice(),
                other => std::slice::from_ref(other),
            };
            self.descend(nodes, &mut block)?;
            node.alternate = Some(block);
        }

        target.push_slot(quasi, Slot::Node(TemplateNode::Condition(node)));
        Ok(())
    }

    fn visit_mixin(&mut self, mixin: &ast::Mixin, target: &mut BlockNode) -> Result<()> {
        if !mixin.call {
            return self.visit_mixin_definition(mixin);
        }

        let attrs = normalize_attributes(&mixin.attrs, self.options);

        match &mixin.block {
            Some(block) => {
                let node = MixinNode::call(mixin.name.as_str(), attrs);
                self.add_block(target, TemplateNode::Mixin(node), &block.nodes)
            }
            None => {
                let node = MixinNode::bodyless_call(mixin.name.as_str(), attrs);
                self.add_expression(target, Slot::Node(TemplateNode::Mixin(node)));
                Ok(())
            }
        }
    }

    /// Compile a definition on the side and hoist it into the root scope.
    /// Emits no markup where it is declared.
    fn visit_mixin_definition(&mut self, mixin: &ast::Mixin) -> Result<()> {
        let mut node = MixinNode::definition(mixin.name.as_str(), mixin.args.clone());
        let nodes = mixin.block.as_ref().map(|block| block.nodes.as_slice()).unwrap_or_default();

        self.descend(nodes, &mut node.block)?;
        self.root_code.push(Statement::Fragment(node));
        Ok(())
    }

    fn visit_raw_include(&mut self, include: &ast::RawInclude, target: &mut BlockNode) {
        self.includes += 1;
        let binding = format!("__include${}", self.includes);
        let path = serde_json::Value::String(include.file.path.clone());

        self.imports.push(format!("import {} from {}", binding, path));
        self.add_expression(target, Slot::Source(binding));
    }
}
