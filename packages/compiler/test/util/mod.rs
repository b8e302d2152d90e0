//! Shared helpers for the integration tests

#![allow(dead_code)]

use hyperpug_compiler::ast::{Attribute, Block, Node, Tag};
use hyperpug_compiler::nodes::{BlockNode, RootNode, Slot, Statement, TemplateNode};
use hyperpug_compiler::{Compiler, CompilerOptions, OutputOptions};

pub fn root(nodes: Vec<Node>) -> Node {
    Node::Block(Block::new(nodes))
}

pub fn tag(name: &str, children: Vec<Node>) -> Node {
    Tag::new(name).with_children(children).into()
}

pub fn tag_with_attrs(name: &str, attrs: Vec<Attribute>, children: Vec<Node>) -> Node {
    let mut tag = Tag::new(name).with_children(children);
    tag.attrs = attrs;
    tag.into()
}

pub fn compiler(ast: Node) -> Compiler {
    compiler_with(ast, OutputOptions::default())
}

pub fn compiler_with(ast: Node, output_options: OutputOptions) -> Compiler {
    Compiler::new(
        CompilerOptions::new()
            .with_ast(ast)
            .with_output_options(output_options),
    )
    .expect("template should compile")
}

/// Source of the compiled root function with default options.
pub fn compile(ast: Node) -> String {
    compiler(ast).to_source()
}

pub fn compile_with(ast: Node, output_options: OutputOptions) -> String {
    compiler_with(ast, output_options).to_source()
}

/// The root function wrapping `html` with no leading statements.
pub fn template_fn(html: &str) -> String {
    format!("function template(){{\nreturn html`{}`}}", html)
}

/// Assert every block in the tree has exactly one more literal segment
/// than it has slots.
pub fn assert_closed(root: &RootNode) {
    assert_block_closed(&root.block);
}

fn assert_block_closed(block: &BlockNode) {
    assert_eq!(
        block.quasis.len(),
        block.expressions.len() + 1,
        "block `{}` is not closed: {:?}",
        block.name,
        block.quasis
    );

    for slot in &block.expressions {
        if let Slot::Node(node) = slot {
            assert_node_closed(node);
        }
    }
    for statement in &block.code {
        if let Statement::Fragment(mixin) = statement {
            assert_block_closed(&mixin.block);
        }
    }
}

fn assert_node_closed(node: &TemplateNode) {
    assert_block_closed(node.block());
    if let TemplateNode::Condition(condition) = node {
        if let Some(alternate) = &condition.alternate {
            assert_block_closed(alternate);
        }
    }
}
