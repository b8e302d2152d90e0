//! AST JSON Tests
//!
//! Decoding parser output and compiling it, including through a parser
//! collaborator.

#[path = "util/mod.rs"]
mod utils;

mod tests {
    use super::utils::*;
    use hyperpug_compiler::ast::{AttributeValue, Node};
    use hyperpug_compiler::{compile_batch, CompileError, Compiler, CompilerOptions, ParseRequest};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    const POSTS_AST: &str = r#"{
        "type": "Block",
        "nodes": [
            {
                "type": "Tag",
                "name": "a",
                "selfClosing": false,
                "block": { "type": "Block", "nodes": [{ "type": "Text", "val": "Posts", "line": 1 }] },
                "attrs": [{ "name": "href", "val": "\"/posts\"", "mustEscape": true }],
                "attributeBlocks": [],
                "isInline": true,
                "line": 1
            },
            {
                "type": "Conditional",
                "test": "posts.length",
                "consequent": {
                    "type": "Block",
                    "nodes": [
                        {
                            "type": "Each",
                            "obj": "posts",
                            "val": "post",
                            "key": null,
                            "block": {
                                "type": "Block",
                                "nodes": [{ "type": "Code", "val": "post.title", "buffer": true, "mustEscape": true, "isInline": true }]
                            }
                        }
                    ]
                },
                "alternate": null
            },
            {
                "type": "RawInclude",
                "file": { "type": "FileReference", "path": "./footer.html" },
                "filters": []
            }
        ]
    }"#;

    #[test]
    fn should_decode_parser_output() {
        let ast = Node::from_json(POSTS_AST).unwrap();
        let Node::Block(block) = &ast else {
            panic!("expected a block, got {}", ast.kind());
        };
        let kinds: Vec<_> = block.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["Tag", "Conditional", "RawInclude"]);

        let Node::Tag(tag) = &block.nodes[0] else { unreachable!() };
        assert_eq!(tag.attrs[0].val, Some(AttributeValue::Source("\"/posts\"".into())));
        assert!(tag.attrs[0].must_escape);
    }

    #[test]
    fn should_decode_bare_attribute_flags() {
        let ast = Node::from_json(
            r#"{"type":"Tag","name":"input","selfClosing":true,"attrs":[{"name":"disabled","val":true,"mustEscape":false}]}"#,
        )
        .unwrap();
        let Node::Tag(tag) = ast else { unreachable!() };
        assert_eq!(tag.attrs[0].val, Some(AttributeValue::Flag(true)));
        assert!(tag.self_closing);
    }

    #[test]
    fn should_compile_decoded_ast() {
        let compiler = compiler(Node::from_json(POSTS_AST).unwrap());
        assert_eq!(
            compiler.as_module(""),
            concat!(
                "import __include$1 from \"./footer.html\"\n",
                "export default function template(){\n",
                "return html`<a href=\"/posts\">Posts</a>",
                "${posts.length ? html`${Object.entries(posts).map(([_,post])=>{\n return html`${post.title}`})}` : null}",
                "${__include$1}`}"
            )
        );
    }

    #[test]
    fn should_keep_unknown_kinds_until_compilation() {
        let ast = Node::from_json(r#"{"type":"Block","nodes":[{"type":"Filter","name":"markdown"}]}"#).unwrap();
        let error = Compiler::new(CompilerOptions::new().with_ast(ast)).unwrap_err();
        assert_eq!(error.to_string(), "Filter not implemented!");
    }

    #[test]
    fn should_reject_nodes_without_type() {
        let error = Node::from_json(r#"{"nodes":[]}"#).unwrap_err();
        assert!(matches!(error, CompileError::InvalidAst(_)));
    }

    #[test]
    fn should_hand_source_and_filename_to_the_parser() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let compiler = Compiler::new(
            CompilerOptions::new()
                .with_name("card")
                .with_source("p hello")
                .with_parser(move |request: ParseRequest<'_>| -> anyhow::Result<Node> {
                    recorder
                        .lock()
                        .unwrap()
                        .push((request.source.to_string(), request.filename.to_string()));
                    Ok(root(vec![tag("p", vec![Node::text("hello")])]))
                }),
        )
        .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![("p hello".to_string(), "card.pug".to_string())]);
        assert_eq!(compiler.to_source(), "function card(){\nreturn html`<p>hello</p>`}");
    }

    #[test]
    fn should_prefer_a_supplied_ast_over_the_parser() {
        let compiler = Compiler::new(
            CompilerOptions::new()
                .with_ast(root(vec![Node::text("ast")]))
                .with_parser(|_: ParseRequest<'_>| -> anyhow::Result<Node> { anyhow::bail!("parser should not run") }),
        )
        .unwrap();
        assert_eq!(compiler.to_source(), template_fn("ast"));
    }

    #[test]
    fn should_wrap_parser_failures() {
        let error = Compiler::new(
            CompilerOptions::new()
                .with_filename("views/broken.pug")
                .with_parser(|_: ParseRequest<'_>| -> anyhow::Result<Node> { anyhow::bail!("unexpected token") }),
        )
        .unwrap_err();

        assert!(matches!(&error, CompileError::Parse { filename, .. } if filename == "views/broken.pug"));
        assert_eq!(error.to_string(), "Failed to parse 'views/broken.pug': unexpected token");
    }

    #[test]
    fn should_compile_batches_in_input_order() {
        let options: Vec<_> = ["first", "second", "third"]
            .into_iter()
            .map(|name| {
                CompilerOptions::new()
                    .with_name(name)
                    .with_ast(root(vec![tag("p", vec![Node::text(name)])]))
            })
            .collect();

        let names: Vec<_> = compile_batch(options)
            .into_iter()
            .map(|result| result.unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn should_report_batch_failures_per_template() {
        let results = compile_batch(vec![
            CompilerOptions::new().with_ast(root(vec![Node::text("ok")])),
            CompilerOptions::new().with_ast(Node::Unsupported { kind: "Comment".into() }),
        ]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(CompileError::UnhandledNode { .. })));
    }
}
