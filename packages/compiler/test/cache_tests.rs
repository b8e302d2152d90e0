//! Template Cache Tests
//!
//! Identity semantics of the tagged-template cache.

#[path = "util/mod.rs"]
mod utils;

mod tests {
    use super::utils::*;
    use hyperpug_compiler::ast::Node;
    use hyperpug_compiler::{compile_tagged, CompilerOptions, ParseRequest, TemplateCache};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Parser that renders its source as text, counting invocations.
    fn counting_parser(calls: &Arc<AtomicUsize>) -> impl Fn(CompilerOptions) -> CompilerOptions {
        let calls = Arc::clone(calls);
        move |options: CompilerOptions| {
            let calls = Arc::clone(&calls);
            options.with_parser(move |request: ParseRequest<'_>| -> anyhow::Result<Node> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(root(vec![tag("p", vec![Node::text(request.source)])]))
            })
        }
    }

    fn literal(segments: &[&'static str]) -> Arc<[&'static str]> {
        Arc::from(segments.to_vec())
    }

    #[test]
    fn should_compile_holes_as_parameters() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = TemplateCache::new();
        let statics = literal(&["Hello ", "!"]);

        let source = compile_tagged(&mut cache, &statics, counting_parser(&calls)).unwrap();
        assert_eq!(*source, "function template(_0){\nreturn html`<p>Hello _0!</p>`}");
    }

    #[test]
    fn should_reuse_result_for_the_same_literal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = TemplateCache::new();
        let statics = literal(&["a", "b"]);

        let first = compile_tagged(&mut cache, &statics, counting_parser(&calls)).unwrap();
        let second = compile_tagged(&mut cache, &statics, counting_parser(&calls)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_not_share_results_between_equal_texts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = TemplateCache::new();
        let first = literal(&["same"]);
        let second = literal(&["same"]);

        let a = compile_tagged(&mut cache, &first, counting_parser(&calls)).unwrap();
        let b = compile_tagged(&mut cache, &second, counting_parser(&calls)).unwrap();

        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn should_forget_dropped_literals() {
        let mut cache: TemplateCache<str, usize> = TemplateCache::new();
        let kept: Arc<str> = Arc::from("kept");
        let dropped: Arc<str> = Arc::from("dropped");

        cache.insert(&kept, 1);
        cache.insert(&dropped, 2);
        drop(dropped);
        cache.prune();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&kept).as_deref(), Some(&1));
    }

    #[test]
    fn should_not_cache_failures() {
        let mut cache: TemplateCache<str, String> = TemplateCache::new();
        let key: Arc<str> = Arc::from("p");

        let failed = cache.get_or_try_insert_with(&key, |_| Err::<String, _>("boom"));
        assert_eq!(failed, Err("boom"));
        assert!(cache.is_empty());

        let value = cache.get_or_try_insert_with(&key, |text| Ok::<_, &str>(text.to_uppercase()));
        assert_eq!(value.unwrap().as_str(), "P");
    }
}
