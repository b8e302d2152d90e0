//! Template Cache
//!
//! Host integrations compile a literal template once and reuse the result
//! every time the same literal is evaluated again. Entries are keyed by
//! the identity of the host's `Arc`, never by its text: two literals with
//! identical text are still two templates.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::compiler::{Compiler, CompilerOptions};
use crate::error::Result;

struct CacheEntry<K: ?Sized, V> {
    key: Weak<K>,
    value: Arc<V>,
}

/// Identity-keyed memo with weak-map semantics
///
/// An entry lives as long as its key; dropped keys are pruned on the next
/// insert and there is no other eviction.
pub struct TemplateCache<K: ?Sized, V> {
    entries: HashMap<usize, CacheEntry<K, V>>,
}

impl<K: ?Sized, V> Default for TemplateCache<K, V> {
    fn default() -> Self {
        TemplateCache {
            entries: HashMap::new(),
        }
    }
}

fn identity<K: ?Sized>(key: &Arc<K>) -> usize {
    Arc::as_ptr(key) as *const () as usize
}

impl<K: ?Sized, V> TemplateCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Arc<K>) -> Option<Arc<V>> {
        let entry = self.entries.get(&identity(key))?;
        let live = entry.key.upgrade()?;
        Arc::ptr_eq(&live, key).then(|| Arc::clone(&entry.value))
    }

    pub fn insert(&mut self, key: &Arc<K>, value: V) -> Arc<V> {
        self.prune();
        let value = Arc::new(value);
        self.entries.insert(
            identity(key),
            CacheEntry {
                key: Arc::downgrade(key),
                value: Arc::clone(&value),
            },
        );
        value
    }

    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: &Arc<K>,
        compile: impl FnOnce(&K) -> std::result::Result<V, E>,
    ) -> std::result::Result<Arc<V>, E> {
        if let Some(value) = self.get(key) {
            tracing::debug!("template cache hit");
            return Ok(value);
        }

        tracing::debug!("template cache miss");
        let value = compile(key)?;
        Ok(self.insert(key, value))
    }

    /// Forget entries whose key has been dropped.
    pub fn prune(&mut self) {
        self.entries.retain(|_, entry| entry.key.strong_count() > 0);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source assembled from the literal segments of a tagged-template call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTemplate {
    pub source: String,
    /// One positional parameter per value hole
    pub parameters: Vec<String>,
}

impl RawTemplate {
    /// Parameter list for the compiled function, e.g. `_0,_1`.
    pub fn arguments(&self) -> String {
        self.parameters.join(",")
    }
}

/// Join literal segments, naming each value hole `_<index>`.
pub fn raw_source<S: AsRef<str>>(statics: &[S]) -> RawTemplate {
    let mut source = String::new();
    let mut parameters = Vec::with_capacity(statics.len().saturating_sub(1));

    for (index, segment) in statics.iter().enumerate() {
        if index > 0 {
            let parameter = format!("_{}", index - 1);
            source.push_str(&parameter);
            parameters.push(parameter);
        }
        source.push_str(segment.as_ref());
    }

    RawTemplate { source, parameters }
}

/// Compile a tagged-template literal once per literal identity.
///
/// `configure` receives options carrying the assembled source and must
/// supply the parser (and any output configuration). The cached value is
/// the compiled function taking the hole values as parameters.
pub fn compile_tagged<S: AsRef<str>>(
    cache: &mut TemplateCache<[S], String>,
    statics: &Arc<[S]>,
    configure: impl FnOnce(CompilerOptions) -> CompilerOptions,
) -> Result<Arc<String>> {
    cache.get_or_try_insert_with(statics, |statics| {
        let raw = raw_source(statics);
        let compiler = Compiler::new(configure(CompilerOptions::new().with_source(raw.source.clone())))?;
        Ok(compiler.as_function(&raw.arguments()))
    })
}
