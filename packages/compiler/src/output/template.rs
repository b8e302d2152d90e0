//! Output Templates
//!
//! A configurable output point is a function from a placeholder record to
//! source text. String templates such as `on$name` are parsed into
//! segments once, when the options are built, and rendered against the
//! record on every use.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;

/// A value bound to a placeholder
enum Placeholder<'a> {
    Text(Cow<'a, str>),
    /// Stringified only when a template actually references it.
    Deferred(Box<dyn Fn() -> String + 'a>),
}

/// Structured argument record handed to every output template
#[derive(Default)]
pub struct Placeholders<'a> {
    values: IndexMap<&'static str, Placeholder<'a>>,
}

impl<'a> Placeholders<'a> {
    pub fn new() -> Self {
        Placeholders {
            values: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Cow<'a, str>>) -> Self {
        self.values.insert(name, Placeholder::Text(value.into()));
        self
    }

    pub fn with_deferred(mut self, name: &'static str, value: impl Fn() -> String + 'a) -> Self {
        self.values.insert(name, Placeholder::Deferred(Box::new(value)));
        self
    }

    /// Look up a placeholder, forcing it if it is deferred.
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.values.get(name)? {
            Placeholder::Text(text) => Some(Cow::Borrowed(text.as_ref())),
            Placeholder::Deferred(render) => Some(Cow::Owned(render())),
        }
    }

    /// Longest placeholder name that `token` starts with, and its value.
    fn longest_prefix(&self, token: &str) -> Option<(&'static str, Cow<'_, str>)> {
        let name = self
            .names()
            .filter(|name| token.starts_with(name))
            .max_by_key(|name| name.len())?;
        Some((name, self.get(name)?))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

impl fmt::Debug for Placeholders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A `$token` template parsed into literal and placeholder segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: SmallVec<[Segment; 6]>,
}

impl Pattern {
    pub fn parse(source: &str) -> Pattern {
        let mut segments: SmallVec<[Segment; 6]> = SmallVec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            let starts_token = ch == '$'
                && matches!(chars.peek(), Some((_, next)) if next.is_ascii_alphabetic() || *next == '_');

            if !starts_token {
                literal.push(ch);
                continue;
            }

            let start = index + 1;
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(source[start..end].to_string()));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Pattern {
            source: source.to_string(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn references(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Placeholder(token) if token.starts_with(name)))
    }

    /// Substitute every placeholder; unknown ones stay as written.
    ///
    /// A token binds the longest placeholder name it starts with, so
    /// `on$nameChanged` renders `name` followed by `Changed`.
    pub fn render(&self, values: &Placeholders<'_>) -> String {
        let mut result = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Placeholder(token) => match values.longest_prefix(token) {
                    Some((name, value)) => {
                        result.push_str(&value);
                        result.push_str(&token[name.len()..]);
                    }
                    None => {
                        result.push('$');
                        result.push_str(token);
                    }
                },
            }
        }
        result
    }
}

pub type TemplateFn = dyn Fn(&Placeholders<'_>) -> String + Send + Sync;

/// One configurable output point
#[derive(Clone)]
pub enum OutputTemplate {
    Pattern(Pattern),
    Function(Arc<TemplateFn>),
}

impl OutputTemplate {
    pub fn pattern(source: &str) -> Self {
        OutputTemplate::Pattern(Pattern::parse(source))
    }

    pub fn function(render: impl Fn(&Placeholders<'_>) -> String + Send + Sync + 'static) -> Self {
        OutputTemplate::Function(Arc::new(render))
    }

    pub fn render(&self, values: &Placeholders<'_>) -> String {
        match self {
            OutputTemplate::Pattern(pattern) => pattern.render(values),
            OutputTemplate::Function(render) => render(values),
        }
    }
}

impl fmt::Debug for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTemplate::Pattern(pattern) => write!(f, "Pattern({:?})", pattern.source()),
            OutputTemplate::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for OutputTemplate {
    fn from(source: &str) -> Self {
        OutputTemplate::pattern(source)
    }
}

impl From<String> for OutputTemplate {
    fn from(source: String) -> Self {
        OutputTemplate::pattern(&source)
    }
}

impl<'de> Deserialize<'de> for OutputTemplate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        Ok(OutputTemplate::pattern(&source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn parses_tokens_between_literals() {
        let pattern = Pattern::parse("$test ? $consequent : $alternate");
        assert!(pattern.references("test"));
        assert!(pattern.references("alternate"));
        assert!(!pattern.references("else"));

        let values = Placeholders::new()
            .with("test", "a")
            .with("consequent", "b")
            .with("alternate", "c");
        assert_eq!(pattern.render(&values), "a ? b : c");
    }

    #[test]
    fn dollar_without_identifier_is_literal() {
        let pattern = Pattern::parse("html `<${$mixin} $attrs>$content<//>`");
        let values = Placeholders::new()
            .with("mixin", "Author")
            .with("attrs", "name=${author}")
            .with("content", "<h1>x</h1>");
        assert_eq!(
            pattern.render(&values),
            "html `<${Author} name=${author}><h1>x</h1><//>`"
        );
    }

    #[test]
    fn placeholders_bind_by_prefix() {
        let values = Placeholders::new().with("name", "value").with("value", "item");
        assert_eq!(Pattern::parse("on$nameChanged").render(&values), "onvalueChanged");
        assert_eq!(Pattern::parse("$valueList").render(&values), "itemList");
        assert!(Pattern::parse("on$nameChanged").references("name"));
    }

    #[test]
    fn longest_placeholder_name_wins() {
        let values = Placeholders::new().with("value", "v").with("values", "all");
        assert_eq!(Pattern::parse("$values.$value").render(&values), "all.v");
    }

    #[test]
    fn unknown_placeholders_render_verbatim() {
        let pattern = Pattern::parse("on$name$unknown");
        assert_eq!(pattern.render(&Placeholders::new().with("name", "click")), "onclick$unknown");
    }

    #[test]
    fn deferred_values_are_only_forced_when_referenced() {
        let forced = Cell::new(0);
        let values = Placeholders::new()
            .with("mixin", "Card")
            .with_deferred("children", || {
                forced.set(forced.get() + 1);
                "html``".to_string()
            });

        assert_eq!(Pattern::parse("$mixin()").render(&values), "Card()");
        assert_eq!(forced.get(), 0);

        assert_eq!(Pattern::parse("$mixin($children)").render(&values), "Card(html``)");
        assert_eq!(forced.get(), 1);
    }
}
