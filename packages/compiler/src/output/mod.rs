//! Output Module
//!
//! Output-format configuration consulted when compiled nodes are
//! stringified.

pub mod options;
pub mod template;

pub use options::OutputOptions;
pub use template::{OutputTemplate, Pattern, Placeholders, TemplateFn};

/// Formatting context threaded through node stringification
#[derive(Debug, Clone, Copy)]
pub struct Format<'a> {
    /// Host tag prepended to every template literal, e.g. `html`
    pub tag: &'a str,
    pub options: &'a OutputOptions,
}

impl<'a> Format<'a> {
    pub fn new(tag: &'a str, options: &'a OutputOptions) -> Self {
        Format { tag, options }
    }

    /// `tag` + backtick-delimited markup
    pub fn tagged(&self, html: &str) -> String {
        let mut result = String::with_capacity(self.tag.len() + html.len() + 2);
        result.push_str(self.tag);
        result.push('`');
        result.push_str(html);
        result.push('`');
        result
    }
}
