//! Utility Functions
//!
//! Escaping and identifier helpers shared by the attribute normalizer
//! and the node stringifiers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Legal JavaScript identifier (ASCII subset)
static LEGAL_IDENTIFIER_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap());

/// Escape quotes inside a static attribute value
pub fn escape_attribute(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\'' => result.push_str("&#39;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Escape literal text so it can sit between the backticks of a
/// template literal.
pub fn escape_template_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '`' => result.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => result.push_str("\\$"),
            _ => result.push(ch),
        }
    }
    result
}

pub fn is_legal_identifier(input: &str) -> bool {
    LEGAL_IDENTIFIER_REGEXP.is_match(input)
}

/// Render a name as an object-literal key, quoting it when it is not a
/// legal identifier.
pub fn property_key(input: &str) -> String {
    if is_legal_identifier(input) {
        return input.to_string();
    }

    let mut escaped = input.replace('\\', "\\\\");
    escaped = escaped.replace('\'', "\\'");
    escaped = escaped.replace('\n', "\\n");
    escaped = escaped.replace('\r', "\\r");

    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_both_quote_styles() {
        assert_eq!(escape_attribute(r#"it's "quoted""#), "it&#39;s &quot;quoted&quot;");
    }

    #[test]
    fn escapes_template_literal_delimiters() {
        assert_eq!(escape_template_text("a`b"), "a\\`b");
        assert_eq!(escape_template_text("${x}"), "\\${x}");
        assert_eq!(escape_template_text("$x"), "$x");
        assert_eq!(escape_template_text("c:\\dir"), "c:\\\\dir");
    }

    #[test]
    fn quotes_only_illegal_keys() {
        assert_eq!(property_key("name"), "name");
        assert_eq!(property_key("$el"), "$el");
        assert_eq!(property_key("data-id"), "'data-id'");
        assert_eq!(property_key(".value"), "'.value'");
    }
}
