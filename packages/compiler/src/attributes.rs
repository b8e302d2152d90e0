//! Attribute Normalizer
//!
//! Classifies raw tag attributes into events, property bindings, two-way
//! bindings, static literals and dynamic code, and gives each its final
//! output name.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::{self, AttributeValue};
use crate::output::OutputOptions;
use crate::util::escape_attribute;

lazy_static! {
    /// `@name`, `(name)` or `onname`
    static ref EVENT_NAME_REGEXP: Regex = Regex::new(r"^(?:[@(]|on)(\S+?)[)]?$").unwrap();

    /// `.name` or `[name]`
    static ref PROPERTY_NAME_REGEXP: Regex = Regex::new(r"^(?:[.\[])(\S+?)[\]]?$").unwrap();
}

/// Prefix of the colon shorthand for a two-way `input` binding
const BINDING_SHORTHAND_PREFIX: char = ':';

/// Event used by the colon shorthand
const SHORTHAND_EVENT: &str = "input";

/// What an attribute contributes to the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOutput {
    /// `name` with no value
    Bare,
    /// `name="value"`, written into the literal segment
    Static(String),
    /// `name=${value}`, contributed as an interpolation slot
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAttribute {
    pub name: String,
    pub value: AttributeOutput,
}

impl NormalizedAttribute {
    fn code(name: String, value: String) -> Self {
        NormalizedAttribute {
            name,
            value: AttributeOutput::Code(value),
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self.value, AttributeOutput::Code(_))
    }
}

enum Entry<'a> {
    Raw(&'a ast::Attribute),
    Resolved(NormalizedAttribute),
}

struct Classified {
    attribute: NormalizedAttribute,
    /// Write-back event synthesized for two-way bindings
    companion: Option<NormalizedAttribute>,
}

impl From<NormalizedAttribute> for Classified {
    fn from(attribute: NormalizedAttribute) -> Self {
        Classified {
            attribute,
            companion: None,
        }
    }
}

/// Normalize a tag's attribute list.
///
/// Two-way bindings append their companion event to the list being walked,
/// so the walk is index based and picks up entries added behind it.
pub fn normalize_attributes(
    attrs: &[ast::Attribute],
    options: &OutputOptions,
) -> Vec<NormalizedAttribute> {
    let mut entries: Vec<Entry<'_>> = attrs.iter().map(Entry::Raw).collect();

    let mut index = 0;
    while index < entries.len() {
        if let Entry::Raw(attr) = entries[index] {
            let classified = classify(attr, options);
            entries[index] = Entry::Resolved(classified.attribute);
            entries.extend(classified.companion.map(Entry::Resolved));
        }
        index += 1;
    }

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Resolved(attr) => Some(attr),
            Entry::Raw(_) => None,
        })
        .collect()
}

fn value_source(val: Option<&AttributeValue>) -> &str {
    match val {
        Some(AttributeValue::Source(source)) => source,
        Some(AttributeValue::Flag(true)) => "true",
        Some(AttributeValue::Flag(false)) => "false",
        None => "undefined",
    }
}

fn write_back(target: &str, property: &str) -> String {
    format!("e => {} = e.target.{}", target, property)
}

fn classify(attr: &ast::Attribute, options: &OutputOptions) -> Classified {
    let name = attr.name.as_str();
    let source = value_source(attr.val.as_ref());

    if let Some(captures) = EVENT_NAME_REGEXP.captures(name) {
        return NormalizedAttribute::code(
            options.event_name(&captures[1]),
            options.event_handler(source),
        )
        .into();
    }

    if let Some(captures) = PROPERTY_NAME_REGEXP.captures(name) {
        let inner = &captures[1];

        if let Some(binding) = EVENT_NAME_REGEXP.captures(inner) {
            let property = &binding[1];
            return Classified {
                attribute: NormalizedAttribute::code(
                    options.property_name(property),
                    source.to_string(),
                ),
                companion: Some(NormalizedAttribute::code(
                    options.binding_event(property),
                    write_back(source, property),
                )),
            };
        }

        return NormalizedAttribute::code(options.property_name(inner), source.to_string()).into();
    }

    if let Some(property) = name.strip_prefix(BINDING_SHORTHAND_PREFIX) {
        return Classified {
            attribute: NormalizedAttribute::code(
                options.property_name(property),
                source.to_string(),
            ),
            companion: Some(NormalizedAttribute::code(
                options.event_name(SHORTHAND_EVENT),
                write_back(source, property),
            )),
        };
    }

    let value = match attr.val.as_ref() {
        None | Some(AttributeValue::Flag(true)) => AttributeOutput::Bare,
        Some(AttributeValue::Source(source)) if source.starts_with(['"', '\'']) => {
            match parse_literal(source) {
                Some(text) if attr.must_escape && options.escape_attributes => {
                    AttributeOutput::Static(escape_attribute(&text))
                }
                Some(text) => AttributeOutput::Static(text),
                None => {
                    tracing::debug!(attribute = name, value = %source, "quoted attribute is not a literal, emitting as code");
                    AttributeOutput::Code(source.clone())
                }
            }
        }
        Some(_) => AttributeOutput::Code(source.to_string()),
    };

    NormalizedAttribute {
        name: name.to_string(),
        value,
    }
    .into()
}

/// Parse a single- or double-quoted string literal.
fn parse_literal(source: &str) -> Option<String> {
    let mut normalized = String::with_capacity(source.len());
    if let Some(rest) = source.strip_prefix('\'') {
        normalized.push('"');
        normalized.push_str(rest);
    } else {
        normalized.push_str(source);
    }
    if normalized.len() > 1 && normalized.ends_with('\'') {
        normalized.pop();
        normalized.push('"');
    }

    serde_json::from_str::<String>(&normalized).ok()
}
