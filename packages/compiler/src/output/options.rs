//! Output Options
//!
//! Maps each output construct to the template used to render it. The
//! defaults target tagged-template runtimes such as `uhtml` or `lit`.

use serde::Deserialize;

use super::template::{OutputTemplate, Placeholders};
use crate::error::{CompileError, Result};

pub const DEFAULT_IF: &str = "$test ? $consequent : $alternate";
pub const DEFAULT_ELSE: &str = "null";
pub const DEFAULT_EVENTS: &str = "on$name";
pub const DEFAULT_PROPERTIES: &str = ".$name";
pub const DEFAULT_FUNCTIONS: &str = "function $name($args){$code\nreturn $child}";
pub const DEFAULT_MODULES: &str = "$imports\nexport default $function";
pub const DEFAULT_MIXINS: &str = "$mixin({$props}, $children)";
pub const DEFAULT_BINDINGS: &str = "oninput";
pub const DEFAULT_EACH: &str = "Object.entries($object).map(([$key,$value])=>{$code\n return $child})";

/// Output-format configuration
///
/// Deserializes from JSON with the string form of every template; keys
/// that are left out keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OutputOptions {
    /// Placeholders: `test`, `consequent`, `alternate`
    #[serde(rename = "if")]
    pub if_: OutputTemplate,
    /// Rendered when a conditional has no alternate branch
    #[serde(rename = "else")]
    pub else_: String,
    /// Placeholders: `name`
    pub events: OutputTemplate,
    /// Placeholders: `name`
    pub properties: OutputTemplate,
    /// Placeholders: `name`, `args`, `code`, `child`
    pub functions: OutputTemplate,
    /// Placeholders: `imports`, `function`
    pub modules: OutputTemplate,
    /// Placeholders: `mixin`, `props`, `attrs`, `content`, `children`
    pub mixins: OutputTemplate,
    /// Event used by two-way property bindings; `name` is the formatted
    /// event of the bound property.
    pub bindings: OutputTemplate,
    /// Placeholders: `key`, `value`, `args`, `object`, `code`, `child`
    pub each: OutputTemplate,
    /// Wrap event handler values as `e => <value>`
    pub wrap_events: bool,
    /// Escape quotes in static attribute values marked `mustEscape`
    pub escape_attributes: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            if_: OutputTemplate::pattern(DEFAULT_IF),
            else_: DEFAULT_ELSE.to_string(),
            events: OutputTemplate::pattern(DEFAULT_EVENTS),
            properties: OutputTemplate::pattern(DEFAULT_PROPERTIES),
            functions: OutputTemplate::pattern(DEFAULT_FUNCTIONS),
            modules: OutputTemplate::pattern(DEFAULT_MODULES),
            mixins: OutputTemplate::pattern(DEFAULT_MIXINS),
            bindings: OutputTemplate::pattern(DEFAULT_BINDINGS),
            each: OutputTemplate::pattern(DEFAULT_EACH),
            wrap_events: true,
            escape_attributes: true,
        }
    }
}

impl OutputOptions {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(CompileError::InvalidOptions)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(CompileError::InvalidOptions)
    }

    pub fn event_name(&self, name: &str) -> String {
        self.events.render(&Placeholders::new().with("name", name))
    }

    pub fn property_name(&self, name: &str) -> String {
        self.properties.render(&Placeholders::new().with("name", name))
    }

    /// Event that writes a two-way bound property back.
    pub fn binding_event(&self, name: &str) -> String {
        let event = self.event_name(name);
        self.bindings.render(&Placeholders::new().with("name", event))
    }

    /// Wrap a handler body according to `wrap_events`.
    pub fn event_handler(&self, body: &str) -> String {
        if self.wrap_events {
            format!("e => {}", body)
        } else {
            body.to_string()
        }
    }
}
