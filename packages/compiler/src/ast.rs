//! Template AST
//!
//! Node shapes consumed by the compiler. These mirror the JSON emitted by
//! the pug parser (`{"type": "Tag", ...}`), which is the external contract
//! between the parsing collaborator and this crate.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CompileError, Result};

/// Node type union
///
/// Kinds outside the supported set deserialize into [`Node::Unsupported`]
/// so the visitor can reject them by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Doctype(Doctype),
    Tag(Tag),
    Text(Text),
    Code(Code),
    Each(Each),
    Conditional(Conditional),
    Mixin(Mixin),
    RawInclude(RawInclude),
    Unsupported { kind: String },
}

impl Node {
    /// Parse a JSON document produced by the pug parser.
    pub fn from_json(source: &str) -> Result<Node> {
        serde_json::from_str(source).map_err(CompileError::InvalidAst)
    }

    pub fn from_value(value: Value) -> Result<Node> {
        serde_json::from_value(value).map_err(CompileError::InvalidAst)
    }

    /// The `type` tag this node carries in the JSON form.
    pub fn kind(&self) -> &str {
        match self {
            Node::Block(_) => "Block",
            Node::Doctype(_) => "Doctype",
            Node::Tag(_) => "Tag",
            Node::Text(_) => "Text",
            Node::Code(_) => "Code",
            Node::Each(_) => "Each",
            Node::Conditional(_) => "Conditional",
            Node::Mixin(_) => "Mixin",
            Node::RawInclude(_) => "RawInclude",
            Node::Unsupported { kind } => kind,
        }
    }

    pub fn text(val: impl Into<String>) -> Node {
        Node::Text(Text { val: val.into() })
    }

    /// Buffered code: the value is inserted into the output.
    pub fn output(val: impl Into<String>) -> Node {
        Node::Code(Code {
            val: val.into(),
            buffer: true,
        })
    }

    /// Unbuffered code: a statement run before the enclosing body.
    pub fn statement(val: impl Into<String>) -> Node {
        Node::Code(Code {
            val: val.into(),
            buffer: false,
        })
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?
            .to_string();

        fn payload<T: de::DeserializeOwned, E: de::Error>(value: Value) -> std::result::Result<T, E> {
            serde_json::from_value(value).map_err(E::custom)
        }

        let node = match kind.as_str() {
            "Block" => Node::Block(payload(value)?),
            "Doctype" => Node::Doctype(payload(value)?),
            "Tag" => Node::Tag(payload(value)?),
            "Text" => Node::Text(payload(value)?),
            "Code" => Node::Code(payload(value)?),
            "Each" => Node::Each(payload(value)?),
            "Conditional" => Node::Conditional(payload(value)?),
            "Mixin" => Node::Mixin(payload(value)?),
            "RawInclude" => Node::RawInclude(payload(value)?),
            _ => Node::Unsupported { kind },
        };
        Ok(node)
    }
}

/// Ordered list of child nodes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Block {
    pub fn new(nodes: Vec<Node>) -> Self {
        Block { nodes }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Doctype {
    #[serde(default)]
    pub val: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Text {
    pub val: String,
}

/// Embedded code
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Code {
    pub val: String,
    #[serde(default)]
    pub buffer: bool,
}

/// Raw attribute value
///
/// Pug hands attribute values over as JavaScript source text, or as the
/// boolean `true` for a bare attribute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Source(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub val: Option<AttributeValue>,
    #[serde(default)]
    pub must_escape: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, val: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            val: Some(AttributeValue::Source(val.into())),
            must_escape: true,
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            val: Some(AttributeValue::Flag(true)),
            must_escape: false,
        }
    }

    pub fn unescaped(mut self) -> Self {
        self.must_escape = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub attrs: Vec<Attribute>,
    #[serde(default)]
    pub block: Option<Block>,
    #[serde(default)]
    pub self_closing: bool,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            attrs: Vec::new(),
            block: None,
            self_closing: false,
        }
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn with_children(mut self, nodes: Vec<Node>) -> Self {
        self.block = Some(Block::new(nodes));
        self
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }
}

impl From<Tag> for Node {
    fn from(tag: Tag) -> Self {
        Node::Tag(tag)
    }
}

/// Iteration: `each val, key in obj`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Each {
    pub obj: String,
    pub val: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub block: Option<Block>,
}

impl From<Each> for Node {
    fn from(each: Each) -> Self {
        Node::Each(each)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conditional {
    pub test: String,
    pub consequent: Block,
    /// Either a `Block` or, for `else if`, another `Conditional`.
    #[serde(default)]
    pub alternate: Option<Box<Node>>,
}

impl From<Conditional> for Node {
    fn from(conditional: Conditional) -> Self {
        Node::Conditional(conditional)
    }
}

/// Fragment definition (`call == false`) or use site (`call == true`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mixin {
    pub name: String,
    #[serde(default)]
    pub args: Option<String>,
    #[serde(default)]
    pub block: Option<Block>,
    #[serde(default)]
    pub call: bool,
    #[serde(default)]
    pub attrs: Vec<Attribute>,
}

impl From<Mixin> for Node {
    fn from(mixin: Mixin) -> Self {
        Node::Mixin(mixin)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileReference {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawInclude {
    pub file: FileReference,
}
