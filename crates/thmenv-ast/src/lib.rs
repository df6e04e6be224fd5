//! Pandoc JSON AST for document filters.
//!
//! The types mirror the JSON encoding Pandoc uses when talking to external
//! filters: every node is an object `{"t": <tag>, "c": <contents>}`, and
//! attributes, targets and list attributes are positional arrays.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod walk;

pub use walk::{walk_blocks, walk_inlines, BlockRewrite, Visitor};

/// API version written by [`Pandoc::new`].
pub const API_VERSION: [u32; 3] = [1, 23, 1];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pandoc {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    pub meta: Meta,
    pub blocks: Vec<Block>,
}

impl Pandoc {
    pub fn new(meta: Meta, blocks: Vec<Block>) -> Self {
        Self {
            api_version: API_VERSION.to_vec(),
            meta,
            blocks,
        }
    }
}

/// Document metadata, in source order.
pub type Meta = IndexMap<String, MetaValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum MetaValue {
    MetaMap(IndexMap<String, MetaValue>),
    MetaList(Vec<MetaValue>),
    MetaBool(bool),
    MetaString(String),
    MetaInlines(Vec<Inline>),
    MetaBlocks(Vec<Block>),
}

impl MetaValue {
    /// Plain-text reading of a scalar value. Maps and lists have none.
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            MetaValue::MetaString(s) => Some(s.clone()),
            MetaValue::MetaInlines(inlines) => Some(stringify(inlines)),
            MetaValue::MetaBlocks(blocks) => Some(stringify_blocks(blocks)),
            MetaValue::MetaBool(b) => Some(b.to_string()),
            MetaValue::MetaMap(_) | MetaValue::MetaList(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, MetaValue>> {
        match self {
            MetaValue::MetaMap(map) => Some(map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(String, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(i32, Attr, Vec<Inline>),
    HorizontalRule,
    /// Tables are carried through untouched.
    Table(serde_json::Value),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

impl Block {
    pub fn raw_latex(text: impl Into<String>) -> Self {
        Block::RawBlock("latex".to_string(), text.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(QuoteType, Vec<Inline>),
    Cite(Vec<Citation>, Vec<Inline>),
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    Math(MathType, String),
    RawInline(String, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    Note(Vec<Block>),
    Span(Attr, Vec<Inline>),
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Inline::Str(s.into())
    }

    pub fn raw_latex(text: impl Into<String>) -> Self {
        Inline::RawInline("latex".to_string(), text.into())
    }
}

/// Element attributes: identifier, classes and key/value pairs.
///
/// Encoded as `[id, [classes], [[key, value]]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "AttrRepr", into = "AttrRepr")]
pub struct Attr {
    pub id: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

type AttrRepr = (String, Vec<String>, Vec<(String, String)>);

impl From<AttrRepr> for Attr {
    fn from((id, classes, attributes): AttrRepr) -> Self {
        Self {
            id,
            classes,
            attributes,
        }
    }
}

impl From<Attr> for AttrRepr {
    fn from(attr: Attr) -> Self {
        (attr.id, attr.classes, attr.attributes)
    }
}

impl Attr {
    pub fn new(id: impl Into<String>, classes: Vec<String>) -> Self {
        Self {
            id: id.into(),
            classes,
            attributes: Vec::new(),
        }
    }

    pub fn with_class(class: impl Into<String>) -> Self {
        Self::new(String::new(), vec![class.into()])
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Link or image target: `(url, title)`.
pub type Target = (String, String);

/// Ordered list attributes: `(start, style, delimiter)`.
pub type ListAttributes = (i32, ListNumberStyle, ListNumberDelim);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum MathType {
    DisplayMath,
    InlineMath,
}

/// Figure caption: optional short caption plus the full caption blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption(pub Option<Vec<Inline>>, pub Vec<Block>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub citation_id: String,
    pub citation_prefix: Vec<Inline>,
    pub citation_suffix: Vec<Inline>,
    pub citation_mode: CitationMode,
    pub citation_note_num: i64,
    pub citation_hash: i64,
}

impl Citation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            citation_id: id.into(),
            citation_prefix: Vec::new(),
            citation_suffix: Vec::new(),
            citation_mode: CitationMode::NormalCitation,
            citation_note_num: 0,
            citation_hash: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    NormalCitation,
}

/// Flatten inlines to plain text, dropping formatting, notes and raw markup.
pub fn stringify(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_inlines(inlines, &mut out);
    out
}

/// Flatten blocks to plain text; blocks are separated by a single space.
pub fn stringify_blocks(blocks: &[Block]) -> String {
    let mut parts = Vec::new();
    for block in blocks {
        let text = match block {
            Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
                stringify(inlines)
            }
            Block::LineBlock(lines) => lines
                .iter()
                .map(|line| stringify(line))
                .collect::<Vec<_>>()
                .join(" "),
            Block::CodeBlock(_, code) => code.clone(),
            Block::BlockQuote(inner) | Block::Div(_, inner) | Block::Figure(_, _, inner) => {
                stringify_blocks(inner)
            }
            Block::BulletList(items) | Block::OrderedList(_, items) => items
                .iter()
                .map(|item| stringify_blocks(item))
                .collect::<Vec<_>>()
                .join(" "),
            Block::DefinitionList(items) => items
                .iter()
                .map(|(term, defs)| {
                    let mut text = stringify(term);
                    for def in defs {
                        text.push(' ');
                        text.push_str(&stringify_blocks(def));
                    }
                    text
                })
                .collect::<Vec<_>>()
                .join(" "),
            Block::RawBlock(..) | Block::HorizontalRule | Block::Table(_) => String::new(),
        };
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ")
}

fn push_plain_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Str(s) => out.push_str(s),
            Inline::Space | Inline::SoftBreak | Inline::LineBreak => out.push(' '),
            Inline::Code(_, code) => out.push_str(code),
            Inline::Math(_, math) => out.push_str(math),
            Inline::Quoted(kind, inner) => {
                let quote = match kind {
                    QuoteType::SingleQuote => '\'',
                    QuoteType::DoubleQuote => '"',
                };
                out.push(quote);
                push_plain_inlines(inner, out);
                out.push(quote);
            }
            Inline::Emph(inner)
            | Inline::Underline(inner)
            | Inline::Strong(inner)
            | Inline::Strikeout(inner)
            | Inline::Superscript(inner)
            | Inline::Subscript(inner)
            | Inline::SmallCaps(inner)
            | Inline::Cite(_, inner)
            | Inline::Link(_, inner, _)
            | Inline::Image(_, inner, _)
            | Inline::Span(_, inner) => push_plain_inlines(inner, out),
            Inline::RawInline(..) | Inline::Note(_) => {}
        }
    }
}
