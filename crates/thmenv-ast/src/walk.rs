//! Bottom-up tree traversal.
//!
//! Children are rewritten before their parent, siblings in document order.
//! A node produced by a rewrite is never visited again in the same walk.

use crate::{Block, Caption, Inline};

/// Result of rewriting a single block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockRewrite {
    Unchanged(Block),
    Replaced(Block),
    Spliced(Vec<Block>),
}

impl BlockRewrite {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, BlockRewrite::Unchanged(_))
    }

    pub fn into_blocks(self) -> Vec<Block> {
        match self {
            BlockRewrite::Unchanged(block) | BlockRewrite::Replaced(block) => vec![block],
            BlockRewrite::Spliced(blocks) => blocks,
        }
    }

    fn append_to(self, out: &mut Vec<Block>) {
        match self {
            BlockRewrite::Unchanged(block) | BlockRewrite::Replaced(block) => out.push(block),
            BlockRewrite::Spliced(blocks) => out.extend(blocks),
        }
    }
}

/// Callbacks invoked by the walk. Both default to the identity.
pub trait Visitor {
    fn visit_block(&mut self, block: Block) -> BlockRewrite {
        BlockRewrite::Unchanged(block)
    }

    fn visit_inline(&mut self, inline: Inline) -> Inline {
        inline
    }
}

pub fn walk_blocks<V: Visitor + ?Sized>(blocks: Vec<Block>, visitor: &mut V) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        let block = walk_block_children(block, visitor);
        visitor.visit_block(block).append_to(&mut out);
    }
    out
}

pub fn walk_inlines<V: Visitor + ?Sized>(inlines: Vec<Inline>, visitor: &mut V) -> Vec<Inline> {
    inlines
        .into_iter()
        .map(|inline| {
            let inline = walk_inline_children(inline, visitor);
            visitor.visit_inline(inline)
        })
        .collect()
}

fn walk_block_children<V: Visitor + ?Sized>(block: Block, visitor: &mut V) -> Block {
    match block {
        Block::Plain(inlines) => Block::Plain(walk_inlines(inlines, visitor)),
        Block::Para(inlines) => Block::Para(walk_inlines(inlines, visitor)),
        Block::LineBlock(lines) => Block::LineBlock(
            lines
                .into_iter()
                .map(|line| walk_inlines(line, visitor))
                .collect(),
        ),
        Block::BlockQuote(blocks) => Block::BlockQuote(walk_blocks(blocks, visitor)),
        Block::OrderedList(attrs, items) => {
            Block::OrderedList(attrs, walk_items(items, visitor))
        }
        Block::BulletList(items) => Block::BulletList(walk_items(items, visitor)),
        Block::DefinitionList(items) => Block::DefinitionList(
            items
                .into_iter()
                .map(|(term, defs)| {
                    let term = walk_inlines(term, visitor);
                    (term, walk_items(defs, visitor))
                })
                .collect(),
        ),
        Block::Header(level, attr, inlines) => {
            Block::Header(level, attr, walk_inlines(inlines, visitor))
        }
        Block::Figure(attr, Caption(short, long), body) => {
            let short = short.map(|inlines| walk_inlines(inlines, visitor));
            let long = walk_blocks(long, visitor);
            Block::Figure(attr, Caption(short, long), walk_blocks(body, visitor))
        }
        Block::Div(attr, blocks) => Block::Div(attr, walk_blocks(blocks, visitor)),
        other @ (Block::CodeBlock(..)
        | Block::RawBlock(..)
        | Block::HorizontalRule
        | Block::Table(_)) => other,
    }
}

fn walk_items<V: Visitor + ?Sized>(items: Vec<Vec<Block>>, visitor: &mut V) -> Vec<Vec<Block>> {
    items
        .into_iter()
        .map(|item| walk_blocks(item, visitor))
        .collect()
}

fn walk_inline_children<V: Visitor + ?Sized>(inline: Inline, visitor: &mut V) -> Inline {
    match inline {
        Inline::Emph(inner) => Inline::Emph(walk_inlines(inner, visitor)),
        Inline::Underline(inner) => Inline::Underline(walk_inlines(inner, visitor)),
        Inline::Strong(inner) => Inline::Strong(walk_inlines(inner, visitor)),
        Inline::Strikeout(inner) => Inline::Strikeout(walk_inlines(inner, visitor)),
        Inline::Superscript(inner) => Inline::Superscript(walk_inlines(inner, visitor)),
        Inline::Subscript(inner) => Inline::Subscript(walk_inlines(inner, visitor)),
        Inline::SmallCaps(inner) => Inline::SmallCaps(walk_inlines(inner, visitor)),
        Inline::Quoted(kind, inner) => Inline::Quoted(kind, walk_inlines(inner, visitor)),
        Inline::Cite(citations, inner) => {
            let citations = citations
                .into_iter()
                .map(|mut citation| {
                    citation.citation_prefix =
                        walk_inlines(std::mem::take(&mut citation.citation_prefix), visitor);
                    citation.citation_suffix =
                        walk_inlines(std::mem::take(&mut citation.citation_suffix), visitor);
                    citation
                })
                .collect();
            Inline::Cite(citations, walk_inlines(inner, visitor))
        }
        Inline::Link(attr, inner, target) => {
            Inline::Link(attr, walk_inlines(inner, visitor), target)
        }
        Inline::Image(attr, inner, target) => {
            Inline::Image(attr, walk_inlines(inner, visitor), target)
        }
        Inline::Note(blocks) => Inline::Note(walk_blocks(blocks, visitor)),
        Inline::Span(attr, inner) => Inline::Span(attr, walk_inlines(inner, visitor)),
        other @ (Inline::Str(_)
        | Inline::Code(..)
        | Inline::Space
        | Inline::SoftBreak
        | Inline::LineBreak
        | Inline::Math(..)
        | Inline::RawInline(..)) => other,
    }
}
