//! Render environment blocks.
//!
//! A `Div` whose identifier starts with `<key>-` for a registered key becomes
//! an instance of that environment. A leading level-2 header is taken as the
//! instance title.

use log::debug;
use thmenv_ast::{Attr, Block, BlockRewrite, Inline};
use thmenv_latex::{begin_environment, end_environment};

use crate::format::OutputFormat;
use crate::registry::{EnvironmentDefinition, Registry};

pub const THEOREM_CLASS: &str = "theorem";
pub const THEOREM_TITLE_CLASS: &str = "theorem-title";

const TITLE_HEADER_LEVEL: i32 = 2;

/// Rewrite one block. Blocks that are not environment instances come back
/// as [`BlockRewrite::Unchanged`].
pub fn render_block(block: Block, registry: &mut Registry, format: OutputFormat) -> BlockRewrite {
    let (attr, content) = match block {
        Block::Div(attr, content) => (attr, content),
        other => return BlockRewrite::Unchanged(other),
    };
    let Some(definition) = registry.match_id(&attr.id).cloned() else {
        return BlockRewrite::Unchanged(Block::Div(attr, content));
    };

    let number = if definition.numbered {
        registry.assign_number(&definition.key, &attr.id)
    } else {
        None
    };
    debug!(
        "{} `{}` -> {}",
        definition.key,
        attr.id,
        number.as_deref().unwrap_or("unnumbered")
    );

    let (title, body) = split_title(content);
    match format {
        OutputFormat::Latex => {
            render_latex(&definition, &attr.id, number.is_some(), title.as_deref(), body)
        }
        OutputFormat::Html => render_html(&definition, attr, number.as_deref(), title, body),
    }
}

/// Split a leading level-2 header off as the title.
fn split_title(content: Vec<Block>) -> (Option<Vec<Inline>>, Vec<Block>) {
    let mut blocks = content.into_iter();
    match blocks.next() {
        Some(Block::Header(TITLE_HEADER_LEVEL, _, title)) => (Some(title), blocks.collect()),
        Some(first) => (None, std::iter::once(first).chain(blocks).collect()),
        None => (None, Vec::new()),
    }
}

fn render_latex(
    definition: &EnvironmentDefinition,
    id: &str,
    numbered: bool,
    title: Option<&[Inline]>,
    body: Vec<Block>,
) -> BlockRewrite {
    let label = numbered.then_some(id);
    let mut blocks = Vec::with_capacity(body.len() + 2);
    blocks.push(Block::raw_latex(begin_environment(
        &definition.output_name,
        title,
        label,
    )));
    blocks.extend(body);
    blocks.push(Block::raw_latex(end_environment(&definition.output_name)));
    BlockRewrite::Spliced(blocks)
}

fn render_html(
    definition: &EnvironmentDefinition,
    attr: Attr,
    number: Option<&str>,
    title: Option<Vec<Inline>>,
    mut body: Vec<Block>,
) -> BlockRewrite {
    let heading = title_span(definition, number, title);

    let mut blocks = Vec::with_capacity(body.len() + 1);
    match body.first_mut() {
        Some(Block::Para(inlines)) => {
            inlines.insert(0, Inline::Space);
            inlines.insert(0, heading);
        }
        _ => blocks.push(Block::Para(vec![heading])),
    }
    blocks.extend(body);

    BlockRewrite::Replaced(Block::Div(container_attr(attr), blocks))
}

/// `<span class="theorem-title"><strong>Name N (Title)</strong></span>`
fn title_span(
    definition: &EnvironmentDefinition,
    number: Option<&str>,
    title: Option<Vec<Inline>>,
) -> Inline {
    let mut label = vec![Inline::text(definition.display_name.as_str())];
    if let Some(number) = number {
        label.push(Inline::Space);
        label.push(Inline::text(number));
    }
    if let Some(title) = title {
        label.push(Inline::Space);
        label.push(Inline::text("("));
        label.extend(title);
        label.push(Inline::text(")"));
    }
    Inline::Span(
        Attr::with_class(THEOREM_TITLE_CLASS),
        vec![Inline::Strong(label)],
    )
}

/// Keep the id and attributes, put `theorem` first among the classes.
fn container_attr(attr: Attr) -> Attr {
    let mut classes = Vec::with_capacity(attr.classes.len() + 1);
    classes.push(THEOREM_CLASS.to_string());
    classes.extend(attr.classes.into_iter().filter(|c| c != THEOREM_CLASS));
    Attr {
        id: attr.id,
        classes,
        attributes: attr.attributes,
    }
}
