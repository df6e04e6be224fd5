//! Resolve citations that point at environment instances.

use log::debug;
use thmenv_ast::{Attr, Inline};
use thmenv_latex::reference;

use crate::format::OutputFormat;
use crate::registry::{EnvironmentDefinition, Registry};

pub const XREF_CLASS: &str = "quarto-xref";

/// Shown in place of a number that was never assigned.
pub const UNRESOLVED_NUMBER: &str = "?";

/// Replace a `Cite` whose first matching target is an environment instance.
///
/// Only the first matching citation is kept; the rest of the node is dropped.
/// Anything else is returned unchanged.
pub fn resolve_reference(inline: Inline, registry: &Registry, format: OutputFormat) -> Inline {
    let Some((id, definition)) = first_match(&inline, registry) else {
        return inline;
    };

    match format {
        OutputFormat::Latex => Inline::raw_latex(reference(&definition.reference_prefix, id)),
        OutputFormat::Html => {
            let number = registry.number_for(&definition.key, id).unwrap_or_else(|| {
                debug!("reference to `{}` has no recorded number", id);
                UNRESOLVED_NUMBER
            });
            Inline::Link(
                Attr::with_class(XREF_CLASS),
                vec![Inline::text(format!(
                    "{}\u{a0}{}",
                    definition.reference_prefix, number
                ))],
                (format!("#{}", id), String::new()),
            )
        }
    }
}

/// Target of the first citation in `inline` that names an environment
/// instance without a recorded number.
pub fn unresolved_target(inline: &Inline, registry: &Registry) -> Option<String> {
    let (id, definition) = first_match(inline, registry)?;
    match registry.number_for(&definition.key, id) {
        Some(_) => None,
        None => Some(id.to_string()),
    }
}

fn first_match<'a>(
    inline: &'a Inline,
    registry: &'a Registry,
) -> Option<(&'a str, &'a EnvironmentDefinition)> {
    let Inline::Cite(citations, _) = inline else {
        return None;
    };
    citations.iter().find_map(|citation| {
        registry
            .match_id(&citation.citation_id)
            .map(|def| (citation.citation_id.as_str(), def))
    })
}
