//! Build the registry from document metadata.
//!
//! Declarations live under a single metadata entry (by default
//! `theorem-environments`) as a list of maps:
//!
//! ```yaml
//! theorem-environments:
//!   - key: thm
//!     name: Theorem
//!   - key: rem
//!     name: Remark
//!     numbered: false
//! ```
//!
//! For LaTeX output the matching `\newtheorem` declarations are appended to
//! `header-includes`.

use fxhash::FxHashSet;
use indexmap::IndexMap;
use log::{debug, info, warn};
use thmenv_ast::{Block, Meta, MetaValue};
use thmenv_latex::{
    render_theorem_declarations, sanitize_env_name, DeclarationNumbering, TheoremDeclaration,
};

use crate::format::OutputFormat;
use crate::registry::{EnvironmentDefinition, NumberingScope, Registry};

pub const DEFAULT_METADATA_KEY: &str = "theorem-environments";
pub const HEADER_INCLUDES: &str = "header-includes";

/// Read declarations from `meta[metadata_key]` and, for LaTeX, inject the
/// preamble into `header-includes`.
pub fn register(meta: Meta, format: OutputFormat, metadata_key: &str) -> (Meta, Registry) {
    register_with_fallback(meta, format, metadata_key, None)
}

/// Like [`register`], reading declarations from `fallback` when the document
/// has none. The fallback is never copied into the returned metadata.
pub fn register_with_fallback(
    mut meta: Meta,
    format: OutputFormat,
    metadata_key: &str,
    fallback: Option<&MetaValue>,
) -> (Meta, Registry) {
    let mut registry = Registry::new();
    let Some(section) = meta.get(metadata_key).or(fallback) else {
        debug!("no `{}` metadata; no environments registered", metadata_key);
        return (meta, registry);
    };

    for definition in read_definitions(section) {
        let key = definition.key.clone();
        if registry.insert(definition).is_some() {
            warn!("environment `{}` declared twice; keeping the last declaration", key);
        }
    }
    info!(
        "registered {} environment(s): {}",
        registry.len(),
        registry
            .definitions()
            .map(|def| def.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if format.is_latex() && !registry.is_empty() {
        let preamble = render_theorem_declarations(&declarations(&registry));
        merge_header_includes(
            &mut meta,
            MetaValue::MetaBlocks(vec![Block::raw_latex(preamble)]),
        );
    }
    (meta, registry)
}

/// Parse every declaration in a metadata section, skipping unusable entries.
pub fn read_definitions(section: &MetaValue) -> Vec<EnvironmentDefinition> {
    let entries: Vec<&MetaValue> = match section {
        MetaValue::MetaList(items) => items.iter().collect(),
        MetaValue::MetaMap(_) => vec![section],
        other => {
            warn!("ignoring environment declarations of unexpected shape: {:?}", other);
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let Some(fields) = entry.as_map() else {
                warn!("environment declaration #{} is not a map; skipped", idx + 1);
                return None;
            };
            let definition = parse_definition(fields);
            if definition.is_none() {
                warn!("environment declaration #{} has no `key`; skipped", idx + 1);
            }
            definition
        })
        .collect()
}

/// Build a definition from one declaration map, defaulting absent fields.
pub fn parse_definition(fields: &IndexMap<String, MetaValue>) -> Option<EnvironmentDefinition> {
    let text = |name: &str| {
        fields
            .get(name)
            .and_then(MetaValue::as_plain_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let key = text("key")?;
    let display_name = text("name").unwrap_or_else(|| key.clone());
    let reference_prefix = text("reference-prefix").unwrap_or_else(|| display_name.clone());
    let output_name = text("latex-name").unwrap_or_else(|| {
        let derived = sanitize_env_name(&display_name);
        if derived.is_empty() {
            sanitize_env_name(&key)
        } else {
            derived
        }
    });
    let numbered = fields.get("numbered").and_then(parse_bool).unwrap_or(true);
    let numbering_scope = match text("numbering-style") {
        Some(raw) => NumberingScope::parse(&raw).unwrap_or_else(|| {
            warn!("unknown numbering-style `{}` for `{}`; using section", raw, key);
            NumberingScope::Section
        }),
        None => NumberingScope::Section,
    };

    Some(EnvironmentDefinition {
        key,
        display_name,
        reference_prefix,
        output_name,
        numbered,
        numbering_scope,
    })
}

fn parse_bool(value: &MetaValue) -> Option<bool> {
    if let MetaValue::MetaBool(b) = value {
        return Some(*b);
    }
    match value.as_plain_text()?.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn declarations(registry: &Registry) -> Vec<TheoremDeclaration> {
    for name in clashing_output_names(registry) {
        warn!(
            "several environments use the LaTeX name `{}`; set `latex-name` to tell them apart",
            name
        );
    }
    registry
        .definitions()
        .map(|def| TheoremDeclaration {
            env_name: def.output_name.clone(),
            display_name: def.display_name.clone(),
            numbering: match (def.numbered, def.numbering_scope) {
                (false, _) => DeclarationNumbering::Unnumbered,
                (true, NumberingScope::Section) => DeclarationNumbering::WithinSection,
                (true, NumberingScope::Global) => DeclarationNumbering::Continuous,
            },
        })
        .collect()
}

/// LaTeX environment names claimed by more than one definition.
fn clashing_output_names(registry: &Registry) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut clashes = Vec::new();
    for def in registry.definitions() {
        if !seen.insert(def.output_name.as_str()) && !clashes.contains(&def.output_name) {
            clashes.push(def.output_name.clone());
        }
    }
    clashes
}

/// Append `addition` to `header-includes`, keeping whatever is already there.
pub fn merge_header_includes(meta: &mut Meta, addition: MetaValue) {
    let merged = match meta.shift_remove(HEADER_INCLUDES) {
        None => MetaValue::MetaList(vec![addition]),
        Some(MetaValue::MetaList(mut items)) => {
            items.push(addition);
            MetaValue::MetaList(items)
        }
        Some(single) => MetaValue::MetaList(vec![single, addition]),
    };
    meta.insert(HEADER_INCLUDES.to_string(), merged);
}
