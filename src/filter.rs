//! Pandoc JSON filter pipeline.
//!
//! Runs the three passes in order over one document: metadata registration,
//! environment blocks, then references. Blocks are numbered in a full pass
//! before any reference is resolved.

use log::info;
use thmenv_ast::{walk_blocks, Block, BlockRewrite, Inline, Pandoc, Visitor};

use crate::config::FilterOptions;
use crate::format::OutputFormat;
use crate::registrar::register_with_fallback;
use crate::registry::Registry;
use crate::render::render_block;
use crate::utils::error::{FilterError, FilterResult};
use crate::utils::report::FilterReport;
use crate::xref::{resolve_reference, unresolved_target};

/// Oldest `pandoc-api-version` this filter understands. Earlier 1.x
/// versions still carry the `Null` block.
pub const MIN_API_VERSION: [u32; 2] = [1, 23];
/// Major `pandoc-api-version` this filter understands.
pub const SUPPORTED_API_MAJOR: u32 = 1;

struct BlockPass<'a> {
    registry: &'a mut Registry,
    format: OutputFormat,
    rendered: usize,
}

impl Visitor for BlockPass<'_> {
    fn visit_block(&mut self, block: Block) -> BlockRewrite {
        let rewrite = render_block(block, self.registry, self.format);
        if !rewrite.is_unchanged() {
            self.rendered += 1;
        }
        rewrite
    }
}

struct ReferencePass<'a> {
    registry: &'a Registry,
    format: OutputFormat,
    resolved: usize,
    unresolved: Vec<String>,
}

impl Visitor for ReferencePass<'_> {
    fn visit_inline(&mut self, inline: Inline) -> Inline {
        if !matches!(inline, Inline::Cite(..)) {
            return inline;
        }
        if self.format == OutputFormat::Html {
            if let Some(id) = unresolved_target(&inline, self.registry) {
                self.unresolved.push(id);
            }
        }
        let out = resolve_reference(inline, self.registry, self.format);
        if !matches!(out, Inline::Cite(..)) {
            self.resolved += 1;
        }
        out
    }
}

/// Run all passes over `doc`.
pub fn apply(doc: Pandoc, format: OutputFormat, options: &FilterOptions) -> (Pandoc, FilterReport) {
    let Pandoc {
        api_version,
        meta,
        blocks,
    } = doc;

    let (meta, mut registry) = register_with_fallback(
        meta,
        format,
        &options.metadata_key,
        options.fallback_environments.as_ref(),
    );
    let mut report = FilterReport::new(format.as_str());
    report.environments = registry.definitions().map(|def| def.key.clone()).collect();
    if registry.is_empty() {
        return (
            Pandoc {
                api_version,
                meta,
                blocks,
            },
            report,
        );
    }

    let mut block_pass = BlockPass {
        registry: &mut registry,
        format,
        rendered: 0,
    };
    let blocks = walk_blocks(blocks, &mut block_pass);
    report.rendered_blocks = block_pass.rendered;

    let mut reference_pass = ReferencePass {
        registry: &registry,
        format,
        resolved: 0,
        unresolved: Vec::new(),
    };
    let blocks = walk_blocks(blocks, &mut reference_pass);
    report.resolved_references = reference_pass.resolved;
    report.unresolved_references = reference_pass.unresolved;

    info!(
        "rendered {} block(s), resolved {} reference(s)",
        report.rendered_blocks, report.resolved_references
    );
    (
        Pandoc {
            api_version,
            meta,
            blocks,
        },
        report,
    )
}

/// Decode a Pandoc JSON document, checking its API version.
pub fn parse_document(input: &str) -> FilterResult<Pandoc> {
    let doc: Pandoc = serde_json::from_str(input)?;
    if !is_supported_api_version(&doc.api_version) {
        return Err(FilterError::UnsupportedApiVersion {
            found: doc.api_version,
            expected: MIN_API_VERSION.to_vec(),
        });
    }
    Ok(doc)
}

fn is_supported_api_version(version: &[u32]) -> bool {
    match version {
        [major, minor, ..] => *major == SUPPORTED_API_MAJOR && *minor >= MIN_API_VERSION[1],
        _ => false,
    }
}

/// Filter a Pandoc JSON document and return the rewritten JSON.
pub fn filter_json(input: &str, format: OutputFormat, options: &FilterOptions) -> FilterResult<String> {
    filter_json_with_report(input, format, options, false).map(|(json, _)| json)
}

/// Like [`filter_json`], also returning the run report.
pub fn filter_json_with_report(
    input: &str,
    format: OutputFormat,
    options: &FilterOptions,
    pretty: bool,
) -> FilterResult<(String, FilterReport)> {
    let doc = parse_document(input)?;
    let (doc, report) = apply(doc, format, options);
    let json = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok((json, report))
}
