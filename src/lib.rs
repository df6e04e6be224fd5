//! # thmenv
//!
//! Custom theorem-like environments for Pandoc documents.
//!
//! Environments are declared in document metadata:
//!
//! ```yaml
//! theorem-environments:
//!   - key: thm
//!     name: Theorem
//!   - key: conj
//!     name: Conjecture
//!     numbering-style: global
//! ```
//!
//! A div with identifier `thm-...` then renders as a numbered theorem, and a
//! citation `@thm-...` as a reference to it. LaTeX targets get `amsthm`
//! environments and `\ref`; every other target gets a `theorem` container
//! and a link carrying the number.
//!
//! ## Usage
//!
//! As a Pandoc JSON filter:
//!
//! ```text
//! pandoc paper.md --filter thmenv -o paper.html
//! ```
//!
//! As a library:
//!
//! ```no_run
//! use thmenv::{filter_json, FilterOptions, OutputFormat};
//!
//! let input = std::fs::read_to_string("paper.json").unwrap();
//! let output = filter_json(&input, OutputFormat::Latex, &FilterOptions::default()).unwrap();
//! ```
//!
//! The three passes are also usable on their own, for hosts that drive the
//! traversal themselves: [`registrar::register`], [`render::render_block`]
//! and [`xref::resolve_reference`].

pub mod config;
pub mod filter;
pub mod format;
pub mod registrar;
pub mod registry;
pub mod render;
pub mod utils;
pub mod xref;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use thmenv_ast as ast;

pub use config::{environments_from_yaml, FilterOptions};
pub use filter::{apply, filter_json, filter_json_with_report, parse_document};
pub use format::OutputFormat;
pub use registrar::{register, DEFAULT_METADATA_KEY};
pub use registry::{EnvironmentDefinition, NumberingScope, Registry};
pub use render::render_block;
pub use utils::{FilterError, FilterReport, FilterResult};
pub use xref::resolve_reference;
