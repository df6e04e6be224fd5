//! End-to-end tests for the Pandoc JSON filter.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use thmenv::ast::{stringify, Attr, Block, Inline, MetaValue, Pandoc};
use thmenv::{
    apply, environments_from_yaml, filter_json, parse_document, FilterError, FilterOptions,
    OutputFormat, DEFAULT_METADATA_KEY,
};

fn read_fixture(path: &str) -> String {
    fs::read_to_string(Path::new(path)).expect("fixture missing")
}

fn load(path: &str) -> Pandoc {
    parse_document(&read_fixture(path)).expect("fixture should parse")
}

fn run(path: &str, format: OutputFormat) -> (Pandoc, thmenv::FilterReport) {
    apply(load(path), format, &FilterOptions::default())
}

fn xref(text: &str, id: &str) -> Inline {
    Inline::Link(
        Attr::with_class("quarto-xref"),
        vec![Inline::text(text)],
        (format!("#{}", id), String::new()),
    )
}

fn div_parts(block: &Block) -> (&Attr, &Vec<Block>) {
    match block {
        Block::Div(attr, blocks) => (attr, blocks),
        other => panic!("expected Div, got {:?}", other),
    }
}

fn title_of(blocks: &[Block]) -> String {
    let Some(Block::Para(inlines)) = blocks.first() else {
        panic!("expected leading paragraph");
    };
    match &inlines[0] {
        Inline::Span(attr, inner) if attr.has_class("theorem-title") => {
            assert!(matches!(inner.as_slice(), [Inline::Strong(_)]));
            stringify(inner)
        }
        other => panic!("expected title span, got {:?}", other),
    }
}

mod html {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn environments_render_as_theorem_divs() {
        let (doc, report) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Html);

        let (attr, blocks) = div_parts(&doc.blocks[1]);
        assert_eq!(attr.id, "thm-cats");
        assert_eq!(attr.classes, vec!["theorem"]);
        assert_eq!(title_of(blocks), "Theorem 1");
        let Block::Para(inlines) = &blocks[0] else {
            unreachable!()
        };
        assert_eq!(stringify(&inlines[2..]), "All cats are mammals.");

        let (_, blocks) = div_parts(&doc.blocks[2]);
        assert_eq!(title_of(blocks), "Theorem 2 (Dogs)");
        assert_eq!(blocks.len(), 1);

        let (attr, blocks) = div_parts(&doc.blocks[3]);
        assert_eq!(attr.classes, vec!["theorem", "important"]);
        assert_eq!(title_of(blocks), "Conjecture 1");

        let (_, blocks) = div_parts(&doc.blocks[4]);
        assert_eq!(title_of(blocks), "Remark");
        assert!(matches!(blocks[1], Block::BulletList(_)));

        assert_eq!(report.rendered_blocks, 4);
        assert_eq!(report.environments, vec!["thm", "conj", "rem"]);
    }

    #[test]
    fn unrelated_div_is_untouched() {
        let original = load("tests/fixtures/pandoc/theorems.json");
        let (doc, _) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Html);
        assert_eq!(doc.blocks[5], original.blocks[5]);
    }

    #[test]
    fn references_resolve_to_links() {
        let (doc, report) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Html);

        let Block::Para(first) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        // Numbers are assigned in a full pass before references are resolved.
        assert_eq!(first[6], xref("Theorem\u{a0}1", "thm-cats"));

        let Block::Para(refs) = &doc.blocks[6] else {
            panic!("expected paragraph");
        };
        assert_eq!(refs[0], xref("Theorem\u{a0}2", "thm-dogs"));
        assert!(matches!(&refs[4], Inline::Cite(c, _) if c[0].citation_id == "knuth84"));
        assert_eq!(refs[8], xref("Theorem\u{a0}?", "thm-missing"));
        assert_eq!(refs[12], xref("Conjecture\u{a0}1", "conj-birds"));

        assert_eq!(report.resolved_references, 4);
        assert_eq!(report.unresolved_references, vec!["thm-missing"]);
    }

    #[test]
    fn meta_is_left_alone() {
        let original = load("tests/fixtures/pandoc/theorems.json");
        let (doc, _) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Html);
        assert_eq!(doc.meta, original.meta);
    }
}

mod latex {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn environments_render_as_raw_markers() {
        let (doc, _) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Latex);
        let raw: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::RawBlock(format, text) if format == "latex" => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            raw,
            vec![
                "\\begin{theorem}\\label{thm-cats}",
                "\\end{theorem}",
                "\\begin{theorem}[Dogs]\\label{thm-dogs}",
                "\\end{theorem}",
                "\\begin{conjecture}\\label{conj-birds}",
                "\\end{conjecture}",
                "\\begin{remark}",
                "\\end{remark}",
            ]
        );
        assert_eq!(doc.blocks.len(), 15);
        assert_eq!(
            doc.blocks[5],
            Block::Para(vec![
                Inline::text("Dogs"),
                Inline::Space,
                Inline::text("bark."),
            ])
        );
    }

    #[test]
    fn references_become_ref_commands() {
        let (doc, _) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Latex);
        let Block::Para(first) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(first[6], Inline::raw_latex("Theorem~\\ref{thm-cats}"));

        let Some(Block::Para(refs)) = doc.blocks.last() else {
            panic!("expected paragraph");
        };
        assert_eq!(refs[0], Inline::raw_latex("Theorem~\\ref{thm-dogs}"));
        assert_eq!(refs[8], Inline::raw_latex("Theorem~\\ref{thm-missing}"));
        assert_eq!(refs[12], Inline::raw_latex("Conjecture~\\ref{conj-birds}"));
    }

    #[test]
    fn declarations_merge_into_header_includes() {
        let (doc, _) = run("tests/fixtures/pandoc/theorems.json", OutputFormat::Latex);
        let Some(MetaValue::MetaList(items)) = doc.meta.get("header-includes") else {
            panic!("header-includes should be a list");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], MetaValue::MetaInlines(_)));
        assert_eq!(
            items[1],
            MetaValue::MetaBlocks(vec![Block::raw_latex(
                "\\usepackage{amsthm}\n\
                 \\newtheorem{theorem}{Theorem}[section]\n\
                 \\newtheorem{conjecture}{Conjecture}\n\
                 \\newtheorem*{remark}{Remark}"
            )])
        );
    }
}

mod passthrough {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn document_without_declarations_round_trips() {
        let input = read_fixture("tests/fixtures/pandoc/plain.json");
        for format in [OutputFormat::Html, OutputFormat::Latex] {
            let output = filter_json(&input, format, &FilterOptions::default()).unwrap();
            let before: serde_json::Value = serde_json::from_str(&input).unwrap();
            let after: serde_json::Value = serde_json::from_str(&output).unwrap();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn unsupported_api_version_is_rejected() {
        let input = r#"{"pandoc-api-version":[2,0],"meta":{},"blocks":[]}"#;
        let err = filter_json(input, OutputFormat::Html, &FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedApiVersion { .. }));
    }

    #[test]
    fn api_versions_before_null_block_removal_are_rejected() {
        let old = r#"{"pandoc-api-version":[1,22,2],"meta":{},"blocks":[]}"#;
        let err = filter_json(old, OutputFormat::Html, &FilterOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnsupportedApiVersion { ref found, .. } if found == &vec![1, 22, 2]
        ));

        let newer = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#;
        assert!(filter_json(newer, OutputFormat::Html, &FilterOptions::default()).is_ok());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = filter_json("{\"blocks\":", OutputFormat::Html, &FilterOptions::default())
            .unwrap_err();
        assert!(matches!(err, FilterError::Json(_)));
    }
}

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fallback_environments_apply_when_document_has_none() {
        let yaml = read_fixture("tests/fixtures/config/environments.yaml");
        let environments = environments_from_yaml(&yaml, DEFAULT_METADATA_KEY).unwrap();
        let options = FilterOptions::default().with_fallback_environments(environments);

        let doc = Pandoc::new(
            Default::default(),
            vec![
                Block::Div(
                    Attr::new("lem-a", Vec::new()),
                    vec![Block::Para(vec![Inline::text("x")])],
                ),
                Block::Para(vec![Inline::Cite(
                    vec![thmenv::ast::Citation::new("lem-a")],
                    vec![Inline::text("@lem-a")],
                )]),
            ],
        );
        let (doc, report) = apply(doc, OutputFormat::Latex, &options);
        assert_eq!(report.environments, vec!["lem", "defn"]);
        assert!(doc.meta.get(DEFAULT_METADATA_KEY).is_none());
        assert_eq!(
            doc.blocks[0],
            Block::raw_latex("\\begin{lemma}\\label{lem-a}")
        );
        assert_eq!(
            doc.blocks[3],
            Block::Para(vec![Inline::raw_latex("Lem.~\\ref{lem-a}")])
        );
        let Some(MetaValue::MetaList(items)) = doc.meta.get("header-includes") else {
            panic!("header-includes should be a list");
        };
        let MetaValue::MetaBlocks(blocks) = &items[0] else {
            panic!("expected raw block");
        };
        assert_eq!(
            blocks[0],
            Block::raw_latex(
                "\\usepackage{amsthm}\n\
                 \\newtheorem{lemma}{Lemma}[section]\n\
                 \\newtheorem{definition}{Definition}"
            )
        );
    }

    #[test]
    fn custom_metadata_key() {
        let mut doc = load("tests/fixtures/pandoc/theorems.json");
        let section = doc.meta.shift_remove(DEFAULT_METADATA_KEY).unwrap();
        doc.meta.insert("my-theorems".to_string(), section);

        let options = FilterOptions::default().with_metadata_key("my-theorems");
        let (_, report) = apply(doc.clone(), OutputFormat::Html, &options);
        assert_eq!(report.rendered_blocks, 4);

        let (_, report) = apply(doc, OutputFormat::Html, &FilterOptions::default());
        assert!(report.environments.is_empty());
        assert!(report.is_empty());
    }
}

mod nesting {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inner_environment_is_numbered_first() {
        let mut meta = thmenv::ast::Meta::new();
        meta.insert(
            DEFAULT_METADATA_KEY.to_string(),
            MetaValue::MetaList(vec![MetaValue::MetaMap(
                [("key".to_string(), MetaValue::MetaString("thm".to_string()))]
                    .into_iter()
                    .collect(),
            )]),
        );
        let doc = Pandoc::new(
            meta,
            vec![Block::Div(
                Attr::new("thm-outer", Vec::new()),
                vec![Block::Div(
                    Attr::new("thm-inner", Vec::new()),
                    vec![Block::Para(vec![Inline::text("x")])],
                )],
            )],
        );
        let (doc, _) = apply(doc, OutputFormat::Html, &FilterOptions::default());
        let (_, outer) = div_parts(&doc.blocks[0]);
        assert_eq!(title_of(outer), "thm 2");
        let (_, inner) = div_parts(&outer[1]);
        assert_eq!(title_of(inner), "thm 1");
    }
}
