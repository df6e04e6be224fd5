//! Output target selection.

use phf::phf_set;

/// Writers that receive LaTeX markup.
static LATEX_WRITERS: phf::Set<&'static str> = phf_set! {
    "latex",
    "beamer",
    "pdf",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Latex,
    /// Every non-LaTeX writer is treated as HTML-like.
    #[default]
    Html,
}

impl OutputFormat {
    /// Classify a writer name such as `latex`, `html5` or `beamer+raw_tex`.
    pub fn from_writer(name: &str) -> Self {
        let base = name
            .split(['+', '-'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if LATEX_WRITERS.contains(base.as_str()) {
            OutputFormat::Latex
        } else {
            OutputFormat::Html
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Latex => "latex",
            OutputFormat::Html => "html",
        }
    }

    pub fn is_latex(self) -> bool {
        self == OutputFormat::Latex
    }
}
