//! LaTeX fragments for amsthm environments.

use lazy_static::lazy_static;
use regex::Regex;
use thmenv_ast::{Inline, MathType, QuoteType};

lazy_static! {
    static ref NON_IDENT: Regex = Regex::new(r"[^A-Za-z0-9]+").unwrap();
}

/// How an environment is declared with `\newtheorem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationNumbering {
    /// `\newtheorem{name}{Title}[section]`
    WithinSection,
    /// `\newtheorem{name}{Title}`
    Continuous,
    /// `\newtheorem*{name}{Title}`
    Unnumbered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoremDeclaration {
    pub env_name: String,
    pub display_name: String,
    pub numbering: DeclarationNumbering,
}

/// Render the `amsthm` preamble for the given environments.
///
/// Returns an empty string when there is nothing to declare.
pub fn render_theorem_declarations(decls: &[TheoremDeclaration]) -> String {
    if decls.is_empty() {
        return String::new();
    }
    let mut lines = Vec::with_capacity(decls.len() + 1);
    lines.push("\\usepackage{amsthm}".to_string());
    for decl in decls {
        let display = escape_latex(&decl.display_name);
        let line = match decl.numbering {
            DeclarationNumbering::WithinSection => {
                format!("\\newtheorem{{{}}}{{{}}}[section]", decl.env_name, display)
            }
            DeclarationNumbering::Continuous => {
                format!("\\newtheorem{{{}}}{{{}}}", decl.env_name, display)
            }
            DeclarationNumbering::Unnumbered => {
                format!("\\newtheorem*{{{}}}{{{}}}", decl.env_name, display)
            }
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Opening marker: `\begin{name}[title]\label{label}`.
pub fn begin_environment(name: &str, title: Option<&[Inline]>, label: Option<&str>) -> String {
    let mut out = format!("\\begin{{{}}}", name);
    if let Some(title) = title {
        let title = normalize_inline_whitespace(&render_inlines(title));
        // A bare `]` would close the optional argument early.
        if title.contains(']') {
            out.push_str("[{");
            out.push_str(&title);
            out.push_str("}]");
        } else {
            out.push('[');
            out.push_str(&title);
            out.push(']');
        }
    }
    if let Some(label) = label {
        out.push_str("\\label{");
        out.push_str(label);
        out.push('}');
    }
    out
}

pub fn end_environment(name: &str) -> String {
    format!("\\end{{{}}}", name)
}

/// Cross-reference markup: `Prefix~\ref{label}`.
pub fn reference(prefix: &str, label: &str) -> String {
    format!("{}~\\ref{{{}}}", escape_latex(prefix), label)
}

/// Lowercased ASCII alphanumerics of `name`, usable as an environment name.
pub fn sanitize_env_name(name: &str) -> String {
    NON_IDENT.replace_all(name.trim(), "").to_lowercase()
}

/// Render inline content as LaTeX text.
pub fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Str(text) => out.push_str(&escape_latex(text)),
            Inline::Space | Inline::SoftBreak => out.push(' '),
            Inline::LineBreak => out.push_str("\\\\ "),
            Inline::Strong(inner) => wrap(&mut out, "\\textbf{", inner),
            Inline::Emph(inner) => wrap(&mut out, "\\emph{", inner),
            Inline::Underline(inner) => wrap(&mut out, "\\underline{", inner),
            Inline::SmallCaps(inner) => wrap(&mut out, "\\textsc{", inner),
            Inline::Superscript(inner) => wrap(&mut out, "\\textsuperscript{", inner),
            Inline::Subscript(inner) => wrap(&mut out, "\\textsubscript{", inner),
            Inline::Code(_, code) => {
                out.push_str("\\texttt{");
                out.push_str(&escape_latex(code));
                out.push('}');
            }
            Inline::Math(MathType::InlineMath, content) => {
                out.push('$');
                out.push_str(content);
                out.push('$');
            }
            Inline::Math(MathType::DisplayMath, content) => {
                out.push_str("\\[");
                out.push_str(content);
                out.push_str("\\]");
            }
            Inline::Quoted(QuoteType::SingleQuote, inner) => {
                out.push('`');
                out.push_str(&render_inlines(inner));
                out.push('\'');
            }
            Inline::Quoted(QuoteType::DoubleQuote, inner) => {
                out.push_str("``");
                out.push_str(&render_inlines(inner));
                out.push_str("''");
            }
            Inline::RawInline(format, text) => {
                if is_latex_format(format) {
                    out.push_str(text);
                }
            }
            Inline::Strikeout(inner)
            | Inline::Span(_, inner)
            | Inline::Link(_, inner, _)
            | Inline::Cite(_, inner) => out.push_str(&render_inlines(inner)),
            Inline::Image(..) | Inline::Note(_) => {}
        }
    }
    out
}

fn wrap(out: &mut String, open: &str, inner: &[Inline]) {
    out.push_str(open);
    out.push_str(&render_inlines(inner));
    out.push('}');
}

fn is_latex_format(format: &str) -> bool {
    matches!(format, "latex" | "tex")
}

pub fn escape_latex(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '\u{a0}' => out.push('~'),
            _ => out.push(ch),
        }
    }
    out
}

fn normalize_inline_whitespace(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
