//! Minimal markup for the advisory text.
//!
//! The server writes advice in a small markdown dialect: `**bold**` spans,
//! `##`/`###` headings, `1. numbered` lines and `- bullet` lines. Everything
//! is line based; nothing spans more than one line except a bullet list,
//! which collects a contiguous run of bullet lines.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceBlock {
    /// `## x` and `### x` both map here; there is only one heading level.
    Heading(Vec<Span>),
    /// A numbered line, number included.
    Numbered(Vec<Span>),
    /// One contiguous run of `- ` lines.
    List(Vec<Vec<Span>>),
    Line(Vec<Span>),
    /// Blank line.
    Break,
}

pub fn render(text: &str) -> Vec<AdviceBlock> {
    let mut blocks = Vec::new();
    let mut items: Vec<Vec<Span>> = Vec::new();

    for line in text.lines() {
        if let Some(item) = bullet_item(line) {
            items.push(spans(item));
            continue;
        }
        if !items.is_empty() {
            blocks.push(AdviceBlock::List(std::mem::take(&mut items)));
        }

        let block = if let Some(h) = line
            .strip_prefix("### ")
            .or_else(|| line.strip_prefix("## "))
        {
            AdviceBlock::Heading(spans(h))
        } else if is_numbered(line) {
            AdviceBlock::Numbered(spans(line))
        } else if line.trim().is_empty() {
            AdviceBlock::Break
        } else {
            AdviceBlock::Line(spans(line))
        };
        blocks.push(block);
    }
    if !items.is_empty() {
        blocks.push(AdviceBlock::List(items));
    }
    blocks
}

/// `- text` or `-\ttext`: a dash, one whitespace character, then the item.
fn bullet_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    let sep = rest.chars().next().filter(|c| c.is_whitespace())?;
    Some(&rest[sep.len_utf8()..])
}

/// `12. text`: digits, a dot, then whitespace.
fn is_numbered(line: &str) -> bool {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.len() < line.len()
        && rest
            .strip_prefix('.')
            .and_then(|r| r.chars().next())
            .is_some_and(char::is_whitespace)
}

/// Splits a line on `**…**` pairs. An unmatched `**` stays literal.
pub fn spans(line: &str) -> Vec<Span> {
    let mut out = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            break;
        };
        if open > 0 {
            out.push(Span::Plain(rest[..open].to_string()));
        }
        out.push(Span::Bold(after[..close].to_string()));
        rest = &after[close + 2..];
    }
    if !rest.is_empty() {
        out.push(Span::Plain(rest.to_string()));
    }
    out
}

/// Plain text of a span run, markers removed.
pub fn plain_text(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| match s {
            Span::Plain(t) | Span::Bold(t) => t.as_str(),
        })
        .collect()
}

/// HTML rendition of the blocks, for copying into other tools.
pub fn to_html(blocks: &[AdviceBlock]) -> String {
    let mut html = String::new();
    for (i, block) in blocks.iter().enumerate() {
        let inline = matches!(block, AdviceBlock::Line(_) | AdviceBlock::Break);
        let next_inline = matches!(
            blocks.get(i + 1),
            Some(AdviceBlock::Line(_) | AdviceBlock::Break)
        );
        match block {
            AdviceBlock::Heading(s) => {
                let _ = write!(html, "<h3>{}</h3>", spans_html(s));
            }
            AdviceBlock::Numbered(s) => {
                let _ = write!(html, "<p>{}</p>", spans_html(s));
            }
            AdviceBlock::List(items) => {
                html.push_str("<ul>");
                for item in items {
                    let _ = write!(html, "<li>{}</li>", spans_html(item));
                }
                html.push_str("</ul>");
            }
            AdviceBlock::Line(s) => html.push_str(&spans_html(s)),
            AdviceBlock::Break => {}
        }
        if inline && next_inline {
            html.push_str("<br>");
        }
    }
    html
}

fn spans_html(spans: &[Span]) -> String {
    let mut out = String::new();
    for s in spans {
        match s {
            Span::Plain(t) => out.push_str(&escape(t)),
            Span::Bold(t) => {
                let _ = write!(out, "<strong>{}</strong>", escape(t));
            }
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
