//! Doc comment structuring: `@tag` lines plus a rendered free-text body.

use regex::Regex;
use std::sync::LazyLock;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::model::{StructuredComment, Tag};

/// Tags with a known meaning. Others are kept but reported.
pub const DOC_TAGS: &[&str] = &[
    "param",
    "return",
    "example",
    "deprecated",
    "note",
    "private",
    "raise",
    "see",
];

/// ` * ` continuation prefix of a block comment line.
static RE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\*(?:[ \t]|$)").unwrap());

static RE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*@(?P<tag>[A-Za-z]{3,})(?:[ \t]+(?P<content>.*?))?[ \t]*$").unwrap()
});

/// Turns plain comment text into a render-ready body.
pub trait MarkupRenderer {
    fn render(&self, text: &str) -> String;
}

/// Leaves the text as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl MarkupRenderer for PlainText {
    fn render(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Structure a pending comment body. `None` in, `None` out: a missing
/// comment is not the same thing as an empty one.
pub fn structure(
    body: Option<&str>,
    offset: usize,
    renderer: &dyn MarkupRenderer,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<StructuredComment> {
    let body = body?;

    let lines: Vec<&str> = body
        .lines()
        .map(|line| match RE_CONTINUATION.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        })
        .collect();

    let mut tags = Vec::new();
    let mut text_lines = Vec::new();
    for line in lines {
        let Some(caps) = RE_TAG_LINE.captures(line) else {
            text_lines.push(line);
            continue;
        };
        let name = &caps["tag"];
        if !DOC_TAGS.contains(&name) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownTag,
                format!("unknown documentation tag {:?}", name),
                offset,
            ));
        }
        tags.push(Tag {
            name: name.to_string(),
            content: caps.name("content").map_or("", |m| m.as_str()).to_string(),
        });
    }

    Some(StructuredComment {
        original_text: body.to_string(),
        tags,
        rendered_body: renderer.render(&dedent(&text_lines)),
    })
}

/// Drop leading/trailing blank lines and the indentation shared by the rest.
/// Trailing whitespace goes too, except a Markdown hard break (two or more
/// spaces) on a line that has a successor.
fn dedent(lines: &[&str]) -> String {
    let is_blank = |l: &&str| l.trim().is_empty();
    let start = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !is_blank(l)).map_or(start, |i| i + 1);
    let lines = &lines[start..end];

    let indent = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let lead = l.len() - l.trim_start().len();
            let line = l.get(lead.min(indent)..).unwrap_or(l.trim_start());
            if i < last && !is_blank(&line) && line.ends_with("  ") {
                line
            } else {
                line.trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
