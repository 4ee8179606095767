//! Lexical extraction — one regex scan per item category.
//!
//! Nothing here decides whether a match is a real top-level construct;
//! every match is reported with its byte span and [`crate::locate`] sorts
//! out look-alikes afterwards.

use regex::{Captures, Regex};
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

/// `/** body */`, possibly spanning lines. `/**/` is an ordinary empty
/// comment and matches without a body.
static RE_DOC_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*(?:/|(?P<body>.*?)\*/)").unwrap());

/// Any comment, doc or not. String and character literals are matched too
/// so a `/*` or `//` inside one does not open a comment; only the `comment`
/// group is kept.
static RE_ANY_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?s)"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#,
        r"|(?P<comment>/\*.*?\*/|//[^\n]*)",
    ))
    .unwrap()
});

// The label is the last bare word between `inherit` and the path expression;
// `words` is greedy so a single identifier falls through to `obname`
// (`inherit LIB_OBJECT;`).
static RE_INHERIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:(?P<private>private)\s+)?inherit\b",
        r"(?P<words>(?:\s+[A-Za-z_][A-Za-z0-9_]*)*)",
        r"\s*(?P<obname>[^;\s][^;\n]*?)\s*;",
    ))
    .unwrap()
});

static RE_DATA_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?P<modifiers>(?:(?:private|static|atomic|nomask|varargs)\s+)*)",
        r"(?P<type>(?:int|float|string|object|mapping|mixed|void)\b(?:\s*\*+)?)\s*",
        r"(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*;",
    ))
    .unwrap()
});

static RE_FUNC_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?P<modifiers>(?:(?:private|static|atomic|nomask|varargs)\s+)*)",
        r"(?:(?P<return_type>(?:int|float|string|object|mapping|mixed|void)\b(?:\s*\*+)?)\s*)?",
        r"(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*",
        // One level of nested parentheses, e.g. `int x /* (unused) */`.
        r"\((?P<args>(?:[^()]|\([^()]*\))*)\)\s*(?P<terminator>[;{])",
    ))
    .unwrap()
});

// -- Raw matches --------------------------------------------------------------

/// Byte range of a match in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment<'a> {
    pub span: Span,
    pub text: &'a str,
    /// Text between `/**` and `*/`.
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInherit<'a> {
    pub span: Span,
    pub text: &'a str,
    pub is_private: bool,
    pub label: Option<&'a str>,
    pub object_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawData<'a> {
    pub span: Span,
    pub text: &'a str,
    pub modifiers: &'a str,
    pub type_text: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFunction<'a> {
    pub span: Span,
    pub text: &'a str,
    pub modifiers: &'a str,
    pub return_type: Option<&'a str>,
    pub name: &'a str,
    pub args: &'a str,
    /// `{` terminator rather than `;`.
    pub has_body: bool,
}

/// All candidate matches of one text, each list in source order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    pub comments: Vec<RawComment<'a>>,
    /// Every `/* */` and `//` comment, doc comments included. Code inside
    /// these is inert.
    pub comment_spans: Vec<Span>,
    pub inherits: Vec<RawInherit<'a>>,
    pub data: Vec<RawData<'a>>,
    pub functions: Vec<RawFunction<'a>>,
}

// -- Public API ---------------------------------------------------------------

pub fn extract(text: &str) -> Extraction<'_> {
    let extraction = Extraction {
        comments: RE_DOC_COMMENT
            .captures_iter(text)
            .filter_map(|caps| comment(text, &caps))
            .collect(),
        comment_spans: RE_ANY_COMMENT
            .captures_iter(text)
            .filter_map(|caps| caps.name("comment"))
            .map(|m| Span {
                start: m.start(),
                end: m.end(),
            })
            .collect(),
        inherits: RE_INHERIT
            .captures_iter(text)
            .map(|caps| inherit(text, &caps))
            .collect(),
        data: RE_DATA_DECL
            .captures_iter(text)
            .map(|caps| data(text, &caps))
            .collect(),
        functions: RE_FUNC_DECL
            .captures_iter(text)
            .map(|caps| function(text, &caps))
            .collect(),
    };
    tracing::debug!(
        comments = extraction.comments.len(),
        inherits = extraction.inherits.len(),
        data = extraction.data.len(),
        functions = extraction.functions.len(),
        "extracted candidates"
    );
    extraction
}

// -- Capture conversion -------------------------------------------------------

fn whole<'a>(text: &'a str, caps: &Captures<'a>) -> (Span, &'a str) {
    let m = caps.get_match();
    (
        Span {
            start: m.start(),
            end: m.end(),
        },
        &text[m.start()..m.end()],
    )
}

fn group<'a>(caps: &Captures<'a>, name: &str) -> &'a str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn comment<'a>(text: &'a str, caps: &Captures<'a>) -> Option<RawComment<'a>> {
    let body = caps.name("body")?.as_str();
    let (span, text) = whole(text, caps);
    Some(RawComment { span, text, body })
}

fn inherit<'a>(text: &'a str, caps: &Captures<'a>) -> RawInherit<'a> {
    let (span, text) = whole(text, caps);
    let label = group(caps, "words")
        .split_whitespace()
        .rfind(|w| *w != "object");
    RawInherit {
        span,
        text,
        is_private: caps.name("private").is_some(),
        label,
        object_name: unquote(group(caps, "obname")),
    }
}

fn data<'a>(text: &'a str, caps: &Captures<'a>) -> RawData<'a> {
    let (span, text) = whole(text, caps);
    RawData {
        span,
        text,
        modifiers: group(caps, "modifiers"),
        type_text: group(caps, "type"),
        name: group(caps, "name"),
    }
}

fn function<'a>(text: &'a str, caps: &Captures<'a>) -> RawFunction<'a> {
    let (span, text) = whole(text, caps);
    RawFunction {
        span,
        text,
        modifiers: group(caps, "modifiers"),
        return_type: caps.name("return_type").map(|m| m.as_str()),
        name: group(caps, "name"),
        args: group(caps, "args"),
        has_body: group(caps, "terminator") == "{",
    }
}

/// Strip the quotes from a lone string literal; leave expressions alone.
fn unquote(expr: &str) -> &str {
    match expr.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) if !inner.contains('"') => inner,
        _ => expr,
    }
}
