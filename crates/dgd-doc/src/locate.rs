//! Location resolution — order candidates by offset and drop look-alikes.
//!
//! Offsets come straight from the extractor's spans. What this stage adds is
//! the top-level heuristic: a data or function declaration only counts when
//! it starts a line, which rules out locals and call expressions inside
//! function bodies without parsing them.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::ParseError;
use crate::extract::{Extraction, RawComment, RawData, RawFunction, RawInherit, Span};

/// Words that match the function pattern at the start of a line but are
/// statements, e.g. an unindented `if (x) {`.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "while", "for", "switch", "do", "else", "return", "catch", "rlimits", "sizeof",
    "typeof",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Comment,
    Data,
    Function,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemKind::Comment => "doc comment",
            ItemKind::Data => "data declaration",
            ItemKind::Function => "function declaration",
        };
        f.write_str(s)
    }
}

/// One retained candidate, tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    Comment(RawComment<'a>),
    Data(RawData<'a>),
    Function(RawFunction<'a>),
}

impl<'a> Item<'a> {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Comment(_) => ItemKind::Comment,
            Item::Data(_) => ItemKind::Data,
            Item::Function(_) => ItemKind::Function,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Item::Comment(c) => c.span,
            Item::Data(d) => d.span,
            Item::Function(f) => f.span,
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            Item::Comment(c) => c.text,
            Item::Data(d) => d.text,
            Item::Function(f) => f.text,
        }
    }

    pub fn offset(&self) -> usize {
        self.span().start
    }
}

/// Resolver output: the walk order plus the inherits, which the walk skips.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Located<'a> {
    /// Comments, data and function declarations in ascending offset order.
    pub items: Vec<Item<'a>>,
    pub inherits: Vec<RawInherit<'a>>,
}

pub fn locate<'a>(text: &str, extraction: Extraction<'a>) -> Result<Located<'a>, ParseError> {
    let Extraction {
        comments,
        comment_spans,
        inherits,
        data,
        functions,
    } = extraction;

    // Strictly inside: a doc comment's own span starts where it does.
    let commented_out = |offset: usize| {
        comment_spans
            .iter()
            .any(|s| s.start < offset && s.contains(offset))
    };

    let comments: Vec<RawComment<'a>> = comments
        .into_iter()
        .filter(|c| !commented_out(c.span.start))
        .collect();

    let inherits: Vec<RawInherit<'a>> = inherits
        .into_iter()
        .filter(|i| !commented_out(i.span.start))
        .collect();

    let declarations = data
        .into_iter()
        .map(Item::Data)
        .chain(functions.into_iter().map(Item::Function))
        .filter(|item| is_top_level(text, item.offset()) && !commented_out(item.offset()))
        .filter(|item| match item {
            Item::Function(f) => !CONTROL_KEYWORDS.contains(&f.name),
            _ => true,
        });

    let mut by_offset: BTreeMap<usize, Item<'a>> = BTreeMap::new();
    let mut seen_text: HashMap<&'a str, usize> = HashMap::new();

    for item in comments.into_iter().map(Item::Comment).chain(declarations) {
        let offset = item.offset();

        if item.kind() != ItemKind::Comment {
            if let Some(&first) = seen_text.get(item.text()) {
                return Err(ParseError::AmbiguousDuplicate {
                    text: item.text().to_string(),
                    first,
                    second: offset,
                });
            }
            seen_text.insert(item.text(), offset);
        }

        match by_offset.entry(offset) {
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
            Entry::Occupied(existing) => {
                return Err(ParseError::OffsetCollision {
                    offset,
                    first: existing.get().kind(),
                    second: item.kind(),
                });
            }
        }
    }

    tracing::debug!(
        items = by_offset.len(),
        inherits = inherits.len(),
        "located top-level items"
    );

    Ok(Located {
        items: by_offset.into_values().collect(),
        inherits,
    })
}

/// A declaration is top-level when it starts the text or a line.
fn is_top_level(text: &str, offset: usize) -> bool {
    offset == 0 || text.as_bytes().get(offset - 1) == Some(&b'\n')
}
