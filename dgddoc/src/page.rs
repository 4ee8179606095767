//! Renderable view of one parsed file — what ends up on a documentation page.

use dgd_doc::{Inherit, Method, SourceFile, StructuredComment, Tag, Variable};
use serde::Serialize;

/// One page: a parsed file with private members filtered out (unless asked for).
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub title: String,
    pub inherits: Vec<&'a Inherit>,
    pub variables: Vec<&'a Variable>,
    pub methods: Vec<&'a Method>,
}

impl<'a> Page<'a> {
    pub fn new(title: impl Into<String>, file: &'a SourceFile, show_private: bool) -> Self {
        Self {
            title: title.into(),
            inherits: file
                .inherits()
                .iter()
                .filter(|i| show_private || !i.is_private)
                .collect(),
            variables: file
                .variables()
                .values()
                .filter(|v| show_private || !v.is_private())
                .collect(),
            methods: file
                .methods()
                .values()
                .filter(|m| show_private || !m.is_private())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inherits.is_empty() && self.variables.is_empty() && self.methods.is_empty()
    }
}

/// `private static int count`
pub fn variable_signature(var: &Variable) -> String {
    let mut parts: Vec<&str> = var.modifiers.iter().map(String::as_str).collect();
    parts.push(&var.type_name);
    parts.push(&var.name);
    parts.join(" ")
}

/// A comment's tags grouped the way pages present them.
#[derive(Debug, Default)]
pub struct TagSections<'a> {
    /// `@param name description` split at the first whitespace.
    pub params: Vec<(&'a str, &'a str)>,
    pub returns: Vec<&'a str>,
    pub raises: Vec<&'a str>,
    pub examples: Vec<&'a str>,
    pub notes: Vec<&'a str>,
    pub see: Vec<&'a str>,
    pub deprecated: Option<&'a str>,
    /// Unrecognised tags, kept in order.
    pub other: Vec<&'a Tag>,
}

impl<'a> TagSections<'a> {
    pub fn from_comment(comment: &'a StructuredComment) -> Self {
        let mut s = Self::default();
        for tag in &comment.tags {
            let content = tag.content.as_str();
            match tag.name.as_str() {
                "param" => s.params.push(
                    content
                        .split_once(char::is_whitespace)
                        .map_or((content, ""), |(name, rest)| (name, rest.trim())),
                ),
                "return" => s.returns.push(content),
                "raise" => s.raises.push(content),
                "example" => s.examples.push(content),
                "note" => s.notes.push(content),
                "see" => s.see.push(content),
                "deprecated" => s.deprecated = Some(content),
                // Only affects filtering.
                "private" => {}
                _ => s.other.push(tag),
            }
        }
        s
    }
}
