//! Documentation model for a single parsed source file.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::diagnostic::Diagnostic;
use crate::error::ParseError;

pub const LEGAL_MODIFIERS: &[&str] = &["private", "static", "atomic", "nomask", "varargs"];

pub const LEGAL_TYPES: &[&str] = &["int", "float", "string", "object", "mapping", "mixed", "void"];

/// Everything extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceFile {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) text: String,
    pub(crate) inherits: Vec<Inherit>,
    pub(crate) variables: IndexMap<String, Variable>,
    pub(crate) methods: IndexMap<String, Method>,
    pub(crate) fully_parsed: bool,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl SourceFile {
    /// Inherit statements in source order.
    pub fn inherits(&self) -> &[Inherit] {
        &self.inherits
    }

    /// Global variables keyed by name, in declaration order.
    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    /// Functions keyed by name, ordered by their first declaration.
    pub fn methods(&self) -> &IndexMap<String, Method> {
        &self.methods
    }

    pub fn fully_parsed(&self) -> bool {
        self.fully_parsed
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The text the offsets refer to (after preprocessing, if any).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line number of a byte offset in [`SourceFile::text`].
    pub fn line_of(&self, offset: usize) -> usize {
        let end = offset.min(self.text.len());
        self.text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Inherit {
    pub offset: usize,
    pub is_private: bool,
    pub label: Option<String>,
    /// Path of the inherited object. A lone string literal is unquoted,
    /// anything else (concatenations, unexpanded macros) is kept as written.
    pub object_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Variable {
    pub offset: usize,
    pub comment: Option<StructuredComment>,
    pub raw_text: String,
    pub modifiers: BTreeSet<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_name: String,
    pub name: String,
}

impl Variable {
    pub fn new(
        offset: usize,
        comment: Option<StructuredComment>,
        raw_text: impl Into<String>,
        modifiers: BTreeSet<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let name = name.into();
        check_modifiers(&name, &modifiers)?;
        Ok(Self {
            offset,
            comment,
            raw_text: raw_text.into(),
            modifiers,
            type_name: type_name.into(),
            name,
        })
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.contains("private") || has_private_tag(self.comment.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Method {
    pub offset: usize,
    pub comment: Option<StructuredComment>,
    pub raw_text: String,
    pub modifiers: BTreeSet<String>,
    pub return_type: String,
    pub name: String,
    pub args: Vec<String>,
}

impl Method {
    pub fn new(
        offset: usize,
        comment: Option<StructuredComment>,
        raw_text: impl Into<String>,
        modifiers: BTreeSet<String>,
        return_type: impl Into<String>,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Result<Self, ParseError> {
        let name = name.into();
        check_modifiers(&name, &modifiers)?;
        Ok(Self {
            offset,
            comment,
            raw_text: raw_text.into(),
            modifiers,
            return_type: return_type.into(),
            name,
            args,
        })
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.contains("private") || has_private_tag(self.comment.as_ref())
    }

    /// `static int foo(int x, string y)`
    pub fn signature(&self) -> String {
        let mut out = String::new();
        for m in &self.modifiers {
            out.push_str(m);
            out.push(' ');
        }
        out.push_str(&self.return_type);
        out.push(' ');
        out.push_str(&self.name);
        out.push('(');
        out.push_str(&self.args.join(", "));
        out.push(')');
        out
    }
}

/// A doc comment split into `@tag` lines and rendered free text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructuredComment {
    pub original_text: String,
    pub tags: Vec<Tag>,
    pub rendered_body: String,
}

impl StructuredComment {
    /// Content of every tag with the given name, in order.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.name == name)
            .map(|t| t.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tag {
    pub name: String,
    pub content: String,
}

fn check_modifiers(name: &str, modifiers: &BTreeSet<String>) -> Result<(), ParseError> {
    let illegal: Vec<String> = modifiers
        .iter()
        .filter(|m| !LEGAL_MODIFIERS.contains(&m.as_str()))
        .cloned()
        .collect();
    if illegal.is_empty() {
        Ok(())
    } else {
        Err(ParseError::IllegalModifier {
            name: name.to_string(),
            modifiers: illegal,
        })
    }
}

fn has_private_tag(comment: Option<&StructuredComment>) -> bool {
    comment.is_some_and(|c| c.tags.iter().any(|t| t.name == "private"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn variable_rejects_illegal_modifier() {
        let err = Variable::new(0, None, "public int x;", mods(&["public"]), "int", "x").unwrap_err();
        assert!(matches!(
            err,
            ParseError::IllegalModifier { ref name, ref modifiers } if name == "x" && modifiers == &["public"]
        ));
    }

    #[test]
    fn method_accepts_legal_modifiers() {
        let m = Method::new(
            0,
            None,
            "static nomask int foo(int x);",
            mods(&["static", "nomask"]),
            "int",
            "foo",
            vec!["int x".into()],
        )
        .unwrap();
        assert_eq!(m.signature(), "nomask static int foo(int x)");
    }

    #[test]
    fn method_rejects_illegal_modifier() {
        let err = Method::new(0, None, "", mods(&["inline"]), "void", "f", vec![]).unwrap_err();
        assert!(matches!(err, ParseError::IllegalModifier { .. }));
    }

    #[test]
    fn private_by_modifier_or_tag() {
        let v = Variable::new(0, None, "private int x;", mods(&["private"]), "int", "x").unwrap();
        assert!(v.is_private());

        let comment = StructuredComment {
            original_text: " @private ".into(),
            tags: vec![Tag {
                name: "private".into(),
                content: String::new(),
            }],
            rendered_body: String::new(),
        };
        let m = Method::new(0, Some(comment), "", BTreeSet::new(), "void", "f", vec![]).unwrap();
        assert!(m.is_private());
    }

    #[test]
    fn line_of_counts_newlines() {
        let file = SourceFile {
            text: "a\nbb\nccc".into(),
            inherits: vec![],
            variables: IndexMap::new(),
            methods: IndexMap::new(),
            fully_parsed: true,
            diagnostics: vec![],
        };
        assert_eq!(file.line_of(0), 1);
        assert_eq!(file.line_of(2), 2);
        assert_eq!(file.line_of(5), 3);
        assert_eq!(file.line_of(100), 3);
    }
}
