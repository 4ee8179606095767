//! Non-fatal diagnostics collected during a parse.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagnosticKind {
    /// A doc comment with no declaration after it.
    OrphanComment,
    /// An `@tag` outside the recognised set.
    UnknownTag,
    /// A function documented at both its prototype and its definition.
    DuplicateFunctionDoc,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::OrphanComment => "orphan-comment",
            DiagnosticKind::UnknownTag => "unknown-tag",
            DiagnosticKind::DuplicateFunctionDoc => "duplicate-function-doc",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte offset of the comment or declaration the diagnostic is about.
    pub offset: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        let d = Diagnostic::new(DiagnosticKind::UnknownTag, "unknown documentation tag \"foo\"", 3);
        assert_eq!(d.to_string(), "unknown documentation tag \"foo\" [unknown-tag]");
    }
}
