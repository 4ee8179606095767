//! Fatal parse errors.
//!
//! Anything in here aborts the parse of the current file. Recoverable
//! problems are [`crate::Diagnostic`]s instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::locate::ItemKind;

/// Error returned by a [`crate::Preprocessor`] implementation.
pub type PreprocessError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum ParseError {
    /// A `Variable` or `Method` was built with a modifier outside
    /// [`crate::LEGAL_MODIFIERS`].
    #[error("illegal modifiers for {name:?}: {modifiers:?}")]
    IllegalModifier { name: String, modifiers: Vec<String> },

    /// The same declaration text appears verbatim more than once.
    #[error("declaration occurs identically more than once (offsets {first} and {second}): {text:?}")]
    AmbiguousDuplicate {
        text: String,
        first: usize,
        second: usize,
    },

    /// Two item categories claimed the same source offset.
    #[error("internal error: {first} and {second} both start at offset {offset}")]
    OffsetCollision {
        offset: usize,
        first: ItemKind,
        second: ItemKind,
    },

    /// Two global variables share a name.
    #[error("two global variables are named {name:?} (offsets {first} and {second})")]
    DuplicateVariable {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("no such source file: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preprocessor failed: {0}")]
    Preprocess(#[source] PreprocessError),
}
