//! Pipeline entry point: text in, [`SourceFile`] out.

use std::fs;
use std::path::Path;

use crate::comment::MarkupRenderer;
use crate::error::{ParseError, PreprocessError};
use crate::extract::extract;
use crate::locate::{locate, Located};
use crate::model::{Inherit, SourceFile};
use crate::reconcile::reconcile;

/// Expands macros and includes before parsing (e.g. a `cpp` run).
pub trait Preprocessor {
    fn preprocess(&self, text: &str) -> Result<String, PreprocessError>;
}

/// Parser configuration. Without a preprocessor the text is parsed as-is.
pub struct Parser<'a> {
    renderer: &'a dyn MarkupRenderer,
    preprocessor: Option<&'a dyn Preprocessor>,
}

impl<'a> Parser<'a> {
    pub fn new(renderer: &'a dyn MarkupRenderer) -> Self {
        Self {
            renderer,
            preprocessor: None,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: &'a dyn Preprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Read and parse a file.
    pub fn parse_file(&self, path: &Path) -> Result<SourceFile, ParseError> {
        let text = read_source(path)?;
        self.parse_str(&text)
    }

    /// Parse source text, preprocessing it first if configured to.
    pub fn parse_str(&self, text: &str) -> Result<SourceFile, ParseError> {
        let text = match self.preprocessor {
            Some(pp) => pp.preprocess(text).map_err(ParseError::Preprocess)?,
            None => text.to_string(),
        };
        parse_text(text, self.renderer)
    }
}

/// Read a source file, distinguishing a missing file from an unreadable one.
pub fn read_source(path: &Path) -> Result<String, ParseError> {
    if !path.exists() {
        return Err(ParseError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read source file");
    Ok(text)
}

fn parse_text(text: String, renderer: &dyn MarkupRenderer) -> Result<SourceFile, ParseError> {
    let Located { items, inherits } = locate(&text, extract(&text))?;

    let inherits = inherits
        .into_iter()
        .map(|raw| Inherit {
            offset: raw.span.start,
            is_private: raw.is_private,
            label: raw.label.map(str::to_string),
            object_name: raw.object_name.to_string(),
        })
        .collect();

    let reconciled = reconcile(items, renderer)?;

    Ok(SourceFile {
        inherits,
        variables: reconciled.variables,
        methods: reconciled.methods,
        fully_parsed: true,
        diagnostics: reconciled.diagnostics,
        text,
    })
}
