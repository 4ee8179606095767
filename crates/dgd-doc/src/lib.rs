//! dgd-doc — extract a documentation model from DGD LPC source files.
//!
//! The grammar is never fully parsed. Instead four pattern matchers pick out
//! doc comments (`/** ... */`), inherit statements, global data declarations
//! and function declarations, and a single offset-ordered pass attaches each
//! comment to the declaration that follows it:
//!
//! 1. [`extract`] — scan the text, one matcher per item category
//! 2. [`locate`] — keep top-level declarations and order everything by offset
//! 3. [`reconcile`] — fold over the ordered items, attaching pending comments
//! 4. [`comment`] — split a comment body into `@tag` lines and rendered text
//!
//! ```ignore
//! let file = dgd_doc::Parser::new(&dgd_doc::PlainText).parse_str(source)?;
//! for method in file.methods().values() {
//!     println!("{} {}({})", method.return_type, method.name, method.args.join(", "));
//! }
//! ```

pub mod comment;
pub mod diagnostic;
pub mod error;
pub mod extract;
pub mod locate;
pub mod model;
pub mod parser;
pub mod reconcile;

pub use comment::{MarkupRenderer, PlainText};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{ParseError, PreprocessError};
pub use model::{
    Inherit, Method, SourceFile, StructuredComment, Tag, Variable, LEGAL_MODIFIERS, LEGAL_TYPES,
};
pub use parser::{read_source, Parser, Preprocessor};
