//! Reconciliation — attach doc comments to the declarations that follow them.
//!
//! The located items are folded left to right. The only state carried between
//! items is the pending comment: a comment fills it, a declaration consumes
//! it, and a second comment before any declaration orphans the first.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use crate::comment::{structure, MarkupRenderer};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::ParseError;
use crate::extract::{RawComment, RawData, RawFunction};
use crate::locate::Item;
use crate::model::{Method, StructuredComment, Variable};

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static RE_STAR_PADDING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\* ?").unwrap());

/// Body of a comment that excludes the next declaration from the model.
const SKIP_DIRECTIVE: &str = "skip";

/// Everything the walk produces.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub variables: IndexMap<String, Variable>,
    pub methods: IndexMap<String, Method>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn reconcile(items: Vec<Item<'_>>, renderer: &dyn MarkupRenderer) -> Result<Reconciled, ParseError> {
    let acc = items
        .into_iter()
        .try_fold(Accumulator::default(), |mut acc, item| {
            acc.step(item, renderer)?;
            Ok::<_, ParseError>(acc)
        })?;
    Ok(acc.finish())
}

// -- Accumulator --------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Pending<'a> {
    body: &'a str,
    offset: usize,
}

#[derive(Debug, Default)]
struct Accumulator<'a> {
    pending: Option<Pending<'a>>,
    done: Reconciled,
}

impl<'a> Accumulator<'a> {
    fn step(&mut self, item: Item<'a>, renderer: &dyn MarkupRenderer) -> Result<(), ParseError> {
        match item {
            Item::Comment(comment) => self.comment(comment),
            _ if self.pending_is_skip() => {
                tracing::debug!(offset = item.offset(), "skipping declaration");
                self.pending = None;
            }
            Item::Data(data) => self.data(data, renderer)?,
            Item::Function(function) => self.function(function, renderer)?,
        }
        Ok(())
    }

    fn pending_is_skip(&self) -> bool {
        self.pending
            .is_some_and(|p| p.body.trim() == SKIP_DIRECTIVE)
    }

    fn comment(&mut self, comment: RawComment<'a>) {
        let next = Pending {
            body: comment.body,
            offset: comment.span.start,
        };
        if let Some(orphan) = self.pending.replace(next) {
            self.done.diagnostics.push(Diagnostic::new(
                DiagnosticKind::OrphanComment,
                "doc comment without a matching data or function declaration",
                orphan.offset,
            ));
        }
    }

    /// Structure and clear the pending comment.
    fn take_comment(&mut self, renderer: &dyn MarkupRenderer) -> Option<StructuredComment> {
        let pending = self.pending.take()?;
        structure(
            Some(pending.body),
            pending.offset,
            renderer,
            &mut self.done.diagnostics,
        )
    }

    fn data(&mut self, data: RawData<'a>, renderer: &dyn MarkupRenderer) -> Result<(), ParseError> {
        let comment = self.take_comment(renderer);
        let offset = data.span.start;

        if let Some(existing) = self.done.variables.get(data.name) {
            return Err(ParseError::DuplicateVariable {
                name: data.name.to_string(),
                first: existing.offset,
                second: offset,
            });
        }

        let variable = Variable::new(
            offset,
            comment,
            data.text,
            split_modifiers(data.modifiers),
            strip_whitespace(data.type_text),
            data.name,
        )?;
        self.done.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    fn function(
        &mut self,
        function: RawFunction<'a>,
        renderer: &dyn MarkupRenderer,
    ) -> Result<(), ParseError> {
        let mut comment = self.take_comment(renderer);
        let offset = function.span.start;

        // Prototype and definition share a name; the later one wins but an
        // undocumented occurrence inherits the other's comment.
        if let Some(existing) = self.done.methods.get(function.name) {
            tracing::debug!(
                name = function.name,
                definition = function.has_body,
                "merging repeated function declaration"
            );
            if comment.is_none() {
                comment = existing.comment.clone();
            } else if existing.comment.is_some() {
                self.done.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateFunctionDoc,
                    format!(
                        "multiple documentation comments for function {:?}",
                        function.name
                    ),
                    offset,
                ));
            }
        }

        let method = Method::new(
            offset,
            comment,
            function.text,
            split_modifiers(function.modifiers),
            function.return_type.map_or_else(|| "void".to_string(), strip_whitespace),
            function.name,
            normalize_args(function.args),
        )?;
        self.done.methods.insert(method.name.clone(), method);
        Ok(())
    }

    fn finish(mut self) -> Reconciled {
        if let Some(orphan) = self.pending.take() {
            self.done.diagnostics.push(Diagnostic::new(
                DiagnosticKind::OrphanComment,
                "doc comment at end of file without a declaration to document",
                orphan.offset,
            ));
        }
        self.done
    }
}

// -- Normalisation ------------------------------------------------------------

fn split_modifiers(raw: &str) -> BTreeSet<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn strip_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect()
}

/// Split a raw argument list and tidy each argument: comments are dropped,
/// whitespace runs become one space and spaces next to `*` go away.
pub fn normalize_args(raw: &str) -> Vec<String> {
    let raw = RE_BLOCK_COMMENT.replace_all(raw, " ");
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|arg| {
            let collapsed = RE_WHITESPACE.replace_all(arg, " ");
            RE_STAR_PADDING.replace_all(&collapsed, "*").trim().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::PlainText;
    use crate::extract::extract;
    use crate::locate::locate;
    use rstest::rstest;

    fn run(text: &str) -> Result<Reconciled, ParseError> {
        let located = locate(text, extract(text))?;
        reconcile(located.items, &PlainText)
    }

    fn kinds(r: &Reconciled) -> Vec<DiagnosticKind> {
        r.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[rstest]
    #[case("int **v", vec!["int**v"])]
    #[case("int * * v", vec!["int**v"])]
    #[case("mapping\n   baloo", vec!["mapping baloo"])]
    #[case("int a,\n\tstring  b", vec!["int a", "string b"])]
    #[case("", vec![])]
    #[case("  \n ", vec![])]
    #[case("mixed args...", vec!["mixed args..."])]
    #[case("int x /* (unused) */", vec!["int x"])]
    #[case("/* none */", vec![])]
    fn args_normalized(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(normalize_args(raw), expected);
    }

    #[test]
    fn comment_attaches_to_next_declaration() {
        let r = run("/** The count. */\nint count;\n").unwrap();
        let v = &r.variables["count"];
        assert_eq!(v.type_name, "int");
        assert_eq!(v.comment.as_ref().unwrap().rendered_body, "The count.");
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn data_normalization() {
        let r = run("private static mapping *\ntables;\n").unwrap();
        let v = &r.variables["tables"];
        assert_eq!(v.type_name, "mapping*");
        assert_eq!(
            v.modifiers.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["private", "static"]
        );
        assert_eq!(v.raw_text, "private static mapping *\ntables;");
    }

    #[test]
    fn duplicate_variable_is_fatal() {
        let err = run("int x;\nstring x;\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateVariable { ref name, first: 0, second: 7 } if name == "x"
        ));
    }

    #[test]
    fn orphan_comment_reported() {
        let r = run("/** lost */\n/** kept */\nint x;\n").unwrap();
        assert_eq!(kinds(&r), vec![DiagnosticKind::OrphanComment]);
        assert_eq!(r.diagnostics[0].offset, 0);
        assert_eq!(
            r.variables["x"].comment.as_ref().unwrap().rendered_body,
            "kept"
        );
    }

    #[test]
    fn trailing_comment_reported() {
        let r = run("int x;\n/** dangling */\n").unwrap();
        assert_eq!(kinds(&r), vec![DiagnosticKind::OrphanComment]);
        assert_eq!(r.diagnostics[0].offset, 7);
    }

    #[test]
    fn skip_excludes_declaration() {
        let r = run("/** skip */\nint hidden;\n/**  skip\n */\nvoid helper() {\n}\nint shown;\n").unwrap();
        assert!(r.variables.get("hidden").is_none());
        assert!(r.methods.get("helper").is_none());
        assert!(r.variables.get("shown").unwrap().comment.is_none());
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn prototype_comment_carries_to_definition() {
        let text = "/** Doubles x. */\nint foo(int x);\n\nint foo(int x) {\n    return x * 2;\n}\n";
        let r = run(text).unwrap();
        assert_eq!(r.methods.len(), 1);
        let m = &r.methods["foo"];
        assert_eq!(m.offset, 35);
        assert_eq!(m.comment.as_ref().unwrap().rendered_body, "Doubles x.");
        assert_eq!(m.raw_text, "int foo(int x) {");
    }

    #[test]
    fn definition_comment_replaces_undocumented_prototype() {
        let text = "int foo(int x);\n/** Body docs. */\nint foo(int x) {\n}\n";
        let r = run(text).unwrap();
        let m = &r.methods["foo"];
        assert_eq!(m.comment.as_ref().unwrap().rendered_body, "Body docs.");
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn doubly_documented_function_warns_and_keeps_second() {
        let text = "/** First. */\nint foo();\n/** Second. */\nint foo() {\n}\n";
        let r = run(text).unwrap();
        assert_eq!(kinds(&r), vec![DiagnosticKind::DuplicateFunctionDoc]);
        assert_eq!(
            r.methods["foo"].comment.as_ref().unwrap().rendered_body,
            "Second."
        );
    }

    #[test]
    fn commented_argument_list_kept() {
        let r = run("void f(int x /* (unused) */, string s) {\n}\n").unwrap();
        assert_eq!(r.methods["f"].args, vec!["int x", "string s"]);
    }

    #[test]
    fn constructor_like_function_is_void() {
        let r = run("static create(varargs int clone) {\n}\n").unwrap();
        let m = &r.methods["create"];
        assert_eq!(m.return_type, "void");
        assert_eq!(m.args, vec!["varargs int clone"]);
        assert!(m.modifiers.contains("static"));
    }

    #[test]
    fn unknown_tag_reported_at_comment_offset() {
        let r = run("int x;\n/** @author someone */\nint y;\n").unwrap();
        assert_eq!(kinds(&r), vec![DiagnosticKind::UnknownTag]);
        assert_eq!(r.diagnostics[0].offset, 7);
    }
}
