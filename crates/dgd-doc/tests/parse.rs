use dgd_doc::{DiagnosticKind, ParseError, Parser, PlainText, SourceFile};

fn parse(text: &str) -> Result<SourceFile, ParseError> {
    Parser::new(&PlainText).parse_str(text)
}

const KITCHEN_SINK: &str = r#"/*
 * Shared object base.
 */
inherit "/std/object";
private inherit access label_goes_here "/std/access";

/** How many times we were cloned. */
private static int clone_count;

/**
 * Lookup table for names.
 * @note rebuilt on reset
 */
mapping * tables;

/**
 * Register a handler.
 *
 * Handlers run in registration order.
 *
 * @param name the handler name
 * @param cb   function to call
 * @return     1 on success
 */
static int add_handler(string name, mixed cb);

/** skip */
int debug_level;

void create(varargs int clone) {
    int i;
    clone_count++;
    add_handler("x", 0);
}

static int add_handler(string name,
                       mixed cb) {
    return 1;
}

/** @private */
nomask void
reset(int **grid, mapping
      baloo)
{
}
"#;

#[test]
fn macro_only_header_is_empty() {
    let file = parse("#define MAX_USERS 100\n#define IS_OK(x) ((x) > 0)\n").unwrap();
    assert!(file.inherits().is_empty());
    assert!(file.variables().is_empty());
    assert!(file.methods().is_empty());
    assert!(file.fully_parsed());
    assert!(file.diagnostics().is_empty());
}

#[test]
fn single_inherit() {
    let file = parse("inherit \"/std/object\";\n").unwrap();
    assert_eq!(file.inherits().len(), 1);
    assert_eq!(file.inherits()[0].object_name, "/std/object");
    assert!(!file.inherits()[0].is_private);
    assert_eq!(file.inherits()[0].label, None);
}

#[test]
fn labelled_inherit() {
    let file = parse("inherit access label_goes_here \"/std/access\";\n").unwrap();
    assert_eq!(file.inherits()[0].label.as_deref(), Some("label_goes_here"));
}

#[test]
fn kitchen_sink_inherits() {
    let file = parse(KITCHEN_SINK).unwrap();
    let inherits = file.inherits();
    assert_eq!(inherits.len(), 2);
    assert_eq!(inherits[0].object_name, "/std/object");
    assert!(inherits[1].is_private);
    assert_eq!(inherits[1].label.as_deref(), Some("label_goes_here"));
    assert!(inherits[0].offset < inherits[1].offset);
}

#[test]
fn kitchen_sink_variables() {
    let file = parse(KITCHEN_SINK).unwrap();
    let names: Vec<&str> = file.variables().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["clone_count", "tables"]);

    let count = &file.variables()["clone_count"];
    assert_eq!(count.type_name, "int");
    assert!(count.modifiers.contains("private"));
    assert!(count.modifiers.contains("static"));
    assert_eq!(
        count.comment.as_ref().unwrap().rendered_body,
        "How many times we were cloned."
    );

    let tables = &file.variables()["tables"];
    assert_eq!(tables.type_name, "mapping*");
    let comment = tables.comment.as_ref().unwrap();
    assert_eq!(comment.rendered_body, "Lookup table for names.");
    assert_eq!(comment.tag_values("note").collect::<Vec<_>>(), vec!["rebuilt on reset"]);
}

#[test]
fn kitchen_sink_methods() {
    let file = parse(KITCHEN_SINK).unwrap();
    let names: Vec<&str> = file.methods().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["add_handler", "create", "reset"]);

    let add = &file.methods()["add_handler"];
    assert!(add.raw_text.ends_with('{'));
    assert_eq!(add.args, vec!["string name", "mixed cb"]);
    assert_eq!(add.return_type, "int");
    let doc = add.comment.as_ref().unwrap();
    assert_eq!(
        doc.rendered_body,
        "Register a handler.\n\nHandlers run in registration order."
    );
    assert_eq!(
        doc.tag_values("param").collect::<Vec<_>>(),
        vec!["name the handler name", "cb   function to call"]
    );

    let create = &file.methods()["create"];
    assert_eq!(create.return_type, "void");
    assert!(create.comment.is_none());

    let reset = &file.methods()["reset"];
    assert_eq!(reset.args, vec!["int**grid", "mapping baloo"]);
    assert!(reset.modifiers.contains("nomask"));
    assert!(reset.is_private());
}

#[test]
fn kitchen_sink_skips_and_stays_quiet() {
    let file = parse(KITCHEN_SINK).unwrap();
    assert!(!file.variables().contains_key("debug_level"));
    assert!(!file.variables().contains_key("i"));
    assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
    assert!(file.fully_parsed());
}

#[test]
fn comment_before_inherit_is_orphaned() {
    let file = parse("/** Base. */\ninherit \"/std/object\";\n/** Count. */\nint count;\n").unwrap();
    let kinds: Vec<_> = file.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::OrphanComment]);
    assert_eq!(file.diagnostics()[0].offset, 0);
}

#[test]
fn prototype_documents_body() {
    let file = parse("/** Returns x. */\nint foo(int x);\nint foo(int x) {\n    return x;\n}\n").unwrap();
    assert_eq!(file.methods().len(), 1);
    let foo = &file.methods()["foo"];
    assert_eq!(foo.comment.as_ref().unwrap().original_text, " Returns x. ");
    assert!(foo.raw_text.ends_with('{'));
}

#[test]
fn skip_excludes_functions_and_data() {
    let file = parse("/** skip */\nint a;\n/** skip */\nint f() {\n}\n").unwrap();
    assert!(file.variables().is_empty());
    assert!(file.methods().is_empty());
}

#[test]
fn verbatim_duplicates_are_ambiguous() {
    let err = parse("static int x;\nstatic int x;\n").unwrap_err();
    assert!(matches!(err, ParseError::AmbiguousDuplicate { .. }));

    let err = parse("int f();\nint f();\n").unwrap_err();
    assert!(matches!(err, ParseError::AmbiguousDuplicate { .. }));
}

#[test]
fn documented_twice_is_a_warning() {
    let file = parse("/** a */\nvoid f();\n/** b */\nvoid f() {\n}\n").unwrap();
    let kinds: Vec<_> = file.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::DuplicateFunctionDoc]);
    assert_eq!(file.line_of(file.diagnostics()[0].offset), 4);
}

#[test]
fn reparse_is_idempotent() {
    let first = parse(KITCHEN_SINK).unwrap();
    let second = parse(KITCHEN_SINK).unwrap();
    assert_eq!(first, second);
}
