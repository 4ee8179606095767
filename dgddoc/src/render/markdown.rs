//! GitHub-flavored markdown renderer.
//!
//! Comment bodies are written as the author wrote them, so markdown in a
//! doc comment renders naturally on the page.

use crate::page::{variable_signature, Page, TagSections};
use crate::render::{anchor, Renderer};
use dgd_doc::{Inherit, Method, StructuredComment, Variable};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, page: &Page) -> anyhow::Result<String> {
        let mut output = format!("# {}\n\n", page.title);

        if !page.inherits.is_empty() {
            output.push_str("## Inherits\n\n");
            for inherit in &page.inherits {
                output.push_str(&render_inherit(inherit));
                output.push('\n');
            }
            output.push('\n');
        }

        if !page.variables.is_empty() {
            output.push_str("## Variables\n\n");
            for var in &page.variables {
                output.push_str(&render_variable(var));
                output.push('\n');
            }
        }

        if !page.methods.is_empty() {
            output.push_str("## Index\n\n");
            for method in &page.methods {
                output.push_str(&format!("* [{}](#{})\n", method.name, anchor(&method.name)));
            }
            output.push('\n');

            output.push_str("## Functions\n\n");
            for method in &page.methods {
                output.push_str(&render_method(method));
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// `* `/std/object` as `label` (private)`
fn render_inherit(inherit: &Inherit) -> String {
    let mut line = format!("* `{}`", inherit.object_name);
    if let Some(ref label) = inherit.label {
        line.push_str(&format!(" as `{}`", label));
    }
    if inherit.is_private {
        line.push_str(" *(private)*");
    }
    line
}

fn render_variable(var: &Variable) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("### {}\n", var.name));
    lines.push(format!("```c\n{};\n```\n", variable_signature(var)));
    if let Some(ref comment) = var.comment {
        render_comment(&mut lines, comment);
    }
    lines.join("\n")
}

/// Render a single function's documentation block.
fn render_method(method: &Method) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", method.name));
    lines.push(format!("```c\n{}\n```\n", method.signature()));

    if let Some(ref comment) = method.comment {
        render_comment(&mut lines, comment);
    }

    lines.join("\n")
}

fn render_comment(lines: &mut Vec<String>, comment: &StructuredComment) {
    let sections = TagSections::from_comment(comment);

    if let Some(reason) = sections.deprecated {
        if reason.is_empty() {
            lines.push("> **Deprecated.**\n".to_string());
        } else {
            lines.push(format!("> **Deprecated:** {}\n", reason));
        }
    }

    if !comment.rendered_body.is_empty() {
        lines.push(comment.rendered_body.clone());
        lines.push(String::new());
    }

    if !sections.params.is_empty() {
        lines.push("#### Arguments\n".to_string());
        for (name, desc) in &sections.params {
            if desc.is_empty() {
                lines.push(format!("* **{}**", name));
            } else {
                lines.push(format!("* **{}**: {}", name, desc));
            }
        }
        lines.push(String::new());
    }

    render_list(lines, &sections.returns, "Returns");
    render_list(lines, &sections.raises, "Raises");

    for example in &sections.examples {
        lines.push("#### Example\n".to_string());
        lines.push("```c".to_string());
        lines.push(example.to_string());
        lines.push("```".to_string());
        lines.push(String::new());
    }

    render_list(lines, &sections.notes, "Notes");

    if !sections.see.is_empty() {
        lines.push("#### See also\n".to_string());
        for target in &sections.see {
            lines.push(format!("* [{}](#{})", target, anchor(target)));
        }
        lines.push(String::new());
    }

    if !sections.other.is_empty() {
        lines.push("#### Other tags\n".to_string());
        for tag in &sections.other {
            lines.push(format!("* `@{}` {}", tag.name, tag.content).trim_end().to_string());
        }
        lines.push(String::new());
    }
}

fn render_list(lines: &mut Vec<String>, items: &[&str], title: &str) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("#### {}\n", title));
    for item in items {
        lines.push(format!("* {}", item));
    }
    lines.push(String::new());
}
