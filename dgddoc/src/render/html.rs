//! HTML renderer — standalone HTML page with semantic markup.
//!
//! Comment bodies are already HTML (see `markup_for`); everything else is
//! escaped here.

use crate::page::{variable_signature, Page, TagSections};
use crate::render::{anchor, Renderer};
use dgd_doc::{Method, StructuredComment};

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page) -> anyhow::Result<String> {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html_escape(&page.title)));
        out.push_str("<style>\n");
        out.push_str("body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }\n");
        out.push_str("code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }\n");
        out.push_str("pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }\n");
        out.push_str("dt { font-weight: bold; margin-top: 0.5em; }\n");
        out.push_str("dd { margin-left: 1.5em; }\n");
        out.push_str(".deprecated { border-left: 4px solid #c0392b; padding-left: 0.75em; }\n");
        out.push_str("</style>\n");
        out.push_str("</head>\n<body>\n");
        out.push_str(&format!("<h1>{}</h1>\n", html_escape(&page.title)));

        if !page.inherits.is_empty() {
            out.push_str("<h2>Inherits</h2>\n<ul>\n");
            for inherit in &page.inherits {
                out.push_str(&format!("  <li><code>{}</code>", html_escape(&inherit.object_name)));
                if let Some(ref label) = inherit.label {
                    out.push_str(&format!(" as <code>{}</code>", html_escape(label)));
                }
                if inherit.is_private {
                    out.push_str(" <em>(private)</em>");
                }
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }

        if !page.variables.is_empty() {
            out.push_str("<h2>Variables</h2>\n");
            for var in &page.variables {
                out.push_str(&format!(
                    "<h3 id=\"{}\">{}</h3>\n",
                    html_escape(&anchor(&var.name)),
                    html_escape(&var.name)
                ));
                out.push_str(&format!(
                    "<pre><code class=\"language-c\">{};</code></pre>\n",
                    html_escape(&variable_signature(var))
                ));
                if let Some(ref comment) = var.comment {
                    out.push_str(&render_comment_html(comment));
                }
            }
        }

        if !page.methods.is_empty() {
            out.push_str("<h2>Index</h2>\n<ul>\n");
            for method in &page.methods {
                out.push_str(&format!(
                    "  <li><a href=\"#{}\">{}</a></li>\n",
                    html_escape(&anchor(&method.name)),
                    html_escape(&method.name)
                ));
            }
            out.push_str("</ul>\n");

            out.push_str("<h2>Functions</h2>\n");
            for method in &page.methods {
                out.push_str(&render_method_html(method));
            }
        }

        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_method_html(method: &Method) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<h3 id=\"{}\">{}</h3>\n",
        html_escape(&anchor(&method.name)),
        html_escape(&method.name)
    ));
    out.push_str(&format!(
        "<pre><code class=\"language-c\">{}</code></pre>\n",
        html_escape(&method.signature())
    ));
    if let Some(ref comment) = method.comment {
        out.push_str(&render_comment_html(comment));
    }
    out
}

fn render_comment_html(comment: &StructuredComment) -> String {
    let mut out = String::new();
    let sections = TagSections::from_comment(comment);

    if let Some(reason) = sections.deprecated {
        out.push_str("<p class=\"deprecated\"><strong>Deprecated.</strong>");
        if !reason.is_empty() {
            out.push_str(&format!(" {}", html_escape(reason)));
        }
        out.push_str("</p>\n");
    }

    // Already HTML.
    out.push_str(&comment.rendered_body);

    if !sections.params.is_empty() {
        out.push_str("<h4>Arguments</h4>\n<dl>\n");
        for (name, desc) in &sections.params {
            out.push_str(&format!("  <dt><code>{}</code></dt>\n", html_escape(name)));
            if !desc.is_empty() {
                out.push_str(&format!("  <dd>{}</dd>\n", html_escape(desc)));
            }
        }
        out.push_str("</dl>\n");
    }

    render_list_html(&mut out, &sections.returns, "Returns");
    render_list_html(&mut out, &sections.raises, "Raises");

    for example in &sections.examples {
        out.push_str("<h4>Example</h4>\n");
        out.push_str(&format!(
            "<pre><code class=\"language-c\">{}</code></pre>\n",
            html_escape(example)
        ));
    }

    render_list_html(&mut out, &sections.notes, "Notes");

    if !sections.see.is_empty() {
        out.push_str("<h4>See also</h4>\n<ul>\n");
        for target in &sections.see {
            out.push_str(&format!(
                "  <li><a href=\"#{}\">{}</a></li>\n",
                html_escape(&anchor(target)),
                html_escape(target)
            ));
        }
        out.push_str("</ul>\n");
    }

    if !sections.other.is_empty() {
        out.push_str("<h4>Other tags</h4>\n<dl>\n");
        for tag in &sections.other {
            out.push_str(&format!(
                "  <dt>@{}</dt>\n  <dd>{}</dd>\n",
                html_escape(&tag.name),
                html_escape(&tag.content)
            ));
        }
        out.push_str("</dl>\n");
    }

    out
}

fn render_list_html(out: &mut String, items: &[&str], title: &str) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("<h4>{}</h4>\n<ul>\n", title));
    for item in items {
        out.push_str(&format!("  <li>{}</li>\n", html_escape(item)));
    }
    out.push_str("</ul>\n");
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ComrakMarkup;
    use dgd_doc::Parser;

    fn render(src: &str) -> String {
        let markup = ComrakMarkup::default();
        let file = Parser::new(&markup).parse_str(src).unwrap();
        HtmlRenderer.render(&Page::new("a<b>", &file, false)).unwrap()
    }

    #[test]
    fn escapes() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn title_escaped() {
        let out = render("");
        assert!(out.contains("<title>a&lt;b&gt;</title>"));
        assert!(out.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn body_is_markdown_rendered() {
        let out = render("/**\n * Returns *all* users.\n * @param filter only `active` ones\n */\nmapping *users(string filter) {\n}\n");
        assert!(out.contains("<p>Returns <em>all</em> users.</p>"));
        assert!(out.contains("<dt><code>filter</code></dt>\n  <dd>only `active` ones</dd>"));
        assert!(out.contains("<a href=\"#users\">users</a>"));
        assert!(out.contains("mapping* users(string filter)"));
    }

    #[test]
    fn private_inherit_hidden() {
        let out = render("private inherit \"/secret\";\ninherit \"/open\";\n");
        assert!(out.contains("<code>/open</code>"));
        assert!(!out.contains("/secret"));
    }
}
