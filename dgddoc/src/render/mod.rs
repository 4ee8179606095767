//! Renderer module — trait-based format dispatch.

pub mod html;
pub mod json;
pub mod markdown;

use crate::markup::ComrakMarkup;
use crate::page::Page;
use anyhow::{anyhow, Result};
use dgd_doc::{MarkupRenderer, PlainText};

/// Trait for rendering a [`Page`] into a specific output format.
pub trait Renderer {
    fn render(&self, page: &Page) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown, html, or json",
            format
        )),
    }
}

/// How comment bodies are rendered for a format. Markdown pages keep the
/// author's text; HTML and JSON carry it pre-rendered to HTML.
pub fn markup_for(format: &str) -> Box<dyn MarkupRenderer> {
    match format {
        "markdown" | "md" => Box::new(PlainText),
        _ => Box::new(ComrakMarkup::default()),
    }
}

/// GitHub heading anchor for a member name.
///
/// Unlike shell function names, LPC identifiers are mostly snake_case, so
/// underscores are kept the way GitHub keeps them.
pub fn anchor(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_rejected() {
        let err = create_renderer("pdf").err().unwrap();
        assert!(err.to_string().contains("unknown format: pdf"));
    }

    #[test]
    fn extensions() {
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("html").unwrap().file_extension(), "html");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
    }

    #[test]
    fn anchors_keep_underscores() {
        assert_eq!(anchor("add_handler"), "add_handler");
        assert_eq!(anchor("Query_IP"), "query_ip");
    }

    #[test]
    fn markup_depends_on_format() {
        assert_eq!(markup_for("markdown").render("*hi*"), "*hi*");
        assert!(markup_for("html").render("*hi*").contains("<em>hi</em>"));
    }
}
