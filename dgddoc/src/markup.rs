//! CommonMark comment bodies rendered to HTML with comrak.

use comrak::{markdown_to_html, Options};
use dgd_doc::MarkupRenderer;

pub struct ComrakMarkup {
    options: Options<'static>,
}

impl Default for ComrakMarkup {
    fn default() -> Self {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        Self { options }
    }
}

impl MarkupRenderer for ComrakMarkup {
    fn render(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        markdown_to_html(text, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_code() {
        let html = ComrakMarkup::default().render("Call `foo()` first.\n\nThen *bar*.");
        assert_eq!(
            html,
            "<p>Call <code>foo()</code> first.</p>\n<p>Then <em>bar</em>.</p>\n"
        );
    }

    #[test]
    fn raw_html_is_not_passed_through() {
        let html = ComrakMarkup::default().render("<script>x</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn blank_body_renders_nothing() {
        assert_eq!(ComrakMarkup::default().render("  \n"), "");
    }
}
