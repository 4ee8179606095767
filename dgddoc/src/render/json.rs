//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the [`Page`] directly; comment bodies arrive pre-rendered.

use crate::page::Page;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, page: &Page) -> Result<String> {
        let mut out = serde_json::to_string_pretty(page).context("failed to serialize page")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
