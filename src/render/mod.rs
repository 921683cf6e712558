//! Section renderers.
//!
//! Each renderer writes its pages into the working directory and records them
//! in the manifest. They run in a fixed order, and the order matters: the
//! manifest is the reading order, and the table of contents (which runs last)
//! is generated from everything the others recorded.

mod back_matter;
mod copyright;
mod cover;
mod front_matter;
mod page;
mod parts;
mod title;
mod toc;

pub use back_matter::BackMatterRenderer;
pub use copyright::{ATTRIBUTION_NOTICE, CopyrightRenderer};
pub use cover::{BUNDLED_COVER_NAME, CoverRenderer, DEFAULT_COVER_SUFFIX};
pub use front_matter::{DedicationEpigraphRenderer, FrontMatterRenderer};
pub use parts::PartsAndChaptersRenderer;
pub use title::TitlePageRenderer;
pub use toc::{TOC_ID, TocRenderer};

use std::path::Path;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::hooks::{ImageCodec, PageRenderer, PageVars};
use crate::knead::HtmlKneader;
use crate::model::{BookContents, Manifest, Metadata, SectionType};

/// The book being rendered.
#[derive(Debug, Clone, Copy)]
pub struct BookInput<'b> {
    pub contents: &'b BookContents,
    pub metadata: &'b Metadata,
}

/// Mutable state shared by the renderers of one build.
#[derive(Debug, Clone)]
pub struct BuildState {
    pub manifest: Manifest,
    /// Stylesheet file name under `css/`.
    pub stylesheet: String,
    /// Next front-matter ordinal.
    pub front_matter_pos: usize,
    /// Ordinal of the last dedication or epigraph, if any was rendered.
    pub front_matter_last_pos: Option<usize>,
    /// Whether some section already carries the introduction marker.
    pub has_introduction: bool,
    /// Cover file name under `images/`.
    pub cover_image: Option<String>,
}

impl BuildState {
    pub fn new(stylesheet: impl Into<String>) -> Self {
        Self {
            manifest: Manifest::new(),
            stylesheet: stylesheet.into(),
            front_matter_pos: 1,
            front_matter_last_pos: None,
            has_introduction: false,
            cover_image: None,
        }
    }
}

/// Everything a renderer needs.
pub struct RenderContext<'r, 'a> {
    pub root: &'r Path,
    pub config: &'r ExportConfig,
    pub pages: &'r dyn PageRenderer,
    pub codec: &'r dyn ImageCodec,
    pub kneader: &'r mut HtmlKneader<'a>,
    pub state: BuildState,
}

impl RenderContext<'_, '_> {
    /// Render a page through the page template and write it to `filename`.
    pub fn write_page(&self, filename: &str, title: &str, content: &str) -> Result<()> {
        let html = self.pages.render(&PageVars {
            title,
            stylesheet: &self.state.stylesheet,
            content,
        })?;
        std::fs::write(self.root.join(filename), html)?;
        tracing::debug!(filename, "page written");
        Ok(())
    }

    pub fn knead(&mut self, html: &str, section_type: SectionType, position: Option<usize>) -> String {
        self.kneader.knead(html, section_type, position)
    }
}

/// One stage of page generation.
pub trait SectionRenderer {
    fn name(&self) -> &'static str;

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()>;
}

/// The renderers in reading-order-defining sequence.
pub fn renderers() -> [&'static dyn SectionRenderer; 8] {
    [
        &CoverRenderer,
        &TitlePageRenderer,
        &CopyrightRenderer,
        &DedicationEpigraphRenderer,
        &FrontMatterRenderer,
        &PartsAndChaptersRenderer,
        &BackMatterRenderer,
        &TocRenderer,
    ]
}

/// Run every renderer, starting from an empty manifest.
pub fn render_book(ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
    ctx.state.manifest.clear();
    for renderer in renderers() {
        renderer.render(ctx, book)?;
        tracing::debug!(
            renderer = renderer.name(),
            entries = ctx.state.manifest.len(),
            "renderer finished"
        );
    }
    tracing::info!(files = ctx.state.manifest.len(), "content rendered");
    Ok(())
}
