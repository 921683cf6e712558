use std::path::PathBuf;

use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::knead::{file_name_from_url, is_remote};
use crate::model::{EntryKind, FileId, ManifestEntry, Metadata};
use crate::sanitize::{sanitize_file_name, sanitize_xml_attribute};

/// Cover references ending like this mean "no cover chosen".
pub const DEFAULT_COVER_SUFFIX: &str = "assets/images/default-book-cover.png";

pub const BUNDLED_COVER_NAME: &str = "default-book-cover.png";

const BUNDLED_COVER: &[u8] = include_bytes!("../../assets/default-book-cover.png");

const FILE_ID: &str = "front-cover";

#[derive(Debug, Clone, PartialEq, Eq)]
enum CoverSource {
    Bundled,
    Remote(String),
    File(PathBuf),
}

fn cover_source(metadata: &Metadata, media_root: Option<&std::path::Path>) -> CoverSource {
    let reference = match metadata.cover_image.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() && !r.ends_with(DEFAULT_COVER_SUFFIX) => r,
        _ => return CoverSource::Bundled,
    };
    if is_remote(reference) {
        return CoverSource::Remote(reference.to_string());
    }
    let path = PathBuf::from(reference);
    match media_root {
        Some(root) if path.is_relative() => CoverSource::File(root.join(path)),
        _ => CoverSource::File(path),
    }
}

/// Front cover page, with the cover image scaled to fit the reader.
pub struct CoverRenderer;

impl CoverRenderer {
    /// Load, scale and save the cover. Returns its file name under `images/`.
    fn save_cover(&self, ctx: &mut RenderContext<'_, '_>, source: &CoverSource) -> Result<String> {
        let (name, bytes) = match source {
            CoverSource::Bundled => (BUNDLED_COVER_NAME.to_string(), BUNDLED_COVER.to_vec()),
            CoverSource::Remote(url) => {
                let bytes = ctx.kneader.assets().fetcher().fetch(url)?;
                (file_name_from_url(url), bytes)
            }
            CoverSource::File(path) => {
                let name = path
                    .file_name()
                    .map(|n| sanitize_file_name(&n.to_string_lossy()))
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "cover".to_string());
                (name, std::fs::read(path)?)
            }
        };
        let (width, height) = ctx.config.cover_bounds;
        let scaled = ctx.codec.resize(&bytes, width, height)?;
        std::fs::write(ctx.root.join("images").join(&name), scaled)?;
        Ok(name)
    }
}

impl SectionRenderer for CoverRenderer {
    fn name(&self) -> &'static str {
        "cover"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let source = cover_source(book.metadata, ctx.config.media_root.as_deref());
        match self.save_cover(ctx, &source) {
            Ok(name) => {
                tracing::info!(cover = %name, "cover image saved");
                ctx.state.cover_image = Some(name);
            }
            Err(e) => {
                tracing::warn!(source = ?source, error = %e, "cover image unusable, rendering cover without it");
                ctx.state.cover_image = None;
            }
        }

        let mut html = String::from(r#"<div id="cover-image">"#);
        if let Some(cover) = &ctx.state.cover_image {
            html.push_str(&format!(
                r#"<img src="images/{}" alt="{}" />"#,
                cover,
                sanitize_xml_attribute(&book.metadata.title)
            ));
        }
        html.push_str("</div>\n");

        let title = "Cover";
        let filename = format!("{FILE_ID}.html");
        ctx.write_page(&filename, title, &html)?;
        ctx.state.manifest.push(
            FileId::new(FILE_ID),
            ManifestEntry::new(None, title, filename, EntryKind::Cover),
        );
        Ok(())
    }
}
