use chrono::Datelike;

use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::model::{EntryKind, FileId, ManifestEntry, Metadata, SectionType};
use crate::sanitize::sanitize_xml_attribute;

const FILE_ID: &str = "copyright";

/// Closing line of every copyright page.
pub const ATTRIBUTION_NOTICE: &str = "This book was produced using bindery.";

/// Copyright page: the book's custom notice, or one generated from the
/// copyright year and holder.
pub struct CopyrightRenderer;

fn generated_notice(metadata: &Metadata) -> String {
    let year = match metadata.copyright_year.as_deref().map(str::trim) {
        Some(year) if !year.is_empty() => year.to_string(),
        _ => chrono::Utc::now().year().to_string(),
    };
    let mut html = format!(
        "<p>{} Copyright &#169; {}",
        sanitize_xml_attribute(&metadata.title),
        sanitize_xml_attribute(&year)
    );
    if let Some(holder) = metadata
        .copyright_holder
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
    {
        html.push_str(&format!(" by {}. ", sanitize_xml_attribute(holder)));
    }
    html.push_str("</p>");
    html
}

impl SectionRenderer for CopyrightRenderer {
    fn name(&self) -> &'static str {
        "copyright"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let mut html = String::from(r#"<div id="copyright-page"><div class="ugc">"#);
        match book
            .metadata
            .custom_copyright
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        {
            Some(custom) => html.push_str(&ctx.knead(custom, SectionType::Custom, None)),
            None => html.push_str(&generated_notice(book.metadata)),
        }
        html.push_str(&format!("<p>{ATTRIBUTION_NOTICE}</p>"));
        html.push_str("</div></div>\n");

        let title = "Copyright";
        let filename = format!("{FILE_ID}.html");
        ctx.write_page(&filename, title, &html)?;
        ctx.state.manifest.push(
            FileId::new(FILE_ID),
            ManifestEntry::new(None, title, filename, EntryKind::Copyright),
        );
        Ok(())
    }
}
