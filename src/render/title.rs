use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::model::{EntryKind, FileId, FrontMatterType, ManifestEntry, Metadata, SectionType};
use crate::sanitize::sanitize_xml_attribute;

const FILE_ID: &str = "title-page";

/// Title page: a custom `title-page` front-matter section when the book has
/// one, otherwise generated from the metadata.
pub struct TitlePageRenderer;

fn synthesized(metadata: &Metadata) -> String {
    let esc = |s: &str| sanitize_xml_attribute(s);
    format!(
        r#"<h1 class="title">{}</h1><h2 class="subtitle">{}</h2><div class="logo"></div><h3 class="author">{}</h3><h4 class="publisher">{}</h4><h5 class="publisher-city">{}</h5>"#,
        esc(&metadata.title),
        esc(&metadata.subtitle),
        esc(&metadata.author),
        esc(&metadata.publisher),
        esc(&metadata.publisher_city),
    )
}

impl SectionRenderer for TitlePageRenderer {
    fn name(&self) -> &'static str {
        "title page"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let custom = book
            .contents
            .front_matter
            .iter()
            .filter(|s| s.export)
            .find(|s| s.front_matter_type() == FrontMatterType::TitlePage);

        let content = match custom {
            Some(section) => ctx.knead(&section.content, SectionType::FrontMatter, None),
            None => String::new(),
        };
        let inner = if content.trim().is_empty() {
            synthesized(book.metadata)
        } else {
            content
        };
        let html = format!("<div id=\"title-page\">{inner}</div>\n");

        let title = "Title Page";
        let filename = format!("{FILE_ID}.html");
        ctx.write_page(&filename, title, &html)?;
        ctx.state.manifest.push(
            FileId::new(FILE_ID),
            ManifestEntry::new(None, title, filename, EntryKind::TitlePage),
        );
        Ok(())
    }
}
