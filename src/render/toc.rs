use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::model::{EntryKind, FileId, Manifest, ManifestEntry, SectionType};
use crate::sanitize::sanitize_xml_attribute;

pub const TOC_ID: &str = "table-of-contents";

/// Table of contents, generated from the manifest.
///
/// Must run after every other renderer. It places itself after the copyright
/// page, or after the last dedication or epigraph when there is one.
pub struct TocRenderer;

fn toc_anchor(manifest: &Manifest, front_matter_last_pos: Option<usize>) -> Option<FileId> {
    let anchor = match front_matter_last_pos {
        None => FileId::new("copyright"),
        Some(pos) => FileId::numbered(SectionType::FrontMatter, pos),
    };
    manifest.contains(&anchor).then_some(anchor)
}

fn annotation(class: &str, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        String::new()
    } else {
        format!(r#" <span class="{class}">{}</span>"#, sanitize_xml_attribute(text))
    }
}

fn toc_markup(manifest: &Manifest, book: BookInput<'_>) -> String {
    let mut html = String::from("<div id=\"toc\"><h1>Contents</h1><ul>");
    for (_, entry) in manifest.iter() {
        let Some(class) = entry.kind.toc_class() else {
            continue;
        };
        html.push_str(&format!(
            r#"<li class="{class}"><a href="{}">{}"#,
            entry.filename, entry.title
        ));
        if entry.kind.shows_annotations() {
            if let Some(section) = entry.source_id.and_then(|id| book.contents.section(id)) {
                html.push_str(&annotation("chapter-subtitle", &section.subtitle));
                html.push_str(&annotation("chapter-author", &section.section_author));
            }
        }
        html.push_str("</a></li>\n");
    }
    html.push_str("</ul></div>\n");
    html
}

impl SectionRenderer for TocRenderer {
    fn name(&self) -> &'static str {
        "table of contents"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let title = "Table Of Contents";
        let filename = format!("{TOC_ID}.html");
        let anchor = toc_anchor(&ctx.state.manifest, ctx.state.front_matter_last_pos);
        ctx.state.manifest.insert_after(
            anchor.as_ref(),
            FileId::new(TOC_ID),
            ManifestEntry::new(None, title, filename.clone(), EntryKind::TableOfContents),
        );

        let html = toc_markup(&ctx.state.manifest, book);
        ctx.write_page(&filename, title, &html)
    }
}
