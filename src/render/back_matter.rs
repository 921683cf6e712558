use super::page::{matter_markup, section_file_name};
use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::model::{EntryKind, FileId, ManifestEntry, SectionType};

pub struct BackMatterRenderer;

impl SectionRenderer for BackMatterRenderer {
    fn name(&self) -> &'static str {
        "back matter"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let mut ordinal = 1;
        for section in book.contents.back_matter.iter().filter(|s| s.export) {
            let subtype = section.back_matter_type();
            let body = ctx.knead(&section.content, SectionType::BackMatter, Some(ordinal));
            let html = matter_markup(
                SectionType::BackMatter.as_str(),
                subtype.tag(),
                &section.slug,
                ordinal,
                section.heading(),
                &body,
            );

            let file_id = FileId::numbered(SectionType::BackMatter, ordinal);
            let filename = section_file_name(file_id.as_str(), &section.slug);
            ctx.write_page(&filename, &section.title, &html)?;
            ctx.state.manifest.push(
                file_id,
                ManifestEntry::new(
                    section.id,
                    section.title.clone(),
                    filename,
                    EntryKind::BackMatter(subtype),
                ),
            );
            ordinal += 1;
        }
        Ok(())
    }
}
