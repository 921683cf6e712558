//! Front matter, split in two passes so that dedications and epigraphs lead
//! regardless of where the author placed them.

use super::page::{header_lines, matter_markup, section_file_name};
use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::model::{EntryKind, FileId, FrontMatterType, ManifestEntry, Section, SectionType};

fn render_front_matter(
    ctx: &mut RenderContext<'_, '_>,
    section: &Section,
    subtype: FrontMatterType,
    ordinal: usize,
    with_header: bool,
) -> Result<()> {
    let mut body = ctx.knead(&section.content, SectionType::FrontMatter, Some(ordinal));
    if with_header {
        body.insert_str(0, &header_lines(section));
    }
    let html = matter_markup(
        SectionType::FrontMatter.as_str(),
        subtype.tag(),
        &section.slug,
        ordinal,
        section.heading(),
        &body,
    );

    let file_id = FileId::numbered(SectionType::FrontMatter, ordinal);
    let filename = section_file_name(file_id.as_str(), &section.slug);
    ctx.write_page(&filename, &section.title, &html)?;
    ctx.state.manifest.push(
        file_id,
        ManifestEntry::new(
            section.id,
            section.title.clone(),
            filename,
            EntryKind::FrontMatter(subtype),
        ),
    );
    Ok(())
}

/// Dedications, then epigraphs, numbered from 1.
pub struct DedicationEpigraphRenderer;

impl SectionRenderer for DedicationEpigraphRenderer {
    fn name(&self) -> &'static str {
        "dedication and epigraph"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let leading: Vec<_> = book
            .contents
            .front_matter
            .iter()
            .filter(|s| s.export && s.front_matter_type().leads_front_matter())
            .collect();

        let mut ordinal = 1;
        let mut last = None;
        for subtype in [FrontMatterType::Dedication, FrontMatterType::Epigraph] {
            for section in leading.iter().filter(|s| s.front_matter_type() == subtype) {
                render_front_matter(ctx, section, subtype, ordinal, false)?;
                last = Some(ordinal);
                ordinal += 1;
            }
        }
        ctx.state.front_matter_pos = ordinal;
        if last.is_some() {
            ctx.state.front_matter_last_pos = last;
        }
        Ok(())
    }
}

/// All other front matter, continuing the ordinal sequence.
pub struct FrontMatterRenderer;

impl SectionRenderer for FrontMatterRenderer {
    fn name(&self) -> &'static str {
        "front matter"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let mut ordinal = ctx.state.front_matter_pos;
        for section in book.contents.front_matter.iter().filter(|s| s.export) {
            let subtype = section.front_matter_type();
            if subtype.has_own_renderer() {
                continue;
            }
            if subtype == FrontMatterType::Introduction {
                ctx.state.has_introduction = true;
            }
            render_front_matter(ctx, section, subtype, ordinal, true)?;
            ordinal += 1;
        }
        ctx.state.front_matter_pos = ordinal;
        Ok(())
    }
}
