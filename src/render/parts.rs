use super::page::{chapter_markup, header_lines, part_markup, section_file_name};
use super::{BookInput, RenderContext, SectionRenderer};
use crate::error::Result;
use crate::model::{EntryKind, FileId, ManifestEntry, Part, Section, SectionType};

/// Parts and their chapters.
///
/// Parts and chapters are numbered independently. A part page is only emitted
/// when the book has several parts and this one has something to show; it is
/// slotted in front of the chapters it contains.
pub struct PartsAndChaptersRenderer;

impl PartsAndChaptersRenderer {
    fn render_chapter(
        ctx: &mut RenderContext<'_, '_>,
        chapter: &Section,
        ordinal: usize,
    ) -> Result<()> {
        let mut body = ctx.knead(&chapter.content, SectionType::Chapter, Some(ordinal));
        body.insert_str(0, &header_lines(chapter));

        let introduction = !ctx.state.has_introduction;
        if introduction {
            ctx.state.has_introduction = true;
        }
        let html = chapter_markup(introduction, &chapter.slug, ordinal, chapter.heading(), &body);

        let file_id = FileId::numbered(SectionType::Chapter, ordinal);
        let filename = section_file_name(file_id.as_str(), &chapter.slug);
        ctx.write_page(&filename, &chapter.title, &html)?;
        ctx.state.manifest.push(
            file_id,
            ManifestEntry::new(chapter.id, chapter.title.clone(), filename, EntryKind::Chapter),
        );
        Ok(())
    }

    fn render_part(
        ctx: &mut RenderContext<'_, '_>,
        part: &Part,
        ordinal: usize,
        introduction: bool,
        offset: usize,
    ) -> Result<()> {
        let section = &part.section;
        let html = part_markup(introduction, &section.slug, ordinal, &section.title);

        let file_id = FileId::numbered(SectionType::Part, ordinal);
        let filename = section_file_name(file_id.as_str(), &section.slug);
        ctx.write_page(&filename, &section.title, &html)?;
        ctx.state.manifest.insert_at(
            offset,
            file_id,
            ManifestEntry::new(section.id, section.title.clone(), filename, EntryKind::Part),
        );
        Ok(())
    }
}

impl SectionRenderer for PartsAndChaptersRenderer {
    fn name(&self) -> &'static str {
        "parts and chapters"
    }

    fn render(&self, ctx: &mut RenderContext<'_, '_>, book: BookInput<'_>) -> Result<()> {
        let part_count = book.contents.part.len();
        let mut part_ordinal = 1;
        let mut chapter_ordinal = 1;

        for part in &book.contents.part {
            let offset = ctx.state.manifest.len();

            let part_introduction = !ctx.state.has_introduction && part_count > 1;
            if part_introduction {
                ctx.state.has_introduction = true;
            }

            let mut rendered = 0;
            for chapter in part.chapters.iter().filter(|c| c.export) {
                Self::render_chapter(ctx, chapter, chapter_ordinal)?;
                chapter_ordinal += 1;
                rendered += 1;
            }

            if part_count > 1 && part.has_exportable_chapters() {
                Self::render_part(ctx, part, part_ordinal, part_introduction, offset)?;
                part_ordinal += 1;
            } else if part_introduction {
                ctx.state.has_introduction = false;
            }
            tracing::debug!(part = %part.section.slug, chapters = rendered, "part rendered");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::model::{BookContents, Metadata, SlugIndex};
    use crate::render::test_support::{context, keys, kneader};

    fn render(contents: &BookContents, has_introduction: bool) -> (tempfile::TempDir, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new();
        let mut kneader = kneader(&dir.path().join("images"), SlugIndex::new());
        let mut ctx = context(dir.path(), &config, &mut kneader);
        ctx.state.has_introduction = has_introduction;
        let metadata = Metadata::new("B");
        PartsAndChaptersRenderer
            .render(&mut ctx, BookInput { contents, metadata: &metadata })
            .unwrap();
        let keys = keys(&ctx);
        drop(ctx);
        (dir, keys)
    }

    fn read(dir: &tempfile::TempDir, name: &str) -> String {
        std::fs::read_to_string(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_single_part_has_no_part_page() {
        let contents = BookContents::new().with_part(
            Part::new(Section::new(1, "Main", "main"))
                .with_chapter(Section::new(2, "One", "one"))
                .with_chapter(Section::new(3, "Two", "two")),
        );
        let (dir, keys) = render(&contents, false);
        assert_eq!(keys, ["chapter-001", "chapter-002"]);
        assert!(read(&dir, "chapter-001-one.html").contains(r#"<div class="chapter introduction" id="one">"#));
        assert!(read(&dir, "chapter-002-two.html").contains(r#"<div class="chapter" id="two">"#));
    }

    #[test]
    fn test_parts_precede_their_chapters() {
        let contents = BookContents::new()
            .with_part(
                Part::new(Section::new(1, "First", "first"))
                    .with_chapter(Section::new(2, "One", "one"))
                    .with_chapter(Section::new(3, "Two", "two")),
            )
            .with_part(Part::new(Section::new(4, "Empty", "empty")))
            .with_part(
                Part::new(Section::new(5, "Second", "second"))
                    .with_chapter(Section::new(6, "Three", "three").with_author("Ann"))
                    .with_chapter(Section::new(7, "Draft", "draft").with_export(false)),
            );
        let (dir, keys) = render(&contents, false);
        assert_eq!(
            keys,
            ["part-001", "chapter-001", "chapter-002", "part-002", "chapter-003"]
        );

        // Exactly one section carries the introduction marker.
        let marked = ["part-001-first.html", "chapter-001-one.html", "chapter-002-two.html", "part-002-second.html", "chapter-003-three.html"]
            .iter()
            .filter(|f| read(&dir, f).contains(" introduction\""))
            .count();
        assert_eq!(marked, 1);
        assert!(read(&dir, "part-001-first.html").contains(r#"<div class="part introduction" id="first">"#));

        let three = read(&dir, "chapter-003-three.html");
        assert!(three.contains(r#"<h3 class="chapter-number">3</h3>"#));
        assert!(three.contains(r#"<h2 class="chapter-author">Ann</h2>"#));
        assert!(!dir.path().join("part-empty.html").exists());
    }

    #[test]
    fn test_introduction_rolls_back_for_empty_part() {
        let contents = BookContents::new()
            .with_part(Part::new(Section::new(1, "Empty", "empty")))
            .with_part(
                Part::new(Section::new(2, "Real", "real")).with_chapter(Section::new(3, "One", "one")),
            );
        let (dir, keys) = render(&contents, false);
        assert_eq!(keys, ["part-001", "chapter-001"]);
        assert!(read(&dir, "part-001-real.html").contains(r#"class="part introduction""#));
        assert!(read(&dir, "chapter-001-one.html").contains(r#"<div class="chapter" id="one">"#));
    }

    #[test]
    fn test_existing_introduction_suppresses_marker() {
        let contents = BookContents::new()
            .with_part(Part::new(Section::new(1, "A", "a")).with_chapter(Section::new(2, "One", "one")))
            .with_part(Part::new(Section::new(3, "B", "b")).with_chapter(Section::new(4, "Two", "two")));
        let (dir, _) = render(&contents, true);
        for file in ["part-001-a.html", "chapter-001-one.html", "part-002-b.html", "chapter-002-two.html"] {
            assert!(!read(&dir, file).contains(" introduction\""), "{file}");
        }
    }
}
