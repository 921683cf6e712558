//! Content preprocessing.
//!
//! Runs once over the whole book before anything is rendered: section bodies
//! go through the content filter and the kneader, titles are made safe for
//! attributes, and slugs are reduced to file-name-safe tokens.

use std::ops::Deref;

use crate::hooks::ContentFilter;
use crate::knead::HtmlKneader;
use crate::model::{BookContents, Section, SectionId, SectionType};
use crate::sanitize::{sanitize_slug, sanitize_xml_attribute};

/// The section currently being processed, as seen by a [`ContentFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionContext {
    pub current: Option<SectionId>,
}

impl SectionContext {
    /// Make `id` current until the returned guard is dropped.
    pub fn enter(&mut self, id: Option<SectionId>) -> SectionGuard<'_> {
        let previous = std::mem::replace(&mut self.current, id);
        SectionGuard { ctx: self, previous }
    }
}

/// Restores the previous section on drop, including during unwinding.
#[derive(Debug)]
pub struct SectionGuard<'a> {
    ctx: &'a mut SectionContext,
    previous: Option<SectionId>,
}

impl Deref for SectionGuard<'_> {
    type Target = SectionContext;

    fn deref(&self) -> &SectionContext {
        self.ctx
    }
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        self.ctx.current = self.previous;
    }
}

/// Filters, kneads and sanitizes every section of a book.
pub struct ContentPreprocessor<'f, 'k, 'a> {
    filter: &'f dyn ContentFilter,
    kneader: &'k mut HtmlKneader<'a>,
    context: SectionContext,
}

impl<'f, 'k, 'a> ContentPreprocessor<'f, 'k, 'a> {
    pub fn new(filter: &'f dyn ContentFilter, kneader: &'k mut HtmlKneader<'a>) -> Self {
        Self {
            filter,
            kneader,
            context: SectionContext::default(),
        }
    }

    /// The context outside of any section.
    pub fn context(&self) -> &SectionContext {
        &self.context
    }

    pub fn run(&mut self, mut contents: BookContents) -> BookContents {
        let mut count = 0;
        for section in &mut contents.front_matter {
            self.section(section, SectionType::FrontMatter);
            count += 1;
        }
        for part in &mut contents.part {
            self.section(&mut part.section, SectionType::Part);
            count += 1;
            for chapter in &mut part.chapters {
                self.section(chapter, SectionType::Chapter);
                count += 1;
            }
        }
        for section in &mut contents.back_matter {
            self.section(section, SectionType::BackMatter);
            count += 1;
        }
        tracing::info!(sections = count, "preprocessed book contents");
        contents
    }

    fn section(&mut self, section: &mut Section, section_type: SectionType) {
        let filtered = {
            let ctx = self.context.enter(section.id);
            self.filter.filter(&ctx, &section.content)
        };
        section.content = self.kneader.knead_assets(&filtered, section_type);
        section.title = sanitize_xml_attribute(&section.title);
        section.slug = sanitize_slug(&section.slug);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::{Error, Result};
    use crate::hooks::{AssetFetcher, PassthroughFilter, RasterCodec};
    use crate::knead::{AssetStore, LinkResolver};
    use crate::model::Part;

    struct Offline;

    impl AssetFetcher for Offline {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(Error::fetch(url, "offline"))
        }
    }

    #[test]
    fn test_guard_restores_previous_section() {
        let mut ctx = SectionContext {
            current: Some(SectionId(1)),
        };
        {
            let inner = ctx.enter(Some(SectionId(2)));
            assert_eq!(inner.current, Some(SectionId(2)));
        }
        assert_eq!(ctx.current, Some(SectionId(1)));
    }

    #[test]
    fn test_guard_restores_on_unwind() {
        let mut ctx = SectionContext::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ctx.enter(Some(SectionId(7)));
            panic!("filter failed");
        }));
        assert!(result.is_err());
        assert_eq!(ctx.current, None);
    }

    #[test]
    fn test_run_filters_kneads_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(&Offline, &RasterCodec, dir.path());
        let mut kneader = HtmlKneader::new(store, LinkResolver::default());

        let seen = RefCell::new(Vec::new());
        let filter = |ctx: &SectionContext, body: &str| {
            seen.borrow_mut().push(ctx.current);
            format!("<p>{body}<br></p>")
        };

        let contents = BookContents::new()
            .with_front_matter(Section::new(1, "Tom & Jerry", "Tom & Jerry!"))
            .with_part(
                Part::new(Section::new(2, "Part", "part"))
                    .with_chapter(Section::new(3, "Ch", "Chapter One").with_content("x")),
            );

        let mut pre = ContentPreprocessor::new(&filter, &mut kneader);
        let out = pre.run(contents);
        assert_eq!(pre.context().current, None);

        assert_eq!(
            *seen.borrow(),
            [Some(SectionId(1)), Some(SectionId(2)), Some(SectionId(3))]
        );
        assert_eq!(out.front_matter[0].title, "Tom &amp; Jerry");
        assert_eq!(out.front_matter[0].slug, "tom-jerry");
        assert_eq!(out.part[0].chapters[0].slug, "chapter-one");
        assert_eq!(out.part[0].chapters[0].content, "<p>x<br /></p>");
    }

    #[test]
    fn test_run_keeps_relative_links() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(&Offline, &RasterCodec, dir.path());
        let mut kneader = HtmlKneader::new(store, LinkResolver::default());

        let contents = BookContents::new().with_part(Part::new(Section::new(1, "Part", "part")).with_chapter(
            Section::new(2, "Ch", "ch").with_content(r#"<a href="chapter/gamma">g</a><a href="gamma">h</a>"#),
        ));
        let out = ContentPreprocessor::new(&PassthroughFilter, &mut kneader).run(contents);
        assert_eq!(
            out.part[0].chapters[0].content,
            r#"<a href="chapter/gamma">g</a><a href="gamma">h</a>"#
        );
    }
}
