//! Book structure and metadata as supplied by the content provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::taxonomy::{BackMatterType, FrontMatterType, SectionType};

/// Identifier of a section in the host content system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub i64);

/// A single leaf record: one front-matter item, part, chapter or back-matter item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub id: Option<SectionId>,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Sections with this flag cleared are never rendered.
    pub export: bool,
    /// Taxonomy tag (e.g. `dedication`, `appendix`). Empty for chapters.
    pub taxonomy: String,
    /// Whether the section heading repeats the title.
    pub show_title: bool,
    pub short_title: String,
    pub subtitle: String,
    pub section_author: String,
}

impl Section {
    pub fn new(id: i64, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Some(SectionId(id)),
            title: title.into(),
            slug: slug.into(),
            export: true,
            show_title: true,
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_taxonomy(mut self, tag: impl Into<String>) -> Self {
        self.taxonomy = tag.into();
        self
    }

    pub fn with_export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.section_author = author.into();
        self
    }

    pub fn with_short_title(mut self, short_title: impl Into<String>) -> Self {
        self.short_title = short_title.into();
        self
    }

    pub fn front_matter_type(&self) -> FrontMatterType {
        FrontMatterType::from_tag(&self.taxonomy)
    }

    pub fn back_matter_type(&self) -> BackMatterType {
        BackMatterType::from_tag(&self.taxonomy)
    }

    /// The heading text: the title when `show_title` is set, otherwise empty.
    pub fn heading(&self) -> &str {
        if self.show_title { &self.title } else { "" }
    }
}

/// A part groups chapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Part {
    #[serde(flatten)]
    pub section: Section,
    pub chapters: Vec<Section>,
}

impl Part {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            chapters: Vec::new(),
        }
    }

    pub fn with_chapter(mut self, chapter: Section) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// Whether at least one chapter of this part will be rendered.
    pub fn has_exportable_chapters(&self) -> bool {
        self.chapters.iter().any(|c| c.export)
    }
}

/// The complete book tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BookContents {
    pub front_matter: Vec<Section>,
    #[serde(alias = "parts")]
    pub part: Vec<Part>,
    pub back_matter: Vec<Section>,
}

impl BookContents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_front_matter(mut self, section: Section) -> Self {
        self.front_matter.push(section);
        self
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.part.push(part);
        self
    }

    pub fn with_back_matter(mut self, section: Section) -> Self {
        self.back_matter.push(section);
        self
    }

    /// Iterate over every section in the tree, parts before their chapters.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.front_matter
            .iter()
            .chain(
                self.part
                    .iter()
                    .flat_map(|p| std::iter::once(&p.section).chain(p.chapters.iter())),
            )
            .chain(self.back_matter.iter())
    }

    /// Find a section by identifier.
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections().find(|s| s.id == Some(id))
    }
}

/// Book-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Book title (the site name in the host system).
    pub title: String,
    /// Public URL of the book.
    pub url: String,
    pub author: String,
    pub subtitle: String,
    pub publisher: String,
    pub publisher_city: String,
    /// Cover image reference: a URL or path resolved against the media root.
    pub cover_image: Option<String>,
    /// Replacement markup for the generated copyright notice.
    pub custom_copyright: Option<String>,
    pub copyright_year: Option<String>,
    pub copyright_holder: Option<String>,
    /// Any other key/value pairs from the host system.
    pub extra: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>, city: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self.publisher_city = city.into();
        self
    }

    pub fn with_cover_image(mut self, cover: impl Into<String>) -> Self {
        self.cover_image = Some(cover.into());
        self
    }
}

/// Slug to section-type lookup covering the whole book, in canonical order.
///
/// Used to recognise links that point at other sections of the same book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugIndex {
    entries: Vec<(String, SectionType)>,
}

impl SlugIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slug. Slugs already present keep their first position.
    pub fn push(&mut self, slug: impl Into<String>, section_type: SectionType) {
        let slug = slug.into();
        if slug.is_empty() {
            return;
        }
        if let Some(existing) = self.get(&slug) {
            tracing::debug!(%slug, kept = %existing, skipped = %section_type, "slug collision");
            return;
        }
        self.entries.push((slug, section_type));
    }

    /// Derive the index from the export-eligible sections of a book.
    ///
    /// Front matter is counted in book order, title pages included, so link
    /// ordinals can differ from the numbering the renderers give front matter.
    pub fn from_contents(contents: &BookContents) -> Self {
        let mut index = Self::new();
        for section in contents.front_matter.iter().filter(|s| s.export) {
            index.push(section.slug.clone(), SectionType::FrontMatter);
        }
        for part in &contents.part {
            index.push(part.section.slug.clone(), SectionType::Part);
            for chapter in part.chapters.iter().filter(|c| c.export) {
                index.push(chapter.slug.clone(), SectionType::Chapter);
            }
        }
        for section in contents.back_matter.iter().filter(|s| s.export) {
            index.push(section.slug.clone(), SectionType::BackMatter);
        }
        index
    }

    pub fn get(&self, slug: &str) -> Option<SectionType> {
        self.entries
            .iter()
            .find(|(s, _)| s == slug)
            .map(|(_, t)| *t)
    }

    /// 1-based position of `slug` among the entries sharing its section type.
    pub fn ordinal(&self, slug: &str) -> Option<(SectionType, usize)> {
        let section_type = self.get(slug)?;
        let mut ordinal = 0;
        for (s, t) in &self.entries {
            if *t == section_type {
                ordinal += 1;
            }
            if s == slug {
                break;
            }
        }
        Some((section_type, ordinal))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, SectionType)> for SlugIndex {
    fn from_iter<I: IntoIterator<Item = (String, SectionType)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (slug, section_type) in iter {
            index.push(slug, section_type);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BookContents {
        BookContents::new()
            .with_front_matter(Section::new(1, "Preface", "preface").with_taxonomy("preface"))
            .with_front_matter(Section::new(2, "Hidden", "hidden").with_export(false))
            .with_part(
                Part::new(Section::new(10, "Part One", "part-one"))
                    .with_chapter(Section::new(11, "Alpha", "alpha"))
                    .with_chapter(Section::new(12, "Beta", "beta"))
                    .with_chapter(Section::new(13, "Gamma", "gamma")),
            )
            .with_back_matter(Section::new(20, "Notes", "notes").with_taxonomy("notes"))
    }

    #[test]
    fn test_slug_index_ordinals() {
        let index = SlugIndex::from_contents(&sample());
        assert_eq!(index.ordinal("gamma"), Some((SectionType::Chapter, 3)));
        assert_eq!(index.ordinal("alpha"), Some((SectionType::Chapter, 1)));
        assert_eq!(index.ordinal("preface"), Some((SectionType::FrontMatter, 1)));
        assert_eq!(index.ordinal("part-one"), Some((SectionType::Part, 1)));
        assert_eq!(index.ordinal("hidden"), None);
    }

    #[test]
    fn test_slug_index_keeps_first_duplicate() {
        let index: SlugIndex = [
            ("intro".to_string(), SectionType::FrontMatter),
            ("intro".to_string(), SectionType::Chapter),
            ("beta".to_string(), SectionType::Chapter),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("intro"), Some(SectionType::FrontMatter));
        assert_eq!(index.ordinal("beta"), Some((SectionType::Chapter, 1)));
    }

    #[test]
    fn test_find_section() {
        let book = sample();
        assert_eq!(book.section(SectionId(12)).map(|s| s.slug.as_str()), Some("beta"));
        assert_eq!(book.section(SectionId(10)).map(|s| s.slug.as_str()), Some("part-one"));
        assert!(book.section(SectionId(99)).is_none());
    }

    #[test]
    fn test_deserialize_contents() {
        let json = r#"{
            "front-matter": [{"id": 1, "title": "Dedication", "slug": "ded", "export": true, "taxonomy": "dedication"}],
            "part": [{"id": 2, "title": "Main", "slug": "main", "chapters": [{"id": 3, "title": "One", "slug": "one", "export": true}]}],
            "back-matter": []
        }"#;
        let book: BookContents = serde_json::from_str(json).unwrap();
        assert_eq!(book.front_matter[0].front_matter_type(), crate::model::FrontMatterType::Dedication);
        assert_eq!(book.part[0].section.slug, "main");
        assert_eq!(book.part[0].chapters.len(), 1);
        assert!(book.part[0].has_exportable_chapters());
    }

    #[test]
    fn test_heading_respects_show_title() {
        let mut section = Section::new(1, "Title", "title");
        assert_eq!(section.heading(), "Title");
        section.show_title = false;
        assert_eq!(section.heading(), "");
    }
}
