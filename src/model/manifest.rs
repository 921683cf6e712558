//! The ordered manifest of generated files.
//!
//! Reading order is the manifest order. Renderers append entries as they
//! produce files; the only other mutation is positional insertion (parts go in
//! front of the chapters they contain, the table of contents goes after the
//! leading front matter). Existing entries are never moved relative to each
//! other.

use std::fmt;

use super::book::SectionId;
use super::taxonomy::{BackMatterType, FrontMatterType, SectionType};

/// Stable manifest key such as `chapter-002` or `copyright`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Key for the `ordinal`-th section of `section_type`, e.g. `part-003`.
    pub fn numbered(section_type: SectionType, ordinal: usize) -> Self {
        Self(format!("{}-{:03}", section_type.as_str(), ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What a manifest entry is, which decides how the table of contents lists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Cover,
    TitlePage,
    Copyright,
    FrontMatter(FrontMatterType),
    Part,
    Chapter,
    BackMatter(BackMatterType),
    TableOfContents,
}

impl EntryKind {
    /// CSS class used for the entry in the table of contents, or `None` when
    /// the entry is not listed there.
    pub fn toc_class(self) -> Option<String> {
        match self {
            Self::FrontMatter(t) => Some(format!("front-matter {}", t.tag())),
            Self::Part => Some("part".to_string()),
            Self::Chapter => Some("chapter".to_string()),
            Self::BackMatter(t) => Some(format!("back-matter {}", t.tag())),
            _ => None,
        }
    }

    /// Whether subtitle and author annotations are shown in the table of contents.
    pub fn shows_annotations(self) -> bool {
        matches!(self, Self::FrontMatter(_) | Self::Chapter)
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// The section this file was generated from; `None` for synthesized pages.
    pub source_id: Option<SectionId>,
    pub title: String,
    pub filename: String,
    pub kind: EntryKind,
}

impl ManifestEntry {
    pub fn new(
        source_id: Option<SectionId>,
        title: impl Into<String>,
        filename: impl Into<String>,
        kind: EntryKind,
    ) -> Self {
        Self {
            source_id,
            title: title.into(),
            filename: filename.into(),
            kind,
        }
    }
}

/// Ordered association of [`FileId`] to [`ManifestEntry`].
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<(FileId, ManifestEntry)>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append an entry. Re-using a key replaces the entry in place.
    pub fn push(&mut self, id: FileId, entry: ManifestEntry) {
        match self.position(&id) {
            Some(pos) => self.entries[pos].1 = entry,
            None => self.entries.push((id, entry)),
        }
    }

    /// Insert an entry at `index` (clamped to the end), shifting later entries.
    ///
    /// An existing entry with the same key is removed first.
    pub fn insert_at(&mut self, index: usize, id: FileId, entry: ManifestEntry) {
        let mut index = index;
        if let Some(pos) = self.position(&id) {
            self.entries.remove(pos);
            if pos < index {
                index -= 1;
            }
        }
        let index = index.min(self.entries.len());
        self.entries.insert(index, (id, entry));
    }

    /// Insert immediately after `after`, or at the front when `after` is absent.
    pub fn insert_after(&mut self, after: Option<&FileId>, id: FileId, entry: ManifestEntry) {
        let index = after
            .and_then(|key| self.position(key))
            .map_or(0, |pos| pos + 1);
        self.insert_at(index, id, entry);
    }

    pub fn position(&self, id: &FileId) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == id)
    }

    pub fn get(&self, id: &FileId) -> Option<&ManifestEntry> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, &ManifestEntry)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    pub fn keys(&self) -> impl Iterator<Item = &FileId> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Output filenames in reading order.
    pub fn filenames(&self) -> Vec<String> {
        self.entries.iter().map(|(_, e)| e.filename.clone()).collect()
    }
}
