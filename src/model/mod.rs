//! Core data model.
//!
//! This module contains:
//! - The book tree and metadata handed over by the content provider
//! - The section taxonomy (structural types and editorial subtypes)
//! - The ordered manifest of generated files

mod book;
mod manifest;
mod taxonomy;

pub use book::{BookContents, Metadata, Part, Section, SectionId, SlugIndex};
pub use manifest::{EntryKind, FileId, Manifest, ManifestEntry};
pub use taxonomy::{BackMatterType, FrontMatterType, SectionType};
