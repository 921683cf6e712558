//! The `book.json` index read by HPub readers.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Manifest, Metadata};

pub const INDEX_FILE_NAME: &str = "book.json";

/// Contents of `book.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookIndex {
    pub title: String,
    pub author: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub contents: Vec<String>,
}

impl BookIndex {
    /// Build the index from the finished manifest.
    ///
    /// `cover_image` is the cover's file name under `images/`.
    pub fn new(manifest: &Manifest, metadata: &Metadata, cover_image: Option<&str>) -> Result<Self> {
        if manifest.is_empty() {
            return Err(Error::EmptyManifest);
        }
        Ok(Self {
            title: metadata.title.clone(),
            author: metadata.author.clone(),
            url: book_url(&metadata.url),
            cover: cover_image.map(|name| format!("images/{name}")),
            contents: manifest.filenames(),
        })
    }

    /// Serialize to `<dir>/book.json`.
    pub fn write(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_vec(self)?;
        std::fs::write(dir.join(INDEX_FILE_NAME), json)?;
        tracing::debug!(entries = self.contents.len(), "index written");
        Ok(())
    }
}

/// Replace the scheme of `url` with `book://`.
pub fn book_url(url: &str) -> String {
    let rest = match url.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() => rest,
        _ => url,
    };
    format!("book://{rest}")
}
