//! Fetch-and-dedup store for remote images.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::hooks::{AssetFetcher, ImageCodec};
use crate::sanitize::{force_ascii, sanitize_file_name, unique_file_name};

/// Remote images saved into one directory for the duration of a build.
///
/// Files are keyed by name. Content already saved during this build is
/// reused whatever name it was saved under; a name collision with different
/// content gets the next free `name-N.ext`. Each URL is fetched at most once.
pub struct AssetStore<'a> {
    fetcher: &'a dyn AssetFetcher,
    codec: &'a dyn ImageCodec,
    dir: PathBuf,
    fetched: HashMap<String, Option<String>>,
    saved: HashMap<sha1_smol::Digest, String>,
}

impl<'a> AssetStore<'a> {
    pub fn new(fetcher: &'a dyn AssetFetcher, codec: &'a dyn ImageCodec, dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            codec,
            dir: dir.into(),
            fetched: HashMap::new(),
            saved: HashMap::new(),
        }
    }

    /// Directory assets are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fetcher(&self) -> &'a dyn AssetFetcher {
        self.fetcher
    }

    /// Fetch `url`, validate it as an image and save it under a unique name.
    ///
    /// Returns the file name inside [`dir`](Self::dir), or `None` when the URL
    /// is not HTTP(S), the fetch fails, or the body is not an image.
    pub fn fetch_unique_image(&mut self, url: &str) -> Option<String> {
        let url = url.trim();
        if !is_remote(url) {
            return None;
        }
        if let Some(known) = self.fetched.get(url) {
            tracing::debug!(url, file = ?known, "asset already fetched");
            return known.clone();
        }
        let saved = self.fetch_and_save(url);
        self.fetched.insert(url.to_string(), saved.clone());
        saved
    }

    /// Number of distinct URLs seen so far.
    pub fn len(&self) -> usize {
        self.fetched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetched.is_empty()
    }

    fn fetch_and_save(&mut self, url: &str) -> Option<String> {
        let body = match self.fetcher.fetch(url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url, error = %e, "asset fetch failed");
                return None;
            }
        };
        if !self.codec.validate(&body) {
            tracing::debug!(url, "fetched asset is not an image");
            return None;
        }

        let digest = content_hash(&body);
        if let Some(existing) = self.saved.get(&digest) {
            tracing::debug!(url, file = %existing, "identical asset reused");
            return Some(existing.clone());
        }

        let mut filename = file_name_from_url(url);
        let path = self.dir.join(&filename);
        if path.exists() {
            match std::fs::read(&path) {
                Ok(existing) if content_hash(&existing) == digest => {
                    tracing::debug!(url, file = %filename, "identical asset reused");
                    self.saved.insert(digest, filename.clone());
                    return Some(filename);
                }
                _ => filename = unique_file_name(&self.dir, &filename),
            }
        }

        match std::fs::write(self.dir.join(&filename), &body) {
            Ok(()) => {
                tracing::debug!(url, file = %filename, bytes = body.len(), "asset saved");
                self.saved.insert(digest, filename.clone());
                Some(filename)
            }
            Err(e) => {
                tracing::warn!(url, file = %filename, error = %e, "cannot save asset");
                None
            }
        }
    }
}

/// Whether `url` has an `http` or `https` scheme.
pub fn is_remote(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Local file name for a remote URL: the basename without its query string,
/// percent-decoded and reduced to safe ASCII. Falls back to `image`.
pub fn file_name_from_url(url: &str) -> String {
    let basename = url.rsplit('/').next().unwrap_or(url);
    let basename = basename.split('?').next().unwrap_or(basename);
    let decoded = percent_decode_str(basename).decode_utf8_lossy();
    let name = force_ascii(&sanitize_file_name(&decoded));
    if name.is_empty() {
        "image".to_string()
    } else {
        name
    }
}

fn content_hash(bytes: &[u8]) -> sha1_smol::Digest {
    sha1_smol::Sha1::from(bytes).digest()
}
