//! Collaborator traits and their default implementations.
//!
//! The pipeline talks to the outside world only through these seams: where
//! the book comes from, how section bodies are filtered, how assets are
//! fetched and images decoded, how pages are templated and how the final
//! archive is written.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::imageops::FilterType;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{BookContents, Metadata, SlugIndex};
use crate::preprocess::SectionContext;
use crate::sanitize::sanitize_xml_attribute;

/// Transforms a section body before it is kneaded.
pub trait ContentFilter {
    fn filter(&self, ctx: &SectionContext, content: &str) -> String;
}

/// Leaves content unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFilter;

impl ContentFilter for PassthroughFilter {
    fn filter(&self, _ctx: &SectionContext, content: &str) -> String {
        content.to_string()
    }
}

impl<F> ContentFilter for F
where
    F: Fn(&SectionContext, &str) -> String,
{
    fn filter(&self, ctx: &SectionContext, content: &str) -> String {
        self(ctx, content)
    }
}

/// Retrieves the bytes behind a remote asset URL.
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "fetching asset");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::fetch(url, e.to_string()))?;
        let body = response
            .bytes()
            .map_err(|e| Error::fetch(url, e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Image decoding and scaling.
pub trait ImageCodec {
    /// Whether `bytes` decode as an image.
    fn validate(&self, bytes: &[u8]) -> bool;

    /// Scale down to fit within `max_width` x `max_height`, keeping the aspect
    /// ratio. Smaller images are re-encoded at their original size.
    fn resize(&self, bytes: &[u8], max_width: u32, max_height: u32) -> Result<Vec<u8>>;
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn validate(&self, bytes: &[u8]) -> bool {
        image::load_from_memory(bytes).is_ok()
    }

    fn resize(&self, bytes: &[u8], max_width: u32, max_height: u32) -> Result<Vec<u8>> {
        let format = image::guess_format(bytes)?;
        let img = image::load_from_memory_with_format(bytes, format)?;
        let img = if img.width() > max_width || img.height() > max_height {
            img.resize(max_width, max_height, FilterType::Lanczos3)
        } else {
            img
        };
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format)?;
        Ok(out.into_inner())
    }
}

/// Template variables for one output page.
#[derive(Debug, Clone, Copy)]
pub struct PageVars<'a> {
    pub title: &'a str,
    /// Stylesheet file name under `css/`.
    pub stylesheet: &'a str,
    pub content: &'a str,
}

/// Turns page variables into a complete HTML document.
pub trait PageRenderer {
    fn render(&self, vars: &PageVars<'_>) -> Result<String>;
}

/// Default XHTML-compatible page template.
#[derive(Debug, Clone, Copy, Default)]
pub struct XhtmlPageRenderer;

impl PageRenderer for XhtmlPageRenderer {
    fn render(&self, vars: &PageVars<'_>) -> Result<String> {
        if vars.stylesheet.is_empty() {
            return Err(Error::Template("no stylesheet was set up".into()));
        }
        Ok(format!(
            r#"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<meta charset="utf-8" />
<title>{}</title>
<link rel="stylesheet" href="css/{}" type="text/css" />
</head>
<body>
{}
</body>
</html>
"#,
            sanitize_xml_attribute(vars.title),
            sanitize_xml_attribute(vars.stylesheet),
            vars.content
        ))
    }
}

/// Writes a set of files into an archive.
pub trait Archiver {
    /// Add `files` to a new archive at `dest`, naming each entry by its path
    /// relative to `root`. Returns the number of entries written.
    fn write(&self, files: &[PathBuf], root: &Path, dest: &Path) -> Result<usize>;
}

/// Deflate-compressed zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
}

impl Archiver for ZipArchiver {
    fn write(&self, files: &[PathBuf], root: &Path, dest: &Path) -> Result<usize> {
        let mut zip = ZipWriter::new(File::create(dest)?);
        let compression_level = self.compression_level.unwrap_or(6);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));

        let mut added = 0;
        for path in files {
            let Ok(relative) = path.strip_prefix(root) else {
                tracing::warn!(path = %path.display(), "file outside archive root skipped");
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            zip.start_file(name, deflated)?;
            zip.write_all(&std::fs::read(path)?)?;
            added += 1;
        }
        zip.finish()?;
        Ok(added)
    }
}

/// Source of the book tree and its metadata.
pub trait BookContentProvider {
    fn contents(&self) -> Result<BookContents>;

    fn metadata(&self) -> Result<Metadata>;

    /// Slug lookup used to resolve links between sections.
    fn slug_index(&self, contents: &BookContents) -> SlugIndex {
        SlugIndex::from_contents(contents)
    }
}

/// Reads a book from a JSON document of the form
/// `{"metadata": {...}, "contents": {"front-matter": [...], "part": [...], "back-matter": [...]}}`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct JsonBookProvider {
    metadata: Metadata,
    contents: BookContents,
}

impl JsonBookProvider {
    pub fn new(metadata: Metadata, contents: BookContents) -> Self {
        Self { metadata, contents }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl BookContentProvider for JsonBookProvider {
    fn contents(&self) -> Result<BookContents> {
        Ok(self.contents.clone())
    }

    fn metadata(&self) -> Result<Metadata> {
        Ok(self.metadata.clone())
    }
}
