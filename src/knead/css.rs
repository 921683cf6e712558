//! Stylesheet scraping: localize the images a stylesheet references.

use std::path::Path;

use cssparser::{ParseError, Parser, ParserInput, Token};

use super::assets::{AssetStore, is_remote};
use crate::error::Result;
use crate::sanitize::sanitize_file_name;

type CssParseError<'i> = ParseError<'i, ()>;

/// Stylesheet shipped with the crate, used when none is configured.
pub const BUNDLED_STYLESHEET: &str = include_str!("../../assets/style.css");

/// File name of the bundled stylesheet inside `css/`.
pub const BUNDLED_STYLESHEET_NAME: &str = "style.css";

/// Extract every `url(...)` reference in a stylesheet, quoted or not.
pub fn extract_css_urls(css: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    extract_urls_recursive(&mut parser, &mut urls);
    urls
}

fn extract_urls_recursive(parser: &mut Parser, urls: &mut Vec<String>) {
    while let Ok(token) = parser.next_including_whitespace_and_comments() {
        match token {
            Token::UnquotedUrl(url) => {
                urls.push(url.to_string());
            }
            Token::Function(name) if name.eq_ignore_ascii_case("url") => {
                let _ = parser.parse_nested_block(|p| {
                    if let Ok(Token::QuotedString(url)) = p.next() {
                        urls.push(url.to_string());
                    }
                    Ok::<_, CssParseError>(())
                });
            }
            Token::Function(_)
            | Token::CurlyBracketBlock
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock => {
                let _ = parser.parse_nested_block(|p| {
                    extract_urls_recursive(p, urls);
                    Ok::<_, CssParseError>(())
                });
            }
            _ => {}
        }
    }
}

/// How a single stylesheet reference is localized.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CssRef {
    /// `../images/<name>` next to the source stylesheet.
    LocalImage(String),
    /// Remote raster image.
    RemoteImage,
    Untouched,
}

fn classify(url: &str) -> CssRef {
    if let Some(name) = url.strip_prefix("../images/")
        && url.matches('/').count() == 2
    {
        return CssRef::LocalImage(name.to_string());
    }
    let lower = url.to_ascii_lowercase();
    let raster = [".jpg", ".jpeg", ".gif", ".png"]
        .iter()
        .any(|ext| lower.ends_with(ext));
    if is_remote(url) && raster {
        CssRef::RemoteImage
    } else {
        CssRef::Untouched
    }
}

/// Rewrite a stylesheet so that every qualifying image reference points at a
/// copy under the images directory of `store`.
///
/// `css_dir` is the directory of the source stylesheet; local references are
/// only copied when it is known. Non-qualifying references are left exactly
/// as written.
pub fn knead_css(css: &str, css_dir: Option<&Path>, store: &mut AssetStore<'_>) -> String {
    let mut refs = extract_css_urls(css);
    refs.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    refs.dedup();

    let mut css = css.to_string();
    for url in refs {
        match classify(&url) {
            CssRef::LocalImage(name) => {
                let Some(css_dir) = css_dir else {
                    tracing::debug!(%url, "no source directory for local stylesheet image");
                    continue;
                };
                let filename = sanitize_file_name(&name);
                if filename.is_empty() {
                    continue;
                }
                let source = css_dir.join(&url);
                if !source.is_file() {
                    tracing::warn!(%url, "stylesheet image not found");
                    continue;
                }
                if let Err(e) = std::fs::copy(&source, store.dir().join(&filename)) {
                    tracing::warn!(%url, error = %e, "cannot copy stylesheet image");
                    continue;
                }
                if filename != name {
                    css = css.replace(&url, &format!("../images/{filename}"));
                }
            }
            CssRef::RemoteImage => {
                if let Some(filename) = store.fetch_unique_image(&url) {
                    css = css.replace(&url, &format!("../images/{filename}"));
                }
            }
            CssRef::Untouched => {}
        }
    }
    css
}

/// Copy the configured (or bundled) stylesheet into `css_out`, localizing
/// its images. Returns the stylesheet's file name.
pub fn scrape_and_knead_css(
    source: Option<&Path>,
    css_out: &Path,
    store: &mut AssetStore<'_>,
) -> Result<String> {
    let (name, text, css_dir) = match source {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
            if had_errors {
                tracing::warn!(path = %path.display(), "stylesheet is not valid UTF-8");
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| BUNDLED_STYLESHEET_NAME.to_string());
            (name, text.into_owned(), path.parent())
        }
        None => (
            BUNDLED_STYLESHEET_NAME.to_string(),
            BUNDLED_STYLESHEET.to_string(),
            None,
        ),
    };

    let kneaded = knead_css(&text, css_dir, store);
    std::fs::write(css_out.join(&name), kneaded)?;
    tracing::info!(stylesheet = %name, "stylesheet ready");
    Ok(name)
}
