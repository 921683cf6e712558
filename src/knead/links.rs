//! Hyperlink rewriting: internal cross-references, image-wrapper links and
//! URL canonicalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{SectionType, SlugIndex};

/// Files this crate generates, optionally followed by a fragment.
static LOCAL_OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:front-matter|part|chapter|back-matter)-\d{3,}-[^/?#]*|front-cover|title-page|copyright|table-of-contents)\.html(?:#.*)?$",
    )
    .unwrap()
});

/// Resolves links that point at other sections of the same book.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    index: SlugIndex,
    site_host: Option<String>,
}

impl LinkResolver {
    pub fn new(index: SlugIndex, site_host: Option<String>) -> Self {
        Self { index, site_host }
    }

    pub fn set_index(&mut self, index: SlugIndex) {
        self.index = index;
    }

    pub fn index(&self) -> &SlugIndex {
        &self.index
    }

    /// Output file name for `url` when it points inside the book.
    ///
    /// Only attempted for content rendered at a known position; `None` and
    /// `Some(0)` never resolve.
    pub fn resolve(&self, url: &str, position: Option<usize>) -> Option<String> {
        if position.unwrap_or(0) == 0 {
            return None;
        }
        let url = url.trim().trim_end_matches('/');
        let last = url.rsplit('/').next().unwrap_or(url).trim();
        if last.is_empty() {
            return None;
        }

        let (section_type, ordinal) = self.index.ordinal(last)?;

        if let Some(host) = url_host(url)
            && self.site_host.as_deref() != Some(host.as_str())
        {
            tracing::debug!(url, %host, "link to foreign host is not internal");
            return None;
        }

        Some(output_file_name(section_type, ordinal, last))
    }
}

/// `<type>-<NNN>-<slug>.html`
pub fn output_file_name(section_type: SectionType, ordinal: usize, slug: &str) -> String {
    format!("{}-{:03}-{}.html", section_type.as_str(), ordinal, slug)
}

/// Lowercased host of an absolute URL.
pub(crate) fn url_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

/// Whether `href` already names a file generated for this book.
pub fn is_local_output_ref(href: &str) -> bool {
    LOCAL_OUTPUT_RE.is_match(href.trim())
}

/// Whether a link target and an image source look like two renditions of the
/// same picture, e.g. `Photo-original.png` and `photo-300x200.PNG`: same
/// extension and same prefix before the first hyphen, ignoring case.
pub fn fuzzy_image_name_match(href: &str, src: &str) -> bool {
    fn split(file: &str) -> (String, String) {
        let base = file.rsplit('/').next().unwrap_or(file);
        let ext = base.rsplit('.').next().unwrap_or(base).to_ascii_lowercase();
        let stem = base.split('.').next().unwrap_or(base);
        let prefix = stem.split('-').next().unwrap_or(stem).to_ascii_lowercase();
        (ext, prefix)
    }
    split(href) == split(src)
}

/// Tidy an external URL: trim it, drop the trailing slash, force an `http`
/// scheme when none (or an unusable one) is given, and lowercase the scheme
/// and host. Relative references and non-web schemes are returned trimmed.
///
/// # Examples
///
/// ```
/// use bindery::knead::canonicalize_url;
///
/// assert_eq!(canonicalize_url(" HTTP://Example.COM/Some/Path/ "), "http://example.com/Some/Path");
/// assert_eq!(canonicalize_url("example.com/x"), "http://example.com/x");
/// assert_eq!(canonicalize_url("ftp://example.com/x"), "http://example.com/x");
/// assert_eq!(canonicalize_url("mailto:me@example.com"), "mailto:me@example.com");
/// ```
pub fn canonicalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.starts_with(['#', '/', '.', '?']) || has_opaque_scheme(url) {
        return url.to_string();
    }
    let url = url.trim_end_matches('/');

    let (scheme, rest) = match url.split_once("://") {
        Some((s, rest)) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https") => {
            (s.to_ascii_lowercase(), rest)
        }
        Some((_, rest)) => ("http".to_string(), rest),
        None => ("http".to_string(), url),
    };
    let (host, tail) = match rest.find(['/', '?', '#']) {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    format!("{scheme}://{}{tail}", host.to_ascii_lowercase())
}

fn has_opaque_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["mailto:", "tel:", "data:", "javascript:"]
        .iter()
        .any(|s| lower.starts_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolver() -> LinkResolver {
        let index: SlugIndex = [
            ("preface", SectionType::FrontMatter),
            ("alpha", SectionType::Chapter),
            ("beta", SectionType::Chapter),
            ("gamma", SectionType::Chapter),
            ("notes", SectionType::BackMatter),
        ]
        .into_iter()
        .map(|(s, t)| (s.to_string(), t))
        .collect();
        LinkResolver::new(index, Some("books.example.com".to_string()))
    }

    #[test]
    fn test_resolves_third_chapter() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://books.example.com/mybook/chapter/gamma/", Some(1)).as_deref(),
            Some("chapter-003-gamma.html")
        );
        assert_eq!(r.resolve("../chapter/gamma", Some(4)).as_deref(), Some("chapter-003-gamma.html"));
        assert_eq!(r.resolve("notes", Some(2)).as_deref(), Some("back-matter-001-notes.html"));
    }

    #[test]
    fn test_resolution_needs_position() {
        let r = resolver();
        assert_eq!(r.resolve("gamma", None), None);
        assert_eq!(r.resolve("gamma", Some(0)), None);
    }

    #[test]
    fn test_unknown_or_foreign_links_stay_external() {
        let r = resolver();
        assert_eq!(r.resolve("https://books.example.com/chapter/delta", Some(1)), None);
        assert_eq!(r.resolve("https://elsewhere.org/chapter/gamma", Some(1)), None);
        assert_eq!(r.resolve("   ", Some(1)), None);
    }

    #[test]
    fn test_fuzzy_image_name_match() {
        assert!(fuzzy_image_name_match(
            "http://x.org/Some_Image-original.png",
            "http://x.org/some_image-300x200.PNG"
        ));
        assert!(!fuzzy_image_name_match("a-1.png", "a-1.jpg"));
        assert!(!fuzzy_image_name_match("cat-1.png", "dog-1.png"));
    }

    #[test]
    fn test_local_output_refs() {
        assert!(is_local_output_ref("chapter-003-gamma.html"));
        assert!(is_local_output_ref("front-matter-001-preface.html#note-1"));
        assert!(is_local_output_ref("copyright.html"));
        assert!(!is_local_output_ref("chapter/gamma"));
        assert!(!is_local_output_ref("http://x.org/chapter-003-gamma.html"));
    }

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(url in "[a-zA-Z]{1,6}(://)?[a-zA-Z.]{1,12}(/[a-zA-Z0-9]{0,6}){0,3}/?") {
            let once = canonicalize_url(&url);
            prop_assert_eq!(canonicalize_url(&once), once);
        }
    }
}
