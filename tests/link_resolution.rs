//! Cross-reference tests.
//!
//! Links between sections of the same book are rewritten to the generated
//! file names; everything else is left external and canonicalized.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;

use bindery::model::{BookContents, Metadata, Part, Section};
use bindery::{AssetFetcher, Error, ExportConfig, HpubExporter, JsonBookProvider};

struct Offline;

impl AssetFetcher for Offline {
    fn fetch(&self, url: &str) -> bindery::Result<Vec<u8>> {
        Err(Error::fetch(url, "offline"))
    }
}

fn build(first_chapter: &str) -> BTreeMap<String, String> {
    let config = ExportConfig::new().with_site_url("https://books.example.com/");
    build_with(first_chapter, config, Metadata::new("Links"))
}

fn build_with(first_chapter: &str, config: ExportConfig, metadata: Metadata) -> BTreeMap<String, String> {
    let out = tempfile::tempdir().unwrap();
    let contents = BookContents::new()
        .with_front_matter(Section::new(1, "Preface", "preface").with_taxonomy("preface"))
        .with_part(
            Part::new(Section::new(2, "Main", "main"))
                .with_chapter(Section::new(3, "Alpha", "alpha").with_content(first_chapter))
                .with_chapter(Section::new(4, "Beta", "beta"))
                .with_chapter(Section::new(5, "Gamma", "gamma")),
        )
        .with_back_matter(Section::new(6, "Notes", "notes").with_taxonomy("notes"));
    let archive = HpubExporter::new()
        .with_config(config.with_output_dir(out.path()))
        .with_fetcher(Offline)
        .convert(&JsonBookProvider::new(metadata, contents))
        .unwrap();

    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut pages = BTreeMap::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        if entry.name().ends_with(".html") {
            let mut html = String::new();
            entry.read_to_string(&mut html).unwrap();
            pages.insert(entry.name().to_string(), html);
        }
    }
    pages
}

fn alpha(html: &str) -> String {
    build(html)["chapter-001-alpha.html"].clone()
}

#[test]
fn test_link_to_third_chapter() {
    let page = alpha(r#"<p><a href="https://books.example.com/chapter/gamma/">on</a></p>"#);
    assert!(page.contains(r#"<a href="chapter-003-gamma.html">on</a>"#), "{page}");
}

#[test]
fn test_relative_links_resolve() {
    let page = alpha(concat!(
        r#"<a href="/chapter/beta">b</a>"#,
        r#"<a href="/front-matter/preface/">p</a>"#,
        r#"<a href="/back-matter/notes/">n</a>"#,
    ));
    assert!(page.contains(r#"<a href="chapter-002-beta.html">b</a>"#), "{page}");
    assert!(page.contains(r#"<a href="front-matter-001-preface.html">p</a>"#), "{page}");
    assert!(page.contains(r#"<a href="back-matter-001-notes.html">n</a>"#), "{page}");
}

#[test]
fn test_bare_relative_links_resolve() {
    let page = alpha(r#"<a href="chapter/gamma">g</a><a href="gamma">h</a>"#);
    assert!(page.contains(r#"<a href="chapter-003-gamma.html">g</a>"#), "{page}");
    assert!(page.contains(r#"<a href="chapter-003-gamma.html">h</a>"#), "{page}");
}

#[test]
fn test_book_url_host_is_used_without_site_url() {
    let pages = build_with(
        concat!(
            r#"<a href="https://books.example.com/chapter/gamma/">g</a>"#,
            r#"<a href="https://elsewhere.org/chapter/beta/">b</a>"#,
        ),
        ExportConfig::new(),
        Metadata::new("Links").with_url("https://Books.Example.com/"),
    );
    let page = &pages["chapter-001-alpha.html"];
    assert!(page.contains(r#"<a href="chapter-003-gamma.html">g</a>"#), "{page}");
    assert!(page.contains(r#"<a href="https://elsewhere.org/chapter/beta">b</a>"#), "{page}");
}

#[test]
fn test_foreign_host_stays_external() {
    let page = alpha(r#"<a href="https://Elsewhere.ORG/chapter/gamma/">x</a>"#);
    assert!(page.contains(r#"<a href="https://elsewhere.org/chapter/gamma">x</a>"#), "{page}");
}

#[test]
fn test_unknown_slug_is_canonicalized() {
    let page = alpha(concat!(
        r#"<a href="HTTP://Books.Example.com/chapter/delta/">d</a>"#,
        r#"<a href="www.example.org/About">w</a>"#,
        r##"<a href="#top">t</a>"##,
        r#"<a href="mailto:editor@example.com">m</a>"#,
    ));
    assert!(page.contains(r#"<a href="http://books.example.com/chapter/delta">d</a>"#), "{page}");
    assert!(page.contains(r#"<a href="http://www.example.org/About">w</a>"#), "{page}");
    assert!(page.contains(r##"<a href="#top">t</a>"##), "{page}");
    assert!(page.contains(r#"<a href="mailto:editor@example.com">m</a>"#), "{page}");
}

#[test]
fn test_image_wrapper_link_is_dropped() {
    let page = alpha(concat!(
        r#"<a href="http://cdn.example.com/uploads/Photo-original.png">"#,
        r#"<img src="photo-300x200.PNG" alt="p"></a>"#,
    ));
    assert!(page.contains(r#"<a><img src="photo-300x200.PNG" alt="p" /></a>"#), "{page}");
}

#[test]
fn test_toc_links_match_resolved_targets() {
    let pages = build(r#"<a href="/chapter/gamma/">g</a>"#);
    assert!(pages["chapter-001-alpha.html"].contains(r#"<a href="chapter-003-gamma.html">g</a>"#));
    let toc = &pages["table-of-contents.html"];
    assert!(toc.contains(r#"<a href="chapter-003-gamma.html">Gamma</a>"#));
}
