//! Asset localization tests: images referenced from section HTML and from the
//! stylesheet are fetched once, stored under `images/` and deduplicated by
//! content.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Cursor, Read};
use std::rc::Rc;

use bindery::model::{BookContents, Metadata, Part, Section};
use bindery::{AssetFetcher, Error, ExportConfig, HpubExporter, JsonBookProvider};

/// In-memory fetcher that records every request.
#[derive(Default, Clone)]
struct CountingFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl CountingFetcher {
    fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

impl AssetFetcher for CountingFetcher {
    fn fetch(&self, url: &str) -> bindery::Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(url, "not found"))
    }
}

fn png(shade: u8) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::from_pixel(3, 3, image::Rgb([shade, 0, 0]))
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn read_archive(path: &std::path::Path) -> BTreeMap<String, Vec<u8>> {
    let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut files = BTreeMap::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        files.insert(entry.name().to_string(), bytes);
    }
    files
}

fn build(fetcher: CountingFetcher, config: ExportConfig, chapter: &str) -> BTreeMap<String, Vec<u8>> {
    let contents = BookContents::new().with_part(
        Part::new(Section::new(1, "Main", "main"))
            .with_chapter(Section::new(2, "One", "one").with_content(chapter)),
    );
    let archive = HpubExporter::new()
        .with_config(config)
        .with_fetcher(fetcher)
        .convert(&JsonBookProvider::new(Metadata::new("Pictures"), contents))
        .unwrap();
    read_archive(&archive)
}

#[test]
fn test_images_are_fetched_once_and_deduplicated() {
    let out = tempfile::tempdir().unwrap();
    let fetcher = CountingFetcher::default()
        .with("http://cdn.example.com/a/pic.png", png(10))
        .with("http://cdn.example.com/b/pic.png", png(200))
        .with("http://cdn.example.com/c/pic.png", png(10))
        .with("http://cdn.example.com/fake.png", b"<html>not found</html>".to_vec());
    let requests = fetcher.requests.clone();

    let files = build(
        fetcher,
        ExportConfig::new().with_output_dir(out.path()),
        concat!(
            r#"<p><img src="http://cdn.example.com/a/pic.png">"#,
            r#"<img src="http://cdn.example.com/b/pic.png">"#,
            r#"<img src="http://cdn.example.com/c/pic.png">"#,
            r#"<img src="http://cdn.example.com/missing.png">"#,
            r#"<img src="http://cdn.example.com/fake.png">"#,
            r#"<img src="http://cdn.example.com/a/pic.png"></p>"#,
        ),
    );

    let chapter = String::from_utf8(files["chapter-001-one.html"].clone()).unwrap();
    assert!(chapter.contains(concat!(
        r#"<p><img src="images/pic.png" />"#,
        r#"<img src="images/pic-1.png" />"#,
        r#"<img src="images/pic.png" />"#,
        r#"<img src="http://cdn.example.com/missing.png" />"#,
        r#"<img src="http://cdn.example.com/fake.png" />"#,
        r#"<img src="images/pic.png" /></p>"#,
    )));

    let images: Vec<_> = files
        .keys()
        .filter_map(|k| k.strip_prefix("images/"))
        .collect();
    assert_eq!(images, ["default-book-cover.png", "pic-1.png", "pic.png"]);
    assert_eq!(files["images/pic.png"], png(10));
    assert_eq!(files["images/pic-1.png"], png(200));

    let requests = requests.borrow();
    assert_eq!(
        requests.iter().filter(|u| u.as_str() == "http://cdn.example.com/a/pic.png").count(),
        1
    );
}

#[test]
fn test_stylesheet_images_share_the_store() {
    let out = tempfile::tempdir().unwrap();
    let theme = tempfile::tempdir().unwrap();
    let css = concat!(
        "body { background: url(\"http://cdn.example.com/bg/pic.png\"); }\n",
        "@font-face { src: url(https://cdn.example.com/face.woff); }\n",
        ".gone { background: url(http://cdn.example.com/gone.gif); }\n",
    );
    std::fs::write(theme.path().join("book.css"), css).unwrap();

    let fetcher = CountingFetcher::default()
        .with("http://cdn.example.com/a/pic.png", png(10))
        .with("http://cdn.example.com/bg/pic.png", png(10));
    let files = build(
        fetcher,
        ExportConfig::new()
            .with_output_dir(out.path())
            .with_stylesheet(theme.path().join("book.css")),
        r#"<img src="http://cdn.example.com/a/pic.png">"#,
    );

    let shipped = String::from_utf8(files["css/book.css"].clone()).unwrap();
    assert_eq!(
        shipped,
        concat!(
            "body { background: url(\"../images/pic.png\"); }\n",
            "@font-face { src: url(https://cdn.example.com/face.woff); }\n",
            ".gone { background: url(http://cdn.example.com/gone.gif); }\n",
        )
    );
    assert!(!files.contains_key("images/pic-1.png"));
}
