//! # bindery
//!
//! Compiles a structured book (front matter, parts with chapters, back matter
//! and metadata) into an HPub archive: a zip of standalone HTML pages, a
//! stylesheet, localized images and a `book.json` index.
//!
//! ## Pipeline
//!
//! 1. Section bodies are filtered and kneaded: remote images are fetched into
//!    `images/`, links between sections are rewritten to output file names,
//!    and the markup is re-serialized in an XHTML-friendly form.
//! 2. The stylesheet is copied and its image references localized.
//! 3. Renderers write the cover, title page, copyright page, front matter,
//!    parts and chapters, back matter and table of contents, recording each
//!    page in the [`Manifest`](model::Manifest).
//! 4. The manifest becomes `book.json` and the directory is zipped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bindery::{ExportConfig, HpubExporter, JsonBookProvider};
//!
//! let provider = JsonBookProvider::from_path("book.json".as_ref())?;
//! let archive = HpubExporter::new()
//!     .with_config(ExportConfig::new().with_output_dir("dist"))
//!     .convert(&provider)?;
//! println!("wrote {}", archive.display());
//! # Ok::<(), bindery::Error>(())
//! ```
//!
//! ## Building a book in code
//!
//! ```
//! use bindery::model::{BookContents, Metadata, Part, Section};
//! use bindery::JsonBookProvider;
//!
//! let contents = BookContents::new()
//!     .with_front_matter(Section::new(1, "Dedication", "dedication").with_taxonomy("dedication"))
//!     .with_part(
//!         Part::new(Section::new(2, "Main Body", "main-body"))
//!             .with_chapter(Section::new(3, "Loomings", "loomings").with_content("<p>Call me Ishmael.</p>")),
//!     );
//! let provider = JsonBookProvider::new(Metadata::new("Moby Dick"), contents);
//! # let _ = provider;
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod hooks;
pub mod index;
pub mod knead;
pub mod model;
pub mod package;
pub mod preprocess;
pub mod render;
pub mod sanitize;
pub mod workdir;

pub use config::ExportConfig;
pub use error::{Error, Result};
pub use export::{HpubExporter, export_hpub};
pub use hooks::{
    Archiver, AssetFetcher, BookContentProvider, ContentFilter, HttpFetcher, ImageCodec,
    JsonBookProvider, PageRenderer, PageVars, PassthroughFilter, RasterCodec, XhtmlPageRenderer,
    ZipArchiver,
};
pub use index::BookIndex;
pub use model::{BookContents, Manifest, Metadata, Part, Section, SectionType};
pub use preprocess::SectionContext;
pub use sanitize::{sanitize_file_name, sanitize_slug, sanitize_xml_attribute};
