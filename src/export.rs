//! The end-to-end build: book in, `.hpub` archive out.
//!
//! # Example
//!
//! ```no_run
//! use bindery::{ExportConfig, HpubExporter, JsonBookProvider};
//!
//! let provider = JsonBookProvider::from_path("book.json".as_ref())?;
//! let exporter = HpubExporter::new().with_config(ExportConfig::new().with_output_dir("out"));
//! let archive = exporter.convert(&provider)?;
//! println!("{}", archive.display());
//! # Ok::<(), bindery::Error>(())
//! ```

use std::path::PathBuf;

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::hooks::{
    Archiver, AssetFetcher, BookContentProvider, ContentFilter, HttpFetcher, ImageCodec,
    PageRenderer, PassthroughFilter, RasterCodec, XhtmlPageRenderer, ZipArchiver,
};
use crate::index::BookIndex;
use crate::knead::{AssetStore, HtmlKneader, LinkResolver, scrape_and_knead_css, url_host};
use crate::model::SlugIndex;
use crate::package::{archive_name, package};
use crate::preprocess::ContentPreprocessor;
use crate::render::{BookInput, BuildState, RenderContext, render_book};
use crate::workdir::WorkingDirectory;

/// HPub exporter.
///
/// Every collaborator has a default; replace them with the `with_*` methods.
pub struct HpubExporter {
    config: ExportConfig,
    filter: Box<dyn ContentFilter>,
    fetcher: Option<Box<dyn AssetFetcher>>,
    codec: Box<dyn ImageCodec>,
    pages: Box<dyn PageRenderer>,
    archiver: Box<dyn Archiver>,
}

impl Default for HpubExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HpubExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
            filter: Box::new(PassthroughFilter),
            fetcher: None,
            codec: Box::new(RasterCodec),
            pages: Box::new(XhtmlPageRenderer),
            archiver: Box::new(ZipArchiver::default()),
        }
    }

    /// Set the configuration. The default archiver picks up its compression
    /// level.
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.archiver = Box::new(ZipArchiver {
            compression_level: config.compression_level,
        });
        self.config = config;
        self
    }

    pub fn with_filter(mut self, filter: impl ContentFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Fetch remote assets with `fetcher` instead of over HTTP.
    pub fn with_fetcher(mut self, fetcher: impl AssetFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn with_page_renderer(mut self, pages: impl PageRenderer + 'static) -> Self {
        self.pages = Box::new(pages);
        self
    }

    pub fn with_archiver(mut self, archiver: impl Archiver + 'static) -> Self {
        self.archiver = Box::new(archiver);
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Build the archive for `provider`'s book. Returns the archive path.
    ///
    /// The working directory is removed whether or not the build succeeds.
    pub fn convert(&self, provider: &dyn BookContentProvider) -> Result<PathBuf> {
        self.config.validate()?;
        let workdir = WorkingDirectory::create(self.config.temp_root.as_deref())?;

        let result = self.build(provider, &workdir);
        if let Err(e) = &result {
            tracing::error!(error = %e, "hpub export failed");
        }
        if let Err(e) = workdir.close() {
            tracing::warn!(error = %e, "could not remove working directory");
        }
        result
    }

    fn build(&self, provider: &dyn BookContentProvider, workdir: &WorkingDirectory) -> Result<PathBuf> {
        let root = workdir.path();
        if !root.is_dir() {
            return Err(Error::MissingWorkingDirectory(root.to_path_buf()));
        }

        let metadata = provider.metadata()?;
        let contents = provider.contents()?;
        tracing::info!(title = %metadata.title, "exporting book");

        workdir.create_container()?;

        let http;
        let fetcher: &dyn AssetFetcher = match &self.fetcher {
            Some(fetcher) => fetcher.as_ref(),
            None => {
                http = HttpFetcher::new(self.config.timeout(), &self.config.user_agent)?;
                &http
            }
        };
        let site_host = self
            .config
            .site_host()
            .or_else(|| url_host(metadata.url.trim()));
        tracing::debug!(site_host = ?site_host, "internal link host");
        let mut kneader = HtmlKneader::new(
            AssetStore::new(fetcher, self.codec.as_ref(), root.join("images")),
            LinkResolver::new(SlugIndex::new(), site_host),
        );

        let contents = ContentPreprocessor::new(self.filter.as_ref(), &mut kneader).run(contents);
        kneader.set_slug_index(provider.slug_index(&contents));

        let stylesheet = scrape_and_knead_css(
            self.config.stylesheet.as_deref(),
            &root.join("css"),
            kneader.assets(),
        )?;

        let mut ctx = RenderContext {
            root,
            config: &self.config,
            pages: self.pages.as_ref(),
            codec: self.codec.as_ref(),
            kneader: &mut kneader,
            state: BuildState::new(stylesheet),
        };
        let book = BookInput {
            contents: &contents,
            metadata: &metadata,
        };
        render_book(&mut ctx, book)?;

        BookIndex::new(&ctx.state.manifest, &metadata, ctx.state.cover_image.as_deref())?
            .write(root)?;

        let name = archive_name(
            &metadata.title,
            &self.config.archive_extension,
            chrono::Utc::now().timestamp(),
        );
        package(self.archiver.as_ref(), root, &self.config.output_dir, &name)
    }
}

/// Build an archive with default collaborators.
pub fn export_hpub(config: ExportConfig, provider: &dyn BookContentProvider) -> Result<PathBuf> {
    HpubExporter::new().with_config(config).convert(provider)
}

