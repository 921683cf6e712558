//! Content rewriting ("kneading") for HTML fragments and stylesheets.
//!
//! Kneading makes content self-contained: remote images are fetched into the
//! working directory, links to other sections become links to their output
//! files, and everything else is tidied so that it survives packaging.

mod assets;
mod css;
mod html;
mod links;

pub use assets::{AssetStore, file_name_from_url, is_remote};
pub use css::{
    BUNDLED_STYLESHEET, BUNDLED_STYLESHEET_NAME, extract_css_urls, knead_css, scrape_and_knead_css,
};
pub use html::HtmlKneader;
pub(crate) use links::url_host;
pub use links::{
    LinkResolver, canonicalize_url, fuzzy_image_name_match, is_local_output_ref, output_file_name,
};
