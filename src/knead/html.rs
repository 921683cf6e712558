//! Fragment kneading: localize images and rewrite links in section HTML.

use super::assets::AssetStore;
use super::links::{LinkResolver, canonicalize_url, fuzzy_image_name_match, is_local_output_ref};
use crate::dom::{Dom, NodeId, normalize_void_elements, parse_fragment, serialize_fragment};
use crate::model::{SectionType, SlugIndex};

/// Rewrites HTML fragments so they only reference files inside the archive.
pub struct HtmlKneader<'a> {
    assets: AssetStore<'a>,
    links: LinkResolver,
}

impl<'a> HtmlKneader<'a> {
    pub fn new(assets: AssetStore<'a>, links: LinkResolver) -> Self {
        Self { assets, links }
    }

    pub fn assets(&mut self) -> &mut AssetStore<'a> {
        &mut self.assets
    }

    /// Replace the slug index used for cross-reference resolution.
    pub fn set_slug_index(&mut self, index: SlugIndex) {
        self.links.set_index(index);
    }

    /// Knead one fragment.
    ///
    /// `position` is the ordinal the fragment will be rendered at; links are
    /// only resolved to other sections when it is known.
    pub fn knead(&mut self, html: &str, section_type: SectionType, position: Option<usize>) -> String {
        let mut dom = parse_fragment(html);
        let images = self.knead_images(&mut dom);
        let links = self.knead_hrefs(&mut dom, position);
        tracing::debug!(%section_type, ?position, images, links, "kneaded fragment");
        normalize_void_elements(&serialize_fragment(&dom))
    }

    /// Knead a fragment whose final position is not known yet: images are
    /// localized and the markup normalized, but hrefs are left as written so
    /// that a later positioned pass can still resolve them.
    pub fn knead_assets(&mut self, html: &str, section_type: SectionType) -> String {
        let mut dom = parse_fragment(html);
        let images = self.knead_images(&mut dom);
        tracing::debug!(%section_type, images, "kneaded fragment assets");
        normalize_void_elements(&serialize_fragment(&dom))
    }

    fn knead_images(&mut self, dom: &mut Dom) -> usize {
        let mut rewritten = 0;
        for img in dom.elements_by_tag("img") {
            let Some(src) = dom.get_attr(img, "src").map(str::to_string) else {
                continue;
            };
            if let Some(filename) = self.assets.fetch_unique_image(&src) {
                dom.set_attr(img, "src", &format!("images/{filename}"));
                rewritten += 1;
            }
        }
        rewritten
    }

    fn knead_hrefs(&self, dom: &mut Dom, position: Option<usize>) -> usize {
        let mut rewritten = 0;
        for a in dom.elements_by_tag("a") {
            let Some(href) = dom.get_attr(a, "href").map(str::to_string) else {
                continue;
            };
            if href.trim().is_empty() {
                continue;
            }

            if wraps_same_image(dom, a, &href) {
                dom.remove_attr(a, "href");
                rewritten += 1;
                continue;
            }

            let target = match self.links.resolve(&href, position) {
                Some(internal) => internal,
                None if href.starts_with('#') || is_local_output_ref(&href) => continue,
                None => canonicalize_url(&href),
            };
            if target != href {
                dom.set_attr(a, "href", &target);
                rewritten += 1;
            }
        }
        rewritten
    }
}

/// Whether a direct `<img>` child of `a` shows the picture `href` links to.
fn wraps_same_image(dom: &Dom, a: NodeId, href: &str) -> bool {
    dom.children(a).any(|child| {
        dom.element_name(child).is_some_and(|n| n.as_ref() == "img")
            && fuzzy_image_name_match(href, dom.get_attr(child, "src").unwrap_or_default())
    })
}
