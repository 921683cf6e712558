//! Tolerant HTML fragment DOM.
//!
//! Fragments are parsed with html5ever into an arena, mutated in place and
//! serialized back without the document wrappers the parser adds.
//!
//! # Example
//!
//! ```
//! use bindery::dom::{parse_fragment, serialize_fragment};
//!
//! let mut dom = parse_fragment(r#"<p><a href="x.html">x</a></p>"#);
//! let a = dom.find_by_tag("a").unwrap();
//! dom.set_attr(a, "href", "y.html");
//! assert_eq!(serialize_fragment(&dom), r#"<p><a href="y.html">x</a></p>"#);
//! ```

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Dom, Node, NodeData, NodeId};
pub use serialize::{VOID_ELEMENTS, normalize_void_elements, serialize_fragment};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse an HTML fragment. Malformed markup never fails; parse errors are
/// logged at debug level.
pub fn parse_fragment(html: &str) -> Dom {
    let (dom, errors) = parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_parts();
    for error in &errors {
        tracing::debug!(%error, "html parse error");
    }
    dom
}
