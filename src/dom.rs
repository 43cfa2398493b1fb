//! DOM-backed render target and document helpers.

use mdview_core::RenderTarget;
use url::Url;
use web_sys::{Document, Element};

/// Render target that writes committed markup into a host element's subtree.
pub struct DomTarget {
    element: Element,
}

impl DomTarget {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl RenderTarget for DomTarget {
    fn set_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }
}

/// The hosting document's base URL, for resolving relative source attributes.
pub fn document_base_url(document: &Document) -> Option<Url> {
    let uri = document.base_uri().ok().flatten()?;
    Url::parse(&uri).ok()
}
