//! Markup sanitization for untrusted instances.
//!
//! The contract is asynchronous because host sanitizers usually are; the
//! bundled implementation is a pure function over `ammonia` that resolves
//! immediately.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

/// Removes unsafe constructs from generated markup.
///
/// Treated as a pure function: the only observable effect is the returned
/// markup.
pub trait Sanitizer {
    fn sanitize(&self, markup: String) -> LocalBoxFuture<'static, String>;
}

/// Default sanitizer backed by `ammonia`.
///
/// Runs the stock allow-list with `id` and `class` added to the generic
/// attributes so heading anchors and `language-*` code classes survive.
#[derive(Clone, Copy, Debug, Default)]
pub struct AmmoniaSanitizer;

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, markup: String) -> LocalBoxFuture<'static, String> {
        futures::future::ready(clean_markup(&markup)).boxed_local()
    }
}

fn clean_markup(markup: &str) -> String {
    ammonia::Builder::default()
        .add_generic_attributes(&["id", "class"])
        .clean(markup)
        .to_string()
}
