//! Optional code-highlighting collaborator.

/// Decorates code elements under the instance's render target in place.
///
/// Invoked fire-and-forget after a commit that produced code markup; not part
/// of the commit's correctness contract, so implementations must not fail
/// loudly.
pub trait CodeHighlighter {
    fn highlight_all(&self);
}
