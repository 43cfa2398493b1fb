//! Content resolution: which markdown text is authoritative and how commits
//! are labeled.
//!
//! Three sources can supply the text of an instance: markup embedded in the
//! host element, a direct property assignment, and a remote fetch. The last
//! write wins; this module holds the provenance types, the capture transforms
//! for embedded markup and the labeling rule applied at commit time.

use regex::Regex;

/// Provenance of the authoritative markdown text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// No text has been supplied yet.
    #[default]
    Unset,
    /// Captured from the host element's embedded markup at mount time.
    InlineContent,
    /// Assigned directly by the caller.
    Property,
    /// Body of a successful remote fetch.
    Remote,
}

/// Provenance of the last successfully committed render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderedState {
    /// Nothing has been committed yet.
    #[default]
    Unrendered,
    /// Embedded content, no remote source configured.
    Content,
    /// Directly assigned text.
    Property,
    /// Remote fetch body.
    Remote,
    /// Embedded content standing in for a remote source that failed to load.
    Fallback,
}

impl RenderedState {
    /// Attribute value for host-side reflection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unrendered => "",
            Self::Content => "content",
            Self::Property => "property",
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        }
    }
}

/// Label a commit from the source that produced it.
///
/// Embedded content commits report [`RenderedState::Fallback`] while a remote
/// URL is configured: the only way inline content is still authoritative at
/// that point is a remote load that never delivered.
pub fn rendered_from(source: SourceKind, remote_configured: bool) -> RenderedState {
    match source {
        SourceKind::Unset => RenderedState::Unrendered,
        SourceKind::InlineContent if remote_configured => RenderedState::Fallback,
        SourceKind::InlineContent => RenderedState::Content,
        SourceKind::Property => RenderedState::Property,
        SourceKind::Remote => RenderedState::Remote,
    }
}

/// Prepare markup captured from the host element for markdown parsing.
pub fn capture_embedded(markup: &str) -> String {
    restore_blockquote_markers(&de_indent(markup))
}

/// Strip the shared leading indent introduced by pretty-printed host markup.
///
/// If the text starts with optional blank lines followed by a run of tabs or
/// spaces, that exact run is removed from the start of every line.
pub fn de_indent(text: &str) -> String {
    let leading =
        Regex::new(r"^[\r\n]*([\t ]+)").expect("leading indent pattern compiles");
    let Some(caps) = leading.captures(text) else {
        return text.to_string();
    };
    let per_line = Regex::new(&format!("(?m)^{}", regex::escape(&caps[1])))
        .expect("per-line indent pattern compiles");
    per_line.replace_all(text, "").into_owned()
}

/// Restore encoded blockquote markers.
///
/// The host's own markup parse encodes `>` as `&gt;`, which the markdown
/// parser would no longer recognize as blockquote syntax.
pub fn restore_blockquote_markers(text: &str) -> String {
    text.replace("&gt;", ">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_de_indent_strips_shared_run() {
        let text = "\n\t\t# Title\n\t\tbody line\n";
        assert_eq!(de_indent(text), "\n# Title\nbody line\n");
    }

    #[test]
    fn test_de_indent_spares_unindented_lines() {
        let text = "\n    indented\nflush\n    indented again\n";
        assert_eq!(de_indent(text), "\nindented\nflush\nindented again\n");
    }

    #[test]
    fn test_de_indent_without_indent_is_identity() {
        assert_eq!(de_indent("# Title\nbody\n"), "# Title\nbody\n");
    }

    #[test]
    fn test_restore_blockquote_markers() {
        assert_eq!(restore_blockquote_markers("&gt; quoted"), "> quoted");
    }

    #[test]
    fn test_capture_embedded() {
        let markup = "\n  &gt; a quote\n  second line\n";
        assert_eq!(capture_embedded(markup), "\n> a quote\nsecond line\n");
    }

    #[test]
    fn test_rendered_from_labels() {
        assert_eq!(
            rendered_from(SourceKind::InlineContent, false),
            RenderedState::Content
        );
        assert_eq!(
            rendered_from(SourceKind::InlineContent, true),
            RenderedState::Fallback
        );
        assert_eq!(
            rendered_from(SourceKind::Property, true),
            RenderedState::Property
        );
        assert_eq!(rendered_from(SourceKind::Remote, true), RenderedState::Remote);
        assert_eq!(
            rendered_from(SourceKind::Unset, false),
            RenderedState::Unrendered
        );
    }
}
