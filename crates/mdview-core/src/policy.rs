//! Per-instance rendering policy.
//!
//! The policy is an immutable value built for each parse invocation. It
//! carries the heading configuration and the provenance of the text being
//! rendered, and supplies the heading, code-block and code-span formatters
//! the markdown pass invokes in place of the default HTML output.

use crate::config::{ANCHOR_CLASS, DEFAULT_HEADING_MIN, LANG_CLASS_PREFIX, MAX_HEADING_DEPTH};
use crate::slug::Slugger;

/// How headings are linked to their own anchor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HeadingLinkMode {
    /// Plain heading text, no anchor.
    #[default]
    None,
    /// The heading text itself becomes the anchor.
    Text,
    /// The anchor wraps the given markup followed by the heading text.
    Custom(String),
}

impl HeadingLinkMode {
    /// Interpret a raw `hlinks` attribute value.
    ///
    /// An absent attribute means no anchors; the empty string is meaningful
    /// and selects [`HeadingLinkMode::Text`].
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None => Self::None,
            Some("") => Self::Text,
            Some(markup) => Self::Custom(markup.to_string()),
        }
    }
}

/// Where the text being rendered came from, as far as escaping is concerned.
///
/// Host-captured text already went through the host's own markup parse once,
/// so its code spans need the double-escape artifact reversed instead of a
/// second plain escape. Applying the wrong transform corrupts code samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextOrigin {
    /// Assigned via property or fetched remotely; never host-parsed.
    #[default]
    Assigned,
    /// Captured from the host element's embedded markup.
    HostMarkup,
}

/// Immutable formatting parameters for one parse invocation.
#[derive(Clone, Debug)]
pub struct RenderPolicy {
    heading_min: u32,
    link_mode: HeadingLinkMode,
    origin: TextOrigin,
}

impl RenderPolicy {
    pub fn new(heading_min: u32, link_mode: HeadingLinkMode, origin: TextOrigin) -> Self {
        Self {
            heading_min: heading_min.max(DEFAULT_HEADING_MIN),
            link_mode,
            origin,
        }
    }

    /// Offset a parsed heading depth by the configured minimum, clamped to
    /// the deepest level HTML has.
    pub fn effective_depth(&self, depth: u8) -> u8 {
        (depth as u32 + self.heading_min - 1).min(MAX_HEADING_DEPTH as u32) as u8
    }

    /// Format one heading, drawing its id from the pass-scoped slugger.
    pub fn heading_html(&self, depth: u8, text: &str, slugger: &mut Slugger) -> String {
        let depth = self.effective_depth(depth);
        let id = slugger.slug(text);
        let text = escape_html(text);
        let body = match &self.link_mode {
            HeadingLinkMode::None => text,
            HeadingLinkMode::Text => {
                format!(r##"<a href="#{id}" class="{ANCHOR_CLASS}">{text}</a>"##)
            }
            HeadingLinkMode::Custom(prefix) => {
                format!(r##"<a href="#{id}" class="{ANCHOR_CLASS}">{prefix}{text}</a>"##)
            }
        };
        format!("<h{depth} id=\"{id}\">{body}</h{depth}>\n")
    }

    /// Format one fenced or indented code block.
    pub fn code_block_html(&self, language: &str, code: &str) -> String {
        let code = self.code_text(code);
        if language.is_empty() {
            format!("<pre><code>{code}</code></pre>\n")
        } else {
            format!(
                "<pre><code class=\"{LANG_CLASS_PREFIX}{}\">{code}</code></pre>\n",
                escape_html(language)
            )
        }
    }

    /// Format one inline code span.
    pub fn code_span_html(&self, code: &str) -> String {
        format!("<code>{}</code>", self.code_text(code))
    }

    /// Escape code text for HTML display, honoring the text origin.
    fn code_text(&self, code: &str) -> String {
        let escaped = escape_html(code);
        match self.origin {
            TextOrigin::Assigned => escaped,
            // Entities the author wrote into host markup were decoded by the
            // host parse and must not be escaped a second time.
            TextOrigin::HostMarkup => escaped
                .replace("&amp;lt;", "&lt;")
                .replace("&amp;gt;", "&gt;"),
        }
    }
}

/// Minimal HTML escaping for text interpolated into generated markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
