//! The markdown component: content resolution, reactive configuration and
//! the render pipeline.
//!
//! A [`MarkdownElement`] is a cheap-to-clone handle over shared state. All
//! work runs on one logical thread; trigger methods mutate state before their
//! first suspension point, and the only suspension points are the remote
//! fetch and the sanitize step. Each trigger advances a generation counter,
//! and a render re-checks that counter after every suspension, so the last
//! trigger is the only one whose result commits, with no queueing and no
//! locks.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use url::Url;

use crate::config::DEFAULT_HEADING_MIN;
use crate::content::{self, RenderedState, SourceKind};
use crate::fetch::ContentFetcher;
use crate::highlight::CodeHighlighter;
use crate::markdown;
use crate::policy::{HeadingLinkMode, RenderPolicy, TextOrigin};
use crate::sanitize::{AmmoniaSanitizer, Sanitizer};
use crate::target::RenderTarget;

// =============================================================================
// Variants and Observed Attributes
// =============================================================================

/// Which parse entry point a component instance uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Full-document parse with heading and fenced-code formatting.
    Block,
    /// Inline-only parse with code-span formatting.
    Inline,
}

/// The fixed set of observed configuration attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigAttr {
    /// `src`: remote markdown source URL.
    Source,
    /// `hmin`: minimum heading level.
    HeadingMin,
    /// `hlinks`: heading anchor style.
    HeadingLinks,
}

impl ConfigAttr {
    /// Attribute names, aligned with [`ConfigAttr`]'s variants.
    pub const NAMES: [&'static str; 3] = ["src", "hmin", "hlinks"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "src" => Some(Self::Source),
            "hmin" => Some(Self::HeadingMin),
            "hlinks" => Some(Self::HeadingLinks),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Source => "src",
            Self::HeadingMin => "hmin",
            Self::HeadingLinks => "hlinks",
        }
    }
}

// =============================================================================
// Construction Options
// =============================================================================

/// Construction-time options for a component instance.
///
/// The untrusted flag is fixed here for the instance's whole lifetime; it
/// cannot be changed after construction.
pub struct ElementOptions {
    untrusted: bool,
    base_url: Option<Url>,
    fetcher: Option<Rc<dyn ContentFetcher>>,
    sanitizer: Rc<dyn Sanitizer>,
    highlighter: Option<Rc<dyn CodeHighlighter>>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            untrusted: false,
            base_url: None,
            fetcher: None,
            sanitizer: Rc::new(AmmoniaSanitizer),
            highlighter: None,
        }
    }
}

impl ElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force all committed markup through the sanitizer.
    pub fn untrusted(mut self, untrusted: bool) -> Self {
        self.untrusted = untrusted;
        self
    }

    /// Base URL the `src` attribute is resolved against (normally the
    /// hosting document's URL). Without one, only absolute sources resolve.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_fetcher<F: ContentFetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Some(Rc::new(fetcher));
        self
    }

    pub fn with_sanitizer<S: Sanitizer + 'static>(mut self, sanitizer: S) -> Self {
        self.sanitizer = Rc::new(sanitizer);
        self
    }

    pub fn with_highlighter<H: CodeHighlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Some(Rc::new(highlighter));
        self
    }
}

// =============================================================================
// Component State
// =============================================================================

struct State {
    markdown: Option<String>,
    source: SourceKind,
    rendered: RenderedState,
    heading_min: u32,
    link_mode: HeadingLinkMode,
    remote_url: Option<Url>,
    mounted: bool,
    /// Advanced on every trigger; in-flight renders compare against it after
    /// each suspension point and abort on mismatch.
    generation: u64,
    /// Advanced per issued fetch; a response carrying an older number was
    /// superseded and is dropped.
    fetch_seq: u64,
    listeners: Vec<Rc<dyn Fn(RenderedState)>>,
}

impl State {
    fn new() -> Self {
        Self {
            markdown: None,
            source: SourceKind::Unset,
            rendered: RenderedState::Unrendered,
            heading_min: DEFAULT_HEADING_MIN,
            link_mode: HeadingLinkMode::None,
            remote_url: None,
            mounted: false,
            generation: 0,
            fetch_seq: 0,
            listeners: Vec::new(),
        }
    }
}

/// One mounted markdown component instance.
#[derive(Clone)]
pub struct MarkdownElement {
    kind: ElementKind,
    untrusted: bool,
    base_url: Option<Url>,
    target: Rc<dyn RenderTarget>,
    fetcher: Option<Rc<dyn ContentFetcher>>,
    sanitizer: Rc<dyn Sanitizer>,
    highlighter: Option<Rc<dyn CodeHighlighter>>,
    state: Rc<RefCell<State>>,
}

impl MarkdownElement {
    pub fn new(kind: ElementKind, target: Rc<dyn RenderTarget>, options: ElementOptions) -> Self {
        Self {
            kind,
            untrusted: options.untrusted,
            base_url: options.base_url,
            target,
            fetcher: options.fetcher,
            sanitizer: options.sanitizer,
            highlighter: options.highlighter,
            state: Rc::new(RefCell::new(State::new())),
        }
    }

    // =========================================================================
    // Readable State
    // =========================================================================

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn untrusted(&self) -> bool {
        self.untrusted
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    /// Provenance of the last successfully committed render.
    pub fn rendered(&self) -> RenderedState {
        self.state.borrow().rendered
    }

    /// Provenance of the current authoritative text.
    pub fn source_kind(&self) -> SourceKind {
        self.state.borrow().source
    }

    /// The current authoritative markdown text, if any.
    pub fn markdown(&self) -> Option<String> {
        self.state.borrow().markdown.clone()
    }

    /// Register a listener fired after every successful commit with the
    /// committed provenance.
    pub fn on_render<F: Fn(RenderedState) + 'static>(&self, listener: F) {
        self.state.borrow_mut().listeners.push(Rc::new(listener));
    }

    // =========================================================================
    // Lifecycle Entry Points
    // =========================================================================

    /// Mount the instance, capturing `embedded` as inline content unless a
    /// property assignment already supplied text.
    pub async fn mount(&self, embedded: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.mounted = true;
            state.generation += 1;
            if state.markdown.is_none() {
                state.markdown = Some(content::capture_embedded(embedded));
                state.source = SourceKind::InlineContent;
            }
        }
        self.render().await;
    }

    /// Unmount the instance. In-flight completions become no-ops.
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        state.mounted = false;
        state.generation += 1;
    }

    /// Assign markdown text directly, bypassing any source attribute.
    pub async fn assign_markdown<T: Into<String>>(&self, text: T) {
        {
            let mut state = self.state.borrow_mut();
            state.markdown = Some(text.into());
            state.source = SourceKind::Property;
            state.generation += 1;
        }
        self.render().await;
    }

    /// Dispatch one observed-attribute change.
    ///
    /// Equal effective values are no-ops; invalid values are swallowed
    /// without touching state.
    pub async fn set_config(&self, attr: ConfigAttr, value: Option<&str>) {
        match attr {
            ConfigAttr::Source => self.update_source(value).await,
            ConfigAttr::HeadingMin => {
                let Some(min) = value
                    .and_then(|v| v.trim().parse::<u32>().ok())
                    .filter(|min| *min > 0)
                else {
                    debug!(value, "ignoring non-positive heading minimum");
                    return;
                };
                {
                    let mut state = self.state.borrow_mut();
                    if state.heading_min == min {
                        return;
                    }
                    state.heading_min = min;
                    state.generation += 1;
                }
                self.render().await;
            }
            ConfigAttr::HeadingLinks => {
                let mode = HeadingLinkMode::from_attr(value);
                {
                    let mut state = self.state.borrow_mut();
                    if state.link_mode == mode {
                        return;
                    }
                    state.link_mode = mode;
                    state.generation += 1;
                }
                self.render().await;
            }
        }
    }

    // =========================================================================
    // Remote Source Resolution
    // =========================================================================

    async fn update_source(&self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        let Some(url) = self.resolve_url(value) else {
            debug!(value, "ignoring unparseable source URL");
            return;
        };
        let Some(fetcher) = self.fetcher.clone() else {
            warn!("source URL set but no fetcher is configured");
            return;
        };

        let seq = {
            let mut state = self.state.borrow_mut();
            if state.remote_url.as_ref() == Some(&url) {
                return;
            }
            state.remote_url = Some(url.clone());
            state.fetch_seq += 1;
            state.fetch_seq
        };

        match fetcher.fetch_text(&url).await {
            Ok(body) => {
                {
                    let mut state = self.state.borrow_mut();
                    if state.fetch_seq != seq {
                        debug!(url = %url, "dropping superseded fetch response");
                        return;
                    }
                    state.markdown = Some(body);
                    state.source = SourceKind::Remote;
                    state.generation += 1;
                }
                self.render().await;
            }
            Err(error) => {
                // Existing content stays authoritative; the next commit
                // reports it as a fallback while the URL remains configured.
                warn!(url = %url, %error, "source fetch failed, keeping current content");
            }
        }
    }

    fn resolve_url(&self, value: &str) -> Option<Url> {
        match &self.base_url {
            Some(base) => base.join(value).ok(),
            None => Url::parse(value).ok(),
        }
    }

    // =========================================================================
    // Render Pipeline
    // =========================================================================

    /// Parse, optionally sanitize and commit the current markdown text.
    ///
    /// No-op while unmounted or without text. A stale invocation, one whose
    /// generation no longer matches after the sanitize suspension, aborts
    /// without committing and without touching the rendered state.
    pub async fn render(&self) {
        let (text, generation, policy) = {
            let state = self.state.borrow();
            if !state.mounted {
                return;
            }
            let Some(text) = state.markdown.clone() else {
                return;
            };
            (text, state.generation, self.policy(&state))
        };

        let markup = match self.kind {
            ElementKind::Block => markdown::parse_block(&text, &policy),
            ElementKind::Inline => markdown::parse_inline(&text, &policy),
        };

        let markup = if self.untrusted {
            let sanitized = self.sanitizer.sanitize(markup).await;
            let state = self.state.borrow();
            if !state.mounted || state.generation != generation {
                debug!("discarding stale render");
                return;
            }
            sanitized
        } else {
            markup
        };

        self.target.set_html(&markup);

        let (event, listeners) = {
            let mut state = self.state.borrow_mut();
            state.rendered = content::rendered_from(state.source, state.remote_url.is_some());
            (state.rendered, state.listeners.clone())
        };
        for listener in &listeners {
            listener(event);
        }

        if let Some(highlighter) = &self.highlighter {
            if markup.contains("<code") {
                highlighter.highlight_all();
            }
        }
    }

    fn policy(&self, state: &State) -> RenderPolicy {
        let origin = if state.source == SourceKind::InlineContent {
            TextOrigin::HostMarkup
        } else {
            TextOrigin::Assigned
        };
        RenderPolicy::new(state.heading_min, state.link_mode.clone(), origin)
    }
}
