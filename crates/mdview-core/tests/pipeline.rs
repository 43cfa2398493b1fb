//! End-to-end render pipeline tests with scripted collaborators.
//!
//! These cover the asynchronous properties of the component: stale-render
//! discard, remote fetch fallback and supersession, unmount cancellation and
//! the sanitize-only-when-untrusted rule.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use url::Url;

use mdview_core::{
    CodeHighlighter, ConfigAttr, ContentFetcher, ElementKind, ElementOptions, FetchError,
    MarkdownElement, RenderTarget, RenderedState, Sanitizer,
};

// =============================================================================
// Scripted Collaborators
// =============================================================================

/// Render target that keeps every commit, in order.
#[derive(Default)]
struct RecordingTarget {
    commits: RefCell<Vec<String>>,
}

impl RecordingTarget {
    fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    fn last(&self) -> Option<String> {
        self.commits.borrow().last().cloned()
    }
}

impl RenderTarget for RecordingTarget {
    fn set_html(&self, html: &str) {
        self.commits.borrow_mut().push(html.to_string());
    }
}

/// Pass-through sanitizer that suspends once, so triggers can interleave.
#[derive(Clone, Default)]
struct YieldSanitizer {
    calls: Rc<Cell<usize>>,
}

impl Sanitizer for YieldSanitizer {
    fn sanitize(&self, markup: String) -> LocalBoxFuture<'static, String> {
        self.calls.set(self.calls.get() + 1);
        async move {
            tokio::task::yield_now().await;
            markup
        }
        .boxed_local()
    }
}

/// Pass-through sanitizer that only counts invocations.
#[derive(Clone, Default)]
struct CountingSanitizer {
    calls: Rc<Cell<usize>>,
}

impl Sanitizer for CountingSanitizer {
    fn sanitize(&self, markup: String) -> LocalBoxFuture<'static, String> {
        self.calls.set(self.calls.get() + 1);
        futures::future::ready(markup).boxed_local()
    }
}

#[derive(Clone)]
enum StubResponse {
    Body { text: String, yields: usize },
    Status(u16),
}

/// Fetcher answering from a scripted routing table.
#[derive(Clone, Default)]
struct StubFetcher {
    routes: Rc<RefCell<HashMap<String, StubResponse>>>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl StubFetcher {
    fn route_body(&self, url: &str, text: &str, yields: usize) {
        self.routes.borrow_mut().insert(
            url.to_string(),
            StubResponse::Body {
                text: text.to_string(),
                yields,
            },
        );
    }

    fn route_status(&self, url: &str, status: u16) {
        self.routes
            .borrow_mut()
            .insert(url.to_string(), StubResponse::Status(status));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ContentFetcher for StubFetcher {
    fn fetch_text(&self, url: &Url) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        self.calls.borrow_mut().push(url.to_string());
        let response = self.routes.borrow().get(url.as_str()).cloned();
        async move {
            match response {
                Some(StubResponse::Body { text, yields }) => {
                    for _ in 0..yields {
                        tokio::task::yield_now().await;
                    }
                    Ok(text)
                }
                Some(StubResponse::Status(code)) => Err(FetchError::Status(code)),
                None => Err(FetchError::Network("no route".to_string())),
            }
        }
        .boxed_local()
    }
}

#[derive(Clone, Default)]
struct CountingHighlighter {
    calls: Rc<Cell<usize>>,
}

impl CodeHighlighter for CountingHighlighter {
    fn highlight_all(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

fn record_events(element: &MarkdownElement) -> Rc<RefCell<Vec<RenderedState>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    element.on_render(move |state| sink.borrow_mut().push(state));
    events
}

// =============================================================================
// Stale Render Discard
// =============================================================================

#[tokio::test]
async fn test_rapid_reassignment_commits_only_the_last() {
    let target = Rc::new(RecordingTarget::default());
    let sanitizer = YieldSanitizer::default();
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new()
            .untrusted(true)
            .with_sanitizer(sanitizer.clone()),
    );
    element.mount("").await;
    let events = record_events(&element);

    futures::join!(
        element.assign_markdown("first"),
        element.assign_markdown("second"),
    );

    // The first assignment's sanitize resolved against a newer generation
    // and was discarded: one commit, never showing "first".
    let commits = target.commits();
    assert_eq!(commits.last().map(String::as_str), Some("<p>second</p>\n"));
    assert!(commits.iter().all(|c| !c.contains("first")));
    assert_eq!(commits.len(), 2); // mount + second assignment
    assert_eq!(*events.borrow(), vec![RenderedState::Property]);
    assert_eq!(sanitizer.calls.get(), 3);
}

#[tokio::test]
async fn test_unmount_cancels_inflight_render() {
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new()
            .untrusted(true)
            .with_sanitizer(YieldSanitizer::default()),
    );
    element.mount("hello").await;
    assert_eq!(target.commits().len(), 1);

    futures::join!(element.render(), async {
        element.unmount();
    });

    // The completion arriving after unmount must not touch the target.
    assert_eq!(target.commits().len(), 1);
    assert_eq!(element.rendered(), RenderedState::Content);
}

// =============================================================================
// Sanitization
// =============================================================================

#[tokio::test]
async fn test_trusted_input_never_sanitizes() {
    let sanitizer = CountingSanitizer::default();
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new().with_sanitizer(sanitizer.clone()),
    );

    element.mount("# Hi").await;
    element.assign_markdown("more **text**").await;
    element.render().await;

    assert_eq!(sanitizer.calls.get(), 0);
    assert_eq!(target.commits().len(), 3);
}

#[tokio::test]
async fn test_untrusted_markup_is_sanitized() {
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new().untrusted(true),
    );

    element
        .assign_markdown("<script>alert(1)</script>\n\n# ok")
        .await;
    element.mount("").await;

    let html = target.last().unwrap();
    assert!(!html.contains("<script"));
    assert!(html.contains("id=\"ok\""));
}

// =============================================================================
// Remote Sources
// =============================================================================

const REMOTE_URL: &str = "https://docs.example/readme.md";
const OTHER_URL: &str = "https://docs.example/other.md";

#[tokio::test]
async fn test_remote_fetch_renders_and_labels() {
    let fetcher = StubFetcher::default();
    fetcher.route_body(REMOTE_URL, "# Remote", 0);
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new().with_fetcher(fetcher.clone()),
    );

    element.mount("local fallback").await;
    element.set_config(ConfigAttr::Source, Some(REMOTE_URL)).await;

    assert_eq!(element.rendered(), RenderedState::Remote);
    assert_eq!(
        target.last().as_deref(),
        Some("<h1 id=\"remote\">Remote</h1>\n")
    );
}

#[tokio::test]
async fn test_failed_fetch_falls_back_to_inline_content() {
    let fetcher = StubFetcher::default();
    fetcher.route_status(REMOTE_URL, 404);
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new().with_fetcher(fetcher.clone()),
    );

    element.set_config(ConfigAttr::Source, Some(REMOTE_URL)).await;
    element.mount("fallback text").await;

    assert_eq!(element.rendered(), RenderedState::Fallback);
    assert_eq!(target.last().as_deref(), Some("<p>fallback text</p>\n"));

    // Re-setting the same URL is a no-op: no retry is ever issued.
    element.set_config(ConfigAttr::Source, Some(REMOTE_URL)).await;
    assert_eq!(fetcher.calls().len(), 1);

    // A forced re-render keeps reporting the fallback provenance.
    element.render().await;
    assert_eq!(element.rendered(), RenderedState::Fallback);
}

#[tokio::test]
async fn test_superseded_fetch_is_dropped() {
    let fetcher = StubFetcher::default();
    fetcher.route_body(REMOTE_URL, "# First", 2);
    fetcher.route_body(OTHER_URL, "# Second", 0);
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new().with_fetcher(fetcher.clone()),
    );
    element.mount("inline").await;

    futures::join!(
        element.set_config(ConfigAttr::Source, Some(REMOTE_URL)),
        element.set_config(ConfigAttr::Source, Some(OTHER_URL)),
    );

    // The slower first response resolved under a newer fetch sequence and
    // was dropped; the second fetch owns the committed state.
    assert_eq!(element.rendered(), RenderedState::Remote);
    assert_eq!(element.markdown().as_deref(), Some("# Second"));
    assert!(target.commits().iter().all(|c| !c.contains("First")));
}

#[tokio::test]
async fn test_relative_source_resolves_against_base() {
    let fetcher = StubFetcher::default();
    fetcher.route_body("https://host.example/docs/notes.md", "remote note", 0);
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new()
            .with_fetcher(fetcher.clone())
            .with_base_url(Url::parse("https://host.example/docs/index.html").unwrap()),
    );

    element.mount("inline").await;
    element.set_config(ConfigAttr::Source, Some("notes.md")).await;

    assert_eq!(
        fetcher.calls(),
        vec!["https://host.example/docs/notes.md".to_string()]
    );
    assert_eq!(target.last().as_deref(), Some("<p>remote note</p>\n"));
}

// =============================================================================
// Completion Signals and Highlighting
// =============================================================================

#[tokio::test]
async fn test_render_events_carry_provenance() {
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new(),
    );
    let events = record_events(&element);

    element.mount("# Hi").await;
    element.assign_markdown("text").await;

    assert_eq!(
        *events.borrow(),
        vec![RenderedState::Content, RenderedState::Property]
    );
}

#[tokio::test]
async fn test_highlighter_runs_only_for_code() {
    let highlighter = CountingHighlighter::default();
    let target = Rc::new(RecordingTarget::default());
    let element = MarkdownElement::new(
        ElementKind::Block,
        target.clone(),
        ElementOptions::new().with_highlighter(highlighter.clone()),
    );

    element.mount("plain text").await;
    assert_eq!(highlighter.calls.get(), 0);

    element.assign_markdown("run `cargo doc`").await;
    assert_eq!(highlighter.calls.get(), 1);
}
