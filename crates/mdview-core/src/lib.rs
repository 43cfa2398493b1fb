//! Host-agnostic core of the `mdview` markdown rendering component.
//!
//! Provides:
//! - [`MarkdownElement`] - the component state machine: content resolution,
//!   reactive configuration, render pipeline with stale-render discard
//! - [`ElementRegistry`] - tag-name registration for the two variants
//! - [`Slugger`] - pass-scoped heading slug generation
//! - Collaborator contracts: [`Sanitizer`], [`ContentFetcher`],
//!   [`CodeHighlighter`], [`RenderTarget`]
//!
//! The core never touches a concrete host; lifecycle entry points
//! (`mount`, `unmount`, `set_config`, `assign_markdown`) are invoked by
//! whatever integration layer the target environment provides.

pub mod component;
pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod highlight;
pub mod markdown;
pub mod policy;
pub mod registry;
pub mod sanitize;
pub mod slug;
pub mod target;

pub use component::{ConfigAttr, ElementKind, ElementOptions, MarkdownElement};
pub use content::{RenderedState, SourceKind};
pub use error::FetchError;
pub use fetch::ContentFetcher;
pub use highlight::CodeHighlighter;
pub use policy::{HeadingLinkMode, RenderPolicy, TextOrigin};
pub use registry::ElementRegistry;
pub use sanitize::{AmmoniaSanitizer, Sanitizer};
pub use slug::Slugger;
pub use target::{BufferTarget, RenderTarget};
