//! Tag-name registration for the renderable element kinds.
//!
//! Host-integration layers look up which component variant a markup tag
//! maps to; the registry is plain data, so any host mechanism (document
//! scanning, template expansion, manual construction) can drive it.

use std::collections::HashMap;

use crate::component::ElementKind;
use crate::config::{BLOCK_TAG, SPAN_TAG};

/// Maps tag names to component variants.
#[derive(Clone, Debug, Default)]
pub struct ElementRegistry {
    kinds: HashMap<String, ElementKind>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard registrations: `md-view` (block) and `md-span` (inline).
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.define(BLOCK_TAG, ElementKind::Block);
        registry.define(SPAN_TAG, ElementKind::Inline);
        registry
    }

    /// Register `tag` as rendering with `kind`. Tags are case-insensitive.
    pub fn define(&mut self, tag: &str, kind: ElementKind) {
        self.kinds.insert(tag.to_ascii_lowercase(), kind);
    }

    pub fn kind_for(&self, tag: &str) -> Option<ElementKind> {
        self.kinds.get(&tag.to_ascii_lowercase()).copied()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// CSS selector matching every registered tag.
    pub fn selector(&self) -> String {
        let mut tags: Vec<&str> = self.tags().collect();
        tags.sort_unstable();
        tags.join(", ")
    }
}
