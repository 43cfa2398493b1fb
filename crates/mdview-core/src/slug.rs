//! Heading slug generation.
//!
//! One [`Slugger`] is created per render pass; collision counts must not leak
//! across passes or edited documents would keep stale numeric suffixes.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w]+").expect("non-word pattern compiles"));

/// Stateful slug generator scoped to a single render pass.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
    produced: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a URL-safe identifier for `text`, unique within this pass.
    ///
    /// Repeated base slugs get a `-N` suffix (N starting at 1). The counter
    /// keeps advancing past candidates that an earlier heading already
    /// produced literally, so the output is unique for any input sequence.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut n = self.counts.get(&base).copied().unwrap_or(0);
        let mut candidate = if n == 0 {
            base.clone()
        } else {
            format!("{base}-{n}")
        };
        while !self.produced.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.counts.insert(base, n + 1);
        candidate
    }
}

/// Normalize heading text into its base slug.
///
/// Lower-cases, trims, collapses every run of non-word characters into a
/// single hyphen and drops hyphens left dangling at either end.
fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(lowered.trim(), "-")
        .trim_matches('-')
        .to_string()
}
