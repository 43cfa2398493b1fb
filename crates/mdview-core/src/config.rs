//! Component configuration constants.
//!
//! Centralizes the fixed names and bounds shared by the render pipeline and
//! any host-integration layer.

// =============================================================================
// Element Registration
// =============================================================================

/// Tag name registered for the block-level variant.
pub const BLOCK_TAG: &str = "md-view";

/// Tag name registered for the inline-span variant.
pub const SPAN_TAG: &str = "md-span";

/// Host attribute that reflects the last committed render provenance.
pub const RENDERED_ATTR: &str = "rendered";

/// Host attribute that marks an instance as untrusted (read once, at upgrade).
pub const UNTRUSTED_ATTR: &str = "untrusted";

// =============================================================================
// Heading Configuration
// =============================================================================

/// Default minimum heading level when no `hmin` attribute is set.
pub const DEFAULT_HEADING_MIN: u32 = 1;

/// Deepest heading level the formatter will emit.
pub const MAX_HEADING_DEPTH: u8 = 6;

/// Class applied to generated heading anchors.
pub const ANCHOR_CLASS: &str = "anchor";

// =============================================================================
// Code Block Configuration
// =============================================================================

/// Class prefix applied to fenced code blocks that carry a language tag.
pub const LANG_CLASS_PREFIX: &str = "language-";
