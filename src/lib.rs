//! WebAssembly host layer for the `mdview` markdown component.
//!
//! Upgrades `<md-view>` / `<md-span>` elements found in the hosting document
//! into live component instances, watches their configuration attributes and
//! reflects render status back onto the host elements. All component logic
//! lives in `mdview-core`; this crate only supplies the DOM-backed
//! collaborators and the wiring.

pub mod dom;
pub mod elements;
pub mod fetch;
pub mod highlight;

use wasm_bindgen::prelude::*;

pub use dom::DomTarget;
pub use elements::register_document;
pub use fetch::GlooFetcher;
pub use highlight::PageHighlighter;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    register_document()
}
