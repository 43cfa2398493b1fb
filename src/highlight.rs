//! Bridge to a page-provided syntax highlighter.

use js_sys::{Function, Reflect};
use mdview_core::CodeHighlighter;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

/// Invokes a global `Prism`-style highlighter over the host element when the
/// page provides one; stays silent otherwise.
pub struct PageHighlighter {
    element: Element,
}

impl PageHighlighter {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl CodeHighlighter for PageHighlighter {
    fn highlight_all(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(prism) = Reflect::get(window.as_ref(), &JsValue::from_str("Prism")) else {
            return;
        };
        if !prism.is_object() {
            return;
        }
        let Ok(function) = Reflect::get(&prism, &JsValue::from_str("highlightAllUnder")) else {
            return;
        };
        let Ok(function) = function.dyn_into::<Function>() else {
            return;
        };
        let _ = function.call1(&prism, &self.element);
    }
}
