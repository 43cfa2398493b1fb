//! Document wiring for the renderable element kinds.
//!
//! Scans the hosting document for registered tags, upgrades matches into
//! live component instances, and keeps them in sync afterwards: one
//! `MutationObserver` dispatches configuration attribute changes, upgrades
//! elements inserted later and unmounts elements removed from the document.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, MutationRecord};

use mdview_core::config::{RENDERED_ATTR, UNTRUSTED_ATTR};
use mdview_core::{ConfigAttr, ElementOptions, ElementRegistry, MarkdownElement};

use crate::dom::{DomTarget, document_base_url};
use crate::fetch::GlooFetcher;
use crate::highlight::PageHighlighter;

thread_local! {
    static MOUNTED: RefCell<Vec<Mounted>> = RefCell::new(Vec::new());
}

struct Mounted {
    host: Element,
    component: MarkdownElement,
}

/// Upgrade every registered element in the document and start watching for
/// attribute changes, insertions and removals.
pub fn register_document() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let registry = ElementRegistry::standard();

    if let Some(root) = document.document_element() {
        upgrade_tree(&document, &root, &registry);
    }
    observe(&document, registry)
}

fn upgrade_tree(document: &Document, root: &Element, registry: &ElementRegistry) {
    if registry.kind_for(&root.tag_name()).is_some() {
        upgrade_element(document, root, registry);
    }
    if let Ok(matches) = root.query_selector_all(&registry.selector()) {
        for index in 0..matches.length() {
            let Some(node) = matches.item(index) else {
                continue;
            };
            let Ok(element) = node.dyn_into::<Element>() else {
                continue;
            };
            upgrade_element(document, &element, registry);
        }
    }
}

fn upgrade_element(document: &Document, host: &Element, registry: &ElementRegistry) {
    let Some(kind) = registry.kind_for(&host.tag_name()) else {
        return;
    };
    if find_component(host).is_some() {
        return;
    }

    let mut options = ElementOptions::new()
        .untrusted(host.has_attribute(UNTRUSTED_ATTR))
        .with_fetcher(GlooFetcher)
        .with_highlighter(PageHighlighter::new(host.clone()));
    if let Some(base) = document_base_url(document) {
        options = options.with_base_url(base);
    }

    let target = Rc::new(DomTarget::new(host.clone()));
    let component = MarkdownElement::new(kind, target, options);

    // Reflect commit provenance onto the host element.
    {
        let host = host.clone();
        component.on_render(move |state| {
            let _ = host.set_attribute(RENDERED_ATTR, state.as_str());
        });
    }

    MOUNTED.with_borrow_mut(|mounted| {
        mounted.push(Mounted {
            host: host.clone(),
            component: component.clone(),
        });
    });

    debug!(tag = %host.tag_name(), "upgrading markdown element");

    // The source task is queued first so the remote URL is recorded before
    // the mount render labels its commit; the fetch itself stays in flight
    // while the embedded content shows.
    if let Some(src) = host.get_attribute(ConfigAttr::Source.name()) {
        let component = component.clone();
        spawn_local(async move {
            component.set_config(ConfigAttr::Source, Some(&src)).await;
        });
    }

    let embedded = host.inner_html();
    let hmin = host.get_attribute(ConfigAttr::HeadingMin.name());
    let hlinks = host.get_attribute(ConfigAttr::HeadingLinks.name());
    spawn_local(async move {
        if let Some(value) = hmin {
            component
                .set_config(ConfigAttr::HeadingMin, Some(&value))
                .await;
        }
        component
            .set_config(ConfigAttr::HeadingLinks, hlinks.as_deref())
            .await;
        component.mount(&embedded).await;
    });
}

fn find_component(host: &Element) -> Option<MarkdownElement> {
    MOUNTED.with_borrow(|mounted| {
        mounted
            .iter()
            .find(|entry| &entry.host == host)
            .map(|entry| entry.component.clone())
    })
}

fn observe(document: &Document, registry: ElementRegistry) -> Result<(), JsValue> {
    let Some(root) = document.document_element() else {
        return Err(JsValue::from_str("document has no root element"));
    };

    let doc = document.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                match record.type_().as_str() {
                    "attributes" => dispatch_attribute(&record),
                    "childList" => apply_child_changes(&doc, &record, &registry),
                    _ => {}
                }
            }
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    let filter = js_sys::Array::new();
    for name in ConfigAttr::NAMES {
        filter.push(&JsValue::from_str(name));
    }
    let filter: JsValue = filter.into();
    init.set_attribute_filter(&filter);
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(&root, &init)?;
    callback.forget();
    Ok(())
}

fn dispatch_attribute(record: &MutationRecord) {
    let Some(target) = record.target() else {
        return;
    };
    let Ok(host) = target.dyn_into::<Element>() else {
        return;
    };
    let Some(name) = record.attribute_name() else {
        return;
    };
    let Some(attr) = ConfigAttr::from_name(&name) else {
        return;
    };
    let Some(component) = find_component(&host) else {
        return;
    };
    let value = host.get_attribute(&name);
    spawn_local(async move {
        component.set_config(attr, value.as_deref()).await;
    });
}

fn apply_child_changes(document: &Document, record: &MutationRecord, registry: &ElementRegistry) {
    let added = record.added_nodes();
    for index in 0..added.length() {
        let Some(node) = added.item(index) else {
            continue;
        };
        let Ok(element) = node.dyn_into::<Element>() else {
            continue;
        };
        upgrade_tree(document, &element, registry);
    }

    // Unmount anything no longer attached so in-flight completions become
    // no-ops.
    MOUNTED.with_borrow_mut(|mounted| {
        mounted.retain(|entry| {
            if entry.host.is_connected() {
                true
            } else {
                entry.component.unmount();
                false
            }
        });
    });
}
