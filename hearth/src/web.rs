//! Helpers for interacting with the browser environment.

use wasm_bindgen::JsValue;

use crate::dom::{Element, View};

pub fn window() -> &'static web_sys::Window {
    static mut WINDOW: once_cell::unsync::Lazy<web_sys::Window> =
        once_cell::unsync::Lazy::new(|| web_sys::window().expect("no global window"));

    // SAFETY:
    // static mut is only unsafe due to multi-threading.
    // This module is only compiled for wasm32, which runs the UI on a
    // single thread.
    unsafe { &**std::ptr::addr_of!(WINDOW) }
}

pub fn document() -> web_sys::Document {
    window().document().expect("window has no document")
}

fn create_element(doc: &web_sys::Document, elem: &Element) -> Result<web_sys::Element, JsValue> {
    let node = doc.create_element(elem.tag().as_str())?;
    for (attr, value) in elem.attributes() {
        node.set_attribute(attr.as_str(), value)?;
    }
    for child in elem.children() {
        append_view(doc, &node, child)?;
    }
    Ok(node)
}

/// Append the DOM nodes for `view` to `parent`.
pub fn append_view(
    doc: &web_sys::Document,
    parent: &web_sys::Node,
    view: &View,
) -> Result<(), JsValue> {
    match view {
        View::Empty => {}
        View::Text(text) => {
            parent.append_child(&doc.create_text_node(text))?;
        }
        View::Element(elem) => {
            parent.append_child(&create_element(doc, elem)?)?;
        }
        View::Fragment(frag) => {
            for item in &frag.items {
                append_view(doc, parent, item)?;
            }
        }
    }
    Ok(())
}

/// Replace the children of `parent` with `view`.
///
/// An empty view over an empty parent leaves the DOM untouched, so the
/// server markup of a gated root survives the first client frame.
pub fn replace_children(parent: &web_sys::Element, view: &View) -> Result<(), JsValue> {
    if view.is_empty() && parent.first_child().is_none() {
        return Ok(());
    }
    parent.set_text_content(None);
    append_view(&document(), parent, view)
}
