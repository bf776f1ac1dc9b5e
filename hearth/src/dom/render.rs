//! Markup rendering of a [`View`].
//!
//! The root's gated first render must match what the server sent byte for
//! byte, so the markup form is what hydration tests compare against.

use super::{Element, View};

fn escape_into(out: &mut String, value: &str, in_attr: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

fn render_element(out: &mut String, elem: &Element) {
    out.push('<');
    out.push_str(elem.tag().as_str());
    for (attr, value) in elem.attributes() {
        out.push(' ');
        out.push_str(attr.as_str());
        if !value.is_empty() {
            out.push_str("=\"");
            escape_into(out, value, true);
            out.push('"');
        }
    }
    out.push('>');
    for child in elem.children() {
        render_into(out, child);
    }
    out.push_str("</");
    out.push_str(elem.tag().as_str());
    out.push('>');
}

fn render_into(out: &mut String, view: &View) {
    match view {
        View::Empty => {}
        View::Text(text) => escape_into(out, text, false),
        View::Element(elem) => render_element(out, elem),
        View::Fragment(frag) => {
            for item in &frag.items {
                render_into(out, item);
            }
        }
    }
}

impl View {
    /// Render to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        render_into(&mut out, self);
        out
    }
}
