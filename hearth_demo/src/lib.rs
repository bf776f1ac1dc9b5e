pub mod layers;

#[cfg(target_arch = "wasm32")]
mod source;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().unwrap();
    let doc = window.document().unwrap();
    let root = match doc.get_element_by_id("app") {
        Some(elem) => elem,
        None => {
            let elem = doc.create_element("div").unwrap();
            doc.body().unwrap().append_child(&elem).unwrap();
            elem
        }
    };

    let options = match root.get_attribute("data-options") {
        Some(raw) => hearth::RootOptions::from_json(&raw).unwrap_or_else(|err| {
            web_sys::console::error_1(&err.to_string().into());
            hearth::RootOptions::default()
        }),
        None => hearth::RootOptions::default(),
    };

    if let Err(err) = hearth::logging::init(&options.log_level) {
        web_sys::console::warn_1(&err.to_string().into());
    }

    let path = window.location().pathname().unwrap_or_default();
    let cookies = doc
        .dyn_ref::<web_sys::HtmlDocument>()
        .and_then(|d| d.cookie().ok())
        .map(|raw| layers::Cookies::parse(&raw))
        .unwrap_or_default();

    let composition = match layers::composition(&path, cookies) {
        Ok(c) => c,
        Err(err) => {
            tracing::error!(%err, "invalid provider composition");
            return;
        }
    };

    let source = source::EmbeddedSource::new(options.env_element_id.clone());
    let app = hearth::Root::new(options, composition);
    hearth::launch(root, app, &source).forget();
}
