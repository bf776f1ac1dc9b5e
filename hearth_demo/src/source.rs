use futures::future::{self, LocalBoxFuture};
use hearth::{
    error::FetchError,
    fetch::{parse_env_response, ConfigSource, FetchResult},
};

/// Reads the env query response the server embedded into the page as
/// `<script type="application/json" id="...">`.
pub struct EmbeddedSource {
    element_id: String,
}

impl EmbeddedSource {
    pub fn new(element_id: String) -> Self {
        Self { element_id }
    }

    fn read(&self) -> FetchResult {
        let text = hearth::web::document()
            .get_element_by_id(&self.element_id)
            .and_then(|elem| elem.text_content())
            .ok_or_else(|| {
                FetchError::Transport(format!("element #{} not found", self.element_id))
            })?;
        parse_env_response(&text)
    }
}

impl ConfigSource for EmbeddedSource {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult> {
        Box::pin(future::ready(self.read()))
    }
}
