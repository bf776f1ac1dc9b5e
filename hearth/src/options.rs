//! Options of the application root.

use serde::Deserialize;

use crate::error::OptionsError;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RootOptions {
    /// Key of the style cache created by the cache layer.
    pub cache_key: String,
    /// Default log level, overridden by `RUST_LOG` on native targets.
    pub log_level: String,
    /// Id of the element that carries the server-embedded env payload.
    pub env_element_id: String,
    /// Whether the baseline styles enable the browser color scheme.
    pub color_scheme: bool,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            cache_key: "so-over-css".to_string(),
            log_level: "info".to_string(),
            env_element_id: "__ENV__".to_string(),
            color_scheme: true,
        }
    }
}

impl RootOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        let opts: Self = serde_json::from_str(text)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn log_level(&self) -> Result<tracing::Level, OptionsError> {
        self.log_level
            .parse()
            .map_err(|_| OptionsError::LogLevel(self.log_level.clone()))
    }

    fn validate(&self) -> Result<(), OptionsError> {
        self.log_level().map(|_| ())
    }
}
