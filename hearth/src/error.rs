//! Error types.

use thiserror::Error;

use crate::compose::Layer;

/// A terminal failure of the configuration request.
///
/// Cloneable so it can live inside the observable fetch state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("config request failed: {0}")]
    Transport(String),

    #[error("could not decode config payload: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Why a write into the shared config context was refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("config was already published for this session")]
    AlreadyPublished,

    #[error("config context was dropped before publishing")]
    ContextDropped,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CompositionError {
    #[error("layer {layer:?} must be composed before {previous:?}")]
    OutOfOrder { layer: Layer, previous: Layer },

    #[error("layer {0:?} was composed twice")]
    Duplicate(Layer),
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid root options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("logger already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FetchError = err.into();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().starts_with("could not decode"));
    }

    #[test]
    fn test_composition_error_display() {
        let err = CompositionError::OutOfOrder {
            layer: Layer::Cache,
            previous: Layer::Router,
        };
        assert_eq!(
            err.to_string(),
            "layer Cache must be composed before Router"
        );
    }
}
