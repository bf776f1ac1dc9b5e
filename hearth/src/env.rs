//! The shared config context.
//!
//! Holds the environment-derived configuration published by the bootstrap.
//! There is exactly one [`EnvVarWriter`] per context; readers are cheap
//! clones of [`EnvVarContext`] passed down the provider chain.

use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use futures_signals::signal::{Mutable, Signal};
use serde_json::Value;

use crate::error::PublishError;

/// An opaque mapping of configuration keys to values.
pub type EnvVars = serde_json::Map<String, Value>;

struct Inner {
    vars: Mutable<Option<EnvVars>>,
    published: Cell<bool>,
}

/// Read access to the published configuration.
///
/// Unset until the bootstrap publishes; consumers rendered before that must
/// handle the missing values themselves.
#[derive(Clone)]
pub struct EnvVarContext(Rc<Inner>);

impl EnvVarContext {
    /// Create an unset context and its only writer.
    pub fn new() -> (Self, EnvVarWriter) {
        let inner = Rc::new(Inner {
            vars: Mutable::new(None),
            published: Cell::new(false),
        });
        let writer = EnvVarWriter(Rc::downgrade(&inner));
        (Self(inner), writer)
    }

    /// Whether the bootstrap has published, even if it published an absent
    /// payload.
    #[inline]
    pub fn is_published(&self) -> bool {
        self.0.published.get()
    }

    /// Whether a payload is present.
    pub fn is_set(&self) -> bool {
        self.0.vars.lock_ref().is_some()
    }

    pub fn get_cloned(&self) -> Option<EnvVars> {
        self.0.vars.get_cloned()
    }

    pub fn with<O, F>(&self, f: F) -> O
    where
        F: FnOnce(Option<&EnvVars>) -> O,
    {
        let vars = self.0.vars.lock_ref();
        f(vars.as_ref())
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.with(|vars| vars.and_then(|v| v.get(key)).cloned())
    }

    /// Look up a string value. Non-string values are ignored.
    pub fn str_value(&self, key: &str) -> Option<String> {
        self.with(|vars| {
            vars.and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
    }

    pub fn signal_cloned(&self) -> impl Signal<Item = Option<EnvVars>> {
        self.0.vars.signal_cloned()
    }

    pub fn value_signal(&self, key: impl Into<String>) -> impl Signal<Item = Option<Value>> {
        let key = key.into();
        self.0
            .vars
            .signal_ref(move |vars| vars.as_ref().and_then(|v| v.get(&key)).cloned())
    }
}

impl std::fmt::Debug for EnvVarContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvVarContext")
            .field("published", &self.is_published())
            .field("vars", &*self.0.vars.lock_ref())
            .finish()
    }
}

/// The single write handle of an [`EnvVarContext`].
///
/// Holds only a weak reference: once the context and all its readers are
/// gone, writes are refused instead of resurrecting state.
pub struct EnvVarWriter(Weak<Inner>);

impl EnvVarWriter {
    /// Publish the configuration payload. Succeeds at most once.
    ///
    /// An absent payload is still a publication.
    pub fn set_env_vars(&self, vars: Option<EnvVars>) -> Result<(), PublishError> {
        let inner = self.0.upgrade().ok_or(PublishError::ContextDropped)?;
        if inner.published.replace(true) {
            return Err(PublishError::AlreadyPublished);
        }

        tracing::debug!(
            keys = vars.as_ref().map_or(0, |v| v.len()),
            present = vars.is_some(),
            "publishing env vars"
        );
        inner.vars.set(vars);
        Ok(())
    }

    /// Whether the target context still exists.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl std::fmt::Debug for EnvVarWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvVarWriter")
            .field("alive", &self.is_alive())
            .finish()
    }
}
