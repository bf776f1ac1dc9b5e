//! The one-shot configuration request.
//!
//! A [`ConfigFetch`] is issued once per session and settles once, either
//! with a payload (possibly absent) or with a [`FetchError`]. How the
//! payload is transported is up to the [`ConfigSource`].

use futures::future::{self, LocalBoxFuture};
use futures_signals::signal::{Mutable, Signal, SignalExt};
use serde_json::Value;

use crate::{
    effect::{spawn_unguarded, Spawner},
    env::EnvVars,
    error::FetchError,
};

/// Name of the query field that carries the public environment variables.
pub const PUBLIC_ENV_VARS_FIELD: &str = "getPublicEnvVars";

pub type FetchResult = Result<Option<EnvVars>, FetchError>;

#[derive(Clone, Debug, PartialEq)]
pub enum FetchState {
    Pending,
    Resolved(Option<EnvVars>),
    Failed(FetchError),
}

impl FetchState {
    /// `true` until the request has settled.
    #[inline]
    pub fn loading(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn data(&self) -> Option<&EnvVars> {
        match self {
            Self::Resolved(data) => data.as_ref(),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        if let Self::Failed(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<FetchResult> for FetchState {
    fn from(res: FetchResult) -> Self {
        match res {
            Ok(data) => Self::Resolved(data),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Somewhere the configuration payload can be requested from.
pub trait ConfigSource {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult>;
}

/// A source with a fixed outcome.
#[derive(Clone, Debug)]
pub struct StaticSource(FetchResult);

impl StaticSource {
    pub fn new(result: FetchResult) -> Self {
        Self(result)
    }

    pub fn vars(vars: EnvVars) -> Self {
        Self(Ok(Some(vars)))
    }
}

impl ConfigSource for StaticSource {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult> {
        Box::pin(future::ready(self.0.clone()))
    }
}

pub struct FnSource<F>(F);

/// Adapt a closure returning a future into a [`ConfigSource`].
pub fn source_fn<F, Fut>(f: F) -> FnSource<F>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = FetchResult> + 'static,
{
    FnSource(f)
}

impl<F, Fut> ConfigSource for FnSource<F>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = FetchResult> + 'static,
{
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult> {
        Box::pin((self.0)())
    }
}

/// Pick the public environment variables out of a query response.
///
/// A missing or `null` field is an absent payload, not an error.
pub fn extract_public_env_vars(data: &Value) -> FetchResult {
    match data.get(PUBLIC_ENV_VARS_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(vars)) => Ok(Some(vars.clone())),
        Some(_) => Err(FetchError::Decode(format!(
            "field '{}' is not an object",
            PUBLIC_ENV_VARS_FIELD
        ))),
    }
}

/// Parse a JSON query response and extract the public environment
/// variables.
pub fn parse_env_response(text: &str) -> FetchResult {
    let data: Value = serde_json::from_str(text)?;
    extract_public_env_vars(&data)
}

/// Observable state of the configuration request.
#[derive(Clone)]
pub struct ConfigFetch {
    state: Mutable<FetchState>,
}

/// Completes a pending [`ConfigFetch`]. Consumed on use, so a request
/// settles at most once.
#[must_use]
pub struct Settle {
    state: Mutable<FetchState>,
}

impl Settle {
    pub fn settle(self, result: FetchResult) {
        match &result {
            Ok(data) => {
                tracing::debug!(present = data.is_some(), "config request settled");
            }
            Err(err) => {
                tracing::debug!(%err, "config request failed");
            }
        }
        self.state.set(result.into());
    }
}

impl ConfigFetch {
    /// A request that settles when the returned [`Settle`] is used.
    ///
    /// If the [`Settle`] is dropped unused, the request stays pending for
    /// the rest of the session.
    pub fn pending() -> (Self, Settle) {
        let state = Mutable::new(FetchState::Pending);
        let settle = Settle {
            state: state.clone(),
        };
        (Self { state }, settle)
    }

    /// Issue the request on `spawner`.
    ///
    /// The request is not tied to any component: it is neither cancelled
    /// nor retried.
    pub fn issue<S, C>(spawner: &S, source: &C) -> Self
    where
        S: Spawner + ?Sized,
        C: ConfigSource + ?Sized,
    {
        let (fetch, settle) = Self::pending();
        let request = source.fetch();
        tracing::trace!("issuing config request");
        spawn_unguarded(spawner, async move {
            let result = request.await;
            settle.settle(result);
        });
        fetch
    }

    pub fn state(&self) -> FetchState {
        self.state.get_cloned()
    }

    pub fn loading(&self) -> bool {
        self.state.lock_ref().loading()
    }

    pub fn signal_cloned(&self) -> impl Signal<Item = FetchState> {
        self.state.signal_cloned()
    }

    pub fn loading_signal(&self) -> impl Signal<Item = bool> {
        self.state.signal_ref(FetchState::loading).dedupe()
    }
}

impl std::fmt::Debug for ConfigFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFetch")
            .field("state", &*self.state.lock_ref())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::LocalPool;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_public_env_vars() {
        let data = json!({ "getPublicEnvVars": { "key": "value" } });
        let vars = extract_public_env_vars(&data).unwrap().unwrap();
        assert_eq!(vars.get("key"), Some(&json!("value")));

        assert_eq!(extract_public_env_vars(&json!({})).unwrap(), None);
        assert_eq!(
            extract_public_env_vars(&json!({ "getPublicEnvVars": null })).unwrap(),
            None
        );
        assert!(matches!(
            extract_public_env_vars(&json!({ "getPublicEnvVars": [1, 2] })),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_env_response_invalid_json() {
        assert!(matches!(
            parse_env_response("{ nope"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_pending_settles_once() {
        let (fetch, settle) = ConfigFetch::pending();
        assert!(fetch.loading());
        assert_eq!(fetch.state().data(), None);

        settle.settle(Err(FetchError::Transport("offline".into())));
        assert!(!fetch.loading());
        assert_eq!(
            fetch.state().error(),
            Some(&FetchError::Transport("offline".into()))
        );
    }

    #[test]
    fn test_issue_static_source() {
        let mut pool = LocalPool::new();
        let vars = json!({ "key": "value" }).as_object().cloned().unwrap();

        let fetch = ConfigFetch::issue(&pool.spawner(), &StaticSource::vars(vars.clone()));
        assert!(fetch.loading());

        pool.run_until_stalled();
        assert_eq!(fetch.state(), FetchState::Resolved(Some(vars)));
    }

    #[test]
    fn test_issue_fn_source_never_settles() {
        let mut pool = LocalPool::new();
        let source = source_fn(future::pending::<FetchResult>);

        let fetch = ConfigFetch::issue(&pool.spawner(), &source);
        pool.run_until_stalled();
        assert!(fetch.loading());
    }
}
