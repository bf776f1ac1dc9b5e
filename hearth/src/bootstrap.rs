//! The config bootstrap.
//!
//! Publishes the settled configuration payload into the shared context,
//! once, and only after the hydration gate has opened. Every observation of
//! the (hydration, fetch) pair goes through [`decide`]; [`Bootstrap::run`]
//! subscribes to both and stops after it has acted.

use futures::StreamExt;
use futures_signals::{
    map_ref,
    signal::{Signal, SignalExt},
};

use crate::{
    env::{EnvVarWriter, EnvVars},
    fetch::FetchState,
    gate::Phase,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// Not hydrated yet, or the request is still pending.
    Wait,
    /// Settled successfully: publish the payload, which may be absent.
    Publish(Option<EnvVars>),
    /// Settled with a failure: stop waiting, publish nothing.
    Skip,
    /// Already acted in this session.
    Done,
}

/// Decide what to do for one observation.
pub fn decide(hydrated: bool, state: &FetchState, acted: bool) -> Decision {
    if acted {
        return Decision::Done;
    }
    if !hydrated {
        return Decision::Wait;
    }
    match state {
        FetchState::Pending => Decision::Wait,
        FetchState::Resolved(data) => Decision::Publish(data.clone()),
        FetchState::Failed(_) => Decision::Skip,
    }
}

#[derive(Debug)]
pub struct Bootstrap {
    writer: EnvVarWriter,
    acted: bool,
}

impl Bootstrap {
    pub fn new(writer: EnvVarWriter) -> Self {
        Self {
            writer,
            acted: false,
        }
    }

    /// Whether the bootstrap has published or given up.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.acted
    }

    /// Re-evaluate for the current hydration and fetch state.
    ///
    /// Returns `true` once there is nothing left to do.
    pub fn observe(&mut self, hydrated: bool, state: &FetchState) -> bool {
        let decision = decide(hydrated, state, self.acted);
        tracing::trace!(
            hydrated,
            loading = state.loading(),
            ?decision,
            "bootstrap observation"
        );

        match decision {
            Decision::Wait => {}
            Decision::Done => {}
            Decision::Publish(vars) => {
                self.acted = true;
                if let Err(err) = self.writer.set_env_vars(vars) {
                    tracing::warn!(%err, "discarding config publish");
                }
            }
            Decision::Skip => {
                self.acted = true;
                if let FetchState::Failed(err) = state {
                    tracing::warn!(%err, "config request failed, leaving env vars unset");
                }
            }
        }
        self.acted
    }

    /// Observe `hydration` and `fetch` until the bootstrap has acted.
    ///
    /// Dropping the future (for example by aborting it when the root is
    /// unmounted) discards any publish that has not happened yet.
    pub async fn run<H, F>(mut self, hydration: H, fetch: F)
    where
        H: Signal<Item = Phase>,
        F: Signal<Item = FetchState>,
    {
        let observations = map_ref! {
            let phase = hydration,
            let state = fetch =>
            (phase.is_ready(), state.clone())
        };

        let mut stream = Box::pin(observations.to_stream());
        while let Some((hydrated, state)) = stream.next().await {
            if self.observe(hydrated, &state) {
                tracing::debug!("config bootstrap finished");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{env::EnvVarContext, error::FetchError};

    fn payload() -> EnvVars {
        json!({ "key": "value" }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_decide_waits_until_hydrated() {
        let settled = FetchState::Resolved(Some(payload()));
        assert_eq!(decide(false, &settled, false), Decision::Wait);
        assert_eq!(decide(false, &FetchState::Pending, false), Decision::Wait);
        assert_eq!(decide(true, &FetchState::Pending, false), Decision::Wait);
    }

    #[test]
    fn test_decide_after_settlement() {
        assert_eq!(
            decide(true, &FetchState::Resolved(Some(payload())), false),
            Decision::Publish(Some(payload()))
        );
        assert_eq!(
            decide(true, &FetchState::Resolved(None), false),
            Decision::Publish(None)
        );
        assert_eq!(
            decide(true, &FetchState::Failed(FetchError::Transport("x".into())), false),
            Decision::Skip
        );
        assert_eq!(
            decide(true, &FetchState::Resolved(Some(payload())), true),
            Decision::Done
        );
    }

    #[test]
    fn test_observe_publishes_once() {
        let (ctx, writer) = EnvVarContext::new();
        let mut boot = Bootstrap::new(writer);

        assert!(!boot.observe(true, &FetchState::Pending));
        assert!(boot.observe(true, &FetchState::Resolved(Some(payload()))));
        assert_eq!(ctx.get_cloned(), Some(payload()));

        // A later observation with a different settled value changes nothing.
        assert!(boot.observe(true, &FetchState::Resolved(None)));
        assert_eq!(ctx.get_cloned(), Some(payload()));
    }

    #[test]
    fn test_observe_failure_publishes_nothing() {
        let (ctx, writer) = EnvVarContext::new();
        let mut boot = Bootstrap::new(writer);

        let failed = FetchState::Failed(FetchError::Transport("boom".into()));
        assert!(boot.observe(true, &failed));
        assert!(boot.is_finished());
        assert!(!ctx.is_published());
    }
}
