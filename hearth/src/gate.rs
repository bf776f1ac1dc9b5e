//! The hydration gate.
//!
//! A two-state machine that starts [`Phase::NotReady`] and moves to
//! [`Phase::Ready`] once, after the root's first render pass. Anything
//! rendered before that would diverge from the server markup.

use futures_signals::signal::{Mutable, ReadOnlyMutable, Signal, SignalExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The first client frame has not been committed yet.
    NotReady,
    /// Hydrated: stateful, client-only content may render.
    Ready,
}

impl Phase {
    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::NotReady
    }
}

/// Owner of the hydration state.
///
/// Deliberately not `Clone`: the root holds the only gate, and only crate
/// code can open it. Other parts of the tree get a [`HydrationWatch`].
#[derive(Debug)]
pub struct HydrationGate {
    phase: Mutable<Phase>,
}

impl HydrationGate {
    pub fn new() -> Self {
        Self {
            phase: Mutable::new(Phase::NotReady),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    #[inline]
    pub fn is_hydrated(&self) -> bool {
        self.phase().is_ready()
    }

    /// Perform the single forward transition.
    ///
    /// Returns `false` without notifying observers if the gate is already
    /// open.
    pub(crate) fn open(&self) -> bool {
        {
            let mut phase = self.phase.lock_mut();
            if phase.is_ready() {
                return false;
            }
            *phase = Phase::Ready;
        }
        tracing::debug!("hydration gate opened");
        true
    }

    pub fn signal(&self) -> impl Signal<Item = Phase> {
        self.phase.signal().dedupe()
    }

    pub fn watch(&self) -> HydrationWatch {
        HydrationWatch(self.phase.read_only())
    }
}

impl Default for HydrationGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a [`HydrationGate`].
#[derive(Clone)]
pub struct HydrationWatch(ReadOnlyMutable<Phase>);

impl HydrationWatch {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.0.get()
    }

    #[inline]
    pub fn is_hydrated(&self) -> bool {
        self.phase().is_ready()
    }

    pub fn signal(&self) -> impl Signal<Item = Phase> {
        self.0.signal().dedupe()
    }
}

impl std::fmt::Debug for HydrationWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HydrationWatch").field(&self.phase()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::LocalPool;

    use super::*;
    use crate::effect::spawn_guarded;

    #[test]
    fn test_gate_starts_closed() {
        let gate = HydrationGate::new();
        assert_eq!(gate.phase(), Phase::NotReady);
        assert!(!gate.is_hydrated());
        assert!(!gate.watch().is_hydrated());
    }

    #[test]
    fn test_gate_opens_once() {
        let gate = HydrationGate::new();
        let watch = gate.watch();

        assert!(gate.open());
        assert!(gate.is_hydrated());
        assert!(watch.is_hydrated());

        assert!(!gate.open());
        assert_eq!(gate.phase(), Phase::Ready);
    }

    #[test]
    fn test_signal_sees_single_transition() {
        let mut pool = LocalPool::new();
        let gate = HydrationGate::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen2 = seen.clone();
        let _guard = spawn_guarded(
            &pool.spawner(),
            gate.watch().signal().for_each(move |phase| {
                seen2.borrow_mut().push(phase);
                async {}
            }),
        );
        pool.run_until_stalled();

        gate.open();
        pool.run_until_stalled();
        gate.open();
        pool.run_until_stalled();

        assert_eq!(*seen.borrow(), vec![Phase::NotReady, Phase::Ready]);
    }
}
