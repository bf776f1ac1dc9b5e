//! Spawning of the root's background work.

use futures::{
    future::{AbortHandle, Abortable, LocalBoxFuture},
    Future, FutureExt,
};

/// A single-threaded executor the root can run its effects on.
///
/// In the browser this is the microtask queue ([`WebSpawner`]), natively a
/// [`futures::executor::LocalPool`].
pub trait Spawner {
    fn spawn_boxed(&self, f: LocalBoxFuture<'static, ()>);
}

impl Spawner for futures::executor::LocalSpawner {
    fn spawn_boxed(&self, f: LocalBoxFuture<'static, ()>) {
        use futures::task::LocalSpawnExt;

        if let Err(err) = self.spawn_local(f) {
            tracing::error!(%err, "could not spawn effect: executor shut down");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSpawner;

#[cfg(target_arch = "wasm32")]
impl Spawner for WebSpawner {
    fn spawn_boxed(&self, f: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(f);
    }
}

/// Aborts the related future when dropped.
#[must_use]
#[derive(Debug)]
pub struct EffectGuard {
    handle: AbortHandle,
}

impl Drop for EffectGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn spawn_guarded<S, F>(spawner: &S, f: F) -> EffectGuard
where
    S: Spawner + ?Sized,
    F: Future<Output = ()> + 'static,
{
    let (handle, reg) = AbortHandle::new_pair();
    let f = Abortable::new(f, reg);
    spawner.spawn_boxed(
        async move {
            f.await.ok();
        }
        .boxed_local(),
    );
    EffectGuard { handle }
}

pub fn spawn_unguarded<S, F>(spawner: &S, f: F)
where
    S: Spawner + ?Sized,
    F: Future<Output = ()> + 'static,
{
    spawner.spawn_boxed(f.boxed_local());
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use futures::executor::LocalPool;

    use super::*;

    #[test]
    fn test_guarded_effect_runs() {
        let mut pool = LocalPool::new();
        let ran = Rc::new(Cell::new(false));

        let ran2 = ran.clone();
        let _guard = spawn_guarded(&pool.spawner(), async move {
            ran2.set(true);
        });
        pool.run_until_stalled();

        assert!(ran.get());
    }

    #[test]
    fn test_dropped_guard_aborts_effect() {
        let mut pool = LocalPool::new();
        let ran = Rc::new(Cell::new(false));

        let ran2 = ran.clone();
        let guard = spawn_guarded(&pool.spawner(), async move {
            ran2.set(true);
        });
        std::mem::drop(guard);
        pool.run_until_stalled();

        assert!(!ran.get());
    }
}
