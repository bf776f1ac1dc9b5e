//! The application root.
//!
//! [`Root::attach`] spawns the config bootstrap and a render effect that
//! commits the root's frames. The first committed frame is empty; only
//! after it is out does the gate open and the full provider tree render.
//! The tree is rebuilt whenever the config context or theme toggle change,
//! so consumers reading the context see the published values.

use std::rc::{Rc, Weak};

use futures_signals::{
    map_ref,
    signal::{Mutable, Signal, SignalExt},
};

use crate::{
    bootstrap::Bootstrap,
    compose::{Composition, Scope},
    dom::View,
    effect::{spawn_guarded, EffectGuard, Spawner},
    env::{EnvVarContext, EnvVars},
    fetch::{ConfigFetch, ConfigSource},
    gate::{HydrationGate, HydrationWatch, Phase},
    options::RootOptions,
};

/// The render decision: nothing until hydrated, the full tree afterwards.
///
/// Does not depend on whether the config has been published.
pub fn render(phase: Phase, composition: &Composition, scope: &Scope) -> View {
    match phase {
        Phase::NotReady => View::Empty,
        Phase::Ready => composition.render(scope),
    }
}

/// Flag handed to the color mode layer to play a theme change.
#[derive(Clone, Debug, Default)]
pub struct ThemeToggle(Mutable<bool>);

impl ThemeToggle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn play(&self) -> bool {
        self.0.get()
    }

    pub fn set_play(&self, play: bool) {
        self.0.set_neq(play);
    }

    pub fn signal(&self) -> impl Signal<Item = bool> {
        self.0.signal()
    }
}

struct Tree {
    composition: Composition,
    scope: Scope,
}

impl Tree {
    fn render(&self, phase: Phase) -> View {
        render(phase, &self.composition, &self.scope)
    }
}

/// Root frames: re-rendered on every change of the hydration phase, the
/// published config or the theme toggle.
fn frames<P, V, T>(tree: Rc<Tree>, phase: P, vars: V, play: T) -> impl Signal<Item = View>
where
    P: Signal<Item = Phase>,
    V: Signal<Item = Option<EnvVars>>,
    T: Signal<Item = bool>,
{
    map_ref! {
        let phase = phase,
        let _vars = vars,
        let _play = play =>
        tree.render(*phase)
    }
}

pub struct Root {
    options: RootOptions,
    composition: Composition,
}

impl Root {
    pub fn new(options: RootOptions, composition: Composition) -> Self {
        Self {
            options,
            composition,
        }
    }

    #[inline]
    pub fn options(&self) -> &RootOptions {
        &self.options
    }

    /// What the server renders for the root, and therefore what the first
    /// client frame must match.
    pub fn server_render(&self) -> View {
        render(Phase::NotReady, &self.composition, &Scope::new())
    }

    /// Issue the config request from `source`, then mount.
    pub fn mount_with<S, C>(self, spawner: &S, source: &C) -> Mounted
    where
        S: Spawner + ?Sized,
        C: ConfigSource + ?Sized,
    {
        let fetch = ConfigFetch::issue(spawner, source);
        self.mount(spawner, fetch)
    }

    /// Mount the root without a render target.
    ///
    /// Frames are still produced; the first one counts as committed as soon
    /// as the render effect has produced it.
    pub fn mount<S>(self, spawner: &S, fetch: ConfigFetch) -> Mounted
    where
        S: Spawner + ?Sized,
    {
        self.attach(spawner, fetch, |_: &View| {})
    }

    /// Mount the root, handing every frame to `commit`.
    ///
    /// The gate opens right after `commit` has returned for the first
    /// (empty) frame.
    pub fn attach<S, R>(self, spawner: &S, fetch: ConfigFetch, mut commit: R) -> Mounted
    where
        S: Spawner + ?Sized,
        R: FnMut(&View) + 'static,
    {
        let gate = Rc::new(HydrationGate::new());
        let (env, writer) = EnvVarContext::new();
        let theme = ThemeToggle::new();

        let scope = Scope::new()
            .with(self.options)
            .with(env.clone())
            .with(gate.watch())
            .with(theme.clone());
        let tree = Rc::new(Tree {
            composition: self.composition,
            scope,
        });

        let bootstrap = spawn_guarded(
            spawner,
            Bootstrap::new(writer).run(gate.signal(), fetch.signal_cloned()),
        );

        let weak_gate: Weak<HydrationGate> = Rc::downgrade(&gate);
        let mut first = true;
        let render = spawn_guarded(
            spawner,
            frames(tree.clone(), gate.signal(), env.signal_cloned(), theme.signal()).for_each(
                move |view| {
                    commit(&view);
                    if std::mem::take(&mut first) {
                        tracing::trace!("first frame committed");
                        if let Some(gate) = weak_gate.upgrade() {
                            gate.open();
                        }
                    }
                    async {}
                },
            ),
        );

        tracing::debug!(layers = ?tree.composition, "root mounted");

        Mounted {
            _render: render,
            _bootstrap: bootstrap,
            gate,
            env,
            theme,
            fetch,
            tree,
        }
    }
}

/// A mounted root.
///
/// Dropping it unmounts: pending effects are aborted, so a config request
/// that settles later publishes nothing.
#[must_use]
pub struct Mounted {
    // Guards come first so effects are aborted before any state is dropped.
    _render: EffectGuard,
    _bootstrap: EffectGuard,
    gate: Rc<HydrationGate>,
    env: EnvVarContext,
    theme: ThemeToggle,
    fetch: ConfigFetch,
    tree: Rc<Tree>,
}

impl Mounted {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.gate.phase()
    }

    #[inline]
    pub fn is_hydrated(&self) -> bool {
        self.gate.is_hydrated()
    }

    pub fn watch(&self) -> HydrationWatch {
        self.gate.watch()
    }

    /// Read handle of the shared config context.
    pub fn env_vars(&self) -> EnvVarContext {
        self.env.clone()
    }

    pub fn theme(&self) -> &ThemeToggle {
        &self.theme
    }

    pub fn fetch(&self) -> &ConfigFetch {
        &self.fetch
    }

    /// The current output of the root.
    pub fn view(&self) -> View {
        self.tree.render(self.gate.phase())
    }

    /// The output of the root over time.
    ///
    /// Emits the empty frame, then the full tree once hydrated, rebuilt
    /// whenever the config is published or the theme toggle changes.
    pub fn view_signal(&self) -> impl Signal<Item = View> {
        frames(
            self.tree.clone(),
            self.gate.signal(),
            self.env.signal_cloned(),
            self.theme.signal(),
        )
    }

    pub fn unmount(self) {}
}

impl Drop for Mounted {
    fn drop(&mut self) {
        tracing::debug!(
            hydrated = self.gate.is_hydrated(),
            published = self.env.is_published(),
            "root unmounted"
        );
    }
}
