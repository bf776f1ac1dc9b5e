//! Hydration-gated bootstrap for single page applications.
//!
//! The [`Root`] renders nothing until the client has taken over the server
//! markup, then mounts its provider [`Composition`](compose::Composition).
//! A one-shot config request is published into the shared
//! [`EnvVarContext`] once the root is hydrated and the request has settled.

// NOTE: needs to be on top because it defines macros used elsewhere.
#[macro_use]
mod strings;

pub mod app;
pub mod bootstrap;
pub mod compose;
pub mod dom;
pub mod effect;
pub mod env;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod logging;
pub mod options;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use self::{
    app::{Mounted, Root, ThemeToggle},
    env::{EnvVarContext, EnvVars},
    gate::{HydrationWatch, Phase},
    options::RootOptions,
};

pub use futures_signals as signal;

#[cfg(target_arch = "wasm32")]
pub use self::launch::{launch, Launched};

#[cfg(target_arch = "wasm32")]
mod launch {
    use crate::{
        app::{Mounted, Root},
        effect::WebSpawner,
        fetch::{ConfigFetch, ConfigSource},
    };

    /// A root attached to a DOM element.
    #[must_use]
    pub struct Launched {
        root: Mounted,
    }

    impl Launched {
        pub fn mounted(&self) -> &Mounted {
            &self.root
        }

        /// Keep the root alive for the rest of the page lifetime.
        pub fn forget(self) {
            std::mem::forget(self);
        }
    }

    /// Mount `root` into `parent`, requesting the config from `source`.
    ///
    /// `parent` receives the empty first frame before the root hydrates.
    pub fn launch<C: ConfigSource + ?Sized>(
        parent: web_sys::Element,
        root: Root,
        source: &C,
    ) -> Launched {
        let fetch = ConfigFetch::issue(&WebSpawner, source);
        let mounted = root.attach(&WebSpawner, fetch, move |view| {
            if let Err(err) = crate::web::replace_children(&parent, view) {
                tracing::error!(?err, "could not render root");
            }
        });

        Launched { root: mounted }
    }
}
