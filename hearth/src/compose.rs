//! Provider composition.
//!
//! The tree mounted behind the hydration gate is a fixed nesting of
//! provider layers. Downstream layers depend on upstream ones being in
//! place (styled output needs the style cache, identity needs the auth
//! layer, the router consumes everything), so the order is part of the
//! contract and [`CompositionBuilder`] rejects anything else.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    rc::Rc,
};

use crate::{dom::View, error::CompositionError};

/// Provider layers, outermost first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Style cache; wraps everything that renders styled output.
    Cache,
    ColorMode,
    /// App-wide playful state shared by the theme and pages.
    Fun,
    /// Baseline styles, rendered as a sibling in front of the inner layers.
    Baseline,
    Cookies,
    /// Authentication; wraps everything that needs identity.
    Auth,
    Container,
    /// Footer, rendered as a sibling after the router.
    Footer,
    /// Always innermost.
    Router,
}

impl Layer {
    pub const ALL: [Layer; 9] = [
        Layer::Cache,
        Layer::ColorMode,
        Layer::Fun,
        Layer::Baseline,
        Layer::Cookies,
        Layer::Auth,
        Layer::Container,
        Layer::Footer,
        Layer::Router,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::ColorMode => "color-mode",
            Self::Fun => "fun",
            Self::Baseline => "baseline",
            Self::Cookies => "cookies",
            Self::Auth => "auth",
            Self::Container => "container",
            Self::Footer => "footer",
            Self::Router => "router",
        }
    }
}

/// Values made available to layers while the tree is built.
///
/// Passed explicitly down the provider chain; there is no global lookup.
#[derive(Clone, Default)]
pub struct Scope {
    values: HashMap<TypeId, Rc<dyn Any>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value, replacing any previous value of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Rc::new(value));
    }

    pub fn with<T: 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("values", &self.values.len())
            .finish()
    }
}

/// A single layer of the composed tree.
pub trait Provider {
    fn layer(&self) -> Layer;

    /// Make values available to this layer and everything inside it.
    fn provide(&self, _scope: &mut Scope) {}

    /// Wrap the output of the inner layers.
    fn wrap(&self, inner: View, scope: &Scope) -> View;
}

/// An ordered stack of providers.
pub struct Composition {
    providers: Vec<Box<dyn Provider>>,
}

impl Composition {
    pub fn builder() -> CompositionBuilder {
        CompositionBuilder {
            providers: Vec::new(),
        }
    }

    /// A composition without layers. Renders nothing.
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.providers.iter().map(|p| p.layer())
    }

    /// Build the tree.
    ///
    /// Layers provide outermost first, so inner layers see upstream values,
    /// then wrap from the innermost layer outwards.
    pub fn render(&self, scope: &Scope) -> View {
        let mut scope = scope.clone();
        for provider in &self.providers {
            provider.provide(&mut scope);
        }

        self.providers
            .iter()
            .rev()
            .fold(View::Empty, |inner, provider| provider.wrap(inner, &scope))
    }
}

impl std::fmt::Debug for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.layers()).finish()
    }
}

pub struct CompositionBuilder {
    providers: Vec<Box<dyn Provider>>,
}

impl CompositionBuilder {
    /// Add the next inner layer.
    ///
    /// Layers must be added outermost first. Layers may be left out, but
    /// never reordered or repeated.
    pub fn add<P: Provider + 'static>(&mut self, provider: P) -> Result<(), CompositionError> {
        let layer = provider.layer();
        if let Some(previous) = self.providers.last().map(|p| p.layer()) {
            if layer == previous {
                return Err(CompositionError::Duplicate(layer));
            }
            if layer < previous {
                return Err(CompositionError::OutOfOrder { layer, previous });
            }
        }
        self.providers.push(Box::new(provider));
        Ok(())
    }

    pub fn with<P: Provider + 'static>(mut self, provider: P) -> Result<Self, CompositionError> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn build(self) -> Composition {
        Composition {
            providers: self.providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attr, Fragment, Tag, TagBuilder};

    /// Wraps its inner view in a div naming the layer.
    struct Marker(Layer);

    impl Provider for Marker {
        fn layer(&self) -> Layer {
            self.0
        }

        fn wrap(&self, inner: View, _scope: &Scope) -> View {
            TagBuilder::new(Tag::Div)
                .attr(Attr::DataLayer, self.0.as_str())
                .child(inner)
                .into()
        }
    }

    struct Sibling(Layer, &'static str);

    impl Provider for Sibling {
        fn layer(&self) -> Layer {
            self.0
        }

        fn wrap(&self, inner: View, _scope: &Scope) -> View {
            Fragment::new().and(inner).and(self.1).into()
        }
    }

    struct Counter;

    #[derive(Debug, PartialEq)]
    struct Depth(u32);

    impl Provider for Counter {
        fn layer(&self) -> Layer {
            Layer::Fun
        }

        fn provide(&self, scope: &mut Scope) {
            scope.insert(Depth(7));
        }

        fn wrap(&self, inner: View, _scope: &Scope) -> View {
            inner
        }
    }

    struct ReadsDepth;

    impl Provider for ReadsDepth {
        fn layer(&self) -> Layer {
            Layer::Router
        }

        fn wrap(&self, _inner: View, scope: &Scope) -> View {
            let depth = scope.get::<Depth>().map(|d| d.0).unwrap_or_default();
            View::Text(depth.to_string())
        }
    }

    #[test]
    fn test_first_layer_is_outermost() {
        let comp = Composition::builder()
            .with(Marker(Layer::Cache))
            .unwrap()
            .with(Marker(Layer::Auth))
            .unwrap()
            .with(Sibling(Layer::Footer, "footer"))
            .unwrap()
            .with(Marker(Layer::Router))
            .unwrap()
            .build();

        assert_eq!(
            comp.render(&Scope::new()).to_html(),
            "<div data-layer=\"cache\"><div data-layer=\"auth\">\
             <div data-layer=\"router\"></div>footer</div></div>"
        );
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let err = Composition::builder()
            .with(Marker(Layer::Router))
            .unwrap()
            .with(Marker(Layer::Cache))
            .err()
            .unwrap();
        assert_eq!(
            err,
            CompositionError::OutOfOrder {
                layer: Layer::Cache,
                previous: Layer::Router,
            }
        );

        let err = Composition::builder()
            .with(Marker(Layer::Auth))
            .unwrap()
            .with(Marker(Layer::Auth))
            .err()
            .unwrap();
        assert_eq!(err, CompositionError::Duplicate(Layer::Auth));
    }

    #[test]
    fn test_inner_layers_see_provided_values() {
        let comp = Composition::builder()
            .with(Counter)
            .unwrap()
            .with(ReadsDepth)
            .unwrap()
            .build();

        let base = Scope::new();
        assert_eq!(comp.render(&base), View::Text("7".into()));
        // The caller's scope is left untouched.
        assert!(!base.contains::<Depth>());
    }

    #[test]
    fn test_layer_ranks_follow_declaration() {
        let mut sorted = Layer::ALL;
        sorted.sort();
        assert_eq!(sorted, Layer::ALL);
        assert_eq!(Layer::ALL.last(), Some(&Layer::Router));
    }
}
