//! The demo application's provider layers, outermost first.

use std::collections::BTreeMap;

use hearth::{
    compose::{Composition, Layer, Provider, Scope},
    dom::{
        builder::{div, footer, main, style},
        Attr, Fragment, Tag, TagBuilder, View,
    },
    error::CompositionError,
    signal::signal::Mutable,
    EnvVarContext, HydrationWatch, RootOptions, ThemeToggle,
};

/// Style cache shared by everything that renders styled output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleCache {
    pub key: String,
}

pub struct CacheLayer;

impl Provider for CacheLayer {
    fn layer(&self) -> Layer {
        Layer::Cache
    }

    fn provide(&self, scope: &mut Scope) {
        let key = scope
            .get::<RootOptions>()
            .map(|o| o.cache_key.clone())
            .unwrap_or_default();
        scope.insert(StyleCache { key });
    }

    fn wrap(&self, inner: View, scope: &Scope) -> View {
        let key = scope.get::<StyleCache>().map(|c| c.key.as_str()).unwrap_or("");
        div().attr(Attr::DataCacheKey, key).child(inner).into()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

pub struct ColorModeLayer {
    pub scheme: ColorScheme,
}

impl Provider for ColorModeLayer {
    fn layer(&self) -> Layer {
        Layer::ColorMode
    }

    fn provide(&self, scope: &mut Scope) {
        scope.insert(self.scheme);
    }

    fn wrap(&self, inner: View, scope: &Scope) -> View {
        let playing = scope.get::<ThemeToggle>().map_or(false, ThemeToggle::play);
        let mut elem = div().attr(Attr::DataColorScheme, self.scheme.as_str());
        if playing {
            elem = elem.class("theme-play");
        }
        elem.child(inner).into()
    }
}

/// Counter of easter eggs found, shared app-wide.
#[derive(Clone, Debug, Default)]
pub struct FunContext(pub Mutable<u32>);

pub struct FunLayer;

impl Provider for FunLayer {
    fn layer(&self) -> Layer {
        Layer::Fun
    }

    fn provide(&self, scope: &mut Scope) {
        scope.insert(FunContext::default());
    }

    fn wrap(&self, inner: View, _scope: &Scope) -> View {
        inner
    }
}

pub struct BaselineLayer;

impl Provider for BaselineLayer {
    fn layer(&self) -> Layer {
        Layer::Baseline
    }

    fn wrap(&self, inner: View, scope: &Scope) -> View {
        let color_scheme = scope.get::<RootOptions>().map_or(true, |o| o.color_scheme);
        let mut css = String::from("*,*::before,*::after{box-sizing:border-box}body{margin:0}");
        if color_scheme {
            css.push_str(":root{color-scheme:light dark}");
        }
        Fragment::new().and(style().and(css)).and(inner).into()
    }
}

/// Cookies of the current document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cookies(pub BTreeMap<String, String>);

impl Cookies {
    /// Parse a `document.cookie` string.
    pub fn parse(raw: &str) -> Self {
        let values = raw
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    None
                } else {
                    Some((name.to_string(), value.trim().to_string()))
                }
            })
            .collect();
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

pub struct CookiesLayer {
    pub cookies: Cookies,
}

impl Provider for CookiesLayer {
    fn layer(&self) -> Layer {
        Layer::Cookies
    }

    fn provide(&self, scope: &mut Scope) {
        scope.insert(self.cookies.clone());
    }

    fn wrap(&self, inner: View, _scope: &Scope) -> View {
        inner
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Session(String),
}

pub const SESSION_COOKIE: &str = "session";

pub struct AuthLayer;

impl Provider for AuthLayer {
    fn layer(&self) -> Layer {
        Layer::Auth
    }

    fn provide(&self, scope: &mut Scope) {
        let identity = scope
            .get::<Cookies>()
            .and_then(|c| c.get(SESSION_COOKIE))
            .map_or(Identity::Anonymous, |s| Identity::Session(s.to_string()));
        scope.insert(identity);
    }

    fn wrap(&self, inner: View, _scope: &Scope) -> View {
        inner
    }
}

pub struct ContainerLayer;

impl Provider for ContainerLayer {
    fn layer(&self) -> Layer {
        Layer::Container
    }

    fn wrap(&self, inner: View, _scope: &Scope) -> View {
        main().class("app-container").child(inner).into()
    }
}

pub struct FooterLayer;

impl Provider for FooterLayer {
    fn layer(&self) -> Layer {
        Layer::Footer
    }

    fn wrap(&self, inner: View, scope: &Scope) -> View {
        let name = scope
            .get::<EnvVarContext>()
            .and_then(|env| env.str_value("APP_NAME"));
        Fragment::new()
            .and(inner)
            .and(footer().class("app-footer").and(name))
            .into()
    }
}

pub struct RouterLayer {
    pub path: String,
}

impl RouterLayer {
    fn page(&self) -> &'static str {
        match self.path.as_str() {
            "" | "/" => "home",
            "/about" => "about",
            _ => "not-found",
        }
    }
}

impl Provider for RouterLayer {
    fn layer(&self) -> Layer {
        Layer::Router
    }

    fn wrap(&self, _inner: View, scope: &Scope) -> View {
        let hydrated = scope
            .get::<HydrationWatch>()
            .map_or(false, HydrationWatch::is_hydrated);
        let signed_in = matches!(scope.get::<Identity>(), Some(Identity::Session(_)));

        TagBuilder::new(Tag::Section)
            .attr(Attr::DataRoute, self.path.as_str())
            .attr_toggle_if(hydrated, Attr::DataHydrated)
            .class(self.page())
            .and(if signed_in { "welcome back" } else { "welcome" })
            .into()
    }
}

/// The full composition, in provider order.
pub fn composition(path: &str, cookies: Cookies) -> Result<Composition, CompositionError> {
    Ok(Composition::builder()
        .with(CacheLayer)?
        .with(ColorModeLayer {
            scheme: ColorScheme::Light,
        })?
        .with(FunLayer)?
        .with(BaselineLayer)?
        .with(CookiesLayer { cookies })?
        .with(AuthLayer)?
        .with(ContainerLayer)?
        .with(FooterLayer)?
        .with(RouterLayer {
            path: path.to_string(),
        })?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let cookies = Cookies::parse("a=1; session=abc ;=x; broken");
        assert_eq!(cookies.get("a"), Some("1"));
        assert_eq!(cookies.get("session"), Some("abc"));
        assert_eq!(cookies.0.len(), 2);
    }

    #[test]
    fn test_composition_covers_every_layer() {
        let comp = composition("/", Cookies::default()).unwrap();
        assert_eq!(comp.layers().collect::<Vec<_>>(), Layer::ALL.to_vec());
    }

    #[test]
    fn test_router_is_innermost() {
        let comp = composition("/about", Cookies::parse("session=s1")).unwrap();
        let scope = Scope::new().with(RootOptions::default());
        let view = comp.render(&scope);

        let container = view.find(|e| e.tag() == Tag::Main).unwrap();
        let route = container.children()[0].as_element().unwrap();
        assert_eq!(route.attr(Attr::DataRoute), Some("/about"));
        assert_eq!(route.attr(Attr::Class), Some("about"));
        assert_eq!(route.children(), &[View::from("welcome back")]);
        assert_eq!(container.children()[1].as_element().unwrap().tag(), Tag::Footer);

        let cache = view.as_element().unwrap();
        assert_eq!(cache.attr(Attr::DataCacheKey), Some("so-over-css"));
    }

    #[test]
    fn test_footer_shows_published_app_name() {
        use std::{cell::RefCell, rc::Rc};

        use futures::executor::LocalPool;
        use hearth::{fetch::StaticSource, EnvVars, Root};

        let mut pool = LocalPool::new();
        let mut vars = EnvVars::new();
        vars.insert("APP_NAME".into(), "demo".into());
        let source = StaticSource::vars(vars);

        let footers = Rc::new(RefCell::new(Vec::new()));
        let sink = footers.clone();
        let app = Root::new(
            RootOptions::default(),
            composition("/", Cookies::default()).unwrap(),
        );
        let fetch = hearth::fetch::ConfigFetch::issue(&pool.spawner(), &source);
        let _mounted = app.attach(&pool.spawner(), fetch, move |view: &View| {
            let text = view
                .find(|e| e.tag() == Tag::Footer)
                .map(|f| f.children().to_vec());
            sink.borrow_mut().push(text);
        });
        pool.run_until_stalled();

        let footers = footers.borrow();
        assert_eq!(footers.first(), Some(&None));
        assert_eq!(
            footers.last(),
            Some(&Some(vec![View::from("demo".to_string())]))
        );
    }
}
