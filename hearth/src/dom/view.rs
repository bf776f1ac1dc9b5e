use super::Element;

/// A description of rendered output.
///
/// Views are plain data: building one has no side effects, which keeps the
/// root render a pure function of the hydration phase. The browser glue in
/// [`crate::web`] turns a view into DOM nodes, [`View::to_html`] turns it
/// into markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    Empty,
    Text(String),
    Element(Element),
    Fragment(Fragment),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub items: Vec<View>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and<V: Into<View>>(mut self, item: V) -> Self {
        self.items.push(item.into());
        self
    }
}

impl Default for View {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<()> for View {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for View {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for View {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Element> for View {
    fn from(elem: Element) -> Self {
        Self::Element(elem)
    }
}

impl From<Fragment> for View {
    fn from(f: Fragment) -> Self {
        Self::Fragment(f)
    }
}

impl<V: Into<View>> From<Option<V>> for View {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl View {
    /// Returns `true` if the view is [`Empty`].
    ///
    /// A fragment that only holds empty views is also empty, since it
    /// produces no output.
    ///
    /// [`Empty`]: View::Empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fragment(f) => f.items.iter().all(View::is_empty),
            Self::Text(_) | Self::Element(_) => false,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        if let Self::Element(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn into_element(self) -> Option<Element> {
        if let Self::Element(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_fragment(&self) -> Option<&Fragment> {
        if let Self::Fragment(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Depth-first search for the first element matching `pred`.
    pub fn find<F>(&self, pred: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        match self {
            Self::Empty | Self::Text(_) => None,
            Self::Element(elem) => {
                if pred(elem) {
                    Some(elem)
                } else {
                    elem.children().iter().find_map(|c| c.find(pred))
                }
            }
            Self::Fragment(f) => f.items.iter().find_map(|c| c.find(pred)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attr, Tag, TagBuilder};

    #[test]
    fn test_empty_fragment_is_empty() {
        let frag = Fragment::new().and(()).and(View::Empty);
        assert!(View::from(frag).is_empty());

        let frag = Fragment::new().and(()).and("x");
        assert!(!View::from(frag).is_empty());
    }

    #[test]
    fn test_find_nested() {
        let view: View = TagBuilder::new(Tag::Div)
            .child(
                TagBuilder::new(Tag::Section)
                    .attr(Attr::Id, "outer")
                    .child(TagBuilder::new(Tag::Span).attr(Attr::Id, "inner")),
            )
            .into();

        let inner = view.find(|e| e.attr(Attr::Id) == Some("inner")).unwrap();
        assert_eq!(inner.tag(), Tag::Span);
        assert!(view.find(|e| e.tag() == Tag::Footer).is_none());
    }
}
