use super::{Attr, Tag, View};

/// An element in a [`View`] description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: Tag,
    attributes: Vec<(Attr, String)>,
    children: Vec<View>,
}

impl Element {
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn attr(&self, attr: Attr) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn attributes(&self) -> &[(Attr, String)] {
        &self.attributes
    }

    #[inline]
    pub fn children(&self) -> &[View] {
        &self.children
    }
}

pub struct TagBuilder {
    elem: Element,
}

impl TagBuilder {
    pub fn new(tag: Tag) -> Self {
        Self {
            elem: Element {
                tag,
                attributes: Vec::new(),
                children: Vec::new(),
            },
        }
    }

    // Attributes.

    /// Set an attribute.
    /// Setting the same attribute twice replaces the previous value.
    pub fn add_attr<V: Into<String>>(&mut self, attr: Attr, value: V) {
        let value = value.into();
        if let Some(slot) = self.elem.attributes.iter_mut().find(|(a, _)| *a == attr) {
            slot.1 = value;
        } else {
            self.elem.attributes.push((attr, value));
        }
    }

    pub fn attr<V: Into<String>>(mut self, attr: Attr, value: V) -> Self {
        self.add_attr(attr, value);
        self
    }

    pub fn attr_toggle(self, attr: Attr) -> Self {
        self.attr(attr, "")
    }

    pub fn attr_toggle_if(self, flag: bool, attr: Attr) -> Self {
        if flag {
            self.attr_toggle(attr)
        } else {
            self
        }
    }

    #[inline]
    pub fn class(self, class: &str) -> Self {
        self.attr(Attr::Class, class)
    }

    // Children.

    pub fn add_child<V: Into<View>>(&mut self, child: V) {
        match child.into() {
            View::Empty => {}
            // Fragments are flattened so that the element stores a plain
            // child list.
            View::Fragment(frag) => {
                for item in frag.items {
                    self.add_child(item);
                }
            }
            other => self.elem.children.push(other),
        }
    }

    pub fn child<V: Into<View>>(mut self, child: V) -> Self {
        self.add_child(child);
        self
    }

    #[inline]
    pub fn and<V: Into<View>>(self, child: V) -> Self {
        self.child(child)
    }

    pub fn children<I, V>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<View>,
    {
        for child in children {
            self.add_child(child);
        }
        self
    }

    pub fn build(self) -> Element {
        self.elem
    }

    pub fn into_view(self) -> View {
        View::Element(self.elem)
    }
}

impl From<TagBuilder> for View {
    fn from(b: TagBuilder) -> Self {
        b.into_view()
    }
}
