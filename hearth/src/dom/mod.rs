mod node;
mod render;
mod tag;
mod view;

pub use self::{
    node::{Element, TagBuilder},
    tag::{Attr, Tag},
    view::{Fragment, View},
};

pub mod builder {
    use super::{Tag, TagBuilder};

    #[inline]
    pub fn div() -> TagBuilder {
        TagBuilder::new(Tag::Div)
    }

    #[inline]
    pub fn span() -> TagBuilder {
        TagBuilder::new(Tag::Span)
    }

    #[inline]
    pub fn main() -> TagBuilder {
        TagBuilder::new(Tag::Main)
    }

    #[inline]
    pub fn footer() -> TagBuilder {
        TagBuilder::new(Tag::Footer)
    }

    #[inline]
    pub fn style() -> TagBuilder {
        TagBuilder::new(Tag::Style)
    }
}
