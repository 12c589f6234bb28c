//! Tag descriptors
//!
//! Static description of an element kind: tag name, class-level default
//! classes and the parent kind those defaults are inherited from.
//!
//! ```
//! use tether_dom::{Element, TagDescriptor, tags};
//!
//! static CARD: TagDescriptor = TagDescriptor::derive("Card", &tags::DIV).classes("card");
//! static ALERT: TagDescriptor = TagDescriptor::derive("Alert", &CARD).classes("alert");
//!
//! let el = Element::new(&ALERT);
//! assert_eq!(el.class_list().value(), "card alert");
//! ```

use crate::ClassList;

/// Tags rendered without an end tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "embed", "frame", "hr", "img",
    "input", "isindex", "link", "meta", "param", "source", "track", "wbr",
];

/// Element kind descriptor
#[derive(Debug)]
pub struct TagDescriptor {
    /// Kind name, used in logs
    pub name: &'static str,
    /// HTML tag
    pub tag: &'static str,
    /// Class-level classes, whitespace separated
    pub class_: &'static str,
    /// Whether `parent`'s class-level classes are included
    pub inherit_class: bool,
    /// Default `type` attribute
    pub type_: Option<&'static str>,
    /// Whether text children are escaped on serialization
    pub escape_text: bool,
    /// Parent kind
    pub parent: Option<&'static TagDescriptor>,
}

impl TagDescriptor {
    /// Root kind for `tag`
    pub const fn new(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            tag,
            class_: "",
            inherit_class: true,
            type_: None,
            escape_text: true,
            parent: None,
        }
    }

    /// Sub-kind of `parent`; tag, type and escaping are inherited.
    pub const fn derive(name: &'static str, parent: &'static TagDescriptor) -> Self {
        Self {
            name,
            tag: parent.tag,
            class_: "",
            inherit_class: true,
            type_: parent.type_,
            escape_text: parent.escape_text,
            parent: Some(parent),
        }
    }

    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub const fn classes(mut self, class_: &'static str) -> Self {
        self.class_ = class_;
        self
    }

    /// Stop inheriting class-level classes at this kind
    pub const fn no_inherit_class(mut self) -> Self {
        self.inherit_class = false;
        self
    }

    pub const fn input_type(mut self, type_: &'static str) -> Self {
        self.type_ = Some(type_);
        self
    }

    /// Keep text children unescaped (script, style)
    pub const fn raw_text(mut self) -> Self {
        self.escape_text = false;
        self
    }

    /// Class-level classes including inherited ones, parents first
    pub fn class_list(&self) -> ClassList {
        let mut list = match self.parent {
            Some(parent) if self.inherit_class => parent.class_list(),
            _ => ClassList::new(),
        };
        list.append(self.class_);
        list
    }

    /// Check whether this kind is `other` or derives from it
    pub fn is_a(&self, other: &TagDescriptor) -> bool {
        let mut current = Some(self);
        while let Some(desc) = current {
            if std::ptr::eq(desc, other) {
                return true;
            }
            current = desc.parent;
        }
        false
    }

    /// Check if the tag has no end tag
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag)
    }
}
