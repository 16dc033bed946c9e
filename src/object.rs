//! Drawable objects and the draw instructions they emit.

use std::fmt;

use euclid::vec2;
use log::*;

use crate::geometry::{LogicalExtent, LogicalPoint};

mod glyph;
mod line;
mod rect;
mod text;

pub use glyph::CharObject;
pub use line::{Direction, LineObject};
pub use rect::{Border, RectObject};
pub use text::{Alignment, TextObject};

/// The glyph treated as empty space by the compositor.
pub const BLANK: char = ' ';

/// Stable identity of an object registered with a [`crate::Renderer`].
///
/// Handles are never reused within a session, so a handle to a destroyed object stays dead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub(crate) session: u32,
    pub(crate) serial: u32,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}.{}", self.session, self.serial)
    }
}

/// State shared by every kind of drawable object.
#[derive(Debug, Clone, PartialEq)]
pub struct Common {
    pub(crate) id: ObjectId,
    pub pos: LogicalPoint,
    /// Paint order. Higher indices are drawn later, and therefore on top.
    pub index: u32,
    tags: Vec<String>,
}

impl Common {
    pub(crate) fn new(id: ObjectId, x: i32, y: i32) -> Self {
        Common {
            id,
            pos: LogicalPoint::new(x, y),
            index: 0,
            tags: vec![],
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn push_tag(&mut self, tag: &str) {
        if tag.contains(char::is_whitespace) {
            warn!(
                "tag {:?} contains whitespace, cell queries will see it as separate tags",
                tag
            );
        }

        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_owned());
        }
    }
}

/// Normalized output of a drawable object, consumed by the compositor.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction<'a> {
    /// A single glyph at `at`.
    Char { at: LogicalPoint, glyph: char },

    /// A box whose footprint spans from `at` to `at + extent`, inclusive.
    Rect {
        at: LogicalPoint,
        extent: LogicalExtent,
        /// Row-major 3x3 glyph kit: corners, edges and fill.
        kit: [char; 9],
        intersect: char,
        force_blank: bool,
    },

    /// One or more lines of text, stacked downwards from `at`.
    Text {
        at: LogicalPoint,
        text: &'a str,
        align: Alignment,
    },
}

/// Objects that can be composited into a frame.
///
/// The mutators return the object itself so that configuration can be chained.
pub trait Drawable {
    fn common(&self) -> &Common;

    fn common_mut(&mut self) -> &mut Common;

    fn render(&self) -> DrawInstruction<'_>;

    fn id(&self) -> ObjectId {
        self.common().id
    }

    fn pos(&self) -> LogicalPoint {
        self.common().pos
    }

    fn index(&self) -> u32 {
        self.common().index
    }

    fn tags(&self) -> &[String] {
        self.common().tags()
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    /// Moves the object by a relative offset.
    fn move_by(&mut self, dx: i32, dy: i32) -> &mut Self
    where
        Self: Sized,
    {
        self.common_mut().pos += vec2(dx, dy);
        self
    }

    fn set_pos(&mut self, x: i32, y: i32) -> &mut Self
    where
        Self: Sized,
    {
        self.common_mut().pos = LogicalPoint::new(x, y);
        self
    }

    fn set_index(&mut self, index: u32) -> &mut Self
    where
        Self: Sized,
    {
        self.common_mut().index = index;
        self
    }

    /// Adds a tag. Adding a tag the object already carries has no effect.
    fn tag(&mut self, tag: &str) -> &mut Self
    where
        Self: Sized,
    {
        self.common_mut().push_tag(tag);
        self
    }
}

/// Any registered drawable object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Char(CharObject),
    Rect(RectObject),
    Line(LineObject),
    Text(TextObject),
}

impl Object {
    pub fn as_char_mut(&mut self) -> Option<&mut CharObject> {
        match self {
            Object::Char(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_rect_mut(&mut self) -> Option<&mut RectObject> {
        match self {
            Object::Rect(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut LineObject> {
        match self {
            Object::Line(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match self {
            Object::Text(obj) => Some(obj),
            _ => None,
        }
    }
}

impl Drawable for Object {
    fn common(&self) -> &Common {
        match self {
            Object::Char(obj) => obj.common(),
            Object::Rect(obj) => obj.common(),
            Object::Line(obj) => obj.common(),
            Object::Text(obj) => obj.common(),
        }
    }

    fn common_mut(&mut self) -> &mut Common {
        match self {
            Object::Char(obj) => obj.common_mut(),
            Object::Rect(obj) => obj.common_mut(),
            Object::Line(obj) => obj.common_mut(),
            Object::Text(obj) => obj.common_mut(),
        }
    }

    fn render(&self) -> DrawInstruction<'_> {
        match self {
            Object::Char(obj) => obj.render(),
            Object::Rect(obj) => obj.render(),
            Object::Line(obj) => obj.render(),
            Object::Text(obj) => obj.render(),
        }
    }
}

macro_rules! impl_object_from {
    ( $( $variant:ident => $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Object {
                fn from(obj: $ty) -> Self {
                    Object::$variant(obj)
                }
            }
        )*
    }
}

impl_object_from! {
    Char => CharObject,
    Rect => RectObject,
    Line => LineObject,
    Text => TextObject,
}

#[cfg(test)]
pub(crate) fn test_id(serial: u32) -> ObjectId {
    ObjectId { session: 0, serial }
}

#[cfg(test)]
mod tests {
    use crate::geometry::LogicalPoint;

    use super::{test_id, CharObject, Drawable, Object};

    #[test]
    fn fluent_common_mutators() {
        let mut obj = CharObject::new(test_id(1), '@', 2, 3);
        obj.move_by(1, -1).set_index(4).tag("player").tag("collision");

        assert_eq!(obj.pos(), LogicalPoint::new(3, 2));
        assert_eq!(obj.index(), 4);
        assert_eq!(obj.tags(), ["player", "collision"]);

        obj.set_pos(-5, 10);
        assert_eq!(obj.pos(), LogicalPoint::new(-5, 10));
    }

    #[test]
    fn duplicate_tags_are_dropped() {
        let mut obj = CharObject::new(test_id(1), 'o', 0, 0);
        obj.tag("coin").tag("coin");
        assert_eq!(obj.tags(), ["coin"]);
        assert!(obj.has_tag("coin"));
        assert!(!obj.has_tag("wall"));
    }

    #[test]
    fn object_dispatch() {
        let mut obj = Object::from(CharObject::new(test_id(7), 'x', 0, 0));
        obj.tag("a");

        assert_eq!(obj.id(), test_id(7));
        assert!(obj.as_char_mut().is_some());
        assert!(obj.as_rect_mut().is_none());
        assert!(obj.as_text_mut().is_none());
        assert!(obj.as_line_mut().is_none());
        assert_eq!(obj.tags(), ["a"]);
    }
}
