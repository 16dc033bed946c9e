use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use strum::{EnumString, IntoStaticStr};

use crate::geometry::LogicalExtent;

use super::{Common, DrawInstruction, Drawable, ObjectId};

/// Axis-aligned direction of a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum Direction {
    #[strum(serialize = "up")]
    Up,

    #[strum(serialize = "right")]
    Right,

    #[strum(serialize = "down")]
    Down,

    #[strum(serialize = "left")]
    Left,
}

impl Direction {
    /// Returns the unit vector pointing in this direction. Y grows downwards.
    pub fn unit(self) -> LogicalExtent {
        match self {
            Direction::Up => LogicalExtent::new(0, -1),
            Direction::Right => LogicalExtent::new(1, 0),
            Direction::Down => LogicalExtent::new(0, 1),
            Direction::Left => LogicalExtent::new(-1, 0),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Right
    }
}

/// Used for deserializing [`crate::scene::Scene`].
impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

/// A straight run of a single glyph, starting at the object's position.
///
/// The line covers `length + 1` cells, since it is drawn as a rectangle with an inclusive
/// footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct LineObject {
    common: Common,
    pub length: i32,
    pub direction: Direction,
    pub glyph: char,
}

impl LineObject {
    pub(crate) fn new(
        id: ObjectId,
        x: i32,
        y: i32,
        length: i32,
        direction: Direction,
        glyph: char,
    ) -> Self {
        LineObject {
            common: Common::new(id, x, y),
            length,
            direction,
            glyph,
        }
    }

    pub fn set_char(&mut self, glyph: char) -> &mut Self {
        self.glyph = glyph;
        self
    }

    pub fn set_length(&mut self, length: i32) -> &mut Self {
        self.length = length;
        self
    }

    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }
}

impl Drawable for LineObject {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn render(&self) -> DrawInstruction<'_> {
        DrawInstruction::Rect {
            at: self.common.pos,
            extent: self.direction.unit() * self.length,
            kit: [self.glyph; 9],
            intersect: self.glyph,
            force_blank: false,
        }
    }
}
