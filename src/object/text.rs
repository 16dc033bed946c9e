use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use strum::{EnumString, IntoStaticStr};

use super::{Common, DrawInstruction, Drawable, ObjectId};

/// Horizontal growth direction of text from its anchor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum Alignment {
    /// The first character sits on the anchor and the text grows rightwards.
    #[strum(serialize = "left")]
    Left,

    /// The last character sits on the anchor and the text grows leftwards.
    #[strum(serialize = "right")]
    Right,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Left
    }
}

/// Used for deserializing [`crate::scene::Scene`].
impl<'de> Deserialize<'de> for Alignment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

/// Text that may span several lines.
///
/// Text is painted above other objects by default: it starts out at index 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    common: Common,
    pub text: String,
    pub align: Alignment,
}

impl TextObject {
    pub(crate) fn new(id: ObjectId, text: impl Into<String>, x: i32, y: i32) -> Self {
        let mut common = Common::new(id, x, y);
        common.index = 1;

        TextObject {
            common,
            text: text.into(),
            align: Alignment::default(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    pub fn set_alignment(&mut self, align: Alignment) -> &mut Self {
        self.align = align;
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.text.push(c);
        self
    }
}

impl Drawable for TextObject {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn render(&self) -> DrawInstruction<'_> {
        DrawInstruction::Text {
            at: self.common.pos,
            text: &self.text,
            align: self.align,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::LogicalPoint;
    use crate::object::{test_id, DrawInstruction, Drawable};

    use super::{Alignment, TextObject};

    #[test]
    fn defaults() {
        let text = TextObject::new(test_id(1), "hello", 0, 0);
        assert_eq!(text.index(), 1);
        assert_eq!(text.align, Alignment::Left);
    }

    #[test]
    fn render() {
        let mut text = TextObject::new(test_id(1), "0", 98, 0);
        text.set_alignment(Alignment::Right).push_char('x');

        assert_eq!(
            text.render(),
            DrawInstruction::Text {
                at: LogicalPoint::new(98, 0),
                text: "0x",
                align: Alignment::Right,
            }
        );

        text.set_text("3x");
        assert_eq!(text.text, "3x");
    }
}
