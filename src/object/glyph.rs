use super::{Common, DrawInstruction, Drawable, ObjectId};

/// A single glyph occupying one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CharObject {
    common: Common,
    pub glyph: char,
}

impl CharObject {
    pub(crate) fn new(id: ObjectId, glyph: char, x: i32, y: i32) -> Self {
        CharObject {
            common: Common::new(id, x, y),
            glyph,
        }
    }

    pub fn set_char(&mut self, glyph: char) -> &mut Self {
        self.glyph = glyph;
        self
    }
}

impl Drawable for CharObject {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn render(&self) -> DrawInstruction<'_> {
        DrawInstruction::Char {
            at: self.common.pos,
            glyph: self.glyph,
        }
    }
}
