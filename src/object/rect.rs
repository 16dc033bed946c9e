use log::*;
use serde::Deserialize;

use crate::geometry::{LogicalExtent, LogicalPoint};

use super::{Common, DrawInstruction, Drawable, ObjectId, BLANK};

/// Border glyphs for a rectangle.
///
/// Each corner falls back to `corner` unless it is overridden.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Border {
    pub vertical: char,
    pub horizontal: char,
    pub corner: char,
    pub top_left: Option<char>,
    pub top_right: Option<char>,
    pub bottom_left: Option<char>,
    pub bottom_right: Option<char>,
}

impl Border {
    /// Returns the row-major 3x3 glyph kit for this border, with a blank fill.
    pub fn kit(&self) -> [char; 9] {
        let Border {
            vertical: v,
            horizontal: h,
            corner,
            ..
        } = *self;

        [
            self.top_left.unwrap_or(corner),
            h,
            self.top_right.unwrap_or(corner),
            v,
            BLANK,
            v,
            self.bottom_left.unwrap_or(corner),
            h,
            self.bottom_right.unwrap_or(corner),
        ]
    }
}

impl Default for Border {
    fn default() -> Self {
        Border {
            vertical: '|',
            horizontal: '-',
            corner: '+',
            top_left: None,
            top_right: None,
            bottom_left: None,
            bottom_right: None,
        }
    }
}

/// A rectangle drawn from a 3x3 glyph kit.
///
/// The footprint is inclusive: a rectangle of width 2 covers three columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RectObject {
    common: Common,
    pub width: i32,
    pub height: i32,
    kit: [char; 9],
    /// Drawn in place of a border glyph that collides with a different non-blank glyph.
    pub intersect: char,
    /// Whether blank glyphs in the kit erase what is underneath.
    pub force_blank: bool,
}

impl RectObject {
    pub(crate) fn new(id: ObjectId, x: i32, y: i32, width: i32, height: i32, border: Border) -> Self {
        RectObject {
            common: Common::new(id, x, y),
            width,
            height,
            kit: border.kit(),
            intersect: border.corner,
            force_blank: false,
        }
    }

    pub fn kit(&self) -> &[char; 9] {
        &self.kit
    }

    /// Sets the glyph kit from a row-major string of nine glyphs, e.g. `"+-+| |+-+"`.
    ///
    /// Missing glyphs are treated as blank and extra glyphs are ignored.
    pub fn set_rect_as_str(&mut self, kit: &str) -> &mut Self {
        let count = kit.chars().count();
        if count != self.kit.len() {
            warn!("rectangle kit {:?} has {} glyphs instead of 9", kit, count);
        }

        let mut glyphs = kit.chars();
        for slot in self.kit.iter_mut() {
            *slot = glyphs.next().unwrap_or(BLANK);
        }
        self
    }

    /// Sets the glyph kit from border glyphs. The intersect glyph is left unchanged.
    pub fn set_border(&mut self, border: Border) -> &mut Self {
        self.kit = border.kit();
        self
    }

    /// Fills every slot of the kit, and the intersect glyph, with a single glyph.
    pub fn set_fill(&mut self, glyph: char) -> &mut Self {
        self.kit = [glyph; 9];
        self.intersect = glyph;
        self
    }

    pub fn set_force_blank(&mut self, force_blank: bool) -> &mut Self {
        self.force_blank = force_blank;
        self
    }

    pub fn set_intersect(&mut self, intersect: char) -> &mut Self {
        self.intersect = intersect;
        self
    }

    pub fn set_box(&mut self, x: i32, y: i32, width: i32, height: i32) -> &mut Self {
        self.common.pos = LogicalPoint::new(x, y);
        self.width = width;
        self.height = height;
        self
    }
}

impl Drawable for RectObject {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn render(&self) -> DrawInstruction<'_> {
        DrawInstruction::Rect {
            at: self.common.pos,
            extent: LogicalExtent::new(self.width, self.height),
            kit: self.kit,
            intersect: self.intersect,
            force_blank: self.force_blank,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{LogicalExtent, LogicalPoint};
    use crate::object::{test_id, DrawInstruction, Drawable};

    use super::{Border, RectObject};

    fn rect() -> RectObject {
        RectObject::new(test_id(1), 1, 2, 3, 4, Border::default())
    }

    #[test]
    fn default_kit() {
        let rect = rect();
        assert_eq!(rect.kit().iter().collect::<String>(), "+-+| |+-+");
        assert_eq!(rect.intersect, '+');
        assert!(!rect.force_blank);
    }

    #[test]
    fn border_corner_overrides() {
        let mut rect = rect();
        rect.set_border(Border {
            vertical: '│',
            horizontal: '─',
            corner: '┼',
            top_left: Some('┌'),
            top_right: Some('┐'),
            bottom_left: None,
            bottom_right: Some('┘'),
        });

        assert_eq!(rect.kit().iter().collect::<String>(), "┌─┐│ │┼─┘");
        assert_eq!(rect.intersect, '+');
    }

    #[test]
    fn rect_as_str_pads_and_truncates() {
        let mut rect = rect();

        rect.set_rect_as_str("abc");
        assert_eq!(rect.kit().iter().collect::<String>(), "abc      ");

        rect.set_rect_as_str("0123456789");
        assert_eq!(rect.kit().iter().collect::<String>(), "012345678");
    }

    #[test]
    fn fill_sets_intersect() {
        let mut rect = rect();
        rect.set_fill('#').set_force_blank(true);

        assert_eq!(rect.kit(), &['#'; 9]);
        assert_eq!(rect.intersect, '#');
        assert!(rect.force_blank);
    }

    #[test]
    fn render() {
        let mut rect = rect();
        rect.set_box(0, 0, 10, -2).set_intersect('*');

        assert_eq!(
            rect.render(),
            DrawInstruction::Rect {
                at: LogicalPoint::new(0, 0),
                extent: LogicalExtent::new(10, -2),
                kit: ['+', '-', '+', '|', ' ', '|', '+', '-', '+'],
                intersect: '*',
                force_blank: false,
            }
        );
    }
}
