//! Flattens drawable objects into a [`Frame`].

use std::cmp;
use std::convert::TryFrom;
use std::ops::RangeInclusive;
use std::sync::Arc;

use itertools::Itertools;
use log::*;
use unicode_width::UnicodeWidthChar;

use crate::frame::{Cell, Frame};
use crate::geometry::{Coordinates, LogicalSize, Spacing};
use crate::object::{Alignment, DrawInstruction, Drawable, ObjectId, BLANK};

/// Composites objects onto a fresh frame of `inner` logical cells.
///
/// Objects are painted in ascending index order. Objects that share an index are painted in the
/// order they are yielded, so later objects win ties. Writes that fall outside the frame are
/// dropped.
pub fn composite<'a, D, I>(objects: I, inner: LogicalSize, spacing: Spacing) -> Frame
where
    D: Drawable + 'a,
    I: IntoIterator<Item = &'a D>,
{
    let mut objects = objects.into_iter().collect::<Vec<_>>();
    objects.sort_by_key(|obj| obj.index());

    let mut frame = Frame::new(spacing.grid_size(inner));

    for obj in &objects {
        let mut painter = Painter {
            frame: &mut frame,
            tags: Arc::from(obj.tags().iter().join(" ")),
            owner: obj.id(),
        };

        painter.draw(obj.render(), spacing);
    }

    debug!(
        "composited {} objects into {}x{} cells",
        objects.len(),
        frame.width(),
        frame.height()
    );

    validate(&frame);

    frame
}

/// Logs a warning for every cell whose glyph is not exactly one column wide. Returns the number
/// of such cells.
pub fn validate(frame: &Frame) -> usize {
    let mut invalid = 0;

    for view in frame.iter_cells() {
        let glyph = view.cell.glyph;
        if glyph.width() != Some(1) {
            warn!(
                "glyph {:?} at [{}, {}] is not one column wide",
                glyph, view.coords.x, view.coords.y
            );
            invalid += 1;
        }
    }

    invalid
}

/// Writes the output of a single object.
struct Painter<'f> {
    frame: &'f mut Frame,
    tags: Arc<str>,
    owner: ObjectId,
}

impl Painter<'_> {
    fn draw(&mut self, instruction: DrawInstruction<'_>, spacing: Spacing) {
        match instruction {
            DrawInstruction::Char { at, glyph } => {
                self.set(spacing.to_cells(at), glyph);
            }
            DrawInstruction::Text { at, text, align } => {
                let origin = spacing.to_cells(at);

                for (row, line) in text.split('\n').enumerate() {
                    let y = i64::from(origin.y) + row as i64;

                    match align {
                        Alignment::Left => {
                            for (i, c) in line.chars().enumerate() {
                                self.set_wide(i64::from(origin.x) + i as i64, y, c);
                            }
                        }
                        Alignment::Right => {
                            for (i, c) in line.chars().rev().enumerate() {
                                self.set_wide(i64::from(origin.x) - i as i64, y, c);
                            }
                        }
                    }
                }
            }
            DrawInstruction::Rect {
                at,
                extent,
                kit,
                intersect,
                force_blank,
            } => {
                let origin = spacing.to_cells(at);
                let extent = spacing.extent_to_cells(extent);

                let (x0, x1) = span(extent.x);
                let (y0, y1) = span(extent.y);

                for y in clip(origin.y, y0, y1, self.frame.height()) {
                    let row = classify(y, y0, y1);

                    for x in clip(origin.x, x0, x1, self.frame.width()) {
                        let glyph = kit[row * 3 + classify(x, x0, x1)];
                        if glyph == BLANK && !force_blank {
                            continue;
                        }

                        // Clipping keeps the sums inside the frame, so they fit in an i32.
                        let coords = Coordinates::new(
                            (i64::from(origin.x) + x) as i32,
                            (i64::from(origin.y) + y) as i32,
                        );

                        let existing = match self.frame.get(coords.x, coords.y) {
                            Some(cell) => cell.glyph,
                            None => continue,
                        };

                        if existing == BLANK || glyph == BLANK || existing == glyph {
                            self.set(coords, glyph);
                        } else {
                            self.set(coords, intersect);
                        }
                    }
                }
            }
        }
    }

    fn set_wide(&mut self, x: i64, y: i64, glyph: char) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set(Coordinates::new(x, y), glyph);
        }
    }

    fn set(&mut self, coords: Coordinates, glyph: char) {
        if let Some(cell) = self.frame.get_mut(coords) {
            *cell = Cell {
                glyph,
                tags: Arc::clone(&self.tags),
                owner: Some(self.owner),
            };
        }
    }
}

/// Returns the inclusive span of offsets covered by a signed extent.
fn span(extent: i32) -> (i64, i64) {
    let extent = i64::from(extent);
    (cmp::min(0, extent), cmp::max(0, extent))
}

/// Restricts the offsets `lo..=hi` from `origin` to those that land inside `0..len`.
fn clip(origin: i32, lo: i64, hi: i64, len: usize) -> RangeInclusive<i64> {
    let origin = i64::from(origin);
    let len = i64::try_from(len).unwrap_or(i64::MAX);

    cmp::max(lo, -origin)..=cmp::min(hi, len - 1 - origin)
}

/// Classifies an offset as the start edge (0), the middle (1), or the end edge (2) of a span.
fn classify(offset: i64, lo: i64, hi: i64) -> usize {
    if offset == lo {
        0
    } else if offset == hi {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::frame::Frame;
    use crate::geometry::{LogicalSize, Spacing};
    use crate::object::{
        test_id, Alignment, Border, CharObject, Direction, Drawable, LineObject, Object,
        RectObject, TextObject,
    };

    use super::{clip, composite, validate};

    fn render(objects: &[Object], w: u32, h: u32) -> Frame {
        composite(objects, LogicalSize::new(w, h), Spacing::none())
    }

    fn char_at(serial: u32, c: char, x: i32, y: i32) -> Object {
        CharObject::new(test_id(serial), c, x, y).into()
    }

    fn rect(serial: u32, x: i32, y: i32, w: i32, h: i32) -> RectObject {
        RectObject::new(test_id(serial), x, y, w, h, Border::default())
    }

    #[test]
    fn empty() {
        let frame = render(&[], 3, 2);
        assert_eq!(frame.to_string(), "   \n   ");
        assert_eq!(frame.object_at(0, 0), None);
    }

    #[test]
    fn oversized_grid() {
        let objects = [char_at(1, 'x', 0, 0)];
        let frame = composite(
            &objects,
            LogicalSize::new(u32::MAX, u32::MAX),
            Spacing::new(1.0, 1.0),
        );

        assert_eq!((frame.width(), frame.height()), (0, 0));
        assert_eq!(frame.glyph_at(0, 0), None);
        assert_eq!(frame.object_at(0, 0), None);
    }

    #[test]
    fn rect_kit() {
        let frame = render(&[rect(1, 0, 0, 4, 2).into()], 5, 3);
        assert_eq!(
            frame.to_string(),
            indoc!(
                "
                +---+
                |   |
                +---+"
            )
            .trim_start()
        );
        assert_eq!(frame.object_at(2, 0), Some(test_id(1)));
        assert_eq!(frame.object_at(2, 1), None, "blank fill is not written");
    }

    #[test]
    fn zero_sized_rect() {
        let frame = render(&[rect(1, 1, 1, 0, 0).into()], 3, 3);
        assert_eq!(frame.glyph_at(1, 1), Some('+'));
        assert_eq!(frame.to_string().matches('+').count(), 1);
    }

    #[test]
    fn negative_extent_is_reversed() {
        let frame = render(&[rect(1, 4, 2, -4, -2).into()], 5, 3);
        assert_eq!(
            frame.to_string(),
            render(&[rect(2, 0, 0, 4, 2).into()], 5, 3).to_string()
        );
    }

    #[test]
    fn index_order_beats_registration_order() {
        let mut top = CharObject::new(test_id(1), 'T', 1, 1);
        top.set_index(2);
        let mut bottom = CharObject::new(test_id(2), 'B', 1, 1);
        bottom.set_index(1);

        let frame = render(&[top.into(), bottom.into()], 3, 3);
        assert_eq!(frame.glyph_at(1, 1), Some('T'));
        assert_eq!(frame.object_at(1, 1), Some(test_id(1)));
    }

    #[test]
    fn ties_go_to_later_objects() {
        let objects = [char_at(1, 'A', 1, 1), char_at(2, 'B', 1, 1)];

        let first = render(&objects, 3, 3);
        assert_eq!(first.glyph_at(1, 1), Some('B'));
        assert_eq!(first.object_at(1, 1), Some(test_id(2)));

        assert_eq!(first, render(&objects, 3, 3));
    }

    #[test]
    fn crossing_borders_use_intersect() {
        let mut a = rect(1, 0, 2, 6, 0);
        a.set_rect_as_str("=========").set_intersect('A');
        let mut b = rect(2, 3, 0, 0, 4);
        b.set_rect_as_str("#########").set_intersect('B');

        let frame = render(&[a.into(), b.into()], 7, 5);

        assert_eq!(frame.glyph_at(3, 2), Some('B'));
        assert_eq!(frame.object_at(3, 2), Some(test_id(2)));
        assert_eq!(frame.glyph_at(2, 2), Some('='));
        assert_eq!(frame.glyph_at(3, 1), Some('#'));
        assert_eq!(frame.glyph_at(3, 3), Some('#'));
    }

    #[test]
    fn shared_border_glyphs_merge() {
        let frame = render(&[rect(1, 0, 0, 2, 2).into(), rect(2, 2, 0, 2, 2).into()], 5, 3);
        assert_eq!(
            frame.to_string(),
            indoc!(
                "
                +-+-+
                | | |
                +-+-+"
            )
            .trim_start()
        );
    }

    #[test]
    fn blank_fill_keeps_content_underneath() {
        let mut cover = rect(2, 0, 0, 4, 2);
        cover.set_index(1);

        let frame = render(&[char_at(1, 'o', 2, 1), cover.into()], 5, 3);
        assert_eq!(frame.glyph_at(2, 1), Some('o'));
        assert_eq!(frame.object_at(2, 1), Some(test_id(1)));
    }

    #[test]
    fn forced_blank_erases() {
        let mut cover = rect(2, 0, 0, 4, 2);
        cover.set_index(1).tag("wall");
        cover.set_force_blank(true);

        let frame = render(&[char_at(1, 'o', 2, 1), cover.into()], 5, 3);
        assert_eq!(frame.glyph_at(2, 1), Some(' '));
        assert_eq!(frame.object_at(2, 1), Some(test_id(2)));
        assert!(frame.has_tag(2, 1, "wall"));
    }

    #[test]
    fn fill_over_border_uses_fill_as_intersect() {
        let mut fill = rect(2, 1, 0, 1, 0);
        fill.set_fill('#').set_index(1);

        let frame = render(&[rect(1, 0, 0, 3, 1).into(), fill.into()], 4, 2);
        assert_eq!(frame.to_string(), "+##+\n+--+");
    }

    #[test]
    fn text_alignment() {
        let left = TextObject::new(test_id(1), "AB", 5, 0);
        let frame = render(&[left.into()], 10, 1);
        assert_eq!(frame.glyph_at(5, 0), Some('A'));
        assert_eq!(frame.glyph_at(6, 0), Some('B'));

        let mut right = TextObject::new(test_id(1), "AB", 5, 0);
        right.set_alignment(Alignment::Right);
        let frame = render(&[right.into()], 10, 1);
        assert_eq!(frame.glyph_at(5, 0), Some('B'));
        assert_eq!(frame.glyph_at(4, 0), Some('A'));
        assert_eq!(frame.glyph_at(6, 0), Some(' '));
    }

    #[test]
    fn multiline_text() {
        let text = TextObject::new(test_id(1), "ab\n\ncd", 1, 0);
        let frame = render(&[text.into()], 4, 4);
        assert_eq!(frame.to_string(), " ab \n    \n cd \n    ");
    }

    #[test]
    fn text_rows_are_not_rescaled() {
        let text = TextObject::new(test_id(1), "a\nb", 1, 1);
        let frame = composite(&[Object::from(text)], LogicalSize::new(3, 3), Spacing::new(1.0, 1.0));

        assert_eq!(frame.glyph_at(2, 2), Some('a'));
        assert_eq!(frame.glyph_at(2, 3), Some('b'));
    }

    #[test]
    fn spacing_scales_anchors_and_extents() {
        let objects = [rect(1, 0, 0, 2, 1).into(), char_at(2, '@', 1, 1)];
        let frame = composite(&objects, LogicalSize::new(3, 2), Spacing::new(1.0, 0.0));

        assert_eq!(frame.width(), 6);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.to_string(), "+---+ \n+-@-+ ");
    }

    #[test]
    fn lines() {
        let right = LineObject::new(test_id(1), 0, 0, 3, Direction::Right, '=');
        let up = LineObject::new(test_id(2), 4, 3, 2, Direction::Up, '|');
        let left = LineObject::new(test_id(3), 4, 0, 1, Direction::Left, '~');

        let frame = render(&[right.into(), up.into(), left.into()], 5, 4);
        assert_eq!(frame.to_string(), "===~~\n    |\n    |\n    |");
        assert_eq!(frame.glyph_at(3, 0), Some('~'), "crossing lines use the later glyph");
    }

    #[test]
    fn blank_line_draws_nothing() {
        let line = LineObject::new(test_id(2), 0, 0, 2, Direction::Right, ' ');
        let frame = render(&[char_at(1, 'x', 1, 0), line.into()], 3, 1);
        assert_eq!(frame.to_string(), " x ");
    }

    #[test]
    fn off_grid_writes_are_dropped() {
        let mut big = rect(1, -3, -3, 100_000, 100_000);
        big.set_fill('.');
        let text = TextObject::new(test_id(2), "far away", i32::MAX, i32::MIN);
        let mut right = TextObject::new(test_id(3), "xyz", 0, 1);
        right.set_alignment(Alignment::Right);

        let objects = [
            big.into(),
            text.into(),
            right.into(),
            char_at(4, '@', -1, 0),
            char_at(5, '@', 2, 9),
        ];
        let frame = render(&objects, 3, 2);
        assert_eq!(frame.to_string(), "...\nz..");
    }

    #[test]
    fn wide_glyphs_are_reported() {
        let objects = [char_at(1, '世', 0, 0), char_at(2, '\t', 1, 0), char_at(3, 'a', 2, 0)];
        let frame = render(&objects, 3, 1);
        assert_eq!(validate(&frame), 2);
        assert_eq!(frame.glyph_at(0, 0), Some('世'));
    }

    #[test]
    fn clip_ranges() {
        assert_eq!(clip(0, 0, 10, 5), 0..=4);
        assert_eq!(clip(-3, 0, 10, 5), 3..=7);
        assert_eq!(clip(2, -4, 0, 5), -2..=0);
        assert!(clip(10, 0, 3, 5).is_empty());
        assert!(clip(0, 0, 3, 0).is_empty());
    }
}
