//! Composited frames and per-cell queries.

use std::fmt::{self, Debug, Display, Write};
use std::sync::Arc;

use log::*;

use crate::geometry::{Coordinates, GridSize};
use crate::object::{ObjectId, BLANK};

/// A single composited cell.
///
/// The glyph, tag string and owner always come from the same write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    /// Space-separated tags of the object that last wrote this cell.
    pub tags: Arc<str>,
    pub owner: Option<ObjectId>,
}

impl Cell {
    /// Iterates over the tags stored in this cell.
    pub fn iter_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.split_whitespace()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            glyph: BLANK,
            tags: Arc::from(""),
            owner: None,
        }
    }
}

/// A cell together with its coordinates, as yielded by [`Frame::iter_rows`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellView<'a> {
    pub coords: Coordinates,
    pub cell: &'a Cell,
}

/// The output of one composite pass.
///
/// Frames are never modified after they are published. Every query accepts any coordinates;
/// coordinates outside the frame behave like a cell that was never written.
#[derive(Clone, PartialEq)]
pub struct Frame {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Frame {
    /// Creates a blank frame. A size whose cell count overflows `usize` yields an empty frame.
    pub(crate) fn new(size: GridSize) -> Self {
        match size.width.checked_mul(size.height) {
            Some(len) => Frame {
                size,
                cells: vec![Cell::default(); len],
            },
            None => {
                warn!(
                    "frame of {}x{} cells is too large, publishing an empty frame",
                    size.width, size.height
                );
                Frame {
                    size: GridSize::zero(),
                    cells: vec![],
                }
            }
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Returns the index in the underlying storage that corresponds to the given coordinates, or
    /// `None` if they are out of bounds.
    fn idx(&self, coords: Coordinates) -> Option<usize> {
        if coords.x < 0 || coords.y < 0 {
            return None;
        }

        let (x, y) = (coords.x as usize, coords.y as usize);
        if x >= self.size.width || y >= self.size.height {
            return None;
        }

        Some(y * self.size.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.idx(Coordinates::new(x, y)).map(|i| &self.cells[i])
    }

    pub(crate) fn get_mut(&mut self, coords: Coordinates) -> Option<&mut Cell> {
        let i = self.idx(coords)?;
        Some(&mut self.cells[i])
    }

    pub fn glyph_at(&self, x: i32, y: i32) -> Option<char> {
        self.get(x, y).map(|cell| cell.glyph)
    }

    /// Returns the tags of the object that last wrote the cell.
    pub fn tags_at(&self, x: i32, y: i32) -> Vec<&str> {
        self.get(x, y)
            .map(|cell| cell.iter_tags().collect())
            .unwrap_or_default()
    }

    pub fn has_tag(&self, x: i32, y: i32, tag: &str) -> bool {
        self.get(x, y)
            .map_or(false, |cell| cell.iter_tags().any(|t| t == tag))
    }

    /// Returns the object that last wrote the cell.
    pub fn object_at(&self, x: i32, y: i32) -> Option<ObjectId> {
        self.get(x, y).and_then(|cell| cell.owner)
    }

    /// Row-major traversal of every cell.
    pub fn iter_rows(&self) -> impl Iterator<Item = impl Iterator<Item = CellView<'_>>> {
        let width = self.size.width;

        (0..self.size.height).map(move |row| {
            let row_start = row * width;
            self.cells[row_start..row_start + width]
                .iter()
                .enumerate()
                .map(move |(col, cell)| CellView {
                    coords: Coordinates::new(col as i32, row as i32),
                    cell,
                })
        })
    }

    pub(crate) fn iter_cells(&self) -> impl Iterator<Item = CellView<'_>> {
        self.iter_rows().flatten()
    }
}

/// Writes the glyphs, one line per row.
impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut rows = self.iter_rows().peekable();
        while let Some(row) = rows.next() {
            for view in row {
                f.write_char(view.cell.glyph)?;
            }

            if rows.peek().is_some() {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

impl Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Frame {}x{}", self.size.width, self.size.height)?;
        for row in self.iter_rows() {
            f.write_char('|')?;
            for view in row {
                f.write_char(view.cell.glyph)?;
            }
            f.write_str("|\n")?;
        }
        Ok(())
    }
}
