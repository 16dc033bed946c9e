//! Rendering sessions: the object registry and the published frame.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::*;
use thiserror::Error;

use crate::compositor;
use crate::frame::Frame;
use crate::geometry::{LogicalSize, Spacing};
use crate::object::{
    Border, CharObject, Direction, Drawable, LineObject, Object, ObjectId, RectObject, TextObject,
};

/// Source of session identifiers, so that handles from one renderer are never mistaken for
/// handles of another.
static NEXT_SESSION: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("cannot destroy object {0}: handle belongs to a different renderer")]
    ForeignHandle(ObjectId),
}

/// Appends an object to a renderer's registry and evaluates to the variant just inserted.
macro_rules! register {
    ($renderer:ident, $variant:ident, $obj:expr) => {{
        let obj = $obj;
        $renderer.dirty = true;
        $renderer.objects.push(Object::$variant(obj));

        match $renderer.objects.last_mut() {
            Some(Object::$variant(obj)) => obj,
            _ => unreachable!(concat!("registered ", stringify!($variant), " is missing")),
        }
    }};
}

/// Owns a set of drawable objects and composites them into frames.
pub struct Renderer {
    session: u32,
    next_serial: u32,

    inner_size: LogicalSize,
    spacing: Spacing,

    /// Registered objects, in registration order.
    objects: Vec<Object>,

    /// The most recently published frame.
    frame: Option<Arc<Frame>>,

    /// Whether anything changed since the last published frame.
    dirty: bool,
}

impl Renderer {
    pub fn new(inner_size: LogicalSize, spacing: Spacing) -> Self {
        Renderer {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            next_serial: 0,
            inner_size,
            spacing,
            objects: vec![],
            frame: None,
            dirty: true,
        }
    }

    pub fn inner_size(&self) -> LogicalSize {
        self.inner_size
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Changes the logical grid size used by subsequent frames.
    pub fn set_inner_size(&mut self, inner_size: LogicalSize) {
        self.inner_size = inner_size;
        self.dirty = true;
    }

    /// Changes the spacing used by subsequent frames.
    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.spacing = spacing;
        self.dirty = true;
    }

    fn next_id(&mut self) -> ObjectId {
        self.next_serial += 1;
        ObjectId {
            session: self.session,
            serial: self.next_serial,
        }
    }

    pub fn add_char(&mut self, glyph: char, x: i32, y: i32) -> &mut CharObject {
        register!(self, Char, CharObject::new(self.next_id(), glyph, x, y))
    }

    /// Adds a rectangle whose top-left corner is at `(x, y)`.
    pub fn add_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        border: Border,
    ) -> &mut RectObject {
        register!(
            self,
            Rect,
            RectObject::new(self.next_id(), x, y, width, height, border)
        )
    }

    pub fn add_text(&mut self, text: impl Into<String>, x: i32, y: i32) -> &mut TextObject {
        register!(self, Text, TextObject::new(self.next_id(), text, x, y))
    }

    pub fn add_line(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        direction: Direction,
        glyph: char,
    ) -> &mut LineObject {
        register!(
            self,
            Line,
            LineObject::new(self.next_id(), x, y, length, direction, glyph)
        )
    }

    /// Returns the registered object with the given handle.
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|obj| obj.id() == id)
    }

    /// Returns the registered object with the given handle for mutation. The next call to
    /// [`Renderer::render_if_dirty`] will composite a new frame.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        let obj = self.objects.iter_mut().find(|obj| obj.id() == id)?;
        self.dirty = true;
        Some(obj)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    /// Removes an object from the registry.
    ///
    /// Destroying an object that is no longer registered only logs a warning. Handles minted by
    /// another renderer are rejected.
    pub fn destroy(&mut self, id: ObjectId) -> Result<(), Error> {
        if id.session != self.session {
            return Err(Error::ForeignHandle(id));
        }

        match self.objects.iter().position(|obj| obj.id() == id) {
            Some(pos) => {
                let obj = self.objects.remove(pos);
                debug!("destroyed object {} with tags {:?}", id, obj.tags());
                self.dirty = true;
            }
            None => warn!("cannot destroy object {}: object is not registered", id),
        }

        Ok(())
    }

    /// Composites every registered object and publishes the result as the current frame.
    pub fn render(&mut self) -> Arc<Frame> {
        let frame = Arc::new(compositor::composite(
            &self.objects,
            self.inner_size,
            self.spacing,
        ));

        self.frame = Some(Arc::clone(&frame));
        self.dirty = false;

        frame
    }

    /// Composites a new frame only if something changed since the last one.
    pub fn render_if_dirty(&mut self) -> Option<Arc<Frame>> {
        if self.dirty {
            Some(self.render())
        } else {
            None
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_data(&self) -> bool {
        self.frame.is_some()
    }

    /// Returns the most recently published frame, if any.
    ///
    /// The returned frame stays valid after later renders replace it.
    pub fn frame(&self) -> Option<Arc<Frame>> {
        self.frame.clone()
    }

    /// Returns the tags of the object that last wrote the cell in the current frame.
    pub fn tags_at(&self, x: i32, y: i32) -> Vec<&str> {
        match &self.frame {
            Some(frame) => frame.tags_at(x, y),
            None => vec![],
        }
    }

    pub fn has_tag(&self, x: i32, y: i32, tag: &str) -> bool {
        self.frame
            .as_ref()
            .map_or(false, |frame| frame.has_tag(x, y, tag))
    }

    /// Returns the object that last wrote the cell in the current frame.
    ///
    /// The object may have been destroyed since the frame was rendered.
    pub fn object_at(&self, x: i32, y: i32) -> Option<ObjectId> {
        self.frame.as_ref().and_then(|frame| frame.object_at(x, y))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(LogicalSize::new(20, 20), Spacing::default())
    }
}
