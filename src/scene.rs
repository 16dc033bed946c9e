//! Scene descriptions: objects to register with a renderer, read from TOML.
//!
//! ```toml
//! inner-size = [12, 5]
//! spacing = [0, 0]
//!
//! [[object]]
//! kind = "rect"
//! x = 0
//! y = 0
//! width = 11
//! height = 4
//! tags = ["collision"]
//!
//! [[object]]
//! kind = "char"
//! glyph = "@"
//! x = 5
//! y = 2
//! index = 1
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use log::*;
use serde::{Deserialize, Deserializer};

use crate::config::{validate_inner_size, validate_spacing};
use crate::geometry::{LogicalSize, Spacing};
use crate::object::{Alignment, Border, Direction, Drawable, ObjectId};
use crate::renderer::Renderer;

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Scene {
    /// Overrides the configured logical grid size.
    #[serde(default, deserialize_with = "optional_inner_size")]
    pub inner_size: Option<[u32; 2]>,

    /// Overrides the configured spacing.
    #[serde(default, deserialize_with = "optional_spacing")]
    pub spacing: Option<Spacing>,

    #[serde(default, rename = "object")]
    pub objects: Vec<SceneObject>,
}

fn optional_inner_size<'de, D>(deserializer: D) -> Result<Option<[u32; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    validate_inner_size(deserializer).map(Some)
}

fn optional_spacing<'de, D>(deserializer: D) -> Result<Option<Spacing>, D::Error>
where
    D: Deserializer<'de>,
{
    validate_spacing(deserializer).map(Some)
}

/// A single object of a scene, with the settings shared by every kind of object.
#[derive(Debug, PartialEq, Deserialize)]
pub struct SceneObject {
    #[serde(flatten)]
    pub shape: Shape,

    #[serde(default)]
    pub index: Option<u32>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Shape {
    Char {
        glyph: char,
        x: i32,
        y: i32,
    },

    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        #[serde(default)]
        border: Border,
        /// Row-major nine-glyph kit. Takes precedence over `border`.
        #[serde(default)]
        kit: Option<String>,
        #[serde(default)]
        fill: Option<char>,
        #[serde(default)]
        intersect: Option<char>,
        #[serde(default, rename = "force-blank")]
        force_blank: bool,
    },

    Line {
        x: i32,
        y: i32,
        length: i32,
        #[serde(default)]
        direction: Direction,
        #[serde(default = "default_line_glyph")]
        glyph: char,
    },

    Text {
        text: String,
        x: i32,
        y: i32,
        #[serde(default)]
        align: Alignment,
    },
}

fn default_line_glyph() -> char {
    '-'
}

impl Scene {
    pub fn read(path: &Path) -> anyhow::Result<Scene> {
        info!("reading scene from {}", path.display());

        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read scene {}", path.display()))?;

        toml::from_str(&text).with_context(|| format!("invalid scene {}", path.display()))
    }

    /// Registers every object of the scene, in order, and returns their handles.
    pub fn build(&self, renderer: &mut Renderer) -> Vec<ObjectId> {
        if let Some([width, height]) = self.inner_size {
            renderer.set_inner_size(LogicalSize::new(width, height));
        }

        if let Some(spacing) = self.spacing {
            renderer.set_spacing(spacing);
        }

        self.objects
            .iter()
            .map(|object| object.build(renderer))
            .collect()
    }
}

impl SceneObject {
    fn build(&self, renderer: &mut Renderer) -> ObjectId {
        match &self.shape {
            Shape::Char { glyph, x, y } => self.finish(renderer.add_char(*glyph, *x, *y)),
            Shape::Rect {
                x,
                y,
                width,
                height,
                border,
                kit,
                fill,
                intersect,
                force_blank,
            } => {
                let rect = renderer.add_rect(*x, *y, *width, *height, *border);

                if let Some(kit) = kit {
                    rect.set_rect_as_str(kit);
                }

                if let Some(fill) = fill {
                    rect.set_fill(*fill);
                }

                if let Some(intersect) = intersect {
                    rect.set_intersect(*intersect);
                }

                rect.set_force_blank(*force_blank);

                self.finish(rect)
            }
            Shape::Line {
                x,
                y,
                length,
                direction,
                glyph,
            } => self.finish(renderer.add_line(*x, *y, *length, *direction, *glyph)),
            Shape::Text { text, x, y, align } => {
                let obj = renderer.add_text(text.as_str(), *x, *y);
                obj.set_alignment(*align);
                self.finish(obj)
            }
        }
    }

    /// Applies the shared settings and returns the object's handle.
    fn finish<T: Drawable>(&self, obj: &mut T) -> ObjectId {
        if let Some(index) = self.index {
            obj.set_index(index);
        }

        for tag in &self.tags {
            obj.tag(tag);
        }

        obj.id()
    }
}
