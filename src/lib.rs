//! Composites z-ordered character-cell objects into a single text frame.
//!
//! A [`Renderer`] owns a registry of drawable objects (single glyphs, rectangles, lines and text).
//! Rendering paints them onto a fresh [`Frame`] in ascending index order, merging rectangle
//! borders where they cross, and publishes the result. The published frame remembers which object
//! last wrote each cell and that object's tags, so hosts can use it for hit-testing.
//!
//! ```
//! use textframe::geometry::{LogicalSize, Spacing};
//! use textframe::object::{Border, Drawable};
//! use textframe::Renderer;
//!
//! let mut renderer = Renderer::new(LogicalSize::new(6, 3), Spacing::none());
//! renderer.add_rect(0, 0, 5, 2, Border::default()).tag("wall");
//! let coin = renderer.add_char('o', 2, 1).tag("coin").id();
//!
//! let frame = renderer.render();
//! assert_eq!(frame.to_string(), "+----+\n| o  |\n+----+");
//! assert!(frame.has_tag(0, 0, "wall"));
//! assert_eq!(frame.object_at(2, 1), Some(coin));
//! ```

#![warn(clippy::todo)]
#![warn(clippy::unwrap_used)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Error};
use itertools::Itertools;
use log::*;
use structopt::StructOpt;

pub mod compositor;
pub mod config;
pub mod frame;
pub mod geometry;
mod logger;
pub mod object;
pub mod renderer;
pub mod scene;

use config::Config;
use scene::Scene;

pub use frame::{Cell, Frame};
pub use logger::Logger;
pub use object::{Drawable, Object, ObjectId};
pub use renderer::Renderer;

/// Command-line options.
#[derive(Debug, StructOpt)]
pub struct Options {
    /// A scene file describing the objects to composite.
    #[structopt(parse(from_os_str))]
    scene: PathBuf,

    /// Configuration file to use instead of the one in the user's config directory.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Write log records to a file instead of standard error.
    #[structopt(long, parse(from_os_str))]
    log_file: Option<PathBuf>,

    /// Print the tags and owner of the cell at `x,y` after the frame. May be repeated.
    #[structopt(long = "query", number_of_values = 1, parse(try_from_str = parse_coordinates))]
    queries: Vec<(i32, i32)>,
}

impl Options {
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

fn parse_coordinates(s: &str) -> Result<(i32, i32), Error> {
    let (x, y) = s
        .split(',')
        .map(str::trim)
        .collect_tuple()
        .ok_or_else(|| anyhow!("expected coordinates as `x,y`, got {:?}", s))?;

    Ok((x.parse()?, y.parse()?))
}

/// Renders the scene named by the options to standard output.
pub fn run(options: Options) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_scene(&options, &mut out)
}

fn render_scene(options: &Options, out: &mut impl Write) -> Result<(), Error> {
    let config_path = options.config.clone().or_else(Config::config_path);
    let config = match Config::read(config_path) {
        Ok(config) => config,
        Err(e) if options.config.is_none() => {
            warn!("unable to read config file: {:#}", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let scene = Scene::read(&options.scene)?;

    let mut renderer = Renderer::new(config.inner_size(), config.spacing);
    let ids = scene.build(&mut renderer);
    info!("registered {} objects", ids.len());

    let frame = renderer.render();
    writeln!(out, "{}", frame)?;

    for &(x, y) in &options.queries {
        match frame.object_at(x, y) {
            Some(owner) => writeln!(
                out,
                "({}, {}): {} [{}]",
                x,
                y,
                owner,
                frame.tags_at(x, y).join(" ")
            )?,
            None => writeln!(out, "({}, {}): empty", x, y)?,
        }
    }

    out.flush()?;

    Ok(())
}
