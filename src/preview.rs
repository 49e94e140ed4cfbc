// Preview module: image decoding, fit-to-area scaling and half-block rendering

use crate::error::{PicCullError, Result};
use chrono::{DateTime, Local};
use image::{DynamicImage, GenericImageView, Pixel};
use log::{debug, warn};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of decoded images kept in memory
pub const CACHE_SIZE: usize = 8;

/// File details shown next to the image
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Local>,
}

impl FileInfo {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified: DateTime<Local> = metadata.modified()?.into();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(FileInfo {
            name,
            size: metadata.len(),
            modified,
        })
    }
}

/// Loads and decodes an image from a file path
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| PicCullError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Scales `width`x`height` to the largest size that fits inside
/// `max_width`x`max_height` with the same aspect ratio.
///
/// Small images are scaled up. A non-empty input always yields at least one
/// pixel per side when the box itself is non-empty.
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / width as f64;
    let height_ratio = max_height as f64 / height as f64;
    let ratio = width_ratio.min(height_ratio);

    let new_width = ((width as f64 * ratio) as u32).clamp(1, max_width);
    let new_height = ((height as f64 * ratio) as u32).clamp(1, max_height);
    (new_width, new_height)
}

/// Converts an image to styled lines using half-block characters for terminal display.
/// The upper half block (▀) takes the upper pixel as foreground and the lower
/// pixel as background, so each cell shows two pixels.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // Even height so every terminal row has a lower pixel
    let height = height + height % 2;

    let img = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let img = img.to_rgb8();

    let term_height = height / 2;
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let spans: Vec<Span<'static>> = (0..width)
            .map(|x| {
                let upper = img.get_pixel(x, upper_y).to_rgb();
                let lower = img.get_pixel(x, lower_y).to_rgb();
                let style = Style::default()
                    .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                    .bg(Color::Rgb(lower[0], lower[1], lower[2]));
                Span::styled("▀", style)
            })
            .collect();

        lines.push(Line::from(spans));
    }

    lines
}

/// An image rendered for a specific terminal area
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// Original pixel dimensions
    pub width: u32,
    pub height: u32,
    /// Target area in cells (columns, rows)
    pub area: (u16, u16),
    pub lines: Vec<Line<'static>>,
}

impl RenderedImage {
    fn new(img: &DynamicImage, columns: u16, rows: u16) -> Self {
        let (width, height) = img.dimensions();
        let (fit_width, fit_height) =
            fit_dimensions(width, height, columns as u32, rows as u32 * 2);

        RenderedImage {
            width,
            height,
            area: (columns, rows),
            lines: image_to_halfblock_lines(img, fit_width, fit_height),
        }
    }
}

#[derive(Debug)]
struct CachedImage {
    /// Decode result. Failures are kept so a corrupt file is read only once.
    decoded: std::result::Result<DynamicImage, String>,
    rendered: Option<RenderedImage>,
}

impl CachedImage {
    fn decode(path: &Path) -> Self {
        debug!("decoding {}", path.display());
        let decoded = load_image(path).map_err(|e| {
            warn!("{}", e);
            match e {
                PicCullError::ImageDecode { message, .. } => message,
                other => other.to_string(),
            }
        });

        CachedImage {
            decoded,
            rendered: None,
        }
    }
}

/// LRU-like cache of decoded images and their last rendering
#[derive(Debug)]
pub struct PreviewCache {
    entries: HashMap<PathBuf, CachedImage>,
    /// Order of access for eviction (most recent at end)
    access_order: Vec<PathBuf>,
    max_size: usize,
}

impl PreviewCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            access_order: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Returns the image at `path` rendered to fit `columns`x`rows` cells.
    ///
    /// The file is decoded on first use. The rendering is recomputed only
    /// when the area changes.
    pub fn render(&mut self, path: &Path, columns: u16, rows: u16) -> Result<&RenderedImage> {
        let entry = self.entry(path);

        let img = match &entry.decoded {
            Ok(img) => img,
            Err(message) => {
                return Err(PicCullError::ImageDecode {
                    path: path.to_path_buf(),
                    message: message.clone(),
                })
            }
        };

        let rendered = match entry.rendered.take() {
            Some(r) if r.area == (columns, rows) => r,
            _ => RenderedImage::new(img, columns, rows),
        };

        Ok(entry.rendered.insert(rendered))
    }

    /// Decodes `path` if it is not cached yet and reports whether it is a
    /// readable image.
    pub fn check(&mut self, path: &Path) -> Result<()> {
        match &self.entry(path).decoded {
            Ok(_) => Ok(()),
            Err(message) => Err(PicCullError::ImageDecode {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
        }
    }

    fn entry(&mut self, path: &Path) -> &mut CachedImage {
        if !self.entries.contains_key(path) {
            while self.entries.len() >= self.max_size && !self.access_order.is_empty() {
                self.evict_oldest();
            }
        }
        self.touch(path);

        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| CachedImage::decode(path))
    }

    /// Drops the cached entry for `path`
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
        self.access_order.retain(|p| p != path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
    }

    fn touch(&mut self, path: &Path) {
        self.access_order.retain(|p| p != path);
        self.access_order.push(path.to_path_buf());
    }

    fn evict_oldest(&mut self) {
        if !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.entries.remove(&oldest);
        }
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(CACHE_SIZE)
    }
}
