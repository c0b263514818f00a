//! Thumbnail decoding and half-block rendering
//!
//! Key images arrive as base64 PNG/JPEG payloads. Each terminal cell shows
//! two vertically stacked pixels using `▀` with foreground = upper pixel and
//! background = lower pixel.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::FilterType;
use image::RgbImage;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("empty image payload")]
    Empty,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("undecodable image: {0}")]
    Image(#[from] image::ImageError),
}

/// Strip an optional `data:<mime>;base64,` prefix and surrounding whitespace
fn payload(key_image: &str) -> &str {
    let trimmed = key_image.trim();
    if trimmed.starts_with("data:") {
        trimmed
            .split_once(',')
            .map(|(_, data)| data)
            .unwrap_or_default()
    } else {
        trimmed
    }
}

pub fn decode_key_image(key_image: &str) -> Result<RgbImage, ThumbnailError> {
    let data = payload(key_image);
    if data.is_empty() {
        return Err(ThumbnailError::Empty);
    }
    let bytes = STANDARD.decode(data)?;
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}

/// An image pre-rendered into terminal cells
#[derive(Debug, Clone)]
pub struct CellArt {
    pub width: u16,
    pub height: u16,
    lines: Vec<Line<'static>>,
}

impl CellArt {
    /// Fit `img` into `columns` × `rows` cells, keeping its aspect ratio
    pub fn render(img: &RgbImage, columns: u16, rows: u16) -> Self {
        if columns == 0 || rows == 0 || img.width() == 0 || img.height() == 0 {
            return Self {
                width: 0,
                height: 0,
                lines: Vec::new(),
            };
        }

        let resized = image::DynamicImage::ImageRgb8(img.clone())
            .resize(
                u32::from(columns),
                u32::from(rows) * 2,
                FilterType::Triangle,
            )
            .to_rgb8();
        let (width, height) = resized.dimensions();
        let pixel = |x: u32, y: u32| {
            let p = resized.get_pixel(x, y);
            Color::Rgb(p[0], p[1], p[2])
        };

        let lines = (0..height.div_ceil(2))
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..width)
                    .map(|x| {
                        let top = pixel(x, row * 2);
                        let style = if row * 2 + 1 < height {
                            Style::default().fg(top).bg(pixel(x, row * 2 + 1))
                        } else {
                            Style::default().fg(top)
                        };
                        Span::styled("▀", style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect::<Vec<_>>();

        Self {
            width: width as u16,
            height: lines.len() as u16,
            lines,
        }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }
}

/// Rendered thumbnails keyed by item and cell size; `None` marks a payload
/// that failed to decode
#[derive(Default)]
pub struct ThumbnailCache {
    entries: HashMap<(Uuid, u16, u16), Option<CellArt>>,
}

impl ThumbnailCache {
    pub fn get_or_render(
        &mut self,
        item_id: Uuid,
        key_image: &str,
        columns: u16,
        rows: u16,
    ) -> Option<&CellArt> {
        self.entries
            .entry((item_id, columns, rows))
            .or_insert_with(|| match decode_key_image(key_image) {
                Ok(img) => Some(CellArt::render(&img, columns, rows)),
                Err(err) => {
                    tracing::debug!(%item_id, error = %err, "thumbnail not renderable");
                    None
                }
            })
            .as_ref()
    }

    /// Drop entries for items no longer on screen
    pub fn retain_items(&mut self, item_ids: &[Uuid]) {
        self.entries.retain(|(id, _, _), _| item_ids.contains(id));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
