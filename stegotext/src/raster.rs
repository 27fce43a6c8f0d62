//! Text rasterization into parity masks.
//!
//! Masks are RGB images drawn white-on-black, so the red channel is 255 (odd)
//! under glyph ink and 0 (even) elsewhere. Text that runs past the canvas is
//! clipped by the drawing layer.

use crate::codec::WHITE;
use crate::error::{Result, StegoError};
use crate::face::{Canvas, Face};
use crate::wrap::wrap;
use embedded_graphics::pixelcolor::BinaryColor;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placement parameters for rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Wrap column, in characters.
    pub wrap_width: usize,
    /// Vertical distance between line tops, in pixels.
    pub line_pitch: u32,
    /// Left and top margin, in pixels.
    pub margin: u32,
    /// Horizontal gap after each word when rendering word by word.
    pub word_gap: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            wrap_width: 80,
            line_pitch: 15,
            margin: 10,
            word_gap: 4,
        }
    }
}

/// Bounding box with inclusive corners; may extend past the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// One rendered occurrence of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Position of the word in emission order, counting from 0.
    pub sequence_index: usize,
    pub bbox: BoundingBox,
}

/// Where each word of a passage was drawn.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    words: HashMap<String, Vec<Occurrence>>,
    len: usize,
}

impl WordIndex {
    /// Record the next word in emission order.
    pub fn push(&mut self, word: &str, bbox: BoundingBox) -> Occurrence {
        let occ = Occurrence {
            sequence_index: self.len,
            bbox,
        };
        self.words.entry(word.to_string()).or_default().push(occ);
        self.len += 1;
        occ
    }

    pub fn occurrences(&self, word: &str) -> Option<&[Occurrence]> {
        self.words.get(word).map(Vec::as_slice)
    }

    /// Number of words recorded, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resolve each word of `message` to the nearest occurrence after the
    /// previous pick. The first pick is the word's earliest occurrence.
    pub fn select(&self, message: &str) -> Result<Vec<Occurrence>> {
        let mut cursor: Option<usize> = None;
        let mut picked = Vec::new();
        for word in message.split_whitespace() {
            let occs = self
                .occurrences(word)
                .ok_or_else(|| StegoError::WordNotFound {
                    word: word.to_string(),
                })?;
            let mut best: Option<Occurrence> = None;
            for occ in occs {
                if cursor.is_some_and(|c| occ.sequence_index <= c) {
                    continue;
                }
                if best.is_none_or(|b| occ.sequence_index < b.sequence_index) {
                    best = Some(*occ);
                }
            }
            let Some(occ) = best else {
                return Err(StegoError::NoLaterOccurrence {
                    word: word.to_string(),
                    after: cursor.unwrap_or_default(),
                });
            };
            tracing::trace!(word=%word, index=%occ.sequence_index, "selected occurrence");
            cursor = Some(occ.sequence_index);
            picked.push(occ);
        }
        Ok(picked)
    }
}

/// Output of [`build_highlights`].
pub struct Highlights {
    /// Passage mask, destined for the red channel.
    pub text: RgbImage,
    /// Reveal template: white with black boxes over the selected words.
    pub template: RgbImage,
    pub index: WordIndex,
    pub selected: Vec<Occurrence>,
}

/// Pixel offsets past `i32::MAX` pin there and are clipped like any overflow.
fn saturating_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Render `text` line by line onto a black canvas of `size`.
pub fn rasterize(text: &str, size: (u32, u32), layout: &Layout, face: &Face) -> RgbImage {
    let mut canvas = RgbImage::new(size.0, size.1);
    let margin = saturating_i32(layout.margin);
    let mut y = margin;
    let lines = wrap(text, layout.wrap_width);
    for line in &lines {
        face.draw(&mut canvas, margin, y, line);
        y = y.saturating_add(saturating_i32(layout.line_pitch));
    }
    tracing::debug!(lines=%lines.len(), width=%size.0, height=%size.1, "rasterized passage");
    canvas
}

/// Render `text` word by word, recording each word's box, then draw a reveal
/// template boxing the words of `message`.
///
/// Fails without drawing any box if a word of `message` cannot be placed.
pub fn build_highlights(
    text: &str,
    message: &str,
    size: (u32, u32),
    layout: &Layout,
    face: &Face,
) -> Result<Highlights> {
    let mut text_img = RgbImage::new(size.0, size.1);
    let mut index = WordIndex::default();
    let margin = saturating_i32(layout.margin);
    let mut y = margin;
    for line in wrap(text, layout.wrap_width) {
        let mut x = margin;
        for word in line.split_whitespace() {
            face.draw(&mut text_img, x, y, word);
            let (w, h) = face.measure(word);
            let (w, h) = (saturating_i32(w), saturating_i32(h));
            index.push(
                word,
                BoundingBox {
                    left: x.saturating_sub(1),
                    top: y.saturating_sub(1),
                    right: x.saturating_add(w).saturating_add(1),
                    bottom: y.saturating_add(h).saturating_add(1),
                },
            );
            x = x.saturating_add(w).saturating_add(saturating_i32(layout.word_gap));
        }
        y = y.saturating_add(saturating_i32(layout.line_pitch));
    }

    let selected = index.select(message)?;
    let mut template = RgbImage::from_pixel(size.0, size.1, WHITE);
    let mut canvas = Canvas::new(&mut template);
    for occ in &selected {
        let b = occ.bbox;
        canvas.fill_rect(b.left, b.top, b.right, b.bottom, BinaryColor::Off);
    }
    tracing::debug!(words=%index.len(), highlighted=%selected.len(), "built reveal template");
    Ok(Highlights {
        text: text_img,
        template,
        index,
        selected,
    })
}
