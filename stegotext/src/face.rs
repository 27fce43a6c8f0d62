use crate::codec::{WHITE, BLACK};
use crate::error::StegoError;
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text, renderer::TextRenderer},
};
use image::RgbImage;
use rusttype::{Font, Point as RtPoint, PositionedGlyph, Scale};
use std::convert::Infallible;
use std::path::Path;

/// Glyph coverage at or above this counts as ink for TrueType faces.
const COVERAGE_THRESHOLD: f32 = 0.5;

/// `DrawTarget` over an RGB image: `On` paints white, `Off` paints black.
/// Pixels outside the image are dropped.
pub(crate) struct Canvas<'a> {
    img: &'a mut RgbImage,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(img: &'a mut RgbImage) -> Self {
        Self { img }
    }

    fn put(&mut self, x: i32, y: i32, color: BinaryColor) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.img.width() && y < self.img.height() {
            let c = if color.is_on() { WHITE } else { BLACK };
            self.img.put_pixel(x, y, c);
        }
    }

    /// Fill the rectangle spanning the inclusive corners with `color`.
    /// Only the part overlapping the image is visited.
    pub(crate) fn fill_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32, color: BinaryColor) {
        let max_x = i32::try_from(self.img.width()).unwrap_or(i32::MAX) - 1;
        let max_y = i32::try_from(self.img.height()).unwrap_or(i32::MAX) - 1;
        let (left, top) = (left.max(0), top.max(0));
        let (right, bottom) = (right.min(max_x), bottom.min(max_y));
        if left > right || top > bottom {
            return;
        }
        let Ok(()) = Rectangle::with_corners(Point::new(left, top), Point::new(right, bottom))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self);
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.img.width(), self.img.height())
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put(point.x, point.y, color);
        }
        Ok(())
    }
}

/// Font used to rasterize text onto a mask.
pub enum Face {
    /// Fixed-size bitmap font, the default.
    Bitmap(&'static MonoFont<'static>),
    /// Outline font loaded from disk, thresholded to binary ink.
    TrueType { font: Font<'static>, scale: Scale },
}

impl Default for Face {
    fn default() -> Self {
        Face::Bitmap(&FONT_6X10)
    }
}

impl Face {
    pub fn load_truetype(path: &Path, size: f32) -> crate::error::Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| StegoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| StegoError::Font(format!("{} is not a TrueType font", path.display())))?;
        tracing::debug!(path=%path.display(), size=%size, "loaded truetype face");
        Ok(Face::TrueType {
            font,
            scale: Scale::uniform(size),
        })
    }

    /// Rendered width and height of `text` in pixels.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            Face::Bitmap(font) => {
                let style = MonoTextStyle::new(*font, BinaryColor::On);
                let size = style
                    .measure_string(text, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size;
                (size.width, font.character_size.height)
            }
            Face::TrueType { font, scale } => {
                let v = font.v_metrics(*scale);
                let glyphs: Vec<PositionedGlyph> =
                    font.layout(text, *scale, RtPoint { x: 0.0, y: 0.0 }).collect();
                let width = glyphs
                    .iter()
                    .rev()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .next()
                    .unwrap_or(0.0)
                    .ceil() as u32;
                // same rounding as the baseline in `draw`
                (width, (v.ascent.ceil() - v.descent.floor()) as u32)
            }
        }
    }

    /// Draw `text` in white with its top-left corner at (x, y).
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str) {
        let (cw, ch) = canvas.dimensions();
        let mut target = Canvas::new(canvas);
        match self {
            Face::Bitmap(font) => {
                // bitmap glyphs never ink left of or above their origin
                if i64::from(x) >= i64::from(cw) || i64::from(y) >= i64::from(ch) {
                    return;
                }
                let style = MonoTextStyle::new(*font, BinaryColor::On);
                let Ok(_) =
                    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut target);
            }
            Face::TrueType { font, scale } => {
                let y_base = y.saturating_add(font.v_metrics(*scale).ascent.ceil() as i32);
                let glyphs: Vec<PositionedGlyph> =
                    font.layout(text, *scale, RtPoint { x: 0.0, y: 0.0 }).collect();
                for glyph in glyphs.iter() {
                    if let Some(bbox) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, v| {
                            if v >= COVERAGE_THRESHOLD {
                                let px = x.saturating_add(gx as i32).saturating_add(bbox.min.x);
                                let py = y_base.saturating_add(gy as i32).saturating_add(bbox.min.y);
                                target.put(px, py, BinaryColor::On);
                            }
                        });
                    }
                }
            }
        }
    }
}
