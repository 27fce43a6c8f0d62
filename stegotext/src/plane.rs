//! Per-pixel boolean planes recovered from channel parity.
//!
//! A rasterized mask never stores booleans directly: a pixel counts as "ink"
//! when the relevant channel byte is odd. [`BitPlane`] makes that explicit; the
//! decoder reads planes out of an encoded image and renders them back.

use image::{Rgb, RgbImage};

/// One of the three color planes of an RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Byte offset of the channel inside an interleaved RGB pixel.
    #[inline(always)]
    pub fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

#[inline(always)]
pub(crate) fn is_odd(v: u8) -> bool {
    v & 1 == 1
}

/// Row-major W×H grid of ink bits, indexed by `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPlane {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BitPlane {
    /// Plane with every bit cleared.
    #[cfg(test)]
    pub(crate) fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Read the plane a rasterized mask encodes in its red channel.
    pub fn from_mask(mask: &RgbImage) -> Self {
        Self::from_channel(mask, Channel::Red)
    }

    /// Read the parity of `channel` at every pixel.
    pub fn from_channel(img: &RgbImage, channel: Channel) -> Self {
        let off = channel.offset();
        let bits = img
            .as_raw()
            .chunks_exact(3)
            .map(|px| is_odd(px[off]))
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            bits,
        }
    }

    /// Bit is set where any of `channels` is odd.
    pub fn from_channels(img: &RgbImage, channels: &[Channel]) -> Self {
        let bits = img
            .as_raw()
            .chunks_exact(3)
            .map(|px| channels.iter().any(|c| is_odd(px[c.offset()])))
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            bits,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[self.index(x, y)]
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: u32, y: u32, ink: bool) {
        let i = self.index(x, y);
        self.bits[i] = ink;
    }

    pub fn count_ink(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Element-wise OR of two planes of equal size.
    #[cfg(test)]
    pub(crate) fn union(&self, other: &BitPlane) -> Option<BitPlane> {
        if self.dimensions() != other.dimensions() {
            return None;
        }
        let bits = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| *a || *b)
            .collect();
        Some(Self {
            width: self.width,
            height: self.height,
            bits,
        })
    }

    /// Render the plane as a mask image: `on` where ink, `off` elsewhere.
    pub fn to_image(&self, on: Rgb<u8>, off: Rgb<u8>) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        for (px, ink) in out.pixels_mut().zip(self.bits.iter()) {
            *px = if *ink { on } else { off };
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }
}
