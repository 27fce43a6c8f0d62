//! Bit-plane codec: hides rasterized masks in channel LSBs and recovers them.
//!
//! Encoding copies the carrier, then for each target channel forces the byte's
//! parity to the mask bit: odd bytes are first normalized to even (−1), and
//! inked pixels get +1. Untouched channels are copied verbatim, so blue always
//! survives exactly. All passes walk the interleaved RGB buffer once.

use crate::error::{Result, StegoError};
use crate::plane::{BitPlane, Channel, is_odd};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Which layers an encoded image carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Text on red only.
    Single,
    /// Text on red plus reveal template on green.
    #[default]
    Dual,
}

/// Force the parity of `value` to `ink` by at most one step.
#[inline(always)]
pub fn embed_bit(value: u8, ink: bool) -> u8 {
    // odd values are >= 1 and normalized values are <= 254, so neither step wraps
    let even = if is_odd(value) { value - 1 } else { value };
    if ink { even + 1 } else { even }
}

fn check_size(carrier: &RgbImage, mask: &RgbImage) -> Result<()> {
    if carrier.dimensions() != mask.dimensions() {
        return Err(StegoError::SizeMismatch {
            expected: carrier.dimensions(),
            actual: mask.dimensions(),
        });
    }
    Ok(())
}

/// Copy `carrier` and write each mask's red-channel parity into its channel.
fn embed_layers(carrier: &RgbImage, layers: &[(Channel, &RgbImage)]) -> Result<RgbImage> {
    for (_, mask) in layers {
        check_size(carrier, mask)?;
    }
    let mut out = carrier.clone();
    for (channel, mask) in layers {
        let off = channel.offset();
        let mut ink = 0usize;
        for (px, m) in out.chunks_exact_mut(3).zip(mask.as_raw().chunks_exact(3)) {
            let bit = is_odd(m[0]);
            ink += bit as usize;
            px[off] = embed_bit(px[off], bit);
        }
        tracing::debug!(channel=?channel, width=%carrier.width(), height=%carrier.height(), ink=%ink, "embedded bit-plane");
    }
    Ok(out)
}

/// Hide `text_mask` in the red channel of `carrier`. Green and blue are copied.
pub fn encode(carrier: &RgbImage, text_mask: &RgbImage) -> Result<RgbImage> {
    embed_layers(carrier, &[(Channel::Red, text_mask)])
}

/// Hide `text_mask` in red and `template_mask` in green. Blue is copied.
pub fn encode_dual(
    carrier: &RgbImage,
    text_mask: &RgbImage,
    template_mask: &RgbImage,
) -> Result<RgbImage> {
    embed_layers(
        carrier,
        &[(Channel::Red, text_mask), (Channel::Green, template_mask)],
    )
}

/// Render the red LSB plane: white where set, black elsewhere.
pub fn decode(encoded: &RgbImage) -> RgbImage {
    let plane = BitPlane::from_channel(encoded, Channel::Red);
    tracing::debug!(width=%encoded.width(), height=%encoded.height(), ink=%plane.count_ink(), "decoded red bit-plane");
    plane.to_image(WHITE, BLACK)
}

/// Render the union of the red and green LSB planes as black on white.
///
/// Text ink and the template share one visual layer; the highlighted word
/// boxes are where the template is even, so only those words read as text.
pub fn decode_dual(encoded: &RgbImage) -> RgbImage {
    let plane = BitPlane::from_channels(encoded, &[Channel::Red, Channel::Green]);
    tracing::debug!(width=%encoded.width(), height=%encoded.height(), ink=%plane.count_ink(), "decoded red|green bit-planes");
    plane.to_image(BLACK, WHITE)
}

/// Decode according to `mode`.
pub fn decode_mode(encoded: &RgbImage, mode: Mode) -> RgbImage {
    match mode {
        Mode::Single => decode(encoded),
        Mode::Dual => decode_dual(encoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([
                ((x * 37 + y * 11) % 256) as u8,
                ((x * 13 + y * 71) % 256) as u8,
                ((x * 5 + y * 3) % 256) as u8,
            ])
        })
    }

    fn checker(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| if (x / 3 + y) % 2 == 0 { WHITE } else { BLACK })
    }

    fn stripes(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, _| if x % 4 == 1 { WHITE } else { BLACK })
    }

    #[test]
    fn embed_bit_moves_at_most_one() {
        for v in 0..=255u8 {
            for ink in [false, true] {
                let out = embed_bit(v, ink);
                assert_eq!(is_odd(out), ink);
                assert!((out as i16 - v as i16).abs() <= 1, "{v} -> {out}");
            }
        }
        assert_eq!(embed_bit(0, false), 0);
        assert_eq!(embed_bit(0, true), 1);
        assert_eq!(embed_bit(255, true), 255);
        assert_eq!(embed_bit(255, false), 254);
    }

    #[test]
    fn single_round_trip_matches_mask() {
        let carrier = gradient(40, 24);
        let mask = checker(40, 24);
        let encoded = encode(&carrier, &mask).unwrap();
        let decoded = decode(&encoded);
        assert_eq!(BitPlane::from_mask(&decoded), BitPlane::from_mask(&mask));
        for (d, m) in decoded.pixels().zip(mask.pixels()) {
            assert_eq!(d, m);
        }
    }

    #[test]
    fn single_mode_preserves_green_and_blue() {
        let carrier = gradient(17, 9);
        let encoded = encode(&carrier, &checker(17, 9)).unwrap();
        for (e, c) in encoded.pixels().zip(carrier.pixels()) {
            assert!((e[0] as i16 - c[0] as i16).abs() <= 1);
            assert_eq!(e[1], c[1]);
            assert_eq!(e[2], c[2]);
        }
    }

    #[test]
    fn dual_mode_bounds_and_isolation() {
        let carrier = gradient(31, 13);
        let encoded = encode_dual(&carrier, &checker(31, 13), &stripes(31, 13)).unwrap();
        for (e, c) in encoded.pixels().zip(carrier.pixels()) {
            assert!((e[0] as i16 - c[0] as i16).abs() <= 1);
            assert!((e[1] as i16 - c[1] as i16).abs() <= 1);
            assert_eq!(e[2], c[2]);
        }
        assert_eq!(
            BitPlane::from_channel(&encoded, Channel::Red),
            BitPlane::from_mask(&checker(31, 13))
        );
        assert_eq!(
            BitPlane::from_channel(&encoded, Channel::Green),
            BitPlane::from_mask(&stripes(31, 13))
        );
    }

    #[test]
    fn dual_decode_is_union_in_black() {
        let carrier = gradient(20, 6);
        let text = checker(20, 6);
        let template = stripes(20, 6);
        let decoded = decode_dual(&encode_dual(&carrier, &text, &template).unwrap());
        let union = BitPlane::from_mask(&text)
            .union(&BitPlane::from_mask(&template))
            .unwrap();
        for y in 0..6 {
            for x in 0..20 {
                let want = if union.get(x, y) { BLACK } else { WHITE };
                assert_eq!(*decoded.get_pixel(x, y), want, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn decode_renders_recovered_planes() {
        let encoded = encode_dual(&gradient(15, 7), &checker(15, 7), &stripes(15, 7)).unwrap();
        let red = BitPlane::from_channel(&encoded, Channel::Red);
        assert_eq!(decode(&encoded).as_raw(), red.to_image(WHITE, BLACK).as_raw());
        let both = red
            .union(&BitPlane::from_channel(&encoded, Channel::Green))
            .unwrap();
        assert_eq!(decode_dual(&encoded).as_raw(), both.to_image(BLACK, WHITE).as_raw());
    }

    #[test]
    fn re_encode_is_deterministic() {
        let carrier = gradient(12, 12);
        let mask = checker(12, 12);
        let a = encode(&carrier, &mask).unwrap();
        let b = encode(&carrier, &mask).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
        // encoding an already-encoded image with the same mask changes nothing
        let c = encode(&a, &mask).unwrap();
        assert_eq!(a.as_raw(), c.as_raw());
    }

    #[test]
    fn extreme_values_do_not_wrap() {
        let carrier = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let all_ink = RgbImage::from_pixel(2, 1, WHITE);
        let no_ink = RgbImage::from_pixel(2, 1, BLACK);
        let inked = encode_dual(&carrier, &all_ink, &all_ink).unwrap();
        assert_eq!(*inked.get_pixel(0, 0), Rgb([1, 1, 0]));
        assert_eq!(*inked.get_pixel(1, 0), Rgb([255, 255, 255]));
        let cleared = encode_dual(&carrier, &no_ink, &no_ink).unwrap();
        assert_eq!(*cleared.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*cleared.get_pixel(1, 0), Rgb([254, 254, 255]));
    }

    #[test]
    fn one_by_one_image() {
        let carrier = RgbImage::from_pixel(1, 1, Rgb([100, 51, 7]));
        let mask = RgbImage::from_pixel(1, 1, WHITE);
        let encoded = encode(&carrier, &mask).unwrap();
        assert_eq!(*encoded.get_pixel(0, 0), Rgb([101, 51, 7]));
        assert_eq!(*decode(&encoded).get_pixel(0, 0), WHITE);

        let dual = encode_dual(&carrier, &RgbImage::new(1, 1), &RgbImage::new(1, 1)).unwrap();
        assert_eq!(*dual.get_pixel(0, 0), Rgb([100, 50, 7]));
        assert_eq!(*decode_dual(&dual).get_pixel(0, 0), WHITE);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let carrier = gradient(10, 10);
        let err = encode(&carrier, &checker(10, 9)).unwrap_err();
        assert!(matches!(
            err,
            StegoError::SizeMismatch {
                expected: (10, 10),
                actual: (10, 9)
            }
        ));
        let err = encode_dual(&carrier, &checker(10, 10), &checker(9, 10)).unwrap_err();
        assert!(matches!(err, StegoError::SizeMismatch { actual: (9, 10), .. }));
    }

    #[test]
    fn decode_mode_dispatches() {
        let img = RgbImage::from_pixel(1, 1, Rgb([2, 3, 0]));
        assert_eq!(*decode_mode(&img, Mode::Single).get_pixel(0, 0), BLACK);
        assert_eq!(*decode_mode(&img, Mode::Dual).get_pixel(0, 0), BLACK);
        let img = RgbImage::from_pixel(1, 1, Rgb([2, 4, 0]));
        assert_eq!(*decode_mode(&img, Mode::Dual).get_pixel(0, 0), WHITE);
    }
}
