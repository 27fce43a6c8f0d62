use crate::codec::{self, Mode};
use crate::config::{DEFAULT_CARRIER_PATH, DEFAULT_DECODED_PATH, DEFAULT_ENCODED_PATH};
use crate::error::{Result, StegoError};
use crate::face::Face;
use crate::raster::{self, Layout};
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

/// Inputs for a file-to-file encode run.
#[derive(Debug, Clone)]
pub struct EncodeParams {
    /// Image to hide the text in. Defaults to `images/cutekitty.png`.
    pub carrier: PathBuf,
    /// Where the encoded PNG is written. Defaults to `images/encoded_image.png`.
    pub output: PathBuf,
    /// Passage rendered into the red channel.
    pub text: String,
    /// Words of `text` boxed in the green-channel template (dual mode only).
    pub message: String,
    pub mode: Mode,
    pub layout: Layout,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            carrier: PathBuf::from(DEFAULT_CARRIER_PATH),
            output: PathBuf::from(DEFAULT_ENCODED_PATH),
            text: crate::config::DEFAULT_TEXT.to_string(),
            message: crate::config::DEFAULT_MESSAGE.to_string(),
            mode: Mode::default(),
            layout: Layout::default(),
        }
    }
}

/// Inputs for a file-to-file decode run.
#[derive(Debug, Clone)]
pub struct DecodeParams {
    /// Encoded image. Defaults to `images/encoded_image.png`.
    pub input: PathBuf,
    /// Where the visualization PNG is written. Defaults to `images/decoded_image.png`.
    pub output: PathBuf,
    pub mode: Mode,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_ENCODED_PATH),
            output: PathBuf::from(DEFAULT_DECODED_PATH),
            mode: Mode::default(),
        }
    }
}

/// Open any supported image and convert it to 8-bit RGB.
pub fn open_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| StegoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Write `img` as PNG, creating the parent directory if needed.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| StegoError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| StegoError::Save {
            path: path.to_path_buf(),
            source,
        })
}

/// Rasterize `text` (and the template for `message` in dual mode) at the
/// carrier's size and hide it in the carrier.
pub fn encode_carrier(
    carrier: &RgbImage,
    text: &str,
    message: &str,
    mode: Mode,
    layout: &Layout,
    face: &Face,
) -> Result<RgbImage> {
    let size = carrier.dimensions();
    match mode {
        Mode::Single => {
            let mask = raster::rasterize(text, size, layout, face);
            codec::encode(carrier, &mask)
        }
        Mode::Dual => {
            let h = raster::build_highlights(text, message, size, layout, face)?;
            codec::encode_dual(carrier, &h.text, &h.template)
        }
    }
}

/// Open the carrier, encode, and save the result as PNG.
pub fn encode_image(params: &EncodeParams, face: &Face) -> Result<RgbImage> {
    let carrier = open_rgb(&params.carrier)?;
    tracing::debug!(path=%params.carrier.display(), width=%carrier.width(), height=%carrier.height(), mode=?params.mode, "opened carrier");
    let encoded = encode_carrier(
        &carrier,
        &params.text,
        &params.message,
        params.mode,
        &params.layout,
        face,
    )?;
    save_png(&encoded, &params.output)?;
    tracing::info!(path=%params.output.display(), "wrote encoded image");
    Ok(encoded)
}

/// Open an encoded image, decode it, and save the visualization as PNG.
pub fn decode_image(params: &DecodeParams) -> Result<RgbImage> {
    let encoded = open_rgb(&params.input)?;
    let decoded = codec::decode_mode(&encoded, params.mode);
    save_png(&decoded, &params.output)?;
    tracing::info!(path=%params.output.display(), "wrote decoded image");
    Ok(decoded)
}
