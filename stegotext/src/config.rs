use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;

use crate::codec::Mode;
use crate::face::Face;
use crate::pipeline::{DecodeParams, EncodeParams};
use crate::raster::Layout;

/// Default on-disk config filename
pub const DEFAULT_CONFIG_PATH: &str = "stegotext.toml";

pub const DEFAULT_CARRIER_PATH: &str = "images/cutekitty.png";
pub const DEFAULT_ENCODED_PATH: &str = "images/encoded_image.png";
pub const DEFAULT_DECODED_PATH: &str = "images/decoded_image.png";

pub const DEFAULT_TEXT: &str = "Four score and seven years ago our fathers brought forth on this continent, a new nation, conceived in Liberty, and dedicated to the proposition that all men are created equal. Now we are engaged in a great civil war, testing whether that nation, or any nation so conceived and so dedicated, can long endure. We are met on a great battlefield of that war. We have come to dedicate a portion of that field, as a final resting place for those who here gave their lives that that nation might live. It is altogether fitting and proper that we should do this. But, in a larger sense, we can not dedicate - we can not consecrate- we can not hallow - this ground. The brave men, living and dead, who struggled here, have consecrated it, far above our poor power to add or detract. The world will little note, not long remember what we say here, but it can never forget what they did here. It is for us the living, rather, to be dedicated there to the unfinished work which they ...";
pub const DEFAULT_MESSAGE: &str = "our nation can forget";

/// Strongly typed representation of the configuration. Every section is optional.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub logging: Option<Logging>,
    pub paths: Paths,
    pub layout: Layout,
    pub font: Option<FontConfig>,
    pub encode: EncodeConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Paths {
    pub carrier: PathBuf,
    pub encoded: PathBuf,
    pub decoded: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            carrier: PathBuf::from(DEFAULT_CARRIER_PATH),
            encoded: PathBuf::from(DEFAULT_ENCODED_PATH),
            decoded: PathBuf::from(DEFAULT_DECODED_PATH),
        }
    }
}

/// TrueType face to render with instead of the built-in bitmap font.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FontConfig {
    pub path: Option<PathBuf>,
    pub size: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EncodeConfig {
    pub mode: Mode,
    pub text: String,
    pub message: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            text: DEFAULT_TEXT.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl Config {
    /// Resolve the configured face, falling back to the bitmap font.
    pub fn face(&self) -> Result<Face> {
        match self.font.as_ref().and_then(|f| f.path.as_ref().map(|p| (p, f.size))) {
            Some((path, size)) => Face::load_truetype(path, size.unwrap_or(12.0))
                .with_context(|| format!("loading font {}", path.display())),
            None => Ok(Face::default()),
        }
    }

    pub fn encode_params(&self) -> EncodeParams {
        EncodeParams {
            carrier: self.paths.carrier.clone(),
            output: self.paths.encoded.clone(),
            text: self.encode.text.clone(),
            message: self.encode.message.clone(),
            mode: self.encode.mode,
            layout: self.layout,
        }
    }

    pub fn decode_params(&self) -> DecodeParams {
        DecodeParams {
            input: self.paths.encoded.clone(),
            output: self.paths.decoded.clone(),
            mode: self.encode.mode,
        }
    }
}

/// Parsed config document and where it came from.
#[derive(Debug)]
pub struct ConfigManager {
    path: PathBuf,
    doc: DocumentMut,
}

impl ConfigManager {
    /// Load the config file. A missing file yields an empty document, i.e. all defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            tracing::info!(path=%path.display(), "config file not found; using defaults");
            return Ok(Self {
                path,
                doc: DocumentMut::new(),
            });
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let doc = text
            .parse::<DocumentMut>()
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert current document to strongly typed struct.
    pub fn to_struct(&self) -> Result<Config> {
        let typed: Config = toml_edit::de::from_document(self.doc.clone())
            .with_context(|| format!("invalid config in {}", self.path.display()))?;
        Ok(typed)
    }
}
