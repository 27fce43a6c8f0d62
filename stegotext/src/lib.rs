//! Hide rendered text in the least-significant bits of an image.
//!
//! The passage is rasterized into a parity mask and written into the red
//! channel; in dual mode a reveal template boxing the words of a secondary
//! message goes into the green channel. Decoding renders the recovered bits.

pub mod codec;
pub mod config;
pub mod error;
pub mod face;
pub mod pipeline;
pub mod plane;
pub mod raster;
pub mod wrap;

pub use codec::{Mode, decode, decode_dual, encode, encode_dual};
pub use error::StegoError;
pub use plane::{BitPlane, Channel};
pub use raster::{Highlights, Layout, WordIndex, build_highlights, rasterize};
