use std::path::PathBuf;

/// Errors surfaced by the rasterizer, the codec and the file pipeline.
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    #[error("size mismatch: carrier is {expected:?} but mask is {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("word '{word}' not found in passage")]
    WordNotFound { word: String },
    #[error("word '{word}' has no occurrence after word #{after} in passage")]
    NoLaterOccurrence { word: String, after: usize },
    #[error("opening image {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("saving image {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("reading font {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid font data: {0}")]
    Font(String),
}

pub type Result<T, E = StegoError> = std::result::Result<T, E>;
