// THEORY:
// A single error type for the whole crate. Decoding and encoding failures from the
// codec collaborators are carried through untouched so the operator sees the real
// cause. `PaletteOverflow` is an internal invariant breach: correct segmentation
// never produces it, but if it happens the partition aborts instead of emitting a
// corrupt frame.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("image has zero area ({width}x{height})")]
    InvalidImage { width: u32, height: u32 },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("palette of frame {frame} would grow to {entries} entries (max 255)")]
    PaletteOverflow { frame: usize, entries: usize },

    #[error("image dimensions {width}x{height} exceed the GIF limit of 65535")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("failed to encode gif: {0}")]
    Encode(#[from] gif::EncodingError),
}
