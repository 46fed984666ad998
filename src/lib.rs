// THEORY:
// `truecolor_gif` turns any raster image into an animated GIF that shows more than
// 256 colors. A GIF frame can only index 255 colors (plus transparency), but viewers
// draw every frame over the previous ones. Splitting the image's colors across
// enough frames, each carrying its own palette, and playing them fast enough makes
// the stacked result look like a single truecolor image.
//
// The public surface is the `FramePartitioner` with its `PartitionConfig`, the
// `FrameSequence` it produces, and the codec helpers that read images and write
// GIFs. The algorithmic stages live in `core_modules`.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use crate::core_modules::color::Color;
pub use crate::core_modules::frame::{FrameSequence, IndexedFrame, MAX_PALETTE_LEN, TRANSPARENT_INDEX};
pub use crate::core_modules::histogram::{BucketOrder, ColorBucket, ColorHistogram, Point};
pub use crate::core_modules::segment::MAX_SEGMENT_COLORS;
pub use crate::core_modules::utils::image_helper::{
    encode_gif, encode_gif_to_vec, load_image, load_image_from_memory, save_gif,
};
pub use crate::error::{Error, Result};
pub use crate::pipeline::{FramePartitioner, PartitionConfig};
