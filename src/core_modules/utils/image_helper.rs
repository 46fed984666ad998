// THEORY:
// The codec collaborators live at the edge of the crate. Decoding hands the
// partitioner a plain RGBA grid, whatever the source format. Encoding writes the
// finished `FrameSequence` as a looping GIF89a: no global palette, one local palette
// per frame with index 0 marked transparent, and `Keep` disposal so each frame is
// drawn over the previous ones instead of replacing them.

use crate::core_modules::frame::{FrameSequence, IndexedFrame, TRANSPARENT_INDEX};
use crate::error::{Error, Result};
use image::RgbaImage;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Decodes the image at `path`, guessing the format from its contents.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let image = image::ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgba8())
}

pub fn load_image_from_memory(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Writes `sequence` as a GIF stream to `writer`.
pub fn encode_gif<W: Write>(writer: W, sequence: &FrameSequence) -> Result<()> {
    let (width, height) = gif_dimensions(sequence.width(), sequence.height())?;
    let mut encoder = gif::Encoder::new(writer, width, height, &[])?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    for (frame, &delay) in sequence.frames().iter().zip(sequence.delays()) {
        encoder.write_frame(&to_gif_frame(frame, width, height, delay))?;
    }
    // Writes the trailer; dropping the encoder would swallow its error.
    encoder.into_inner()?;
    Ok(())
}

/// Encodes `sequence` in memory.
pub fn encode_gif_to_vec(sequence: &FrameSequence) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode_gif(&mut bytes, sequence)?;
    Ok(bytes)
}

/// Encodes fully in memory first, so a failed encode never leaves a partial file.
pub fn save_gif(path: impl AsRef<Path>, sequence: &FrameSequence) -> Result<()> {
    let bytes = encode_gif_to_vec(sequence)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn gif_dimensions(width: u32, height: u32) -> Result<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::ImageTooLarge { width, height }),
    }
}

fn to_gif_frame(frame: &IndexedFrame, width: u16, height: u16, delay: u16) -> gif::Frame<'_> {
    let palette = frame.palette().iter().flat_map(|color| color.rgb()).collect();
    gif::Frame {
        width,
        height,
        delay,
        dispose: gif::DisposalMethod::Keep,
        transparent: Some(TRANSPARENT_INDEX),
        palette: Some(palette),
        buffer: Cow::Borrowed(frame.indices()),
        ..gif::Frame::default()
    }
}
