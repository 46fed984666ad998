// THEORY:
// The `FramePainter` turns the segment list into frames. It is not an analyzer: it
// owns nothing but a borrowed view of the segments and builds one frame per call.
//
// Painting a frame happens in two passes:
// 1.  **Native pass**: every color of the frame's own segment gets the next palette
//     slot and all of its pixels point at that slot.
// 2.  **Backfill pass** (optional): every color of every later segment is painted
//     into this frame too, using the exact color while the palette has room and
//     the closest native color once it is full. Without this pass, pixels whose
//     color has not "arrived" yet would stay transparent in this frame.
//
// Since each later frame draws its native colors over the approximations of the
// frames before it, the last frame to touch a pixel is always the one carrying its
// exact color.

use crate::core_modules::frame::IndexedFrame;
use crate::core_modules::segment::Segments;
use crate::error::Result;
use log::debug;

pub struct FramePainter<'a> {
    segments: &'a Segments<'a>,
    width: u32,
    height: u32,
    backfill: bool,
}

impl<'a> FramePainter<'a> {
    pub fn new(segments: &'a Segments<'a>, width: u32, height: u32, backfill: bool) -> Self {
        Self {
            segments,
            width,
            height,
            backfill,
        }
    }

    /// Builds frame `index`. An index past the last segment yields an empty frame.
    pub fn paint_frame(&self, index: usize) -> Result<IndexedFrame> {
        let mut frame = IndexedFrame::new(self.width, self.height);

        for bucket in self.segments.get(index).unwrap_or_default() {
            let palette_index = frame.push_color(bucket.color, index)?;
            frame.paint(&bucket.points, palette_index);
        }
        let native = frame.palette().len() - 1;

        if self.backfill {
            for segment in self.segments.after(index) {
                for bucket in segment {
                    let palette_index = frame.backfill_index(bucket.color, index)?;
                    frame.paint(&bucket.points, palette_index);
                }
            }
        }

        debug!(
            "Frame {}: {} native colors, {} palette entries",
            index,
            native,
            frame.palette().len()
        );
        Ok(frame)
    }
}
