// THEORY:
// A `Segment` is a contiguous run of at most 254 buckets from the ordered bucket
// list: exactly the colors one frame can hold natively next to the reserved
// transparency slot. Segments are borrowed views; nothing is copied.

use crate::core_modules::histogram::ColorBucket;

/// Native colors one frame can carry (255 palette entries minus transparency).
pub const MAX_SEGMENT_COLORS: usize = 254;

pub type Segment<'a> = &'a [ColorBucket];

/// `ceil(colors / 254)`.
pub fn segment_count(colors: usize) -> usize {
    colors.div_ceil(MAX_SEGMENT_COLORS)
}

/// Frames to build for `segments` segments under `frame_limit` (0 = unlimited).
pub fn frame_count(segments: usize, frame_limit: usize) -> usize {
    if frame_limit == 0 {
        segments
    } else {
        segments.min(frame_limit)
    }
}

/// The bucket list cut into segments of at most [`MAX_SEGMENT_COLORS`] entries.
pub struct Segments<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Segments<'a> {
    pub fn new(buckets: &'a [ColorBucket]) -> Self {
        Self {
            segments: buckets.chunks(MAX_SEGMENT_COLORS).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Segment<'a>> {
        self.segments.get(index).copied()
    }

    /// Every segment after `index`, in order.
    pub fn after(&self, index: usize) -> impl Iterator<Item = Segment<'a>> + '_ {
        self.segments.iter().skip(index + 1).copied()
    }
}
