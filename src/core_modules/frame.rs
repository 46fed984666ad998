// THEORY:
// An `IndexedFrame` is one GIF frame: a local palette plus one palette index per
// pixel. Index 0 is always the transparency color, which doubles as the "unset"
// value of a fresh frame; every painted pixel points at index 1 or above.
//
// A palette never holds more than 255 entries. `push_color` is the only way to grow
// it natively and refuses to break that bound; `backfill_index` never grows it past
// the bound either, falling back to the closest existing entry instead.
//
// A `FrameSequence` is the finished product: the frames in display order and their
// delays. `composite` replays the sequence the way a viewer does (later frames drawn
// over earlier ones, transparency leaves what is below) to produce the perceived image.

use crate::core_modules::color::Color;
use crate::core_modules::histogram::Point;
use crate::error::{Error, Result};
use image::{ImageBuffer, RgbaImage};
use std::collections::HashMap;

/// Transparency plus 254 native colors.
pub const MAX_PALETTE_LEN: usize = 255;

/// Palette index of the transparency color.
pub const TRANSPARENT_INDEX: u8 = 0;

/// A single indexed-color frame covering the full source bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    width: u32,
    height: u32,
    palette: Vec<Color>,
    // Painted colors only; the matte at index 0 is never looked up.
    lookup: HashMap<Color, u8>,
    indices: Vec<u8>,
}

impl IndexedFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            palette: vec![Color::TRANSPARENT],
            lookup: HashMap::new(),
            indices: vec![TRANSPARENT_INDEX; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Row-major palette indices, one per pixel.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Appends `color` to the palette and returns its index.
    ///
    /// `frame` only labels the error.
    pub fn push_color(&mut self, color: Color, frame: usize) -> Result<u8> {
        if self.palette.len() >= MAX_PALETTE_LEN {
            return Err(Error::PaletteOverflow {
                frame,
                entries: self.palette.len() + 1,
            });
        }
        let index = self.palette.len() as u8;
        self.palette.push(color);
        self.lookup.entry(color).or_insert(index);
        Ok(index)
    }

    /// Index used to paint `color` ahead of its own frame: the exact entry if the
    /// palette has it, a new entry while there is room, otherwise the closest
    /// non-transparent entry.
    pub fn backfill_index(&mut self, color: Color, frame: usize) -> Result<u8> {
        if let Some(&index) = self.lookup.get(&color) {
            return Ok(index);
        }
        if self.palette.len() < MAX_PALETTE_LEN {
            return self.push_color(color, frame);
        }
        Ok(self.nearest_index(&color))
    }

    fn nearest_index(&self, color: &Color) -> u8 {
        let mut best = (1usize, u32::MAX);
        for (index, candidate) in self.palette.iter().enumerate().skip(1) {
            let distance = color.distance(candidate);
            if distance < best.1 {
                best = (index, distance);
            }
        }
        best.0 as u8
    }

    /// Sets every listed pixel to `index`.
    pub fn paint(&mut self, points: &[Point], index: u8) {
        let width = self.width as usize;
        for point in points {
            self.indices[point.y as usize * width + point.x as usize] = index;
        }
    }

    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        self.indices[y as usize * self.width as usize + x as usize]
    }

    pub fn color_at(&self, x: u32, y: u32) -> Color {
        self.palette[self.index_at(x, y) as usize]
    }

    /// True when no pixel is left at the transparency index.
    pub fn is_fully_painted(&self) -> bool {
        self.indices.iter().all(|&index| index != TRANSPARENT_INDEX)
    }
}

/// Ordered frames plus a parallel list of display delays in hundredths of a second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    width: u32,
    height: u32,
    frames: Vec<IndexedFrame>,
    delays: Vec<u16>,
}

impl FrameSequence {
    /// Every frame gets `frame_delay` except the last, which gets `final_delay`.
    pub fn new(
        width: u32,
        height: u32,
        frames: Vec<IndexedFrame>,
        frame_delay: u16,
        final_delay: u16,
    ) -> Self {
        let mut delays = vec![frame_delay; frames.len()];
        if let Some(last) = delays.last_mut() {
            *last = final_delay;
        }
        Self {
            width,
            height,
            frames,
            delays,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frames(&self) -> &[IndexedFrame] {
        &self.frames
    }

    pub fn delays(&self) -> &[u16] {
        &self.delays
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The image a viewer shows once every frame has been drawn over the last.
    ///
    /// GIF palettes carry no alpha, so every painted pixel comes out opaque, exactly
    /// as the encoded file renders it. Pixels no frame paints stay transparent.
    pub fn composite(&self) -> RgbaImage {
        let mut canvas: RgbaImage =
            ImageBuffer::from_pixel(self.width, self.height, Color::TRANSPARENT.into());
        for frame in &self.frames {
            for (pixel, &index) in canvas.pixels_mut().zip(frame.indices()) {
                if index != TRANSPARENT_INDEX {
                    let [red, green, blue] = frame.palette()[index as usize].rgb();
                    *pixel = Color::new(red, green, blue, u8::MAX).into();
                }
            }
        }
        canvas
    }
}
