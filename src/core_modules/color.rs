// THEORY:
// `Color` is the smallest unit the partitioner reasons about. It is a "dumb" RGBA
// value: two colors are the same color if and only if all four channels match, and
// that exact equality (plus hashing) is what the histogram groups pixels by.
//
// The only comparative operation lives here too: `distance` measures how far two
// colors are apart so backfill can fall back to the closest palette entry once a
// frame's palette is full.

pub type Channel = u8;
pub type ColorDistance = u32;

const CHANNELS: usize = 4;

/// A single RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
    pub alpha: Channel,
}

impl Color {
    /// The matte color reserved at palette index 0 of every frame.
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Sum of squared channel differences, alpha included.
    pub fn distance(&self, other: &Color) -> ColorDistance {
        let diff = |a: Channel, b: Channel| {
            let d = a.abs_diff(b) as ColorDistance;
            d * d
        };
        diff(self.red, other.red)
            + diff(self.green, other.green)
            + diff(self.blue, other.blue)
            + diff(self.alpha, other.alpha)
    }

    /// The color as GIF palette bytes. GIF palettes have no alpha channel.
    pub fn rgb(&self) -> [Channel; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<[Channel; CHANNELS]> for Color {
    fn from(bytes: [Channel; CHANNELS]) -> Self {
        Color::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl From<image::Rgba<Channel>> for Color {
    fn from(pixel: image::Rgba<Channel>) -> Self {
        Color::from(pixel.0)
    }
}

impl From<Color> for image::Rgba<Channel> {
    fn from(color: Color) -> Self {
        image::Rgba([color.red, color.green, color.blue, color.alpha])
    }
}
