// THEORY:
// The histogram is the first stage of the partitioner. It walks every pixel of the
// source grid exactly once in raster order (y outer, x inner) and groups the
// coordinates by exact color. Two properties matter downstream:
//
// 1.  **Key order**: colors are kept in the order they were first seen. This gives a
//     deterministic fallback ordering when popularity sort is off, and a stable
//     tie-break when it is on.
// 2.  **Bucket order**: the coordinates inside one bucket stay in raster order.
//
// The parallel scan splits the grid into contiguous row ranges, builds one local
// histogram per range and merges them in range order. Both properties above survive
// the merge, so the parallel and sequential scans produce identical histograms.

use crate::core_modules::color::Color;
use image::RgbaImage;
use log::debug;
use std::collections::HashMap;
use std::thread;

/// A pixel coordinate inside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One distinct color and every coordinate where it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBucket {
    pub color: Color,
    pub points: Vec<Point>,
}

impl ColorBucket {
    /// The number of pixels sharing this color.
    pub fn popularity(&self) -> usize {
        self.points.len()
    }
}

/// How the bucket list is ordered before segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOrder {
    /// Order of first occurrence in the raster scan.
    FirstSeen,
    /// Descending pixel count; ties keep first-seen order.
    Popularity,
}

/// Maps every distinct color of an image to the coordinates it covers.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    buckets: Vec<ColorBucket>,
    lookup: HashMap<Color, usize>,
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the whole image on the calling thread.
    pub fn scan(image: &RgbaImage) -> Self {
        let mut histogram = Self::new();
        histogram.scan_rows(image, 0, image.height());
        histogram
    }

    /// Scans the image using up to `threads` worker threads, one contiguous row range
    /// each. The result is identical to [`ColorHistogram::scan`].
    pub fn scan_parallel(image: &RgbaImage, threads: usize) -> Self {
        let height = image.height();
        let workers = threads.clamp(1, height.max(1) as usize);
        if workers == 1 {
            return Self::scan(image);
        }

        let rows_per_worker = height.div_ceil(workers as u32);
        debug!("Scanning {} rows with {} workers", height, workers);

        let partials: Vec<ColorHistogram> = thread::scope(|scope| {
            let handles: Vec<_> = (0..height)
                .step_by(rows_per_worker as usize)
                .map(|start| {
                    let end = (start + rows_per_worker).min(height);
                    scope.spawn(move || {
                        let mut local = ColorHistogram::new();
                        local.scan_rows(image, start, end);
                        local
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let mut histogram = Self::new();
        for partial in partials {
            histogram.merge(partial);
        }
        histogram
    }

    fn scan_rows(&mut self, image: &RgbaImage, start: u32, end: u32) {
        let width = image.width();
        for y in start..end {
            for x in 0..width {
                let color = Color::from(*image.get_pixel(x, y));
                self.insert(color, Point::new(x, y));
            }
        }
    }

    /// Records one occurrence of `color` at `point`.
    pub fn insert(&mut self, color: Color, point: Point) {
        match self.lookup.get(&color) {
            Some(&index) => self.buckets[index].points.push(point),
            None => {
                self.lookup.insert(color, self.buckets.len());
                self.buckets.push(ColorBucket {
                    color,
                    points: vec![point],
                });
            }
        }
    }

    /// Appends `other` after `self`. `other` must cover later rows than `self`.
    fn merge(&mut self, other: ColorHistogram) {
        for bucket in other.buckets {
            match self.lookup.get(&bucket.color) {
                Some(&index) => self.buckets[index].points.extend(bucket.points),
                None => {
                    self.lookup.insert(bucket.color, self.buckets.len());
                    self.buckets.push(bucket);
                }
            }
        }
    }

    /// The number of distinct colors.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, color: &Color) -> Option<&[Point]> {
        self.lookup
            .get(color)
            .map(|&index| self.buckets[index].points.as_slice())
    }

    /// Buckets in first-seen order.
    pub fn buckets(&self) -> &[ColorBucket] {
        &self.buckets
    }

    /// Consumes the histogram into the ordered bucket list used for segmentation.
    pub fn into_buckets(self, order: BucketOrder) -> Vec<ColorBucket> {
        let mut buckets = self.buckets;
        if order == BucketOrder::Popularity {
            // Stable, so equal counts keep first-seen order.
            buckets.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
        }
        buckets
    }
}
