// THEORY:
// The `pipeline` module is the top-level API of the crate. It strings the core
// modules together into one call:
//
//   pixel grid -> histogram -> ordered bucket list -> segments -> painted frames
//              -> delays -> `FrameSequence`
//
// The configuration is an explicit, immutable value handed to the partitioner once;
// nothing survives between calls, so one partitioner can serve any number of images.

use crate::core_modules::frame::FrameSequence;
use crate::core_modules::frame_painter::FramePainter;
use crate::core_modules::histogram::{BucketOrder, ColorHistogram};
use crate::core_modules::segment::{Segments, frame_count};
use crate::core_modules::utils::image_helper;
use crate::error::{Error, Result};
use image::{DynamicImage, RgbaImage};
use log::{debug, info, warn};
use std::path::Path;

/// Tunable behavior of the [`FramePartitioner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Delay of every frame but the last, in hundredths of a second. 2 is the
    /// fastest delay most viewers honor.
    pub frame_delay: u16,
    /// Delay of the last frame, in hundredths of a second.
    pub final_delay: u16,
    /// Maximum number of frames to emit. 0 means unlimited.
    pub frame_limit: usize,
    /// Paint colors that belong to later frames into earlier ones.
    pub backfill: bool,
    /// Order colors by pixel count, most common first.
    pub popularity_sort: bool,
    /// Worker threads for the color scan. 1 scans on the calling thread, 0 uses one
    /// thread per logical CPU.
    pub scan_threads: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            frame_delay: 2,
            final_delay: 300,
            frame_limit: 0,
            backfill: true,
            popularity_sort: true,
            scan_threads: 1,
        }
    }
}

impl PartitionConfig {
    pub fn with_frame_delay(mut self, frame_delay: u16) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub fn with_final_delay(mut self, final_delay: u16) -> Self {
        self.final_delay = final_delay;
        self
    }

    pub fn with_frame_limit(mut self, frame_limit: usize) -> Self {
        self.frame_limit = frame_limit;
        self
    }

    pub fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill = backfill;
        self
    }

    pub fn with_popularity_sort(mut self, popularity_sort: bool) -> Self {
        self.popularity_sort = popularity_sort;
        self
    }

    pub fn with_scan_threads(mut self, scan_threads: usize) -> Self {
        self.scan_threads = scan_threads;
        self
    }

    fn bucket_order(&self) -> BucketOrder {
        if self.popularity_sort {
            BucketOrder::Popularity
        } else {
            BucketOrder::FirstSeen
        }
    }

    fn resolved_scan_threads(&self) -> usize {
        match self.scan_threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

/// Splits an image's colors across as many frames as it takes to show all of them.
#[derive(Debug, Clone, Default)]
pub struct FramePartitioner {
    config: PartitionConfig,
}

impl FramePartitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Builds the frame sequence for `image`.
    ///
    /// Fails with [`Error::InvalidImage`] when the image has no pixels.
    pub fn partition(&self, image: &RgbaImage) -> Result<FrameSequence> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage { width, height });
        }

        // Stage 1: Histogram
        let threads = self.config.resolved_scan_threads();
        debug!("Scanning {}x{} image on {} thread(s)", width, height, threads);
        let histogram = if threads > 1 {
            ColorHistogram::scan_parallel(image, threads)
        } else {
            ColorHistogram::scan(image)
        };
        let distinct_colors = histogram.len();

        // Stage 2: Ordering
        let buckets = histogram.into_buckets(self.config.bucket_order());

        // Stage 3: Segmentation
        let segments = Segments::new(&buckets);
        let frames_to_build = frame_count(segments.len(), self.config.frame_limit);
        info!(
            "{} distinct colors in {} segments, building {} frames",
            distinct_colors,
            segments.len(),
            frames_to_build
        );
        if frames_to_build < segments.len() {
            warn!(
                "Frame limit {} drops {} segments; their colors are approximated",
                self.config.frame_limit,
                segments.len() - frames_to_build
            );
        }

        // Stage 4: Painting
        let painter = FramePainter::new(&segments, width, height, self.config.backfill);
        let frames = (0..frames_to_build)
            .map(|index| painter.paint_frame(index))
            .collect::<Result<Vec<_>>>()?;

        // Stage 5: Delays
        Ok(FrameSequence::new(
            width,
            height,
            frames,
            self.config.frame_delay,
            self.config.final_delay,
        ))
    }

    /// Same as [`FramePartitioner::partition`] for any decoded image.
    pub fn partition_dynamic(&self, image: &DynamicImage) -> Result<FrameSequence> {
        self.partition(&image.to_rgba8())
    }

    /// Decodes `input`, partitions it and writes the GIF to `output`. Returns the
    /// number of frames written.
    pub fn make_gif(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
        let image = image_helper::load_image(input)?;
        let sequence = self.partition(&image)?;
        image_helper::save_gif(output, &sequence)?;
        Ok(sequence.len())
    }
}
