use image::{ImageBuffer, Rgba, RgbaImage};
use truecolor_gif::{
    Color, Error, FramePartitioner, MAX_PALETTE_LEN, PartitionConfig, TRANSPARENT_INDEX,
    encode_gif_to_vec,
};

/// A `width`-wide image where pixel `i` (raster order) has color `i % colors`.
fn many_colors(colors: u32, width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let i = (y * width + x) % colors;
        Rgba([(i % 256) as u8, (i / 256) as u8, 100, 255])
    })
}

fn four_colors() -> RgbaImage {
    let colors = [
        Rgba([255u8, 0, 0, 255]),
        Rgba([0u8, 255, 0, 255]),
        Rgba([0u8, 0, 255, 255]),
        Rgba([255u8, 255, 255, 255]),
    ];
    ImageBuffer::from_fn(2, 2, |x, y| colors[(y * 2 + x) as usize])
}

#[test]
fn four_color_image_fits_in_one_frame() {
    let image = four_colors();
    let sequence = FramePartitioner::default().partition(&image).unwrap();

    assert_eq!(sequence.len(), 1);
    assert_eq!(sequence.delays(), &[300]);

    let frame = &sequence.frames()[0];
    assert_eq!(frame.palette().len(), 5);
    assert_eq!(frame.palette()[0], Color::TRANSPARENT);
    for (x, y, pixel) in image.enumerate_pixels() {
        assert_ne!(frame.index_at(x, y), TRANSPARENT_INDEX);
        assert_eq!(frame.color_at(x, y), Color::from(*pixel));
    }
}

#[test]
fn color_count_decides_frame_count() {
    let partitioner = FramePartitioner::default();
    for (colors, frames) in [(1, 1), (254, 1), (255, 2), (508, 2), (509, 3), (1000, 4)] {
        let image = many_colors(colors, 50, 21);
        let sequence = partitioner.partition(&image).unwrap();
        assert_eq!(sequence.len(), frames, "{colors} colors");
        assert_eq!(sequence.delays().len(), frames);
    }
}

#[test]
fn five_hundred_nine_colors_backfill_first_frame() {
    let image = many_colors(509, 509, 1);
    let sequence = FramePartitioner::default().partition(&image).unwrap();

    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.delays(), &[2, 2, 300]);

    let first = &sequence.frames()[0];
    assert_eq!(first.palette().len(), MAX_PALETTE_LEN);
    assert!(first.is_fully_painted());
}

#[test]
fn frame_limit_truncates_to_one_frame() {
    let image = many_colors(509, 509, 1);
    for backfill in [true, false] {
        let config = PartitionConfig::default()
            .with_frame_limit(1)
            .with_backfill(backfill);
        let sequence = FramePartitioner::new(config).partition(&image).unwrap();

        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence.delays(), &[300]);
        assert_eq!(sequence.frames()[0].is_fully_painted(), backfill);
    }
}

#[test]
fn frame_limit_above_segment_count_changes_nothing() {
    let image = many_colors(600, 40, 20);
    let unlimited = FramePartitioner::default().partition(&image).unwrap();
    let limited = FramePartitioner::new(PartitionConfig::default().with_frame_limit(10))
        .partition(&image)
        .unwrap();
    assert_eq!(unlimited, limited);
}

#[test]
fn stacked_frames_reproduce_the_source_image() {
    let image = many_colors(1000, 64, 40);
    for backfill in [true, false] {
        for popularity_sort in [true, false] {
            let config = PartitionConfig::default()
                .with_backfill(backfill)
                .with_popularity_sort(popularity_sort);
            let sequence = FramePartitioner::new(config).partition(&image).unwrap();
            assert_eq!(sequence.composite(), image);
        }
    }
}

#[test]
fn every_frame_keeps_transparency_at_index_zero() {
    let image = many_colors(2000, 100, 30);
    let sequence = FramePartitioner::default().partition(&image).unwrap();

    for frame in sequence.frames() {
        assert!(frame.palette().len() <= MAX_PALETTE_LEN);
        assert_eq!(frame.palette()[0], Color::TRANSPARENT);
    }
}

#[test]
fn backfilled_frames_show_every_pixel_from_the_first_frame_on() {
    let image = many_colors(900, 45, 30);
    let sequence = FramePartitioner::default().partition(&image).unwrap();

    // Overlaying frames 0..=i leaves no pixel transparent, for every i.
    let mut seen = vec![false; (45 * 30) as usize];
    for frame in sequence.frames() {
        for (slot, &index) in seen.iter_mut().zip(frame.indices()) {
            *slot |= index != TRANSPARENT_INDEX;
        }
        assert!(seen.iter().all(|&painted| painted));
    }
}

#[test]
fn popular_colors_come_first() {
    // Left half is one color, the rest are 300 unique colors.
    let image: RgbaImage = ImageBuffer::from_fn(600, 1, |x, _| {
        if x < 300 {
            Rgba([1, 2, 3, 255])
        } else {
            Rgba([(x % 256) as u8, (x / 256) as u8, 200, 255])
        }
    });
    let sequence = FramePartitioner::default().partition(&image).unwrap();
    assert_eq!(sequence.frames()[0].palette()[1], Color::new(1, 2, 3, 255));

    let unsorted = FramePartitioner::new(PartitionConfig::default().with_popularity_sort(false))
        .partition(&image)
        .unwrap();
    assert_eq!(unsorted.frames()[0].palette()[1], Color::new(1, 2, 3, 255));
    assert_eq!(unsorted.frames()[0].palette()[2], Color::new(44, 1, 200, 255));
}

#[test]
fn runs_are_reproducible() {
    let image = many_colors(777, 80, 25);
    for popularity_sort in [true, false] {
        let config = PartitionConfig::default().with_popularity_sort(popularity_sort);
        let first = FramePartitioner::new(config.clone()).partition(&image).unwrap();
        let second = FramePartitioner::new(config.clone()).partition(&image).unwrap();
        let threaded = FramePartitioner::new(config.with_scan_threads(4))
            .partition(&image)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, threaded);
        assert_eq!(encode_gif_to_vec(&first).unwrap(), encode_gif_to_vec(&second).unwrap());
    }
}

#[test]
fn custom_delays_are_applied() {
    let image = many_colors(600, 30, 20);
    let config = PartitionConfig::default()
        .with_frame_delay(7)
        .with_final_delay(42);
    let sequence = FramePartitioner::new(config).partition(&image).unwrap();
    assert_eq!(sequence.delays(), &[7, 7, 42]);
}

#[test]
fn empty_image_is_invalid() {
    let image = RgbaImage::new(0, 10);
    let result = FramePartitioner::default().partition(&image);
    assert!(matches!(result, Err(Error::InvalidImage { width: 0, height: 10 })));
}

#[test]
fn make_gif_writes_a_decodable_file() {
    let dir = std::env::temp_dir().join(format!("truecolor_gif_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("input.png");
    let output = dir.join("out.gif");

    many_colors(600, 30, 20).save(&input).unwrap();
    let frames = FramePartitioner::default().make_gif(&input, &output).unwrap();
    assert_eq!(frames, 3);

    let file = std::fs::File::open(&output).unwrap();
    let mut decoder = gif::DecodeOptions::new().read_info(file).unwrap();
    assert_eq!((decoder.width(), decoder.height()), (30, 20));
    let mut decoded = 0;
    while decoder.read_next_frame().unwrap().is_some() {
        decoded += 1;
    }
    assert_eq!(decoded, 3);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_file_is_reported() {
    let missing = std::env::temp_dir().join("truecolor_gif_does_not_exist.png");
    let output = std::env::temp_dir().join("truecolor_gif_never_written.gif");
    let result = FramePartitioner::default().make_gif(&missing, &output);
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!output.exists());
}
