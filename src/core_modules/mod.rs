pub mod color;
pub mod frame;
pub mod frame_painter;
pub mod histogram;
pub mod segment;
pub mod utils;
