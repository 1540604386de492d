//! # Image Processing
//!
//! Image file handling around the codec: decoding uploads and files into
//! pixel sequences, and writing encoded pixels back out as lossless PNG.

pub mod image_io;

// Re-export main types for convenience
pub use image_io::{Carrier, CarrierError, ColorMode, ImageKind};
