//! # LSB Steganography Codec
//!
//! The pure core of the crate. It consumes a flat sequence of pixels and a
//! message and never touches files, images or the network.
//!
//! ## Modules
//!
//! - [`frame`]: token framing and bit stream conversion
//! - [`bitplane`]: pixel model and LSB read/write
//! - [`capacity`]: capacity arithmetic and the pre-write size check
//! - [`pipeline`]: encode and decode orchestration
//! - [`report`]: injectable progress reporting
//! - [`error`]: error taxonomy

pub mod bitplane;
pub mod capacity;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod report;

pub use bitplane::{read_bits, write_bits, Pixel};
pub use capacity::{capacity, check_fits};
pub use error::{Result, StegoError};
pub use frame::{frame, unframe, BitStream, FRAME_TOKEN};
pub use pipeline::{decode, decode_with, encode, encode_with};
pub use report::{LogReporter, Reporter, SilentReporter};
