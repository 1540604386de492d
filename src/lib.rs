pub mod codec;
pub mod common;
pub mod lab;
pub mod processing;
pub mod web;

pub use codec::{decode, encode, Pixel, StegoError};
pub use processing::Carrier;
