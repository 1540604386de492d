//! # Encode / Decode Pipelines
//!
//! ```text
//! encode: message -> frame -> check_fits -> write_bits -> new pixels
//! decode: pixels  -> read_bits -> unframe -> message
//! ```
//!
//! Both pipelines are pure: they borrow their input, return fresh values and
//! keep no state between calls, so they can run on independent inputs from
//! any number of threads.

use log::Level;

use super::bitplane::{read_bits, write_bits, Pixel};
use super::capacity::{capacity, check_fits};
use super::error::Result;
use super::frame::{frame, unframe};
use super::report::{Reporter, SilentReporter};

/// How many leading pixels are echoed to the reporter before and after encoding.
const PREVIEW_PIXELS: usize = 10;

/// Hide `message` in a copy of `pixels` without reporting.
pub fn encode(pixels: &[Pixel], message: &[u8]) -> Result<Vec<Pixel>> {
    encode_with(pixels, message, &SilentReporter)
}

/// Hide `message` in a copy of `pixels`.
///
/// # Arguments
/// - `pixels`: Carrier pixels in raster order
/// - `message`: UTF-8 message bytes
/// - `reporter`: Receives progress and diagnostic events
///
/// # Returns
/// - `Ok(Vec<Pixel>)`: Pixels of the same shape carrying the framed message
/// - `Err`: `Encoding`, `MessageTooLarge` or `UnsupportedPixelShape`
///
/// Capacity is checked before anything is written, so on error no encoded
/// pixels are produced at all.
pub fn encode_with(
    pixels: &[Pixel],
    message: &[u8],
    reporter: &dyn Reporter,
) -> Result<Vec<Pixel>> {
    let bits = frame(message)?;
    reporter.report(
        Level::Debug,
        format_args!("Message converted to binary format: {}", bits),
    );

    if let Err(e) = check_fits(&bits, pixels) {
        reporter.report(
            Level::Error,
            format_args!("The image is not big enough to fit the message: {}", e),
        );
        return Err(e);
    }
    reporter.report(
        Level::Info,
        format_args!(
            "Message needs {} of {} available bits",
            bits.len(),
            capacity(pixels)
        ),
    );

    report_preview(reporter, "input", pixels);
    let encoded = write_bits(pixels, &bits)?;
    report_preview(reporter, "encoded", &encoded);

    reporter.report(
        Level::Info,
        format_args!("Message encoded correctly inside the image"),
    );
    Ok(encoded)
}

/// Recover the hidden message from `pixels` without reporting.
pub fn decode(pixels: &[Pixel]) -> Result<String> {
    decode_with(pixels, &SilentReporter)
}

/// Recover the hidden message from `pixels`.
///
/// Trailing bits that do not make up a whole byte are dropped before the
/// frame is parsed; a frame is always byte aligned, so they can never be
/// part of it. A sequence without an embedded message fails with one of the
/// errors for which [`StegoError::is_no_message`](super::StegoError::is_no_message)
/// is true.
pub fn decode_with(pixels: &[Pixel], reporter: &dyn Reporter) -> Result<String> {
    let mut bits = read_bits(pixels)?;
    reporter.report(
        Level::Info,
        format_args!("Extracted the LSBs of {} samples", bits.len()),
    );

    let aligned = bits.len() - bits.len() % 8;
    bits.truncate(aligned);

    match unframe(&bits) {
        Ok(message) => {
            reporter.report(
                Level::Info,
                format_args!("Secret message found inside the image ({} bytes)", message.len()),
            );
            Ok(message)
        }
        Err(e) => {
            reporter.report(Level::Warn, format_args!("{}", e));
            Err(e)
        }
    }
}

fn report_preview(reporter: &dyn Reporter, label: &str, pixels: &[Pixel]) {
    for (index, pixel) in pixels.iter().take(PREVIEW_PIXELS).enumerate() {
        reporter.report(
            Level::Debug,
            format_args!("{} pixel {} -> {:?}", label, index, pixel.samples()),
        );
    }
}
