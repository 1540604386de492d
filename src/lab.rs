//! # File Workflow
//!
//! Encode a text file into an image file and decode it back, the way the
//! command-line tool and the web service use the codec.
//!
//! ## Status Codes
//!
//! Every failure maps to a stable numeric code (see [`LabError::code`]) that
//! the CLI uses as its process exit status. Success is 0.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 1    | image extension not supported             |
//! | 2    | JPEG could not be converted               |
//! | 3    | image could not be opened                 |
//! | 4    | message file could not be read            |
//! | 5    | message could not be converted to bits    |
//! | 6    | pixels could not be extracted             |
//! | 7    | message could not be embedded             |
//! | 8    | encoded image could not be saved          |
//! | 9    | no valid message found in the image       |
//! | 10   | recovered message could not be saved      |
//! | 11   | message too large for the image           |

use log::Level;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::codec::{self, Reporter, StegoError};
use crate::processing::{Carrier, CarrierError, ImageKind};

/// Default output image name for the CLI.
pub const DEFAULT_ENCODE_OUTPUT: &str = "encoded.png";

/// Default output message name.
pub const DEFAULT_DECODE_OUTPUT: &str = "secret.txt";

/// Errors of the file-level encode and decode workflow.
#[derive(Error, Debug)]
pub enum LabError {
    #[error("the extension of {0} is not supported, please provide a PNG or JPEG image")]
    NotSupported(PathBuf),

    #[error("could not convert image from JPEG to PNG: {0}")]
    Conversion(#[source] CarrierError),

    #[error("could not open the image: {0}")]
    Open(#[source] CarrierError),

    #[error("could not read the message from {path}: {source}")]
    ReadMessage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not convert the message to binary format: {0}")]
    StrToBin(#[source] StegoError),

    #[error("could not extract pixels from image: {0}")]
    ExtractPixels(#[source] CarrierError),

    #[error("could not encode the message inside the image: {0}")]
    Encoding(#[source] StegoError),

    #[error("could not save the encoded image: {0}")]
    SaveImage(#[source] CarrierError),

    #[error("no secret message was found inside the image: {0}")]
    ExtractMessage(#[source] StegoError),

    #[error("could not write secret message to {path}: {source}")]
    SaveMessage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the image is not big enough to fit the message: {0}")]
    MessageTooLarge(#[source] StegoError),
}

impl LabError {
    /// Numeric status code for this failure.
    pub fn code(&self) -> u8 {
        match self {
            LabError::NotSupported(_) => 1,
            LabError::Conversion(_) => 2,
            LabError::Open(_) => 3,
            LabError::ReadMessage { .. } => 4,
            LabError::StrToBin(_) => 5,
            LabError::ExtractPixels(_) => 6,
            LabError::Encoding(_) => 7,
            LabError::SaveImage(_) => 8,
            LabError::ExtractMessage(_) => 9,
            LabError::SaveMessage { .. } => 10,
            LabError::MessageTooLarge(_) => 11,
        }
    }
}

/// Hide the text of `message_path` inside `image_path` and write a PNG.
///
/// # Arguments
/// - `image_path`: PNG or JPEG carrier (JPEG is converted to a lossless carrier first)
/// - `message_path`: UTF-8 text file with the secret message
/// - `output_path`: Where the encoded PNG is written
/// - `reporter`: Receives progress events
///
/// # Errors
/// Any [`LabError`] except `ExtractMessage` and `SaveMessage`. Nothing is
/// written to `output_path` unless the whole message fits.
pub fn encode_file(
    image_path: &Path,
    message_path: &Path,
    output_path: &Path,
    reporter: &dyn Reporter,
) -> Result<(), LabError> {
    let kind = ImageKind::from_path(image_path)
        .ok_or_else(|| LabError::NotSupported(image_path.to_path_buf()))?;

    let image = image::open(image_path).map_err(|e| match kind {
        ImageKind::Jpeg => LabError::Conversion(CarrierError::Load(e)),
        ImageKind::Png => LabError::Open(CarrierError::Load(e)),
    })?;
    match kind {
        ImageKind::Jpeg => reporter.report(
            Level::Info,
            format_args!("JPEG image has been converted to PNG"),
        ),
        ImageKind::Png => reporter.report(
            Level::Info,
            format_args!("PNG image, no conversion needed"),
        ),
    }

    let message = fs::read_to_string(message_path).map_err(|source| LabError::ReadMessage {
        path: message_path.to_path_buf(),
        source,
    })?;
    reporter.report(
        Level::Info,
        format_args!("Message read from file ({} bytes)", message.len()),
    );

    let carrier = Carrier::from_image(&image).map_err(LabError::ExtractPixels)?;
    reporter.report(
        Level::Info,
        format_args!(
            "Pixels extracted from {}x{} {:?} image",
            carrier.width, carrier.height, carrier.mode
        ),
    );

    let encoded = codec::encode_with(&carrier.pixels, message.as_bytes(), reporter).map_err(
        |e| match e {
            StegoError::MessageTooLarge { .. } => LabError::MessageTooLarge(e),
            StegoError::Encoding(_) => LabError::StrToBin(e),
            _ => LabError::Encoding(e),
        },
    )?;

    carrier
        .with_pixels(encoded)
        .save_png(output_path)
        .map_err(LabError::SaveImage)?;
    reporter.report(
        Level::Info,
        format_args!("Encoded image written to {}", output_path.display()),
    );

    Ok(())
}

/// Recover the message hidden in `image_path` and write it to `output_path`.
///
/// # Returns
/// - `Ok(String)`: The recovered message, also written to `output_path`
/// - `Err(LabError::ExtractMessage)`: the image carries no valid message
pub fn decode_file(
    image_path: &Path,
    output_path: &Path,
    reporter: &dyn Reporter,
) -> Result<String, LabError> {
    let image = image::open(image_path).map_err(|e| LabError::Open(CarrierError::Load(e)))?;
    reporter.report(Level::Info, format_args!("Image opened correctly"));

    let carrier = Carrier::from_image(&image).map_err(LabError::ExtractPixels)?;

    let message =
        codec::decode_with(&carrier.pixels, reporter).map_err(LabError::ExtractMessage)?;

    fs::write(output_path, &message).map_err(|source| LabError::SaveMessage {
        path: output_path.to_path_buf(),
        source,
    })?;
    reporter.report(
        Level::Info,
        format_args!("Secret message written to {}", output_path.display()),
    );

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let too_large = StegoError::MessageTooLarge {
            required: 10,
            capacity: 1,
        };
        assert_eq!(LabError::NotSupported(PathBuf::from("a.gif")).code(), 1);
        assert_eq!(LabError::MessageTooLarge(too_large).code(), 11);
        assert_eq!(
            LabError::ExtractMessage(StegoError::MissingStartToken).code(),
            9
        );
        assert_eq!(
            LabError::SaveMessage {
                path: PathBuf::from("x"),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            }
            .code(),
            10
        );
    }
}
