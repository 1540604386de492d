//! # Pixel Bit-Plane Codec
//!
//! Reads and writes the least significant bit of every sample in a flat
//! pixel sequence.
//!
//! ## Visiting Order
//!
//! Samples are visited pixel by pixel in raster order, and inside a pixel in
//! channel order (R, G, B, A for color images). Flattened sample `i` carries
//! bit `i` of the stream:
//!
//! ```text
//! pixel 0: [R0 G0 B0]  pixel 1: [R1 G1 B1]  ...
//! bit:       0  1  2             3  4  5    ...
//! ```

use super::error::{Result, StegoError};
use super::frame::BitStream;

/// One pixel of a decoded raster image.
///
/// Grayscale images without alpha are ingested as [`Pixel::Scalar`], every
/// other layout as [`Pixel::Channels`]. Samples are stored as `u16` so that
/// both 8-bit and 16-bit channel depths share one representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pixel {
    Scalar(u16),
    Channels(Vec<u16>),
}

impl Pixel {
    /// Number of samples in this pixel.
    pub fn arity(&self) -> usize {
        match self {
            Pixel::Scalar(_) => 1,
            Pixel::Channels(samples) => samples.len(),
        }
    }

    /// The samples of this pixel in channel order.
    pub fn samples(&self) -> &[u16] {
        match self {
            Pixel::Scalar(value) => std::slice::from_ref(value),
            Pixel::Channels(samples) => samples,
        }
    }
}

/// Check that every pixel has the same, non-zero number of samples.
///
/// # Returns
/// - `Ok(arity)`: the shared arity (0 for an empty sequence)
/// - `Err(StegoError::UnsupportedPixelShape)`: first offending pixel
pub fn uniform_arity(pixels: &[Pixel]) -> Result<usize> {
    let Some(first) = pixels.first() else {
        return Ok(0);
    };
    let arity = first.arity();

    for (index, pixel) in pixels.iter().enumerate() {
        if pixel.arity() == 0 {
            return Err(StegoError::UnsupportedPixelShape {
                index,
                reason: "pixel has no samples".to_string(),
            });
        }
        if pixel.arity() != arity {
            return Err(StegoError::UnsupportedPixelShape {
                index,
                reason: format!("expected {} samples, found {}", arity, pixel.arity()),
            });
        }
    }

    Ok(arity)
}

/// Collect the LSB of every sample into a bit stream.
///
/// The returned stream has exactly one bit per sample, so its length equals
/// the capacity of the sequence.
///
/// # Errors
/// - `UnsupportedPixelShape` if the pixels do not share one arity
pub fn read_bits(pixels: &[Pixel]) -> Result<BitStream> {
    let arity = uniform_arity(pixels)?;

    let mut bits = BitStream::with_capacity(pixels.len() * arity);
    for pixel in pixels {
        for sample in pixel.samples() {
            bits.push(sample % 2 == 1);
        }
    }

    Ok(bits)
}

/// Produce a copy of `pixels` whose first `bits.len()` samples carry `bits`.
///
/// Each written sample only has its low bit replaced, so it moves by at most
/// one. Samples past the end of the stream are copied unchanged, as is any
/// bit that does not fit (the caller checks capacity first). The input is
/// never modified.
///
/// # Errors
/// - `UnsupportedPixelShape` if the pixels do not share one arity
pub fn write_bits(pixels: &[Pixel], bits: &BitStream) -> Result<Vec<Pixel>> {
    uniform_arity(pixels)?;

    let mut index = 0;
    let mut next_sample = |value: u16| {
        let updated = match bits.get(index) {
            Some(bit) => (value - value % 2) + bit as u16,
            None => value,
        };
        index += 1;
        updated
    };

    Ok(pixels
        .iter()
        .map(|pixel| match pixel {
            Pixel::Scalar(value) => Pixel::Scalar(next_sample(*value)),
            Pixel::Channels(samples) => {
                Pixel::Channels(samples.iter().map(|&value| next_sample(value)).collect())
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u16, g: u16, b: u16) -> Pixel {
        Pixel::Channels(vec![r, g, b])
    }

    #[test]
    fn test_read_bits_order() {
        let pixels = vec![rgb(1, 2, 3), rgb(4, 5, 255)];
        assert_eq!(read_bits(&pixels).unwrap().to_string(), "101011");
    }

    #[test]
    fn test_read_bits_scalar() {
        let pixels = vec![Pixel::Scalar(0), Pixel::Scalar(7), Pixel::Scalar(65535)];
        assert_eq!(read_bits(&pixels).unwrap().to_string(), "011");
    }

    #[test]
    fn test_read_bits_is_idempotent() {
        let pixels: Vec<Pixel> = (0..50).map(|i| rgb(i, i * 3, i * 7)).collect();
        assert_eq!(read_bits(&pixels).unwrap(), read_bits(&pixels).unwrap());
    }

    #[test]
    fn test_write_bits_sets_only_lsb() {
        let pixels = vec![rgb(10, 11, 255), rgb(0, 1, 128)];
        let bits = BitStream::from_bytes(&[0b1010_0100]);
        let written = write_bits(&pixels, &bits).unwrap();

        assert_eq!(written, vec![rgb(11, 10, 255), rgb(0, 0, 129)]);
        for (before, after) in pixels.iter().zip(&written) {
            for (a, b) in before.samples().iter().zip(after.samples()) {
                assert!(a.abs_diff(*b) <= 1);
                assert_eq!(a >> 1, b >> 1);
            }
        }
    }

    #[test]
    fn test_write_bits_passes_through_tail() {
        let pixels = vec![Pixel::Scalar(4), Pixel::Scalar(5), Pixel::Scalar(9)];
        let bits: BitStream = [true].into_iter().collect();
        let written = write_bits(&pixels, &bits).unwrap();
        assert_eq!(
            written,
            vec![Pixel::Scalar(5), Pixel::Scalar(5), Pixel::Scalar(9)]
        );
    }

    #[test]
    fn test_write_bits_sixteen_bit_samples() {
        let pixels = vec![Pixel::Channels(vec![65535, 65534, 1000, 1001])];
        let bits: BitStream = [false, true, true, false].into_iter().collect();
        let written = write_bits(&pixels, &bits).unwrap();
        assert_eq!(written, vec![Pixel::Channels(vec![65534, 65535, 1001, 1000])]);
    }

    #[test]
    fn test_write_then_read_recovers_bits() {
        let pixels: Vec<Pixel> = (0..40).map(|i| Pixel::Channels(vec![i; 4])).collect();
        let bits = BitStream::from_bytes(b"steg");
        let written = write_bits(&pixels, &bits).unwrap();
        let mut read = read_bits(&written).unwrap();
        read.truncate(bits.len());
        assert_eq!(read, bits);
    }

    #[test]
    fn test_rejects_mixed_arity() {
        let pixels = vec![rgb(1, 2, 3), Pixel::Channels(vec![1, 2, 3, 4])];
        let err = read_bits(&pixels).unwrap_err();
        assert!(matches!(
            err,
            StegoError::UnsupportedPixelShape { index: 1, .. }
        ));
        assert!(write_bits(&pixels, &BitStream::new()).is_err());
    }

    #[test]
    fn test_rejects_empty_channels() {
        let pixels = vec![Pixel::Channels(vec![])];
        assert!(matches!(
            read_bits(&pixels).unwrap_err(),
            StegoError::UnsupportedPixelShape { index: 0, .. }
        ));
    }

    #[test]
    fn test_empty_sequence() {
        assert!(read_bits(&[]).unwrap().is_empty());
        assert!(write_bits(&[], &BitStream::new()).unwrap().is_empty());
    }
}
