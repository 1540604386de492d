//! Capacity planning: how many message bits a pixel sequence can carry.

use super::bitplane::Pixel;
use super::error::{Result, StegoError};
use super::frame::BitStream;

/// Number of LSB slots in `pixels`: first pixel's arity times pixel count.
///
/// The arity of the first pixel is trusted for the whole sequence. A
/// sequence with mixed arities gets a meaningless capacity here and is
/// rejected later by [`read_bits`](super::bitplane::read_bits) and
/// [`write_bits`](super::bitplane::write_bits).
pub fn capacity(pixels: &[Pixel]) -> usize {
    pixels
        .first()
        .map_or(0, |first| first.arity() * pixels.len())
}

/// Fail with `MessageTooLarge` when `bits` does not fit into `pixels`.
///
/// Must run before any call to `write_bits` so that an oversized message
/// never produces a partially encoded image.
pub fn check_fits(bits: &BitStream, pixels: &[Pixel]) -> Result<()> {
    let available = capacity(pixels);
    if bits.len() > available {
        return Err(StegoError::MessageTooLarge {
            required: bits.len(),
            capacity: available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::frame::frame;

    #[test]
    fn test_capacity_by_shape() {
        assert_eq!(capacity(&[]), 0);
        assert_eq!(capacity(&vec![Pixel::Scalar(0); 96]), 96);
        assert_eq!(capacity(&vec![Pixel::Channels(vec![0; 3]); 100]), 300);
        assert_eq!(capacity(&vec![Pixel::Channels(vec![0; 4]); 24]), 96);
    }

    #[test]
    fn test_hi_needs_96_slots() {
        let bits = frame(b"hi").unwrap();

        assert!(check_fits(&bits, &vec![Pixel::Scalar(0); 96]).is_ok());
        assert!(check_fits(&bits, &vec![Pixel::Channels(vec![0; 4]); 24]).is_ok());
        assert_eq!(
            check_fits(&bits, &vec![Pixel::Scalar(0); 95]).unwrap_err(),
            StegoError::MessageTooLarge {
                required: 96,
                capacity: 95
            }
        );
    }

    #[test]
    fn test_ten_by_ten_rgb_limit() {
        let pixels = vec![Pixel::Channels(vec![0; 3]); 100];

        // 300 bits hold 37 whole bytes: 10 bytes of tokens plus 27 of text.
        let fits = frame("a".repeat(27).as_bytes()).unwrap();
        assert_eq!(fits.len(), 296);
        assert!(check_fits(&fits, &pixels).is_ok());

        let too_big = frame("a".repeat(28).as_bytes()).unwrap();
        assert!(matches!(
            check_fits(&too_big, &pixels),
            Err(StegoError::MessageTooLarge {
                required: 304,
                capacity: 300
            })
        ));
    }
}
