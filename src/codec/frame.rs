//! # Message Framing
//!
//! Converts a text message to and from the self-delimiting bit stream that
//! gets written into the pixel LSBs.
//!
//! ## Frame Layout
//!
//! ```text
//! [5 bytes: "$$$$$"] [N bytes: UTF-8 message] [5 bytes: "$$$$$"]
//! ```
//!
//! Every byte is flattened into 8 bits, most significant bit first. The same
//! token opens and closes the frame and is never escaped, so the first token
//! found after the opening one ends the message.

use std::fmt;

use super::error::{Result, StegoError};

/// Delimiter written before and after the message bytes.
pub const FRAME_TOKEN: &[u8] = b"$$$$$";

/// Number of bits in one byte of the frame.
const BITS_PER_BYTE: usize = 8;

/// Ordered sequence of bits, one per steganographable sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    /// Create an empty bit stream.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Create an empty bit stream with room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Flatten bytes into bits, most significant bit first within each byte.
    ///
    /// # Example
    /// ```
    /// use lsb_stego::codec::BitStream;
    ///
    /// let bits = BitStream::from_bytes(b"$");
    /// assert_eq!(bits.to_string(), "00100100");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut stream = Self::with_capacity(bytes.len() * BITS_PER_BYTE);
        for byte in bytes {
            for shift in (0..BITS_PER_BYTE).rev() {
                stream.push((byte >> shift) & 1 == 1);
            }
        }
        stream
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at position `index`, if present.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Drop every bit past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.bits.truncate(len);
    }

    /// Reassemble the bits into bytes, 8 at a time.
    ///
    /// # Errors
    /// - `MalformedStream` if the bit count is not a multiple of 8
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.bits.len() % BITS_PER_BYTE != 0 {
            return Err(StegoError::MalformedStream {
                bits: self.bits.len(),
            });
        }

        Ok(self
            .bits
            .chunks(BITS_PER_BYTE)
            .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
            .collect())
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Renders the stream as a string of `'0'` and `'1'` characters.
impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Wrap a message in frame tokens and flatten it into a bit stream.
///
/// # Arguments
/// - `message`: Raw message bytes, which must be valid UTF-8 text
///
/// # Returns
/// - `Ok(BitStream)`: `(message.len() + 10) * 8` bits
/// - `Err(StegoError::Encoding)`: the bytes are not UTF-8 text
pub fn frame(message: &[u8]) -> Result<BitStream> {
    std::str::from_utf8(message).map_err(|e| StegoError::Encoding(e.to_string()))?;

    let mut framed = Vec::with_capacity(message.len() + 2 * FRAME_TOKEN.len());
    framed.extend_from_slice(FRAME_TOKEN);
    framed.extend_from_slice(message);
    framed.extend_from_slice(FRAME_TOKEN);

    Ok(BitStream::from_bytes(&framed))
}

/// Recover the message carried by a framed bit stream.
///
/// The stream must start with [`FRAME_TOKEN`]. The message ends at the first
/// later occurrence of the token, so a message that itself contains the
/// token comes back truncated at that point. An empty message (closing token
/// directly after the opening one) is rejected as `MissingEndToken`.
///
/// # Errors
/// - `MalformedStream`: bit count is not byte aligned
/// - `MissingStartToken`: the first 5 bytes are not the token
/// - `MissingEndToken`: no closing token after a non-empty payload
/// - `InvalidPayloadEncoding`: the payload is not valid UTF-8
pub fn unframe(bits: &BitStream) -> Result<String> {
    let bytes = bits.to_bytes()?;

    let rest = bytes
        .strip_prefix(FRAME_TOKEN)
        .ok_or(StegoError::MissingStartToken)?;

    let end = match find_token(rest) {
        Some(position) if position > 0 => position,
        _ => return Err(StegoError::MissingEndToken),
    };

    String::from_utf8(rest[..end].to_vec()).map_err(|_| StegoError::InvalidPayloadEncoding)
}

/// Offset of the first frame token in `haystack`.
fn find_token(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(FRAME_TOKEN.len())
        .position(|window| window == FRAME_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(bytes: &[u8]) -> BitStream {
        BitStream::from_bytes(bytes)
    }

    #[test]
    fn test_msb_first_flattening() {
        assert_eq!(bits_of(&[0b1000_0001]).to_string(), "10000001");
        assert_eq!(bits_of(b"A").to_string(), "01000001");
    }

    #[test]
    fn test_frame_hi_is_96_bits() {
        let bits = frame(b"hi").unwrap();
        assert_eq!(bits.len(), 96);
        assert_eq!(bits.to_bytes().unwrap(), b"$$$$$hi$$$$$".to_vec());
    }

    #[test]
    fn test_frame_rejects_invalid_utf8() {
        let err = frame(&[0x66, 0xff, 0x6f]).unwrap_err();
        assert!(matches!(err, StegoError::Encoding(_)));
    }

    #[test]
    fn test_unframe_recovers_message() {
        let bits = frame("héllo wörld".as_bytes()).unwrap();
        assert_eq!(unframe(&bits).unwrap(), "héllo wörld");
    }

    #[test]
    fn test_unframe_ignores_trailing_bytes() {
        let bits = bits_of(b"$$$$$secret$$$$$garbage after the frame");
        assert_eq!(unframe(&bits).unwrap(), "secret");
    }

    #[test]
    fn test_unframe_requires_byte_alignment() {
        let mut bits = frame(b"hi").unwrap();
        bits.push(true);
        assert_eq!(
            unframe(&bits).unwrap_err(),
            StegoError::MalformedStream { bits: 97 }
        );
    }

    #[test]
    fn test_unframe_missing_start_token() {
        let bits = bits_of(b"$$$$Xhi$$$$$");
        assert_eq!(unframe(&bits).unwrap_err(), StegoError::MissingStartToken);

        // Too short to even hold the token.
        assert_eq!(
            unframe(&bits_of(b"$$")).unwrap_err(),
            StegoError::MissingStartToken
        );
    }

    #[test]
    fn test_unframe_missing_end_token() {
        let bits = bits_of(b"$$$$$hi there$$$$");
        assert_eq!(unframe(&bits).unwrap_err(), StegoError::MissingEndToken);
    }

    #[test]
    fn test_unframe_rejects_empty_message() {
        let bits = frame(b"").unwrap();
        assert_eq!(unframe(&bits).unwrap_err(), StegoError::MissingEndToken);
    }

    #[test]
    fn test_unframe_truncates_at_embedded_token() {
        let bits = frame(b"cost: $$$$$5").unwrap();
        assert_eq!(unframe(&bits).unwrap(), "cost: ");
    }

    #[test]
    fn test_unframe_invalid_payload() {
        let mut raw = FRAME_TOKEN.to_vec();
        raw.extend_from_slice(&[0xc3, 0x28]);
        raw.extend_from_slice(FRAME_TOKEN);
        assert_eq!(
            unframe(&bits_of(&raw)).unwrap_err(),
            StegoError::InvalidPayloadEncoding
        );
    }
}
