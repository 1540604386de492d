//! Error types for the LSB codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, StegoError>;

/// Errors that can occur while framing, embedding or recovering a message.
///
/// Every variant is detected synchronously and none of them is transient:
/// retrying the same call with the same input always yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The message could not be serialized to UTF-8 bytes.
    #[error("Encoding error: message is not valid UTF-8 ({0})")]
    Encoding(String),

    /// A pixel is not a scalar or a uniform, non-empty tuple of samples.
    #[error("Unsupported pixel shape at pixel {index}: {reason}")]
    UnsupportedPixelShape { index: usize, reason: String },

    /// The framed message needs more bits than the pixels can carry.
    #[error("Message too large: need {required} bits, image has capacity for {capacity}")]
    MessageTooLarge { required: usize, capacity: usize },

    /// The bit stream length is not a multiple of 8.
    #[error("Malformed bit stream: {bits} bits is not a whole number of bytes")]
    MalformedStream { bits: usize },

    /// The recovered bytes do not begin with the frame token.
    #[error("No hidden message: stream does not start with the frame token")]
    MissingStartToken,

    /// No closing frame token follows a non-empty payload.
    #[error("No hidden message: stream does not end with the frame token")]
    MissingEndToken,

    /// The bytes between the tokens are not valid UTF-8.
    #[error("No hidden message: payload is not valid UTF-8")]
    InvalidPayloadEncoding,
}

impl StegoError {
    /// Returns true for the errors that mean "this image holds no message".
    ///
    /// Callers surface all three the same way; decoding an image without
    /// an embedded message is an expected outcome.
    pub fn is_no_message(&self) -> bool {
        matches!(
            self,
            StegoError::MissingStartToken
                | StegoError::MissingEndToken
                | StegoError::InvalidPayloadEncoding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_message_grouping() {
        assert!(StegoError::MissingStartToken.is_no_message());
        assert!(StegoError::MissingEndToken.is_no_message());
        assert!(StegoError::InvalidPayloadEncoding.is_no_message());
        assert!(!StegoError::MalformedStream { bits: 7 }.is_no_message());
        assert!(!StegoError::MessageTooLarge {
            required: 301,
            capacity: 300
        }
        .is_no_message());
    }

    #[test]
    fn test_display_mentions_sizes() {
        let err = StegoError::MessageTooLarge {
            required: 320,
            capacity: 300,
        };
        let text = err.to_string();
        assert!(text.contains("320"));
        assert!(text.contains("300"));
    }
}
