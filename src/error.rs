//! Error types for oscwire.

use thiserror::Error;

/// Main error type for all oscwire operations.
///
/// Every decode failure aborts the whole decode call; the variant only
/// describes the first problem found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OscError {
    /// A bundle element declares more bytes than the bundle has left.
    #[error("Truncated bundle: element declares {declared} bytes, {remaining} remaining")]
    TruncatedBundle {
        /// Element length read from the wire.
        declared: usize,
        /// Bytes actually left in the enclosing bundle.
        remaining: usize,
    },

    /// The address string has no null terminator inside the packet.
    #[error("Malformed address: missing null terminator")]
    MalformedAddress,

    /// The type-tag string does not start with `,`.
    #[error("Missing type tag prefix ','")]
    MissingTypeTagPrefix,

    /// The type-tag string has no null terminator inside the packet.
    #[error("Malformed type tags: missing null terminator")]
    MalformedTypes,

    /// An argument payload runs past the end of the packet.
    #[error("Truncated argument '{tag}': needs {needed} bytes, {remaining} remaining")]
    TruncatedArgument {
        /// Type tag of the argument being read.
        tag: char,
        /// Bytes required by the argument.
        needed: usize,
        /// Bytes left in the packet.
        remaining: usize,
    },

    /// A string argument has no null terminator inside the packet.
    #[error("Unterminated string argument '{tag}'")]
    UnterminatedString {
        /// Type tag of the string argument (`s` or `S`).
        tag: char,
    },

    /// Type tag outside the supported vocabulary.
    #[error("Unsupported type tag '{0}'")]
    UnsupportedTypeTag(char),

    /// A stream packet exceeds the configured maximum size.
    #[error("Packet size {size} exceeds maximum {max}")]
    PacketTooLarge {
        /// Size declared by the packet prefix.
        size: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Result type alias using OscError.
pub type Result<T> = std::result::Result<T, OscError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OscError::TruncatedBundle {
            declared: 32,
            remaining: 8,
        };
        assert_eq!(
            err.to_string(),
            "Truncated bundle: element declares 32 bytes, 8 remaining"
        );

        let err = OscError::TruncatedArgument {
            tag: 'i',
            needed: 4,
            remaining: 2,
        };
        assert!(err.to_string().contains("needs 4 bytes"));
        assert_eq!(
            OscError::UnsupportedTypeTag('x').to_string(),
            "Unsupported type tag 'x'"
        );
    }
}
