//! Wire format constants and alignment rules.
//!
//! Message layout:
//! ```text
//! ┌──────────────────┬──────────────────┬─────────────────────┐
//! │ address\0 [pad]  │ ,types\0 [pad]   │ argument payloads   │
//! │ 4-byte aligned   │ 4-byte aligned   │ in declared order   │
//! └──────────────────┴──────────────────┴─────────────────────┘
//! ```
//!
//! Bundle layout:
//! ```text
//! ┌──────────┬──────────────┬──────────┬──────────┬─────┐
//! │ #bundle\0│ NTP timetag  │ Length   │ Element  │ ... │
//! │ 8 bytes  │ 8 bytes BE   │ u32 BE   │ N bytes  │     │
//! └──────────┴──────────────┴──────────┴──────────┴─────┘
//! ```
//!
//! All multi-byte numbers are Big Endian.

use std::fmt::Write;

/// Marker that opens every bundle.
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Size of the bundle header (marker + timetag).
pub const BUNDLE_HEADER_SIZE: usize = 16;

/// Size of a bundle element length prefix.
pub const ELEMENT_SIZE_PREFIX: usize = 4;

/// First byte of every type-tag string.
pub const TYPE_TAG_PREFIX: u8 = b',';

/// Address used when a message is encoded with an empty address.
pub const DEFAULT_ADDRESS: &str = "/oscwire";

/// Default maximum size for a single stream packet (1 MiB).
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1024 * 1024;

/// Type tag characters.
pub mod tags {
    /// 32-bit big-endian two's complement integer.
    pub const INT32: u8 = b'i';
    /// 32-bit big-endian IEEE 754 float.
    pub const FLOAT32: u8 = b'f';
    /// Null-terminated, padded string.
    pub const STRING: u8 = b's';
    /// Length-prefixed byte blob.
    pub const BLOB: u8 = b'b';
    /// 64-bit NTP timestamp.
    pub const TIMETAG: u8 = b't';
    /// Boolean true, no payload.
    pub const TRUE: u8 = b'T';
    /// Boolean false, no payload.
    pub const FALSE: u8 = b'F';
    /// Nil, no payload.
    pub const NIL: u8 = b'N';
    /// Impulse (infinitum), no payload.
    pub const IMPULSE: u8 = b'I';
    /// 64-bit big-endian two's complement integer.
    pub const INT64: u8 = b'h';
    /// 64-bit big-endian IEEE 754 double.
    pub const FLOAT64: u8 = b'd';
    /// ASCII character sent as 32 bits.
    pub const CHAR: u8 = b'c';
    /// 32-bit RGBA color.
    pub const COLOR: u8 = b'r';
    /// 4-byte MIDI message: port, status, data1, data2.
    pub const MIDI: u8 = b'm';
    /// Alternate string type ("symbol").
    pub const SYMBOL: u8 = b'S';

    /// Check whether a tag carries no payload bytes.
    #[inline]
    pub fn is_payloadless(tag: u8) -> bool {
        matches!(tag, TRUE | FALSE | NIL | IMPULSE)
    }
}

/// Length of a null-padded string field holding `len` raw bytes.
///
/// Always adds between 1 and 4 null bytes, so a 4-aligned length still
/// gains a full block of padding. This keeps the terminator inside the field.
///
/// # Example
///
/// ```
/// use oscwire::protocol::padded_len;
///
/// assert_eq!(padded_len(3), 4);
/// assert_eq!(padded_len(4), 8);
/// assert_eq!(padded_len(0), 4);
/// ```
#[inline]
pub fn padded_len(len: usize) -> usize {
    len + (4 - len % 4)
}

/// Number of zero bytes that follow a blob of `len` bytes (0-3).
#[inline]
pub fn blob_padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Format bytes as hex, 4-byte groups, 16 bytes per line.
///
/// Used for `trace!` dumps of raw packets.
pub fn format_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + bytes.len() / 4);
    for (i, byte) in bytes.iter().enumerate() {
        let _ = write!(out, "{:02x}", byte);
        if i + 1 == bytes.len() {
            break;
        }
        if i % 16 == 15 {
            out.push('\n');
        } else if i % 4 == 3 {
            out.push_str("  ");
        } else {
            out.push(' ');
        }
    }
    out
}
