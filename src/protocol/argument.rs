//! Typed argument values.
//!
//! An [`Argument`] is one self-describing unit of message payload. Scalars are
//! stored inline; strings and blobs own their buffers, so cloning an argument
//! never aliases another argument's data.
//!
//! # Example
//!
//! ```
//! use oscwire::protocol::Argument;
//!
//! let arg = Argument::from("hello");
//! assert_eq!(arg.type_tag(), 's');
//! assert_eq!(arg.size(), 5);
//!
//! let arg = Argument::from(42i32);
//! assert_eq!(arg.as_i32(), Some(42));
//! ```

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use super::timetag::NtpTime;
use super::wire_format::{blob_padding, padded_len, tags};

/// 4-byte MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MidiMessage {
    /// Port id.
    pub port: u8,
    /// Status byte.
    pub status: u8,
    /// First data byte.
    pub data1: u8,
    /// Second data byte.
    pub data2: u8,
}

impl MidiMessage {
    /// Create a new MIDI message.
    pub fn new(port: u8, status: u8, data1: u8, data2: u8) -> Self {
        Self {
            port,
            status,
            data1,
            data2,
        }
    }

    /// Wire representation.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.port, self.status, self.data1, self.data2]
    }

    /// Build from wire bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A typed argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    /// `i` - 32-bit integer.
    Int32(i32),
    /// `f` - 32-bit float.
    Float32(f32),
    /// `s` - string.
    String(String),
    /// `b` - binary blob.
    Blob(Vec<u8>),
    /// `t` - NTP timestamp.
    Time(NtpTime),
    /// `T` - true.
    True,
    /// `F` - false.
    False,
    /// `N` - nil.
    Nil,
    /// `I` - impulse.
    Impulse,
    /// `h` - 64-bit integer.
    Int64(i64),
    /// `d` - 64-bit float.
    Float64(f64),
    /// `c` - ASCII character.
    Char(u8),
    /// `r` - 32-bit RGBA color.
    Color(u32),
    /// `m` - MIDI message.
    Midi(MidiMessage),
    /// `S` - alternate string ("symbol").
    Symbol(String),
}

impl Argument {
    /// Type tag byte for this argument.
    pub fn tag(&self) -> u8 {
        match self {
            Argument::Int32(_) => tags::INT32,
            Argument::Float32(_) => tags::FLOAT32,
            Argument::String(_) => tags::STRING,
            Argument::Blob(_) => tags::BLOB,
            Argument::Time(_) => tags::TIMETAG,
            Argument::True => tags::TRUE,
            Argument::False => tags::FALSE,
            Argument::Nil => tags::NIL,
            Argument::Impulse => tags::IMPULSE,
            Argument::Int64(_) => tags::INT64,
            Argument::Float64(_) => tags::FLOAT64,
            Argument::Char(_) => tags::CHAR,
            Argument::Color(_) => tags::COLOR,
            Argument::Midi(_) => tags::MIDI,
            Argument::Symbol(_) => tags::SYMBOL,
        }
    }

    /// Type tag as a `char`.
    #[inline]
    pub fn type_tag(&self) -> char {
        self.tag() as char
    }

    /// Payload size in bytes, excluding length prefixes and padding.
    ///
    /// Strings report their length without the terminator; a char reports 1.
    pub fn size(&self) -> usize {
        match self {
            Argument::Int32(_)
            | Argument::Float32(_)
            | Argument::Color(_)
            | Argument::Midi(_) => 4,
            Argument::Int64(_) | Argument::Float64(_) | Argument::Time(_) => 8,
            Argument::String(s) | Argument::Symbol(s) => s.len(),
            Argument::Blob(b) => b.len(),
            Argument::Char(_) => 1,
            Argument::True | Argument::False | Argument::Nil | Argument::Impulse => 0,
        }
    }

    /// Number of bytes this argument occupies in an encoded message.
    pub fn encoded_len(&self) -> usize {
        match self {
            Argument::String(s) | Argument::Symbol(s) => padded_len(s.len()),
            Argument::Blob(b) => 4 + b.len() + blob_padding(b.len()),
            Argument::Char(_) => 4,
            other => other.size(),
        }
    }

    /// Append the payload bytes (not the tag) to `buf`.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        match self {
            Argument::Int32(v) => buf.put_i32(*v),
            Argument::Float32(v) => buf.put_f32(*v),
            Argument::String(s) | Argument::Symbol(s) => put_padded(buf, s.as_bytes()),
            Argument::Blob(b) => {
                buf.put_u32(b.len() as u32);
                buf.put_slice(b);
                buf.put_bytes(0, blob_padding(b.len()));
            }
            Argument::Time(t) => buf.put_u64(t.0),
            Argument::True | Argument::False | Argument::Nil | Argument::Impulse => {}
            Argument::Int64(v) => buf.put_i64(*v),
            Argument::Float64(v) => buf.put_f64(*v),
            Argument::Char(c) => buf.put_u32(*c as u32),
            Argument::Color(v) => buf.put_u32(*v),
            Argument::Midi(m) => buf.put_slice(&m.to_bytes()),
        }
    }

    /// Get the value as `i32`.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Argument::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as `f32`.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Argument::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Argument::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Argument::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get string or symbol contents.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(s) | Argument::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get blob contents.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Argument::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Get a boolean from `T` / `F`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Argument::True => Some(true),
            Argument::False => Some(false),
            _ => None,
        }
    }
}

/// Write `data` followed by 1-4 null bytes so the field stays 4-aligned.
pub(crate) fn put_padded<B: BufMut>(buf: &mut B, data: &[u8]) {
    buf.put_slice(data);
    buf.put_bytes(0, padded_len(data.len()) - data.len());
}

impl From<i32> for Argument {
    fn from(v: i32) -> Self {
        Argument::Int32(v)
    }
}

impl From<f32> for Argument {
    fn from(v: f32) -> Self {
        Argument::Float32(v)
    }
}

impl From<i64> for Argument {
    fn from(v: i64) -> Self {
        Argument::Int64(v)
    }
}

impl From<f64> for Argument {
    fn from(v: f64) -> Self {
        Argument::Float64(v)
    }
}

impl From<bool> for Argument {
    fn from(v: bool) -> Self {
        if v {
            Argument::True
        } else {
            Argument::False
        }
    }
}

impl From<&str> for Argument {
    fn from(v: &str) -> Self {
        Argument::String(v.to_string())
    }
}

impl From<String> for Argument {
    fn from(v: String) -> Self {
        Argument::String(v)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(v: Vec<u8>) -> Self {
        Argument::Blob(v)
    }
}

impl From<&[u8]> for Argument {
    fn from(v: &[u8]) -> Self {
        Argument::Blob(v.to_vec())
    }
}

impl From<NtpTime> for Argument {
    fn from(v: NtpTime) -> Self {
        Argument::Time(v)
    }
}

impl From<MidiMessage> for Argument {
    fn from(v: MidiMessage) -> Self {
        Argument::Midi(v)
    }
}
