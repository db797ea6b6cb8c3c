//! Protocol module - wire format, encoders, and decoder.
//!
//! This module implements the binary packet format:
//! - Typed arguments and their Big Endian payloads
//! - Message and bundle encoders with exact padding rules
//! - Recursive packet decoder with timetag propagation
//! - Size-prefixed packet framing for stream transports

mod argument;
mod bundle;
mod decoder;
mod message;
mod packet_buffer;
mod timetag;
mod wire_format;

pub use argument::{Argument, MidiMessage};
pub use bundle::Bundle;
pub use decoder::{decode, decode_with_timetag, is_bundle, ParsedMessage};
pub use message::Message;
pub use packet_buffer::{frame_packet, PacketBuffer};
pub use timetag::{NtpTime, Timetag, NTP_UNIX_OFFSET};
pub use wire_format::{
    blob_padding, format_bytes, padded_len, tags, BUNDLE_HEADER_SIZE, BUNDLE_TAG,
    DEFAULT_ADDRESS, DEFAULT_MAX_PACKET_SIZE, ELEMENT_SIZE_PREFIX, TYPE_TAG_PREFIX,
};
