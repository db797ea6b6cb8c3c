//! Packet decoder.
//!
//! Turns a raw packet (a single message or a bundle) into a flat list of
//! [`ParsedMessage`]s. Bundles are unwrapped recursively over sub-slices of
//! the original buffer; every leaf message inherits the timetag of its
//! nearest enclosing bundle, or the caller's default at the top level.
//!
//! Any malformed element fails the whole call and no partial output is
//! returned.
//!
//! # Example
//!
//! ```
//! use oscwire::protocol::{decode, Bundle, Message, Timetag};
//!
//! let mut msg = Message::new("/fader/3");
//! msg.append_f32(0.25);
//!
//! let mut bundle = Bundle::new();
//! bundle.append_message(&msg);
//! bundle.append_message(&msg);
//!
//! let messages = decode(bundle.bytes()).unwrap();
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[0].address, "/fader/3");
//! assert_eq!(messages[0].types, "f");
//! assert_eq!(messages[1].timetag, Timetag::ZERO);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::argument::{Argument, MidiMessage};
use super::timetag::{NtpTime, Timetag};
use super::wire_format::{
    blob_padding, format_bytes, padded_len, tags, BUNDLE_HEADER_SIZE, BUNDLE_TAG,
    ELEMENT_SIZE_PREFIX, TYPE_TAG_PREFIX,
};
use crate::error::{OscError, Result};

/// One decoded leaf message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Effective timetag (inherited from the enclosing bundle).
    pub timetag: Timetag,
    /// Address the message was sent to.
    pub address: String,
    /// Type-tag string without the leading comma.
    pub types: String,
    /// Arguments, one per type tag.
    pub args: Vec<Argument>,
}

/// Decode a packet with the immediate timetag as the default.
pub fn decode(packet: &[u8]) -> Result<Vec<ParsedMessage>> {
    decode_with_timetag(packet, Timetag::ZERO)
}

/// Decode a packet; messages outside any bundle get `timetag`.
pub fn decode_with_timetag(packet: &[u8], timetag: Timetag) -> Result<Vec<ParsedMessage>> {
    trace!("Decoding {} byte packet:\n{}", packet.len(), format_bytes(packet));
    let mut messages = Vec::new();
    decode_into(packet, timetag, &mut messages)?;
    Ok(messages)
}

/// Check whether a packet starts with the bundle marker.
#[inline]
pub fn is_bundle(packet: &[u8]) -> bool {
    packet.starts_with(BUNDLE_TAG)
}

fn decode_into(packet: &[u8], timetag: Timetag, out: &mut Vec<ParsedMessage>) -> Result<()> {
    if is_bundle(packet) {
        decode_bundle(packet, out)
    } else {
        out.push(decode_message(packet, timetag)?);
        Ok(())
    }
}

fn decode_bundle(packet: &[u8], out: &mut Vec<ParsedMessage>) -> Result<()> {
    if packet.len() < BUNDLE_HEADER_SIZE {
        return Err(OscError::TruncatedBundle {
            declared: BUNDLE_HEADER_SIZE,
            remaining: packet.len(),
        });
    }

    let ntp = NtpTime::from_parts(be_u32(&packet[8..]), be_u32(&packet[12..]));
    let timetag = ntp.to_timetag();
    trace!("Bundle with timetag {:?}", timetag);

    let mut rest = &packet[BUNDLE_HEADER_SIZE..];
    while !rest.is_empty() {
        if rest.len() < ELEMENT_SIZE_PREFIX {
            return Err(OscError::TruncatedBundle {
                declared: ELEMENT_SIZE_PREFIX,
                remaining: rest.len(),
            });
        }
        let size = be_u32(rest) as usize;
        rest = &rest[ELEMENT_SIZE_PREFIX..];
        if size > rest.len() {
            return Err(OscError::TruncatedBundle {
                declared: size,
                remaining: rest.len(),
            });
        }

        let (element, tail) = rest.split_at(size);
        trace!("Bundle element of {} bytes", size);
        decode_into(element, timetag, out)?;
        rest = tail;
    }

    Ok(())
}

fn decode_message(packet: &[u8], timetag: Timetag) -> Result<ParsedMessage> {
    let address_len = packet
        .iter()
        .position(|&b| b == 0)
        .ok_or(OscError::MalformedAddress)?;
    let address = String::from_utf8_lossy(&packet[..address_len]).into_owned();
    let mut pos = padded_len(address_len);

    let type_block = packet.get(pos..).unwrap_or_default();
    if type_block.first() != Some(&TYPE_TAG_PREFIX) {
        return Err(OscError::MissingTypeTagPrefix);
    }
    let types_end = type_block
        .iter()
        .position(|&b| b == 0)
        .ok_or(OscError::MalformedTypes)?;
    let type_tags = &type_block[1..types_end];
    pos += padded_len(types_end);

    trace!(
        "Message {} with types ,{}",
        address,
        String::from_utf8_lossy(type_tags)
    );

    let mut data = packet.get(pos..).unwrap_or_default();
    let mut args = Vec::with_capacity(type_tags.len());
    for &tag in type_tags {
        let (arg, consumed) = read_argument(tag, data)?;
        args.push(arg);
        data = &data[consumed..];
    }

    Ok(ParsedMessage {
        timetag,
        address,
        types: type_tags.iter().map(|&b| b as char).collect(),
        args,
    })
}

/// Read one argument payload for `tag`, returning it and the bytes consumed.
fn read_argument(tag: u8, data: &[u8]) -> Result<(Argument, usize)> {
    let arg = match tag {
        tags::TRUE => return Ok((Argument::True, 0)),
        tags::FALSE => return Ok((Argument::False, 0)),
        tags::NIL => return Ok((Argument::Nil, 0)),
        tags::IMPULSE => return Ok((Argument::Impulse, 0)),
        tags::INT32 => Argument::Int32(be_u32(require(tag, data, 4)?) as i32),
        tags::FLOAT32 => Argument::Float32(f32::from_bits(be_u32(require(tag, data, 4)?))),
        tags::COLOR => Argument::Color(be_u32(require(tag, data, 4)?)),
        tags::CHAR => Argument::Char(require(tag, data, 4)?[3]),
        tags::MIDI => {
            let b = require(tag, data, 4)?;
            Argument::Midi(MidiMessage::from_bytes([b[0], b[1], b[2], b[3]]))
        }
        tags::INT64 => Argument::Int64(be_u64(require(tag, data, 8)?) as i64),
        tags::FLOAT64 => Argument::Float64(f64::from_bits(be_u64(require(tag, data, 8)?))),
        tags::TIMETAG => Argument::Time(NtpTime(be_u64(require(tag, data, 8)?))),
        tags::STRING | tags::SYMBOL => {
            let len = data
                .iter()
                .position(|&b| b == 0)
                .ok_or(OscError::UnterminatedString { tag: tag as char })?;
            let consumed = padded_len(len);
            require(tag, data, consumed)?;
            let text = String::from_utf8_lossy(&data[..len]).into_owned();
            let arg = if tag == tags::STRING {
                Argument::String(text)
            } else {
                Argument::Symbol(text)
            };
            return Ok((arg, consumed));
        }
        tags::BLOB => {
            let size = be_u32(require(tag, data, 4)?) as usize;
            let consumed = size
                .checked_add(4 + blob_padding(size))
                .ok_or(OscError::TruncatedArgument {
                    tag: tag as char,
                    needed: usize::MAX,
                    remaining: data.len(),
                })?;
            require(tag, data, consumed)?;
            let end = consumed - blob_padding(size);
            return Ok((Argument::Blob(data[4..end].to_vec()), consumed));
        }
        other => return Err(OscError::UnsupportedTypeTag(other as char)),
    };

    let consumed = arg.encoded_len();
    Ok((arg, consumed))
}

/// Ensure `data` holds at least `needed` bytes.
#[inline]
fn require(tag: u8, data: &[u8], needed: usize) -> Result<&[u8]> {
    if data.len() < needed {
        return Err(OscError::TruncatedArgument {
            tag: tag as char,
            needed,
            remaining: data.len(),
        });
    }
    Ok(data)
}

/// Read a Big Endian u32. Caller guarantees 4 bytes.
#[inline]
fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Read a Big Endian u64. Caller guarantees 8 bytes.
#[inline]
fn be_u64(b: &[u8]) -> u64 {
    u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}
