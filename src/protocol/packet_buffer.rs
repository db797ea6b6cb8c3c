//! Packet buffer for stream transports.
//!
//! Datagram transports deliver one packet per read, but stream transports
//! (TCP, serial pipes) prefix every packet with its size:
//! ```text
//! ┌──────────┬──────────────────┐
//! │ Size     │ Packet           │
//! │ u32 BE   │ message / bundle │
//! └──────────┴──────────────────┘
//! ```
//!
//! [`PacketBuffer`] accumulates reads and yields whole packets, ready for
//! [`decode`](super::decode) or
//! [`Dispatcher::match_methods`](crate::dispatch::Dispatcher::match_methods).
//! It performs no I/O itself.
//!
//! # Example
//!
//! ```
//! use oscwire::protocol::{frame_packet, Message, PacketBuffer};
//!
//! let msg = Message::new("/ping");
//! let framed = frame_packet(msg.bytes());
//!
//! let mut buffer = PacketBuffer::new();
//! assert!(buffer.push(&framed[..3]).unwrap().is_empty());
//! let packets = buffer.push(&framed[3..]).unwrap();
//!
//! assert_eq!(packets.len(), 1);
//! assert_eq!(&packets[0][..], &msg.bytes()[..]);
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use super::wire_format::{DEFAULT_MAX_PACKET_SIZE, ELEMENT_SIZE_PREFIX};
use crate::error::{OscError, Result};

/// State machine for packet extraction.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for the 4-byte size prefix.
    WaitingForSize,
    /// Size parsed, waiting for the packet body.
    WaitingForPacket { size: usize },
}

/// Buffer for accumulating stream bytes and extracting complete packets.
pub struct PacketBuffer {
    /// Accumulated bytes from reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum allowed packet size.
    max_packet_size: usize,
}

impl PacketBuffer {
    /// Create a new packet buffer with the default limit (1 MiB).
    pub fn new() -> Self {
        Self::with_max_packet_size(DEFAULT_MAX_PACKET_SIZE)
    }

    /// Create a new packet buffer with a custom limit.
    pub fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8 * 1024),
            state: State::WaitingForSize,
            max_packet_size,
        }
    }

    /// Push data and extract every complete packet.
    ///
    /// Partial data is kept for the next push.
    ///
    /// # Errors
    ///
    /// Returns `PacketTooLarge` if a size prefix exceeds the limit. Framing
    /// is lost at that point, so every buffered byte is discarded and the
    /// next push starts at a fresh size prefix.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Bytes>> {
        self.buffer.extend_from_slice(data);

        let mut packets = Vec::new();
        while let Some(packet) = self.try_extract_one()? {
            packets.push(packet);
        }

        Ok(packets)
    }

    fn try_extract_one(&mut self) -> Result<Option<Bytes>> {
        loop {
            match self.state {
                State::WaitingForSize => {
                    if self.buffer.len() < ELEMENT_SIZE_PREFIX {
                        return Ok(None);
                    }

                    let size = u32::from_be_bytes([
                        self.buffer[0],
                        self.buffer[1],
                        self.buffer[2],
                        self.buffer[3],
                    ]) as usize;

                    if size > self.max_packet_size {
                        debug!(
                            "Rejecting {} byte packet (max {})",
                            size, self.max_packet_size
                        );
                        // framing is lost, start over from the next push
                        self.clear();
                        return Err(OscError::PacketTooLarge {
                            size,
                            max: self.max_packet_size,
                        });
                    }

                    let _ = self.buffer.split_to(ELEMENT_SIZE_PREFIX);
                    self.state = State::WaitingForPacket { size };
                }

                State::WaitingForPacket { size } => {
                    if self.buffer.len() < size {
                        return Ok(None);
                    }

                    let packet = self.buffer.split_to(size).freeze();
                    self.state = State::WaitingForSize;
                    return Ok(Some(packet));
                }
            }
        }
    }

    /// Number of buffered bytes not yet returned.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForSize;
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::WaitingForSize => "WaitingForSize",
            State::WaitingForPacket { .. } => "WaitingForPacket",
        }
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix a packet with its Big Endian size for stream transports.
pub fn frame_packet(packet: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ELEMENT_SIZE_PREFIX + packet.len());
    buf.put_u32(packet.len() as u32);
    buf.put_slice(packet);
    buf
}
