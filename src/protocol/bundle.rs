//! Bundle encoder.
//!
//! A bundle frames already-encoded messages or bundles under a shared
//! timetag. Appending copies the element's current bytes, so later changes
//! to the source do not reach an already-appended bundle. That also makes
//! appending a bundle to itself well defined: it inserts a snapshot.
//!
//! # Example
//!
//! ```
//! use oscwire::protocol::{Bundle, Message, NtpTime};
//!
//! let mut msg = Message::new("/light/1");
//! msg.append_f32(0.5);
//!
//! let mut bundle = Bundle::with_timetag(NtpTime::from_parts(3_900_000_000, 0));
//! bundle.append_message(&msg);
//!
//! assert_eq!(bundle.len(), 16 + 4 + msg.len());
//! assert_eq!(bundle.timetag().seconds(), 3_900_000_000);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::message::Message;
use super::timetag::NtpTime;
use super::wire_format::{BUNDLE_HEADER_SIZE, BUNDLE_TAG, ELEMENT_SIZE_PREFIX};

/// An outgoing bundle.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Header followed by size-prefixed elements.
    data: BytesMut,
}

impl Bundle {
    /// Create an empty bundle with the immediate timetag.
    pub fn new() -> Self {
        Self::with_timetag(NtpTime::IMMEDIATE)
    }

    /// Create an empty bundle with a custom timetag.
    pub fn with_timetag(timetag: NtpTime) -> Self {
        let mut data = BytesMut::with_capacity(256);
        data.put_slice(BUNDLE_TAG);
        data.put_u64(timetag.0);
        Self { data }
    }

    /// Current timetag.
    pub fn timetag(&self) -> NtpTime {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.data[BUNDLE_TAG.len()..BUNDLE_HEADER_SIZE]);
        NtpTime::from_be_bytes(raw)
    }

    /// Overwrite the timetag. Elements already appended are kept.
    pub fn set_timetag(&mut self, timetag: NtpTime) {
        self.data[BUNDLE_TAG.len()..BUNDLE_HEADER_SIZE].copy_from_slice(&timetag.to_be_bytes());
    }

    /// Append a snapshot of a message.
    pub fn append_message(&mut self, message: &Message) {
        self.append_packet(message.bytes());
    }

    /// Append a snapshot of another bundle.
    pub fn append_bundle(&mut self, bundle: &Bundle) {
        self.append_packet(bundle.bytes());
    }

    /// Append a snapshot of this bundle to itself.
    pub fn append_self(&mut self) {
        let snapshot = self.data.clone();
        self.append_packet(&snapshot);
    }

    /// Append an already-encoded packet as one element.
    pub fn append_packet(&mut self, packet: &[u8]) {
        self.data.reserve(ELEMENT_SIZE_PREFIX + packet.len());
        self.data.put_u32(packet.len() as u32);
        self.data.put_slice(packet);
    }

    /// Encoded bundle bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy the encoding into an owned `Bytes`.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.data)
    }

    /// Encoded size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the bundle has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.len() == BUNDLE_HEADER_SIZE
    }

    /// Drop all elements and reset the timetag to immediate.
    pub fn clear(&mut self) {
        self.data.truncate(BUNDLE_TAG.len());
        self.data.put_u64(NtpTime::IMMEDIATE.0);
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle_header() {
        let bundle = Bundle::new();
        assert_eq!(
            bundle.bytes(),
            b"#bundle\0\0\0\0\0\0\0\0\x01"
        );
        assert!(bundle.is_empty());
        assert!(bundle.timetag().is_immediate());
    }

    #[test]
    fn test_append_message_frames_with_length() {
        let mut msg = Message::new("/a");
        msg.append_i32(5);

        let mut bundle = Bundle::new();
        bundle.append_message(&msg);

        let bytes = bundle.bytes();
        assert_eq!(&bytes[16..20], &(msg.len() as u32).to_be_bytes());
        assert_eq!(&bytes[20..], &msg.bytes()[..]);
        assert!(!bundle.is_empty());
    }

    #[test]
    fn test_append_copies_at_call_time() {
        let mut msg = Message::new("/a");
        let mut bundle = Bundle::new();
        bundle.append_message(&msg);
        let before = bundle.bytes().to_vec();

        msg.append_i32(1);
        msg.set_address("/changed");
        assert_eq!(bundle.bytes(), &before[..]);
    }

    #[test]
    fn test_set_timetag_overwrites_in_place() {
        let mut bundle = Bundle::new();
        bundle.append_message(&Message::new("/a"));
        let len = bundle.len();

        let t = NtpTime::from_parts(0xDEAD_BEEF, 0x0102_0304);
        bundle.set_timetag(t);

        assert_eq!(bundle.len(), len);
        assert_eq!(bundle.timetag(), t);
        assert_eq!(&bundle.bytes()[8..16], &t.to_be_bytes());
    }

    #[test]
    fn test_append_self_is_snapshot() {
        let mut bundle = Bundle::new();
        bundle.append_message(&Message::new("/a"));
        let snapshot_len = bundle.len();

        bundle.append_self();
        assert_eq!(bundle.len(), snapshot_len * 2 + 4);

        // inner copy is the pre-append state
        let inner = &bundle.bytes()[snapshot_len + 4..];
        assert_eq!(inner.len(), snapshot_len);
        assert_eq!(&inner[..8], BUNDLE_TAG);
    }

    #[test]
    fn test_nested_bundle() {
        let mut inner = Bundle::new();
        inner.append_message(&Message::new("/a"));

        let mut outer = Bundle::new();
        outer.append_bundle(&inner);
        assert_eq!(outer.len(), 16 + 4 + inner.len());
        assert_eq!(&outer.bytes()[20..], inner.bytes());
    }

    #[test]
    fn test_clear_resets_header() {
        let mut bundle = Bundle::with_timetag(NtpTime::from_parts(5, 5));
        bundle.append_message(&Message::new("/a"));
        bundle.clear();
        assert_eq!(bundle.bytes(), Bundle::new().bytes());
    }

    #[test]
    fn test_to_bytes() {
        let bundle = Bundle::new();
        assert_eq!(&bundle.to_bytes()[..], bundle.bytes());
    }
}
