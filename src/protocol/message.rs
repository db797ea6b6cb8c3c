//! Message encoder.
//!
//! Accumulates an address and typed arguments and produces the exact wire
//! bytes. The encoding is built lazily on first read and cached; every
//! mutation drops the cache so reads always reflect the latest state.
//!
//! # Example
//!
//! ```
//! use oscwire::protocol::Message;
//!
//! let mut msg = Message::new("/synth/freq");
//! msg.append_f32(440.0);
//! msg.append_str("sine");
//!
//! assert_eq!(msg.types(), "fs");
//! assert_eq!(msg.len(), 12 + 4 + 4 + 8);
//! ```

use std::cell::OnceCell;

use bytes::{BufMut, Bytes, BytesMut};

use super::argument::{put_padded, Argument, MidiMessage};
use super::timetag::NtpTime;
use super::wire_format::{padded_len, tags, DEFAULT_ADDRESS, TYPE_TAG_PREFIX};

/// An outgoing message under construction.
#[derive(Debug, Clone)]
pub struct Message {
    /// Target address.
    address: String,
    /// Type tags, without the leading comma.
    types: Vec<u8>,
    /// Concatenated argument payloads.
    data: BytesMut,
    /// Encoded message; empty cell means stale.
    cache: OnceCell<Bytes>,
}

impl Message {
    /// Create an empty message for `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            types: Vec::new(),
            data: BytesMut::new(),
            cache: OnceCell::new(),
        }
    }

    /// Get the address.
    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Replace the address.
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.invalidate();
        self.address = address.into();
    }

    /// Type-tag string, one character per argument.
    pub fn types(&self) -> &str {
        // Tags are only ever pushed from the ASCII constants in `tags`.
        std::str::from_utf8(&self.types).unwrap_or_default()
    }

    /// Number of arguments appended so far.
    #[inline]
    pub fn arg_count(&self) -> usize {
        self.types.len()
    }

    /// Append any argument.
    pub fn append(&mut self, arg: impl Into<Argument>) {
        let arg = arg.into();
        self.push_tag(arg.tag());
        arg.encode_into(&mut self.data);
    }

    /// Append an `i` argument.
    pub fn append_i32(&mut self, v: i32) {
        self.push_tag(tags::INT32);
        self.data.put_i32(v);
    }

    /// Append an `f` argument.
    pub fn append_f32(&mut self, v: f32) {
        self.push_tag(tags::FLOAT32);
        self.data.put_f32(v);
    }

    /// Append an `s` argument.
    pub fn append_str(&mut self, v: &str) {
        self.push_tag(tags::STRING);
        put_padded(&mut self.data, v.as_bytes());
    }

    /// Append raw bytes as an `s` argument. Empty input is ignored.
    pub fn append_cstr(&mut self, v: &[u8]) {
        if v.is_empty() {
            return;
        }
        self.push_tag(tags::STRING);
        put_padded(&mut self.data, v);
    }

    /// Append an `S` argument.
    pub fn append_symbol(&mut self, v: &str) {
        self.push_tag(tags::SYMBOL);
        put_padded(&mut self.data, v.as_bytes());
    }

    /// Append a `b` argument.
    pub fn append_blob(&mut self, v: &[u8]) {
        self.append(Argument::from(v));
    }

    /// Append a `t` argument.
    pub fn append_time(&mut self, v: NtpTime) {
        self.push_tag(tags::TIMETAG);
        self.data.put_u64(v.0);
    }

    /// Append the current wall-clock time as a `t` argument.
    pub fn append_current_time(&mut self) {
        self.append_time(NtpTime::now());
    }

    /// Append `T`.
    pub fn append_true(&mut self) {
        self.push_tag(tags::TRUE);
    }

    /// Append `F`.
    pub fn append_false(&mut self) {
        self.push_tag(tags::FALSE);
    }

    /// Append `N`.
    pub fn append_nil(&mut self) {
        self.push_tag(tags::NIL);
    }

    /// Append `I`.
    pub fn append_impulse(&mut self) {
        self.push_tag(tags::IMPULSE);
    }

    /// Append an `h` argument.
    pub fn append_i64(&mut self, v: i64) {
        self.push_tag(tags::INT64);
        self.data.put_i64(v);
    }

    /// Append a `d` argument.
    pub fn append_f64(&mut self, v: f64) {
        self.push_tag(tags::FLOAT64);
        self.data.put_f64(v);
    }

    /// Append a `c` argument.
    pub fn append_char(&mut self, v: u8) {
        self.push_tag(tags::CHAR);
        self.data.put_u32(v as u32);
    }

    /// Append an `r` argument.
    pub fn append_color(&mut self, rgba: u32) {
        self.push_tag(tags::COLOR);
        self.data.put_u32(rgba);
    }

    /// Append an `m` argument.
    pub fn append_midi(&mut self, port: u8, status: u8, data1: u8, data2: u8) {
        self.push_tag(tags::MIDI);
        self.data
            .put_slice(&MidiMessage::new(port, status, data1, data2).to_bytes());
    }

    /// Encoded message bytes (cached until the next mutation).
    pub fn bytes(&self) -> &Bytes {
        self.cache.get_or_init(|| self.encode())
    }

    /// Encoded size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Check if the encoding is empty (never true once built).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Reset address, types, and data to empty.
    pub fn clear(&mut self) {
        self.invalidate();
        self.address.clear();
        self.types.clear();
        self.data.clear();
    }

    #[inline]
    fn push_tag(&mut self, tag: u8) {
        self.invalidate();
        self.types.push(tag);
    }

    #[inline]
    fn invalidate(&mut self) {
        self.cache.take();
    }

    fn encode(&self) -> Bytes {
        let address = if self.address.is_empty() {
            DEFAULT_ADDRESS
        } else {
            self.address.as_str()
        };

        let mut buf = BytesMut::with_capacity(
            padded_len(address.len()) + padded_len(self.types.len() + 1) + self.data.len(),
        );
        put_padded(&mut buf, address.as_bytes());
        buf.put_u8(TYPE_TAG_PREFIX);
        buf.put_slice(&self.types);
        buf.put_bytes(0, padded_len(self.types.len() + 1) - (self.types.len() + 1));
        buf.put_slice(&self.data);
        buf.freeze()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_layout() {
        let msg = Message::new("/abc");
        // "/abc" is aligned, so it still gets a full block of padding
        assert_eq!(&msg.bytes()[..], b"/abc\0\0\0\0,\0\0\0");
    }

    #[test]
    fn test_int_message_layout() {
        let mut msg = Message::new("/a");
        msg.append_i32(1);
        assert_eq!(
            &msg.bytes()[..],
            b"/a\0\0,i\0\0\0\0\0\x01"
        );
    }

    #[test]
    fn test_three_types_get_full_padding_block() {
        let mut msg = Message::new("/a");
        msg.append_true();
        msg.append_false();
        msg.append_nil();
        // ",TFN" is 4 bytes, so 4 more nulls follow
        assert_eq!(&msg.bytes()[..], b"/a\0\0,TFN\0\0\0\0");
    }

    #[test]
    fn test_cache_invalidated_on_append() {
        let mut msg = Message::new("/x");
        let before = msg.bytes().clone();
        msg.append_i32(7);
        let after = msg.bytes().clone();
        assert_ne!(before, after);
        assert_eq!(after.len(), before.len() + 4);
    }

    #[test]
    fn test_cache_invalidated_on_set_address() {
        let mut msg = Message::new("/x");
        assert_eq!(msg.len(), 8);
        msg.set_address("/longer/address");
        assert_eq!(msg.address(), "/longer/address");
        assert_eq!(msg.len(), 16 + 4);
        assert!(msg.bytes().starts_with(b"/longer/address\0"));
    }

    #[test]
    fn test_repeated_reads_share_cache() {
        let mut msg = Message::new("/x");
        msg.append_str("hello");
        let first = msg.bytes().as_ptr();
        let second = msg.bytes().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_types() {
        let mut msg = Message::default();
        msg.append_i32(1);
        msg.append_f32(3.0);
        msg.append_str("oscwire");
        msg.append_cstr(b"test");
        msg.append_blob(b"test");
        msg.append_time(NtpTime::IMMEDIATE);
        msg.append_true();
        msg.append_false();
        msg.append_nil();
        msg.append_impulse();
        msg.append_i64(2);
        msg.append_f64(4.0);
        msg.append_char(b'!');
        msg.append_color(0x11223344);
        msg.append_midi(1, 0, 0, 255);
        msg.append_symbol("sym");

        assert_eq!(msg.types(), "ifssbtTFNIhdcrmS");
        assert_eq!(msg.arg_count(), 16);
        // address 12 + types 20 + payload 72
        assert_eq!(msg.len(), 12 + 20 + 72);
    }

    #[test]
    fn test_append_cstr_ignores_empty() {
        let mut msg = Message::new("/x");
        msg.append_cstr(b"");
        assert_eq!(msg.types(), "");
    }

    #[test]
    fn test_generic_append() {
        let mut msg = Message::new("/x");
        msg.append(1i32);
        msg.append(2.0f64);
        msg.append("s");
        msg.append(true);
        msg.append(vec![1u8, 2]);
        assert_eq!(msg.types(), "idsTb");
    }

    #[test]
    fn test_clear() {
        let mut msg = Message::new("/x");
        msg.append_i32(1);
        assert_eq!(msg.len(), 12);
        assert!(msg.bytes().starts_with(b"/x\0\0,i\0\0"));
        msg.clear();
        assert_eq!(msg.address(), "");
        assert_eq!(msg.types(), "");
        // empty address encodes as the default address
        let mut expected = Vec::new();
        put_padded(&mut expected, DEFAULT_ADDRESS.as_bytes());
        expected.extend_from_slice(b",\0\0\0");
        assert_eq!(&msg.bytes()[..], &expected[..]);
    }

    #[test]
    fn test_large_message() {
        let mut msg = Message::default();
        for i in 0..1000 {
            msg.append_i32(i);
        }
        let types_block = padded_len(1001);
        assert_eq!(msg.len(), 12 + types_block + 4000);
        let tail = &msg.bytes()[msg.len() - 4..];
        assert_eq!(tail, &999i32.to_be_bytes());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut msg = Message::new("/x");
        msg.append_i32(1);
        let copy = msg.clone();
        msg.append_i32(2);
        assert_eq!(copy.types(), "i");
        assert_eq!(msg.types(), "ii");
    }
}
