//! # oscwire
//!
//! Encoder, decoder, and address-pattern dispatcher for the OSC binary
//! control protocol.
//!
//! ## Architecture
//!
//! - **Protocol**: typed arguments, message and bundle encoders, and a
//!   recursive packet decoder that flattens bundles into timetagged messages
//! - **Dispatch**: wildcard address patterns and a method registry that
//!   turns a packet into callbacks ordered by timetag
//!
//! The crate does no I/O. Packets come from whatever transport the caller
//! uses; [`PacketBuffer`](protocol::PacketBuffer) helps with size-prefixed
//! streams.
//!
//! ## Example
//!
//! ```
//! use oscwire::{Bundle, Dispatcher, Message, NtpTime};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.add_method("/light/[0-9]/level", "f", |address: &str, args: &[_], _: &()| {
//!     println!("{} -> {:?}", address, args[0]);
//! }, ());
//!
//! let mut msg = Message::new("/light/4/level");
//! msg.append_f32(0.8);
//!
//! let mut bundle = Bundle::with_timetag(NtpTime::now());
//! bundle.append_message(&msg);
//!
//! for callback in dispatcher.match_methods(bundle.bytes()) {
//!     callback.invoke();
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod protocol;

pub use dispatch::{pattern_match, Callback, Dispatcher};
pub use error::{OscError, Result};
pub use protocol::{decode, Argument, Bundle, Message, NtpTime, ParsedMessage, Timetag};
