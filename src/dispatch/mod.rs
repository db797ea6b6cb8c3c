//! Dispatch module - address patterns and method routing.
//!
//! Provides:
//! - [`pattern_match`] - wildcard matching of addresses against patterns
//! - [`Dispatcher`] - registry of method templates
//! - [`Callback`] - one match, ready to be scheduled and invoked
//!
//! # Example
//!
//! ```
//! use oscwire::dispatch::Dispatcher;
//! use oscwire::protocol::Message;
//!
//! let mut dispatcher: Dispatcher<&'static str> = Dispatcher::new();
//! dispatcher.add_method("/synth/*/freq", "f", |_, _, _| {}, "freq");
//! dispatcher.add_method("/synth/{1,2}/*", "", |_, _, _| {}, "any");
//!
//! let mut msg = Message::new("/synth/1/freq");
//! msg.append_f32(440.0);
//!
//! let matched: Vec<_> = dispatcher
//!     .match_methods(msg.bytes())
//!     .into_iter()
//!     .map(|cb| cb.context)
//!     .collect();
//! assert_eq!(matched, ["freq", "any"]);
//! ```

mod callback;
mod dispatcher;
mod pattern;

pub use callback::{Callback, Method, MethodRef};
pub use dispatcher::{Dispatcher, MethodTemplate};
pub use pattern::pattern_match;
