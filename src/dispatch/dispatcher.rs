//! Dispatcher for routing decoded messages to registered methods.
//!
//! Templates are kept in registration order. Matching decodes a packet,
//! tests every message against every template, and returns the matches
//! sorted by timetag. The sort is stable, so callbacks sharing a timetag
//! keep message order, then registration order.
//!
//! # Example
//!
//! ```
//! use oscwire::dispatch::Dispatcher;
//! use oscwire::protocol::{Bundle, Message};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.add_method("/test1", "", |_: &str, _: &[_], _: &()| {}, ());
//! dispatcher.add_method("/test[1-9]", "is", |_: &str, _: &[_], _: &()| {}, ());
//! dispatcher.add_method("/test{2,3}", "", |_: &str, _: &[_], _: &()| {}, ());
//!
//! let mut msg = Message::new("/test1");
//! msg.append_i32(1000);
//! msg.append_str("test");
//!
//! let mut bundle = Bundle::new();
//! bundle.append_message(&msg);
//!
//! let callbacks = dispatcher.match_methods(bundle.bytes());
//! assert_eq!(callbacks.len(), 2);
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use super::callback::{Callback, Method, MethodRef};
use super::pattern::pattern_match;
use crate::protocol::{decode, Argument, ParsedMessage};

/// A registered route.
pub struct MethodTemplate<C = ()> {
    /// Address pattern, may contain wildcards.
    pattern: String,
    /// Required type-tag string; empty accepts any arguments.
    types: String,
    /// Context copied into every callback.
    context: C,
    /// Method to call.
    method: MethodRef<C>,
}

impl<C> MethodTemplate<C> {
    /// Address pattern.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Required type-tag string (empty means any).
    #[inline]
    pub fn types(&self) -> &str {
        &self.types
    }

    /// Registered context.
    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Registered method.
    #[inline]
    pub fn method(&self) -> &MethodRef<C> {
        &self.method
    }

    /// Check whether a decoded message is routed to this template.
    ///
    /// The type signature is compared character for character.
    pub fn accepts(&self, message: &ParsedMessage) -> bool {
        pattern_match(&message.address, &self.pattern)
            && (self.types.is_empty() || self.types == message.types)
    }
}

/// Registry of method templates.
///
/// The registry has no internal locking; share it behind a lock if
/// registration and matching happen on different threads.
pub struct Dispatcher<C = ()> {
    /// Templates in registration order.
    methods: Vec<MethodTemplate<C>>,
}

impl<C> Dispatcher<C> {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Create an empty dispatcher with room for `capacity` templates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            methods: Vec::with_capacity(capacity),
        }
    }

    /// Register a method.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Address pattern (not validated)
    /// * `types` - Required type-tag string, `""` for any
    /// * `method` - Closure taking (address, args, context)
    /// * `context` - Value handed to the method on every call
    pub fn add_method<F>(&mut self, pattern: &str, types: &str, method: F, context: C)
    where
        F: Fn(&str, &[Argument], &C) + Send + Sync + 'static,
    {
        self.add_method_ref(pattern, types, Arc::new(method), context);
    }

    /// Register an already shared method.
    pub fn add_method_ref(
        &mut self,
        pattern: &str,
        types: &str,
        method: Arc<dyn Method<C>>,
        context: C,
    ) {
        trace!("Registering method {} ,{}", pattern, types);
        self.methods.push(MethodTemplate {
            pattern: pattern.to_string(),
            types: types.to_string(),
            context,
            method,
        });
    }

    /// Registered templates in registration order.
    #[inline]
    pub fn methods(&self) -> &[MethodTemplate<C>] {
        &self.methods
    }

    /// Number of registered templates.
    #[inline]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if no templates are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<C: Clone> Dispatcher<C> {
    /// Decode a packet and collect every template match, sorted by timetag.
    ///
    /// A malformed packet yields no callbacks; use
    /// [`decode`](crate::protocol::decode) to see why.
    pub fn match_methods(&self, packet: &[u8]) -> Vec<Callback<C>> {
        match decode(packet) {
            Ok(messages) => self.match_messages(&messages),
            Err(e) => {
                debug!("Dropping undecodable packet: {}", e);
                Vec::new()
            }
        }
    }

    /// Collect every template match for already decoded messages.
    pub fn match_messages(&self, messages: &[ParsedMessage]) -> Vec<Callback<C>> {
        let mut callbacks = Vec::new();

        for message in messages {
            for template in self.methods.iter().filter(|t| t.accepts(message)) {
                trace!("{} matched {}", message.address, template.pattern);
                callbacks.push(Callback {
                    timetag: message.timetag,
                    address: message.address.clone(),
                    args: message.args.clone(),
                    context: template.context.clone(),
                    method: Arc::clone(&template.method),
                });
            }
        }

        // stable: equal timetags keep discovery order
        callbacks.sort_by_key(|c| c.timetag);
        callbacks
    }
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
