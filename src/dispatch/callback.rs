//! Match results handed back to the caller.
//!
//! A [`Callback`] is one (message, template) match: a copy of the message's
//! timetag, address, and arguments together with the template's context and
//! method. The dispatcher never invokes methods itself; the caller decides
//! when (for example at the timetag) and calls [`Callback::invoke`].
//!
//! # Example
//!
//! ```
//! use oscwire::dispatch::Dispatcher;
//! use oscwire::protocol::Message;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.add_method("/volume", "f", |_address: &str, args: &[_], scale: &f32| {
//!     assert_eq!(args[0].as_f32().map(|v| v * scale), Some(1.0));
//! }, 2.0f32);
//!
//! let mut msg = Message::new("/volume");
//! msg.append_f32(0.5);
//!
//! for callback in dispatcher.match_methods(msg.bytes()) {
//!     callback.invoke();
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::protocol::{Argument, Timetag};

/// Trait for methods registered with a dispatcher.
///
/// Implemented for every `Fn(&str, &[Argument], &C)` closure.
pub trait Method<C>: Send + Sync + 'static {
    /// Handle one matched message.
    fn call(&self, address: &str, args: &[Argument], context: &C);
}

impl<C, F> Method<C> for F
where
    F: Fn(&str, &[Argument], &C) + Send + Sync + 'static,
{
    fn call(&self, address: &str, args: &[Argument], context: &C) {
        self(address, args, context)
    }
}

/// Shared handle to a registered method.
pub type MethodRef<C> = Arc<dyn Method<C>>;

/// One successful match of a decoded message against a template.
pub struct Callback<C = ()> {
    /// Timetag the method should run at ([`Timetag::ZERO`] = immediately).
    pub timetag: Timetag,
    /// Address of the matched message.
    pub address: String,
    /// Arguments of the matched message.
    pub args: Vec<Argument>,
    /// Context registered with the template.
    pub context: C,
    /// Method registered with the template.
    pub method: MethodRef<C>,
}

impl<C: 'static> Callback<C> {
    /// Call the matched method with this message.
    #[inline]
    pub fn invoke(&self) {
        self.method.call(&self.address, &self.args, &self.context);
    }

    /// Check whether two callbacks point at the same registered method.
    #[inline]
    pub fn same_method(&self, other: &Callback<C>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.method) as *const (),
            Arc::as_ptr(&other.method) as *const (),
        )
    }
}

impl<C: Clone> Clone for Callback<C> {
    fn clone(&self) -> Self {
        Self {
            timetag: self.timetag,
            address: self.address.clone(),
            args: self.args.clone(),
            context: self.context.clone(),
            method: Arc::clone(&self.method),
        }
    }
}

impl<C: PartialEq + 'static> PartialEq for Callback<C> {
    fn eq(&self, other: &Self) -> bool {
        self.timetag == other.timetag
            && self.address == other.address
            && self.args == other.args
            && self.context == other.context
            && self.same_method(other)
    }
}

impl<C: fmt::Debug> fmt::Debug for Callback<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("timetag", &self.timetag)
            .field("address", &self.address)
            .field("args", &self.args)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn callback_with(method: MethodRef<u32>, context: u32) -> Callback<u32> {
        Callback {
            timetag: Timetag::ZERO,
            address: "/x".to_string(),
            args: vec![Argument::Int32(3)],
            context,
            method,
        }
    }

    #[test]
    fn test_invoke_passes_message_and_context() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        let method: MethodRef<u32> = Arc::new(move |address: &str, args: &[Argument], ctx: &u32| {
            assert_eq!(address, "/x");
            let value = args[0].as_i32().unwrap_or_default() as usize;
            sink.fetch_add(value * *ctx as usize, Ordering::SeqCst);
        });

        callback_with(method, 10).invoke();
        assert_eq!(seen.load(Ordering::SeqCst), 30);
    }

    #[test]
    fn test_equality_requires_same_method() {
        let a: MethodRef<u32> = Arc::new(|_: &str, _: &[Argument], _: &u32| {});
        let b: MethodRef<u32> = Arc::new(|_: &str, _: &[Argument], _: &u32| {});

        let first = callback_with(Arc::clone(&a), 1);
        assert_eq!(first, first.clone());
        assert_eq!(first, callback_with(Arc::clone(&a), 1));
        assert_ne!(first, callback_with(Arc::clone(&a), 2));
        assert_ne!(first, callback_with(b, 1));
    }

    #[test]
    fn test_debug_omits_method() {
        let method: MethodRef<u32> = Arc::new(|_: &str, _: &[Argument], _: &u32| {});
        let text = format!("{:?}", callback_with(method, 7));
        assert!(text.contains("\"/x\""));
        assert!(text.contains("context: 7"));
    }
}
