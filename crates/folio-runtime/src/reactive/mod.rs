#![forbid(unsafe_code)]

//! Reactive publication of the active state.

pub mod observable;

pub use observable::{Observable, Subscription};
