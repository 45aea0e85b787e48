//! # streamring
//!
//! A generic, auto-growing circular queue with lookahead, and a small stream
//! processor built on it that emits every record together with the records
//! that follow it.
//!
//! The queue lives in [`queue`]; [`app`] holds the command-line pipeline and
//! [`core`] the shared logging, error handling and query descriptor.

pub mod app;
pub mod core;
pub mod queue;

pub use queue::CircularQueue;
