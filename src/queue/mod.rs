//! Circular Queue Component
//!
//! A generic, auto-growing ring buffer used as the sliding buffer of the
//! lookahead pipeline. A producer appends records in bulk, a single consumer
//! advances through them one at a time, and the consumer can peek any
//! distance ahead without removing anything.
//!
//! # Overview
//!
//! - **Bulk enqueue**: appends grow the storage geometrically (amortized O(1))
//! - **Sequential consume**: `advance` + `value` surface items in FIFO order
//! - **Lookahead**: `peek(k)` reads the k-th pending item without mutation
//! - **No retention**: consumed slots are emptied immediately, so payloads are
//!   released as soon as the consumer moves past them
//!
//! # Architecture
//!
//! ```text
//!   storage:  [ e | _ | _ | a | b | c | d ]    capacity C = 7
//!                           ^ head             count = 5
//!
//!   peek(0) = a   peek(3) = d   peek(4) = e (wrapped)   peek(5) = None
//!   last    = item surfaced by the most recent advance
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use streamring::queue::CircularQueue;
//!
//! let mut queue: CircularQueue<String> = CircularQueue::default();
//! queue.enqueue(["alpha".to_string(), "beta".to_string()]);
//!
//! while queue.advance() {
//!     let current = queue.value().cloned().unwrap_or_default();
//!     let next = queue.peek(0).cloned();
//!     println!("{current} -> {next:?}");
//! }
//! ```

mod circular;

pub use circular::{CircularQueue, MIN_CAPACITY};

#[cfg(test)]
mod tests;
