//! Test modules for the circular queue
//!
//! Tests are organized by functional area:
//! - `core_functionality` - FIFO order, peek/advance agreement, scripted scenarios
//! - `edge_cases` - empty queues, peek bounds, wrap-around and growth
//! - `memory` - release of consumed items and exactly-once drops
