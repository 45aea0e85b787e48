//! Application module: argument handling, configuration, and the lookahead
//! pipeline that drives the circular queue

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod startup;
