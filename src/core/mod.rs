//! Core services and infrastructure

pub mod date_parser;
pub mod error_handling;
pub mod logging;
pub mod query;
pub mod version;
