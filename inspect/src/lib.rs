//! # sbconnect
//!
//! Command-line inspector for Service Bus connection strings. Nothing here
//! opens a connection; the report only shows what a client would be built
//! from.

pub mod cli;
pub mod config;
pub mod logger;
pub mod report;

pub use report::{InspectionReport, inspect};
