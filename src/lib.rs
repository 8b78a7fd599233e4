//! # shule
//!
//! Grade classification for school examinations: raw marks to percentage,
//! letter grade and grade points, plus storage and per-examination
//! statistics for the classified records.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment-driven runtime configuration
pub mod config;
/// For all things related to grading
pub mod grade;
/// REST API
pub mod server;
/// Grade record persistence
pub mod store;
/// Shared enums: academic levels, letters, record status
pub mod types;
