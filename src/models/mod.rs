//! Data models for the Backyard Eggs backend.
//!
//! Field names follow the JSON documents the front end reads and writes.

mod admin;
mod catalog;
mod reservation;

pub use admin::*;
pub use catalog::*;
pub use reservation::*;
