//! # Shardis Proto
//!
//! Reply values and error types shared by the routing core.
//!
//! The RESP wire codec itself lives in the connection layer; this module
//! only defines the decoded [`frame::Frame`] shape the router consumes and
//! the crate-wide [`error::Error`] taxonomy.

/// Error types.
pub mod error;
/// Reply value types.
pub mod frame;
