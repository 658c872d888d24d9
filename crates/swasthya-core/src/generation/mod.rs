//! Reply generation abstractions.
//!
//! - `ReplyGenerator`: RPITIT trait for concrete generation backends
//! - `BoxReplyGenerator`: object-safe wrapper for dynamic dispatch
//! - `ReplyService`: sanitise-then-generate entry point used by the gateway

pub mod box_generator;
pub mod provider;
pub mod service;
