//! Trusted gateway HTTP layer.
//!
//! Axum service holding the upstream credential. Chat replies under
//! `/api/v1/chat`, login and session routes under `/api/v1/auth`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
