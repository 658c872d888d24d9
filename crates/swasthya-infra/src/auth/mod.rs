//! Authentication adapters.
//!
//! Client side: [`HttpAuthClient`] talks to the gateway and
//! [`FileSessionStore`] persists the resulting session. Gateway side:
//! [`AccountDirectory`] verifies passwords and [`TokenRegistry`] tracks the
//! bearer tokens it hands out.

pub mod accounts;
pub mod client;
pub mod session_file;
pub mod tokens;

pub use accounts::AccountDirectory;
pub use client::HttpAuthClient;
pub use session_file::FileSessionStore;
pub use tokens::TokenRegistry;
