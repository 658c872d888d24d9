//! Client-side authentication: the backend port, the persisted session
//! store and the login flow that connects them.

pub mod flow;
pub mod store;
