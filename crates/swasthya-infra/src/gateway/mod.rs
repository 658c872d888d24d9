//! Client side of the trusted gateway.

pub mod client;

pub use client::GatewayClient;
