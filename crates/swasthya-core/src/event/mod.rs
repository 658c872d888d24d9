//! Chat session event distribution.

pub mod bus;
