//! Infrastructure layer for Swasthya.
//!
//! Implements the ports defined in `swasthya-core`: the Gemini generator
//! used by the gateway, the gateway client used by chat front ends, the
//! HTTP auth backend and the file-backed session store. Also hosts
//! configuration loading, data-dir resolution and the gateway's account
//! and token bookkeeping.

pub mod auth;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod secret;
