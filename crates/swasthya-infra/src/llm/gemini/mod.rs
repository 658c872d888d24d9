//! Generative Language API (Gemini) reply generator.
//!
//! This module provides [`GeminiClient`], the
//! [`ReplyGenerator`](swasthya_core::generation::provider::ReplyGenerator)
//! the gateway forwards chat requests to.

pub mod client;
pub mod types;

pub use client::GeminiClient;
