//! Shared domain types for the Swasthya health assistant.
//!
//! This crate contains the types used across the workspace: chat messages,
//! the supported language catalogue, notifications, speech-recognition
//! events, chat session events, authentication payloads, configuration and
//! error enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod generation;
pub mod language;
pub mod notification;
pub mod speech;
