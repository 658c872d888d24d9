//! Business logic and port trait definitions for Swasthya.
//!
//! This crate holds the chat assistant state machine and defines the
//! "ports" (generator, speech recognizer, auth backend, session store) that
//! the infrastructure layer implements. It depends only on `swasthya-types`
//! -- never on `swasthya-infra` or any HTTP/filesystem crate.

pub mod auth;
pub mod chat;
pub mod event;
pub mod generation;
pub mod speech;
