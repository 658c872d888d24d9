//! Interactive terminal chat with the health assistant.
//!
//! Drives a [`ChatAssistant`](swasthya_core::chat::assistant::ChatAssistant)
//! backed by the trusted gateway. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
