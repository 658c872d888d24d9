//! The chat assistant: transcript, prompt building and the session state
//! machine that ties them to a reply generator and a speech recognizer.

pub mod assistant;
pub mod prompt;
pub mod transcript;
