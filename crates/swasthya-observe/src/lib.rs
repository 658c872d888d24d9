//! Observability for Swasthya: tracing subscriber setup and the GenAI
//! semantic-convention names used on generation spans.

pub mod genai_attrs;
pub mod tracing_setup;
