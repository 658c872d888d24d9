//! OpenTelemetry GenAI semantic-convention attribute names and values.
//!
//! Generation spans are named `"gen_ai.{operation}"` and carry these fields
//! so exported traces line up with other GenAI instrumentation.

/// The operation being performed (e.g. "generate_content").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The GenAI provider (e.g. "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// Output language requested from the model. Not part of the upstream
/// conventions.
pub const SWASTHYA_REQUEST_LANGUAGE: &str = "swasthya.request.language";

// --- Operation name values ---

/// Single-shot content generation.
pub const OP_GENERATE_CONTENT: &str = "generate_content";

/// A reply forwarded through the trusted gateway.
pub const OP_GATEWAY_REPLY: &str = "gateway_reply";

// --- Provider name values ---

pub const PROVIDER_GEMINI: &str = "gemini";

pub const PROVIDER_GATEWAY: &str = "swasthya_gateway";
