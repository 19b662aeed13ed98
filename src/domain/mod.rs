//! Domain layer for textgen-bridge
//!
//! Prompt and reply models, the ports infrastructure implements, and the
//! errors they share.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CompletionError, NormalizeError, PromptError, PromptResult};
