//! Port trait definitions (Hexagonal Architecture)
//!
//! - PromptFormat: prompt rendering and reply normalization strategy
//! - TextGenerator: text-generation transport
//!
//! These traits let the services stay independent of any particular
//! template layout or HTTP backend.

pub mod errors;
pub mod prompt_format;
pub mod text_generator;

pub use errors::TextGenError;
pub use prompt_format::PromptFormat;
pub use text_generator::{GenerateRequest, TextGenerator};
