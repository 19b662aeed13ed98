//! textgen-bridge - prompt builder and response normalizer for local
//! text-generation servers
//!
//! Agent frameworks speak in chat conversations and expect a strict JSON
//! reply; local text-generation servers take a single flattened prompt and
//! return free text. This crate sits between the two: it rebuilds agent
//! system prompts from a configurable prompt profile, and recovers the
//! structured `{thoughts, command}` reply from whatever the model produced.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Service Layer** (`services`): Prompt building, response normalization
//!   and the completion round trip
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, profile and
//!   config loading, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```
//! use textgen_bridge::{AgentState, Message, NormalizedResponse, PromptBuilder, PromptProfile};
//! use textgen_bridge::ResponseNormalizer;
//!
//! let agent = AgentState::new("Bob", "a helpful assistant").with_goal("Say hello");
//! let messages = vec![Message::system("You are Bob"), Message::user("hi")];
//! let prompt = PromptBuilder::new()
//!     .build(&PromptProfile::builtin(), &agent, &messages)
//!     .unwrap();
//! assert!(prompt.starts_with("You are Bob, a helpful assistant"));
//!
//! let reply = r#"{"plan_summary": "greet", "command_name": "say", "args": {"text": "hello"}}"#;
//! match ResponseNormalizer::new().normalize(reply) {
//!     NormalizedResponse::Structured(response) => assert_eq!(response.command.name, "say"),
//!     NormalizedResponse::Raw(_) => unreachable!(),
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CompletionError, NormalizeError, PromptError};
pub use domain::models::{
    AgentState, Config, Message, NormalizedResponse, PromptProfile, StructuredResponse,
    TemplateType,
};
pub use domain::ports::{GenerateRequest, PromptFormat, TextGenError, TextGenerator};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::templates::ProfileLoader;
pub use infrastructure::textgen::{TextGenClient, TextGenClientConfig};
pub use services::{CompletionService, PromptBuilder, ResponseNormalizer};
