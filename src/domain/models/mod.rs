pub mod agent;
pub mod config;
pub mod message;
pub mod profile;
pub mod response;

pub use agent::AgentState;
pub use config::{Config, GenerationConfig, LoggingConfig, TextGenConfig};
pub use message::Message;
pub use profile::{ProfileStrings, PromptProfile, TemplateType};
pub use response::{
    Command, NormalizedResponse, SimpleArg, SimpleResponse, StructuredResponse, Thoughts,
};
