pub mod completion_service;
pub mod prompt_builder;
pub mod prompt_formats;
pub mod response_normalizer;
pub mod text;

pub use completion_service::CompletionService;
pub use prompt_builder::PromptBuilder;
pub use prompt_formats::{format_for, ConversationFormat, MonolithicFormat};
pub use response_normalizer::ResponseNormalizer;
