//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Text-generation HTTP client
//! - Prompt profile loading
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod templates;
pub mod textgen;
