//! Text-generation web API client
//!
//! HTTP transport for the text-generation server's blocking API:
//! - `POST /api/v1/generate` for completions
//! - `POST /api/v1/get-embeddings` for embeddings

pub mod client;
pub mod types;

pub use client::{TextGenClient, TextGenClientConfig};
