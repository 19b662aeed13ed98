//! Prompt profile files

pub mod profile_loader;

pub use profile_loader::{ProfileError, ProfileLoader};
