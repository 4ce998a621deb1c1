//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate resolver/repository calls into command-level APIs.
//! - Keep the CLI layer decoupled from storage details.

pub mod hierarchy;
pub mod listing;
