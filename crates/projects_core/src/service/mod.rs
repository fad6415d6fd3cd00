//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Turn "no matching row" outcomes into `NotFound` failures.

pub mod project_service;
