//! Contest use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into registration, grading and
//!   administration use-cases.
//! - Keep callers decoupled from storage details.

pub mod score_service;
pub mod team_service;
