//! Application layer: use case orchestration and DTOs.

pub mod commands;
pub mod dto;

pub use commands::{AssignmentService, EscalationService};
