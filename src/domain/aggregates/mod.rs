//! Aggregates module

pub mod agent;
pub mod ticket;

pub use agent::Agent;
pub use ticket::Ticket;
