//! AgriMarket Support Core
//!
//! Support-ticket assignment and escalation engine for the AgriMarket
//! marketplace (farmers, buyers, admins).
//!
//! ## Architecture
//!
//! - **Domain Layer**: Ticket aggregate, agent entity, value objects, events
//! - **Application Layer**: Assignment and escalation services
//! - **Ports Layer**: Hexagonal architecture interfaces
//! - **Infrastructure Layer**: In-memory adapters and the sweep scheduler
//!
//! ## Features
//!
//! - Least-loaded agent assignment with category-expertise preference
//! - Generalist fallback when no expert matches a ticket's category
//! - Age-threshold escalation sweep, decoupled from its timer trigger
//! - Optimistic-concurrency ticket persistence
//! - Notification records for assignment and escalation events

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for convenience
pub use application::{AssignmentService, EscalationService};
pub use application::dto::{AgentWorkload, AssignmentOutcome, BatchReport, EscalationReport};
pub use config::SupportConfig;
pub use domain::aggregates::{Agent, Ticket};
pub use domain::events::{AssigneeRef, DomainEvent, Notification, TicketEvent};
pub use domain::value_objects::{AgentId, Category, Priority, TicketId, TicketStatus};
pub use ports::inbound::{AssignmentUseCases, EscalationUseCases, SupportError};
pub use ports::outbound::{AgentDirectory, NotificationSink, RepositoryError, TicketRepository};
