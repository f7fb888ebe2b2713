//! Outbound ports (collaborator traits)
//!
//! Hexagonal architecture: these are the interfaces that infrastructure
//! must implement. Persistence and the agent roster live outside this
//! core; it only depends on the contracts below.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::aggregates::{Agent, Ticket};
use crate::domain::events::Notification;
use crate::domain::value_objects::{AgentId, TicketId, TicketStatus};

/// Ticket store port
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Find ticket by ID
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, RepositoryError>;

    /// Save a ticket, checking its optimistic-concurrency version against
    /// the stored one. Returns the stored ticket with its version advanced.
    async fn save(&self, ticket: &Ticket) -> Result<Ticket, RepositoryError>;

    /// Tickets in any of `statuses` created at or before `cutoff`,
    /// oldest first.
    async fn find_stale(
        &self,
        statuses: &[TicketStatus],
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, RepositoryError>;

    /// Unassigned tickets in any of `statuses`, oldest first.
    async fn find_unassigned(
        &self,
        statuses: &[TicketStatus],
    ) -> Result<Vec<Ticket>, RepositoryError>;

    /// Count every ticket ever assigned to the agent, any status.
    async fn count_assigned(&self, agent_id: &AgentId) -> Result<u64, RepositoryError>;
}

/// Agent directory port
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// All currently active agents, ordered by agent id.
    async fn find_active_agents(&self) -> Result<Vec<Agent>, RepositoryError>;

    /// Find a single agent by id, active or not.
    async fn find_agent(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError>;

    /// Count of non-terminal tickets currently assigned to the agent.
    async fn count_active_tickets(&self, agent_id: &AgentId) -> Result<u64, RepositoryError>;
}

/// Notification sink port
///
/// Fire-and-forget: adapters handle (and swallow) their own delivery
/// failures so a broken sink can never fail an assignment or a sweep.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, notification: Notification);
}

/// Storage boundary error type
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,

    #[error("version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },

    #[error("storage error: {0}")]
    Storage(String),
}
