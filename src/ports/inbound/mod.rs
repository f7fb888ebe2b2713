//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces consumed by the
//! HTTP route handlers and the sweep timer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::application::dto::{AgentWorkload, AssignmentOutcome, BatchReport, EscalationReport};
use crate::domain::value_objects::{Category, TicketId};
use crate::ports::outbound::RepositoryError;

/// Ticket assignment use cases
#[async_trait]
pub trait AssignmentUseCases: Send + Sync {
    /// Assign the best available agent to a ticket.
    ///
    /// Prefers agents whose expertise covers `category`, falls back to all
    /// active agents, and picks the least-loaded candidate. Exactly one
    /// ticket mutation per successful call.
    async fn assign(
        &self,
        ticket_id: &TicketId,
        category: Category,
    ) -> Result<AssignmentOutcome, SupportError>;

    /// Assign every unassigned open/in-progress ticket, sequentially in
    /// query order. One ticket's failure never aborts the batch.
    async fn auto_assign_unassigned(&self) -> Result<BatchReport, SupportError>;

    /// Active-ticket and total-ever-assigned counts per active agent.
    /// Read-only.
    async fn workload_report(&self) -> Result<Vec<AgentWorkload>, SupportError>;
}

/// Escalation sweep use cases
#[async_trait]
pub trait EscalationUseCases: Send + Sync {
    /// Escalate every open/in-progress ticket older than `age_threshold`.
    ///
    /// `now` is injected so the sweep is invocable without real time
    /// passing. Individual persistence failures are logged and skipped;
    /// the sweep always runs to completion.
    async fn sweep(
        &self,
        now: DateTime<Utc>,
        age_threshold: chrono::Duration,
    ) -> Result<EscalationReport, SupportError>;
}

/// Structured failure taxonomy surfaced to callers.
///
/// The HTTP layer maps `TicketNotFound`/`NoAgentsAvailable` to 4xx
/// responses and `Storage`/`Conflict` to 5xx with the sanitized message.
#[derive(Error, Debug, Clone)]
pub enum SupportError {
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    #[error("no active agents available")]
    NoAgentsAvailable,

    #[error("concurrent update: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for SupportError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::VersionConflict { expected, found } => SupportError::Conflict(
                format!("version conflict: expected {expected}, found {found}"),
            ),
            other => SupportError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_conflict_maps_to_conflict() {
        let err: SupportError = RepositoryError::VersionConflict {
            expected: 1,
            found: 2,
        }
        .into();
        assert!(matches!(err, SupportError::Conflict(_)));
    }

    #[test]
    fn test_other_repository_errors_map_to_storage() {
        let err: SupportError = RepositoryError::Storage("connection reset".into()).into();
        match err {
            SupportError::Storage(msg) => assert!(msg.contains("connection reset")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
