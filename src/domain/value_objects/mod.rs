//! Value Objects module
//!
//! Immutable, validated domain primitives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier value object for tickets
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier value object for support agents
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket category, matched against agent expertise tags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technical,
    Payment,
    Product,
    Account,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Technical => "technical",
            Category::Payment => "payment",
            Category::Product => "product",
            Category::Account => "account",
        };
        write!(f, "{}", s)
    }
}

/// Ticket priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Ticket lifecycle status
///
/// Transitions are monotonic: a ticket only ever moves to a status of equal
/// or higher rank. Assignment flips `Open -> InProgress`, the sweeper flips
/// `Open | InProgress -> Escalated`, and `Resolved`/`Closed` are set by
/// human action outside this core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Escalated,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Position in the lifecycle, used to enforce monotonic transitions.
    pub fn rank(self) -> u8 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::InProgress => 1,
            TicketStatus::Escalated => 2,
            TicketStatus::Resolved => 3,
            TicketStatus::Closed => 4,
        }
    }

    /// Whether the ticket still counts toward an agent's workload.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            TicketStatus::Open | TicketStatus::InProgress | TicketStatus::Escalated
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Escalated => "escalated",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_is_monotonic() {
        let lifecycle = [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Escalated,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ];
        for pair in lifecycle.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_active_statuses() {
        assert!(TicketStatus::Open.is_active());
        assert!(TicketStatus::InProgress.is_active());
        assert!(TicketStatus::Escalated.is_active());
        assert!(!TicketStatus::Resolved.is_active());
        assert!(!TicketStatus::Closed.is_active());
    }

    #[test]
    fn test_agent_ids_order_lexicographically() {
        let a = AgentId::from_string("agent-a");
        let b = AgentId::from_string("agent-b");
        assert!(a < b);
        assert_eq!(a.to_string(), "agent-a");
    }
}
