//! Data transfer objects
//!
//! Response payloads handed back to the HTTP layer and the timer. Batch
//! reports itemize per-ticket outcomes so a single failure never hides
//! its siblings.

use crate::domain::aggregates::Ticket;
use crate::domain::value_objects::{AgentId, Category, TicketId};

/// Result of one assignment decision
#[derive(Clone, Debug)]
pub struct AssignmentOutcome {
    /// Ticket as persisted after the mutation.
    pub ticket: Ticket,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub agent_email: String,
    pub agent_expertise: Vec<Category>,
    /// Agent workload at decision time.
    pub workload: u64,
}

/// Per-ticket outcome inside a batch
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub ticket_id: TicketId,
    /// Assigned agent on success, sanitized error message on failure.
    pub outcome: Result<AgentId, String>,
}

/// Outcome of `auto_assign_unassigned`
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_err()).count()
    }
}

/// Per-agent load snapshot
#[derive(Clone, Debug)]
pub struct AgentWorkload {
    pub agent_id: AgentId,
    pub name: String,
    /// Tickets currently assigned with a non-terminal status.
    pub active_tickets: u64,
    /// Every ticket ever assigned, any status.
    pub total_assigned: u64,
}

/// Outcome of one escalation sweep
#[derive(Clone, Debug, Default)]
pub struct EscalationReport {
    /// Tickets transitioned to `Escalated`, in sweep order.
    pub escalated: Vec<Ticket>,
    /// Tickets skipped because their save failed.
    pub skipped: usize,
}

impl EscalationReport {
    pub fn count(&self) -> usize {
        self.escalated.len()
    }
}
