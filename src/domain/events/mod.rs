//! Domain events and notification records
//!
//! Events are raised by aggregates to signal state changes. Notifications
//! are the enriched records handed to the delivery sink (log, email,
//! socket push) by the application services.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{AgentId, Category, Priority, TicketId};

/// All domain events in the support bounded context
#[derive(Clone, Debug)]
pub enum DomainEvent {
    Ticket(TicketEvent),
}

/// Ticket-related domain events
#[derive(Clone, Debug)]
pub enum TicketEvent {
    Created {
        ticket_id: TicketId,
        category: Category,
        priority: Priority,
        created_at: DateTime<Utc>,
    },

    Assigned {
        ticket_id: TicketId,
        agent_id: AgentId,
        assigned_at: DateTime<Utc>,
    },

    Escalated {
        ticket_id: TicketId,
        escalated_at: DateTime<Utc>,
    },
}

/// Reference to the agent a notification concerns.
///
/// `email` is absent when the directory could not resolve the agent at
/// notification time.
#[derive(Clone, Debug, Serialize)]
pub struct AssigneeRef {
    pub agent_id: AgentId,
    pub email: Option<String>,
}

/// Record handed to the notification sink.
///
/// Delivery is outside this core; sinks must never fail back into the
/// assignment or escalation flow.
#[derive(Clone, Debug, Serialize)]
pub enum Notification {
    TicketAssigned {
        ticket_id: TicketId,
        subject: String,
        category: Category,
        priority: Priority,
        agent: AssigneeRef,
        /// Agent workload used in the assignment decision.
        workload: u64,
    },

    TicketEscalated {
        ticket_id: TicketId,
        subject: String,
        category: Category,
        priority: Priority,
        created_at: DateTime<Utc>,
        requester_id: String,
        /// `None` means the ticket escalated unassigned: route to an admin.
        assignee: Option<AssigneeRef>,
    },
}

impl Notification {
    /// True for escalations with nobody assigned; the sink should alert an
    /// admin instead of an agent.
    pub fn requires_admin_attention(&self) -> bool {
        matches!(
            self,
            Notification::TicketEscalated { assignee: None, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_escalation_targets_admin() {
        let escalated = Notification::TicketEscalated {
            ticket_id: TicketId::new(),
            subject: "Order stuck in transit".into(),
            category: Category::Technical,
            priority: Priority::High,
            created_at: Utc::now(),
            requester_id: "buyer-12".into(),
            assignee: None,
        };
        assert!(escalated.requires_admin_attention());

        let assigned = Notification::TicketAssigned {
            ticket_id: TicketId::new(),
            subject: "Refund request".into(),
            category: Category::Payment,
            priority: Priority::Medium,
            agent: AssigneeRef {
                agent_id: AgentId::from_string("agent-a"),
                email: Some("ada@agrimarket.example".into()),
            },
            workload: 1,
        };
        assert!(!assigned.requires_admin_attention());
    }
}
