//! Ticket Aggregate
//!
//! Rich aggregate root for support tickets with encapsulated lifecycle rules.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::events::{DomainEvent, TicketEvent};
use crate::domain::value_objects::{AgentId, Category, Priority, TicketId, TicketStatus};

/// Ticket aggregate root
#[derive(Clone, Debug)]
pub struct Ticket {
    id: TicketId,
    subject: String,
    description: String,
    category: Category,
    priority: Priority,
    status: TicketStatus,
    requester_id: String,
    assigned_to: Option<AgentId>,
    custom_fields: HashMap<String, serde_json::Value>,
    escalated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    // Optimistic concurrency token, advanced by the repository on each
    // successful write.
    version: u64,
    // Domain events accumulated during operations
    events: Vec<DomainEvent>,
}

impl Ticket {
    /// Create a new ticket (factory method)
    pub fn create(
        subject: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        priority: Priority,
        requester_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let id = TicketId::new();

        let mut ticket = Self {
            id: id.clone(),
            subject: subject.into(),
            description: description.into(),
            category,
            priority,
            status: TicketStatus::Open,
            requester_id: requester_id.into(),
            assigned_to: None,
            custom_fields: HashMap::new(),
            escalated_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
            events: vec![],
        };

        ticket.raise_event(DomainEvent::Ticket(TicketEvent::Created {
            ticket_id: id,
            category,
            priority,
            created_at: now,
        }));

        ticket
    }

    // =========================================================================
    // Getters (immutable access to internal state)
    // =========================================================================

    pub fn id(&self) -> &TicketId { &self.id }
    pub fn subject(&self) -> &str { &self.subject }
    pub fn description(&self) -> &str { &self.description }
    pub fn category(&self) -> Category { self.category }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn status(&self) -> TicketStatus { self.status }
    pub fn requester_id(&self) -> &str { &self.requester_id }
    pub fn assigned_to(&self) -> Option<&AgentId> { self.assigned_to.as_ref() }
    pub fn custom_fields(&self) -> &HashMap<String, serde_json::Value> { &self.custom_fields }
    pub fn escalated_at(&self) -> Option<DateTime<Utc>> { self.escalated_at }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn version(&self) -> u64 { self.version }

    // =========================================================================
    // Business Operations (encapsulated behavior)
    // =========================================================================

    /// Assign the ticket to an agent.
    ///
    /// Flips `Open -> InProgress`; any later status is left untouched, the
    /// engine never moves a ticket backward. Reassignment only replaces
    /// `assigned_to`.
    pub fn assign(&mut self, agent_id: AgentId) {
        self.assigned_to = Some(agent_id.clone());
        if self.status == TicketStatus::Open {
            self.status = TicketStatus::InProgress;
        }
        self.touch();
        self.raise_event(DomainEvent::Ticket(TicketEvent::Assigned {
            ticket_id: self.id.clone(),
            agent_id,
            assigned_at: self.updated_at,
        }));
    }

    /// Force-escalate a stale ticket.
    ///
    /// Only valid from `Open` or `InProgress`; returns `false` (and does
    /// nothing) for tickets already escalated or terminal.
    pub fn escalate(&mut self, now: DateTime<Utc>) -> bool {
        if !matches!(self.status, TicketStatus::Open | TicketStatus::InProgress) {
            return false;
        }
        self.status = TicketStatus::Escalated;
        self.escalated_at = Some(now);
        self.updated_at = now;
        self.raise_event(DomainEvent::Ticket(TicketEvent::Escalated {
            ticket_id: self.id.clone(),
            escalated_at: now,
        }));
        true
    }

    /// Mark the ticket resolved (human action, outside the engine).
    pub fn resolve(&mut self) {
        if self.status.rank() < TicketStatus::Resolved.rank() {
            self.status = TicketStatus::Resolved;
            self.touch();
        }
    }

    /// Close the ticket (human action, outside the engine).
    pub fn close(&mut self) {
        if self.status.rank() < TicketStatus::Closed.rank() {
            self.status = TicketStatus::Closed;
            self.touch();
        }
    }

    /// Attach marketplace context (order id, product id, ...).
    pub fn set_custom_field(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.custom_fields.insert(key.into(), value);
        self.touch();
    }

    /// Advance the optimistic-concurrency token.
    ///
    /// Called by repositories after a successful version-checked write;
    /// application code never calls this directly.
    pub fn advance_version(&mut self) {
        self.version += 1;
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    #[cfg(test)]
    pub(crate) fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket::create(
            "Tomato listing rejected",
            "Photos keep failing upload",
            Category::Product,
            Priority::Medium,
            "farmer-77",
        )
    }

    #[test]
    fn test_assignment_moves_open_to_in_progress() {
        let mut t = ticket();
        t.assign(AgentId::from_string("agent-a"));
        assert_eq!(t.status(), TicketStatus::InProgress);
        assert_eq!(t.assigned_to().unwrap().as_str(), "agent-a");
    }

    #[test]
    fn test_reassignment_never_moves_status_backward() {
        let mut t = ticket();
        assert!(t.escalate(Utc::now()));
        t.assign(AgentId::from_string("agent-b"));
        assert_eq!(t.status(), TicketStatus::Escalated);
        assert_eq!(t.assigned_to().unwrap().as_str(), "agent-b");
    }

    #[test]
    fn test_escalate_only_from_open_or_in_progress() {
        let mut t = ticket();
        let now = Utc::now();
        assert!(t.escalate(now));
        assert_eq!(t.escalated_at(), Some(now));
        // Second escalation is a no-op.
        assert!(!t.escalate(now));

        let mut solved = ticket();
        solved.resolve();
        assert!(!solved.escalate(now));
        assert_eq!(solved.status(), TicketStatus::Resolved);
    }

    #[test]
    fn test_events_raised_per_operation() {
        let mut t = ticket();
        t.assign(AgentId::from_string("agent-a"));
        let events = t.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            DomainEvent::Ticket(TicketEvent::Created { .. })
        ));
        assert!(matches!(
            events[1],
            DomainEvent::Ticket(TicketEvent::Assigned { .. })
        ));
        // Drained.
        assert!(t.take_events().is_empty());
    }

    #[test]
    fn test_terminal_transitions_are_monotonic() {
        let mut t = ticket();
        t.close();
        assert_eq!(t.status(), TicketStatus::Closed);
        t.resolve();
        assert_eq!(t.status(), TicketStatus::Closed);
    }
}
