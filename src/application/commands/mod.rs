//! Command handlers
//!
//! Application services that orchestrate the assignment and escalation
//! use cases. All collaborator errors are converted to the structured
//! `SupportError` taxonomy at this boundary; nothing escapes as a panic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::application::dto::{
    AgentWorkload, AssignmentOutcome, BatchItem, BatchReport, EscalationReport,
};
use crate::domain::events::{AssigneeRef, DomainEvent, Notification, TicketEvent};
use crate::domain::services::AssignmentPolicy;
use crate::domain::value_objects::{Category, TicketId, TicketStatus};
use crate::ports::inbound::{AssignmentUseCases, EscalationUseCases, SupportError};
use crate::ports::outbound::{AgentDirectory, NotificationSink, TicketRepository};

/// Statuses a ticket may hold while still waiting for an agent.
const ASSIGNABLE: [TicketStatus; 2] = [TicketStatus::Open, TicketStatus::InProgress];

/// Ticket assignment application service
pub struct AssignmentService {
    tickets: Arc<dyn TicketRepository>,
    agents: Arc<dyn AgentDirectory>,
    notifier: Arc<dyn NotificationSink>,
}

impl AssignmentService {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        agents: Arc<dyn AgentDirectory>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            tickets,
            agents,
            notifier,
        }
    }
}

#[async_trait]
impl AssignmentUseCases for AssignmentService {
    async fn assign(
        &self,
        ticket_id: &TicketId,
        category: Category,
    ) -> Result<AssignmentOutcome, SupportError> {
        let mut ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| SupportError::TicketNotFound(ticket_id.clone()))?;

        let active = self.agents.find_active_agents().await?;
        if active.is_empty() {
            return Err(SupportError::NoAgentsAvailable);
        }

        let pool = AssignmentPolicy::candidate_pool(&active, category);
        debug!(
            ticket = %ticket_id,
            %category,
            pool_size = pool.len(),
            "selecting assignment candidate"
        );

        let mut loads = Vec::with_capacity(pool.len());
        for agent in pool {
            let workload = self.agents.count_active_tickets(&agent.id).await?;
            loads.push((agent, workload));
        }

        // Pool is non-empty by construction.
        let (agent, workload) = AssignmentPolicy::select_least_loaded(loads)
            .ok_or(SupportError::NoAgentsAvailable)?;

        ticket.assign(agent.id.clone());
        let saved = self.tickets.save(&ticket).await?;

        // Notification gated on the event the aggregate actually raised.
        let assigned = ticket
            .take_events()
            .into_iter()
            .any(|e| matches!(e, DomainEvent::Ticket(TicketEvent::Assigned { .. })));
        if assigned {
            self.notifier
                .publish(Notification::TicketAssigned {
                    ticket_id: saved.id().clone(),
                    subject: saved.subject().to_string(),
                    category: saved.category(),
                    priority: saved.priority(),
                    agent: AssigneeRef {
                        agent_id: agent.id.clone(),
                        email: Some(agent.email.clone()),
                    },
                    workload,
                })
                .await;
        }

        info!(
            ticket = %saved.id(),
            agent = %agent.id,
            workload,
            status = %saved.status(),
            "ticket assigned"
        );

        Ok(AssignmentOutcome {
            ticket: saved,
            agent_id: agent.id,
            agent_name: agent.name,
            agent_email: agent.email,
            agent_expertise: agent.expertise,
            workload,
        })
    }

    async fn auto_assign_unassigned(&self) -> Result<BatchReport, SupportError> {
        let pending = self.tickets.find_unassigned(&ASSIGNABLE).await?;
        info!(pending = pending.len(), "auto-assigning unassigned tickets");

        let mut report = BatchReport::default();
        for ticket in pending {
            let outcome = match self.assign(ticket.id(), ticket.category()).await {
                Ok(outcome) => Ok(outcome.agent_id),
                Err(err) => {
                    warn!(ticket = %ticket.id(), error = %err, "auto-assignment failed, continuing");
                    Err(err.to_string())
                }
            };
            report.items.push(BatchItem {
                ticket_id: ticket.id().clone(),
                outcome,
            });
        }

        info!(
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "auto-assignment batch complete"
        );
        Ok(report)
    }

    async fn workload_report(&self) -> Result<Vec<AgentWorkload>, SupportError> {
        let active = self.agents.find_active_agents().await?;
        let mut report = Vec::with_capacity(active.len());
        for agent in active {
            let active_tickets = self.agents.count_active_tickets(&agent.id).await?;
            let total_assigned = self.tickets.count_assigned(&agent.id).await?;
            report.push(AgentWorkload {
                agent_id: agent.id,
                name: agent.name,
                active_tickets,
                total_assigned,
            });
        }
        Ok(report)
    }
}

/// Escalation sweep application service
///
/// Pure function of (store state, `now`, threshold); the timer trigger
/// lives in `infrastructure::scheduler`.
pub struct EscalationService {
    tickets: Arc<dyn TicketRepository>,
    agents: Arc<dyn AgentDirectory>,
    notifier: Arc<dyn NotificationSink>,
}

impl EscalationService {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        agents: Arc<dyn AgentDirectory>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            tickets,
            agents,
            notifier,
        }
    }

    async fn assignee_ref(&self, ticket: &crate::domain::aggregates::Ticket) -> Option<AssigneeRef> {
        let agent_id = ticket.assigned_to()?;
        // A directory miss still names the agent; only the contact is lost.
        let email = match self.agents.find_agent(agent_id).await {
            Ok(agent) => agent.map(|a| a.email),
            Err(err) => {
                warn!(agent = %agent_id, error = %err, "agent lookup failed while notifying");
                None
            }
        };
        Some(AssigneeRef {
            agent_id: agent_id.clone(),
            email,
        })
    }
}

#[async_trait]
impl EscalationUseCases for EscalationService {
    async fn sweep(
        &self,
        now: DateTime<Utc>,
        age_threshold: chrono::Duration,
    ) -> Result<EscalationReport, SupportError> {
        let cutoff = now - age_threshold;
        let stale = self.tickets.find_stale(&ASSIGNABLE, cutoff).await?;
        if stale.is_empty() {
            debug!("escalation sweep found no stale tickets");
            return Ok(EscalationReport::default());
        }

        info!(candidates = stale.len(), "escalation sweep starting");
        let mut report = EscalationReport::default();
        for mut ticket in stale {
            if !ticket.escalate(now) {
                continue;
            }
            let saved = match self.tickets.save(&ticket).await {
                Ok(saved) => saved,
                Err(err) => {
                    warn!(
                        ticket = %ticket.id(),
                        error = %err,
                        "failed to persist escalation, skipping ticket"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            let escalated = ticket
                .take_events()
                .into_iter()
                .any(|e| matches!(e, DomainEvent::Ticket(TicketEvent::Escalated { .. })));
            if escalated {
                let assignee = self.assignee_ref(&saved).await;
                self.notifier
                    .publish(Notification::TicketEscalated {
                        ticket_id: saved.id().clone(),
                        subject: saved.subject().to_string(),
                        category: saved.category(),
                        priority: saved.priority(),
                        created_at: saved.created_at(),
                        requester_id: saved.requester_id().to_string(),
                        assignee,
                    })
                    .await;
            }

            report.escalated.push(saved);
        }

        info!(
            escalated = report.count(),
            skipped = report.skipped,
            "escalation sweep complete"
        );
        Ok(report)
    }
}
