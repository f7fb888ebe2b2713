//! In-memory adapter implementations
//!
//! Reference adapters for the outbound ports, used in tests and
//! single-process deployments. The production deployment substitutes its
//! own database-backed implementations behind the same traits.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

use crate::domain::aggregates::{Agent, Ticket};
use crate::domain::events::Notification;
use crate::domain::value_objects::{AgentId, TicketId, TicketStatus};
use crate::ports::outbound::{
    AgentDirectory, NotificationSink, RepositoryError, TicketRepository,
};

/// In-memory ticket repository with optimistic concurrency
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: DashMap<TicketId, Ticket>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count tickets assigned to `agent_id` whose status is in `statuses`.
    pub fn count_with_status(&self, agent_id: &AgentId, statuses: &[TicketStatus]) -> u64 {
        self.tickets
            .iter()
            .filter(|entry| {
                entry.value().assigned_to() == Some(agent_id)
                    && statuses.contains(&entry.value().status())
            })
            .count() as u64
    }

    fn sorted_by_age(&self, mut tickets: Vec<Ticket>) -> Vec<Ticket> {
        tickets.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        tickets
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, RepositoryError> {
        Ok(self.tickets.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, ticket: &Ticket) -> Result<Ticket, RepositoryError> {
        if let Some(existing) = self.tickets.get(ticket.id()) {
            if existing.value().version() != ticket.version() {
                return Err(RepositoryError::VersionConflict {
                    expected: ticket.version(),
                    found: existing.value().version(),
                });
            }
        }
        // The store persists state, not pending events.
        let mut stored = ticket.clone();
        let _ = stored.take_events();
        stored.advance_version();
        self.tickets.insert(stored.id().clone(), stored.clone());
        Ok(stored)
    }

    async fn find_stale(
        &self,
        statuses: &[TicketStatus],
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let matching = self
            .tickets
            .iter()
            .filter(|entry| {
                statuses.contains(&entry.value().status())
                    && entry.value().created_at() <= cutoff
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(self.sorted_by_age(matching))
    }

    async fn find_unassigned(
        &self,
        statuses: &[TicketStatus],
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let matching = self
            .tickets
            .iter()
            .filter(|entry| {
                entry.value().assigned_to().is_none()
                    && statuses.contains(&entry.value().status())
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(self.sorted_by_age(matching))
    }

    async fn count_assigned(&self, agent_id: &AgentId) -> Result<u64, RepositoryError> {
        let count = self
            .tickets
            .iter()
            .filter(|entry| entry.value().assigned_to() == Some(agent_id))
            .count() as u64;
        Ok(count)
    }
}

/// In-memory agent directory
///
/// Derives workloads from the ticket repository it shares with the rest of
/// the process; agents never store their own counts.
pub struct InMemoryAgentDirectory {
    agents: DashMap<AgentId, Agent>,
    tickets: std::sync::Arc<InMemoryTicketRepository>,
}

impl InMemoryAgentDirectory {
    pub fn new(tickets: std::sync::Arc<InMemoryTicketRepository>) -> Self {
        Self {
            agents: DashMap::new(),
            tickets,
        }
    }

    pub fn add_agent(&self, agent: Agent) {
        self.agents.insert(agent.id.clone(), agent);
    }

    pub fn set_active(&self, id: &AgentId, active: bool) {
        if let Some(mut agent) = self.agents.get_mut(id) {
            agent.active = active;
        }
    }
}

#[async_trait]
impl AgentDirectory for InMemoryAgentDirectory {
    async fn find_active_agents(&self) -> Result<Vec<Agent>, RepositoryError> {
        let mut active: Vec<Agent> = self
            .agents
            .iter()
            .filter(|entry| entry.value().active)
            .map(|entry| entry.value().clone())
            .collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active)
    }

    async fn find_agent(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.agents.get(id).map(|entry| entry.value().clone()))
    }

    async fn count_active_tickets(&self, agent_id: &AgentId) -> Result<u64, RepositoryError> {
        const ACTIVE: [TicketStatus; 3] = [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Escalated,
        ];
        Ok(self.tickets.count_with_status(agent_id, &ACTIVE))
    }
}

/// Notification sink that logs the serialized record
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn publish(&self, notification: Notification) {
        let payload = serde_json::to_string(&notification).unwrap_or_default();
        info!(
            admin = notification.requires_admin_attention(),
            %payload,
            "support notification"
        );
    }
}

/// Notification sink that records everything for test inspection
#[derive(Default)]
pub struct CollectingNotifier {
    published: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    /// Take every notification published so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut self.published.lock().unwrap())
    }
}

#[async_trait]
impl NotificationSink for CollectingNotifier {
    async fn publish(&self, notification: Notification) {
        self.published.lock().unwrap().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Category, Priority};

    fn ticket() -> Ticket {
        Ticket::create(
            "Invoice mismatch",
            "Charged twice for one crate of onions",
            Category::Payment,
            Priority::High,
            "buyer-21",
        )
    }

    #[tokio::test]
    async fn test_save_and_find_round_trip() {
        let repo = InMemoryTicketRepository::new();
        let saved = repo.save(&ticket()).await.unwrap();
        assert_eq!(saved.version(), 1);

        let found = repo.find_by_id(saved.id()).await.unwrap().unwrap();
        assert_eq!(found.subject(), "Invoice mismatch");
        assert_eq!(found.version(), 1);
    }

    #[tokio::test]
    async fn test_stale_write_hits_version_conflict() {
        let repo = InMemoryTicketRepository::new();
        let saved = repo.save(&ticket()).await.unwrap();

        // Two readers load the same version.
        let mut first = repo.find_by_id(saved.id()).await.unwrap().unwrap();
        let mut second = repo.find_by_id(saved.id()).await.unwrap().unwrap();

        first.assign(AgentId::from_string("agent-a"));
        repo.save(&first).await.unwrap();

        second.assign(AgentId::from_string("agent-b"));
        let err = repo.save(&second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::VersionConflict { .. }));

        // The first writer's assignment survives.
        let stored = repo.find_by_id(saved.id()).await.unwrap().unwrap();
        assert_eq!(stored.assigned_to().unwrap().as_str(), "agent-a");
    }

    #[tokio::test]
    async fn test_find_stale_includes_cutoff_boundary() {
        let repo = InMemoryTicketRepository::new();
        let cutoff = Utc::now() - chrono::Duration::hours(48);

        let mut at_boundary = ticket();
        at_boundary.set_created_at(cutoff);
        let at_boundary = repo.save(&at_boundary).await.unwrap();

        let mut younger = ticket();
        younger.set_created_at(cutoff + chrono::Duration::seconds(1));
        repo.save(&younger).await.unwrap();

        let stale = repo
            .find_stale(&[TicketStatus::Open, TicketStatus::InProgress], cutoff)
            .await
            .unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].id(), at_boundary.id());
    }

    #[tokio::test]
    async fn test_find_unassigned_orders_oldest_first() {
        let repo = InMemoryTicketRepository::new();
        let now = Utc::now();

        let mut newer = ticket();
        newer.set_created_at(now);
        let newer = repo.save(&newer).await.unwrap();

        let mut older = ticket();
        older.set_created_at(now - chrono::Duration::hours(5));
        let older = repo.save(&older).await.unwrap();

        let mut taken = ticket();
        taken.assign(AgentId::from_string("agent-a"));
        repo.save(&taken).await.unwrap();

        let unassigned = repo
            .find_unassigned(&[TicketStatus::Open, TicketStatus::InProgress])
            .await
            .unwrap();
        assert_eq!(unassigned.len(), 2);
        assert_eq!(unassigned[0].id(), older.id());
        assert_eq!(unassigned[1].id(), newer.id());
    }

    #[tokio::test]
    async fn test_directory_counts_only_active_statuses() {
        let tickets = std::sync::Arc::new(InMemoryTicketRepository::new());
        let directory = InMemoryAgentDirectory::new(std::sync::Arc::clone(&tickets));
        directory.add_agent(Agent::new("agent-a", "Ada", "ada@agrimarket.example"));

        let agent_id = AgentId::from_string("agent-a");
        let mut open = ticket();
        open.assign(agent_id.clone());
        tickets.save(&open).await.unwrap();

        let mut done = ticket();
        done.assign(agent_id.clone());
        done.resolve();
        tickets.save(&done).await.unwrap();

        assert_eq!(directory.count_active_tickets(&agent_id).await.unwrap(), 1);
        assert_eq!(tickets.count_assigned(&agent_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails_the_caller() {
        let notifier = LogNotifier;
        notifier
            .publish(Notification::TicketEscalated {
                ticket_id: TicketId::new(),
                subject: "Stale case".into(),
                category: Category::Technical,
                priority: Priority::Low,
                created_at: Utc::now(),
                requester_id: "buyer-1".into(),
                assignee: None,
            })
            .await;
    }

    #[tokio::test]
    async fn test_inactive_agents_are_filtered() {
        let tickets = std::sync::Arc::new(InMemoryTicketRepository::new());
        let directory = InMemoryAgentDirectory::new(tickets);
        directory.add_agent(Agent::new("agent-b", "Ben", "ben@agrimarket.example"));
        directory.add_agent(Agent::new("agent-a", "Ada", "ada@agrimarket.example"));

        let active = directory.find_active_agents().await.unwrap();
        assert_eq!(active.len(), 2);
        // Ordered by id for deterministic selection downstream.
        assert_eq!(active[0].id.as_str(), "agent-a");

        directory.set_active(&AgentId::from_string("agent-a"), false);
        let active = directory.find_active_agents().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.as_str(), "agent-b");
    }
}
