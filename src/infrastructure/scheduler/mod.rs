//! Sweep scheduler
//!
//! Timer trigger for the escalation sweep. The sweep itself is a plain
//! use-case call on `EscalationUseCases`; this module only supplies the
//! periodic invocation so the decision logic stays testable without real
//! time passing.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::SupportConfig;
use crate::ports::inbound::EscalationUseCases;

/// Background task that runs the escalation sweep on a fixed period.
pub async fn escalation_sweep_task(
    service: Arc<dyn EscalationUseCases>,
    period: std::time::Duration,
    age_threshold: chrono::Duration,
) {
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;

        match service.sweep(Utc::now(), age_threshold).await {
            Ok(report) if report.count() == 0 && report.skipped == 0 => {
                debug!("sweep tick: nothing to escalate");
            }
            Ok(report) => {
                info!(
                    escalated = report.count(),
                    skipped = report.skipped,
                    "sweep tick escalated stale tickets"
                );
            }
            Err(err) => {
                // Next tick retries from scratch.
                warn!(error = %err, "sweep tick failed");
            }
        }
    }
}

/// Spawn the sweep task with the deployed configuration.
pub fn spawn_sweeper(
    service: Arc<dyn EscalationUseCases>,
    config: &SupportConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(escalation_sweep_task(
        service,
        config.sweep_period(),
        config.escalation_threshold(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::EscalationService;
    use crate::domain::aggregates::Ticket;
    use crate::domain::value_objects::{Category, Priority, TicketStatus};
    use crate::infrastructure::persistence::{
        CollectingNotifier, InMemoryAgentDirectory, InMemoryTicketRepository,
    };
    use crate::ports::outbound::{AgentDirectory, NotificationSink, TicketRepository};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_escalates_on_tick() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let agents = Arc::new(InMemoryAgentDirectory::new(Arc::clone(&tickets)));
        let notifier = Arc::new(CollectingNotifier::default());

        let mut stale = Ticket::create(
            "Fertilizer refund pending",
            "",
            Category::Payment,
            Priority::Medium,
            "farmer-3",
        );
        stale.set_created_at(Utc::now() - chrono::Duration::hours(72));
        let stale = tickets.save(&stale).await.unwrap();

        let service = Arc::new(EscalationService::new(
            Arc::clone(&tickets) as Arc<dyn TicketRepository>,
            Arc::clone(&agents) as Arc<dyn AgentDirectory>,
            Arc::clone(&notifier) as Arc<dyn NotificationSink>,
        ));

        let handle = spawn_sweeper(
            Arc::clone(&service) as Arc<dyn EscalationUseCases>,
            &SupportConfig::default(),
        );

        // First interval tick fires immediately; let the task run it.
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        handle.abort();

        let stored = tickets.find_by_id(stale.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), TicketStatus::Escalated);
        assert_eq!(notifier.drain().len(), 1);
    }
}
