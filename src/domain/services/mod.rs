//! Domain services module
//!
//! Pure assignment-selection logic. No I/O here: the application layer
//! gathers agents and workloads through the ports and hands them in.

use crate::domain::aggregates::Agent;
use crate::domain::value_objects::Category;

/// Least-loaded agent selection with expertise preference
pub struct AssignmentPolicy;

impl AssignmentPolicy {
    /// Restrict to agents whose expertise covers `category`; when no expert
    /// exists, degrade gracefully to every active agent.
    pub fn candidate_pool(agents: &[Agent], category: Category) -> Vec<Agent> {
        let experts: Vec<Agent> = agents
            .iter()
            .filter(|a| a.has_expertise(category))
            .cloned()
            .collect();
        if experts.is_empty() {
            agents.to_vec()
        } else {
            experts
        }
    }

    /// Pick the candidate with minimum workload.
    ///
    /// Ties break on agent id ordering so repeated runs over the same state
    /// select the same agent.
    pub fn select_least_loaded(candidates: Vec<(Agent, u64)>) -> Option<(Agent, u64)> {
        candidates
            .into_iter()
            .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)))
    }
}
