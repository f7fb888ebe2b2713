//! Deployed configuration defaults for the support core.

use serde::{Deserialize, Serialize};

/// Tunables for the escalation sweeper.
///
/// The threshold and period are parameters everywhere in the core; this
/// struct only carries the values the deployment wires in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupportConfig {
    /// Age after which an unresolved ticket is force-escalated.
    #[serde(default = "default_escalation_threshold_hours")]
    pub escalation_threshold_hours: i64,

    /// Period between escalation sweeps.
    #[serde(default = "default_sweep_period_secs")]
    pub sweep_period_secs: u64,
}

fn default_escalation_threshold_hours() -> i64 {
    48
}

fn default_sweep_period_secs() -> u64 {
    600
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            escalation_threshold_hours: default_escalation_threshold_hours(),
            sweep_period_secs: default_sweep_period_secs(),
        }
    }
}

impl SupportConfig {
    /// Escalation age threshold as a chrono duration.
    pub fn escalation_threshold(&self) -> chrono::Duration {
        chrono::Duration::hours(self.escalation_threshold_hours)
    }

    /// Sweep period as a std duration, usable with the tokio timer.
    pub fn sweep_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_period_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployed_defaults() {
        let config = SupportConfig::default();
        assert_eq!(config.escalation_threshold(), chrono::Duration::hours(48));
        assert_eq!(config.sweep_period(), std::time::Duration::from_secs(600));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SupportConfig =
            serde_json::from_str(r#"{"escalation_threshold_hours": 2}"#).unwrap();
        assert_eq!(config.escalation_threshold_hours, 2);
        assert_eq!(config.sweep_period_secs, 600);
    }
}
