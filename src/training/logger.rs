//! Training-round logging.

use log::info;

use super::eval::MetricValue;

/// How much the trainer reports while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Silent,
    #[default]
    Info,
}

/// Emits round-progress lines through the `log` facade.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    /// Log metric lines every this many rounds (0 logs every round).
    log_every: u32,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity, log_every: u32) -> Self {
        Self { verbosity, log_every }
    }

    pub fn start_training(&self, n_rounds: u32) {
        if self.verbosity >= Verbosity::Info {
            info!("training up to {n_rounds} boosting rounds");
        }
    }

    pub fn log_metrics(&self, round: u32, metrics: &[MetricValue]) {
        if self.verbosity < Verbosity::Info || metrics.is_empty() {
            return;
        }
        if self.log_every > 1 && round % self.log_every != 0 {
            return;
        }
        let line: Vec<String> = metrics.iter().map(|m| m.to_string()).collect();
        info!("[{round}] {}", line.join("  "));
    }

    pub fn log_early_stopping(&self, round: u32, best_round: usize, metric_name: &str) {
        if self.verbosity >= Verbosity::Info {
            info!("early stopping at round {round}; best {metric_name} was at round {best_round}");
        }
    }

    pub fn finish_training(&self, n_trees: usize) {
        if self.verbosity >= Verbosity::Info {
            info!("training finished with {n_trees} trees");
        }
    }
}
