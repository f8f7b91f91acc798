use crate::RoundResult;
use gol_engines::Simulation;
use std::time::Duration;
use tracing::info;

/// Best simulation seen so far.
pub struct Best {
    pub index: u64,
    pub score: u64,
    pub simulation: Simulation,
}

/// Outcome of a whole search.
pub struct Summary {
    pub rounds: u64,
    pub elapsed: Duration,
    pub best: Option<Best>,
}

impl Summary {
    /// Score of the best simulation, `0` if none qualified.
    pub fn best_score(&self) -> u64 {
        self.best.as_ref().map_or(0, |b| b.score)
    }
}

/// Consumes results in arrival order and keeps the longest qualifying run.
///
/// A run qualifies only if it stopped before the generation limit, i.e. it
/// really stalled instead of being cut off.
pub struct Aggregator {
    limit: u64,
    received: u64,
    best: Option<Best>,
}

impl Aggregator {
    /// `limit == 0` means runs were unbounded and every result qualifies.
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            received: 0,
            best: None,
        }
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.limit == 0 || score < self.limit
    }

    pub fn observe(&mut self, result: RoundResult) {
        self.received += 1;
        info!(round = result.index, score = result.score, "Simulation round finished");

        let best_score = self.best.as_ref().map_or(0, |b| b.score);
        if self.qualifies(result.score) && result.score > best_score {
            self.best = Some(Best {
                index: result.index,
                score: result.score,
                simulation: result.simulation,
            });
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn best(&self) -> Option<&Best> {
        self.best.as_ref()
    }

    pub fn finish(self, elapsed: Duration) -> Summary {
        Summary {
            rounds: self.received,
            elapsed,
            best: self.best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: u64, score: u64) -> RoundResult {
        RoundResult {
            index,
            score,
            simulation: Simulation::blank(1, 1).unwrap(),
        }
    }

    fn pick(limit: u64, scores: &[u64]) -> Option<(u64, u64)> {
        let mut aggregator = Aggregator::new(limit);
        for (i, &score) in scores.iter().enumerate() {
            aggregator.observe(result(i as u64 + 1, score));
        }
        assert_eq!(aggregator.received(), scores.len() as u64);
        aggregator.best().map(|b| (b.index, b.score))
    }

    #[test]
    fn test_cut_off_runs_are_ignored() {
        assert_eq!(pick(100, &[100, 40, 100, 99, 7]), Some((4, 99)));
        assert_eq!(pick(100, &[100, 100]), None);
        assert_eq!(pick(100, &[]), None);
    }

    #[test]
    fn test_ties_keep_first_arrival() {
        assert_eq!(pick(50, &[3, 12, 12, 5]), Some((2, 12)));
    }

    #[test]
    fn test_unbounded_limit_accepts_everything() {
        assert_eq!(pick(0, &[3, 5000, 12]), Some((2, 5000)));
    }

    #[test]
    fn test_summary_without_best() {
        let mut aggregator = Aggregator::new(10);
        aggregator.observe(result(1, 10));
        let summary = aggregator.finish(Duration::from_millis(5));
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.best_score(), 0);
        assert!(summary.best.is_none());
    }
}
