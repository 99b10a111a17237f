//! Score and best-score bookkeeping

/// Running score plus the best score seen by this process
///
/// `score` only grows within a run; `best` only grows across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTracker {
    score: u64,
    best: u64,
}

impl ScoreTracker {
    /// Start from a persisted best score
    pub fn new(best: u64) -> Self {
        Self { score: 0, best }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Add points; returns true if the best score improved
    pub fn add(&mut self, points: u64) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score > self.best {
            self.best = self.score;
            true
        } else {
            false
        }
    }

    /// New run: score back to zero, best kept
    pub fn reset(&mut self) {
        self.score = 0;
    }
}
