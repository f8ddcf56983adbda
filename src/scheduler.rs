use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::ReviewState;

/// Recall quality reported by the learner. `Again` is a failed recall; the
/// other three are successful recalls of increasing ease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    pub fn from_int(rating: i32) -> Option<Rating> {
        match rating {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    /// Ease-factor delta applied on a successful recall.
    fn ease_delta(self, config: &SchedulerConfig) -> f64 {
        match self {
            Rating::Again => -config.lapse_penalty,
            Rating::Hard => config.hard_delta,
            Rating::Good => config.good_delta,
            Rating::Easy => config.easy_delta,
        }
    }
}

/// Tunable SM-2 parameters. The defaults match the classic algorithm:
/// 2.5 starting ease floored at 1.3, a 1-day relearning step, and the
/// 1-day / 6-day graduation intervals.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub default_ease: f64,
    pub minimum_ease: f64,
    pub lapse_penalty: f64,
    pub hard_delta: f64,
    pub good_delta: f64,
    pub easy_delta: f64,
    pub lapse_interval_days: i64,
    pub first_interval_days: i64,
    pub second_interval_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_ease: 2.5,
            minimum_ease: 1.3,
            lapse_penalty: 0.2,
            hard_delta: -0.15,
            good_delta: 0.0,
            easy_delta: 0.15,
            lapse_interval_days: 1,
            first_interval_days: 1,
            second_interval_days: 6,
        }
    }
}

/// SM-2 family review scheduler. Pure state-transition function: one prior
/// state and a rating in, one replacement state out. Persistence and
/// per-item write ordering are the caller's concern.
#[derive(Debug, Clone)]
pub struct Sm2Scheduler {
    config: SchedulerConfig,
}

impl Sm2Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// State for an item that has never been reviewed: due immediately.
    pub fn initial_state(&self, vocabulary_id: Uuid) -> ReviewState {
        ReviewState {
            vocabulary_id,
            interval_days: 0,
            ease_factor: self.config.default_ease,
            repetitions: 0,
            next_review_date: None,
            last_reviewed_at: None,
            review_count: 0,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
        }
    }

    /// Compute the replacement state for one review event. An absent
    /// `current` is treated as a brand-new item.
    pub fn schedule(
        &self,
        vocabulary_id: Uuid,
        current: Option<&ReviewState>,
        rating: Rating,
        reviewed_at: DateTime<Utc>,
    ) -> ReviewState {
        let base = match current {
            Some(state) => state.clone(),
            None => self.initial_state(vocabulary_id),
        };

        let mut next = match rating {
            Rating::Again => self.apply_lapse(base),
            _ => self.apply_success(base, rating),
        };

        next.review_count += 1;
        next.last_reviewed_at = Some(reviewed_at);
        next.next_review_date = Some(reviewed_at + Duration::days(next.interval_days));
        next
    }

    fn apply_lapse(&self, mut state: ReviewState) -> ReviewState {
        state.repetitions = 0;
        state.consecutive_incorrect += 1;
        state.consecutive_correct = 0;
        state.interval_days = self.config.lapse_interval_days;
        state.ease_factor =
            (state.ease_factor - self.config.lapse_penalty).max(self.config.minimum_ease);
        state
    }

    fn apply_success(&self, mut state: ReviewState, rating: Rating) -> ReviewState {
        let previous_interval = state.interval_days;

        state.repetitions += 1;
        state.consecutive_correct += 1;
        state.consecutive_incorrect = 0;
        state.ease_factor =
            (state.ease_factor + rating.ease_delta(&self.config)).max(self.config.minimum_ease);

        state.interval_days = match state.repetitions {
            1 => self.config.first_interval_days,
            2 => self.config.second_interval_days,
            _ => ((previous_interval as f64) * state.ease_factor).round().max(1.0) as i64,
        };

        state
    }
}

impl Default for Sm2Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
