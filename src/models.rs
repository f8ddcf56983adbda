use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A word/translation pair a learner is studying. Identity is immutable;
/// `comprehension` is learner-owned metadata updated by the editing flow,
/// never by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub word: String,
    pub translation: String,
    pub language: String,
    pub comprehension: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Scheduling state for one vocabulary item, created lazily at first
/// exposure. Mutated only by replacing the whole row with a scheduler
/// output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub vocabulary_id: Uuid,
    /// Days until the next review; 0 only before the first review.
    pub interval_days: i64,
    /// Multiplicative difficulty modifier, floored at the configured minimum.
    pub ease_factor: f64,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: i32,
    /// None means never scheduled: the item is due immediately.
    pub next_review_date: Option<DateTime<Utc>>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Lifetime review count; never decreases, even on a lapse.
    pub review_count: i32,
    pub consecutive_correct: i32,
    pub consecutive_incorrect: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVocabularyRequest {
    pub user_id: Uuid,
    pub word: String,
    pub translation: String,
    pub language: String,
    pub comprehension: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVocabularyRequest {
    pub word: Option<String>,
    pub translation: Option<String>,
    pub comprehension: Option<i32>,
}

/// Payload for recording a review outcome. `rating` uses the 1-4 scale
/// (1=Again, 2=Hard, 3=Good, 4=Easy). `reviewed_at` defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub rating: i32,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub response_time_ms: Option<u64>,
}

/// A vocabulary item paired with its review state, as surfaced by the
/// due-words query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueWord {
    pub item: VocabularyItem,
    pub state: ReviewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueWordsResponse {
    pub words: Vec<DueWord>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueCountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub message: String,
    pub count: u64,
}
