use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::Database;
use crate::due;
use crate::errors::ApiError;
use crate::models::*;
use crate::scheduler::{Rating, Sm2Scheduler};
use crate::{log_service_start, log_service_success};

/// Service layer for the review loop: reads state, runs the pure scheduler,
/// writes the replacement state back exactly once per review event.
#[derive(Clone)]
pub struct ReviewService {
    db: Database,
    scheduler: Sm2Scheduler,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            scheduler: Sm2Scheduler::new(),
        }
    }

    // Vocabulary CRUD operations
    pub async fn create_vocabulary(&self, request: CreateVocabularyRequest) -> Result<VocabularyItem> {
        self.db.create_vocabulary(request).await
    }

    pub async fn get_vocabulary(&self, id: Uuid) -> Result<Option<VocabularyItem>> {
        self.db.get_vocabulary(id).await
    }

    pub async fn get_all_vocabulary(&self) -> Result<Vec<VocabularyItem>> {
        self.db.get_all_vocabulary().await
    }

    pub async fn update_vocabulary(
        &self,
        id: Uuid,
        request: UpdateVocabularyRequest,
    ) -> Result<Option<VocabularyItem>> {
        let mut item = match self.db.get_vocabulary(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };

        if let Some(word) = request.word {
            item.word = word;
        }
        if let Some(translation) = request.translation {
            item.translation = translation;
        }
        if let Some(comprehension) = request.comprehension {
            item.comprehension = Some(comprehension);
        }

        self.db.update_vocabulary(&item).await?;
        Ok(Some(item))
    }

    pub async fn delete_vocabulary(&self, id: Uuid) -> Result<bool> {
        self.db.delete_vocabulary(id).await
    }

    // Review operations

    /// Record one review event: validate the rating, run the scheduler
    /// against the last stored state and persist the replacement. A missing
    /// state is treated as a brand-new item.
    pub async fn submit_review(
        &self,
        vocabulary_id: Uuid,
        rating: i32,
        reviewed_at: Option<DateTime<Utc>>,
    ) -> Result<ReviewState, ApiError> {
        let rating = Rating::from_int(rating).ok_or_else(|| {
            ApiError::InvalidRating(format!("rating {} outside the 1-4 scale", rating))
        })?;

        if self.db.get_vocabulary(vocabulary_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Vocabulary item '{}' not found",
                vocabulary_id
            )));
        }

        log_service_start!("review_service", "submit_review", vocabulary_id = vocabulary_id);

        let current = self.db.load_review_state(vocabulary_id).await?;
        let reviewed_at = reviewed_at.unwrap_or_else(Utc::now);
        let next = self
            .scheduler
            .schedule(vocabulary_id, current.as_ref(), rating, reviewed_at);

        self.db.save_review_state(&next).await?;

        log_service_success!("review_service", "submit_review", vocabulary_id = vocabulary_id);
        Ok(next)
    }

    /// Ordered due set as of the given instant, optionally capped.
    pub async fn due_words(
        &self,
        as_of: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<DueWord>, ApiError> {
        let entries = self.db.list_vocabulary_with_review().await?;
        Ok(due::select_due(entries, as_of, limit))
    }

    pub async fn due_count(&self, as_of: DateTime<Utc>) -> Result<usize, ApiError> {
        let entries = self.db.list_vocabulary_with_review().await?;
        Ok(due::due_count(&entries, as_of))
    }

    /// Backfill review state for vocabulary created before scheduling
    /// existed or added out-of-band. Per-item create-if-absent, so it is
    /// safe to interrupt and re-run.
    pub async fn initialize_missing(&self) -> Result<u64> {
        log_service_start!("review_service", "initialize_missing");

        let missing = self.db.list_vocabulary_without_review().await?;
        let mut created = 0u64;
        for item in missing {
            let state = self.scheduler.initial_state(item.id);
            if self.db.create_review_state_if_absent(&state).await? {
                created += 1;
            }
        }

        log_service_success!("review_service", "initialize_missing", count = created);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn create_test_service() -> ReviewService {
        let db = Database::new("sqlite::memory:").await.unwrap();
        ReviewService::new(db)
    }

    async fn add_word(service: &ReviewService, word: &str) -> VocabularyItem {
        service
            .create_vocabulary(CreateVocabularyRequest {
                user_id: Uuid::new_v4(),
                word: word.to_string(),
                translation: format!("{} (en)", word),
                language: "es".to_string(),
                comprehension: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_missing_is_idempotent() {
        let service = create_test_service().await;
        add_word(&service, "uno").await;
        add_word(&service, "dos").await;
        add_word(&service, "tres").await;

        assert_eq!(service.initialize_missing().await.unwrap(), 3);
        assert_eq!(service.initialize_missing().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_initialized_words_are_due_immediately() {
        let service = create_test_service().await;
        let item = add_word(&service, "agua").await;
        service.initialize_missing().await.unwrap();

        let due = service.due_words(Utc::now(), None).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].item.id, item.id);
        assert!(due[0].state.next_review_date.is_none());
        assert_eq!(service.due_count(Utc::now()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_review_creates_state_when_absent() {
        let service = create_test_service().await;
        let item = add_word(&service, "fuego").await;

        // No initializer run; the first review creates the state implicitly.
        let state = service.submit_review(item.id, 3, None).await.unwrap();
        assert_eq!(state.repetitions, 1);
        assert_eq!(state.interval_days, 1);
        assert_eq!(state.review_count, 1);

        let stored = service.db.load_review_state(item.id).await.unwrap().unwrap();
        assert_eq!(stored, state);
    }

    #[tokio::test]
    async fn test_reviewed_word_leaves_the_due_set() {
        let service = create_test_service().await;
        let item = add_word(&service, "luna").await;
        service.initialize_missing().await.unwrap();
        assert_eq!(service.due_count(Utc::now()).await.unwrap(), 1);

        service.submit_review(item.id, 4, None).await.unwrap();

        assert_eq!(service.due_count(Utc::now()).await.unwrap(), 0);
        // It is due again once its interval has elapsed.
        let later = Utc::now() + Duration::days(2);
        assert_eq!(service.due_count(later).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_rating_rejected_before_any_mutation() {
        let service = create_test_service().await;
        let item = add_word(&service, "cielo").await;

        let result = service.submit_review(item.id, 7, None).await;
        assert!(matches!(result, Err(ApiError::InvalidRating(_))));
        assert!(service.db.load_review_state(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_review_of_unknown_word_is_not_found() {
        let service = create_test_service().await;
        let result = service.submit_review(Uuid::new_v4(), 3, None).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_consecutive_reviews_compound_through_persistence() {
        let service = create_test_service().await;
        let item = add_word(&service, "tierra").await;
        let start = Utc::now();

        let first = service.submit_review(item.id, 3, Some(start)).await.unwrap();
        assert_eq!(first.interval_days, 1);

        let second = service
            .submit_review(item.id, 3, Some(start + Duration::days(1)))
            .await
            .unwrap();
        assert_eq!(second.interval_days, 6);

        let third = service
            .submit_review(item.id, 3, Some(start + Duration::days(7)))
            .await
            .unwrap();
        assert_eq!(third.interval_days, 15);
        assert_eq!(third.review_count, 3);
    }

    #[tokio::test]
    async fn test_due_limit_caps_result() {
        let service = create_test_service().await;
        for word in ["a", "b", "c", "d", "e"] {
            add_word(&service, word).await;
        }
        service.initialize_missing().await.unwrap();

        let due = service.due_words(Utc::now(), Some(3)).await.unwrap();
        assert_eq!(due.len(), 3);
    }

    #[tokio::test]
    async fn test_update_vocabulary_does_not_touch_review_state() {
        let service = create_test_service().await;
        let item = add_word(&service, "viento").await;
        let state = service.submit_review(item.id, 3, None).await.unwrap();

        let updated = service
            .update_vocabulary(
                item.id,
                UpdateVocabularyRequest {
                    word: None,
                    translation: Some("wind".to_string()),
                    comprehension: Some(5),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.translation, "wind");

        let stored = service.db.load_review_state(item.id).await.unwrap().unwrap();
        assert_eq!(stored, state);
    }
}
