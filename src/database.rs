use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        let db = Database { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vocabulary (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                word TEXT NOT NULL,
                translation TEXT NOT NULL,
                language TEXT NOT NULL,
                comprehension INTEGER,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS review_states (
                vocabulary_id TEXT PRIMARY KEY,
                interval_days INTEGER NOT NULL DEFAULT 0,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                repetitions INTEGER NOT NULL DEFAULT 0,
                next_review_date TEXT,
                last_reviewed_at TEXT,
                review_count INTEGER NOT NULL DEFAULT 0,
                consecutive_correct INTEGER NOT NULL DEFAULT 0,
                consecutive_incorrect INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (vocabulary_id) REFERENCES vocabulary(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Vocabulary operations
    pub async fn create_vocabulary(&self, request: CreateVocabularyRequest) -> Result<VocabularyItem> {
        let item = VocabularyItem {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            word: request.word,
            translation: request.translation,
            language: request.language,
            comprehension: request.comprehension,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO vocabulary (id, user_id, word, translation, language, comprehension, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item.id.to_string())
        .bind(item.user_id.to_string())
        .bind(&item.word)
        .bind(&item.translation)
        .bind(&item.language)
        .bind(item.comprehension)
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn get_vocabulary(&self, id: Uuid) -> Result<Option<VocabularyItem>> {
        let row = sqlx::query("SELECT * FROM vocabulary WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_vocabulary(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_all_vocabulary(&self) -> Result<Vec<VocabularyItem>> {
        let rows = sqlx::query("SELECT * FROM vocabulary ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_vocabulary).collect()
    }

    pub async fn update_vocabulary(&self, item: &VocabularyItem) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE vocabulary
            SET word = ?1, translation = ?2, comprehension = ?3
            WHERE id = ?4
            "#,
        )
        .bind(&item.word)
        .bind(&item.translation)
        .bind(item.comprehension)
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_vocabulary(&self, id: Uuid) -> Result<bool> {
        // The pool does not enable foreign_keys on every connection, so the
        // cascade is applied explicitly inside one transaction.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM review_states WHERE vocabulary_id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM vocabulary WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // Review state operations
    pub async fn load_review_state(&self, vocabulary_id: Uuid) -> Result<Option<ReviewState>> {
        let row = sqlx::query("SELECT * FROM review_states WHERE vocabulary_id = ?1")
            .bind(vocabulary_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_review_state(&row)?)),
            None => Ok(None),
        }
    }

    /// Replace the whole state row for one item. Called once per review
    /// event with the scheduler's output.
    pub async fn save_review_state(&self, state: &ReviewState) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO review_states
                (vocabulary_id, interval_days, ease_factor, repetitions,
                 next_review_date, last_reviewed_at, review_count,
                 consecutive_correct, consecutive_incorrect)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(state.vocabulary_id.to_string())
        .bind(state.interval_days)
        .bind(state.ease_factor)
        .bind(state.repetitions)
        .bind(state.next_review_date.map(|d| d.to_rfc3339()))
        .bind(state.last_reviewed_at.map(|d| d.to_rfc3339()))
        .bind(state.review_count)
        .bind(state.consecutive_correct)
        .bind(state.consecutive_incorrect)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create-if-absent for the initializer. Returns true when a new row
    /// was written; an existing row is left untouched.
    pub async fn create_review_state_if_absent(&self, state: &ReviewState) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO review_states
                (vocabulary_id, interval_days, ease_factor, repetitions,
                 next_review_date, last_reviewed_at, review_count,
                 consecutive_correct, consecutive_incorrect)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(state.vocabulary_id.to_string())
        .bind(state.interval_days)
        .bind(state.ease_factor)
        .bind(state.repetitions)
        .bind(state.next_review_date.map(|d| d.to_rfc3339()))
        .bind(state.last_reviewed_at.map(|d| d.to_rfc3339()))
        .bind(state.review_count)
        .bind(state.consecutive_correct)
        .bind(state.consecutive_incorrect)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_vocabulary_without_review(&self) -> Result<Vec<VocabularyItem>> {
        let rows = sqlx::query(
            r#"
            SELECT v.* FROM vocabulary v
            LEFT JOIN review_states r ON r.vocabulary_id = v.id
            WHERE r.vocabulary_id IS NULL
            ORDER BY v.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_vocabulary).collect()
    }

    pub async fn list_vocabulary_with_review(&self) -> Result<Vec<DueWord>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.user_id, v.word, v.translation, v.language,
                   v.comprehension, v.created_at,
                   r.interval_days, r.ease_factor, r.repetitions,
                   r.next_review_date, r.last_reviewed_at, r.review_count,
                   r.consecutive_correct, r.consecutive_incorrect
            FROM vocabulary v
            INNER JOIN review_states r ON r.vocabulary_id = v.id
            ORDER BY v.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::new();
        for row in &rows {
            let item = row_to_vocabulary(row)?;
            let vocabulary_id = item.id;
            entries.push(DueWord {
                item,
                state: ReviewState {
                    vocabulary_id,
                    interval_days: row.get("interval_days"),
                    ease_factor: row.get("ease_factor"),
                    repetitions: row.get("repetitions"),
                    next_review_date: parse_optional_date(row.get("next_review_date"))?,
                    last_reviewed_at: parse_optional_date(row.get("last_reviewed_at"))?,
                    review_count: row.get("review_count"),
                    consecutive_correct: row.get("consecutive_correct"),
                    consecutive_incorrect: row.get("consecutive_incorrect"),
                },
            });
        }

        Ok(entries)
    }
}

fn row_to_vocabulary(row: &sqlx::sqlite::SqliteRow) -> Result<VocabularyItem> {
    Ok(VocabularyItem {
        id: Uuid::parse_str(&row.get::<String, _>("id"))?,
        user_id: Uuid::parse_str(&row.get::<String, _>("user_id"))?,
        word: row.get("word"),
        translation: row.get("translation"),
        language: row.get("language"),
        comprehension: row.get("comprehension"),
        created_at: parse_date(&row.get::<String, _>("created_at"))?,
    })
}

fn row_to_review_state(row: &sqlx::sqlite::SqliteRow) -> Result<ReviewState> {
    Ok(ReviewState {
        vocabulary_id: Uuid::parse_str(&row.get::<String, _>("vocabulary_id"))?,
        interval_days: row.get("interval_days"),
        ease_factor: row.get("ease_factor"),
        repetitions: row.get("repetitions"),
        next_review_date: parse_optional_date(row.get("next_review_date"))?,
        last_reviewed_at: parse_optional_date(row.get("last_reviewed_at"))?,
        review_count: row.get("review_count"),
        consecutive_correct: row.get("consecutive_correct"),
        consecutive_incorrect: row.get("consecutive_incorrect"),
    })
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn parse_optional_date(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(s) => Ok(Some(parse_date(&s)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    fn vocabulary_request(word: &str) -> CreateVocabularyRequest {
        CreateVocabularyRequest {
            user_id: Uuid::new_v4(),
            word: word.to_string(),
            translation: format!("{} (en)", word),
            language: "es".to_string(),
            comprehension: None,
        }
    }

    #[tokio::test]
    async fn test_vocabulary_crud_roundtrip() {
        let db = create_test_db().await;

        let created = db.create_vocabulary(vocabulary_request("gato")).await.unwrap();
        let fetched = db.get_vocabulary(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.word, "gato");

        let mut updated = fetched.clone();
        updated.translation = "cat".to_string();
        updated.comprehension = Some(4);
        db.update_vocabulary(&updated).await.unwrap();

        let fetched = db.get_vocabulary(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.translation, "cat");
        assert_eq!(fetched.comprehension, Some(4));

        assert!(db.delete_vocabulary(created.id).await.unwrap());
        assert!(db.get_vocabulary(created.id).await.unwrap().is_none());
        assert!(!db.delete_vocabulary(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_review_state_save_and_load() {
        let db = create_test_db().await;
        let item = db.create_vocabulary(vocabulary_request("perro")).await.unwrap();

        assert!(db.load_review_state(item.id).await.unwrap().is_none());

        let state = ReviewState {
            vocabulary_id: item.id,
            interval_days: 6,
            ease_factor: 2.5,
            repetitions: 2,
            next_review_date: Some(Utc::now()),
            last_reviewed_at: Some(Utc::now()),
            review_count: 2,
            consecutive_correct: 2,
            consecutive_incorrect: 0,
        };
        db.save_review_state(&state).await.unwrap();

        let loaded = db.load_review_state(item.id).await.unwrap().unwrap();
        assert_eq!(loaded.interval_days, 6);
        assert_eq!(loaded.repetitions, 2);
        assert!(loaded.next_review_date.is_some());
    }

    #[tokio::test]
    async fn test_create_if_absent_leaves_existing_row_untouched() {
        let db = create_test_db().await;
        let item = db.create_vocabulary(vocabulary_request("casa")).await.unwrap();

        let mut state = ReviewState {
            vocabulary_id: item.id,
            interval_days: 0,
            ease_factor: 2.5,
            repetitions: 0,
            next_review_date: None,
            last_reviewed_at: None,
            review_count: 0,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
        };

        assert!(db.create_review_state_if_absent(&state).await.unwrap());

        state.interval_days = 99;
        assert!(!db.create_review_state_if_absent(&state).await.unwrap());

        let loaded = db.load_review_state(item.id).await.unwrap().unwrap();
        assert_eq!(loaded.interval_days, 0);
    }

    #[tokio::test]
    async fn test_listing_splits_on_review_state_presence() {
        let db = create_test_db().await;
        let with_state = db.create_vocabulary(vocabulary_request("uno")).await.unwrap();
        let without_state = db.create_vocabulary(vocabulary_request("dos")).await.unwrap();

        let state = ReviewState {
            vocabulary_id: with_state.id,
            interval_days: 0,
            ease_factor: 2.5,
            repetitions: 0,
            next_review_date: None,
            last_reviewed_at: None,
            review_count: 0,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
        };
        db.save_review_state(&state).await.unwrap();

        let missing = db.list_vocabulary_without_review().await.unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].id, without_state.id);

        let paired = db.list_vocabulary_with_review().await.unwrap();
        assert_eq!(paired.len(), 1);
        assert_eq!(paired[0].item.id, with_state.id);
        assert!(paired[0].state.next_review_date.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_review_state() {
        let db = create_test_db().await;
        let item = db.create_vocabulary(vocabulary_request("sol")).await.unwrap();

        let state = ReviewState {
            vocabulary_id: item.id,
            interval_days: 1,
            ease_factor: 2.5,
            repetitions: 1,
            next_review_date: Some(Utc::now()),
            last_reviewed_at: Some(Utc::now()),
            review_count: 1,
            consecutive_correct: 1,
            consecutive_incorrect: 0,
        };
        db.save_review_state(&state).await.unwrap();

        db.delete_vocabulary(item.id).await.unwrap();
        assert!(db.load_review_state(item.id).await.unwrap().is_none());
    }
}
