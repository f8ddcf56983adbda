use chrono::{DateTime, Utc};

use crate::errors::ApiError;
use crate::models::DueWord;

/// An entry is due when it has never been scheduled or its next review
/// date has arrived.
fn is_due(entry: &DueWord, as_of: DateTime<Utc>) -> bool {
    match entry.state.next_review_date {
        None => true,
        Some(next_review) => next_review <= as_of,
    }
}

/// Filter and order the due set: never-scheduled words first (oldest word
/// first), then previously reviewed words by ascending next review date so
/// the most overdue surface first. `limit` truncates the ordered result.
pub fn select_due(
    entries: Vec<DueWord>,
    as_of: DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<DueWord> {
    let mut due: Vec<DueWord> = entries
        .into_iter()
        .filter(|entry| is_due(entry, as_of))
        .collect();

    due.sort_by(|a, b| match (a.state.next_review_date, b.state.next_review_date) {
        (None, None) => a.item.created_at.cmp(&b.item.created_at),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a_next), Some(b_next)) => a_next.cmp(&b_next),
    });

    if let Some(limit) = limit {
        due.truncate(limit);
    }
    due
}

/// Count of due entries as of the given instant.
pub fn due_count(entries: &[DueWord], as_of: DateTime<Utc>) -> usize {
    entries.iter().filter(|entry| is_due(entry, as_of)).count()
}

/// Validate the optional `limit` query parameter. Absent means unlimited;
/// anything non-numeric or below 1 is rejected rather than clamped.
pub fn parse_limit(raw: Option<&str>) -> Result<Option<usize>, ApiError> {
    match raw {
        None => Ok(None),
        Some(value) => match value.parse::<i64>() {
            Ok(limit) if limit >= 1 => Ok(Some(limit as usize)),
            Ok(limit) => Err(ApiError::InvalidLimit(format!(
                "limit must be a positive integer, got {}",
                limit
            ))),
            Err(_) => Err(ApiError::InvalidLimit(format!(
                "limit must be a positive integer, got '{}'",
                value
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReviewState, VocabularyItem};
    use chrono::Duration;
    use uuid::Uuid;

    fn entry(next_review: Option<DateTime<Utc>>, created_at: DateTime<Utc>) -> DueWord {
        let id = Uuid::new_v4();
        DueWord {
            item: VocabularyItem {
                id,
                user_id: Uuid::new_v4(),
                word: "palabra".to_string(),
                translation: "word".to_string(),
                language: "es".to_string(),
                comprehension: None,
                created_at,
            },
            state: ReviewState {
                vocabulary_id: id,
                interval_days: 1,
                ease_factor: 2.5,
                repetitions: 1,
                next_review_date: next_review,
                last_reviewed_at: next_review.map(|d| d - Duration::days(1)),
                review_count: 1,
                consecutive_correct: 1,
                consecutive_incorrect: 0,
            },
        }
    }

    #[test]
    fn test_due_selection_includes_unscheduled_and_overdue_only() {
        let now = Utc::now();
        let never = entry(None, now);
        let overdue = entry(Some(now - Duration::days(3)), now);
        let due_now = entry(Some(now), now);
        let future = entry(Some(now + Duration::days(2)), now);

        let selected = select_due(
            vec![future.clone(), due_now.clone(), never.clone(), overdue.clone()],
            now,
            None,
        );

        let ids: Vec<Uuid> = selected.iter().map(|e| e.item.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&never.item.id));
        assert!(ids.contains(&overdue.item.id));
        assert!(ids.contains(&due_now.item.id));
        assert!(!ids.contains(&future.item.id));
    }

    #[test]
    fn test_never_scheduled_words_come_first_then_most_overdue() {
        let now = Utc::now();
        let never_old = entry(None, now - Duration::days(10));
        let never_new = entry(None, now - Duration::days(1));
        let overdue_far = entry(Some(now - Duration::days(5)), now);
        let overdue_near = entry(Some(now - Duration::days(1)), now);

        let selected = select_due(
            vec![
                overdue_near.clone(),
                never_new.clone(),
                overdue_far.clone(),
                never_old.clone(),
            ],
            now,
            None,
        );

        let ids: Vec<Uuid> = selected.iter().map(|e| e.item.id).collect();
        assert_eq!(
            ids,
            vec![
                never_old.item.id,
                never_new.item.id,
                overdue_far.item.id,
                overdue_near.item.id,
            ]
        );
    }

    #[test]
    fn test_limit_truncates_ordered_result() {
        let now = Utc::now();
        let entries: Vec<DueWord> = (0..5)
            .map(|days| entry(Some(now - Duration::days(days)), now))
            .collect();

        let selected = select_due(entries, now, Some(3));
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_due_count_matches_selection() {
        let now = Utc::now();
        let entries = vec![
            entry(None, now),
            entry(Some(now - Duration::days(1)), now),
            entry(Some(now + Duration::days(1)), now),
        ];

        assert_eq!(due_count(&entries, now), 2);
        assert_eq!(select_due(entries, now, None).len(), 2);
    }

    #[test]
    fn test_parse_limit_accepts_positive_integers() {
        assert_eq!(parse_limit(None).unwrap(), None);
        assert_eq!(parse_limit(Some("1")).unwrap(), Some(1));
        assert_eq!(parse_limit(Some("25")).unwrap(), Some(25));
    }

    #[test]
    fn test_parse_limit_rejects_non_positive_and_non_numeric() {
        assert!(matches!(
            parse_limit(Some("0")),
            Err(ApiError::InvalidLimit(_))
        ));
        assert!(matches!(
            parse_limit(Some("-3")),
            Err(ApiError::InvalidLimit(_))
        ));
        assert!(matches!(
            parse_limit(Some("abc")),
            Err(ApiError::InvalidLimit(_))
        ));
        assert!(matches!(
            parse_limit(Some("2.5")),
            Err(ApiError::InvalidLimit(_))
        ));
    }
}
