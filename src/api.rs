use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    access::{AccessDecision, AccessPolicy, Action},
    due,
    errors::{ApiError, ErrorContext},
    models::*,
    review_service::ReviewService,
};

// Import logging macros
use crate::{log_api_start, log_api_success, log_api_warn};

#[derive(Clone)]
pub struct AppState {
    pub review_service: ReviewService,
    pub access_policy: Arc<dyn AccessPolicy>,
}

#[derive(Deserialize)]
pub struct DueWordsParams {
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

async fn check_access(
    state: &AppState,
    user_id: Option<Uuid>,
    action: Action,
    operation: &str,
) -> Result<(), (StatusCode, Json<ApiResponse<()>>)> {
    match state.access_policy.can_perform(user_id, action).await {
        AccessDecision::Allowed => Ok(()),
        AccessDecision::Denied { reason } => {
            log_api_warn!(operation, "action denied by access policy");
            let error = ApiError::AccessDenied(reason);
            let context = ErrorContext::new(operation, action.as_str());
            Err(error.to_response_with_context(context))
        }
    }
}

// Vocabulary endpoints
pub async fn create_vocabulary(
    State(state): State<AppState>,
    Json(request): Json<CreateVocabularyRequest>,
) -> ApiResult<VocabularyItem> {
    info!(
        user_id = %request.user_id,
        word = %request.word,
        language = %request.language,
        "Creating vocabulary item"
    );

    check_access(
        &state,
        Some(request.user_id),
        Action::AddVocabulary,
        "create_vocabulary",
    )
    .await?;

    match state.review_service.create_vocabulary(request).await {
        Ok(item) => {
            log_api_success!("create_vocabulary", vocabulary_id = item.id, "item created");
            Ok(Json(ApiResponse::success(item)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("create_vocabulary", "vocabulary");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_all_vocabulary(State(state): State<AppState>) -> ApiResult<Vec<VocabularyItem>> {
    debug!("Getting all vocabulary");

    match state.review_service.get_all_vocabulary().await {
        Ok(items) => {
            debug!(item_count = items.len(), "Vocabulary retrieved successfully");
            Ok(Json(ApiResponse::success(items)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_all_vocabulary", "vocabulary");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_vocabulary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<VocabularyItem> {
    log_api_start!("get_vocabulary", vocabulary_id = id);

    match state.review_service.get_vocabulary(id).await {
        Ok(Some(item)) => {
            log_api_success!("get_vocabulary", vocabulary_id = id, "item retrieved");
            Ok(Json(ApiResponse::success(item)))
        }
        Ok(None) => {
            log_api_warn!("get_vocabulary", vocabulary_id = id, "item not found");
            let error = ApiError::NotFound(format!("Vocabulary item '{}' not found", id));
            let context = ErrorContext::new("get_vocabulary", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_vocabulary", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn update_vocabulary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVocabularyRequest>,
) -> ApiResult<VocabularyItem> {
    info!(vocabulary_id = %id, "Updating vocabulary item");

    match state.review_service.update_vocabulary(id, request).await {
        Ok(Some(item)) => {
            log_api_success!("update_vocabulary", vocabulary_id = id, "item updated");
            Ok(Json(ApiResponse::success(item)))
        }
        Ok(None) => {
            let error = ApiError::NotFound(format!("Vocabulary item '{}' not found", id));
            let context =
                ErrorContext::new("update_vocabulary", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context =
                ErrorContext::new("update_vocabulary", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn delete_vocabulary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<bool> {
    info!(vocabulary_id = %id, "Deleting vocabulary item");

    match state.review_service.delete_vocabulary(id).await {
        Ok(true) => {
            log_api_success!("delete_vocabulary", vocabulary_id = id, "item deleted");
            Ok(Json(ApiResponse::success(true)))
        }
        Ok(false) => {
            let error = ApiError::NotFound(format!("Vocabulary item '{}' not found", id));
            let context =
                ErrorContext::new("delete_vocabulary", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context =
                ErrorContext::new("delete_vocabulary", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

// Review endpoints
pub async fn get_due_words(
    State(state): State<AppState>,
    Query(params): Query<DueWordsParams>,
) -> ApiResult<DueWordsResponse> {
    log_api_start!("get_due_words");

    let limit = due::parse_limit(params.limit.as_deref()).map_err(|error| {
        let context = ErrorContext::new("get_due_words", "review");
        error.to_response_with_context(context)
    })?;

    match state.review_service.due_words(Utc::now(), limit).await {
        Ok(words) => {
            let count = words.len();
            log_api_success!("get_due_words", count = count, "due words selected");
            Ok(Json(ApiResponse::success(DueWordsResponse { words, count })))
        }
        Err(error) => {
            let context = ErrorContext::new("get_due_words", "review");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_due_words_count(State(state): State<AppState>) -> ApiResult<DueCountResponse> {
    log_api_start!("get_due_words_count");

    match state.review_service.due_count(Utc::now()).await {
        Ok(count) => {
            debug!(count = count, "Due word count computed");
            Ok(Json(ApiResponse::success(DueCountResponse { count })))
        }
        Err(error) => {
            let context = ErrorContext::new("get_due_words_count", "review");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn initialize_reviews(State(state): State<AppState>) -> ApiResult<InitializeResponse> {
    info!("Initializing missing review states");

    match state.review_service.initialize_missing().await {
        Ok(count) => {
            log_api_success!("initialize_reviews", count = count, "review states created");
            Ok(Json(ApiResponse::success(InitializeResponse {
                message: format!("Created {} review state(s)", count),
                count,
            })))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("initialize_reviews", "review");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitReviewRequest>,
) -> ApiResult<ReviewState> {
    info!(
        vocabulary_id = %id,
        rating = request.rating,
        response_time_ms = ?request.response_time_ms,
        "Submitting review"
    );

    check_access(&state, None, Action::SubmitReview, "submit_review").await?;

    match state
        .review_service
        .submit_review(id, request.rating, request.reviewed_at)
        .await
    {
        Ok(new_state) => {
            log_api_success!("submit_review", vocabulary_id = id, "review recorded");
            Ok(Json(ApiResponse::success(new_state)))
        }
        Err(error) => {
            let context = ErrorContext::new("submit_review", "vocabulary").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Vocabulary routes
        .route("/api/vocabulary", post(create_vocabulary))
        .route("/api/vocabulary", get(get_all_vocabulary))
        .route("/api/vocabulary/:id", get(get_vocabulary))
        .route("/api/vocabulary/:id", put(update_vocabulary))
        .route("/api/vocabulary/:id", delete(delete_vocabulary))
        // Review routes
        .route("/api/vocabulary/:id/review", post(submit_review))
        .route("/api/reviews/due-words", get(get_due_words))
        .route("/api/reviews/due-words-count", get(get_due_words_count))
        .route("/api/reviews/initialize", post(initialize_reviews))
        .with_state(state)
}
