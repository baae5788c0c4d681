// src/handlers/review.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::review::{CreateReviewRequest, Review, ReviewResponse},
    utils::{html::clean_html, jwt::Claims},
};

/// Submits a review for a course.
///
/// The review text passes through the HTML sanitizer before storage.
pub async fn create_review(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let course_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = ?")
        .bind(payload.course_id)
        .fetch_optional(&pool)
        .await?;

    if course_exists.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
    let review_text = payload.review_text.as_deref().map(clean_html);

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (user_id, course_id, rating, review_text)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, course_id, rating, review_text, created_at
        "#,
    )
    .bind(user_id)
    .bind(payload.course_id)
    .bind(payload.rating)
    .bind(&review_text)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to submit review: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Lists a course's reviews, newest first, with reviewer usernames joined.
pub async fn list_reviews(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let reviews = sqlx::query_as::<_, ReviewResponse>(
        r#"
        SELECT r.id, r.course_id, u.username, r.rating, r.review_text, r.created_at
        FROM reviews r
        JOIN users u ON r.user_id = u.id
        WHERE r.course_id = ?
        ORDER BY r.id DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(reviews))
}
