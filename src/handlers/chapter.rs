// src/handlers/chapter.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::course::{Chapter, CreateChapterRequest},
};

/// Appends a new chapter to a course at the next position.
pub async fn create_chapter(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
    Json(payload): Json<CreateChapterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let course_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = ?")
        .bind(course_id)
        .fetch_optional(&pool)
        .await?;

    if course_exists.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let position =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) + 1 FROM chapters WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(&pool)
            .await?;

    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        INSERT INTO chapters (course_id, title, position)
        VALUES (?, ?, ?)
        RETURNING id, course_id, title, position, created_at
        "#,
    )
    .bind(course_id)
    .bind(&payload.title)
    .bind(position)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create chapter: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(chapter)))
}

/// Retrieves a single chapter of a course.
pub async fn get_chapter(
    State(pool): State<SqlitePool>,
    Path((course_id, chapter_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        SELECT id, course_id, title, position, created_at
        FROM chapters
        WHERE id = ? AND course_id = ?
        "#,
    )
    .bind(chapter_id)
    .bind(course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Chapter not found".to_string()))?;

    Ok(Json(chapter))
}
