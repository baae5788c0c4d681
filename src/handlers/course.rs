// src/handlers/course.rs

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
    models::course::{
        Chapter, Course, CourseDetail, CreateCourseRequest, UpdateCourseRequest,
    },
    utils::jwt::Claims,
};

/// Creates a new course owned by the caller.
pub async fn create_course(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let course = sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (user_id, title)
        VALUES (?, ?)
        RETURNING id, user_id, title, description, is_published, created_at
        "#,
    )
    .bind(user_id)
    .bind(&payload.title)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create course: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Retrieves a course with its chapters in position order.
pub async fn get_course(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = fetch_course(&pool, course_id).await?;

    let chapters = sqlx::query_as::<_, Chapter>(
        r#"
        SELECT id, course_id, title, position, created_at
        FROM chapters
        WHERE course_id = ?
        ORDER BY position
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(CourseDetail::new(course, chapters)))
}

/// Partially updates a course. Only the owner may update; a foreign course
/// resolves the same as a missing one.
pub async fn update_course(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
    fetch_owned_course(&pool, course_id, user_id).await?;

    let course = sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses
        SET title = COALESCE(?, title),
            description = COALESCE(?, description)
        WHERE id = ?
        RETURNING id, user_id, title, description, is_published, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(course_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(course))
}

/// Publishes a course. A course with no chapters cannot be published.
pub async fn publish_course(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
    fetch_owned_course(&pool, course_id, user_id).await?;

    let chapter_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chapters WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(&pool)
            .await?;

    if chapter_count == 0 {
        return Err(AppError::Validation(
            "at least one chapter required to publish".to_string(),
        ));
    }

    let course = sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses
        SET is_published = 1
        WHERE id = ?
        RETURNING id, user_id, title, description, is_published, created_at
        "#,
    )
    .bind(course_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(course))
}

async fn fetch_course(pool: &SqlitePool, course_id: i64) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, user_id, title, description, is_published, created_at
        FROM courses
        WHERE id = ?
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))
}

async fn fetch_owned_course(
    pool: &SqlitePool,
    course_id: i64,
    user_id: i64,
) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, user_id, title, description, is_published, created_at
        FROM courses
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))
}
