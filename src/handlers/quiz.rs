// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::quiz::{
        CreateQuizRequest, Question, QuestionDetail, QuestionOption, Quiz, QuizDetail,
    },
};

/// Creates a quiz with its nested questions and options.
///
/// * Validates the whole payload before anything is written.
/// * Inserts the quiz row, then one question row per question (storing the
///   correct option as literal text) and its option rows.
/// * All inserts run inside a single transaction; a failure partway through
///   persists nothing.
///
/// Returns 201 with the created quiz (nested questions are not echoed back).
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Path((_course_id, chapter_id)): Path<(i64, i64)>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = pool.begin().await?;

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (chapter_id, title, description)
        VALUES (?, ?, ?)
        RETURNING id, chapter_id, title, description, created_at
        "#,
    )
    .bind(chapter_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz: {:?}", e);
        AppError::from(e)
    })?;

    for question in &payload.questions {
        let question_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO questions (quiz_id, question_text, correct_option)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(quiz.id)
        .bind(&question.question_text)
        .bind(&question.correct_option)
        .fetch_one(&mut *tx)
        .await?;

        for option in &question.options {
            sqlx::query("INSERT INTO options (question_id, option_text) VALUES (?, ?)")
                .bind(question_id)
                .bind(option)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Lists a chapter's quizzes, each populated with its full question→option
/// tree in creation order. An empty or unknown chapter yields an empty list.
pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    Path((_course_id, chapter_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, chapter_id, title, description, created_at
        FROM quizzes
        WHERE chapter_id = ?
        ORDER BY id
        "#,
    )
    .bind(chapter_id)
    .fetch_all(&pool)
    .await?;

    let quiz_ids: Vec<i64> = quizzes.iter().map(|q| q.id).collect();
    let mut trees = load_question_trees(&pool, &quiz_ids).await?;

    let details: Vec<QuizDetail> = quizzes
        .into_iter()
        .map(|quiz| {
            let questions = trees.remove(&quiz.id).unwrap_or_default();
            QuizDetail::new(quiz, questions)
        })
        .collect();

    Ok(Json(details))
}

/// Retrieves a single quiz with its full nested tree.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path((_course_id, _chapter_id, quiz_id)): Path<(i64, i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, chapter_id, title, description, created_at
        FROM quizzes
        WHERE id = ?
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let mut trees = load_question_trees(&pool, &[quiz.id]).await?;
    let questions = trees.remove(&quiz.id).unwrap_or_default();

    Ok(Json(QuizDetail::new(quiz, questions)))
}

/// Deletes a quiz; questions and options go with it via cascade.
///
/// Deleting an id that does not resolve is 404, not a no-op, so the second
/// of two concurrent deletes observes NotFound.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    Path((_course_id, _chapter_id, quiz_id)): Path<(i64, i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;

    if existing.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete quiz {}: {:?}", quiz_id, e);
            AppError::from(e)
        })?;

    Ok(Json(serde_json::json!({
        "message": "Quiz deleted successfully"
    })))
}

/// Fetches the question/option trees for a set of quizzes in two queries,
/// grouped by quiz id. Order within each level is id order, which is
/// creation order.
async fn load_question_trees(
    pool: &SqlitePool,
    quiz_ids: &[i64],
) -> Result<HashMap<i64, Vec<QuestionDetail>>, AppError> {
    let mut trees: HashMap<i64, Vec<QuestionDetail>> = HashMap::new();
    if quiz_ids.is_empty() {
        return Ok(trees);
    }

    // Dynamic IN clause over the fetched quiz ids
    let mut question_query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT id, quiz_id, question_text, correct_option FROM questions WHERE quiz_id IN (",
    );
    let mut separated = question_query.separated(",");
    for id in quiz_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(") ORDER BY id");

    let questions: Vec<Question> = question_query.build_query_as().fetch_all(pool).await?;

    let mut options_by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
    if !questions.is_empty() {
        let mut option_query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT id, question_id, option_text FROM options WHERE question_id IN (",
        );
        let mut separated = option_query.separated(",");
        for question in &questions {
            separated.push_bind(question.id);
        }
        separated.push_unseparated(") ORDER BY id");

        let options: Vec<QuestionOption> = option_query.build_query_as().fetch_all(pool).await?;
        for option in options {
            options_by_question
                .entry(option.question_id)
                .or_default()
                .push(option);
        }
    }

    for question in questions {
        let options = options_by_question.remove(&question.id).unwrap_or_default();
        trees
            .entry(question.quiz_id)
            .or_default()
            .push(QuestionDetail {
                id: question.id,
                quiz_id: question.quiz_id,
                question_text: question.question_text,
                correct_option: question.correct_option,
                options,
            });
    }

    Ok(trees)
}
