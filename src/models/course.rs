// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,

    /// The teacher who owns the course.
    pub user_id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Unpublished courses are drafts; publishing requires at least one
    /// chapter.
    pub is_published: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'chapters' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub course_id: i64,
    pub title: String,

    /// 1-based position within the course, assigned at creation.
    pub position: i64,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A course populated with its ordered chapters.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub chapters: Vec<Chapter>,
}

impl CourseDetail {
    pub fn new(course: Course, chapters: Vec<Chapter>) -> Self {
        Self {
            id: course.id,
            user_id: course.user_id,
            title: course.title,
            description: course.description,
            is_published: course.is_published,
            created_at: course.created_at,
            chapters,
        }
    }
}

/// DTO for creating a new course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "title required"))]
    pub title: String,
}

/// DTO for partially updating a course. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "title required"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for creating a new chapter.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChapterRequest {
    #[validate(length(min = 1, max = 200, message = "title required"))]
    pub title: String,
}
