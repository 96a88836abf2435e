// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
/// A quiz is owned by exactly one teacher (`created_by`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub subject: String,

    /// Time limit in minutes. Advisory: the countdown runs client-side and
    /// the server does not reject late submissions.
    pub time_limit: i64,

    pub total_questions: i64,
    pub created_by: String,

    /// Students only see quizzes flagged active.
    pub is_active: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(range(min = 1, max = 480, message = "Time limit must be between 1 and 480 minutes."))]
    pub time_limit: i64,
    #[validate(range(min = 0))]
    pub total_questions: Option<i64>,
    pub is_active: Option<bool>,
}

/// DTO for updating a quiz. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(range(min = 1, max = 480))]
    pub time_limit: Option<i64>,
    #[validate(range(min = 0))]
    pub total_questions: Option<i64>,
    pub is_active: Option<bool>,
}
