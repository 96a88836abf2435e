// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::HashMap;

/// Represents the 'quiz_attempts' table in the database.
/// Created exactly once per (student, quiz) and never mutated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,

    /// Map of question id -> chosen option index, stored as JSON.
    /// May be partial; unanswered questions count as incorrect.
    pub answers: Json<HashMap<String, i64>>,

    pub score: i64,
    pub total_questions: i64,

    /// Client-reported duration in seconds. Advisory only.
    pub time_taken: i64,

    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting an attempt.
///
/// A `score` field is accepted for wire compatibility but ignored: the
/// server always recomputes the score from the stored answer keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    pub answers: HashMap<String, i64>,
    pub time_taken: i64,
    #[serde(default)]
    #[allow(dead_code)]
    pub score: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    pub total_questions: Option<i64>,
}

/// Student identity joined onto an attempt row for the teacher's
/// results view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Attempt with joined student identity (teacher-facing listing).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptWithStudent {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub student: StudentInfo,
}

/// Quiz identity joined onto an attempt row for the student's history view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizInfo {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub time_limit: i64,
}

/// Attempt with joined quiz identity (student-facing listing).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptWithQuiz {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub quiz: QuizInfo,
}
