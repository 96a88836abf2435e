// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub quiz_id: String,

    /// 1-based position within the quiz.
    pub question_number: i64,

    pub question_text: String,

    /// The 4 option labels, stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// Index into `options` of the correct choice, in [0,3].
    pub correct_answer: i64,

    /// Optional illustration served from /uploads.
    pub image_url: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for sending a question to students (excludes the correct answer).
/// Scoring happens server-side, so the client never needs it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    pub quiz_id: String,
    pub question_number: i64,
    pub question_text: String,
    pub options: Json<Vec<String>>,
    pub image_url: Option<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        PublicQuestion {
            id: q.id,
            quiz_id: q.quiz_id,
            question_number: q.question_number,
            question_text: q.question_text,
            options: q.options,
            image_url: q.image_url,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(range(min = 1))]
    pub question_number: i64,
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(range(min = 0, max = 3, message = "Correct answer must be an option index in [0,3]."))]
    pub correct_answer: i64,
    pub image_url: Option<String>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() != 4 {
        return Err(validator::ValidationError::new("exactly_four_options_required"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("option_length_invalid"));
        }
    }
    Ok(())
}
