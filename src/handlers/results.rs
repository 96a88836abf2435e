// src/handlers/results.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, stats, storage::Storage, utils::jwt::Claims};

/// Aggregated results for a quiz: summary statistics plus the per-question
/// answer distribution. Only the owning teacher may view them.
pub async fn get_quiz_results(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "teacher" {
        return Err(AppError::Forbidden(
            "Only teachers can view quiz results".to_string(),
        ));
    }

    let quiz = storage
        .get_quiz(&quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != claims.sub {
        return Err(AppError::Forbidden(
            "You can only view results for your own quizzes".to_string(),
        ));
    }

    let questions = storage.questions_by_quiz(&quiz_id).await?;
    let attempts: Vec<_> = storage
        .attempts_by_quiz(&quiz_id)
        .await?
        .into_iter()
        .map(|a| a.attempt)
        .collect();

    let summary = stats::summarize(&attempts);
    let breakdown = stats::question_breakdown(&questions, &attempts);

    Ok(Json(json!({
        "quizId": quiz.id,
        "title": quiz.title,
        "totalSubmissions": summary.total_submissions,
        "averageScore": summary.average_score,
        "highestScore": summary.highest_score,
        "passRate": summary.pass_rate,
        "questions": breakdown,
    })))
}
