// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::attempt::SubmitAttemptRequest,
    session::score_answers,
    storage::{NewAttempt, Storage},
    utils::jwt::Claims,
};

/// Submits a student's completed (or expired) attempt.
///
/// The score is always recomputed here from the stored answer keys; any
/// client-supplied score is ignored. `timeTaken` is client-reported and
/// stored as advisory data only. The advisory duplicate check yields the
/// friendly 400; the UNIQUE(quiz_id, student_id) constraint backstops the
/// race between two concurrent submissions.
pub async fn submit_attempt(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "student" {
        return Err(AppError::Forbidden(
            "Only students can take quizzes".to_string(),
        ));
    }

    storage
        .get_quiz(&quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if storage
        .attempt_by_student_and_quiz(&claims.sub, &quiz_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "You have already taken this quiz".to_string(),
        ));
    }

    let questions = storage.questions_by_quiz(&quiz_id).await?;
    let score = score_answers(&payload.answers, &questions);

    let attempt = storage
        .create_attempt(NewAttempt {
            quiz_id,
            student_id: claims.sub,
            answers: payload.answers,
            score,
            total_questions: questions.len() as i64,
            time_taken: payload.time_taken.max(0),
        })
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::Conflict("You have already taken this quiz".to_string())
            } else {
                tracing::error!("Failed to create quiz attempt: {:?}", e);
                AppError::from(e)
            }
        })?;

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Lists a quiz's attempts with joined student identity.
/// Only the owning teacher may view them.
pub async fn list_quiz_attempts(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "teacher" {
        return Err(AppError::Forbidden(
            "Only teachers can view quiz attempts".to_string(),
        ));
    }

    let quiz = storage
        .get_quiz(&quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != claims.sub {
        return Err(AppError::Forbidden(
            "You can only view attempts for your own quizzes".to_string(),
        ));
    }

    let attempts = storage.attempts_by_quiz(&quiz_id).await?;
    Ok(Json(attempts))
}

/// Lists a student's attempts with joined quiz identity.
/// Students may only view their own history; teachers may view anyone's.
pub async fn list_student_attempts(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if claims.sub != student_id && claims.role != "teacher" {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let attempts = storage.attempts_by_student(&student_id).await?;
    Ok(Json(attempts))
}
