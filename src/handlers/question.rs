// src/handlers/question.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, PublicQuestion},
    storage::{NewQuestion, Storage},
    utils::jwt::Claims,
};

/// Adds a question to a quiz. Only the owning teacher may do so.
pub async fn add_question(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "teacher" {
        return Err(AppError::Forbidden(
            "Only teachers can add questions".to_string(),
        ));
    }

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = storage
        .get_quiz(&quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != claims.sub {
        return Err(AppError::Forbidden(
            "You can only add questions to your own quizzes".to_string(),
        ));
    }

    let question = storage
        .create_question(NewQuestion {
            quiz_id,
            question_number: payload.question_number,
            question_text: payload.question_text,
            options: payload.options,
            correct_answer: payload.correct_answer,
            image_url: payload.image_url,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Lists a quiz's questions in question-number order.
///
/// Teachers receive the full rows; students receive a DTO without the
/// correct answer, since scoring is done server-side on submit.
pub async fn list_questions(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    storage
        .get_quiz(&quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let questions = storage.questions_by_quiz(&quiz_id).await?;

    if claims.role == "teacher" {
        return Ok(Json(questions).into_response());
    }

    let public: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();
    Ok(Json(public).into_response())
}
