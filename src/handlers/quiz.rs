// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, UpdateQuizRequest},
    storage::{NewQuiz, Storage},
    utils::jwt::Claims,
};

/// Creates a new quiz owned by the calling teacher.
pub async fn create_quiz(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "teacher" {
        return Err(AppError::Forbidden(
            "Only teachers can create quizzes".to_string(),
        ));
    }

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = storage
        .create_quiz(NewQuiz {
            title: payload.title,
            subject: payload.subject,
            time_limit: payload.time_limit,
            total_questions: payload.total_questions.unwrap_or(0),
            created_by: claims.sub,
            is_active: payload.is_active.unwrap_or(true),
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            AppError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Lists quizzes scoped by role: teachers see the quizzes they own,
/// students see the quizzes flagged active.
pub async fn list_quizzes(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = if claims.role == "teacher" {
        storage.quizzes_by_teacher(&claims.sub).await?
    } else {
        storage.active_quizzes().await?
    };

    Ok(Json(quizzes))
}

/// Fetches a single quiz by id.
pub async fn get_quiz(
    State(storage): State<Storage>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = storage
        .get_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(quiz))
}

/// Updates a quiz. Only the owning teacher may do so.
pub async fn update_quiz(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "teacher" {
        return Err(AppError::Forbidden(
            "Only teachers can update quizzes".to_string(),
        ));
    }

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = storage
        .get_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != claims.sub {
        return Err(AppError::Forbidden(
            "You can only update your own quizzes".to_string(),
        ));
    }

    let updated = storage
        .update_quiz(&id, &payload)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(updated))
}
