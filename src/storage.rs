// src/storage.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{SqlitePool, prelude::FromRow, types::Json};
use uuid::Uuid;

use crate::models::{
    attempt::{AttemptWithQuiz, AttemptWithStudent, QuizAttempt, QuizInfo, StudentInfo},
    question::Question,
    quiz::{Quiz, UpdateQuizRequest},
    user::User,
};

/// Typed persistence gateway over the four core tables.
///
/// Pure CRUD: no role checks, no scoring, no business rules. Constructed
/// once at startup and carried in `AppState`; request handlers borrow it
/// through the axum state machinery.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

/// Fields needed to insert a user row.
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Fields needed to insert a quiz row.
pub struct NewQuiz {
    pub title: String,
    pub subject: String,
    pub time_limit: i64,
    pub total_questions: i64,
    pub created_by: String,
    pub is_active: bool,
}

/// Fields needed to insert a question row.
pub struct NewQuestion {
    pub quiz_id: String,
    pub question_number: i64,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
    pub image_url: Option<String>,
}

/// Fields needed to insert an attempt row.
pub struct NewAttempt {
    pub quiz_id: String,
    pub student_id: String,
    pub answers: HashMap<String, i64>,
    pub score: i64,
    pub total_questions: i64,
    pub time_taken: i64,
}

/// Flat row for attempts joined with the student's identity.
#[derive(FromRow)]
struct AttemptStudentRow {
    id: String,
    quiz_id: String,
    student_id: String,
    answers: Json<HashMap<String, i64>>,
    score: i64,
    total_questions: i64,
    time_taken: i64,
    completed_at: chrono::DateTime<chrono::Utc>,
    s_email: String,
    s_first_name: Option<String>,
    s_last_name: Option<String>,
    s_profile_image_url: Option<String>,
}

/// Flat row for attempts joined with the quiz's identity.
#[derive(FromRow)]
struct AttemptQuizRow {
    id: String,
    quiz_id: String,
    student_id: String,
    answers: Json<HashMap<String, i64>>,
    score: i64,
    total_questions: i64,
    time_taken: i64,
    completed_at: chrono::DateTime<chrono::Utc>,
    q_title: String,
    q_subject: String,
    q_time_limit: i64,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---- User operations ----

    pub async fn create_user(&self, new: NewUser) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new.email,
            password: new.password_hash,
            role: new.role,
            first_name: new.first_name,
            last_name: new.last_name,
            profile_image_url: new.profile_image_url,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password, role, first_name, last_name, profile_image_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.role)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    // ---- Quiz operations ----

    pub async fn create_quiz(&self, new: NewQuiz) -> Result<Quiz, sqlx::Error> {
        let now = Utc::now();
        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            subject: new.subject,
            time_limit: new.time_limit,
            total_questions: new.total_questions,
            created_by: new.created_by,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO quizzes (id, title, subject, time_limit, total_questions, created_by, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quiz.id)
        .bind(&quiz.title)
        .bind(&quiz.subject)
        .bind(quiz.time_limit)
        .bind(quiz.total_questions)
        .bind(&quiz.created_by)
        .bind(quiz.is_active)
        .bind(quiz.created_at)
        .bind(quiz.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn quizzes_by_teacher(&self, teacher_id: &str) -> Result<Vec<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>(
            "SELECT * FROM quizzes WHERE created_by = ? ORDER BY created_at DESC",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn active_quizzes(&self) -> Result<Vec<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>(
            "SELECT * FROM quizzes WHERE is_active = 1 ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Applies the present fields of `updates` and bumps `updated_at`.
    /// Returns the refreshed row.
    pub async fn update_quiz(
        &self,
        id: &str,
        updates: &UpdateQuizRequest,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        if let Some(title) = &updates.title {
            sqlx::query("UPDATE quizzes SET title = ? WHERE id = ?")
                .bind(title)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(subject) = &updates.subject {
            sqlx::query("UPDATE quizzes SET subject = ? WHERE id = ?")
                .bind(subject)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(time_limit) = updates.time_limit {
            sqlx::query("UPDATE quizzes SET time_limit = ? WHERE id = ?")
                .bind(time_limit)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(total_questions) = updates.total_questions {
            sqlx::query("UPDATE quizzes SET total_questions = ? WHERE id = ?")
                .bind(total_questions)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(is_active) = updates.is_active {
            sqlx::query("UPDATE quizzes SET is_active = ? WHERE id = ?")
                .bind(is_active)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        sqlx::query("UPDATE quizzes SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get_quiz(id).await
    }

    // ---- Question operations ----

    pub async fn create_question(&self, new: NewQuestion) -> Result<Question, sqlx::Error> {
        let question = Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: new.quiz_id,
            question_number: new.question_number,
            question_text: new.question_text,
            options: Json(new.options),
            correct_answer: new.correct_answer,
            image_url: new.image_url,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO questions (id, quiz_id, question_number, question_text, options, correct_answer, image_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&question.id)
        .bind(&question.quiz_id)
        .bind(question.question_number)
        .bind(&question.question_text)
        .bind(&question.options)
        .bind(question.correct_answer)
        .bind(&question.image_url)
        .bind(question.created_at)
        .execute(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE quiz_id = ? ORDER BY question_number",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
    }

    // ---- Quiz attempt operations ----

    pub async fn create_attempt(&self, new: NewAttempt) -> Result<QuizAttempt, sqlx::Error> {
        let attempt = QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: new.quiz_id,
            student_id: new.student_id,
            answers: Json(new.answers),
            score: new.score,
            total_questions: new.total_questions,
            time_taken: new.time_taken,
            completed_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO quiz_attempts (id, quiz_id, student_id, answers, score, total_questions, time_taken, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&attempt.id)
        .bind(&attempt.quiz_id)
        .bind(&attempt.student_id)
        .bind(&attempt.answers)
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(attempt.time_taken)
        .bind(attempt.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn attempt_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> Result<Option<QuizAttempt>, sqlx::Error> {
        sqlx::query_as::<_, QuizAttempt>(
            "SELECT * FROM quiz_attempts WHERE student_id = ? AND quiz_id = ?",
        )
        .bind(student_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn attempts_by_quiz(
        &self,
        quiz_id: &str,
    ) -> Result<Vec<AttemptWithStudent>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AttemptStudentRow>(
            r#"
            SELECT
                a.id, a.quiz_id, a.student_id, a.answers, a.score,
                a.total_questions, a.time_taken, a.completed_at,
                u.email AS s_email,
                u.first_name AS s_first_name,
                u.last_name AS s_last_name,
                u.profile_image_url AS s_profile_image_url
            FROM quiz_attempts a
            JOIN users u ON a.student_id = u.id
            WHERE a.quiz_id = ?
            ORDER BY a.completed_at DESC
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AttemptWithStudent {
                student: StudentInfo {
                    id: r.student_id.clone(),
                    email: r.s_email,
                    first_name: r.s_first_name,
                    last_name: r.s_last_name,
                    profile_image_url: r.s_profile_image_url,
                },
                attempt: QuizAttempt {
                    id: r.id,
                    quiz_id: r.quiz_id,
                    student_id: r.student_id,
                    answers: r.answers,
                    score: r.score,
                    total_questions: r.total_questions,
                    time_taken: r.time_taken,
                    completed_at: r.completed_at,
                },
            })
            .collect())
    }

    pub async fn attempts_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<AttemptWithQuiz>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AttemptQuizRow>(
            r#"
            SELECT
                a.id, a.quiz_id, a.student_id, a.answers, a.score,
                a.total_questions, a.time_taken, a.completed_at,
                q.title AS q_title,
                q.subject AS q_subject,
                q.time_limit AS q_time_limit
            FROM quiz_attempts a
            JOIN quizzes q ON a.quiz_id = q.id
            WHERE a.student_id = ?
            ORDER BY a.completed_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AttemptWithQuiz {
                quiz: QuizInfo {
                    id: r.quiz_id.clone(),
                    title: r.q_title,
                    subject: r.q_subject,
                    time_limit: r.q_time_limit,
                },
                attempt: QuizAttempt {
                    id: r.id,
                    quiz_id: r.quiz_id,
                    student_id: r.student_id,
                    answers: r.answers,
                    score: r.score,
                    total_questions: r.total_questions,
                    time_taken: r.time_taken,
                    completed_at: r.completed_at,
                },
            })
            .collect())
    }
}
