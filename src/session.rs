// src/session.rs

//! Attempt lifecycle for a single student's timed pass through a quiz.
//!
//! The lifecycle is modeled as an explicit phase enum rather than a shared
//! boolean flag, so the "submit at most once" guarantee is enforced by the
//! transition table instead of by convention: both the user's submit action
//! and the countdown reaching zero funnel through [`AttemptSession::begin_submit`],
//! and only the first caller wins. A failed persistence call reverts the
//! session to `InProgress` so the student can retry (or the timer, if it has
//! not expired yet, can fire again).

use std::collections::HashMap;

use crate::models::question::Question;

/// Phase of an attempt session.
///
/// `NotStarted -> InProgress -> Submitting -> Submitted`; a failed submit
/// moves `Submitting` back to `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    NotStarted,
    InProgress,
    Submitting,
    Submitted,
}

/// Outcome of a 1-second clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Clock decremented, time still remaining.
    Running,
    /// The countdown just reached zero; the session has entered
    /// `Submitting` and the caller must persist the attempt.
    Expired,
    /// No effect (session not in progress, or already held at zero).
    Idle,
}

/// In-memory state for one student's timed quiz attempt.
pub struct AttemptSession {
    phase: AttemptPhase,
    remaining_secs: u32,
    /// Whole seconds elapsed since `start`, advanced by `tick`.
    elapsed_secs: u32,
    answers: HashMap<String, i64>,
    current_question: usize,
}

impl AttemptSession {
    pub fn new() -> Self {
        Self {
            phase: AttemptPhase::NotStarted,
            remaining_secs: 0,
            elapsed_secs: 0,
            answers: HashMap::new(),
            current_question: 0,
        }
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn time_taken_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn answers(&self) -> &HashMap<String, i64> {
        &self.answers
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    /// Begins the attempt: remaining time = `time_limit_minutes * 60`,
    /// empty answer map, first question shown.
    pub fn start(&mut self, time_limit_minutes: u32) {
        self.phase = AttemptPhase::InProgress;
        self.remaining_secs = time_limit_minutes * 60;
        self.elapsed_secs = 0;
        self.answers.clear();
        self.current_question = 0;
    }

    /// Records (or overwrites) the chosen option for a question.
    /// Idempotent; selections after submission has begun are dropped.
    pub fn select_answer(&mut self, question_id: &str, option_index: i64) {
        if self.phase != AttemptPhase::InProgress {
            return;
        }
        self.answers.insert(question_id.to_string(), option_index);
    }

    /// Pure view-state change; no effect on scoring or submission.
    pub fn navigate(&mut self, index: usize) {
        self.current_question = index;
    }

    /// Advances the clock by one second.
    ///
    /// The clock holds at zero rather than going negative, and the expiry
    /// transition fires exactly once: the tick that reaches zero moves the
    /// session to `Submitting` (if the user has not already begun a submit).
    pub fn tick(&mut self) -> Tick {
        if self.phase != AttemptPhase::InProgress || self.remaining_secs == 0 {
            return Tick::Idle;
        }

        self.remaining_secs -= 1;
        self.elapsed_secs += 1;

        if self.remaining_secs == 0 {
            if self.begin_submit() {
                return Tick::Expired;
            }
            return Tick::Idle;
        }

        Tick::Running
    }

    /// Attempts the `InProgress -> Submitting` transition.
    ///
    /// Returns true only for the first trigger; a concurrent trigger (user
    /// submit racing timer expiry in the same tick) sees false and is a
    /// no-op.
    pub fn begin_submit(&mut self) -> bool {
        if self.phase != AttemptPhase::InProgress {
            return false;
        }
        self.phase = AttemptPhase::Submitting;
        true
    }

    /// Marks the attempt as persisted; terminal.
    pub fn complete_submit(&mut self) {
        if self.phase == AttemptPhase::Submitting {
            self.phase = AttemptPhase::Submitted;
        }
    }

    /// Reverts a failed persistence call so submission can be retried.
    pub fn fail_submit(&mut self) {
        if self.phase == AttemptPhase::Submitting {
            self.phase = AttemptPhase::InProgress;
        }
    }

    /// Scores the session's answer map against the quiz's questions.
    pub fn score(&self, questions: &[Question]) -> i64 {
        score_answers(&self.answers, questions)
    }
}

impl Default for AttemptSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the questions whose recorded answer matches `correct_answer`.
///
/// Unanswered questions and out-of-range option indices never count as
/// correct. This is the single scoring routine in the crate; the submit
/// handler uses it too, so a client-supplied score can never disagree with
/// what gets stored.
pub fn score_answers(answers: &HashMap<String, i64>, questions: &[Question]) -> i64 {
    questions
        .iter()
        .filter(|q| answers.get(&q.id) == Some(&q.correct_answer))
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn question(id: &str, correct: i64) -> Question {
        Question {
            id: id.to_string(),
            quiz_id: "quiz-1".to_string(),
            question_number: 1,
            question_text: "What is 2 + 2?".to_string(),
            options: Json(vec![
                "3".to_string(),
                "4".to_string(),
                "5".to_string(),
                "6".to_string(),
            ]),
            correct_answer: correct,
            image_url: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn score_counts_exact_matches_only() {
        let questions = vec![question("q1", 1), question("q2", 2), question("q3", 0)];

        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), 1); // correct
        answers.insert("q2".to_string(), 3); // wrong
        // q3 unanswered

        assert_eq!(score_answers(&answers, &questions), 1);
    }

    #[test]
    fn unanswered_questions_score_zero() {
        let questions = vec![question("q1", 2)];
        assert_eq!(score_answers(&HashMap::new(), &questions), 0);
    }

    #[test]
    fn out_of_range_answer_is_never_correct() {
        let questions = vec![question("q1", 3)];
        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), 7);
        assert_eq!(score_answers(&answers, &questions), 0);
    }

    #[test]
    fn select_answer_overwrites_previous_choice() {
        let mut session = AttemptSession::new();
        session.start(1);
        session.select_answer("q1", 0);
        session.select_answer("q1", 2);

        assert_eq!(session.answers().get("q1"), Some(&2));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn countdown_never_goes_negative() {
        let mut session = AttemptSession::new();
        session.start(0); // zero-minute limit: already at 0

        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn expiry_fires_submission_exactly_once() {
        let mut session = AttemptSession::new();
        session.start(1);

        let mut expiries = 0;
        for _ in 0..120 {
            if session.tick() == Tick::Expired {
                expiries += 1;
            }
        }

        assert_eq!(expiries, 1);
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.phase(), AttemptPhase::Submitting);
    }

    #[test]
    fn user_submit_beats_timer_in_same_frame() {
        let mut session = AttemptSession::new();
        session.start(1);
        for _ in 0..59 {
            session.tick();
        }

        // User clicks submit just as the final tick lands.
        assert!(session.begin_submit());
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.phase(), AttemptPhase::Submitting);
    }

    #[test]
    fn timer_expiry_blocks_later_user_submit() {
        let mut session = AttemptSession::new();
        session.start(1);
        for _ in 0..60 {
            session.tick();
        }

        assert_eq!(session.phase(), AttemptPhase::Submitting);
        assert!(!session.begin_submit());
    }

    #[test]
    fn failed_submit_reverts_and_allows_retry() {
        let mut session = AttemptSession::new();
        session.start(1);

        assert!(session.begin_submit());
        session.fail_submit();
        assert_eq!(session.phase(), AttemptPhase::InProgress);

        assert!(session.begin_submit());
        session.complete_submit();
        assert_eq!(session.phase(), AttemptPhase::Submitted);
        assert!(!session.begin_submit());
    }

    #[test]
    fn navigation_does_not_touch_answers_or_clock() {
        let mut session = AttemptSession::new();
        session.start(2);
        session.select_answer("q1", 1);
        session.tick();

        let remaining = session.remaining_secs();
        session.navigate(5);

        assert_eq!(session.current_question(), 5);
        assert_eq!(session.remaining_secs(), remaining);
        assert_eq!(session.answers().get("q1"), Some(&1));
    }

    #[test]
    fn time_taken_tracks_elapsed_ticks() {
        let mut session = AttemptSession::new();
        session.start(1);
        for _ in 0..10 {
            session.tick();
        }

        assert_eq!(session.time_taken_secs(), 10);
    }
}
