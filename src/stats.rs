// src/stats.rs

//! Results aggregation: per-quiz summary statistics and per-question
//! answer-distribution statistics, computed in a single pass over the full
//! attempt list fetched from storage.

use serde::Serialize;

use crate::models::{attempt::QuizAttempt, question::Question};

/// Per-quiz summary statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub total_submissions: i64,
    /// Mean of per-attempt percentages, rounded to one decimal.
    pub average_score: f64,
    /// Best per-attempt percentage, rounded to a whole percent.
    pub highest_score: i64,
    /// Percentage of attempts scoring at least 60%.
    pub pass_rate: i64,
}

/// Distribution of chosen options for a single question.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBreakdown {
    pub question_id: String,
    pub question_number: i64,
    pub question_text: String,
    pub correct_answer: i64,
    /// Percentage of submissions that picked the correct option.
    pub correct_percentage: i64,
    pub options: Vec<OptionStat>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionStat {
    pub label: String,
    pub count: i64,
    /// Percentage of total submissions that picked this option.
    pub percentage: i64,
    pub is_correct: bool,
}

fn attempt_percentage(attempt: &QuizAttempt) -> f64 {
    if attempt.total_questions == 0 {
        return 0.0;
    }
    attempt.score as f64 / attempt.total_questions as f64 * 100.0
}

/// Computes the summary block of the teacher's results page.
pub fn summarize(attempts: &[QuizAttempt]) -> QuizSummary {
    let total = attempts.len() as i64;
    if total == 0 {
        return QuizSummary {
            total_submissions: 0,
            average_score: 0.0,
            highest_score: 0,
            pass_rate: 0,
        };
    }

    let percentages: Vec<f64> = attempts.iter().map(attempt_percentage).collect();

    let average_score =
        (percentages.iter().sum::<f64>() / total as f64 * 10.0).round() / 10.0;

    let highest_score = percentages
        .iter()
        .map(|p| p.round() as i64)
        .max()
        .unwrap_or(0);

    let passed = percentages.iter().filter(|p| **p >= 60.0).count();
    let pass_rate = (passed as f64 / total as f64 * 100.0).round() as i64;

    QuizSummary {
        total_submissions: total,
        average_score,
        highest_score,
        pass_rate,
    }
}

/// Tallies, for each question, how many attempts chose each of the 4
/// options. Answers with out-of-range indices are ignored. Percentages are
/// relative to the total submission count, so an unanswered question simply
/// shows options summing below 100%.
pub fn question_breakdown(
    questions: &[Question],
    attempts: &[QuizAttempt],
) -> Vec<QuestionBreakdown> {
    let total = attempts.len() as i64;

    questions
        .iter()
        .map(|question| {
            let mut counts = [0i64; 4];
            for attempt in attempts {
                if let Some(&choice) = attempt.answers.get(&question.id) {
                    if (0..4).contains(&choice) {
                        counts[choice as usize] += 1;
                    }
                }
            }

            let pct = |count: i64| -> i64 {
                if total == 0 {
                    0
                } else {
                    (count as f64 / total as f64 * 100.0).round() as i64
                }
            };

            let options = question
                .options
                .iter()
                .enumerate()
                .map(|(index, label)| OptionStat {
                    label: label.clone(),
                    count: counts.get(index).copied().unwrap_or(0),
                    percentage: pct(counts.get(index).copied().unwrap_or(0)),
                    is_correct: index as i64 == question.correct_answer,
                })
                .collect();

            let correct_count = counts
                .get(question.correct_answer as usize)
                .copied()
                .unwrap_or(0);

            QuestionBreakdown {
                question_id: question.id.clone(),
                question_number: question.question_number,
                question_text: question.question_text.clone(),
                correct_answer: question.correct_answer,
                correct_percentage: pct(correct_count),
                options,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;
    use std::collections::HashMap;

    fn attempt(score: i64, total: i64, answers: HashMap<String, i64>) -> QuizAttempt {
        QuizAttempt {
            id: uuid::Uuid::new_v4().to_string(),
            quiz_id: "quiz-1".to_string(),
            student_id: uuid::Uuid::new_v4().to_string(),
            answers: Json(answers),
            score,
            total_questions: total,
            time_taken: 30,
            completed_at: chrono::Utc::now(),
        }
    }

    fn question(id: &str, number: i64, correct: i64) -> Question {
        Question {
            id: id.to_string(),
            quiz_id: "quiz-1".to_string(),
            question_number: number,
            question_text: format!("Question {}", number),
            options: Json(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ]),
            correct_answer: correct,
            image_url: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn summary_over_three_attempts() {
        // Percentages 100, 50, 100: mean 83.3, best 100, 2 of 3 passed.
        let attempts = vec![
            attempt(1, 1, HashMap::new()),
            attempt(1, 2, HashMap::new()),
            attempt(2, 2, HashMap::new()),
        ];

        let summary = summarize(&attempts);
        assert_eq!(summary.total_submissions, 3);
        assert_eq!(summary.average_score, 83.3);
        assert_eq!(summary.highest_score, 100);
        assert_eq!(summary.pass_rate, 67);
    }

    #[test]
    fn summary_of_empty_attempt_set_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_submissions, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.highest_score, 0);
        assert_eq!(summary.pass_rate, 0);
    }

    #[test]
    fn breakdown_tallies_option_choices() {
        let q = question("q1", 1, 2);
        let attempts = vec![
            attempt(1, 1, HashMap::from([("q1".to_string(), 2)])),
            attempt(0, 1, HashMap::from([("q1".to_string(), 0)])),
            attempt(1, 1, HashMap::from([("q1".to_string(), 2)])),
            attempt(0, 1, HashMap::new()), // unanswered
        ];

        let breakdown = question_breakdown(&[q], &attempts);
        assert_eq!(breakdown.len(), 1);

        let b = &breakdown[0];
        assert_eq!(b.correct_percentage, 50);
        assert_eq!(b.options[0].count, 1);
        assert_eq!(b.options[2].count, 2);
        assert_eq!(b.options[2].percentage, 50);
        assert!(b.options[2].is_correct);
        assert!(!b.options[0].is_correct);
    }

    #[test]
    fn breakdown_ignores_out_of_range_indices() {
        let q = question("q1", 1, 0);
        let attempts = vec![
            attempt(0, 1, HashMap::from([("q1".to_string(), 9)])),
            attempt(0, 1, HashMap::from([("q1".to_string(), -1)])),
        ];

        let breakdown = question_breakdown(&[q], &attempts);
        let total: i64 = breakdown[0].options.iter().map(|o| o.count).sum();
        assert_eq!(total, 0);
    }
}
