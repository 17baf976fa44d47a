//! Lesson quiz attempts and scoring.

use std::collections::HashMap;

use crate::domain::model::QuizQuestion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question_id: String,
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizScore {
    pub score: usize,
    pub total: usize,
    pub results: Vec<QuestionResult>,
}

impl QuizScore {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.score * 100) / self.total) as u32
    }
}

/// Answers collected for one lesson's quiz.
#[derive(Debug, Clone, Default)]
pub struct QuizAttempt {
    questions: Vec<QuizQuestion>,
    answers: HashMap<String, String>,
    score: Option<QuizScore>,
}

impl QuizAttempt {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            answers: HashMap::new(),
            score: None,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Record an answer, replacing any previous one. Unknown questions or options are ignored.
    pub fn select(&mut self, question_id: &str, option: &str) -> bool {
        let valid = self
            .questions
            .iter()
            .any(|q| q.id == question_id && q.options.iter().any(|o| o == option));
        if valid {
            self.answers
                .insert(question_id.to_string(), option.to_string());
        }
        valid
    }

    /// Score every question. Unanswered questions count as wrong.
    pub fn submit(&mut self) -> QuizScore {
        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .map(|question| {
                let user_answer = self.answers.get(&question.id).cloned();
                let is_correct = user_answer.as_deref() == Some(question.correct.as_str());
                QuestionResult {
                    question_id: question.id.clone(),
                    question: question.question.clone(),
                    user_answer,
                    correct_answer: question.correct.clone(),
                    is_correct,
                }
            })
            .collect();
        let score = QuizScore {
            score: results.iter().filter(|result| result.is_correct).count(),
            total: results.len(),
            results,
        };
        self.score = Some(score.clone());
        score
    }

    pub fn score(&self) -> Option<&QuizScore> {
        self.score.as_ref()
    }

    pub fn reset(&mut self) {
        self.answers.clear();
        self.score = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            question: format!("question {id}"),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct: correct.into(),
        }
    }

    #[test]
    fn scores_correct_answers() {
        let mut quiz = QuizAttempt::new(vec![question("q1", "a"), question("q2", "b")]);
        assert!(quiz.select("q1", "a"));
        assert!(quiz.select("q2", "c"));

        let score = quiz.submit();
        assert_eq!(score.score, 1);
        assert_eq!(score.total, 2);
        assert_eq!(score.percent(), 50);
        assert!(score.results[0].is_correct);
        assert_eq!(score.results[1].user_answer.as_deref(), Some("c"));
        assert_eq!(score.results[1].correct_answer, "b");
    }

    #[test]
    fn unanswered_questions_are_wrong() {
        let mut quiz = QuizAttempt::new(vec![question("q1", "a")]);
        let score = quiz.submit();
        assert_eq!(score.score, 0);
        assert_eq!(score.results[0].user_answer, None);
    }

    #[test]
    fn invalid_selections_are_ignored() {
        let mut quiz = QuizAttempt::new(vec![question("q1", "a")]);
        assert!(!quiz.select("q1", "z"));
        assert!(!quiz.select("q9", "a"));
        assert_eq!(quiz.answer("q1"), None);
    }

    #[test]
    fn reset_clears_answers_and_score() {
        let mut quiz = QuizAttempt::new(vec![question("q1", "a")]);
        quiz.select("q1", "a");
        quiz.submit();
        quiz.reset();
        assert_eq!(quiz.answer("q1"), None);
        assert!(quiz.score().is_none());
    }

    #[test]
    fn empty_quiz_scores_zero_percent() {
        let mut quiz = QuizAttempt::default();
        assert!(quiz.is_empty());
        assert_eq!(quiz.submit().percent(), 0);
    }
}
