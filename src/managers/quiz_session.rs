//! Quiz Session state machine.
//!
//! A session walks one quiz: the learner selects at most one option per
//! question, moves between questions, and submits once every question is
//! answered. After submission the session is read-only.

use serde::Serialize;

use crate::types::artifacts::{QuizArtifact, QuizQuestion, OPTIONS_PER_QUESTION};
use crate::types::errors::QuizError;

/// Display state of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Unanswered,
    Answered(usize),
    Submitted,
}

/// Decoration of one option after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Correct,
    Incorrect,
}

/// Result of a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

impl QuizScore {
    pub fn new(correct: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (100.0 * correct as f64 / total as f64).round() as u32
        };
        Self {
            correct,
            total,
            percentage,
        }
    }
}

/// Popup-local progress through one quiz; never persisted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: QuizArtifact,
    current: usize,
    answers: Vec<Option<usize>>,
    submitted: bool,
}

impl QuizSession {
    /// Starts a fresh session. Rejects empty quizzes and out-of-range answer keys.
    pub fn new(quiz: QuizArtifact) -> Result<Self, QuizError> {
        quiz.validate()?;
        let answers = vec![None; quiz.questions.len()];
        Ok(Self {
            quiz,
            current: 0,
            answers,
            submitted: false,
        })
    }

    pub fn quiz(&self) -> &QuizArtifact {
        &self.quiz
    }

    pub fn len(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quiz.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.quiz.questions[self.current]
    }

    pub fn answer(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Selects `option` for the current question, replacing any earlier choice.
    pub fn select(&mut self, option: usize) -> Result<(), QuizError> {
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        if option >= OPTIONS_PER_QUESTION {
            return Err(QuizError::OptionOutOfRange(option));
        }
        self.answers[self.current] = Some(option);
        Ok(())
    }

    /// Moves to the next question. Returns false at the last one.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous question. Returns false at the first one.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.submitted && self.answered_count() == self.len()
    }

    /// Scores the quiz and freezes the session.
    pub fn submit(&mut self) -> Result<QuizScore, QuizError> {
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        let answered = self.answered_count();
        if answered != self.len() {
            return Err(QuizError::Incomplete {
                answered,
                total: self.len(),
            });
        }
        self.submitted = true;
        Ok(self.score())
    }

    /// Score over the current answers; unanswered questions count as wrong.
    pub fn score(&self) -> QuizScore {
        let correct = self
            .quiz
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| **a == Some(q.correct_answer))
            .count();
        QuizScore::new(correct, self.len())
    }

    pub fn question_state(&self, index: usize) -> QuestionState {
        if self.submitted {
            return QuestionState::Submitted;
        }
        match self.answer(index) {
            Some(option) => QuestionState::Answered(option),
            None => QuestionState::Unanswered,
        }
    }

    /// How `option` of question `index` is decorated. Plain until submission.
    pub fn option_mark(&self, index: usize, option: usize) -> OptionMark {
        if !self.submitted {
            return OptionMark::Plain;
        }
        let Some(question) = self.quiz.questions.get(index) else {
            return OptionMark::Plain;
        };
        if option == question.correct_answer {
            OptionMark::Correct
        } else if self.answer(index) == Some(option) {
            OptionMark::Incorrect
        } else {
            OptionMark::Plain
        }
    }
}
