//! State behind the lesson screen: navigation, notes, quiz, and Q&A.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::app::notes::NoteBook;
use crate::app::qa::QaThread;
use crate::app::quiz::QuizAttempt;
use crate::domain::errors::DomainError;
use crate::domain::model::{Course, Lesson};
use crate::infra::kv::KeyValueStore;

/// An open lesson within a course.
///
/// Moving to another lesson reloads its notes and resets the quiz and Q&A thread.
pub struct LessonSession {
    course: Course,
    index: usize,
    notes: NoteBook,
    quiz: QuizAttempt,
    qa: QaThread,
    store: Arc<dyn KeyValueStore>,
}

impl LessonSession {
    /// Open `lesson_id` in `course`. Locked lessons cannot be opened.
    pub fn open(course: &Course, lesson_id: &str, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let index = course
            .lesson_position(lesson_id)
            .ok_or_else(|| DomainError::LessonNotFound(lesson_id.to_string()))?;
        let lesson = course.lessons()[index];
        ensure_unlocked(lesson)?;

        let notes = NoteBook::load(Arc::clone(&store), &course.id, &lesson.id)?;
        let quiz = QuizAttempt::new(lesson.quiz.clone());
        debug!(course = %course.id, lesson = %lesson.id, "lesson opened");
        Ok(Self {
            course: course.clone(),
            index,
            notes,
            quiz,
            qa: QaThread::sample(),
            store,
        })
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn lesson(&self) -> &Lesson {
        self.course.lessons()[self.index]
    }

    /// One-based position and total lesson count.
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.course.lesson_count())
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.course.lesson_count()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Move to the following lesson. Returns `false` at the end of the course.
    pub fn next(&mut self) -> Result<bool> {
        if !self.has_next() {
            return Ok(false);
        }
        self.go_to(self.index + 1)?;
        Ok(true)
    }

    /// Move to the preceding lesson. Returns `false` at the start of the course.
    pub fn previous(&mut self) -> Result<bool> {
        if !self.has_previous() {
            return Ok(false);
        }
        self.go_to(self.index - 1)?;
        Ok(true)
    }

    /// Jump to a lesson of the same course.
    pub fn select(&mut self, lesson_id: &str) -> Result<()> {
        let index = self
            .course
            .lesson_position(lesson_id)
            .ok_or_else(|| DomainError::LessonNotFound(lesson_id.to_string()))?;
        self.go_to(index)
    }

    fn go_to(&mut self, index: usize) -> Result<()> {
        let lesson = self.course.lessons()[index].clone();
        ensure_unlocked(&lesson)?;

        self.notes = NoteBook::load(Arc::clone(&self.store), &self.course.id, &lesson.id)?;
        self.quiz = QuizAttempt::new(lesson.quiz.clone());
        self.qa = QaThread::sample();
        self.index = index;
        debug!(course = %self.course.id, lesson = %lesson.id, "lesson changed");
        Ok(())
    }

    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteBook {
        &mut self.notes
    }

    pub fn quiz(&self) -> &QuizAttempt {
        &self.quiz
    }

    pub fn quiz_mut(&mut self) -> &mut QuizAttempt {
        &mut self.quiz
    }

    pub fn qa(&self) -> &QaThread {
        &self.qa
    }

    pub fn qa_mut(&mut self) -> &mut QaThread {
        &mut self.qa
    }
}

fn ensure_unlocked(lesson: &Lesson) -> Result<()> {
    if lesson.locked {
        return Err(DomainError::LessonLocked(lesson.id.clone()).into());
    }
    Ok(())
}
