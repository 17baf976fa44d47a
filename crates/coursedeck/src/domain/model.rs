//! Domain models for the course catalog, lessons, and learner content.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog course. Any string is a valid id; the bookmark store never checks
/// ids against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CourseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Category chip shown above course lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Category {
    pub const ALL: &'static str = "all";

    /// Whether this category accepts every course.
    pub fn is_all(&self) -> bool {
        self.id == Self::ALL
    }

    /// Whether a course with the given category label belongs to this chip.
    pub fn matches(&self, course_category: &str) -> bool {
        self.is_all() || self.label.contains(course_category)
    }

    /// Label with the icon prefix, if any.
    pub fn display(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{icon} {}", self.label),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub courses: u32,
    #[serde(default)]
    pub students: u32,
    #[serde(default)]
    pub reviews: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub category: String,
    pub difficulty: String,
    pub image: String,
    pub price: u32,
    #[serde(default)]
    pub original_price: Option<u32>,
    pub rating: f32,
    pub students: u32,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub duration_hours: f32,
    /// Seed flag for the bookmark store. Never read after startup.
    #[serde(default)]
    pub bookmarked: bool,
    #[serde(default)]
    pub tools: Vec<String>,
    /// Mentor id of the instructor.
    pub instructor: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// All lessons across sections, in display order.
    pub fn lessons(&self) -> Vec<&Lesson> {
        self.sections
            .iter()
            .flat_map(|section| section.lessons.iter())
            .collect()
    }

    /// Index of a lesson within [`Course::lessons`].
    pub fn lesson_position(&self, lesson_id: &str) -> Option<usize> {
        self.lessons()
            .iter()
            .position(|lesson| lesson.id == lesson_id)
    }

    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|section| section.lessons.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Section {
    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(|lesson| lesson.minutes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub number: String,
    pub title: String,
    pub minutes: u32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
}

/// A star rating with a short comment, shown on course and mentor pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    /// Relative age as displayed, e.g. "2 days ago".
    pub date: String,
    pub text: String,
}

/// A learner note attached to a single lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// A question posted in a lesson's Q&A thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaItem {
    pub id: String,
    pub author: String,
    pub question: String,
    pub posted: String,
    pub answers: Vec<QaAnswer>,
}

impl QaItem {
    pub fn is_answered(&self) -> bool {
        !self.answers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaAnswer {
    pub id: String,
    pub author: String,
    pub text: String,
    pub posted: String,
    pub instructor: bool,
}
