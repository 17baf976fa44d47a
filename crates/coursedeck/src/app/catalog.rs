//! Static course catalog.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::model::{Category, Course, CourseId, Mentor, Review};

static BUILTIN_CATALOG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/catalog.toml"));

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog data: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate course id '{0}'")]
    DuplicateCourse(CourseId),
    #[error("course '{course}' references unknown instructor '{mentor}'")]
    UnknownInstructor { course: CourseId, mentor: String },
    #[error("review '{review}' has rating {rating}, expected 1 to 5")]
    InvalidRating { review: String, rating: u8 },
}

/// Courses, categories, and mentors available to every screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    mentors: Vec<Mentor>,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    course_reviews: Vec<Review>,
    #[serde(default)]
    mentor_reviews: Vec<Review>,
}

impl Catalog {
    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(&BUILTIN_CATALOG)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&data)
    }

    /// The catalog at `path` when one is configured, otherwise the built-in one.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(contents)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if !seen.insert(&course.id) {
                return Err(CatalogError::DuplicateCourse(course.id.clone()));
            }
            if self.mentor(&course.instructor).is_none() {
                return Err(CatalogError::UnknownInstructor {
                    course: course.id.clone(),
                    mentor: course.instructor.clone(),
                });
            }
        }
        for review in self.course_reviews.iter().chain(&self.mentor_reviews) {
            if !(1..=5).contains(&review.rating) {
                return Err(CatalogError::InvalidRating {
                    review: review.id.clone(),
                    rating: review.rating,
                });
            }
        }
        Ok(())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn mentors(&self) -> &[Mentor] {
        &self.mentors
    }

    pub fn mentor(&self, id: &str) -> Option<&Mentor> {
        self.mentors.iter().find(|mentor| mentor.id == id)
    }

    /// Courses accepted by the category chip. Unknown or missing categories accept everything.
    pub fn courses_in(&self, category: Option<&Category>) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|course| category.is_none_or(|category| category.matches(&course.category)))
            .collect()
    }

    pub fn courses_by(&self, mentor_id: &str) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|course| course.instructor == mentor_id)
            .collect()
    }

    /// Case-insensitive match on title or category. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Course> {
        let needle = query.trim().to_lowercase();
        self.courses
            .iter()
            .filter(|course| {
                needle.is_empty()
                    || course.title.to_lowercase().contains(&needle)
                    || course.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Reviews shown on course pages, newest first.
    pub fn course_reviews(&self) -> &[Review] {
        &self.course_reviews
    }

    /// Reviews shown on mentor pages, newest first.
    pub fn mentor_reviews(&self) -> &[Review] {
        &self.mentor_reviews
    }

    /// Ids of courses flagged as bookmarked in the catalog data.
    pub fn bookmark_seed(&self) -> Vec<CourseId> {
        self.courses
            .iter()
            .filter(|course| course.bookmarked)
            .map(|course| course.id.clone())
            .collect()
    }
}
