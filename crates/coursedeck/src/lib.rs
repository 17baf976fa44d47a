//! Terminal course marketplace: catalog browsing, bookmarks, lessons, notes, quizzes, and Q&A.

pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;
