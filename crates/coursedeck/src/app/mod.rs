//! Application layer orchestrating domain logic and infrastructure.

pub mod bookmarks;
pub mod catalog;
pub mod lesson;
pub mod listing;
pub mod notes;
pub mod qa;
pub mod quiz;
pub mod removal;
pub mod reviews;
pub mod selectors;
