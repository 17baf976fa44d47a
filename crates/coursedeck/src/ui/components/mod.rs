//! Reusable ratatui components.

pub mod category_bar;
pub mod course_list;
pub mod prompt;
pub mod sheet;
