//! Terminal user interface.

pub mod app;
pub mod components;
pub mod keys;
pub mod screens;
