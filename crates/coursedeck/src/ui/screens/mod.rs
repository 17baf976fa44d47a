//! Screens on the navigation stack and the contract they share with the app loop.

pub mod bookmarks;
pub mod course_details;
pub mod home;
pub mod lesson;
pub mod mentor_profile;
pub mod reviews;

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::debug;

use crate::app::bookmarks::{BookmarkHandle, BookmarkSnapshot};
use crate::app::catalog::Catalog;
use crate::app::removal::{RemovalFlow, ToggleOutcome};
use crate::domain::errors::DomainError;
use crate::domain::model::CourseId;
use crate::infra::kv::KeyValueStore;
use crate::ui::components::prompt::{PromptPurpose, PromptRequest};
use crate::ui::components::sheet::{ConfirmSheet, SheetAction};
use crate::ui::keys::Keymap;

/// Everything a screen may read or act on while handling input or drawing.
pub struct ScreenContext<'a> {
    pub catalog: &'a Catalog,
    pub bookmarks: &'a BookmarkHandle,
    pub keymap: &'a Keymap,
    pub store: &'a Arc<dyn KeyValueStore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Result of a screen handling a key or prompt submission.
pub enum Action {
    /// Consumed; nothing else to do.
    None,
    /// Not handled; the app may apply its global bindings.
    Ignored,
    Push(Box<dyn Screen>),
    Pop,
    Prompt(PromptRequest),
    Status(StatusLevel, String),
}

impl Action {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Status(StatusLevel::Info, message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Status(StatusLevel::Error, message.into())
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Ignored => f.write_str("Ignored"),
            Self::Push(screen) => write!(f, "Push({})", screen.title()),
            Self::Pop => f.write_str("Pop"),
            Self::Prompt(request) => f.debug_tuple("Prompt").field(request).finish(),
            Self::Status(level, message) => {
                f.debug_tuple("Status").field(level).field(message).finish()
            }
        }
    }
}

/// A screen on the navigation stack.
///
/// Rendering receives the bookmark snapshot taken once for the whole frame; input handling
/// goes through the live handle in [`ScreenContext`].
pub trait Screen {
    fn title(&self) -> String;

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        ctx: &ScreenContext<'_>,
        snapshot: &BookmarkSnapshot,
    );

    fn handle_key(&mut self, key: &KeyEvent, ctx: &ScreenContext<'_>) -> Result<Action>;

    fn on_prompt(
        &mut self,
        purpose: PromptPurpose,
        input: String,
        ctx: &ScreenContext<'_>,
    ) -> Result<Action> {
        let _ = (purpose, input, ctx);
        Ok(Action::None)
    }

    /// Key hints for the footer.
    fn hints(&self) -> &'static [(&'static str, &'static str)];

    /// Whether a modal sheet is open and owns every key.
    fn is_modal(&self) -> bool {
        false
    }
}

/// Report domain errors (locked lesson, missing note title, ...) on the status line instead of
/// failing the loop.
pub(crate) fn domain_error_as_status(result: Result<Action>) -> Result<Action> {
    match result {
        Err(err) => match err.downcast_ref::<DomainError>() {
            Some(domain) => Ok(Action::error(domain.to_string())),
            None => Err(err),
        },
        ok => ok,
    }
}

/// Route a bookmark control press through the removal flow.
///
/// Adding toggles immediately; removing opens the confirmation sheet.
pub(crate) fn bookmark_pressed(
    flow: &mut RemovalFlow,
    ctx: &ScreenContext<'_>,
    id: &CourseId,
) -> Result<Action> {
    match flow.request_toggle(ctx.bookmarks, id)? {
        ToggleOutcome::Added(_) | ToggleOutcome::ConfirmationRequested(_) => Ok(Action::None),
        ToggleOutcome::Busy { pending } => {
            debug!(%pending, requested = %id, "removal already pending");
            Ok(Action::None)
        }
    }
}

/// Feed a key to the open removal sheet. Every key is consumed while it is visible.
pub(crate) fn removal_sheet_key(
    flow: &mut RemovalFlow,
    ctx: &ScreenContext<'_>,
    key: &KeyEvent,
) -> Result<Action> {
    match ConfirmSheet::handle_key(key, ctx.keymap) {
        Some(SheetAction::Confirm) => {
            flow.confirm(ctx.bookmarks)?;
        }
        Some(SheetAction::Close) => {
            flow.cancel();
        }
        None => {}
    }
    Ok(Action::None)
}

/// Draw the removal sheet for the flow's current candidate, if any.
pub(crate) fn render_removal_sheet(
    flow: &RemovalFlow,
    frame: &mut Frame<'_>,
    area: Rect,
    ctx: &ScreenContext<'_>,
) {
    if let Some(id) = flow.candidate() {
        let title = ctx
            .catalog
            .course(id)
            .map(|course| course.title.as_str())
            .unwrap_or(id.as_str());
        ConfirmSheet::remove_bookmark(title).render(frame, area, flow.is_visible(), ctx.keymap);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    use crate::app::bookmarks::BookmarkProvider;
    use crate::infra::kv::MemoryStore;

    /// Owns everything a [`ScreenContext`] borrows.
    pub struct Harness {
        pub catalog: Catalog,
        pub provider: BookmarkProvider,
        pub handle: BookmarkHandle,
        pub keymap: Keymap,
        pub store: Arc<dyn KeyValueStore>,
    }

    impl Harness {
        pub fn new() -> Self {
            let catalog = Catalog::builtin().unwrap();
            let provider = BookmarkProvider::new(catalog.bookmark_seed());
            let handle = provider.handle();
            Self {
                catalog,
                provider,
                handle,
                keymap: Keymap::default(),
                store: Arc::new(MemoryStore::new()),
            }
        }

        pub fn ctx(&self) -> ScreenContext<'_> {
            ScreenContext {
                catalog: &self.catalog,
                bookmarks: &self.handle,
                keymap: &self.keymap,
                store: &self.store,
            }
        }

        pub fn is_bookmarked(&self, id: &str) -> bool {
            self.handle.is_bookmarked(&CourseId::from(id)).unwrap()
        }

        /// Render `screen` into a test terminal and return the text, row by row.
        pub fn draw(&self, screen: &mut dyn Screen) -> String {
            use ratatui::Terminal;
            use ratatui::backend::TestBackend;

            let snapshot = self.handle.snapshot().unwrap();
            let ctx = self.ctx();
            let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
            terminal
                .draw(|frame| screen.render(frame, frame.size(), &ctx, &snapshot))
                .unwrap();
            let buffer = terminal.backend().buffer();
            buffer
                .content()
                .chunks(buffer.area.width as usize)
                .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    pub fn key(ch: char) -> KeyEvent {
        crate::ui::keys::press(crossterm::event::KeyCode::Char(ch))
    }
}
