//! Application loop for the TUI.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use parking_lot::Mutex;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::{debug, info, warn};

use crate::app::bookmarks::{
    BookmarkChange, BookmarkContext, BookmarkHandle, BookmarkProvider, BookmarkSnapshot,
    Subscription,
};
use crate::app::catalog::Catalog;
use crate::domain::errors::BookmarkError;
use crate::domain::model::{Category, CourseId};
use crate::infra::config::Config;
use crate::infra::kv::KeyValueStore;
use crate::ui::components::prompt::{Prompt, PromptOutcome, PromptPurpose, PromptState};
use crate::ui::keys::Keymap;
use crate::ui::screens::bookmarks::BookmarksScreen;
use crate::ui::screens::home::HomeScreen;
use crate::ui::screens::mentor_profile::MentorProfileScreen;
use crate::ui::screens::{Action, Screen, ScreenContext, StatusLevel};

/// Upper bound for how long a status message stays up.
const MAX_STATUS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const COMMAND_HELP: &str =
    "Commands: home · bookmarks · category <id> · search <text> · mentor <id> · quit";

/// Primary entry point for running the interactive TUI.
pub struct UiApp {
    config: Config,
    catalog: Catalog,
    keymap: Keymap,
    store: Arc<dyn KeyValueStore>,
    bookmarks: BookmarkContext,
    screens: Vec<Box<dyn Screen>>,
    prompt: PromptState,
    prompt_component: Prompt,
    status: Option<StatusMessage>,
    changes: Arc<Mutex<Vec<BookmarkChange>>>,
    _subscription: Subscription,
    _provider: BookmarkProvider,
    should_quit: bool,
}

impl UiApp {
    pub fn new(config: Config, catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let keymap = Keymap::from_config(&config.keybindings).context("invalid key binding")?;
        let provider = if config.defaults.seed_bookmarks {
            BookmarkProvider::new(catalog.bookmark_seed())
        } else {
            BookmarkProvider::empty()
        };

        let changes: Arc<Mutex<Vec<BookmarkChange>>> = Arc::default();
        let inbox = Arc::clone(&changes);
        let subscription = provider
            .handle()
            .subscribe(move |change| inbox.lock().push(change.clone()))?;

        let home = HomeScreen::new(&catalog, &config.defaults.category);
        info!(
            courses = catalog.courses().len(),
            category = %config.defaults.category,
            "tui initialised"
        );
        Ok(Self {
            keymap,
            store,
            bookmarks: provider.context(),
            screens: vec![Box::new(home)],
            prompt: PromptState::default(),
            prompt_component: Prompt,
            status: None,
            changes,
            _subscription: subscription,
            _provider: provider,
            should_quit: false,
            config,
            catalog,
        })
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms.max(10));
        loop {
            self.step(terminal)?;

            if self.should_quit {
                break;
            }

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key)?;
            }
        }
        Ok(())
    }

    /// One loop iteration's output: pending notifications reach the status line before the
    /// frame is drawn.
    pub fn step<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.tick();
        self.draw(terminal)
    }

    /// Draw one frame. Every screen in the frame reads the same bookmark snapshot.
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let handle = self.bookmarks.bookmarks()?;
        let snapshot = handle.snapshot()?;
        terminal.draw(|frame| self.render(frame, &handle, &snapshot))?;
        Ok(())
    }

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        handle: &BookmarkHandle,
        snapshot: &BookmarkSnapshot,
    ) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .split(size);

        let crumbs: Vec<String> = self.screens.iter().map(|screen| screen.title()).collect();
        let title = Line::from(vec![
            Span::styled(
                "coursedeck",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" › {}", crumbs.join(" › ")),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(title), layout[0]);

        let ctx = ScreenContext {
            catalog: &self.catalog,
            bookmarks: handle,
            keymap: &self.keymap,
            store: &self.store,
        };
        if let Some(screen) = self.screens.last_mut() {
            screen.render(frame, layout[1], &ctx, snapshot);

            let mut hints = Vec::new();
            for (key, label) in screen.hints() {
                hints.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
                hints.push(Span::raw(format!(" {label} · ")));
            }
            hints.push(Span::styled("q", Style::default().fg(Color::Cyan)));
            hints.push(Span::raw(" quit"));
            frame.render_widget(
                Paragraph::new(Line::from(hints))
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::Gray)),
                layout[2],
            );
        }

        self.render_status(frame, layout[3], snapshot);
        self.prompt_component.render(frame, size, &self.prompt);
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect, snapshot: &BookmarkSnapshot) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.level {
                    StatusLevel::Info => Style::default().fg(Color::Gray),
                    StatusLevel::Success => Style::default().fg(Color::Green),
                    StatusLevel::Error => Style::default().fg(Color::Red),
                };
                Line::styled(status.text.clone(), style)
            }
            None => Line::styled(
                format!("{} bookmarked · press : for commands", snapshot.len()),
                Style::default().fg(Color::DarkGray),
            ),
        };

        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(line), inner);
    }

    /// Expire the status line and turn bookmark notifications into status messages.
    pub fn tick(&mut self) {
        let changes: Vec<BookmarkChange> = std::mem::take(&mut *self.changes.lock());
        for change in changes {
            let title = self
                .catalog
                .course(&change.course_id)
                .map(|course| course.title.clone())
                .unwrap_or_else(|| change.course_id.to_string());
            if change.bookmarked {
                self.set_status(StatusLevel::Success, format!("Added \"{title}\" to bookmarks"));
            } else {
                self.set_status(StatusLevel::Info, format!("Removed \"{title}\" from bookmarks"));
            }
        }

        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return Ok(());
        }
        if self.prompt.is_open() {
            return self.handle_prompt_key(key);
        }

        let handle = self.bookmarks.bookmarks()?;
        let ctx = ScreenContext {
            catalog: &self.catalog,
            bookmarks: &handle,
            keymap: &self.keymap,
            store: &self.store,
        };
        let Some(screen) = self.screens.last_mut() else {
            self.should_quit = true;
            return Ok(());
        };
        let modal = screen.is_modal();
        let result = screen.handle_key(&key, &ctx);

        match self.settle(result)? {
            Action::Ignored if !modal => self.handle_global_key(key),
            action => {
                self.apply(action);
                Ok(())
            }
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.apply(Action::Pop),
            KeyCode::Char(':') => self.prompt.open_command(),
            KeyCode::Char('?') => self.set_status(StatusLevel::Info, COMMAND_HELP),
            _ => {}
        }
        Ok(())
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.prompt.handle_key(&key) {
            PromptOutcome::Editing | PromptOutcome::Cancelled => Ok(()),
            PromptOutcome::Submitted(PromptPurpose::Command, input) => {
                if let Err(err) = self.execute_command(input.trim()) {
                    self.set_status(StatusLevel::Error, err.to_string());
                }
                Ok(())
            }
            PromptOutcome::Submitted(purpose, input) => {
                let handle = self.bookmarks.bookmarks()?;
                let ctx = ScreenContext {
                    catalog: &self.catalog,
                    bookmarks: &handle,
                    keymap: &self.keymap,
                    store: &self.store,
                };
                let Some(screen) = self.screens.last_mut() else {
                    return Ok(());
                };
                let result = screen.on_prompt(purpose, input, &ctx);
                let action = self.settle(result)?;
                self.apply(action);
                Ok(())
            }
        }
    }

    /// Missing-provider errors abort the loop; anything else lands on the status line.
    fn settle(&mut self, result: Result<Action>) -> Result<Action> {
        match result {
            Ok(action) => Ok(action),
            Err(err) if err.downcast_ref::<BookmarkError>().is_some() => Err(err),
            Err(err) => {
                warn!(error = %err, "screen action failed");
                self.set_status(StatusLevel::Error, err.to_string());
                Ok(Action::None)
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None | Action::Ignored => {}
            Action::Push(screen) => {
                debug!(screen = %screen.title(), "push screen");
                self.screens.push(screen);
            }
            Action::Pop => {
                if self.screens.len() > 1 {
                    if let Some(screen) = self.screens.pop() {
                        debug!(screen = %screen.title(), "pop screen");
                    }
                }
            }
            Action::Prompt(request) => self.prompt.open(request),
            Action::Status(level, message) => self.set_status(level, message),
        }
    }

    fn execute_command(&mut self, command: &str) -> Result<()> {
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((command, ""));

        match name {
            "" => {}
            "home" => {
                let category = self.config.defaults.category.clone();
                self.reset_to_home(&category);
            }
            "bookmarks" => {
                let screen = BookmarksScreen::new(&self.catalog, Category::ALL);
                self.apply(Action::Push(Box::new(screen)));
            }
            "category" => {
                if self.catalog.category(rest).is_none() {
                    bail!("Unknown category: {rest}");
                }
                self.reset_to_home(rest);
            }
            "search" => {
                if rest.is_empty() {
                    bail!("Usage: search <text>");
                }
                let screen = HomeScreen::with_search(&self.catalog, Category::ALL, rest);
                self.apply(Action::Push(Box::new(screen)));
            }
            "mentor" => {
                let Some(mentor) = self.catalog.mentor(rest) else {
                    bail!("Unknown mentor: {rest}");
                };
                let screen = MentorProfileScreen::new(mentor);
                self.apply(Action::Push(Box::new(screen)));
            }
            "help" => self.set_status(StatusLevel::Info, COMMAND_HELP),
            "quit" | "q" => self.should_quit = true,
            other => bail!("Unknown command: {other}"),
        }
        Ok(())
    }

    fn reset_to_home(&mut self, category: &str) {
        self.screens = vec![Box::new(HomeScreen::new(&self.catalog, category))];
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        let ttl = Duration::from_secs(self.config.ui.status_ttl_secs);
        self.status = Some(StatusMessage::new(level, message.into(), ttl));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Titles of the navigation stack, bottom first.
    pub fn screen_titles(&self) -> Vec<String> {
        self.screens.iter().map(|screen| screen.title()).collect()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn is_bookmarked(&self, id: &str) -> Result<bool> {
        Ok(self.bookmarks.bookmarks()?.is_bookmarked(&CourseId::from(id))?)
    }

    #[cfg(test)]
    fn detach_bookmarks(&mut self) {
        self.bookmarks = BookmarkContext::detached();
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            level,
            text,
            expires_at: now
                .checked_add(ttl)
                .unwrap_or_else(|| now + MAX_STATUS_TTL),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::backend::TestBackend;

    use crate::infra::kv::MemoryStore;
    use crate::ui::keys::press;

    fn app() -> UiApp {
        let catalog = Catalog::builtin().unwrap();
        UiApp::new(Config::default(), catalog, Arc::new(MemoryStore::new())).unwrap()
    }

    fn type_keys(app: &mut UiApp, keys: &str) {
        for ch in keys.chars() {
            app.handle_key(press(KeyCode::Char(ch))).unwrap();
        }
    }

    fn rendered(app: &mut UiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
        app.draw(&mut terminal).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn starts_on_home_with_seeded_bookmarks() {
        let mut app = app();
        assert_eq!(app.screen_titles(), vec!["Home"]);
        assert!(app.is_bookmarked("1").unwrap());
        assert!(!app.is_bookmarked("2").unwrap());
        assert!(rendered(&mut app).contains("2 bookmarked"));
    }

    #[test]
    fn unseeded_config_starts_empty() {
        let mut config = Config::default();
        config.defaults.seed_bookmarks = false;
        let app = UiApp::new(config, Catalog::builtin().unwrap(), Arc::new(MemoryStore::new()))
            .unwrap();
        assert!(!app.is_bookmarked("1").unwrap());
    }

    #[test]
    fn bookmark_changes_reach_the_status_line() {
        let mut app = app();
        type_keys(&mut app, "jb");
        app.tick();
        assert_eq!(
            app.status_text(),
            Some("Added \"Digital Entrepreneurship\" to bookmarks")
        );

        type_keys(&mut app, "by");
        app.tick();
        assert_eq!(
            app.status_text(),
            Some("Removed \"Digital Entrepreneurship\" from bookmarks")
        );
    }

    #[test]
    fn toggle_status_shows_on_the_next_frame() {
        let mut app = app();
        type_keys(&mut app, "jb");

        let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
        app.step(&mut terminal).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Added \"Digital Entrepreneurship\" to bookmarks"));
    }

    #[test]
    fn huge_status_ttl_does_not_overflow() {
        let mut config = Config::default();
        config.ui.status_ttl_secs = u64::MAX;
        let mut app =
            UiApp::new(config, Catalog::builtin().unwrap(), Arc::new(MemoryStore::new())).unwrap();
        type_keys(&mut app, "?");
        assert!(app.status_text().is_some_and(|text| text.starts_with("Commands")));
        app.tick();
        assert!(app.status_text().is_some());
    }

    #[test]
    fn escape_closes_the_sheet_before_popping() {
        let mut app = app();
        type_keys(&mut app, "B");
        assert_eq!(app.screen_titles(), vec!["Home", "Bookmarks"]);

        type_keys(&mut app, "b");
        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen_titles(), vec!["Home", "Bookmarks"]);
        assert!(app.is_bookmarked("1").unwrap());

        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen_titles(), vec!["Home"]);
        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen_titles(), vec!["Home"]);
    }

    #[test]
    fn q_is_swallowed_by_an_open_sheet() {
        let mut app = app();
        type_keys(&mut app, "bq");
        assert!(!app.should_quit());
        type_keys(&mut app, "n");
        type_keys(&mut app, "q");
        assert!(app.should_quit());
    }

    #[test]
    fn commands_navigate() {
        let mut app = app();
        type_keys(&mut app, ":bookmarks");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen_titles(), vec!["Home", "Bookmarks"]);

        type_keys(&mut app, ":search design");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(
            app.screen_titles(),
            vec!["Home", "Bookmarks", "Search: design"]
        );

        type_keys(&mut app, ":category business");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen_titles(), vec!["Home"]);

        type_keys(&mut app, ":mentor 2");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen_titles(), vec!["Home", "Claire Ordonez"]);
    }

    #[test]
    fn bad_commands_report_errors() {
        let mut app = app();
        type_keys(&mut app, ":category astronomy");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.status_text(), Some("Unknown category: astronomy"));

        type_keys(&mut app, ":dance");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.status_text(), Some("Unknown command: dance"));
    }

    #[test]
    fn locked_lessons_surface_as_status() {
        let mut app = app();
        app.handle_key(press(KeyCode::Enter)).unwrap();
        type_keys(&mut app, "j");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen_titles().len(), 2);
        assert_eq!(app.status_text(), Some("lesson '2' is locked"));
    }

    #[test]
    fn lesson_prompts_route_back_to_the_screen() {
        let mut app = app();
        app.handle_key(press(KeyCode::Enter)).unwrap();
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen_titles().len(), 3);

        app.handle_key(press(KeyCode::Tab)).unwrap();
        type_keys(&mut app, "aLighting");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        type_keys(&mut app, "Three point setup");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.status_text(), Some("Note saved"));
        assert!(rendered(&mut app).contains("Three point setup"));
    }

    #[test]
    fn missing_provider_aborts() {
        let mut app = app();
        app.detach_bookmarks();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let err = app.draw(&mut terminal).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BookmarkError>(),
            Some(&BookmarkError::ProviderMissing)
        );

        let err = app.handle_key(press(KeyCode::Char('b'))).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BookmarkError>(),
            Some(&BookmarkError::ProviderMissing)
        );
    }
}
