//! Single-line text prompt overlay for `:` commands and free-form input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What the submitted text is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    Command,
    NoteTitle {
        note_id: Option<String>,
    },
    NoteContent {
        note_id: Option<String>,
        title: String,
    },
    Question,
    Reply {
        question_id: String,
    },
    ReviewSearch,
    ReviewRating,
    ReviewText {
        rating: u8,
    },
}

/// A request from a screen to open the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub purpose: PromptPurpose,
    pub label: String,
    pub initial: String,
}

impl PromptRequest {
    pub fn new(purpose: PromptPurpose, label: impl Into<String>) -> Self {
        Self {
            purpose,
            label: label.into(),
            initial: String::new(),
        }
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = initial.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Editing,
    Cancelled,
    Submitted(PromptPurpose, String),
}

/// Interactive state backing the prompt overlay.
#[derive(Debug, Default, Clone)]
pub struct PromptState {
    active: Option<(PromptPurpose, String)>,
    input: String,
}

impl PromptState {
    pub fn open(&mut self, request: PromptRequest) {
        self.input = request.initial;
        self.active = Some((request.purpose, request.label));
    }

    pub fn open_command(&mut self) {
        self.open(PromptRequest::new(PromptPurpose::Command, "Command"));
    }

    pub fn close(&mut self) {
        self.active = None;
        self.input.clear();
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => {
                self.close();
                PromptOutcome::Cancelled
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                match self.active.take() {
                    Some((purpose, _)) => PromptOutcome::Submitted(purpose, input),
                    None => PromptOutcome::Cancelled,
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                PromptOutcome::Editing
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(ch);
                PromptOutcome::Editing
            }
            _ => PromptOutcome::Editing,
        }
    }
}

/// Visual component for the prompt overlay.
#[derive(Debug, Default)]
pub struct Prompt;

impl Prompt {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &PromptState) {
        let Some((purpose, label)) = &state.active else {
            return;
        };

        let width = area.width.saturating_sub(10).min(80);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(5),
            width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, popup);

        let prefix = if matches!(purpose, PromptPurpose::Command) {
            ":"
        } else {
            "> "
        };
        let block = Block::default()
            .title(label.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let line = Line::from(vec![
            Span::styled(prefix, Style::default().fg(Color::Cyan)),
            Span::raw(state.input.as_str()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), popup);
    }
}
