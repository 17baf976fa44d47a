//! Lesson screen with Content, Notes, Quiz, and Q&A tabs.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::lesson::LessonSession;
use crate::app::qa::QaFilter;
use crate::domain::errors::DomainError;
use crate::ui::components::course_list::ListCursor;
use crate::ui::components::prompt::{PromptPurpose, PromptRequest};
use crate::ui::components::sheet::{ConfirmSheet, SheetAction};
use crate::ui::keys::Keymap;
use crate::ui::screens::{Action, Screen, ScreenContext, StatusLevel, domain_error_as_status};

const HINTS: &[(&str, &str)] = &[
    ("tab", "switch tab"),
    ("n/p", "next/prev lesson"),
    ("j/k", "move"),
    ("a", "add"),
    ("e/d", "edit/delete note"),
    ("1-4", "answer"),
    ("s", "submit"),
    ("r", "reply/reset"),
    ("f", "filter"),
    ("esc", "back"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LessonTab {
    Content,
    Notes,
    Quiz,
    Qa,
}

impl LessonTab {
    const ALL: [LessonTab; 4] = [
        LessonTab::Content,
        LessonTab::Notes,
        LessonTab::Quiz,
        LessonTab::Qa,
    ];

    fn next(self) -> Self {
        match self {
            LessonTab::Content => LessonTab::Notes,
            LessonTab::Notes => LessonTab::Quiz,
            LessonTab::Quiz => LessonTab::Qa,
            LessonTab::Qa => LessonTab::Content,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LessonTab::Content => "Content",
            LessonTab::Notes => "Notes",
            LessonTab::Quiz => "Quiz",
            LessonTab::Qa => "Q&A",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }
}

pub struct LessonScreen {
    session: LessonSession,
    tab: LessonTab,
    cursor: ListCursor,
    qa_filter: QaFilter,
    pending_delete: Option<String>,
}

impl LessonScreen {
    pub fn new(session: LessonSession) -> Self {
        Self {
            session,
            tab: LessonTab::Content,
            cursor: ListCursor::default(),
            qa_filter: QaFilter::All,
            pending_delete: None,
        }
    }

    pub fn session(&self) -> &LessonSession {
        &self.session
    }

    fn tab_len(&self) -> usize {
        match self.tab {
            LessonTab::Content => 0,
            LessonTab::Notes => self.session.notes().len(),
            LessonTab::Quiz => self.session.quiz().questions().len(),
            LessonTab::Qa => self.session.qa().filtered(self.qa_filter).len(),
        }
    }

    fn selected_note_id(&mut self) -> Option<String> {
        let index = self.cursor.clamp(self.session.notes().len());
        self.session
            .notes()
            .notes()
            .get(index)
            .map(|note| note.id.clone())
    }

    fn selected_question_id(&mut self) -> Option<String> {
        let len = self.tab_len();
        let index = self.cursor.clamp(len);
        match self.tab {
            LessonTab::Quiz => self
                .session
                .quiz()
                .questions()
                .get(index)
                .map(|question| question.id.clone()),
            LessonTab::Qa => self
                .session
                .qa()
                .filtered(self.qa_filter)
                .get(index)
                .map(|item| item.id.clone()),
            _ => None,
        }
    }

    fn step(&mut self, forward: bool) -> Result<Action> {
        let moved = if forward {
            self.session.next()?
        } else {
            self.session.previous()?
        };
        if !moved {
            let edge = if forward { "last" } else { "first" };
            return Ok(Action::info(format!("Already at the {edge} lesson")));
        }
        self.cursor.reset();
        self.pending_delete = None;
        Ok(Action::None)
    }

    fn handle_notes_key(&mut self, key: &KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::Char('a') => Ok(Action::Prompt(PromptRequest::new(
                PromptPurpose::NoteTitle { note_id: None },
                "Note title",
            ))),
            KeyCode::Char('e') => {
                let Some(id) = self.selected_note_id() else {
                    return Ok(Action::None);
                };
                let title = self
                    .session
                    .notes()
                    .get(&id)
                    .map(|note| note.title.clone())
                    .unwrap_or_default();
                Ok(Action::Prompt(
                    PromptRequest::new(PromptPurpose::NoteTitle { note_id: Some(id) }, "Note title")
                        .with_initial(title),
                ))
            }
            KeyCode::Char('d') => {
                self.pending_delete = self.selected_note_id();
                Ok(Action::None)
            }
            _ => Ok(Action::Ignored),
        }
    }

    fn handle_quiz_key(&mut self, key: &KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::Char(digit @ '1'..='4') => {
                let Some(question_id) = self.selected_question_id() else {
                    return Ok(Action::None);
                };
                let option = self
                    .session
                    .quiz()
                    .questions()
                    .iter()
                    .find(|question| question.id == question_id)
                    .and_then(|question| {
                        let index = digit as usize - '1' as usize;
                        question.options.get(index).cloned()
                    });
                if let Some(option) = option {
                    self.session.quiz_mut().select(&question_id, &option);
                }
                Ok(Action::None)
            }
            KeyCode::Char('s') => {
                if self.session.quiz().is_empty() {
                    return Ok(Action::info("This lesson has no quiz"));
                }
                let score = self.session.quiz_mut().submit();
                Ok(Action::Status(
                    StatusLevel::Success,
                    format!(
                        "Quiz score: {}/{} ({}%)",
                        score.score,
                        score.total,
                        score.percent()
                    ),
                ))
            }
            KeyCode::Char('r') => {
                self.session.quiz_mut().reset();
                Ok(Action::info("Quiz reset"))
            }
            _ => Ok(Action::Ignored),
        }
    }

    fn handle_qa_key(&mut self, key: &KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::Char('a') => Ok(Action::Prompt(PromptRequest::new(
                PromptPurpose::Question,
                "Ask a question",
            ))),
            KeyCode::Char('r') => Ok(match self.selected_question_id() {
                Some(question_id) => {
                    Action::Prompt(PromptRequest::new(PromptPurpose::Reply { question_id }, "Reply"))
                }
                None => Action::None,
            }),
            KeyCode::Char('f') => {
                self.qa_filter = self.qa_filter.next();
                self.cursor.reset();
                Ok(Action::None)
            }
            _ => Ok(Action::Ignored),
        }
    }

    fn save_note(&mut self, note_id: Option<String>, title: &str, content: &str) -> Result<Action> {
        let notes = self.session.notes_mut();
        match note_id {
            Some(id) => notes.update(&id, title, content)?,
            None => notes.add(title, content)?,
        };
        Ok(Action::Status(StatusLevel::Success, "Note saved".into()))
    }

    fn render_content(&self, frame: &mut Frame<'_>, area: Rect) {
        let lesson = self.session.lesson();
        let (position, total) = self.session.position();
        let section = self
            .session
            .course()
            .sections
            .iter()
            .find(|section| section.lessons.iter().any(|item| item.id == lesson.id))
            .map(|section| section.title.as_str())
            .unwrap_or_default();

        let mut lines = vec![
            Line::styled(
                format!("{} {}", lesson.number, lesson.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(section.to_string(), Style::default().fg(Color::Gray)),
            Line::default(),
            Line::from(vec![
                Span::styled("▶ ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("Video lesson · {} mins", lesson.minutes)),
            ]),
            Line::default(),
            Line::from(format!("Lesson {position} of {total}")),
        ];
        let mut nav = Vec::new();
        if self.session.has_previous() {
            nav.push(Span::styled("[p] Previous  ", Style::default().fg(Color::Cyan)));
        }
        if self.session.has_next() {
            nav.push(Span::styled("[n] Next", Style::default().fg(Color::Cyan)));
        }
        lines.push(Line::from(nav));

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_notes(&mut self, frame: &mut Frame<'_>, area: Rect, keymap: &Keymap) {
        let selected = self.cursor.clamp(self.session.notes().len());
        let mut lines = Vec::new();
        if self.session.notes().is_empty() {
            lines.push(Line::styled(
                "No notes yet. Press a to add one.",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
        for (idx, note) in self.session.notes().notes().iter().enumerate() {
            let marker = if idx == selected { "▶ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    note.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            if !note.content.is_empty() {
                lines.push(Line::styled(
                    format!("    {}", note.content),
                    Style::default().fg(Color::Gray),
                ));
            }
        }
        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().title("My Notes").borders(Borders::ALL))
                .wrap(Wrap { trim: false }),
            area,
        );

        if let Some(note) = self
            .pending_delete
            .as_deref()
            .and_then(|id| self.session.notes().get(id))
        {
            ConfirmSheet::delete_note(&note.title).render(frame, area, true, keymap);
        }
    }

    fn render_quiz(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let quiz = self.session.quiz();
        let selected = self.cursor.clamp(quiz.questions().len());
        let mut lines = Vec::new();
        if quiz.is_empty() {
            lines.push(Line::styled(
                "This lesson has no quiz.",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let score = quiz.score();
        for (idx, question) in quiz.questions().iter().enumerate() {
            let marker = if idx == selected { "▶ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("Q{}. {}", idx + 1, question.question),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            let answer = quiz.answer(&question.id);
            for (option_idx, option) in question.options.iter().enumerate() {
                let chosen = answer == Some(option.as_str());
                let check = if chosen { "(x)" } else { "( )" };
                let style = match score {
                    Some(_) if *option == question.correct => Style::default().fg(Color::Green),
                    Some(_) if chosen => Style::default().fg(Color::Red),
                    _ if chosen => Style::default().fg(Color::Cyan),
                    _ => Style::default(),
                };
                lines.push(Line::styled(
                    format!("    {check} {}. {option}", option_idx + 1),
                    style,
                ));
            }
        }
        if let Some(score) = score {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!(
                    "Score: {}/{} ({}%)",
                    score.score,
                    score.total,
                    score.percent()
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().title("Quiz").borders(Borders::ALL))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_qa(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let len = self.tab_len();
        let selected = self.cursor.clamp(len);
        let items = self.session.qa().filtered(self.qa_filter);

        let mut lines = vec![Line::styled(
            format!("Filter: {} (f to change)", self.qa_filter.label()),
            Style::default().fg(Color::Gray),
        )];
        if items.is_empty() {
            lines.push(Line::styled(
                "No questions here.",
                Style::default().fg(Color::DarkGray),
            ));
        }
        for (idx, item) in items.iter().enumerate() {
            let marker = if idx == selected { "▶ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{} · {}", item.author, item.posted),
                    Style::default().fg(Color::Gray),
                ),
            ]));
            lines.push(Line::from(format!("    {}", item.question)));
            for answer in &item.answers {
                let badge = if answer.instructor { " (Instructor)" } else { "" };
                lines.push(Line::styled(
                    format!("      ↳ {}{badge}: {}", answer.author, answer.text),
                    Style::default().fg(Color::Green),
                ));
            }
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().title("Q&A").borders(Borders::ALL))
                .wrap(Wrap { trim: false }),
            area,
        );
    }
}

impl Screen for LessonScreen {
    fn title(&self) -> String {
        let lesson = self.session.lesson();
        format!("Lesson {}: {}", lesson.number, lesson.title)
    }

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        ctx: &ScreenContext<'_>,
        _snapshot: &BookmarkSnapshot,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
            ])
            .split(area);

        let (position, total) = self.session.position();
        let header = Line::from(vec![
            Span::styled(
                self.session.course().title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · Lesson {position}/{total}"),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), layout[0]);

        let tabs = Tabs::new(LessonTab::ALL.iter().map(|tab| tab.label()).collect::<Vec<_>>())
            .block(Block::default().borders(Borders::ALL))
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[1]);

        match self.tab {
            LessonTab::Content => self.render_content(frame, layout[2]),
            LessonTab::Notes => self.render_notes(frame, layout[2], ctx.keymap),
            LessonTab::Quiz => self.render_quiz(frame, layout[2]),
            LessonTab::Qa => self.render_qa(frame, layout[2]),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &ScreenContext<'_>) -> Result<Action> {
        if let Some(id) = self.pending_delete.clone() {
            match ConfirmSheet::handle_key(key, ctx.keymap) {
                Some(SheetAction::Confirm) => {
                    self.pending_delete = None;
                    self.session.notes_mut().delete(&id)?;
                    return Ok(Action::info("Note deleted"));
                }
                Some(SheetAction::Close) => self.pending_delete = None,
                None => {}
            }
            return Ok(Action::None);
        }

        let keymap = ctx.keymap;
        if keymap.is_up(key) {
            self.cursor.up();
            return Ok(Action::None);
        }
        if keymap.is_down(key) {
            let len = self.tab_len();
            self.cursor.down(len);
            return Ok(Action::None);
        }

        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.cursor.reset();
                Ok(Action::None)
            }
            KeyCode::Char('n') => domain_error_as_status(self.step(true)),
            KeyCode::Char('p') => domain_error_as_status(self.step(false)),
            _ => match self.tab {
                LessonTab::Content => Ok(Action::Ignored),
                LessonTab::Notes => self.handle_notes_key(key),
                LessonTab::Quiz => self.handle_quiz_key(key),
                LessonTab::Qa => self.handle_qa_key(key),
            },
        }
    }

    fn on_prompt(
        &mut self,
        purpose: PromptPurpose,
        input: String,
        _ctx: &ScreenContext<'_>,
    ) -> Result<Action> {
        let result = match purpose {
            PromptPurpose::NoteTitle { note_id } => {
                let title = input.trim();
                if title.is_empty() {
                    Err(DomainError::MissingNoteTitle.into())
                } else {
                    let content = note_id
                        .as_deref()
                        .and_then(|id| self.session.notes().get(id))
                        .map(|note| note.content.clone())
                        .unwrap_or_default();
                    Ok(Action::Prompt(
                        PromptRequest::new(
                            PromptPurpose::NoteContent {
                                note_id,
                                title: title.to_string(),
                            },
                            "Note content",
                        )
                        .with_initial(content),
                    ))
                }
            }
            PromptPurpose::NoteContent { note_id, title } => self.save_note(note_id, &title, &input),
            PromptPurpose::Question => Ok(match self.session.qa_mut().ask(&input) {
                Some(_) => Action::Status(StatusLevel::Success, "Question posted".into()),
                None => Action::info("Question is empty"),
            }),
            PromptPurpose::Reply { question_id } => {
                Ok(match self.session.qa_mut().reply(&question_id, &input) {
                    Some(_) => Action::Status(StatusLevel::Success, "Reply posted".into()),
                    None => Action::info("Reply not posted"),
                })
            }
            PromptPurpose::Command
            | PromptPurpose::ReviewSearch
            | PromptPurpose::ReviewRating
            | PromptPurpose::ReviewText { .. } => Ok(Action::Ignored),
        };
        domain_error_as_status(result)
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        HINTS
    }

    fn is_modal(&self) -> bool {
        self.pending_delete.is_some()
    }
}
