//! Course details: header, stats, instructor, and the lesson outline.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::lesson::LessonSession;
use crate::app::removal::RemovalFlow;
use crate::domain::errors::DomainError;
use crate::domain::model::{Course, CourseId};
use crate::ui::components::course_list::{ListCursor, bookmark_glyph, price_label};
use crate::ui::screens::lesson::LessonScreen;
use crate::ui::screens::mentor_profile::MentorProfileScreen;
use crate::ui::screens::reviews::ReviewsScreen;
use crate::ui::screens::{
    Action, Screen, ScreenContext, bookmark_pressed, domain_error_as_status, removal_sheet_key,
    render_removal_sheet,
};

const HINTS: &[(&str, &str)] = &[
    ("j/k", "lesson"),
    ("↵", "open lesson"),
    ("b", "bookmark"),
    ("m", "instructor"),
    ("r", "reviews"),
    ("esc", "back"),
];

pub struct CourseDetailsScreen {
    course_id: CourseId,
    title: String,
    lessons: ListCursor,
    removal: RemovalFlow,
}

impl CourseDetailsScreen {
    pub fn new(course: &Course) -> Self {
        Self {
            course_id: course.id.clone(),
            title: course.title.clone(),
            lessons: ListCursor::default(),
            removal: RemovalFlow::new(),
        }
    }

    fn course<'a>(&self, ctx: &ScreenContext<'a>) -> Result<&'a Course> {
        ctx.catalog
            .course(&self.course_id)
            .ok_or_else(|| DomainError::CourseNotFound(self.course_id.to_string()).into())
    }

    fn open_selected(&mut self, ctx: &ScreenContext<'_>) -> Result<Action> {
        let course = self.course(ctx)?;
        let lessons = course.lessons();
        let index = self.lessons.clamp(lessons.len());
        let Some(lesson) = lessons.get(index) else {
            return Ok(Action::None);
        };
        let session = LessonSession::open(course, &lesson.id, Arc::clone(ctx.store))?;
        Ok(Action::Push(Box::new(LessonScreen::new(session))))
    }

    fn render_header(
        frame: &mut Frame<'_>,
        area: Rect,
        ctx: &ScreenContext<'_>,
        course: &Course,
        bookmarked: bool,
    ) {
        let instructor = ctx
            .catalog
            .mentor(&course.instructor)
            .map(|mentor| format!("{} · {}", mentor.name, mentor.role))
            .unwrap_or_else(|| course.instructor.clone());
        let glyph_style = if bookmarked {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{} ", bookmark_glyph(bookmarked)), glyph_style),
                Span::styled(
                    course.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(course.category.clone(), Style::default().fg(Color::Magenta)),
                Span::raw(format!(" · {} · ", course.difficulty)),
                Span::styled(
                    format!("★ {:.1}", course.rating),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(" ({} reviews)", course.reviews)),
            ]),
            Line::from(format!(
                "{} · {} students · {} lessons · {:.1}h",
                price_label(course),
                course.students,
                course.lesson_count(),
                course.duration_hours
            )),
            Line::from(format!("Tools: {}", course.tools.join(", "))),
            Line::from(vec![
                Span::styled("Mentor: ", Style::default().fg(Color::Gray)),
                Span::raw(instructor),
            ]),
        ];
        let block = Block::default()
            .title("About Course")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

/// Outline rows with a header per section. Returns the rows and the row index of each lesson.
fn outline(course: &Course) -> (Vec<ListItem<'static>>, Vec<usize>) {
    let mut items = Vec::new();
    let mut lesson_rows = Vec::new();
    for section in &course.sections {
        items.push(ListItem::new(Line::styled(
            format!("{} · {} mins", section.title, section.total_minutes()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for lesson in &section.lessons {
            lesson_rows.push(items.len());
            let lock = if lesson.locked { "locked" } else { "" };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("  {} ", lesson.number), Style::default().fg(Color::Gray)),
                Span::raw(lesson.title.clone()),
                Span::styled(
                    format!("  {} mins ", lesson.minutes),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(lock, Style::default().fg(Color::Red)),
            ])));
        }
    }
    (items, lesson_rows)
}

impl Screen for CourseDetailsScreen {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        ctx: &ScreenContext<'_>,
        snapshot: &BookmarkSnapshot,
    ) {
        let Ok(course) = self.course(ctx) else {
            frame.render_widget(Paragraph::new("Course not found"), area);
            return;
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(5)])
            .split(area);

        Self::render_header(frame, layout[0], ctx, course, snapshot.contains(&course.id));

        let (items, lesson_rows) = outline(course);
        let selected = self.lessons.clamp(lesson_rows.len());
        let list = List::new(items)
            .block(Block::default().title("Lessons").borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(lesson_rows.get(selected).copied());
        frame.render_stateful_widget(list, layout[1], &mut state);

        render_removal_sheet(&self.removal, frame, area, ctx);
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &ScreenContext<'_>) -> Result<Action> {
        if self.removal.is_visible() {
            return removal_sheet_key(&mut self.removal, ctx, key);
        }

        let keymap = ctx.keymap;
        if keymap.is_bookmark(key) {
            let id = self.course_id.clone();
            return bookmark_pressed(&mut self.removal, ctx, &id);
        }
        if keymap.is_up(key) {
            self.lessons.up();
            return Ok(Action::None);
        }
        if keymap.is_down(key) {
            let len = self.course(ctx)?.lesson_count();
            self.lessons.down(len);
            return Ok(Action::None);
        }

        match key.code {
            KeyCode::Enter => domain_error_as_status(self.open_selected(ctx)),
            KeyCode::Char('m') => {
                let course = self.course(ctx)?;
                Ok(match ctx.catalog.mentor(&course.instructor) {
                    Some(mentor) => Action::Push(Box::new(MentorProfileScreen::new(mentor))),
                    None => Action::info("Instructor profile unavailable"),
                })
            }
            KeyCode::Char('r') => {
                let course = self.course(ctx)?;
                Ok(Action::Push(Box::new(ReviewsScreen::for_course(
                    course,
                    ctx.catalog,
                ))))
            }
            _ => Ok(Action::Ignored),
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        HINTS
    }

    fn is_modal(&self) -> bool {
        self.removal.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ui::keys::press;
    use crate::ui::screens::StatusLevel;
    use crate::ui::screens::testing::{Harness, key};

    fn screen(harness: &Harness, id: &str) -> CourseDetailsScreen {
        CourseDetailsScreen::new(harness.catalog.course(&CourseId::from(id)).unwrap())
    }

    #[test]
    fn header_glyph_follows_the_store() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut details = screen(&harness, "2");
        let header = |text: String| {
            text.lines()
                .find(|line| line.contains("Digital Entrepreneurship"))
                .map(str::to_string)
                .unwrap()
        };
        assert!(header(harness.draw(&mut details)).contains("□"));

        details.handle_key(&key('b'), &ctx).unwrap();
        assert!(harness.is_bookmarked("2"));
        assert!(header(harness.draw(&mut details)).contains("■"));
    }

    #[test]
    fn removal_needs_confirmation() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut details = screen(&harness, "1");

        details.handle_key(&key('b'), &ctx).unwrap();
        assert!(details.is_modal());
        details.handle_key(&key('n'), &ctx).unwrap();
        assert!(harness.is_bookmarked("1"));

        details.handle_key(&key('b'), &ctx).unwrap();
        details.handle_key(&press(KeyCode::Enter), &ctx).unwrap();
        assert!(!harness.is_bookmarked("1"));
    }

    #[test]
    fn opens_unlocked_lessons_only() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut details = screen(&harness, "1");

        let action = details.handle_key(&press(KeyCode::Enter), &ctx).unwrap();
        assert!(matches!(action, Action::Push(screen) if screen.title().contains("Why Using 3D Design")));

        details.handle_key(&key('j'), &ctx).unwrap();
        let action = details.handle_key(&press(KeyCode::Enter), &ctx).unwrap();
        assert!(matches!(
            action,
            Action::Status(StatusLevel::Error, message) if message.contains("locked")
        ));
    }

    #[test]
    fn outline_lists_sections_and_lessons() {
        let harness = Harness::new();
        let mut details = screen(&harness, "2");
        let text = harness.draw(&mut details);
        assert!(text.contains("Section 2 - Business Planning · 50 mins"));
        assert!(text.contains("Market Research Basics"));
        assert!(text.contains("Jacob Kulikowski"));
    }

    #[test]
    fn instructor_shortcut_opens_profile() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut details = screen(&harness, "3");
        let action = details.handle_key(&key('m'), &ctx).unwrap();
        assert!(matches!(action, Action::Push(screen) if screen.title() == "Claire Ordonez"));
    }

    #[test]
    fn reviews_shortcut_opens_course_reviews() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut details = screen(&harness, "2");
        let action = details.handle_key(&key('r'), &ctx).unwrap();
        assert!(matches!(
            action,
            Action::Push(screen) if screen.title() == "Reviews: Digital Entrepreneurship"
        ));
    }
}
