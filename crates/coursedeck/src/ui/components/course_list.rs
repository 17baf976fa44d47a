//! Course list rows with bookmark indicators.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::domain::model::Course;

pub const BOOKMARKED_GLYPH: &str = "■";
pub const NOT_BOOKMARKED_GLYPH: &str = "□";

pub fn bookmark_glyph(bookmarked: bool) -> &'static str {
    if bookmarked {
        BOOKMARKED_GLYPH
    } else {
        NOT_BOOKMARKED_GLYPH
    }
}

/// Price, followed by the original price when discounted.
pub fn price_label(course: &Course) -> String {
    match course.original_price {
        Some(original) if original > course.price => format!("${} (was ${original})", course.price),
        _ => format!("${}", course.price),
    }
}

/// Cursor over a list whose length may change between frames.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    selected: usize,
}

impl ListCursor {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Keep the cursor inside `len` items after the list shrinks.
    pub fn clamp(&mut self, len: usize) -> usize {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.selected
    }
}

/// What a course list shows in one frame.
#[derive(Debug, Clone, Copy)]
pub struct CourseListView<'a> {
    pub title: &'a str,
    pub courses: &'a [&'a Course],
    pub selected: usize,
    pub empty_message: &'a str,
}

/// Renders courses as selectable rows: glyph, title, category, price, rating, students.
#[derive(Debug, Default)]
pub struct CourseList;

impl CourseList {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        view: CourseListView<'_>,
        snapshot: &BookmarkSnapshot,
    ) {
        let CourseListView {
            title,
            courses,
            selected,
            empty_message,
        } = view;
        let block = Block::default()
            .title(format!("{title} ({})", courses.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if courses.is_empty() {
            let placeholder = Paragraph::new(empty_message.to_string())
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let items: Vec<ListItem> = courses
            .iter()
            .map(|course| ListItem::new(course_line(course, snapshot.contains(&course.id))))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        state.select(Some(selected.min(courses.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

pub fn course_line(course: &Course, bookmarked: bool) -> Line<'static> {
    let glyph_style = if bookmarked {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(format!("{} ", bookmark_glyph(bookmarked)), glyph_style),
        Span::styled(
            course.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", course.category),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(format!("  {}", price_label(course))),
        Span::styled(
            format!("  ★ {:.1}", course.rating),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  {} students", course.students),
            Style::default().fg(Color::Gray),
        ),
    ])
}
