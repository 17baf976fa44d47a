//! Mentor profile: stats and the mentor's courses with bookmark controls.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::catalog::Catalog;
use crate::app::removal::RemovalFlow;
use crate::domain::model::{Course, Mentor};
use crate::ui::components::course_list::{CourseList, CourseListView, ListCursor};
use crate::ui::screens::course_details::CourseDetailsScreen;
use crate::ui::screens::reviews::ReviewsScreen;
use crate::ui::screens::{
    Action, Screen, ScreenContext, bookmark_pressed, removal_sheet_key, render_removal_sheet,
};

const HINTS: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("b", "bookmark"),
    ("↵", "details"),
    ("r", "reviews"),
    ("esc", "back"),
];

pub struct MentorProfileScreen {
    mentor_id: String,
    name: String,
    list: ListCursor,
    removal: RemovalFlow,
}

impl MentorProfileScreen {
    pub fn new(mentor: &Mentor) -> Self {
        Self {
            mentor_id: mentor.id.clone(),
            name: mentor.name.clone(),
            list: ListCursor::default(),
            removal: RemovalFlow::new(),
        }
    }

    fn selected<'a>(&mut self, catalog: &'a Catalog) -> Option<&'a Course> {
        let courses = catalog.courses_by(&self.mentor_id);
        let index = self.list.clamp(courses.len());
        courses.get(index).copied()
    }
}

fn stat(value: u32, label: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {label}   ")),
    ]
}

impl Screen for MentorProfileScreen {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        ctx: &ScreenContext<'_>,
        snapshot: &BookmarkSnapshot,
    ) {
        let Some(mentor) = ctx.catalog.mentor(&self.mentor_id) else {
            frame.render_widget(Paragraph::new("Mentor not found"), area);
            return;
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(5)])
            .split(area);

        let mut stats = stat(mentor.courses, "Courses");
        stats.extend(stat(mentor.students, "Students"));
        stats.extend(stat(mentor.reviews, "Reviews"));
        let header = vec![
            Line::styled(
                mentor.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(mentor.role.clone(), Style::default().fg(Color::Gray)),
            Line::from(stats),
        ];
        let block = Block::default()
            .title("Mentor")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(header).block(block), layout[0]);

        let courses = ctx.catalog.courses_by(&self.mentor_id);
        let selected = self.list.clamp(courses.len());
        let view = CourseListView {
            title: "Courses",
            courses: &courses,
            selected,
            empty_message: "No courses published yet",
        };
        CourseList.render(frame, layout[1], view, snapshot);

        render_removal_sheet(&self.removal, frame, area, ctx);
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &ScreenContext<'_>) -> Result<Action> {
        if self.removal.is_visible() {
            return removal_sheet_key(&mut self.removal, ctx, key);
        }

        let keymap = ctx.keymap;
        if keymap.is_bookmark(key) {
            return match self.selected(ctx.catalog) {
                Some(course) => bookmark_pressed(&mut self.removal, ctx, &course.id),
                None => Ok(Action::None),
            };
        }
        if keymap.is_up(key) {
            self.list.up();
            return Ok(Action::None);
        }
        if keymap.is_down(key) {
            let len = ctx.catalog.courses_by(&self.mentor_id).len();
            self.list.down(len);
            return Ok(Action::None);
        }

        match key.code {
            KeyCode::Enter => Ok(match self.selected(ctx.catalog) {
                Some(course) => Action::Push(Box::new(CourseDetailsScreen::new(course))),
                None => Action::None,
            }),
            KeyCode::Char('r') => Ok(match ctx.catalog.mentor(&self.mentor_id) {
                Some(mentor) => Action::Push(Box::new(ReviewsScreen::for_mentor(mentor, ctx.catalog))),
                None => Action::info("Mentor not found"),
            }),
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
    use crate::ui::screens::testing::{Harness, key};

    fn jacob(harness: &Harness) -> MentorProfileScreen {
        MentorProfileScreen::new(harness.catalog.mentor("1").unwrap())
    }

    #[test]
    fn shows_stats_and_courses() {
        let harness = Harness::new();
        let mut profile = jacob(&harness);
        let text = harness.draw(&mut profile);
        assert!(text.contains("Jacob Kulikowski"));
        assert!(text.contains("Marketing Analyst"));
        assert!(text.contains("22379 Students"));
        assert!(text.contains("3D Design Illustration"));
        assert!(text.contains("Digital Entrepreneurship"));
        assert!(!text.contains("Intro to UI/UX Design"));
    }

    #[test]
    fn bookmark_controls_share_the_store() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut profile = jacob(&harness);

        profile.handle_key(&key('j'), &ctx).unwrap();
        profile.handle_key(&key('b'), &ctx).unwrap();
        assert!(harness.is_bookmarked("2"));

        profile.handle_key(&key('k'), &ctx).unwrap();
        profile.handle_key(&key('b'), &ctx).unwrap();
        assert!(profile.is_modal());
        profile.handle_key(&key('y'), &ctx).unwrap();
        assert!(!harness.is_bookmarked("1"));
    }

    #[test]
    fn enter_opens_course_details() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut profile = jacob(&harness);
        let action = profile.handle_key(&press(KeyCode::Enter), &ctx).unwrap();
        assert!(matches!(action, Action::Push(screen) if screen.title() == "3D Design Illustration"));
    }

    #[test]
    fn reviews_shortcut_opens_mentor_reviews() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut profile = jacob(&harness);
        let action = profile.handle_key(&key('r'), &ctx).unwrap();
        assert!(matches!(action, Action::Push(screen) if screen.title() == "Reviews: Jacob Kulikowski"));
    }
}
