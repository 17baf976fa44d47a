//! Home: category chips, the course list, and top mentors.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::catalog::Catalog;
use crate::app::removal::RemovalFlow;
use crate::domain::model::{Category, Course};
use crate::ui::components::category_bar::{CategoryBar, CategoryCursor};
use crate::ui::components::course_list::{CourseList, CourseListView, ListCursor};
use crate::ui::screens::bookmarks::BookmarksScreen;
use crate::ui::screens::course_details::CourseDetailsScreen;
use crate::ui::screens::mentor_profile::MentorProfileScreen;
use crate::ui::screens::{
    Action, Screen, ScreenContext, bookmark_pressed, removal_sheet_key, render_removal_sheet,
};

const HINTS: &[(&str, &str)] = &[
    ("h/l", "category"),
    ("j/k", "move"),
    ("b", "bookmark"),
    ("↵", "details"),
    ("m", "mentor"),
    ("B", "bookmarks"),
    (":", "command"),
];

pub struct HomeScreen {
    category: CategoryCursor,
    list: ListCursor,
    search: Option<String>,
    removal: RemovalFlow,
}

impl HomeScreen {
    pub fn new(catalog: &Catalog, category_id: &str) -> Self {
        Self {
            category: CategoryCursor::starting_at(catalog.categories(), category_id),
            list: ListCursor::default(),
            search: None,
            removal: RemovalFlow::new(),
        }
    }

    /// Home narrowed to courses matching `query`.
    pub fn with_search(catalog: &Catalog, category_id: &str, query: &str) -> Self {
        let mut screen = Self::new(catalog, category_id);
        let query = query.trim();
        if !query.is_empty() {
            screen.search = Some(query.to_string());
        }
        screen
    }

    fn courses<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Course> {
        let category = self.category.current(catalog.categories());
        match &self.search {
            Some(query) => catalog
                .search(query)
                .into_iter()
                .filter(|course| category.is_none_or(|category| category.matches(&course.category)))
                .collect(),
            None => catalog.courses_in(category),
        }
    }

    fn selected<'a>(&mut self, catalog: &'a Catalog) -> Option<&'a Course> {
        let courses = self.courses(catalog);
        let index = self.list.clamp(courses.len());
        courses.get(index).copied()
    }
}

impl Screen for HomeScreen {
    fn title(&self) -> String {
        match &self.search {
            Some(query) => format!("Search: {query}"),
            None => "Home".into(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        ctx: &ScreenContext<'_>,
        snapshot: &BookmarkSnapshot,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(area);

        let categories = ctx.catalog.categories();
        CategoryBar.render(frame, layout[0], categories, self.category);

        let courses = self.courses(ctx.catalog);
        let selected = self.list.clamp(courses.len());
        let title = match &self.search {
            Some(query) => format!("Results for \"{query}\""),
            None => "Popular Courses".to_string(),
        };
        let view = CourseListView {
            title: &title,
            courses: &courses,
            selected,
            empty_message: "No courses in this category",
        };
        CourseList.render(frame, layout[1], view, snapshot);

        let mut mentors = vec![Span::styled(
            "Top Mentors: ",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for (idx, mentor) in ctx.catalog.mentors().iter().enumerate() {
            if idx > 0 {
                mentors.push(Span::raw(" · "));
            }
            mentors.push(Span::styled(
                mentor.name.clone(),
                Style::default().fg(Color::Cyan),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(mentors)), layout[2]);

        render_removal_sheet(&self.removal, frame, area, ctx);
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &ScreenContext<'_>) -> Result<Action> {
        if self.removal.is_visible() {
            return removal_sheet_key(&mut self.removal, ctx, key);
        }

        let keymap = ctx.keymap;
        let categories = ctx.catalog.categories().len();
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
            let len = self.courses(ctx.catalog).len();
            self.list.down(len);
            return Ok(Action::None);
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.category.previous(categories);
                self.list.reset();
                Ok(Action::None)
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.category.next(categories);
                self.list.reset();
                Ok(Action::None)
            }
            KeyCode::Enter => Ok(match self.selected(ctx.catalog) {
                Some(course) => Action::Push(Box::new(CourseDetailsScreen::new(course))),
                None => Action::None,
            }),
            KeyCode::Char('m') => {
                let mentor = self
                    .selected(ctx.catalog)
                    .and_then(|course| ctx.catalog.mentor(&course.instructor))
                    .or_else(|| ctx.catalog.mentors().first());
                Ok(match mentor {
                    Some(mentor) => Action::Push(Box::new(MentorProfileScreen::new(mentor))),
                    None => Action::info("No mentors in the catalog"),
                })
            }
            KeyCode::Char('B') => {
                let category = self
                    .category
                    .current(ctx.catalog.categories())
                    .map(|category| category.id.clone())
                    .unwrap_or_else(|| Category::ALL.to_string());
                Ok(Action::Push(Box::new(BookmarksScreen::new(
                    ctx.catalog,
                    &category,
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
