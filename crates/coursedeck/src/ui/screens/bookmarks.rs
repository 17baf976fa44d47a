//! Bookmarks: the bookmarked courses, filtered by category and re-derived every frame.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::catalog::Catalog;
use crate::app::removal::RemovalFlow;
use crate::app::selectors::BookmarkedView;
use crate::domain::model::CourseId;
use crate::ui::components::category_bar::{CategoryBar, CategoryCursor};
use crate::ui::components::course_list::{CourseList, CourseListView, ListCursor};
use crate::ui::screens::course_details::CourseDetailsScreen;
use crate::ui::screens::{
    Action, Screen, ScreenContext, bookmark_pressed, removal_sheet_key, render_removal_sheet,
};

const HINTS: &[(&str, &str)] = &[
    ("h/l", "category"),
    ("j/k", "move"),
    ("b", "remove"),
    ("↵", "details"),
    ("esc", "back"),
];

pub struct BookmarksScreen {
    category: CategoryCursor,
    list: ListCursor,
    view: BookmarkedView,
    removal: RemovalFlow,
}

impl BookmarksScreen {
    pub fn new(catalog: &Catalog, category_id: &str) -> Self {
        Self {
            category: CategoryCursor::starting_at(catalog.categories(), category_id),
            list: ListCursor::default(),
            view: BookmarkedView::new(),
            removal: RemovalFlow::new(),
        }
    }

    fn visible_ids(&mut self, catalog: &Catalog, snapshot: &BookmarkSnapshot) -> Vec<CourseId> {
        let category = self.category.current(catalog.categories());
        self.view
            .resolve(catalog, snapshot, category)
            .into_iter()
            .map(|course| course.id.clone())
            .collect()
    }

    fn selected_id(&mut self, ctx: &ScreenContext<'_>) -> Result<Option<CourseId>> {
        let snapshot = ctx.bookmarks.snapshot()?;
        let ids = self.visible_ids(ctx.catalog, &snapshot);
        let index = self.list.clamp(ids.len());
        Ok(ids.into_iter().nth(index))
    }
}

impl Screen for BookmarksScreen {
    fn title(&self) -> String {
        "Bookmarks".into()
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
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let categories = ctx.catalog.categories();
        CategoryBar.render(frame, layout[0], categories, self.category);

        let category = self.category.current(categories);
        let courses = self.view.resolve(ctx.catalog, snapshot, category);
        let selected = self.list.clamp(courses.len());
        let view = CourseListView {
            title: "My Bookmarks",
            courses: &courses,
            selected,
            empty_message: "No bookmarked courses here yet",
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
            return match self.selected_id(ctx)? {
                Some(id) => bookmark_pressed(&mut self.removal, ctx, &id),
                None => Ok(Action::None),
            };
        }
        if keymap.is_up(key) {
            self.list.up();
            return Ok(Action::None);
        }
        if keymap.is_down(key) {
            let snapshot = ctx.bookmarks.snapshot()?;
            let len = self.visible_ids(ctx.catalog, &snapshot).len();
            self.list.down(len);
            return Ok(Action::None);
        }

        let categories = ctx.catalog.categories().len();
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
            KeyCode::Enter => {
                let selected = self.selected_id(ctx)?;
                Ok(match selected.and_then(|id| ctx.catalog.course(&id)) {
                    Some(course) => Action::Push(Box::new(CourseDetailsScreen::new(course))),
                    None => Action::None,
                })
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
    use crate::ui::screens::testing::{Harness, key};

    #[test]
    fn lists_seeded_bookmarks() {
        let harness = Harness::new();
        let mut screen = BookmarksScreen::new(&harness.catalog, "all");
        let text = harness.draw(&mut screen);
        assert!(text.contains("3D Design Illustration"));
        assert!(text.contains("Intro to UI/UX Design"));
        assert!(!text.contains("Digital Entrepreneurship"));
    }

    #[test]
    fn bookmark_key_always_confirms() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = BookmarksScreen::new(&harness.catalog, "all");

        screen.handle_key(&key('b'), &ctx).unwrap();
        assert!(screen.is_modal());
        assert!(harness.is_bookmarked("1"));

        screen.handle_key(&key('y'), &ctx).unwrap();
        assert!(!screen.is_modal());
        assert!(!harness.is_bookmarked("1"));

        let text = harness.draw(&mut screen);
        assert!(!text.contains("3D Design Illustration"));
        assert!(text.contains("Intro to UI/UX Design"));
    }

    #[test]
    fn cancel_leaves_the_list_untouched() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = BookmarksScreen::new(&harness.catalog, "all");

        screen.handle_key(&key('j'), &ctx).unwrap();
        screen.handle_key(&key('b'), &ctx).unwrap();
        screen.handle_key(&key('c'), &ctx).unwrap();
        assert!(harness.is_bookmarked("3"));
        assert!(harness.draw(&mut screen).contains("Intro to UI/UX Design"));
    }

    #[test]
    fn picks_up_changes_made_elsewhere() {
        let harness = Harness::new();
        let mut screen = BookmarksScreen::new(&harness.catalog, "all");
        assert!(!harness.draw(&mut screen).contains("Digital Entrepreneurship"));

        harness.handle.toggle(&CourseId::from("2")).unwrap();
        assert!(harness.draw(&mut screen).contains("Digital Entrepreneurship"));
    }

    #[test]
    fn selection_clamps_when_the_last_row_disappears() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = BookmarksScreen::new(&harness.catalog, "all");

        screen.handle_key(&key('j'), &ctx).unwrap();
        screen.handle_key(&key('b'), &ctx).unwrap();
        screen.handle_key(&press(KeyCode::Enter), &ctx).unwrap();
        assert!(!harness.is_bookmarked("3"));

        let action = screen.handle_key(&press(KeyCode::Enter), &ctx).unwrap();
        assert!(matches!(action, Action::Push(screen) if screen.title() == "3D Design Illustration"));
    }
}
