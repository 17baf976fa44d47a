//! Horizontal category chips shown above course lists.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Tabs};

use crate::domain::model::Category;

/// Index into the catalog's category list. Wraps at both ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCursor {
    index: usize,
}

impl CategoryCursor {
    /// Start on the category with `id`, or the first category when it is unknown.
    pub fn starting_at(categories: &[Category], id: &str) -> Self {
        let index = categories
            .iter()
            .position(|category| category.id == id)
            .unwrap_or(0);
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        categories.get(self.index)
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn previous(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + len - 1) % len;
        }
    }
}

#[derive(Debug, Default)]
pub struct CategoryBar;

impl CategoryBar {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        categories: &[Category],
        cursor: CategoryCursor,
    ) {
        let titles: Vec<String> = categories.iter().map(Category::display).collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().title("Categories").borders(Borders::ALL))
            .select(cursor.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::app::catalog::Catalog;

    #[test]
    fn cursor_wraps_both_ways() {
        let catalog = Catalog::builtin().unwrap();
        let len = catalog.categories().len();
        let mut cursor = CategoryCursor::starting_at(catalog.categories(), "all");
        assert_eq!(cursor.index(), 0);

        cursor.previous(len);
        assert_eq!(cursor.index(), len - 1);
        cursor.next(len);
        assert_eq!(cursor.current(catalog.categories()).unwrap().id, "all");
    }

    #[test]
    fn unknown_start_falls_back_to_first() {
        let catalog = Catalog::builtin().unwrap();
        let cursor = CategoryCursor::starting_at(catalog.categories(), "astronomy");
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn renders_category_labels() {
        let catalog = Catalog::builtin().unwrap();
        let cursor = CategoryCursor::starting_at(catalog.categories(), "business");
        let mut terminal = Terminal::new(TestBackend::new(120, 3)).unwrap();
        terminal
            .draw(|frame| CategoryBar.render(frame, frame.size(), catalog.categories(), cursor))
            .unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Business"));
        assert!(rendered.contains("3D Design"));
    }
}
