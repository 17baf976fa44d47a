//! Bottom confirmation sheet, used for bookmark removal and note deletion.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::ui::keys::Keymap;

/// What the user chose while the sheet was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetAction {
    /// Cancel, `on_close`.
    Close,
    /// Accept, `on_confirm`.
    Confirm,
}

/// A modal yes/cancel sheet. The caller owns visibility; the sheet only renders and maps keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmSheet {
    title: String,
    body: String,
    confirm_label: String,
}

impl ConfirmSheet {
    /// The "Remove from Bookmark?" sheet shown before a course leaves the bookmarks.
    pub fn remove_bookmark(course_title: &str) -> Self {
        Self {
            title: "Remove from Bookmark?".into(),
            body: format!("\"{course_title}\" will be removed from your bookmarks."),
            confirm_label: "Yes, Remove".into(),
        }
    }

    pub fn delete_note(note_title: &str) -> Self {
        Self {
            title: "Delete Note?".into(),
            body: format!("\"{note_title}\" will be deleted from this lesson."),
            confirm_label: "Yes, Delete".into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Map a key press while the sheet is visible. Unrelated keys return `None` and are swallowed
    /// by the caller so nothing underneath reacts.
    pub fn handle_key(key: &KeyEvent, keymap: &Keymap) -> Option<SheetAction> {
        if keymap.is_confirm(key) {
            Some(SheetAction::Confirm)
        } else if keymap.is_cancel(key) {
            Some(SheetAction::Close)
        } else {
            None
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, visible: bool, keymap: &Keymap) {
        if !visible {
            return;
        }

        let width = area.width.saturating_sub(4).min(64);
        let height = 7.min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(height),
            width,
            height,
        };
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(self.title.as_str())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let key_style = Style::default().fg(Color::Cyan);
        let lines = vec![
            Line::from(self.body.clone()),
            Line::default(),
            Line::from(vec![
                Span::styled(format!("[{}]", keymap.cancel_label()), key_style),
                Span::raw(" Cancel    "),
                Span::styled(format!("[{}]", keymap.confirm_label()), key_style),
                Span::styled(
                    format!(" {}", self.confirm_label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crossterm::event::KeyCode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::infra::config::Keybindings;
    use crate::ui::keys::press;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn maps_confirm_and_cancel_keys() {
        let keymap = Keymap::default();
        for code in [KeyCode::Char('y'), KeyCode::Enter] {
            assert_eq!(
                ConfirmSheet::handle_key(&press(code), &keymap),
                Some(SheetAction::Confirm)
            );
        }
        for code in [KeyCode::Char('n'), KeyCode::Char('c'), KeyCode::Esc] {
            assert_eq!(
                ConfirmSheet::handle_key(&press(code), &keymap),
                Some(SheetAction::Close)
            );
        }
        assert_eq!(ConfirmSheet::handle_key(&press(KeyCode::Char('j')), &keymap), None);
    }

    #[test]
    fn renders_only_when_visible() {
        let sheet = ConfirmSheet::remove_bookmark("3D Design Illustration");
        let keymap = Keymap::default();
        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();

        terminal
            .draw(|frame| sheet.render(frame, frame.size(), false, &keymap))
            .unwrap();
        assert!(!screen_text(&terminal).contains("Remove from Bookmark?"));

        terminal
            .draw(|frame| sheet.render(frame, frame.size(), true, &keymap))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Remove from Bookmark?"));
        assert!(text.contains("[n] Cancel"));
        assert!(text.contains("[y] Yes, Remove"));
    }

    #[test]
    fn button_labels_follow_configured_keys() {
        let bindings = Keybindings {
            confirm: "ctrl+d".into(),
            cancel: "x".into(),
            ..Keybindings::default()
        };
        let keymap = Keymap::from_config(&bindings).unwrap();
        let sheet = ConfirmSheet::delete_note("Lighting");
        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal
            .draw(|frame| sheet.render(frame, frame.size(), true, &keymap))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("[x] Cancel"));
        assert!(text.contains("[ctrl+d] Yes, Delete"));
        assert!(!text.contains("[y]"));
    }
}
