use std::sync::Arc;

use coursedeck::app::catalog::Catalog;
use coursedeck::infra::config::Config;
use coursedeck::infra::kv::MemoryStore;
use coursedeck::ui::app::UiApp;
use coursedeck::ui::keys::press;
use crossterm::event::KeyCode;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn app() -> UiApp {
    let catalog = Catalog::builtin().expect("builtin catalog");
    UiApp::new(Config::default(), catalog, Arc::new(MemoryStore::new())).expect("app starts")
}

fn send(app: &mut UiApp, keys: &[KeyCode]) {
    for code in keys {
        app.handle_key(press(*code)).expect("key handled");
    }
}

fn screen(app: &mut UiApp) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 32)).expect("test terminal");
    app.draw(&mut terminal).expect("frame drawn");
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn removal_from_details_is_visible_everywhere() {
    let mut app = app();
    send(&mut app, &[KeyCode::Enter]);
    assert_eq!(app.screen_titles(), vec!["Home", "3D Design Illustration"]);

    send(&mut app, &[KeyCode::Char('b')]);
    let frame = screen(&mut app);
    assert!(frame.contains("Remove from Bookmark?"));
    assert!(frame.contains("Yes, Remove"));

    send(&mut app, &[KeyCode::Char('y')]);
    assert!(!app.is_bookmarked("1").expect("provider alive"));
    assert!(!screen(&mut app).contains("Remove from Bookmark?"));

    send(&mut app, &[KeyCode::Esc]);
    assert_eq!(app.screen_titles(), vec!["Home"]);
    assert!(screen(&mut app).contains("1 bookmarked"));

    send(&mut app, &[KeyCode::Char('B')]);
    let frame = screen(&mut app);
    assert!(frame.contains("Intro to UI/UX Design"));
    assert!(!frame.contains("3D Design Illustration"));
}

#[test]
fn cancelled_removal_keeps_the_bookmark() {
    let mut app = app();
    send(&mut app, &[KeyCode::Char('b'), KeyCode::Char('n')]);
    assert!(app.is_bookmarked("1").expect("provider alive"));
    assert!(!screen(&mut app).contains("Remove from Bookmark?"));

    app.tick();
    assert_eq!(app.status_text(), None);
}

#[test]
fn adding_needs_no_confirmation() {
    let mut app = app();
    send(&mut app, &[KeyCode::Char('j'), KeyCode::Char('b')]);
    assert!(app.is_bookmarked("2").expect("provider alive"));
    assert!(screen(&mut app).contains("3 bookmarked"));
}
