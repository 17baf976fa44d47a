//! Reviews for a course or mentor: rating summary, search, sort, and writing a review.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::catalog::Catalog;
use crate::app::reviews::{ReviewBoard, average, distribution, parse_rating, stars};
use crate::domain::model::{Course, Mentor, Review};
use crate::ui::components::course_list::ListCursor;
use crate::ui::components::prompt::{PromptPurpose, PromptRequest};
use crate::ui::screens::{Action, Screen, ScreenContext, StatusLevel, domain_error_as_status};

const HINTS: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("s", "sort"),
    ("/", "search"),
    ("x", "clear search"),
    ("w", "write review"),
    ("esc", "back"),
];

const BAR_WIDTH: usize = 20;
const REVIEWER_NAME: &str = "You";

pub struct ReviewsScreen {
    subject: String,
    board: ReviewBoard,
    list: ListCursor,
}

impl ReviewsScreen {
    pub fn for_course(course: &Course, catalog: &Catalog) -> Self {
        Self::new(&course.title, catalog.course_reviews().to_vec())
    }

    pub fn for_mentor(mentor: &Mentor, catalog: &Catalog) -> Self {
        Self::new(&mentor.name, catalog.mentor_reviews().to_vec())
    }

    fn new(subject: &str, reviews: Vec<Review>) -> Self {
        Self {
            subject: subject.to_string(),
            board: ReviewBoard::new(reviews),
            list: ListCursor::default(),
        }
    }

    pub fn board(&self) -> &ReviewBoard {
        &self.board
    }

    fn render_summary(frame: &mut Frame<'_>, area: Rect, reviews: &[&Review]) {
        let mut lines = match average(reviews) {
            Some(avg) => vec![
                Line::from(vec![
                    Span::styled(
                        format!("{avg:.1} "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(stars(avg), Style::default().fg(Color::Yellow)),
                ]),
                Line::styled(
                    format!("Based on {} reviews", reviews.len()),
                    Style::default().fg(Color::Gray),
                ),
            ],
            None => vec![
                Line::styled("No ratings", Style::default().fg(Color::Gray)),
                Line::default(),
            ],
        };

        let total = reviews.len().max(1);
        for (stars, count) in distribution(reviews) {
            let filled = count * BAR_WIDTH / total;
            lines.push(Line::from(vec![
                Span::raw(format!("{stars} ★ ")),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Yellow)),
                Span::styled(
                    "░".repeat(BAR_WIDTH - filled),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(" {count}")),
            ]));
        }

        let block = Block::default()
            .title("Rating")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn review_item(review: &Review) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                stars(f32::from(review.rating)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" {}", review.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {}", review.date),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(format!("  {}", review.text)),
    ])
}

impl Screen for ReviewsScreen {
    fn title(&self) -> String {
        format!("Reviews: {}", self.subject)
    }

    fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        _ctx: &ScreenContext<'_>,
        _snapshot: &BookmarkSnapshot,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(area);

        let visible = self.board.visible();
        Self::render_summary(frame, layout[0], &visible);

        let query = if self.board.query().is_empty() {
            "none".to_string()
        } else {
            format!("\"{}\"", self.board.query())
        };
        frame.render_widget(
            Paragraph::new(format!(
                "Sort: {} · Search: {query}",
                self.board.sort().label()
            ))
            .style(Style::default().fg(Color::Gray)),
            layout[1],
        );

        let block = Block::default().title("Reviews").borders(Borders::ALL);
        if visible.is_empty() {
            frame.render_widget(
                Paragraph::new("No reviews match your search")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                layout[2],
            );
            return;
        }

        let selected = self.list.clamp(visible.len());
        let items: Vec<ListItem> = visible.iter().map(|review| review_item(review)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, layout[2], &mut state);
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &ScreenContext<'_>) -> Result<Action> {
        let keymap = ctx.keymap;
        if keymap.is_up(key) {
            self.list.up();
            return Ok(Action::None);
        }
        if keymap.is_down(key) {
            self.list.down(self.board.visible().len());
            return Ok(Action::None);
        }

        Ok(match key.code {
            KeyCode::Char('s') => {
                self.board.cycle_sort();
                self.list.reset();
                Action::None
            }
            KeyCode::Char('/') => Action::Prompt(
                PromptRequest::new(PromptPurpose::ReviewSearch, "Search reviews")
                    .with_initial(self.board.query()),
            ),
            KeyCode::Char('x') => {
                self.board.set_query("");
                self.list.reset();
                Action::None
            }
            KeyCode::Char('w') => Action::Prompt(PromptRequest::new(
                PromptPurpose::ReviewRating,
                "Rating (1-5)",
            )),
            _ => Action::Ignored,
        })
    }

    fn on_prompt(
        &mut self,
        purpose: PromptPurpose,
        input: String,
        _ctx: &ScreenContext<'_>,
    ) -> Result<Action> {
        let result = match purpose {
            PromptPurpose::ReviewSearch => {
                self.board.set_query(&input);
                self.list.reset();
                Ok(Action::None)
            }
            PromptPurpose::ReviewRating => parse_rating(&input)
                .map(|rating| {
                    Action::Prompt(PromptRequest::new(
                        PromptPurpose::ReviewText { rating },
                        format!("Review ({rating}★)"),
                    ))
                })
                .map_err(Into::into),
            PromptPurpose::ReviewText { rating } => self
                .board
                .submit(REVIEWER_NAME, rating, &input)
                .map(|_| {
                    self.list.reset();
                    Action::Status(StatusLevel::Success, "Review posted".into())
                })
                .map_err(Into::into),
            _ => Ok(Action::Ignored),
        };
        domain_error_as_status(result)
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        HINTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::CourseId;
    use crate::ui::screens::testing::{Harness, key};

    fn course_reviews(harness: &Harness) -> ReviewsScreen {
        let course = harness.catalog.course(&CourseId::from("1")).unwrap();
        ReviewsScreen::for_course(course, &harness.catalog)
    }

    fn answer(screen: &mut ReviewsScreen, harness: &Harness, action: Action, input: &str) -> Action {
        let Action::Prompt(request) = action else {
            panic!("expected a prompt, got {action:?}");
        };
        screen
            .on_prompt(request.purpose, input.to_string(), &harness.ctx())
            .unwrap()
    }

    #[test]
    fn shows_summary_and_distribution() {
        let harness = Harness::new();
        let mut screen = course_reviews(&harness);
        assert_eq!(screen.title(), "Reviews: 3D Design Illustration");

        let text = harness.draw(&mut screen);
        assert!(text.contains("★★★★☆"));
        assert!(text.contains("Based on 4 reviews"));
        assert!(text.contains("Jenny Wilson · 2 days ago"));
        assert!(text.contains("Sort: Recent · Search: none"));
        let five_stars = text.lines().find(|line| line.contains("5 ★ ")).unwrap();
        assert!(five_stars.contains("░ 2"));
    }

    #[test]
    fn sort_and_search_reshape_the_list() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = course_reviews(&harness);

        screen.handle_key(&key('s'), &ctx).unwrap();
        screen.handle_key(&key('s'), &ctx).unwrap();
        assert_eq!(screen.board().visible()[0].name, "Esther Howard");

        let action = screen.handle_key(&key('/'), &ctx).unwrap();
        answer(&mut screen, &harness, action, "guy");
        let text = harness.draw(&mut screen);
        assert!(text.contains("Search: \"guy\""));
        assert!(text.contains("Guy Hawkins"));
        assert!(!text.contains("Jenny Wilson"));
        assert!(text.contains("Based on 1 reviews"));

        screen.handle_key(&key('x'), &ctx).unwrap();
        assert_eq!(screen.board().visible().len(), 4);
    }

    #[test]
    fn empty_search_result_has_no_average() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = course_reviews(&harness);
        let action = screen.handle_key(&key('/'), &ctx).unwrap();
        answer(&mut screen, &harness, action, "cooking");

        let text = harness.draw(&mut screen);
        assert!(text.contains("No ratings"));
        assert!(text.contains("No reviews match your search"));
    }

    #[test]
    fn writing_a_review_takes_rating_then_text() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = course_reviews(&harness);

        let action = screen.handle_key(&key('w'), &ctx).unwrap();
        let action = answer(&mut screen, &harness, action, "4");
        let action = answer(&mut screen, &harness, action, "Clear and practical");
        assert!(matches!(action, Action::Status(StatusLevel::Success, _)));
        assert_eq!(screen.board().reviews()[0].name, "You");
        assert_eq!(screen.board().reviews()[0].rating, 4);
        assert!(harness.draw(&mut screen).contains("Based on 5 reviews"));
    }

    #[test]
    fn bad_rating_is_reported() {
        let harness = Harness::new();
        let ctx = harness.ctx();
        let mut screen = course_reviews(&harness);

        let action = screen.handle_key(&key('w'), &ctx).unwrap();
        let action = answer(&mut screen, &harness, action, "9");
        assert!(matches!(
            action,
            Action::Status(StatusLevel::Error, message) if message.contains("between 1 and 5")
        ));
        assert_eq!(screen.board().reviews().len(), 4);
    }

    #[test]
    fn mentor_reviews_use_the_mentor_sample() {
        let harness = Harness::new();
        let mentor = harness.catalog.mentor("1").unwrap();
        let mut screen = ReviewsScreen::for_mentor(mentor, &harness.catalog);
        assert_eq!(screen.title(), "Reviews: Jacob Kulikowski");
        assert!(harness.draw(&mut screen).contains("Tran Nghia"));
    }
}
