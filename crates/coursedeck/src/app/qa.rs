//! Lesson Q&A threads.

use time::OffsetDateTime;

use crate::domain::model::{QaAnswer, QaItem};

const CURRENT_USER: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QaFilter {
    #[default]
    All,
    Answered,
    Unanswered,
}

impl QaFilter {
    pub fn next(self) -> Self {
        match self {
            QaFilter::All => QaFilter::Answered,
            QaFilter::Answered => QaFilter::Unanswered,
            QaFilter::Unanswered => QaFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QaFilter::All => "All",
            QaFilter::Answered => "Answered",
            QaFilter::Unanswered => "Unanswered",
        }
    }
}

/// Questions and answers for the current lesson. Kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct QaThread {
    items: Vec<QaItem>,
    sequence: u64,
}

impl QaThread {
    pub fn new(items: Vec<QaItem>) -> Self {
        Self { items, sequence: 0 }
    }

    /// Thread pre-populated with the sample discussion every lesson starts with.
    pub fn sample() -> Self {
        Self::new(vec![
            QaItem {
                id: "q1".into(),
                author: "John Doe".into(),
                question: "How does this technique apply to chronic conditions?".into(),
                posted: "2 days ago".into(),
                answers: vec![QaAnswer {
                    id: "a1".into(),
                    author: "Dr. Smith".into(),
                    text: "Great question! This technique has shown positive results for many \
                           chronic conditions. The key is consistency and proper form."
                        .into(),
                    posted: "1 day ago".into(),
                    instructor: true,
                }],
            },
            QaItem {
                id: "q2".into(),
                author: "Jane Brown".into(),
                question: "Is it necessary to complete all exercises in one session?".into(),
                posted: "3 days ago".into(),
                answers: Vec::new(),
            },
        ])
    }

    pub fn items(&self) -> &[QaItem] {
        &self.items
    }

    pub fn filtered(&self, filter: QaFilter) -> Vec<&QaItem> {
        self.items
            .iter()
            .filter(|item| match filter {
                QaFilter::All => true,
                QaFilter::Answered => item.is_answered(),
                QaFilter::Unanswered => !item.is_answered(),
            })
            .collect()
    }

    /// Post a question at the top of the thread. Blank text is ignored.
    pub fn ask(&mut self, text: &str) -> Option<&QaItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let item = QaItem {
            id: self.next_id('q'),
            author: CURRENT_USER.into(),
            question: text.to_string(),
            posted: "Just now".into(),
            answers: Vec::new(),
        };
        self.items.insert(0, item);
        self.items.first()
    }

    /// Append a reply to a question. Blank text or unknown questions are ignored.
    pub fn reply(&mut self, question_id: &str, text: &str) -> Option<&QaAnswer> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.next_id('a');
        let item = self.items.iter_mut().find(|item| item.id == question_id)?;
        item.answers.push(QaAnswer {
            id,
            author: CURRENT_USER.into(),
            text: text.to_string(),
            posted: "Just now".into(),
            instructor: false,
        });
        item.answers.last()
    }

    fn next_id(&mut self, prefix: char) -> String {
        self.sequence += 1;
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        format!("{prefix}{millis}-{}", self.sequence)
    }
}
