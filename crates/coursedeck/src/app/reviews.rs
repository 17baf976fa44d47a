//! Course and mentor reviews: text search, sorting, and rating summaries.

use crate::domain::errors::DomainError;
use crate::domain::model::Review;

/// Ordering of the review list. `Recent` keeps the stored newest-first order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSort {
    #[default]
    Recent,
    Highest,
    Lowest,
}

impl ReviewSort {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "Recent",
            Self::Highest => "Highest",
            Self::Lowest => "Lowest",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Recent => Self::Highest,
            Self::Highest => Self::Lowest,
            Self::Lowest => Self::Recent,
        }
    }

    /// Stable sort, so equal ratings keep their recency order.
    pub fn apply(self, reviews: &mut [&Review]) {
        match self {
            Self::Recent => {}
            Self::Highest => reviews.sort_by(|a, b| b.rating.cmp(&a.rating)),
            Self::Lowest => reviews.sort_by(|a, b| a.rating.cmp(&b.rating)),
        }
    }
}

/// Mean rating, or `None` for an empty list.
pub fn average(reviews: &[&Review]) -> Option<f32> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
    Some(total as f32 / reviews.len() as f32)
}

/// Review count per star value, from 5 stars down to 1.
pub fn distribution(reviews: &[&Review]) -> [(u8, usize); 5] {
    [5, 4, 3, 2, 1].map(|stars| {
        let count = reviews
            .iter()
            .filter(|review| review.rating == stars)
            .count();
        (stars, count)
    })
}

/// Reviews for one course or mentor page plus the page's search and sort state.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    reviews: Vec<Review>,
    query: String,
    sort: ReviewSort,
    submitted: usize,
}

impl ReviewBoard {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            reviews,
            ..Self::default()
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    pub fn sort(&self) -> ReviewSort {
        self.sort
    }

    pub fn cycle_sort(&mut self) -> ReviewSort {
        self.sort = self.sort.next();
        self.sort
    }

    /// Case-insensitive match on reviewer name or text. A blank query matches everything.
    pub fn filtered(&self, query: &str) -> Vec<&Review> {
        let needle = query.trim().to_lowercase();
        self.reviews
            .iter()
            .filter(|review| {
                needle.is_empty()
                    || review.name.to_lowercase().contains(&needle)
                    || review.text.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Every review in the given order.
    pub fn sorted(&self, sort: ReviewSort) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self.reviews.iter().collect();
        sort.apply(&mut reviews);
        reviews
    }

    /// The list as displayed: current query, then current sort.
    pub fn visible(&self) -> Vec<&Review> {
        let mut reviews = self.filtered(&self.query);
        self.sort.apply(&mut reviews);
        reviews
    }

    /// Add the learner's own review at the top of the list.
    pub fn submit(&mut self, name: &str, rating: u8, text: &str) -> Result<Review, DomainError> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::InvalidRating(rating.to_string()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::EmptyReview);
        }
        self.submitted += 1;
        let review = Review {
            id: format!("mine-{}", self.submitted),
            name: name.to_string(),
            rating,
            date: "just now".into(),
            text: text.to_string(),
        };
        self.reviews.insert(0, review.clone());
        Ok(review)
    }
}

/// Parse a star rating typed by the user.
pub fn parse_rating(input: &str) -> Result<u8, DomainError> {
    match input.trim().parse::<u8>() {
        Ok(rating) if (1..=5).contains(&rating) => Ok(rating),
        _ => Err(DomainError::InvalidRating(input.trim().to_string())),
    }
}

/// Five-character star bar, e.g. `★★★★☆`.
pub fn stars(rating: f32) -> String {
    let filled = (rating.round().clamp(0.0, 5.0)) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
