//! Plain-text course listing for the `courses` subcommand.

use anyhow::{Result, bail};

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::catalog::Catalog;
use crate::app::selectors::bookmarked_courses;
use crate::domain::model::Course;
use crate::ui::components::course_list::bookmark_glyph;

/// Filters accepted by `coursedeck courses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseQuery {
    pub category: Option<String>,
    pub bookmarked_only: bool,
    pub search: Option<String>,
}

/// Apply `query` to the catalog. An unknown category id is an error.
pub fn select_courses<'a>(
    catalog: &'a Catalog,
    snapshot: &BookmarkSnapshot,
    query: &CourseQuery,
) -> Result<Vec<&'a Course>> {
    let category = match query.category.as_deref() {
        Some(id) => match catalog.category(id) {
            Some(category) => Some(category),
            None => bail!("unknown category '{id}'"),
        },
        None => None,
    };

    let mut courses = if query.bookmarked_only {
        bookmarked_courses(catalog, snapshot, category)
    } else {
        catalog.courses_in(category)
    };

    if let Some(needle) = query.search.as_deref() {
        let hits: Vec<&Course> = catalog.search(needle);
        courses.retain(|course| hits.iter().any(|hit| hit.id == course.id));
    }
    Ok(courses)
}

/// Render courses as an aligned table followed by a one-line summary.
pub fn render_table(courses: &[&Course], snapshot: &BookmarkSnapshot) -> String {
    if courses.is_empty() {
        return "No courses match.\n".to_string();
    }

    let rows: Vec<[String; 6]> = courses
        .iter()
        .map(|course| {
            [
                bookmark_glyph(snapshot.contains(&course.id)).to_string(),
                course.id.to_string(),
                course.title.clone(),
                course.category.clone(),
                format!("${}", course.price),
                format!("{:.1}", course.rating),
            ]
        })
        .collect();

    let header = ["", "ID", "TITLE", "CATEGORY", "PRICE", "RATING"];
    let mut widths = header.map(|title| title.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    let bookmarked = courses
        .iter()
        .filter(|course| snapshot.contains(&course.id))
        .count();
    out.push_str(&format!(
        "\n{} course(s), {bookmarked} bookmarked\n",
        courses.len()
    ));
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        // Price and rating are right-aligned.
        if idx >= 4 {
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
