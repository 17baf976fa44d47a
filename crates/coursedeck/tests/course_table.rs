use coursedeck::app::bookmarks::BookmarkProvider;
use coursedeck::app::catalog::Catalog;
use coursedeck::app::listing::{CourseQuery, render_table, select_courses};
use insta::assert_snapshot;

#[test]
fn builtin_catalog_table() {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let provider = BookmarkProvider::new(catalog.bookmark_seed());
    let snapshot = provider.handle().snapshot().expect("provider alive");
    let courses =
        select_courses(&catalog, &snapshot, &CourseQuery::default()).expect("valid query");

    let rendered = format!("$ coursedeck courses\n{}", render_table(&courses, &snapshot));
    assert_snapshot!("course_table", rendered);
}
