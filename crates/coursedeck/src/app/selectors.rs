//! Pure views derived from the catalog and a bookmark snapshot.

use crate::app::bookmarks::BookmarkSnapshot;
use crate::app::catalog::Catalog;
use crate::domain::model::{Category, Course, CourseId};

/// Catalog courses that are bookmarked in `snapshot`, narrowed to `category`, in catalog order.
pub fn bookmarked_courses<'a>(
    catalog: &'a Catalog,
    snapshot: &BookmarkSnapshot,
    category: Option<&Category>,
) -> Vec<&'a Course> {
    catalog
        .courses_in(category)
        .into_iter()
        .filter(|course| snapshot.contains(&course.id))
        .collect()
}

/// Memoized [`bookmarked_courses`] result.
///
/// The cached ids are reused only while both the snapshot version and the category are
/// unchanged, so the view can never lag behind the store.
#[derive(Debug, Default, Clone)]
pub struct BookmarkedView {
    key: Option<(u64, String)>,
    ids: Vec<CourseId>,
}

impl BookmarkedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve<'a>(
        &mut self,
        catalog: &'a Catalog,
        snapshot: &BookmarkSnapshot,
        category: Option<&Category>,
    ) -> Vec<&'a Course> {
        let key = (
            snapshot.version(),
            category
                .map(|category| category.id.clone())
                .unwrap_or_default(),
        );
        if self.key.as_ref() != Some(&key) {
            self.ids = bookmarked_courses(catalog, snapshot, category)
                .into_iter()
                .map(|course| course.id.clone())
                .collect();
            self.key = Some(key);
        }
        self.ids
            .iter()
            .filter_map(|id| catalog.course(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::app::bookmarks::BookmarkProvider;
    use crate::app::removal::RemovalFlow;

    fn ids(courses: &[&Course]) -> Vec<String> {
        courses.iter().map(|course| course.id.to_string()).collect()
    }

    #[test]
    fn lists_only_bookmarked_courses() {
        let catalog = Catalog::builtin().unwrap();
        let provider = BookmarkProvider::new(catalog.bookmark_seed());
        let snapshot = provider.handle().snapshot().unwrap();

        let courses = bookmarked_courses(&catalog, &snapshot, catalog.category("all"));
        assert_eq!(ids(&courses), vec!["1", "3"]);

        let design = bookmarked_courses(&catalog, &snapshot, catalog.category("3d-design"));
        assert_eq!(ids(&design), vec!["1"]);
    }

    #[test]
    fn confirmed_removal_drops_course_from_view() {
        let catalog = Catalog::builtin().unwrap();
        let provider = BookmarkProvider::new(catalog.bookmark_seed());
        let bookmarks = provider.handle();
        let mut view = BookmarkedView::new();
        let mut flow = RemovalFlow::new();

        let before = view.resolve(&catalog, &bookmarks.snapshot().unwrap(), None);
        assert_eq!(ids(&before), vec!["1", "3"]);

        flow.request_toggle(&bookmarks, &CourseId::from("1")).unwrap();
        flow.confirm(&bookmarks).unwrap();

        let after = view.resolve(&catalog, &bookmarks.snapshot().unwrap(), None);
        assert_eq!(ids(&after), vec!["3"]);
    }

    #[test]
    fn view_recomputes_on_category_change() {
        let catalog = Catalog::builtin().unwrap();
        let provider = BookmarkProvider::new(catalog.bookmark_seed());
        let snapshot = provider.handle().snapshot().unwrap();
        let mut view = BookmarkedView::new();

        assert_eq!(view.resolve(&catalog, &snapshot, None).len(), 2);
        let narrowed = view.resolve(&catalog, &snapshot, catalog.category("ui-ux"));
        assert_eq!(ids(&narrowed), vec!["3"]);
    }

    #[test]
    fn ids_without_catalog_entries_are_skipped() {
        let catalog = Catalog::builtin().unwrap();
        let provider = BookmarkProvider::new([CourseId::from("999")]);
        let snapshot = provider.handle().snapshot().unwrap();
        assert!(bookmarked_courses(&catalog, &snapshot, None).is_empty());
    }
}
