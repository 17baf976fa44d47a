//! Confirmation gate in front of bookmark removal.

use tracing::debug;

use crate::app::bookmarks::{BookmarkHandle, BookmarkResult};
use crate::domain::model::CourseId;

/// State of a screen's removal flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RemovalState {
    #[default]
    Idle,
    ConfirmPending(CourseId),
}

/// What a bookmark control activation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The course was not bookmarked and has been added without confirmation.
    Added(CourseId),
    /// The course is bookmarked; the confirmation sheet is now showing.
    ConfirmationRequested(CourseId),
    /// A confirmation is already showing for another course; the request was dropped.
    Busy { pending: CourseId },
}

/// Per-screen controller for the remove-bookmark confirmation sheet.
///
/// Additions go straight to the store. Removals wait in [`RemovalState::ConfirmPending`] until the
/// user confirms or cancels. The sheet is visible exactly while a candidate is pending.
#[derive(Debug, Clone, Default)]
pub struct RemovalFlow {
    state: RemovalState,
}

impl RemovalFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RemovalState {
        &self.state
    }

    /// Whether the confirmation sheet should be drawn.
    pub fn is_visible(&self) -> bool {
        matches!(self.state, RemovalState::ConfirmPending(_))
    }

    pub fn candidate(&self) -> Option<&CourseId> {
        match &self.state {
            RemovalState::ConfirmPending(id) => Some(id),
            RemovalState::Idle => None,
        }
    }

    /// Handle activation of a bookmark control for `id`.
    pub fn request_toggle(
        &mut self,
        bookmarks: &BookmarkHandle,
        id: &CourseId,
    ) -> BookmarkResult<ToggleOutcome> {
        if let RemovalState::ConfirmPending(pending) = &self.state {
            debug!(requested = %id, pending = %pending, "removal already pending");
            return Ok(ToggleOutcome::Busy {
                pending: pending.clone(),
            });
        }

        if bookmarks.is_bookmarked(id)? {
            debug!(course = %id, "removal confirmation requested");
            self.state = RemovalState::ConfirmPending(id.clone());
            Ok(ToggleOutcome::ConfirmationRequested(id.clone()))
        } else {
            bookmarks.toggle(id)?;
            Ok(ToggleOutcome::Added(id.clone()))
        }
    }

    /// "Yes, Remove": toggle the candidate once and return to idle. Returns the removed id, or
    /// `None` when nothing was pending.
    pub fn confirm(&mut self, bookmarks: &BookmarkHandle) -> BookmarkResult<Option<CourseId>> {
        let id = match &self.state {
            RemovalState::ConfirmPending(id) => id.clone(),
            RemovalState::Idle => return Ok(None),
        };
        bookmarks.toggle(&id)?;
        debug!(course = %id, "removal confirmed");
        self.state = RemovalState::Idle;
        Ok(Some(id))
    }

    /// "Cancel" or dismissing the sheet. Discards the candidate without touching the store.
    pub fn cancel(&mut self) -> Option<CourseId> {
        match std::mem::take(&mut self.state) {
            RemovalState::ConfirmPending(id) => {
                debug!(course = %id, "removal cancelled");
                Some(id)
            }
            RemovalState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::app::bookmarks::BookmarkProvider;

    fn id(value: &str) -> CourseId {
        CourseId::from(value)
    }

    fn provider() -> BookmarkProvider {
        BookmarkProvider::new([id("1"), id("3")])
    }

    #[test]
    fn confirming_removes_the_candidate() {
        let provider = provider();
        let bookmarks = provider.handle();
        let mut flow = RemovalFlow::new();

        let outcome = flow.request_toggle(&bookmarks, &id("1")).unwrap();
        assert_eq!(outcome, ToggleOutcome::ConfirmationRequested(id("1")));
        assert!(flow.is_visible());
        assert_eq!(flow.candidate(), Some(&id("1")));
        assert!(bookmarks.is_bookmarked(&id("1")).unwrap());

        assert_eq!(flow.confirm(&bookmarks).unwrap(), Some(id("1")));
        assert_eq!(flow.state(), &RemovalState::Idle);
        assert!(!flow.is_visible());
        assert!(!bookmarks.is_bookmarked(&id("1")).unwrap());
    }

    #[test]
    fn cancelling_keeps_membership() {
        let provider = provider();
        let bookmarks = provider.handle();
        let mut flow = RemovalFlow::new();

        flow.request_toggle(&bookmarks, &id("1")).unwrap();
        assert_eq!(flow.cancel(), Some(id("1")));
        assert!(!flow.is_visible());
        assert!(bookmarks.is_bookmarked(&id("1")).unwrap());
        assert_eq!(bookmarks.snapshot().unwrap().version(), 0);
    }

    #[test]
    fn adding_skips_confirmation() {
        let provider = provider();
        let bookmarks = provider.handle();
        let mut flow = RemovalFlow::new();

        let outcome = flow.request_toggle(&bookmarks, &id("2")).unwrap();
        assert_eq!(outcome, ToggleOutcome::Added(id("2")));
        assert!(!flow.is_visible());
        assert!(bookmarks.is_bookmarked(&id("2")).unwrap());
    }

    #[test]
    fn confirm_toggles_exactly_once() {
        let provider = provider();
        let bookmarks = provider.handle();
        let toggles = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&toggles);
        let _subscription = bookmarks
            .subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let mut flow = RemovalFlow::new();
        flow.request_toggle(&bookmarks, &id("3")).unwrap();
        flow.confirm(&bookmarks).unwrap();
        assert_eq!(flow.confirm(&bookmarks).unwrap(), None);

        assert_eq!(toggles.load(Ordering::SeqCst), 1);
        assert!(!bookmarks.is_bookmarked(&id("3")).unwrap());
    }

    #[test]
    fn double_cancel_is_inert() {
        let mut flow = RemovalFlow::new();
        assert_eq!(flow.cancel(), None);
        assert_eq!(flow.cancel(), None);
        assert_eq!(flow.state(), &RemovalState::Idle);
    }

    #[test]
    fn second_request_while_pending_is_dropped() {
        let provider = provider();
        let bookmarks = provider.handle();
        let mut flow = RemovalFlow::new();

        flow.request_toggle(&bookmarks, &id("1")).unwrap();
        let outcome = flow.request_toggle(&bookmarks, &id("3")).unwrap();
        assert_eq!(outcome, ToggleOutcome::Busy { pending: id("1") });

        let outcome = flow.request_toggle(&bookmarks, &id("2")).unwrap();
        assert_eq!(outcome, ToggleOutcome::Busy { pending: id("1") });
        assert!(!bookmarks.is_bookmarked(&id("2")).unwrap());

        flow.confirm(&bookmarks).unwrap();
        assert!(!bookmarks.is_bookmarked(&id("1")).unwrap());
        assert!(bookmarks.is_bookmarked(&id("3")).unwrap());
    }

    #[test]
    fn flow_cycles_after_each_resolution() {
        let provider = provider();
        let bookmarks = provider.handle();
        let mut flow = RemovalFlow::new();

        flow.request_toggle(&bookmarks, &id("1")).unwrap();
        flow.cancel();
        flow.request_toggle(&bookmarks, &id("1")).unwrap();
        flow.confirm(&bookmarks).unwrap();
        let outcome = flow.request_toggle(&bookmarks, &id("1")).unwrap();

        assert_eq!(outcome, ToggleOutcome::Added(id("1")));
        assert!(bookmarks.is_bookmarked(&id("1")).unwrap());
    }

    #[test]
    fn requests_fail_without_provider() {
        let provider = provider();
        let bookmarks = provider.handle();
        let mut flow = RemovalFlow::new();
        flow.request_toggle(&bookmarks, &id("1")).unwrap();
        drop(provider);

        assert!(flow.confirm(&bookmarks).is_err());
        assert!(flow.is_visible());
    }
}
