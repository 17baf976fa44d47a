//! Shared bookmark state.
//!
//! A single [`BookmarkProvider`] owns the set of bookmarked course ids. Screens never see the set
//! itself: they receive a [`BookmarkHandle`] (usually through a [`BookmarkContext`]) that can
//! query membership, request toggles, and subscribe to changes. Once the provider is dropped
//! every handle fails with [`BookmarkError::ProviderMissing`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::debug;

use crate::domain::errors::BookmarkError;
use crate::domain::model::CourseId;

pub type BookmarkResult<T> = Result<T, BookmarkError>;

type Callback = Arc<dyn Fn(&BookmarkChange) + Send + Sync>;

/// Notification delivered to subscribers after every toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkChange {
    pub course_id: CourseId,
    /// Membership after the toggle.
    pub bookmarked: bool,
    /// Store version after the toggle.
    pub version: u64,
}

/// Immutable copy of the bookmark set at a given version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSnapshot {
    members: BTreeSet<CourseId>,
    version: u64,
}

impl BookmarkSnapshot {
    pub fn contains(&self, id: &CourseId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseId> {
        self.members.iter()
    }

    /// Number of toggles applied since the provider was created.
    pub fn version(&self) -> u64 {
        self.version
    }
}

struct Shared {
    state: RwLock<BookmarkSnapshot>,
    // Serializes a mutation together with its notifications. Reentrant so a subscriber may
    // toggle again from inside its callback.
    writer: ReentrantMutex<()>,
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_subscriber: AtomicU64,
}

impl Shared {
    fn notify(&self, change: &BookmarkChange) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(change);
        }
    }
}

/// Owner of the bookmark set. Dropping it tears the store down.
pub struct BookmarkProvider {
    shared: Arc<Shared>,
}

impl BookmarkProvider {
    /// Create a provider seeded with the given ids. Duplicates collapse.
    pub fn new<I>(seed: I) -> Self
    where
        I: IntoIterator<Item = CourseId>,
    {
        let members: BTreeSet<CourseId> = seed.into_iter().collect();
        debug!(seeded = members.len(), "bookmark provider created");
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(BookmarkSnapshot {
                    members,
                    version: 0,
                }),
                writer: ReentrantMutex::new(()),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(0),
            }),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Hand out a consumer handle bound to this provider.
    pub fn handle(&self) -> BookmarkHandle {
        BookmarkHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// A context with this provider installed.
    pub fn context(&self) -> BookmarkContext {
        BookmarkContext {
            handle: Some(self.handle()),
        }
    }
}

impl fmt::Debug for BookmarkProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("BookmarkProvider")
            .field("members", &state.members)
            .field("version", &state.version)
            .finish()
    }
}

/// Read and toggle capability on a provider's bookmark set.
#[derive(Clone)]
pub struct BookmarkHandle {
    shared: Weak<Shared>,
}

impl BookmarkHandle {
    fn shared(&self) -> BookmarkResult<Arc<Shared>> {
        self.shared.upgrade().ok_or(BookmarkError::ProviderMissing)
    }

    /// Membership query. Never mutates.
    pub fn is_bookmarked(&self, id: &CourseId) -> BookmarkResult<bool> {
        let shared = self.shared()?;
        let contains = shared.state.read().contains(id);
        Ok(contains)
    }

    /// Flip membership of `id` exactly once and notify subscribers before returning.
    pub fn toggle(&self, id: &CourseId) -> BookmarkResult<BookmarkChange> {
        let shared = self.shared()?;
        let _gate = shared.writer.lock();

        let change = {
            let mut state = shared.state.write();
            let bookmarked = if state.members.remove(id) {
                false
            } else {
                state.members.insert(id.clone());
                true
            };
            state.version += 1;
            BookmarkChange {
                course_id: id.clone(),
                bookmarked,
                version: state.version,
            }
        };

        debug!(
            course = %change.course_id,
            bookmarked = change.bookmarked,
            version = change.version,
            "bookmark toggled"
        );
        shared.notify(&change);
        Ok(change)
    }

    /// Copy of the current set, for rendering a whole frame from one consistent state.
    pub fn snapshot(&self) -> BookmarkResult<BookmarkSnapshot> {
        let shared = self.shared()?;
        let snapshot = shared.state.read().clone();
        Ok(snapshot)
    }

    /// Register an observer invoked synchronously after every toggle. The observer stays
    /// registered until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> BookmarkResult<Subscription>
    where
        F: Fn(&BookmarkChange) + Send + Sync + 'static,
    {
        let shared = self.shared()?;
        let id = shared.next_subscriber.fetch_add(1, Ordering::Relaxed);
        shared.subscribers.lock().push((id, Arc::new(callback)));
        debug!(subscriber = id, "bookmark subscriber added");
        Ok(Subscription {
            id,
            shared: Arc::downgrade(&shared),
        })
    }

    pub fn subscriber_count(&self) -> BookmarkResult<usize> {
        let shared = self.shared()?;
        let count = shared.subscribers.lock().len();
        Ok(count)
    }
}

impl fmt::Debug for BookmarkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookmarkHandle")
            .field("live", &(self.shared.strong_count() > 0))
            .finish()
    }
}

/// Registration guard returned by [`BookmarkHandle::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared
                .subscribers
                .lock()
                .retain(|(id, _)| *id != self.id);
            debug!(subscriber = self.id, "bookmark subscriber removed");
        }
    }
}

/// Lookup of the bookmark provider available to a screen.
#[derive(Debug, Clone, Default)]
pub struct BookmarkContext {
    handle: Option<BookmarkHandle>,
}

impl BookmarkContext {
    /// A context with no provider installed.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Resolve the handle, failing fast when no provider is installed.
    pub fn bookmarks(&self) -> BookmarkResult<BookmarkHandle> {
        self.handle.clone().ok_or(BookmarkError::ProviderMissing)
    }
}
