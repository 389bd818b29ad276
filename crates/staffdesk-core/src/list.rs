// ── List-screen controller ──
//
// Paginated, refreshable view over a remote collection. State lives in a
// `watch` channel and is mutated atomically before and after the single
// suspension point (the page fetch); no lock is held across the network
// call. Ordering is enforced by a generation counter bumped on every
// reset: a response whose generation is stale is dropped on arrival.

use indexmap::IndexMap;
use staffdesk_api::PageRequest;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{
    AttendanceRecord, Employee, EntityId, LeaveRequest, NewsItem, Notification, Payslip, Record,
    Task,
};
use crate::source::{PageSource, RemoteSource};
use crate::stream::StateStream;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

// ── ListState ────────────────────────────────────────────────────────

/// Observable state of one paginated collection.
///
/// `items` keeps fetch order and never holds two records with the same
/// id: a re-fetched record replaces the old value in place.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: IndexMap<EntityId, T>,
    /// Last page successfully merged (0 = nothing fetched yet).
    pub cursor: u32,
    pub has_more: bool,
    pub is_loading: bool,
    /// A reset is in flight (pull-to-refresh indicator).
    pub is_refreshing: bool,
    pub last_error: Option<CoreError>,
    generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            cursor: 0,
            has_more: true,
            is_loading: false,
            is_refreshing: false,
            last_error: None,
            generation: 0,
        }
    }
}

impl<T> ListState<T> {
    pub fn items(&self) -> impl ExactSizeIterator<Item = &T> {
        self.items.values()
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True before the first page has ever been merged.
    pub fn is_pristine(&self) -> bool {
        self.cursor == 0
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.values().cloned().collect()
    }
}

/// What a single `load` call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was merged; `received` rows came back.
    Applied { received: usize },
    /// Nothing was requested: a fetch is already in flight or the end was reached.
    Skipped,
    /// The response arrived after a newer reset and was discarded.
    Superseded,
    /// The fetch failed; the error is now in `last_error`.
    Failed(CoreError),
}

/// Ticket for one issued page fetch.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    generation: u64,
    page: u32,
}

// ── ListController ───────────────────────────────────────────────────

/// State holder backing a list screen.
///
/// At most one page fetch is in flight per generation; `load(false)`
/// while loading is a no-op that issues no request. `load(true)` always
/// starts a new generation, and only the newest generation's response
/// is ever applied.
pub struct ListController<T: Record, S: PageSource<T>> {
    source: S,
    page_size: u32,
    state: watch::Sender<ListState<T>>,
}

impl<T: Record, S: PageSource<T>> ListController<T, S> {
    pub fn new(source: S) -> Self {
        Self::with_page_size(source, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(source: S, page_size: u32) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            source,
            page_size: page_size.max(1),
            state,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch page 1 (`reset`) or the next page.
    ///
    /// Never returns an error: failures land in `last_error` with the
    /// existing items left in place.
    pub async fn load(&self, reset: bool) -> LoadOutcome {
        let Some(ticket) = self.begin(reset) else {
            debug!(reset, "load skipped");
            return LoadOutcome::Skipped;
        };

        debug!(
            page = ticket.page,
            generation = ticket.generation,
            "fetching page"
        );
        let request = PageRequest::new(ticket.page, self.page_size);
        let result = self.source.fetch_page(request).await;
        self.finish(ticket, result)
    }

    /// Pull-to-refresh.
    pub async fn refresh(&self) -> LoadOutcome {
        self.load(true).await
    }

    /// Infinite-scroll trigger.
    pub async fn load_more(&self) -> LoadOutcome {
        self.load(false).await
    }

    fn begin(&self, reset: bool) -> Option<Ticket> {
        let mut ticket = None;
        self.state.send_if_modified(|s| {
            if reset {
                s.generation += 1;
                s.items.clear();
                s.cursor = 0;
                s.has_more = true;
                s.last_error = None;
                s.is_loading = true;
                s.is_refreshing = true;
                ticket = Some(Ticket {
                    generation: s.generation,
                    page: 1,
                });
                true
            } else if s.is_loading || !s.has_more {
                false
            } else {
                s.is_loading = true;
                ticket = Some(Ticket {
                    generation: s.generation,
                    page: s.cursor + 1,
                });
                true
            }
        });
        ticket
    }

    fn finish(&self, ticket: Ticket, result: Result<Vec<T>, CoreError>) -> LoadOutcome {
        let page_size = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let mut outcome = LoadOutcome::Superseded;

        self.state.send_if_modified(|s| {
            if s.generation != ticket.generation {
                return false;
            }
            s.is_loading = false;
            s.is_refreshing = false;

            match result {
                Ok(page) => {
                    let received = page.len();
                    for item in page {
                        // IndexMap::insert keeps the original position for existing keys.
                        s.items.insert(item.id().clone(), item);
                    }
                    s.cursor = ticket.page;
                    s.has_more = received >= page_size;
                    s.last_error = None;
                    outcome = LoadOutcome::Applied { received };
                }
                Err(err) => {
                    warn!(page = ticket.page, error = %err, "page fetch failed");
                    s.last_error = Some(err.clone());
                    outcome = LoadOutcome::Failed(err);
                }
            }
            true
        });

        if outcome == LoadOutcome::Superseded {
            debug!(
                page = ticket.page,
                generation = ticket.generation,
                "discarding stale page"
            );
        }
        outcome
    }

    // ── Local edits ──────────────────────────────────────────────────

    /// Merge a single record (e.g. one just created from this screen).
    pub fn upsert(&self, item: T) {
        self.state.send_modify(|s| {
            s.items.insert(item.id().clone(), item);
        });
    }

    /// Drop a record locally. Returns `true` if it was present.
    pub fn remove(&self, id: &EntityId) -> bool {
        self.state.send_if_modified(|s| s.items.shift_remove(id).is_some())
    }

    /// Clear a displayed error without refetching (banner dismissed).
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Current state (cloned).
    pub fn snapshot(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ListState<T>) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn subscribe(&self) -> StateStream<ListState<T>> {
        StateStream::new(self.state.subscribe())
    }
}

// ── Per-domain aliases ───────────────────────────────────────────────

pub type EmployeeList = ListController<Employee, RemoteSource>;
pub type AttendanceList = ListController<AttendanceRecord, RemoteSource>;
pub type LeaveRequestList = ListController<LeaveRequest, RemoteSource>;
pub type TaskList = ListController<Task, RemoteSource>;
pub type NewsList = ListController<NewsItem, RemoteSource>;
pub type NotificationList = ListController<Notification, RemoteSource>;
pub type PayslipList = ListController<Payslip, RemoteSource>;
