// ── Screen view models ──
//
// Collapse controller state into the one thing a screen should draw.
// Pure functions of state; no I/O.

use strum::{Display, EnumIter};

use crate::detail::DetailState;
use crate::list::ListState;

/// Screen families that render a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    Employees,
    Attendance,
    LeaveRequests,
    Payslips,
    Tasks,
    News,
    Notifications,
}

/// Copy for an empty collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCopy {
    pub title: &'static str,
    pub hint: &'static str,
}

impl Domain {
    pub fn empty_copy(self) -> EmptyCopy {
        let (title, hint) = match self {
            Self::Employees => ("No colleagues found", "Try a different search."),
            Self::Attendance => ("No attendance yet", "Check in to start your record."),
            Self::LeaveRequests => ("No leave requests", "Tap + to request time off."),
            Self::Payslips => ("No payslips yet", "Payslips appear after each pay run."),
            Self::Tasks => ("You're all caught up", "New tasks will show up here."),
            Self::News => ("No news", "Company announcements will appear here."),
            Self::Notifications => ("No notifications", "We'll let you know when something happens."),
        };
        EmptyCopy { title, hint }
    }
}

/// What a list screen draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView<'a, T> {
    /// First load in flight, nothing to show yet.
    Loading,
    Empty(EmptyCopy),
    /// Nothing to show and the last fetch failed.
    Error { message: String, retryable: bool },
    Content {
        items: Vec<&'a T>,
        /// Inline banner over still-visible items.
        stale_error: Option<String>,
        refreshing: bool,
        loading_more: bool,
        can_load_more: bool,
    },
}

impl<'a, T> ScreenView<'a, T> {
    pub fn from_list(state: &'a ListState<T>, empty: EmptyCopy) -> Self {
        if state.is_empty() {
            if let Some(err) = &state.last_error {
                return Self::Error {
                    message: err.user_message(),
                    retryable: !err.is_unauthorized(),
                };
            }
            if state.is_loading || state.is_pristine() {
                return Self::Loading;
            }
            return Self::Empty(empty);
        }

        Self::Content {
            items: state.items().collect(),
            stale_error: state.last_error.as_ref().map(|e| e.user_message()),
            refreshing: state.is_refreshing,
            loading_more: state.is_loading && !state.is_refreshing,
            can_load_more: state.has_more && !state.is_loading,
        }
    }
}

/// What a detail screen draws.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<'a, T> {
    Loading,
    /// The record no longer exists.
    Missing,
    Error { message: String },
    Ready {
        value: &'a T,
        /// Failure of a reload or edit while the value stays visible.
        stale_error: Option<String>,
        saving: bool,
    },
}

impl<'a, T> DetailView<'a, T> {
    pub fn from_detail(state: &'a DetailState<T>) -> Self {
        if let Some(value) = &state.value {
            return Self::Ready {
                value,
                stale_error: state.last_error.as_ref().map(|e| e.user_message()),
                saving: state.pending_mutation,
            };
        }
        match &state.last_error {
            Some(err) if err.is_not_found() => Self::Missing,
            Some(err) => Self::Error {
                message: err.user_message(),
            },
            None => Self::Loading,
        }
    }
}
