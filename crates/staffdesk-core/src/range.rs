// ── Leave date-range selection ──
//
// Two-tap calendar picker state used when composing a leave request.

use chrono::{Datelike, NaiveDate, Weekday};
use staffdesk_api::types::CreateLeaveRequest;

/// Number of calendar days in `start..=end`; zero if the range is inverted.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    let span = (end - start).num_days() + 1;
    u32::try_from(span).unwrap_or(u32::MAX)
}

/// Selection state of the range picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeSelection {
    #[default]
    Empty,
    /// Start picked, end not yet.
    Start(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl RangeSelection {
    /// Apply a tap on `date` and return the new selection.
    #[must_use]
    pub fn tap(self, date: NaiveDate) -> Self {
        match self {
            Self::Start(start) if date >= start => Self::Range { start, end: date },
            Self::Empty | Self::Start(_) | Self::Range { .. } => Self::Start(date),
        }
    }

    /// The selected inclusive bounds. A lone start counts as a single day.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::Empty => None,
            Self::Start(day) => Some((day, day)),
            Self::Range { start, end } => Some((start, end)),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.bounds()
            .is_some_and(|(start, end)| start <= date && date <= end)
    }

    pub fn day_count(&self) -> u32 {
        self.bounds()
            .map_or(0, |(start, end)| inclusive_days(start, end))
    }

    /// Monday-to-Friday days inside the selection.
    pub fn working_days(&self) -> u32 {
        let Some((start, end)) = self.bounds() else {
            return 0;
        };
        let count = start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Build the create payload once both ends are picked.
    pub fn to_leave_request(
        &self,
        leave_type: impl Into<String>,
        reason: Option<String>,
    ) -> Option<CreateLeaveRequest> {
        let Self::Range { start, end } = *self else {
            return None;
        };
        Some(CreateLeaveRequest {
            leave_type: leave_type.into(),
            start_date: start,
            end_date: end,
            reason,
        })
    }
}
