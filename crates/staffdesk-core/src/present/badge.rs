// ── Status badges ──
//
// Every tag maps to a label and a tone through an explicit table. Tags
// missing from a table fall back to a neutral badge showing the raw tag.

use strum::{AsRefStr, Display, EnumIter};

use crate::model::{Priority, StatusTag};

/// Semantic color slot; the renderer picks actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}

const UNKNOWN: Badge = Badge::new("Unknown", Tone::Neutral);

const STATUS_BADGES: &[(StatusTag, Badge)] = &[
    (StatusTag::Present, Badge::new("Present", Tone::Success)),
    (StatusTag::Absent, Badge::new("Absent", Tone::Danger)),
    (StatusTag::Late, Badge::new("Late", Tone::Warning)),
    (StatusTag::OnLeave, Badge::new("On leave", Tone::Info)),
    (StatusTag::HalfDay, Badge::new("Half day", Tone::Warning)),
    (StatusTag::Pending, Badge::new("Pending", Tone::Warning)),
    (StatusTag::Approved, Badge::new("Approved", Tone::Success)),
    (StatusTag::Rejected, Badge::new("Rejected", Tone::Danger)),
    (StatusTag::Cancelled, Badge::new("Cancelled", Tone::Neutral)),
    (StatusTag::Todo, Badge::new("To do", Tone::Neutral)),
    (StatusTag::InProgress, Badge::new("In progress", Tone::Info)),
    (StatusTag::Done, Badge::new("Done", Tone::Success)),
    (StatusTag::Blocked, Badge::new("Blocked", Tone::Danger)),
    (StatusTag::Active, Badge::new("Active", Tone::Success)),
    (StatusTag::Inactive, Badge::new("Inactive", Tone::Neutral)),
];

const PRIORITY_BADGES: &[(Priority, Badge)] = &[
    (Priority::Low, Badge::new("Low", Tone::Neutral)),
    (Priority::Medium, Badge::new("Medium", Tone::Info)),
    (Priority::High, Badge::new("High", Tone::Warning)),
    (Priority::Urgent, Badge::new("Urgent", Tone::Danger)),
];

fn lookup<K: PartialEq + Copy>(table: &[(K, Badge)], key: K) -> Badge {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(UNKNOWN, |(_, badge)| *badge)
}

pub fn status_badge(tag: StatusTag) -> Badge {
    lookup(STATUS_BADGES, tag)
}

pub fn priority_badge(priority: Priority) -> Badge {
    lookup(PRIORITY_BADGES, priority)
}
