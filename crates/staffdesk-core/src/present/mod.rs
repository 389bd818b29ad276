// Presentation helpers: pure functions from domain state to what a
// screen shows.

mod avatar;
mod badge;
mod format;
mod view;

pub use avatar::{AVATAR_PALETTE, avatar_tone, initials};
pub use badge::{Badge, Tone, priority_badge, status_badge};
pub use format::{format_hours, format_money, time_ago};
pub use view::{DetailView, Domain, EmptyCopy, ScreenView};
