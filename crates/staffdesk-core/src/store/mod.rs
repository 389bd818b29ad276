// Process-wide state stores. Each owns a `watch` channel and changes
// only through its `dispatch` method.

mod connectivity;
mod session;

pub use connectivity::{Connectivity, ConnectivityAction, ConnectivityStore};
pub use session::{SessionAction, SessionState, SessionStore, SessionUser};
