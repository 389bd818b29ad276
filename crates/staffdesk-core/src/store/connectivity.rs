// ── Connectivity store ──
//
// Process-wide reachability flag plus a foreground counter. Platform
// glue (or the CLI's `--offline`) dispatches actions; the write
// dispatcher watches for offline→online edges and foreground bumps.

use tokio::sync::watch;
use tracing::info;

use crate::stream::StateStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connectivity {
    pub online: bool,
    /// Incremented each time the app returns to the foreground.
    pub foreground_epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityAction {
    WentOnline,
    WentOffline,
    Foregrounded,
}

pub struct ConnectivityStore {
    state: watch::Sender<Connectivity>,
}

impl ConnectivityStore {
    pub fn new(online: bool) -> Self {
        let (state, _) = watch::channel(Connectivity {
            online,
            foreground_epoch: 0,
        });
        Self { state }
    }

    /// Apply `action`. Returns `true` if observers were notified.
    pub fn dispatch(&self, action: ConnectivityAction) -> bool {
        self.state.send_if_modified(|s| match action {
            ConnectivityAction::WentOnline | ConnectivityAction::WentOffline => {
                let online = action == ConnectivityAction::WentOnline;
                if s.online == online {
                    return false;
                }
                info!(online, "connectivity changed");
                s.online = online;
                true
            }
            ConnectivityAction::Foregrounded => {
                s.foreground_epoch += 1;
                true
            }
        })
    }

    pub fn set_online(&self, online: bool) -> bool {
        self.dispatch(if online {
            ConnectivityAction::WentOnline
        } else {
            ConnectivityAction::WentOffline
        })
    }

    pub fn foregrounded(&self) {
        self.dispatch(ConnectivityAction::Foregrounded);
    }

    pub fn is_online(&self) -> bool {
        self.state.borrow().online
    }

    pub fn snapshot(&self) -> Connectivity {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> StateStream<Connectivity> {
        StateStream::new(self.state.subscribe())
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<Connectivity> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_state_is_not_republished() {
        let store = ConnectivityStore::new(true);
        assert!(!store.set_online(true));
        assert!(store.set_online(false));
        assert!(!store.is_online());
        assert!(store.set_online(true));
    }

    #[test]
    fn foreground_bumps_epoch() {
        let store = ConnectivityStore::new(false);
        store.foregrounded();
        store.foregrounded();
        assert_eq!(store.snapshot().foreground_epoch, 2);
        assert!(!store.snapshot().online);
    }
}
