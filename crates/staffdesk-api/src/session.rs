// Session boundary.
//
// The client does not own the sign-in flow. When the backend rejects the
// credential, it tells whoever owns the session and moves on.

/// Receives the process-wide "session ended" signal.
///
/// Invoked exactly once per request that fails with `Unauthorized`.
/// Implementations must not block; they typically flip a state store that
/// the UI observes.
pub trait SessionObserver: Send + Sync {
    fn session_ended(&self, reason: &str);
}

impl<F> SessionObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn session_ended(&self, reason: &str) {
        self(reason);
    }
}
