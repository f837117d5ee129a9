//! Fetch lifecycle state machine.
//!
//! ```text
//!   Idle ──begin──▶ Loading ──succeed──▶ Success
//!    ▲                 │
//!    │                 └──────fail──────▶ Failure
//!    └── Success / Failure ──begin──▶ Loading (error cleared)
//! ```
//!
//! Each `begin` hands out a [`RequestId`]. Completions carrying an id other
//! than the latest are stale and leave the state untouched. There is no
//! automatic retry: leaving `Failure` requires another `begin`.

use chrono::{DateTime, Utc};

/// Identifier of one refresh attempt. Strictly increasing per lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Phase of the most recent refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Success { completed_at: DateTime<Utc> },
    Failure { message: String },
}

/// Outcome of reporting a completion to a lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The completion belonged to the latest request and was recorded.
    Applied,
    /// A newer request was started since; the completion was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: FetchState,
    latest: u64,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            latest: 0,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    /// Failure message, if the latest refresh failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failure { message } => Some(message),
            _ => None,
        }
    }

    /// Enter `Loading` from any state, clearing a previous error.
    pub fn begin(&mut self) -> RequestId {
        self.latest += 1;
        self.state = FetchState::Loading;
        RequestId(self.latest)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }

    pub fn succeed(&mut self, id: RequestId, completed_at: DateTime<Utc>) -> Completion {
        self.complete(id, FetchState::Success { completed_at })
    }

    pub fn fail(&mut self, id: RequestId, message: impl Into<String>) -> Completion {
        self.complete(
            id,
            FetchState::Failure {
                message: message.into(),
            },
        )
    }

    fn complete(&mut self, id: RequestId, next: FetchState) -> Completion {
        if !self.is_current(id) {
            tracing::debug!(
                expected = self.latest,
                got = id.0,
                "Ignoring stale completion (request id mismatch)"
            );
            return Completion::Stale;
        }
        self.state = next;
        Completion::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let lc = Lifecycle::new();
        assert_eq!(lc.state(), &FetchState::Idle);
        assert!(lc.error().is_none());
    }

    #[test]
    fn test_begin_then_succeed() {
        let mut lc = Lifecycle::new();
        let id = lc.begin();
        assert!(lc.is_loading());

        let now = Utc::now();
        assert_eq!(lc.succeed(id, now), Completion::Applied);
        assert_eq!(lc.state(), &FetchState::Success { completed_at: now });
    }

    #[test]
    fn test_failure_then_retry_clears_error() {
        let mut lc = Lifecycle::new();
        let id = lc.begin();
        lc.fail(id, "HTTP error: status 500");
        assert_eq!(lc.error(), Some("HTTP error: status 500"));

        // Failure is sticky until a new begin
        assert_eq!(lc.error(), Some("HTTP error: status 500"));

        let retry = lc.begin();
        assert!(lc.is_loading());
        assert!(lc.error().is_none());
        assert!(retry > id);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut lc = Lifecycle::new();
        let first = lc.begin();
        let second = lc.begin();

        assert_eq!(lc.fail(first, "slow failure"), Completion::Stale);
        assert!(lc.is_loading());

        assert_eq!(lc.succeed(second, Utc::now()), Completion::Applied);
        assert_eq!(lc.succeed(first, Utc::now()), Completion::Stale);
        assert!(matches!(lc.state(), FetchState::Success { .. }));
    }

    #[test]
    fn test_request_ids_increase() {
        let mut lc = Lifecycle::new();
        let ids: Vec<u64> = (0..5).map(|_| lc.begin().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(lc.is_current(RequestId(5)));
        assert!(!lc.is_current(RequestId(4)));
    }
}
