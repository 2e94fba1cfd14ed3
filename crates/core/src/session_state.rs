//! Single-use session lifecycle state.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a single-use session.
///
/// A session moves `Idle` -> `Running` -> `Completed` exactly once.
/// `Completed` is terminal whether the run succeeded or failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// The run is in flight.
    Running,
    /// The run finished; the session cannot be started again.
    Completed,
}

impl SessionState {
    /// Check if the session can still be started.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if the session reached its terminal state.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const COMPLETED: u8 = 2;

/// Atomic holder for a session's lifecycle state.
///
/// `begin` performs the only `Idle` -> `Running` transition; under
/// concurrent starts exactly one caller wins it. `complete` is a plain
/// store: the losing callers never reach it, and the winner calls it
/// exactly once.
#[derive(Debug)]
pub struct SessionStateCell(AtomicU8);

impl SessionStateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    /// Attempt the `Idle` -> `Running` transition.
    ///
    /// Returns false if the session was already started.
    pub fn begin(&self) -> bool {
        self.0
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the session `Completed`.
    pub fn complete(&self) {
        self.0.store(COMPLETED, Ordering::Release);
    }

    pub fn get(&self) -> SessionState {
        match self.0.load(Ordering::Acquire) {
            IDLE => SessionState::Idle,
            RUNNING => SessionState::Running,
            _ => SessionState::Completed,
        }
    }
}

impl Default for SessionStateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_flags() {
        assert!(SessionState::Idle.is_idle());
        assert!(!SessionState::Idle.is_completed());
        assert!(!SessionState::Running.is_idle());
        assert!(SessionState::Completed.is_completed());
    }

    #[test]
    fn test_begin_wins_once() {
        let cell = SessionStateCell::new();
        assert_eq!(cell.get(), SessionState::Idle);
        assert!(cell.begin());
        assert_eq!(cell.get(), SessionState::Running);
        assert!(!cell.begin());
    }

    #[test]
    fn test_completed_is_terminal() {
        let cell = SessionStateCell::new();
        assert!(cell.begin());
        cell.complete();
        assert_eq!(cell.get(), SessionState::Completed);
        assert!(!cell.begin());
    }

    #[test]
    fn test_concurrent_begin_single_winner() {
        use std::sync::Arc;

        let cell = Arc::new(SessionStateCell::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cell = Arc::clone(&cell);
            handles.push(std::thread::spawn(move || cell.begin()));
        }
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }
}
