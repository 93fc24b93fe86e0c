//! Generation-scoped cancellation and progress tracking.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared stop flag and row counters for one render generation.
///
/// Each draw call allocates a fresh token and hands clones of its `Arc` to
/// every worker, so a cancel aimed at one generation can never leak into an
/// earlier or later one. Workers poll [`CancelToken::is_cancelled`] at least
/// once per row.
#[derive(Debug)]
pub struct CancelToken {
    cancelled: AtomicBool,
    rows_done: AtomicUsize,
    rows_total: usize,
}

impl CancelToken {
    pub fn new(rows_total: usize) -> Self {
        CancelToken {
            cancelled: AtomicBool::new(false),
            rows_done: AtomicUsize::new(0),
            rows_total,
        }
    }

    /// Asks every worker holding this token to stop at its next row check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Records one finished row.
    pub fn row_done(&self) {
        self.rows_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Completed and total row counts.
    pub fn progress(&self) -> (usize, usize) {
        (self.rows_done.load(Ordering::Relaxed), self.rows_total)
    }

    /// Whether every row of the generation has been written.
    pub fn is_complete(&self) -> bool {
        let (done, total) = self.progress();
        done >= total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear_with_zero_progress() {
        let token = CancelToken::new(10);
        assert!(!token.is_cancelled());
        assert_eq!(token.progress(), (0, 10));
        assert!(!token.is_complete());
    }

    #[test]
    fn cancel_is_sticky() {
        let token = CancelToken::new(4);
        token.cancel();
        assert!(token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn completion_tracks_rows() {
        let token = CancelToken::new(3);
        token.row_done();
        token.row_done();
        assert!(!token.is_complete());
        token.row_done();
        assert!(token.is_complete());
        assert_eq!(token.progress(), (3, 3));
    }
}
