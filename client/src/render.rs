use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Fade-out duration, matching the table's CSS opacity transition.
pub const FADE_OUT_MS: u32 = 300;
/// Pause between the batch row swap and fading back in, so the DOM
/// replacement never paints mid-transition.
pub const SWAP_SETTLE_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    FadingOut,
    Settling,
}

/// Commit window for batched table refreshes.
///
/// Refreshes do not touch the live rows directly: a new payload is staged,
/// the table fades out, and only then is the whole row set swapped at once.
/// A payload arriving while a window is already open simply replaces the
/// staged one — the commit always applies the latest data, so a burst of
/// refreshes (e.g. a push event landing mid-render of a fetch) produces one
/// swap instead of visible thrash.
///
/// The window itself is pure state; [`stage_refresh`] drives it with timers.
#[derive(Debug)]
pub struct CommitWindow<T> {
    pending: Option<T>,
    phase: Phase,
}

impl<T> Default for CommitWindow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CommitWindow<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            phase: Phase::Idle,
        }
    }

    /// Stage a payload. Returns whether the caller should open a new fade
    /// window; while one is open the payload just rides along.
    pub fn stage(&mut self, payload: T) -> bool {
        self.pending = Some(payload);
        if self.phase == Phase::Idle {
            self.phase = Phase::FadingOut;
            true
        } else {
            false
        }
    }

    /// Fade-out finished: hand over the latest payload for the batch swap.
    pub fn take_for_commit(&mut self) -> Option<T> {
        self.phase = Phase::Settling;
        self.pending.take()
    }

    /// Settle pause finished. Returns `true` when another payload was staged
    /// mid-window and a fresh commit pass is needed before fading back in.
    pub fn settle(&mut self) -> bool {
        if self.pending.is_some() {
            self.phase = Phase::FadingOut;
            true
        } else {
            self.phase = Phase::Idle;
            false
        }
    }
}

pub type SharedWindow<T> = Rc<RefCell<CommitWindow<Vec<T>>>>;

/// Stage `payload` into `displayed` behind the fade window: drop `visible`,
/// swap the rows in one go after [`FADE_OUT_MS`], then restore `visible`
/// after [`SWAP_SETTLE_MS`].
pub fn stage_refresh<T: Clone + Send + Sync + 'static>(
    window: &SharedWindow<T>,
    displayed: RwSignal<Vec<T>>,
    visible: RwSignal<bool>,
    payload: Vec<T>,
) {
    if !window.borrow_mut().stage(payload) {
        return;
    }
    visible.set(false);
    schedule_commit(window.clone(), displayed, visible);
}

fn schedule_commit<T: Clone + Send + Sync + 'static>(
    window: SharedWindow<T>,
    displayed: RwSignal<Vec<T>>,
    visible: RwSignal<bool>,
) {
    Timeout::new(FADE_OUT_MS, move || {
        if let Some(rows) = window.borrow_mut().take_for_commit() {
            displayed.set(rows);
        }
        let window = window.clone();
        Timeout::new(SWAP_SETTLE_MS, move || {
            if window.borrow_mut().settle() {
                // A newer payload landed mid-window; commit it before
                // becoming visible again.
                schedule_commit(window, displayed, visible);
            } else {
                visible.set(true);
            }
        })
        .forget();
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::CommitWindow;

    #[test]
    fn idle_stage_opens_a_window() {
        let mut window: CommitWindow<Vec<u32>> = CommitWindow::new();
        assert!(window.stage(vec![1]));
        assert_eq!(window.take_for_commit(), Some(vec![1]));
        assert!(!window.settle());
    }

    #[test]
    fn mid_window_payloads_coalesce_to_latest() {
        let mut window: CommitWindow<Vec<u32>> = CommitWindow::new();
        assert!(window.stage(vec![1]));
        // Two more refreshes land before the fade-out timer fires.
        assert!(!window.stage(vec![2]));
        assert!(!window.stage(vec![3]));
        assert_eq!(window.take_for_commit(), Some(vec![3]));
        assert!(!window.settle());
    }

    #[test]
    fn payload_staged_during_settle_restarts_the_commit() {
        let mut window: CommitWindow<Vec<u32>> = CommitWindow::new();
        assert!(window.stage(vec![1]));
        assert_eq!(window.take_for_commit(), Some(vec![1]));
        assert!(!window.stage(vec![2]));
        assert!(window.settle());
        assert_eq!(window.take_for_commit(), Some(vec![2]));
        assert!(!window.settle());
    }

    #[test]
    fn empty_commit_leaves_displayed_rows_alone() {
        let mut window: CommitWindow<Vec<u32>> = CommitWindow::new();
        assert!(window.stage(vec![1]));
        assert_eq!(window.take_for_commit(), Some(vec![1]));
        // Settle with nothing staged; a stray extra commit pass must not
        // clear anything.
        assert!(!window.settle());
        assert_eq!(window.take_for_commit(), None);
    }
}
