//! Session
//!
//! Owns one `FilterState` plus its one-shot signals and implements the
//! processing-cycle protocol:
//!
//! 1. `begin_cycle()` runs first in every cycle. A reset requested in the
//!    previous cycle is applied here, before any control reads state.
//! 2. Edits arrive through `apply()`; each one updates its control pair
//!    synchronously.
//! 3. Queries read `state()`.
//!
//! `request_reset()` only records the request; state is never reset mid-cycle.

use crate::filter_state::{FilterState, PriceBounds};
use crate::sync::{FilterEvent, Signals, SyncController, SyncError};

#[derive(Debug, Clone)]
pub struct Session {
    state: FilterState,
    signals: Signals,
    reset_pending: bool,
    search_requested: bool,
}

impl Session {
    pub fn new(bounds: PriceBounds) -> Self {
        Self {
            state: FilterState::defaults(bounds),
            signals: Signals::default(),
            reset_pending: false,
            search_requested: false,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Start a processing cycle; returns `true` when a pending reset was applied
    pub fn begin_cycle(&mut self) -> bool {
        if !self.reset_pending {
            return false;
        }

        self.state = self.state.reset();
        self.signals = Signals::default();
        self.search_requested = false;
        self.reset_pending = false;
        tracing::debug!("Applied deferred filter reset");
        true
    }

    /// Apply one control edit through `controller`
    pub fn apply(&mut self, controller: &SyncController<'_>, event: FilterEvent) -> Result<(), SyncError> {
        controller.apply(&mut self.state, &mut self.signals, event)
    }

    /// Schedule a reset for the start of the next cycle
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Switch from the top-picks preview to filtered results
    pub fn request_search(&mut self) {
        self.search_requested = true;
    }

    pub fn search_requested(&self) -> bool {
        self.search_requested
    }

    pub fn take_filters_changed(&mut self) -> bool {
        self.signals.filters_changed.take()
    }

    pub fn take_perfect_match(&mut self) -> bool {
        self.signals.perfect_match.take()
    }
}
