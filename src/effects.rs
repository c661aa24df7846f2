use std::fmt;

use crate::phase::{PageRequest, PhaseKind};
use crate::state::PaginationState;

/// Fires the side effects tied to entering a phase, once per phase value.
///
/// Run it after every render or observation cycle. A phase value is
/// identified by its `seq`, so re-running against an unchanged phase is a
/// no-op no matter how often the host re-renders.
#[derive(Debug, Default)]
pub struct TransitionWatcher {
    launched: Option<u64>,
    dispatched: Option<u64>,
}

impl TransitionWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches the first load of a fresh `Initial` phase, then sends the
    /// request of a `Loading` phase that has not been dispatched yet.
    ///
    /// Returns the request passed to `on_request_page`, if any.
    pub fn run<K, T, E>(&mut self, state: &mut PaginationState<K, T, E>) -> Option<PageRequest<K>>
    where
        K: Clone + PartialEq + fmt::Debug,
        T: Clone,
    {
        if state.phase_kind() == PhaseKind::Initial {
            let seq = state.seq();
            if self.launched != Some(seq) {
                self.launched = Some(seq);
                state.launch();
            }
        }

        let seq = state.seq();
        if self.dispatched == Some(seq) {
            return None;
        }

        let request = state.current_request()?;
        self.dispatched = Some(seq);
        state.dispatch(request.clone());
        Some(request)
    }
}
