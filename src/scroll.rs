use std::fmt;

use tracing::trace;

use crate::phase::Phase;
use crate::state::PaginationState;

/// A scrollable surface that can report how far the user has scrolled.
///
/// Lists, rows, grids and staggered grids all reduce to the index of the
/// last slot currently on screen; indicator slots count as slots after the
/// last item.
pub trait ScrollableHost {
    /// `None` until the host has laid out at least one slot.
    fn last_visible_index(&self) -> Option<usize>;
}

/// Decides when scrolling has reached the tail of the loaded items and asks
/// the state for the next page.
#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    last_visible: Option<Option<usize>>,
    evaluated_seq: Option<u64>,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the latest visible index. Evaluates only when the index or the
    /// phase changed since the previous call, and returns whether a page
    /// request was started.
    pub fn observe<K, T, E>(
        &mut self,
        last_visible: Option<usize>,
        state: &mut PaginationState<K, T, E>,
    ) -> bool
    where
        K: Clone + PartialEq + fmt::Debug,
        T: Clone,
    {
        let seq = state.seq();
        if self.last_visible == Some(last_visible) && self.evaluated_seq == Some(seq) {
            return false;
        }
        self.last_visible = Some(last_visible);
        self.evaluated_seq = Some(seq);

        let fire = {
            let phase = state.phase();
            let tail = has_reached_tail(last_visible, phase.item_count());
            trace!(?last_visible, items = ?phase.item_count(), tail, "scroll evaluated");
            tail && matches!(
                phase,
                Phase::Loaded {
                    is_last_page: false,
                    ..
                }
            )
        };

        fire && state.request_next_page()
    }

    pub fn observe_host<H, K, T, E>(&mut self, host: &H, state: &mut PaginationState<K, T, E>) -> bool
    where
        H: ScrollableHost + ?Sized,
        K: Clone + PartialEq + fmt::Debug,
        T: Clone,
    {
        self.observe(host.last_visible_index(), state)
    }

    /// Forgets the last observation, e.g. after the host discarded its layout.
    pub fn reset(&mut self) {
        self.last_visible = None;
        self.evaluated_seq = None;
    }
}

/// Nothing visible never reaches the tail; neither does an unknown item count.
fn has_reached_tail(last_visible: Option<usize>, item_count: Option<usize>) -> bool {
    match (last_visible, item_count) {
        (Some(index), Some(count)) => index + 1 >= count,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::effects::TransitionWatcher;
    use crate::phase::{PageRequest, PhaseKind};

    type State = PaginationState<u32, char, &'static str>;

    struct Harness {
        state: State,
        watcher: TransitionWatcher,
        coordinator: ScrollCoordinator,
        calls: Arc<Mutex<Vec<u32>>>,
    }

    impl Harness {
        fn new(initial_key: u32) -> Self {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&calls);
            let state = PaginationState::new(initial_key, move |request: PageRequest<u32>| {
                sink.lock().unwrap().push(request.key);
            });
            let mut harness = Self {
                state,
                watcher: TransitionWatcher::new(),
                coordinator: ScrollCoordinator::new(),
                calls,
            };
            harness.settle();
            harness
        }

        fn settle(&mut self) {
            self.watcher.run(&mut self.state);
        }

        fn scroll_to(&mut self, index: Option<usize>) -> bool {
            let fired = self.coordinator.observe(index, &mut self.state);
            self.settle();
            fired
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct FixedHost(Option<usize>);

    impl ScrollableHost for FixedHost {
        fn last_visible_index(&self) -> Option<usize> {
            self.0
        }
    }

    #[test]
    fn scrolling_to_tail_requests_next_page_once() {
        let mut h = Harness::new(1);
        assert_eq!(h.calls(), vec![1]);

        h.state.append_page("abcdefghij".chars(), 2, false);
        assert_eq!(h.state.all_items().unwrap().len(), 10);

        assert!(!h.scroll_to(Some(5)));
        assert!(h.scroll_to(Some(9)));
        assert_eq!(h.calls(), vec![1, 2]);
        assert_eq!(h.state.phase_kind(), PhaseKind::Loading);
        assert_eq!(h.state.requested_key(), Some(2));
    }

    #[test]
    fn unchanged_index_does_not_fire_again() {
        let mut h = Harness::new(1);
        h.state.append_page("abcde".chars(), 2, false);
        assert!(h.scroll_to(Some(4)));
        assert!(!h.scroll_to(Some(4)));
        assert!(!h.scroll_to(Some(4)));
        assert_eq!(h.calls(), vec![1, 2]);
    }

    #[test]
    fn loads_only_one_page_after_a_scroll() {
        let mut h = Harness::new(1);
        h.state.append_page("abcde".chars(), 2, false);
        h.scroll_to(Some(4));
        h.state.append_page("fghij".chars(), 3, true);
        h.scroll_to(Some(4));
        assert_eq!(h.calls(), vec![1, 2]);
    }

    #[test]
    fn last_page_stops_requests_under_repeated_tail_events() {
        let mut h = Harness::new(1);
        h.state.append_page(['x'], 2, true);
        for index in [0, 1, 0, 3, 0] {
            assert!(!h.scroll_to(Some(index)));
        }
        assert_eq!(h.calls(), vec![1]);
    }

    #[test]
    fn no_request_while_loading_or_after_error() {
        let mut h = Harness::new(1);
        assert!(!h.scroll_to(Some(0)));

        h.state.append_page("abcde".chars(), 2, false);
        h.state.set_error("boom");
        assert!(!h.scroll_to(Some(4)));
        assert!(!h.scroll_to(Some(5)));
        assert_eq!(h.calls(), vec![1]);
        assert_eq!(h.state.phase_kind(), PhaseKind::Error);
    }

    #[test]
    fn nothing_visible_never_triggers() {
        let mut h = Harness::new(1);
        h.state.append_page(Vec::<char>::new(), 2, false);
        assert!(!h.scroll_to(None));
        assert_eq!(h.calls(), vec![1]);
    }

    #[test]
    fn phase_change_reevaluates_at_unchanged_index() {
        let mut h = Harness::new(1);
        h.state.append_page("abc".chars(), 2, false);
        assert!(h.scroll_to(Some(2)));

        // An empty page leaves the viewport at the tail.
        h.state.append_page(Vec::<char>::new(), 3, false);
        assert!(h.scroll_to(Some(2)));
        assert_eq!(h.calls(), vec![1, 2, 3]);
    }

    #[test]
    fn retry_after_new_page_error_requests_same_page() {
        let mut h = Harness::new(1);
        h.state.append_page(Vec::<char>::new(), 2, false);
        h.state.set_error("boom");
        h.state.retry_last_failed_request().unwrap();
        h.settle();
        assert!(!h.scroll_to(Some(0)));
        assert_eq!(h.calls(), vec![1, 2]);
        assert_eq!(h.state.phase_kind(), PhaseKind::Loading);
    }

    #[test]
    fn reads_index_through_host() {
        let mut h = Harness::new(1);
        h.state.append_page("ab".chars(), 2, false);
        assert!(!h.coordinator.observe_host(&FixedHost(Some(0)), &mut h.state));
        assert!(h.coordinator.observe_host(&FixedHost(Some(1)), &mut h.state));
    }

    #[test]
    fn tail_math() {
        assert!(has_reached_tail(Some(0), Some(0)));
        assert!(has_reached_tail(Some(9), Some(10)));
        assert!(has_reached_tail(Some(10), Some(10)));
        assert!(!has_reached_tail(Some(8), Some(10)));
        assert!(!has_reached_tail(None, Some(10)));
        assert!(!has_reached_tail(Some(100), None));
    }
}
