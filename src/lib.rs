//! Pagination state for lazily loaded, scrollable lists.
//!
//! [`PaginationState`] owns the lifecycle of a paged list
//! (`Initial -> Loading -> Loaded | Error`). [`TransitionWatcher`] fires the
//! page request each time the state enters `Loading`, and
//! [`ScrollCoordinator`] moves the state into `Loading` when the host has
//! scrolled to the last loaded item.
//!
//! ```
//! use lazy_pager::{PaginationState, PhaseKind, ScrollCoordinator, TransitionWatcher};
//!
//! let mut state: PaginationState<u32, String, String> = PaginationState::new(1, |request| {
//!     // Start fetching `request.key` here.
//!     let _ = request;
//! });
//! let mut watcher = TransitionWatcher::new();
//! let mut coordinator = ScrollCoordinator::new();
//!
//! watcher.run(&mut state); // requests page 1
//! state.append_page(vec!["a".to_string(), "b".to_string()], 2, false);
//!
//! assert!(coordinator.observe(Some(1), &mut state));
//! assert_eq!(state.phase_kind(), PhaseKind::Loading);
//! assert_eq!(watcher.run(&mut state).map(|request| request.key), Some(2));
//! ```

pub mod effects;
pub mod error;
pub mod phase;
pub mod scroll;
pub mod slots;
pub mod source;
pub mod state;

pub use effects::TransitionWatcher;
pub use error::{PagerError, Result};
pub use phase::{Page, PageRequest, Phase, PhaseKind, Snapshot, Successor};
pub use scroll::{ScrollCoordinator, ScrollableHost};
pub use slots::{Indicators, Sentinel, SlotKey, Surface, Trailer};
pub use source::{spawn_fetch, FetchDone, PageSource, SourceFetch};
pub use state::{Completion, PaginationState};
