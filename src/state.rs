use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{PagerError, Result};
use crate::phase::{Page, PageRequest, Phase, PhaseKind, Snapshot, Successor};

type RequestPage<K> = Box<dyn FnMut(PageRequest<K>) + Send>;

/// Outcome of [`PaginationState::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The request predates the last refresh; nothing changed.
    Stale,
}

/// Owner of the pagination phase for one list session.
///
/// The phase lives in a `watch` cell: every transition replaces the current
/// value and wakes subscribers, who always read a whole, consistent
/// [`Snapshot`]. Mutations take `&mut self`, so there is exactly one writer.
pub struct PaginationState<K, T, E> {
    cell: watch::Sender<Snapshot<K, T, E>>,
    on_request_page: RequestPage<K>,
}

impl<K, T, E> fmt::Debug for PaginationState<K, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.cell.borrow();
        f.debug_struct("PaginationState")
            .field("phase", &snapshot.phase.kind())
            .field("seq", &snapshot.seq)
            .field("generation", &snapshot.generation)
            .finish_non_exhaustive()
    }
}

impl<K, T, E> PaginationState<K, T, E>
where
    K: Clone + PartialEq + fmt::Debug,
    T: Clone,
{
    /// Starts in `Initial`. The first request goes out once a
    /// [`TransitionWatcher`](crate::TransitionWatcher) runs against this state.
    pub fn new<F>(initial_key: K, on_request_page: F) -> Self
    where
        F: FnMut(PageRequest<K>) + Send + 'static,
    {
        let (cell, _) = watch::channel(Snapshot {
            seq: 0,
            generation: 0,
            phase: Phase::Initial { initial_key },
        });

        Self {
            cell,
            on_request_page: Box::new(on_request_page),
        }
    }

    pub fn snapshot(&self) -> Snapshot<K, T, E> {
        self.cell.borrow().clone()
    }

    pub fn phase(&self) -> Phase<K, T, E> {
        self.cell.borrow().phase.clone()
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.cell.borrow().phase.kind()
    }

    pub fn seq(&self) -> u64 {
        self.cell.borrow().seq
    }

    pub fn generation(&self) -> u64 {
        self.cell.borrow().generation
    }

    pub fn initial_key(&self) -> K {
        self.cell.borrow().phase.initial_key().clone()
    }

    /// Receiver woken on every transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<K, T, E>> {
        self.cell.subscribe()
    }

    pub fn requested_key(&self) -> Option<K> {
        self.cell.borrow().phase.requested_key().cloned()
    }

    /// Every item appended since the last refresh.
    ///
    /// Fails with [`PagerError::EmptyState`] until a page has been appended;
    /// check the phase first instead of relying on this error.
    pub fn all_items(&self) -> Result<Arc<Vec<T>>> {
        self.cell
            .borrow()
            .phase
            .items()
            .cloned()
            .ok_or(PagerError::EmptyState)
    }

    /// Appends a page and moves to `Loaded`.
    ///
    /// Accepted in any phase. Without a prior request the initial key is
    /// recorded as the requested one.
    pub fn append_page<I>(&mut self, items: I, next_key: K, is_last_page: bool)
    where
        I: IntoIterator<Item = T>,
    {
        self.transition(|previous| {
            let initial_key = previous.initial_key().clone();
            let requested_key = previous
                .requested_key()
                .cloned()
                .unwrap_or_else(|| initial_key.clone());

            let mut all = previous.into_items().unwrap_or_default();
            Arc::make_mut(&mut all).extend(items);

            Phase::Loaded {
                initial_key,
                requested_key,
                next_key,
                items: all,
                is_last_page,
            }
        });
    }

    /// Records a failed fetch and moves to `Error`, keeping loaded items.
    ///
    /// After `Loaded` the failure belongs to the page that was about to be
    /// fetched, so its `next_key` becomes the requested key.
    pub fn set_error(&mut self, cause: E) {
        self.transition(|previous| {
            let initial_key = previous.initial_key().clone();
            let requested_key = match &previous {
                Phase::Loaded { next_key, .. } => next_key.clone(),
                other => other
                    .requested_key()
                    .cloned()
                    .unwrap_or_else(|| initial_key.clone()),
            };

            Phase::Error {
                initial_key,
                requested_key,
                items: previous.into_items(),
                cause: Arc::new(cause),
            }
        });
    }

    /// Re-requests exactly the page that failed.
    pub fn retry_last_failed_request(&mut self) -> Result<()> {
        let phase = self.phase_kind();
        if phase != PhaseKind::Error {
            return Err(PagerError::InvalidState { phase });
        }

        self.transition_if(|previous| match previous {
            Phase::Error {
                initial_key,
                requested_key,
                items,
                ..
            } => Ok(Phase::Loading {
                initial_key,
                requested_key,
                items,
            }),
            other => Err(other),
        });
        Ok(())
    }

    /// Drops everything and starts over from `Initial`, optionally with a new
    /// initial key. Results of requests made before the refresh become stale.
    pub fn refresh(&mut self, initial_key: Option<K>) {
        self.cell.send_modify(|snapshot| {
            let initial_key =
                initial_key.unwrap_or_else(|| snapshot.phase.initial_key().clone());
            snapshot.phase = Phase::Initial { initial_key };
            snapshot.generation += 1;
            snapshot.seq += 1;
        });
        self.log_transition();
    }

    /// Applies a fetch result if it belongs to the current generation.
    pub fn complete(
        &mut self,
        request: &PageRequest<K>,
        outcome: std::result::Result<Page<K, T>, E>,
    ) -> Completion {
        let generation = self.generation();
        if request.generation != generation {
            debug!(
                key = ?request.key,
                request_generation = request.generation,
                generation,
                "dropping stale page result"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(page) => self.append_page(page.items, page.next_key, page.is_last_page),
            Err(cause) => self.set_error(cause),
        }
        Completion::Applied
    }

    /// The request the current `Loading` phase stands for.
    pub fn current_request(&self) -> Option<PageRequest<K>> {
        let snapshot = self.cell.borrow();
        match &snapshot.phase {
            Phase::Loading { requested_key, .. } => Some(PageRequest {
                key: requested_key.clone(),
                generation: snapshot.generation,
            }),
            _ => None,
        }
    }

    /// `Initial -> Loading(initial_key)`.
    pub(crate) fn launch(&mut self) -> bool {
        self.transition_if(|previous| match previous {
            Phase::Initial { initial_key } => Ok(Phase::Loading {
                requested_key: initial_key.clone(),
                initial_key,
                items: None,
            }),
            other => Err(other),
        })
    }

    /// `Loaded -> Loading(next_key)`, unless the last page is already in.
    pub(crate) fn request_next_page(&mut self) -> bool {
        self.transition_if(|previous| match previous {
            Phase::Loaded {
                initial_key,
                next_key,
                items,
                is_last_page: false,
                ..
            } => Ok(Phase::Loading {
                initial_key,
                requested_key: next_key,
                items: Some(items),
            }),
            other => Err(other),
        })
    }

    pub(crate) fn dispatch(&mut self, request: PageRequest<K>) {
        debug!(key = ?request.key, generation = request.generation, "requesting page");
        (self.on_request_page)(request);
    }

    fn transition<F>(&mut self, next: F)
    where
        F: FnOnce(Phase<K, T, E>) -> Phase<K, T, E>,
    {
        self.transition_if(|previous| Ok(next(previous)));
    }

    /// Runs `next` on the owned current phase. `Err` hands the phase back
    /// untouched and subscribers are not woken.
    fn transition_if<F>(&mut self, next: F) -> bool
    where
        F: FnOnce(Phase<K, T, E>) -> std::result::Result<Phase<K, T, E>, Phase<K, T, E>>,
    {
        let changed = self.cell.send_if_modified(|snapshot| {
            let placeholder = Phase::Initial {
                initial_key: snapshot.phase.initial_key().clone(),
            };
            let previous = std::mem::replace(&mut snapshot.phase, placeholder);
            match next(previous) {
                Ok(phase) => {
                    snapshot.phase = phase;
                    snapshot.seq += 1;
                    true
                }
                Err(unchanged) => {
                    snapshot.phase = unchanged;
                    false
                }
            }
        });

        if changed {
            self.log_transition();
        }
        changed
    }

    fn log_transition(&self) {
        let snapshot = self.cell.borrow();
        debug!(
            phase = %snapshot.phase.kind(),
            seq = snapshot.seq,
            generation = snapshot.generation,
            items = ?snapshot.phase.item_count(),
            "pagination transition"
        );
    }
}

impl<K, T, E> PaginationState<K, T, E>
where
    K: Clone + PartialEq + fmt::Debug + Successor,
    T: Clone,
{
    /// [`append_page`](Self::append_page) for counter keys: the next key is
    /// the one after the requested key.
    pub fn append_next_page<I>(&mut self, items: I, is_last_page: bool)
    where
        I: IntoIterator<Item = T>,
    {
        let next_key = self
            .requested_key()
            .unwrap_or_else(|| self.initial_key())
            .successor();
        self.append_page(items, next_key, is_last_page);
    }
}
