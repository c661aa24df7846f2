use std::fmt;
use std::sync::Arc;

/// Lifecycle tag of a [`Phase`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Initial,
    Loading,
    Loaded,
    Error,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Initial => write!(f, "Initial"),
            PhaseKind::Loading => write!(f, "Loading"),
            PhaseKind::Loaded => write!(f, "Loaded"),
            PhaseKind::Error => write!(f, "Error"),
        }
    }
}

/// Current lifecycle state of a paginated list.
///
/// `items` is the concatenation of every page appended so far, in fetch
/// order. It is `None` only until the first page lands.
#[derive(Debug)]
pub enum Phase<K, T, E> {
    Initial {
        initial_key: K,
    },
    Loading {
        initial_key: K,
        requested_key: K,
        items: Option<Arc<Vec<T>>>,
    },
    Loaded {
        initial_key: K,
        requested_key: K,
        next_key: K,
        items: Arc<Vec<T>>,
        is_last_page: bool,
    },
    Error {
        initial_key: K,
        requested_key: K,
        items: Option<Arc<Vec<T>>>,
        cause: Arc<E>,
    },
}

// Manual impl: items and cause sit behind `Arc`, so only the key needs `Clone`.
impl<K: Clone, T, E> Clone for Phase<K, T, E> {
    fn clone(&self) -> Self {
        match self {
            Phase::Initial { initial_key } => Phase::Initial {
                initial_key: initial_key.clone(),
            },
            Phase::Loading {
                initial_key,
                requested_key,
                items,
            } => Phase::Loading {
                initial_key: initial_key.clone(),
                requested_key: requested_key.clone(),
                items: items.clone(),
            },
            Phase::Loaded {
                initial_key,
                requested_key,
                next_key,
                items,
                is_last_page,
            } => Phase::Loaded {
                initial_key: initial_key.clone(),
                requested_key: requested_key.clone(),
                next_key: next_key.clone(),
                items: Arc::clone(items),
                is_last_page: *is_last_page,
            },
            Phase::Error {
                initial_key,
                requested_key,
                items,
                cause,
            } => Phase::Error {
                initial_key: initial_key.clone(),
                requested_key: requested_key.clone(),
                items: items.clone(),
                cause: Arc::clone(cause),
            },
        }
    }
}

impl<K, T, E> Phase<K, T, E> {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Initial { .. } => PhaseKind::Initial,
            Phase::Loading { .. } => PhaseKind::Loading,
            Phase::Loaded { .. } => PhaseKind::Loaded,
            Phase::Error { .. } => PhaseKind::Error,
        }
    }

    pub fn initial_key(&self) -> &K {
        match self {
            Phase::Initial { initial_key }
            | Phase::Loading { initial_key, .. }
            | Phase::Loaded { initial_key, .. }
            | Phase::Error { initial_key, .. } => initial_key,
        }
    }

    /// Key of the page most recently asked for, if any request was made.
    pub fn requested_key(&self) -> Option<&K> {
        match self {
            Phase::Initial { .. } => None,
            Phase::Loading { requested_key, .. }
            | Phase::Loaded { requested_key, .. }
            | Phase::Error { requested_key, .. } => Some(requested_key),
        }
    }

    pub fn next_key(&self) -> Option<&K> {
        match self {
            Phase::Loaded { next_key, .. } => Some(next_key),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&Arc<Vec<T>>> {
        match self {
            Phase::Initial { .. } => None,
            Phase::Loading { items, .. } | Phase::Error { items, .. } => items.as_ref(),
            Phase::Loaded { items, .. } => Some(items),
        }
    }

    pub fn item_count(&self) -> Option<usize> {
        self.items().map(|items| items.len())
    }

    /// Only a `Loaded` phase can claim there are no more pages.
    pub fn is_last_page(&self) -> bool {
        matches!(
            self,
            Phase::Loaded {
                is_last_page: true,
                ..
            }
        )
    }

    pub fn cause(&self) -> Option<&E> {
        match self {
            Phase::Error { cause, .. } => Some(&**cause),
            _ => None,
        }
    }

    pub(crate) fn into_items(self) -> Option<Arc<Vec<T>>> {
        match self {
            Phase::Initial { .. } => None,
            Phase::Loading { items, .. } | Phase::Error { items, .. } => items,
            Phase::Loaded { items, .. } => Some(items),
        }
    }
}

/// One observed value of the pagination cell.
///
/// `seq` changes on every transition, so two snapshots with the same `seq`
/// describe the same phase value. `generation` changes on every refresh.
#[derive(Debug)]
pub struct Snapshot<K, T, E> {
    pub seq: u64,
    pub generation: u64,
    pub phase: Phase<K, T, E>,
}

impl<K: Clone, T, E> Clone for Snapshot<K, T, E> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            generation: self.generation,
            phase: self.phase.clone(),
        }
    }
}

/// Handed to `on_request_page` each time the state enters `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    pub key: K,
    pub generation: u64,
}

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<K, T> {
    pub items: Vec<T>,
    pub next_key: K,
    pub is_last_page: bool,
}

impl<K, T> Page<K, T> {
    pub fn new(items: Vec<T>, next_key: K) -> Self {
        Self {
            items,
            next_key,
            is_last_page: false,
        }
    }

    pub fn last(items: Vec<T>, next_key: K) -> Self {
        Self {
            items,
            next_key,
            is_last_page: true,
        }
    }
}

/// Keys that know which page comes after them, for plain page counters.
pub trait Successor {
    fn successor(&self) -> Self;
}

macro_rules! impl_successor {
    ($($ty:ty),*) => {
        $(
            impl Successor for $ty {
                fn successor(&self) -> Self {
                    self.saturating_add(1)
                }
            }
        )*
    };
}

impl_successor!(u8, u16, u32, u64, usize, i32, i64);
