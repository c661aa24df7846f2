//! What a host should show for a phase.
//!
//! Indicator slots sit after the data rows and carry keys of their own, so a
//! host that diffs rows by key never mistakes them for items.

use crate::phase::Phase;

/// Non-data slot appended after the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    NewPageProgress,
    NewPageError,
}

impl Sentinel {
    /// Stable key for hosts that key rows by string.
    pub fn key(&self) -> &'static str {
        match self {
            Sentinel::NewPageProgress => "lazy-pager:new-page-progress-indicator",
            Sentinel::NewPageError => "lazy-pager:new-page-error-indicator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey<I> {
    Item(I),
    Sentinel(Sentinel),
}

/// Indicator trailing the loaded items.
#[derive(Debug, PartialEq)]
pub enum Trailer<'a, E> {
    NewPageProgress,
    NewPageError(&'a E),
}

impl<E> Trailer<'_, E> {
    pub fn sentinel(&self) -> Sentinel {
        match self {
            Trailer::NewPageProgress => Sentinel::NewPageProgress,
            Trailer::NewPageError(_) => Sentinel::NewPageError,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Surface<'a, T, E> {
    /// `Initial`: nothing is requested yet.
    Blank,
    FirstPageProgress,
    FirstPageError(&'a E),
    Content {
        items: &'a [T],
        trailer: Option<Trailer<'a, E>>,
    },
}

impl<'a, T, E> Surface<'a, T, E> {
    /// Scrollable slots: items plus the trailing indicator.
    pub fn slot_count(&self) -> usize {
        match self {
            Surface::Content { items, trailer } => items.len() + usize::from(trailer.is_some()),
            _ => 0,
        }
    }

    pub fn slot_key<I, F>(&self, index: usize, item_key: F) -> Option<SlotKey<I>>
    where
        F: FnOnce(usize, &T) -> I,
    {
        let Surface::Content { items, trailer } = self else {
            return None;
        };

        match items.get(index) {
            Some(item) => Some(SlotKey::Item(item_key(index, item))),
            None if index == items.len() => trailer
                .as_ref()
                .map(|trailer| SlotKey::Sentinel(trailer.sentinel())),
            None => None,
        }
    }
}

impl<K, T, E> Phase<K, T, E> {
    pub fn surface(&self) -> Surface<'_, T, E> {
        match self {
            Phase::Initial { .. } => Surface::Blank,
            Phase::Loading { items: None, .. } => Surface::FirstPageProgress,
            Phase::Error {
                items: None, cause, ..
            } => Surface::FirstPageError(&**cause),
            Phase::Loading {
                items: Some(items), ..
            } => Surface::Content {
                items: items.as_slice(),
                trailer: Some(Trailer::NewPageProgress),
            },
            Phase::Error {
                items: Some(items),
                cause,
                ..
            } => Surface::Content {
                items: items.as_slice(),
                trailer: Some(Trailer::NewPageError(&**cause)),
            },
            Phase::Loaded { items, .. } => Surface::Content {
                items: items.as_slice(),
                trailer: None,
            },
        }
    }
}

/// Optional renderers for the four indicator slots.
///
/// Purely presentational: the state machine never looks at these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators<S> {
    pub first_page_progress: Option<S>,
    pub first_page_error: Option<S>,
    pub new_page_progress: Option<S>,
    pub new_page_error: Option<S>,
}

impl<S> Default for Indicators<S> {
    fn default() -> Self {
        Self {
            first_page_progress: None,
            first_page_error: None,
            new_page_progress: None,
            new_page_error: None,
        }
    }
}

impl<S> Indicators<S> {
    /// The indicator a surface asks for, if the host configured one.
    pub fn for_surface<T, E>(&self, surface: &Surface<'_, T, E>) -> Option<&S> {
        match surface {
            Surface::Blank => None,
            Surface::FirstPageProgress => self.first_page_progress.as_ref(),
            Surface::FirstPageError(_) => self.first_page_error.as_ref(),
            Surface::Content { trailer, .. } => match trailer {
                None => None,
                Some(Trailer::NewPageProgress) => self.new_page_progress.as_ref(),
                Some(Trailer::NewPageError(_)) => self.new_page_error.as_ref(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    type TestPhase = Phase<u32, &'static str, &'static str>;

    fn loading(items: Option<Vec<&'static str>>) -> TestPhase {
        Phase::Loading {
            initial_key: 1,
            requested_key: 2,
            items: items.map(Arc::new),
        }
    }

    fn error(items: Option<Vec<&'static str>>) -> TestPhase {
        Phase::Error {
            initial_key: 1,
            requested_key: 2,
            items: items.map(Arc::new),
            cause: Arc::new("New page error"),
        }
    }

    #[test]
    fn first_page_surfaces() {
        let initial: TestPhase = Phase::Initial { initial_key: 1 };
        assert_eq!(initial.surface(), Surface::Blank);
        assert_eq!(loading(None).surface(), Surface::FirstPageProgress);
        assert_eq!(
            error(None).surface(),
            Surface::FirstPageError(&"New page error")
        );
    }

    #[test]
    fn new_page_indicators_trail_items() {
        let phase = loading(Some(vec!["a", "b"]));
        let surface = phase.surface();
        assert_eq!(surface.slot_count(), 3);
        assert_eq!(
            surface.slot_key(2, |_, item| *item),
            Some(SlotKey::Sentinel(Sentinel::NewPageProgress))
        );
        assert_eq!(surface.slot_key(0, |_, item| *item), Some(SlotKey::Item("a")));
        assert_eq!(surface.slot_key(3, |_, item| *item), None);

        let phase = error(Some(vec!["a"]));
        assert_eq!(
            phase.surface().slot_key(1, |index, _| index),
            Some(SlotKey::Sentinel(Sentinel::NewPageError))
        );
    }

    #[test]
    fn loaded_has_no_trailer() {
        let phase: TestPhase = Phase::Loaded {
            initial_key: 1,
            requested_key: 1,
            next_key: 2,
            items: Arc::new(vec!["a"]),
            is_last_page: false,
        };
        let surface = phase.surface();
        assert_eq!(surface.slot_count(), 1);
        assert_eq!(surface.slot_key(1, |index, _| index), None);
    }

    #[test]
    fn indicators_follow_surface() {
        let indicators = Indicators {
            first_page_progress: Some("loading first"),
            first_page_error: Some("first failed"),
            new_page_progress: Some("loading more"),
            new_page_error: None,
        };

        assert_eq!(
            indicators.for_surface(&loading(None).surface()),
            Some(&"loading first")
        );
        assert_eq!(
            indicators.for_surface(&loading(Some(vec![])).surface()),
            Some(&"loading more")
        );
        assert_eq!(indicators.for_surface(&error(Some(vec![])).surface()), None);
        assert_eq!(
            indicators.for_surface(&error(None).surface()),
            Some(&"first failed")
        );
    }

    #[test]
    fn sentinel_keys_are_distinct() {
        assert_ne!(Sentinel::NewPageProgress.key(), Sentinel::NewPageError.key());
    }
}
