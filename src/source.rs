use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::phase::{Page, PageRequest};

/// Where pages come from. Implemented by the host; the state machine only
/// ever sees the results.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Key: Clone + Send + 'static;
    type Item: Send + 'static;
    type Error: Send + 'static;

    async fn fetch_page(&self, key: Self::Key) -> Result<Page<Self::Key, Self::Item>, Self::Error>;
}

/// A finished fetch together with the request it answers.
#[derive(Debug)]
pub struct FetchDone<K, T, E> {
    pub request: PageRequest<K>,
    pub outcome: Result<Page<K, T>, E>,
}

pub type SourceFetch<S> =
    FetchDone<<S as PageSource>::Key, <S as PageSource>::Item, <S as PageSource>::Error>;

/// Runs one fetch on a tokio task and hands the result to `on_done`.
///
/// `on_done` runs on the worker task; it should forward the result to
/// whoever owns the [`PaginationState`](crate::PaginationState), typically
/// over a channel, and let the owner call
/// [`complete`](crate::PaginationState::complete).
pub fn spawn_fetch<S, F>(source: Arc<S>, request: PageRequest<S::Key>, on_done: F) -> JoinHandle<()>
where
    S: PageSource + ?Sized + 'static,
    F: FnOnce(SourceFetch<S>) + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = source.fetch_page(request.key.clone()).await;
        on_done(FetchDone { request, outcome });
    })
}
