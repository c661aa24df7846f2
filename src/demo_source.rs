use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lazy_pager::{Page, PageSource};
use thiserror::Error;

use crate::config::SourceConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Something went wrong loading page {page} (attempt {attempt}). Try again.")]
pub struct FetchError {
    pub page: u32,
    pub attempt: u32,
}

/// In-memory pages of `"Item n"` strings with scripted failures.
#[derive(Debug)]
pub struct DemoSource {
    page_size: usize,
    total_pages: u32,
    latency: Duration,
    fail_on_attempts: Vec<u32>,
    fast: bool,
    attempts: AtomicU32,
}

impl DemoSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            page_size: config.page_size,
            total_pages: config.total_pages,
            latency: Duration::from_millis(config.latency_ms),
            fail_on_attempts: config.fail_on_attempts.clone(),
            fast: config.fast,
            attempts: AtomicU32::new(0),
        }
    }

    fn items(&self, page: u32) -> Vec<String> {
        let size = self.page_size as u64;
        let start = u64::from(page.saturating_sub(1)) * size + 1;
        (start..start + size).map(|n| format!("Item {n}")).collect()
    }
}

#[async_trait]
impl PageSource for DemoSource {
    type Key = u32;
    type Item = String;
    type Error = FetchError;

    async fn fetch_page(&self, page: u32) -> Result<Page<u32, String>, FetchError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let instant = self.fast && attempt == 1;

        if !instant {
            tokio::time::sleep(self.latency).await;
        }

        if !instant && self.fail_on_attempts.contains(&attempt) {
            tracing::debug!(page, attempt, "simulated failure");
            return Err(FetchError { page, attempt });
        }

        Ok(Page {
            items: self.items(page),
            next_key: page + 1,
            is_last_page: page >= self.total_pages,
        })
    }
}
