use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::api::AnimalApi;
use crate::constants::{DEFAULT_SLOW_PAGE_PAUSE, DEFAULT_SLOW_PAGE_THRESHOLD};
use crate::error::EtlError;
use crate::types::Animal;

/// Inter-page pause heuristic: a page round trip slower than `threshold`
/// is read as server strain, and the fetcher sleeps `pause` before the
/// next page. This is a latency heuristic, not real backpressure; the
/// server offers no load signal to act on.
#[derive(Debug, Clone)]
pub struct SlowPagePolicy {
    pub threshold: Duration,
    pub pause: Duration,
}

impl Default for SlowPagePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SLOW_PAGE_THRESHOLD,
            pause: DEFAULT_SLOW_PAGE_PAUSE,
        }
    }
}

impl SlowPagePolicy {
    /// Pause to take after a page that took `elapsed`, if any.
    pub fn pause_needed(&self, elapsed: Duration) -> Option<Duration> {
        (elapsed > self.threshold).then_some(self.pause)
    }
}

/// Drains the paginated listing endpoint into an in-memory sequence.
pub struct Fetcher<'a> {
    api: &'a AnimalApi,
    slow_page: SlowPagePolicy,
}

impl<'a> Fetcher<'a> {
    pub fn new(api: &'a AnimalApi, slow_page: SlowPagePolicy) -> Self {
        Self { api, slow_page }
    }

    /// Fetch every page starting at 1 until the server returns an empty
    /// page. A malformed response or a request failure (after retries)
    /// stops pagination; whatever was accumulated so far is returned.
    pub async fn fetch_all(&self) -> Vec<Animal> {
        let mut animals = Vec::new();
        let mut page = 1u32;

        loop {
            let started = Instant::now();
            match self.api.get_animals(page).await {
                Ok(response) => {
                    let Some(items) = response.items else {
                        let err = EtlError::MissingField(format!("'items' in page {page} response"));
                        error!("Stopping pagination: {}", err);
                        break;
                    };
                    if items.is_empty() {
                        break;
                    }

                    info!("Fetched {} animals from page {}", items.len(), page);
                    animals.extend(items);
                    page += 1;

                    let elapsed = started.elapsed();
                    if let Some(pause) = self.slow_page.pause_needed(elapsed) {
                        warn!(
                            "Server pause detected, response took {:.2} seconds. Pausing for {} seconds.",
                            elapsed.as_secs_f64(),
                            pause.as_secs()
                        );
                        tokio::time::sleep(pause).await;
                    }
                }
                Err(e) => {
                    error!("Error fetching animals: {}", e);
                    break;
                }
            }
        }

        animals
    }
}
