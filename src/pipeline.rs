use serde::Serialize;
use tracing::{error, info};

use crate::api::AnimalApi;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::publisher::{BatchStatus, Publisher};
use crate::transform::transform_animal;
use crate::types::Animal;

/// Result of a complete ETL run
#[derive(Debug, Serialize)]
pub struct EtlResult {
    pub total_fetched: usize,
    pub batches_posted: usize,
    pub batches_rejected: usize,
    pub batches_failed: usize,
    pub errors: Vec<String>,
}

/// Sequences the three stages: fetch every page, normalize every record,
/// post in fixed-size batches. Failures below the run level are contained
/// and tallied; only an empty fetch ends the run early.
pub struct EtlPipeline {
    api: AnimalApi,
    config: Config,
}

impl EtlPipeline {
    pub fn new(config: Config) -> Self {
        let api = AnimalApi::new(config.api_url.clone(), config.retry_policy());
        Self { api, config }
    }

    pub async fn run(&self) -> Result<EtlResult> {
        // Step 1: Fetch all animals
        info!("📡 Fetching all animal details...");
        let fetcher = Fetcher::new(&self.api, self.config.slow_page_policy());
        let animals = fetcher.fetch_all().await;

        if animals.is_empty() {
            error!("No animals data fetched. Exiting...");
            return Ok(EtlResult {
                total_fetched: 0,
                batches_posted: 0,
                batches_rejected: 0,
                batches_failed: 0,
                errors: vec!["no animals fetched".to_string()],
            });
        }
        info!("✅ Fetched {} animals in total", animals.len());

        // Step 2: Transform animal data
        info!("🔧 Transforming animal data...");
        let transformed: Vec<Animal> = animals.into_iter().map(transform_animal).collect();

        // Step 3: Post animals in batches
        info!(
            "📦 Posting animal data in batches of {}...",
            self.config.batch_size
        );
        let publisher = Publisher::new(&self.api);
        let mut posted = 0;
        let mut rejected = 0;
        let mut failed = 0;
        let mut errors = Vec::new();

        for (index, batch) in transformed.chunks(self.config.batch_size).enumerate() {
            let batch_number = index + 1;
            match publisher.post_batch(batch).await {
                Ok(BatchStatus::Posted) => {
                    info!("Successfully posted batch {}", batch_number);
                    posted += 1;
                }
                Ok(BatchStatus::Rejected) => {
                    // Already logged by the publisher; a shape problem will
                    // not get better on retry.
                    rejected += 1;
                }
                Err(e) => {
                    error!("Error posting animals: {}", e);
                    errors.push(format!("batch {batch_number}: {e}"));
                    failed += 1;
                }
            }
        }

        Ok(EtlResult {
            total_fetched: transformed.len(),
            batches_posted: posted,
            batches_rejected: rejected,
            batches_failed: failed,
            errors,
        })
    }
}
