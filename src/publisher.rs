use tracing::{debug, error};

use crate::api::AnimalApi;
use crate::error::Result;
use crate::types::{Animal, BornAt, Friends};

/// Outcome of posting one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The batch passed validation and was accepted by the destination.
    Posted,
    /// A record failed shape validation; nothing was sent.
    Rejected,
}

/// Validates and posts fixed-size batches to the home endpoint.
pub struct Publisher<'a> {
    api: &'a AnimalApi,
}

impl<'a> Publisher<'a> {
    pub fn new(api: &'a AnimalApi) -> Self {
        Self { api }
    }

    /// Post one batch. A validation failure rejects the whole batch without
    /// sending anything and without raising an error; a request failure
    /// (after retries) is returned to the caller.
    pub async fn post_batch(&self, batch: &[Animal]) -> Result<BatchStatus> {
        debug!("Posting batch of {} animals", batch.len());

        for animal in batch {
            if !matches!(animal.friends, Some(Friends::List(_))) {
                error!(
                    "Validation Error: 'friends' should be a list. Found: {:?}",
                    animal.friends
                );
                return Ok(BatchStatus::Rejected);
            }
            if matches!(animal.born_at, Some(BornAt::Millis(_))) {
                error!(
                    "Validation Error: 'born_at' should be a string or null. Found: {:?}",
                    animal.born_at
                );
                return Ok(BatchStatus::Rejected);
            }
        }

        self.api.post_home(batch).await?;
        Ok(BatchStatus::Posted)
    }
}
