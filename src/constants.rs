use std::time::Duration;

// Default endpoint and policy values for the ETL job; config.toml and the
// environment can override the endpoint and retry attempts.

/// Base URL of the animals API.
pub const DEFAULT_API_URL: &str = "http://localhost:3123/animals/v1";

/// Number of records posted to the destination per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Total request attempts per endpoint call (initial try + retries).
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 5;

/// Base delay for exponential backoff between retries.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Backoff delay doubles on every retry.
pub const BACKOFF_MULTIPLIER: u32 = 2;

/// Backoff delay cap.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(16000);

/// Maximum exponent for the backoff calculation to prevent overflow.
pub const MAX_BACKOFF_EXPONENT: u32 = 30;

/// A page round trip slower than this is taken as a sign of server strain.
pub const DEFAULT_SLOW_PAGE_THRESHOLD: Duration = Duration::from_secs(5);

/// How long to pause between pages after a slow round trip.
pub const DEFAULT_SLOW_PAGE_PAUSE: Duration = Duration::from_secs(5);
