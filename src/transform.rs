use chrono::{TimeZone, Utc};
use tracing::error;

use crate::types::{Animal, BornAt, Friends};

/// Normalizes the `friends` and `born_at` fields of one animal.
///
/// `friends` becomes a list of names (empty when the source field was empty
/// or absent); `born_at` becomes an ISO-8601 UTC timestamp, or null when the
/// source value cannot be converted. Everything else passes through
/// untouched. Must be applied at most once per record.
pub fn transform_animal(mut animal: Animal) -> Animal {
    animal.friends = Some(Friends::List(match animal.friends.take() {
        Some(Friends::Raw(s)) if !s.is_empty() => {
            s.split(',').map(str::to_string).collect()
        }
        Some(Friends::List(list)) => list,
        _ => Vec::new(),
    }));

    animal.born_at = match animal.born_at.take() {
        Some(BornAt::Millis(ms)) => match Utc.timestamp_millis_opt(ms).single() {
            Some(ts) => Some(BornAt::Timestamp(ts.to_rfc3339())),
            None => {
                error!(
                    "Error converting 'born_at' for animal {}: {} ms is out of range",
                    animal.id, ms
                );
                None
            }
        },
        other => other,
    };

    animal
}
