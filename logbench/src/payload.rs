//! Synthetic log events for the ingestion workload.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;

time::serde::format_description!(
    utc_seconds,
    OffsetDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
);

/// Candidate values of the event `name` field.
pub const EVENT_NAMES: [&str; 5] = ["event_1", "event_2", "event_3", "event_4", "event_5"];

/// Searchable keys used when none are configured.
pub const DEFAULT_SEARCHABLE_KEYS: [&str; 2] = ["folan1", "folan2"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub name: String,
    /// Serialized in UTC at second precision: `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(with = "utc_seconds")]
    pub timestamp: OffsetDateTime,
    pub searchable_keys: BTreeMap<String, String>,
    pub full_payload: EventBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventBody {
    pub ip_address: String,
    pub random_number: u32,
}

/// Infinite source of fresh payloads.
///
/// Each worker owns its own generator (see [`PayloadGenerator::fork`]), so drawing a payload
/// never touches shared state.
#[derive(Debug, Clone)]
pub struct PayloadGenerator<R = SmallRng> {
    rng: R,
    searchable_keys: Vec<String>,
}

impl PayloadGenerator<SmallRng> {
    pub fn new<S: AsRef<str>>(searchable_keys: &[S]) -> Self {
        Self::with_rng(SmallRng::from_entropy(), searchable_keys)
    }
}

impl<R: Rng + SeedableRng> PayloadGenerator<R> {
    /// Deterministic generator, mostly useful in tests.
    pub fn with_seed<S: AsRef<str>>(seed: u64, searchable_keys: &[S]) -> Self {
        Self::with_rng(R::seed_from_u64(seed), searchable_keys)
    }

    pub fn with_rng<S: AsRef<str>>(rng: R, searchable_keys: &[S]) -> Self {
        Self {
            rng,
            searchable_keys: searchable_keys
                .iter()
                .map(|k| k.as_ref().to_string())
                .collect(),
        }
    }

    /// Independent generator seeded from this one.
    pub fn fork(&mut self) -> Self {
        Self {
            rng: R::seed_from_u64(self.rng.gen()),
            searchable_keys: self.searchable_keys.clone(),
        }
    }

    /// Draw one payload. Same as [`Iterator::next`], without the `Option`.
    pub fn generate(&mut self) -> Payload {
        let name = EVENT_NAMES[self.rng.gen_range(0..EVENT_NAMES.len())].to_string();

        let keys = self.searchable_keys.clone();
        let searchable_keys = keys
            .into_iter()
            .map(|key| (key, self.random_id()))
            .collect();

        Payload {
            name,
            timestamp: OffsetDateTime::now_utc(),
            searchable_keys,
            full_payload: EventBody {
                ip_address: "127.0.0.1".to_string(),
                random_number: self.rng.gen_range(1..=100),
            },
        }
    }

    fn random_id(&mut self) -> String {
        uuid::Builder::from_random_bytes(self.rng.gen())
            .into_uuid()
            .to_string()
    }
}

impl<R: Rng + SeedableRng> Iterator for PayloadGenerator<R> {
    type Item = Payload;

    fn next(&mut self) -> Option<Payload> {
        Some(self.generate())
    }
}
