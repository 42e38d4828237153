use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

/// How long each endpoint is benchmarked unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

/// Upper bound on a single HTTP round trip. Anything slower counts as a timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_READ_CONCURRENCY: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(100) };
pub const DEFAULT_READ_TPS: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(700) };
pub const READ_EXPECTED_STATUS: u16 = 200;

pub const DEFAULT_WRITE_CONCURRENCY: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(500) };
pub const DEFAULT_WRITE_TPS: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(1_000) };
pub const WRITE_EXPECTED_STATUS: u16 = 202;
