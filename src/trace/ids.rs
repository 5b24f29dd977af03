//! Request and call identifier allocation

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Modulus applied to the wall clock when seeding request ids
const SEED_MODULUS: u64 = 100_000_000;

/// Seed derived from the wall clock, so separate runs rarely reuse ids
pub fn wall_clock_seed() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    (secs % SEED_MODULUS) as i64
}

/// Issues request ids and per-type call ids
///
/// Request ids are dense from the seed. Call ids are dense from 0,
/// independently for each call type label.
#[derive(Debug)]
pub struct IdAllocator {
    seed: i64,
    next_request: AtomicI64,
    call_counters: Mutex<HashMap<String, u64>>,
}

impl IdAllocator {
    /// Create an allocator seeded from the wall clock
    pub fn new() -> Self {
        Self::with_seed(wall_clock_seed())
    }

    /// Create an allocator whose first request id is `seed`
    pub fn with_seed(seed: i64) -> Self {
        Self {
            seed,
            next_request: AtomicI64::new(seed),
            call_counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Return the next call id for `call_type`. The first id for a new label is 0.
    pub fn allocate_call_id(&self, call_type: &str) -> u64 {
        // A panic elsewhere cannot leave a counter half-updated, so a poisoned
        // lock is still consistent.
        let mut counters = self
            .call_counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let counter = counters.entry(call_type.to_string()).or_insert(0);
        let id = *counter;
        *counter += 1;
        id
    }

    /// Return the next request id
    pub fn allocate_request_id(&self) -> i64 {
        self.next_request.fetch_add(1, Ordering::SeqCst)
    }

    /// The most recently allocated request id; `seed - 1` before any allocation
    pub fn current_request_id(&self) -> i64 {
        self.next_request.load(Ordering::SeqCst) - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
