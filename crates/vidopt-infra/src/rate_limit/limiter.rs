use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use vidopt_core::RateLimitConfig;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket with its own lock, safe to share between concurrent requests.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_rate: f64, // tokens per second
    state: std::sync::Mutex<BucketState>,
}

impl TokenBucket {
    /// Start full.
    pub fn new(capacity: f64, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
            state: std::sync::Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take one token, or return how long until one is available.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let seconds = (1.0 - state.tokens) / self.refill_rate;
            Err(Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX))
        }
    }
}

/// One lazily created token bucket per client key.
///
/// The registry lock is held only to look up or insert a bucket; consuming a
/// token happens under the bucket's own lock. Entries are never evicted.
#[derive(Clone)]
pub struct ClientRateLimiter {
    buckets: Arc<Mutex<HashMap<String, Arc<TokenBucket>>>>,
    capacity: f64,
    refill_rate: f64,
}

impl ClientRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            capacity: f64::from(config.burst),
            refill_rate: config.per_second,
        }
    }

    async fn bucket(&self, client_key: &str) -> Arc<TokenBucket> {
        let mut buckets = self.buckets.lock().await;
        if let Some(bucket) = buckets.get(client_key) {
            return bucket.clone();
        }
        let bucket = Arc::new(TokenBucket::new(self.capacity, self.refill_rate));
        buckets.insert(client_key.to_string(), bucket.clone());
        tracing::debug!(client = %client_key, clients = buckets.len(), "Rate limit bucket created");
        bucket
    }

    /// Consume a token for `client_key`; on rejection, the wait until the next one.
    pub async fn check(&self, client_key: &str) -> Result<(), Duration> {
        self.bucket(client_key).await.try_acquire()
    }

    pub async fn allow(&self, client_key: &str) -> bool {
        self.check(client_key).await.is_ok()
    }

    /// Number of client keys seen so far.
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }
}
