//! Structuring text through an external service, with bounded retries and a local fallback.

use mindgraft_core::response::try_parse_structuring_response;
use mindgraft_core::{MindgraftConfig, Preprocessor, Topic};
use rand::{Rng, RngCore};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("structuring request timed out after {0:?}")]
    Timeout(Duration),
    #[error("structuring service unavailable: {0}")]
    Unavailable(String),
    #[error("structuring reply unusable: {0}")]
    Reply(#[from] mindgraft_core::Error),
}

/// The external service that turns text into a topic forest.
pub trait TopicStructurer {
    /// Sends `text` and returns the raw reply. Implementations give up after `timeout`.
    fn request(&self, text: &str, timeout: Duration) -> Result<String, StructureError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(8000),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &MindgraftConfig) -> Self {
        let d = Self::default();
        Self {
            attempts: config
                .get_u64("retry.attempts")
                .filter(|v| *v >= 1)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(d.attempts),
            base_delay: config
                .get_u64("retry.baseDelayMs")
                .map_or(d.base_delay, Duration::from_millis),
            max_delay: config
                .get_u64("retry.maxDelayMs")
                .map_or(d.max_delay, Duration::from_millis),
            timeout: config
                .get_u64("retry.timeoutSecs")
                .filter(|v| *v >= 1)
                .map_or(d.timeout, Duration::from_secs),
        }
    }

    /// `base_delay * 2^attempt`, capped at `max_delay`. `attempt` is 0-based.
    pub fn backoff_cap(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Full jitter: uniform in `[0, backoff_cap(attempt)]`.
    pub fn delay(&self, attempt: u32, rng: &mut (impl Rng + ?Sized)) -> Duration {
        let cap = u64::try_from(self.backoff_cap(attempt).as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.gen_range(0..=cap))
    }
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSource {
    /// The service answered on attempt number `attempts`.
    Structurer { attempts: u32 },
    LocalHeuristic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Structured {
    pub topics: Vec<Topic>,
    pub source: TopicSource,
}

pub fn structure_with_fallback(
    text: &str,
    service: &dyn TopicStructurer,
    policy: &RetryPolicy,
    preprocessor: &Preprocessor,
) -> Structured {
    structure_with_fallback_using(
        text,
        service,
        policy,
        preprocessor,
        &ThreadSleeper,
        &mut rand::thread_rng(),
    )
}

/// [`structure_with_fallback`] with an explicit sleeper and jitter source.
///
/// An attempt fails when the service errors or its reply does not parse into at least one
/// valid topic. After the last failed attempt the local heuristics in `preprocessor` are used.
pub fn structure_with_fallback_using(
    text: &str,
    service: &dyn TopicStructurer,
    policy: &RetryPolicy,
    preprocessor: &Preprocessor,
    sleeper: &dyn Sleeper,
    rng: &mut dyn RngCore,
) -> Structured {
    let _span = tracing::debug_span!("structure", chars = text.len()).entered();
    let attempts = policy.attempts.max(1);
    for attempt in 0..attempts {
        let outcome = service.request(text, policy.timeout).and_then(|reply| {
            try_parse_structuring_response(&reply).map_err(StructureError::from)
        });
        match outcome {
            Ok(topics) => {
                return Structured {
                    topics,
                    source: TopicSource::Structurer {
                        attempts: attempt + 1,
                    },
                };
            }
            Err(err) => {
                tracing::warn!(attempt = attempt + 1, attempts, error = %err, "structuring attempt failed");
                if attempt + 1 < attempts {
                    let delay = policy.delay(attempt, &mut *rng);
                    tracing::debug!(?delay, "backing off");
                    sleeper.sleep(delay);
                }
            }
        }
    }

    tracing::info!(attempts, "structuring service exhausted; using local heuristics");
    Structured {
        topics: preprocessor.build_hierarchy_from_text(text),
        source: TopicSource::LocalHeuristic,
    }
}
