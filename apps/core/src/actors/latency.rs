use crate::actors::traits::LatencySimulator;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Pads locally computed results so a fast remote failure still "feels" like a
/// real service round-trip. Sleeps on the Tokio timer, never blocking a thread.
pub struct SimulatedLatency {
    range: Option<(Duration, Duration)>,
    rng: Mutex<StdRng>,
}

impl SimulatedLatency {
    /// Pause for a uniformly drawn duration in `[min, max]`.
    pub fn new(min: Duration, max: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };

        Self {
            range: Some((min, max)),
            rng: Mutex::new(rng),
        }
    }

    /// No padding at all.
    pub fn disabled() -> Self {
        Self {
            range: None,
            rng: Mutex::new(StdRng::seed_from_u64(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.range.is_some()
    }

    /// Draws the next pause length.
    pub fn next_delay(&self) -> Duration {
        let Some((min, max)) = self.range else {
            return Duration::ZERO;
        };
        if min == max {
            return min;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(min..=max)
    }
}

#[async_trait]
impl LatencySimulator for SimulatedLatency {
    async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!("Simulating {:?} of processing latency", delay);
        tokio::time::sleep(delay).await;
    }

    fn max_pause(&self) -> Duration {
        self.range.map(|(_, max)| max).unwrap_or(Duration::ZERO)
    }
}
