use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::info;

/// Rolling latency samples per gateway endpoint.
///
/// The bot gateway sits behind consensus, so calls are slow and variable;
/// the `stats` command uses these numbers to tell "the gateway is degraded"
/// from "one call was unlucky".
pub struct CallLatency {
    samples: DashMap<&'static str, VecDeque<Duration>>,
    max_samples: usize,
}

impl CallLatency {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: DashMap::new(),
            max_samples,
        }
    }

    pub fn record(&self, endpoint: &'static str, duration: Duration) {
        let max = self.max_samples;
        self.samples
            .entry(endpoint)
            .and_modify(|window| {
                if window.len() >= max {
                    window.pop_front();
                }
                window.push_back(duration);
            })
            .or_insert_with(|| {
                let mut window = VecDeque::with_capacity(max);
                window.push_back(duration);
                window
            });
    }

    /// Time an async call and record how long it took, success or not.
    pub async fn measure<T, F: std::future::Future<Output = T>>(
        &self,
        endpoint: &'static str,
        fut: F,
    ) -> T {
        let start = Instant::now();
        let out = fut.await;
        self.record(endpoint, start.elapsed());
        out
    }

    /// (p50, p95, max) over the retained window, if any samples exist.
    pub fn percentiles(&self, endpoint: &str) -> Option<(Duration, Duration, Duration)> {
        let window = self.samples.get(endpoint)?;
        if window.is_empty() {
            return None;
        }

        let mut sorted: Vec<Duration> = window.iter().copied().collect();
        sorted.sort();

        let len = sorted.len();
        let p50 = sorted[len / 2];
        let p95 = sorted[((len as f64 * 0.95) as usize).min(len - 1)];
        let max = sorted[len - 1];
        Some((p50, p95, max))
    }

    /// One line per endpoint, for the `stats` view.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .samples
            .iter()
            .filter_map(|entry| {
                let (p50, p95, max) = self.percentiles(entry.key())?;
                Some(format!(
                    "{:<14} p50={:>7.1}ms  p95={:>7.1}ms  max={:>7.1}ms  samples={}",
                    entry.key(),
                    p50.as_secs_f64() * 1000.0,
                    p95.as_secs_f64() * 1000.0,
                    max.as_secs_f64() * 1000.0,
                    entry.value().len(),
                ))
            })
            .collect();
        lines.sort();
        lines
    }

    pub fn log_summary(&self) {
        for line in self.summary_lines() {
            info!("Latency {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_over_window() {
        let latency = CallLatency::new(100);
        for ms in 1..=100u64 {
            latency.record("pairs", Duration::from_millis(ms));
        }
        let (p50, p95, max) = latency.percentiles("pairs").unwrap();
        assert_eq!(p50, Duration::from_millis(51));
        assert_eq!(p95, Duration::from_millis(96));
        assert_eq!(max, Duration::from_millis(100));
    }

    #[test]
    fn window_evicts_oldest() {
        let latency = CallLatency::new(2);
        latency.record("state", Duration::from_millis(500));
        latency.record("state", Duration::from_millis(1));
        latency.record("state", Duration::from_millis(2));
        let (_, _, max) = latency.percentiles("state").unwrap();
        assert_eq!(max, Duration::from_millis(2));
    }

    #[test]
    fn unknown_endpoint_is_none() {
        let latency = CallLatency::new(10);
        assert!(latency.percentiles("nope").is_none());
        assert!(latency.summary_lines().is_empty());
    }
}
