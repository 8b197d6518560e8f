use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,
    total_network_time_us: AtomicU64,
    total_render_time_us: AtomicU64,

    // Counts
    extractions: AtomicUsize,
    network_analyses: AtomicUsize,
    renders: AtomicUsize,
    total_participants_extracted: AtomicUsize,
    total_relations_extracted: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
            total_network_time_us: AtomicU64::new(0),
            total_render_time_us: AtomicU64::new(0),
            extractions: AtomicUsize::new(0),
            network_analyses: AtomicUsize::new(0),
            renders: AtomicUsize::new(0),
            total_participants_extracted: AtomicUsize::new(0),
            total_relations_extracted: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_extract(&self, duration: Duration, participants: usize, relations: usize) {
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.extractions.fetch_add(1, Ordering::Relaxed);
        self.total_participants_extracted.fetch_add(participants, Ordering::Relaxed);
        self.total_relations_extracted.fetch_add(relations, Ordering::Relaxed);
    }

    pub fn record_network(&self, duration: Duration) {
        self.total_network_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.network_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render(&self, duration: Duration) {
        self.total_render_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            avg_extract_time_ms: avg_time_ms(&self.total_extract_time_us, &self.extractions),
            avg_network_time_ms: avg_time_ms(&self.total_network_time_us, &self.network_analyses),
            avg_render_time_ms: avg_time_ms(&self.total_render_time_us, &self.renders),
            total_participants_extracted: self.total_participants_extracted.load(Ordering::Relaxed),
            total_relations_extracted: self.total_relations_extracted.load(Ordering::Relaxed),
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    let cnt = count.load(Ordering::Relaxed) as f64;
    if cnt > 0.0 {
        total / cnt / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub avg_extract_time_ms: f64,
    pub avg_network_time_ms: f64,
    pub avg_render_time_ms: f64,
    pub total_participants_extracted: usize,
    pub total_relations_extracted: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages_per_stage() {
        let metrics = Metrics::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_extract(Duration::from_millis(4), 3, 1);
        metrics.record_extract(Duration::from_millis(2), 1, 0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.avg_extract_time_ms, 3.0);
        assert_eq!(snapshot.avg_network_time_ms, 0.0);
        assert_eq!(snapshot.total_participants_extracted, 4);
    }
}
