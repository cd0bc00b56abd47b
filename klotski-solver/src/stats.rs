//! Search statistics, periodic progress logging, and the final run
//! summary.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Current resident set size in bytes, read from `/proc/self/status`.
#[cfg(target_os = "linux")]
pub fn get_memory_usage() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            let kb: u64 = rest.trim().trim_end_matches(" kB").trim().parse().ok()?;
            return Some(kb * 1024);
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
pub fn get_memory_usage() -> Option<u64> {
    None
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Counters accumulated over one search run.
pub struct SearchStats {
    /// Nodes popped and expanded (duplicates excluded).
    pub expanded: u64,
    /// Successor nodes pushed onto the frontier.
    pub generated: u64,
    /// Pops discarded because the fingerprint was already expanded.
    pub duplicate_pops: u64,
    /// High-water mark of the frontier length.
    pub max_frontier: usize,
    /// Deepest node expanded so far.
    pub max_depth: u32,
    start: Instant,
    last_log: Instant,
    last_log_expanded: u64,
    log_interval: Duration,
}

impl SearchStats {
    pub fn new(log_interval_secs: u64) -> SearchStats {
        let now = Instant::now();
        SearchStats {
            expanded: 0,
            generated: 0,
            duplicate_pops: 0,
            max_frontier: 0,
            max_depth: 0,
            start: now,
            last_log: now,
            last_log_expanded: 0,
            log_interval: Duration::from_secs(log_interval_secs),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Emit a progress line if the log interval has elapsed.
    pub fn maybe_log_progress(&mut self, frontier_len: usize) {
        let now = Instant::now();
        if now.duration_since(self.last_log) < self.log_interval {
            return;
        }
        let interval = now.duration_since(self.last_log).as_secs_f64();
        let rate = (self.expanded - self.last_log_expanded) as f64 / interval;
        let rss = match get_memory_usage() {
            Some(bytes) => format_bytes(bytes),
            None => "n/a".to_string(),
        };
        log::info!(
            "expanded {} ({:.0}/s) generated {} dups {} frontier {} depth {} rss {}",
            self.expanded,
            rate,
            self.generated,
            self.duplicate_pops,
            frontier_len,
            self.max_depth,
            rss
        );
        self.last_log = now;
        self.last_log_expanded = self.expanded;
    }

    pub fn print_summary(&self, algorithm: &str, outcome: &str) {
        let secs = self.elapsed().as_secs_f64();
        log::info!(
            "{} finished: {} in {:.2}s, expanded {} generated {} dups {} max frontier {} max depth {}",
            algorithm,
            outcome,
            secs,
            self.expanded,
            self.generated,
            self.duplicate_pops,
            self.max_frontier,
            self.max_depth
        );
    }
}

/// Machine-readable run report for `--json-summary`.
#[derive(Serialize)]
pub struct RunSummary<'a> {
    pub algorithm: &'a str,
    pub outcome: &'a str,
    /// Slide count of the found solution; absent unless solved.
    pub depth: Option<u32>,
    pub expanded: u64,
    pub generated: u64,
    pub duplicate_pops: u64,
    pub max_frontier: usize,
    pub elapsed_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_picks_sane_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn memory_usage_reads_rss() {
        let rss = get_memory_usage().unwrap();
        assert!(rss > 0);
    }

    #[test]
    fn summary_serializes_expected_fields() {
        let summary = RunSummary {
            algorithm: "astar",
            outcome: "solved",
            depth: Some(3),
            expanded: 10,
            generated: 25,
            duplicate_pops: 4,
            max_frontier: 8,
            elapsed_ms: 12,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["algorithm"], "astar");
        assert_eq!(json["depth"], 3);
        assert_eq!(json["max_frontier"], 8);
    }
}
