//! Per-frame performance figures for the telemetry log
//!
//! Memory and CPU load come from procfs and are only available on Linux.

use std::time::{Duration, Instant};

/// Kernel clock ticks per second for `/proc/self/stat` times (USER_HZ)
#[cfg(target_os = "linux")]
const CLOCK_TICKS_PER_SEC: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceSample {
    pub fps: f64,
    pub used_memory_mb: Option<f64>,
    /// Fraction of total machine CPU used by this process since the last sample
    pub cpu_load: Option<f64>,
}

pub struct ProcessMonitor {
    cpus: f64,
    last_cpu: Option<(f64, Instant)>,
}

impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessMonitor {
    pub fn new() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            cpus: cpus as f64,
            last_cpu: None,
        }
    }

    pub fn sample(&mut self, elapsed: Duration) -> PerformanceSample {
        PerformanceSample {
            fps: fps(elapsed),
            used_memory_mb: read_memory_mb(),
            cpu_load: self.cpu_load(),
        }
    }

    fn cpu_load(&mut self) -> Option<f64> {
        let now = Instant::now();
        let cpu_secs = read_cpu_seconds()?;
        let previous = self.last_cpu.replace((cpu_secs, now));

        let (prev_secs, prev_at) = previous?;
        let wall = now.duration_since(prev_at).as_secs_f64();
        if wall <= 0.0 {
            return None;
        }
        Some(((cpu_secs - prev_secs) / (wall * self.cpus)).clamp(0.0, 1.0))
    }
}

pub fn fps(elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        1.0 / secs
    } else {
        0.0
    }
}

#[cfg(target_os = "linux")]
fn read_memory_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss_kb(&status).map(|kb| kb / 1024.0)
}

#[cfg(not(target_os = "linux"))]
fn read_memory_mb() -> Option<f64> {
    None
}

#[cfg(target_os = "linux")]
fn read_cpu_seconds() -> Option<f64> {
    let stat = std::fs::read_to_string("/proc/self/stat").ok()?;
    parse_cpu_ticks(&stat).map(|ticks| ticks as f64 / CLOCK_TICKS_PER_SEC)
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_seconds() -> Option<f64> {
    None
}

fn parse_vm_rss_kb(status: &str) -> Option<f64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

/// utime + stime from a `/proc/<pid>/stat` line.
/// The command name may contain spaces, so fields are counted after its closing paren.
fn parse_cpu_ticks(stat: &str) -> Option<u64> {
    let (_, rest) = stat.rsplit_once(')')?;
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some(utime + stime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps() {
        assert!((fps(Duration::from_millis(40)) - 25.0).abs() < 1e-9);
        assert_eq!(fps(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\trusty-hands\nVmPeak:\t  9000 kB\nVmRSS:\t  2048 kB\n";
        assert_eq!(parse_vm_rss_kb(status), Some(2048.0));
        assert_eq!(parse_vm_rss_kb("Name:\tx\n"), None);
    }

    #[test]
    fn test_parse_cpu_ticks() {
        let stat = "4242 (rusty hands) R 1 4242 4242 0 -1 4194304 100 0 0 0 37 5 0 0 20 0 1 0";
        assert_eq!(parse_cpu_ticks(stat), Some(42));
        assert_eq!(parse_cpu_ticks("garbage"), None);
    }

    #[test]
    fn test_first_cpu_sample_is_unknown() {
        let mut monitor = ProcessMonitor::new();
        let sample = monitor.sample(Duration::from_millis(10));
        assert_eq!(sample.cpu_load, None);
    }
}
