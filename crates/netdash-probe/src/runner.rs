use crate::pending::{spawn_deferred, Pending};
use anyhow::Result;
use netdash_model::{Device, SpeedTestResult};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub scan_latency: Duration,
    pub speed_test_latency: Duration,
    /// Fixed seed for reproducible synthetic data; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            scan_latency: Duration::from_secs(2),
            speed_test_latency: Duration::from_secs(3),
            seed: None,
        }
    }
}

/// Discovers hosts on the local network. Blocks for as long as the scan
/// takes; callers run it through [`spawn_scan`].
pub trait DeviceScanner: Send + Sync {
    fn scan(&self) -> Result<Vec<Device>>;
}

/// Measures internet throughput and latency. Blocks like [`DeviceScanner`].
pub trait SpeedTester: Send + Sync {
    fn run(&self) -> Result<SpeedTestResult>;
}

/// Reads the current local link speed in Mbps.
pub trait LinkProbe: Send {
    fn sample(&mut self) -> Result<f64>;
}

pub fn spawn_scan(scanner: Arc<dyn DeviceScanner>) -> Result<Pending<Vec<Device>>> {
    spawn_deferred("scan", move || scanner.scan())
}

pub fn spawn_speed_test(tester: Arc<dyn SpeedTester>) -> Result<Pending<SpeedTestResult>> {
    spawn_deferred("speedtest", move || tester.run())
}
