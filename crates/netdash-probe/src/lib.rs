//! Measurement sources and deferred completions.

pub mod pending;
pub mod runner;
pub mod simulate;

pub use pending::{spawn_deferred, Pending};
pub use runner::{
    spawn_scan, spawn_speed_test, DeviceScanner, LinkProbe, ProbeSettings, SpeedTester,
};
pub use simulate::{
    generate_devices, generate_speed_test, random_hostname, random_mac, SimulatedLink,
    SimulatedScanner, SimulatedSpeedTester, GATEWAY_HOSTNAME, GATEWAY_IP,
};
