//! Randomized stand-ins for real measurements.

use crate::runner::{DeviceScanner, LinkProbe, ProbeSettings, SpeedTester};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::debug;
use netdash_model::{Device, DeviceStatus, DeviceType, SpeedTestResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::thread::sleep;
use std::time::Duration;

pub const GATEWAY_IP: &str = "192.168.1.1";
pub const GATEWAY_HOSTNAME: &str = "router.local";

const MANUFACTURERS: [&str; 8] = [
    "Apple", "Samsung", "Dell", "HP", "TP-Link", "Netgear", "Cisco", "Asus",
];
const OPERATING_SYSTEMS: [&str; 6] = ["Windows", "macOS", "Linux", "iOS", "Android", "RouterOS"];
const MIN_RANDOM_DEVICES: usize = 5;
const MAX_RANDOM_DEVICES: usize = 19;
const ONLINE_PROBABILITY: f64 = 0.85;

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn hostname_suffixes(device_type: DeviceType) -> &'static [&'static str] {
    match device_type {
        DeviceType::Computer => &["PC", "Laptop", "Workstation", "Desktop"],
        DeviceType::Phone => &["Phone", "Mobile", "Smartphone"],
        DeviceType::Router => &["Router", "Gateway", "Access-Point"],
        DeviceType::Tablet => &["Tablet", "Pad"],
        DeviceType::Iot => &["Smart-TV", "Camera", "Speaker", "Thermostat"],
        DeviceType::Printer => &["Printer", "Multifunction"],
    }
}

pub fn random_mac<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..6)
        .map(|_| format!("{:02X}", rng.gen::<u8>()))
        .collect::<Vec<_>>()
        .join(":")
}

pub fn random_hostname<R: Rng + ?Sized>(
    rng: &mut R,
    manufacturer: &str,
    device_type: DeviceType,
) -> String {
    let suffix = hostname_suffixes(device_type)
        .choose(rng)
        .copied()
        .unwrap_or("Device");
    let number = rng.gen_range(0..100);
    format!("{manufacturer}-{suffix}-{number}").to_lowercase()
}

fn random_device<R: Rng + ?Sized>(rng: &mut R, seen_at: DateTime<Utc>) -> Device {
    let device_type = DeviceType::ALL[rng.gen_range(0..DeviceType::ALL.len())];
    let manufacturer = MANUFACTURERS[rng.gen_range(0..MANUFACTURERS.len())];
    let os = OPERATING_SYSTEMS[rng.gen_range(0..OPERATING_SYSTEMS.len())];
    let status = if rng.gen_bool(ONLINE_PROBABILITY) {
        DeviceStatus::Online
    } else {
        DeviceStatus::Offline
    };

    Device {
        // .1 belongs to the gateway
        ip: format!("192.168.1.{}", rng.gen_range(2..=254)),
        mac: random_mac(rng),
        hostname: random_hostname(rng, manufacturer, device_type),
        manufacturer: manufacturer.to_string(),
        device_type,
        os: os.to_string(),
        response_time_ms: rng.gen_range(1..=100),
        last_seen: seen_at,
        status,
    }
}

fn gateway<R: Rng + ?Sized>(rng: &mut R, seen_at: DateTime<Utc>) -> Device {
    Device {
        ip: GATEWAY_IP.to_string(),
        mac: random_mac(rng),
        hostname: GATEWAY_HOSTNAME.to_string(),
        manufacturer: "TP-Link".to_string(),
        device_type: DeviceType::Router,
        os: "RouterOS".to_string(),
        response_time_ms: 1,
        last_seen: seen_at,
        status: DeviceStatus::Online,
    }
}

/// Builds one synthetic scan: 5 to 19 random hosts followed by the gateway.
pub fn generate_devices<R: Rng + ?Sized>(rng: &mut R, seen_at: DateTime<Utc>) -> Vec<Device> {
    let count = rng.gen_range(MIN_RANDOM_DEVICES..=MAX_RANDOM_DEVICES);
    let mut devices: Vec<Device> = (0..count).map(|_| random_device(rng, seen_at)).collect();
    devices.push(gateway(rng, seen_at));
    devices
}

pub fn generate_speed_test<R: Rng + ?Sized>(rng: &mut R) -> SpeedTestResult {
    SpeedTestResult {
        download: round2(rng.gen_range(50.0..150.0)),
        upload: round2(rng.gen_range(10.0..60.0)),
        ping: round2(rng.gen_range(10.0..60.0)),
    }
}

pub struct SimulatedScanner {
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedScanner {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self {
            latency: settings.scan_latency,
            rng: Mutex::new(make_rng(settings.seed)),
        }
    }
}

impl DeviceScanner for SimulatedScanner {
    fn scan(&self) -> Result<Vec<Device>> {
        sleep(self.latency);
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("scan generator state is poisoned"))?;
        let devices = generate_devices(&mut *rng, Utc::now());
        debug!("simulated scan produced {} devices", devices.len());
        Ok(devices)
    }
}

pub struct SimulatedSpeedTester {
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedSpeedTester {
    pub fn new(settings: &ProbeSettings) -> Self {
        // offset so a shared seed doesn't mirror the scanner's stream
        let seed = settings.seed.map(|seed| seed.wrapping_add(1));
        Self {
            latency: settings.speed_test_latency,
            rng: Mutex::new(make_rng(seed)),
        }
    }
}

impl SpeedTester for SimulatedSpeedTester {
    fn run(&self) -> Result<SpeedTestResult> {
        sleep(self.latency);
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("speed test generator state is poisoned"))?;
        Ok(generate_speed_test(&mut *rng))
    }
}

/// Uniform 0 to 1000 Mbps.
pub struct SimulatedLink {
    rng: StdRng,
}

impl SimulatedLink {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed.map(|seed| seed.wrapping_add(2))),
        }
    }
}

impl LinkProbe for SimulatedLink {
    fn sample(&mut self) -> Result<f64> {
        Ok(self.rng.gen_range(0.0..1000.0))
    }
}
