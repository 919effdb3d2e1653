use chrono::Utc;
use netdash_model::{DeviceStatus, DeviceType};
use netdash_probe::{
    generate_devices, DeviceScanner, ProbeSettings, SimulatedScanner, GATEWAY_HOSTNAME, GATEWAY_IP,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[test]
fn every_scan_has_exactly_one_gateway() {
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let devices = generate_devices(&mut rng, Utc::now());

        let gateways: Vec<_> = devices.iter().filter(|d| d.ip == GATEWAY_IP).collect();
        assert_eq!(gateways.len(), 1, "seed {seed}");
        assert_eq!(gateways[0].hostname, GATEWAY_HOSTNAME);
        assert_eq!(gateways[0].device_type, DeviceType::Router);
        assert_eq!(gateways[0].status, DeviceStatus::Online);
        assert_eq!(
            devices
                .iter()
                .filter(|d| d.hostname == GATEWAY_HOSTNAME)
                .count(),
            1
        );
    }
}

#[test]
fn device_count_stays_within_bounds() {
    let mut seen = Vec::new();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let devices = generate_devices(&mut rng, Utc::now());
        assert!((6..=20).contains(&devices.len()), "got {}", devices.len());
        seen.push(devices.len());
    }
    // 5 to 19 random hosts plus the gateway
    assert_eq!(seen.iter().min(), Some(&6));
    assert_eq!(seen.iter().max(), Some(&20));
}

#[test]
fn random_hosts_live_on_the_lan() {
    let mut rng = StdRng::seed_from_u64(42);
    let devices = generate_devices(&mut rng, Utc::now());

    for device in &devices {
        let host: u8 = device
            .ip
            .strip_prefix("192.168.1.")
            .and_then(|suffix| suffix.parse().ok())
            .expect("lan address");
        assert!((1..=254).contains(&host));
        assert!((1..=100).contains(&device.response_time_ms));
        assert_eq!(device.mac.len(), 17);
    }
}

#[test]
fn seeded_scanners_are_reproducible() {
    let settings = ProbeSettings {
        scan_latency: Duration::ZERO,
        seed: Some(9),
        ..ProbeSettings::default()
    };

    let a = SimulatedScanner::new(&settings).scan().unwrap();
    let b = SimulatedScanner::new(&settings).scan().unwrap();

    let ips_a: Vec<_> = a.iter().map(|d| (&d.ip, &d.mac, &d.hostname)).collect();
    let ips_b: Vec<_> = b.iter().map(|d| (&d.ip, &d.mac, &d.hostname)).collect();
    assert_eq!(ips_a, ips_b);
}
