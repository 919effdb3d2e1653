use anyhow::anyhow;
use chrono::Utc;
use netdash_model::{Device, DeviceStatus, DeviceType, SortDirection, SortField, SpeedTestResult};
use netdash_monitor::{
    AppState, ConnectionType, LogLevel, Monitor, MonitorConfig, Renderer, ScanState, SeriesName,
    SpeedTestState,
};
use netdash_probe::{DeviceScanner, LinkProbe, SpeedTester};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<(ScanState, usize, usize)>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, state: &AppState) -> anyhow::Result<()> {
        self.frames
            .push((state.scan.clone(), state.registry.len(), state.series.len()));
        Ok(())
    }
}

struct FakeScanner {
    devices: Vec<Device>,
    fail: AtomicBool,
}

impl DeviceScanner for FakeScanner {
    fn scan(&self) -> anyhow::Result<Vec<Device>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("arp table unavailable"));
        }
        Ok(self.devices.clone())
    }
}

struct FakeTester {
    result: Option<SpeedTestResult>,
    runs: AtomicU32,
}

impl SpeedTester for FakeTester {
    fn run(&self) -> anyhow::Result<SpeedTestResult> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.result.ok_or_else(|| anyhow!("no route to test server"))
    }
}

struct ScriptedLink {
    values: VecDeque<f64>,
}

impl LinkProbe for ScriptedLink {
    fn sample(&mut self) -> anyhow::Result<f64> {
        self.values
            .pop_front()
            .ok_or_else(|| anyhow!("link probe exhausted"))
    }
}

fn device(hostname: &str, ip: &str) -> Device {
    Device {
        ip: ip.to_string(),
        mac: "00:11:22:33:44:55".to_string(),
        hostname: hostname.to_string(),
        manufacturer: "HP".to_string(),
        device_type: DeviceType::Printer,
        os: "Linux".to_string(),
        response_time_ms: 12,
        last_seen: Utc::now(),
        status: DeviceStatus::Online,
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("netdash-{name}-{}-{stamp}", std::process::id()))
}

struct Harness {
    scanner: Arc<FakeScanner>,
    tester: Arc<FakeTester>,
    monitor: Monitor<RecordingRenderer>,
}

fn harness_with(
    config: MonitorConfig,
    devices: Vec<Device>,
    speed: Option<SpeedTestResult>,
    link: Vec<f64>,
) -> Harness {
    let scanner = Arc::new(FakeScanner {
        devices,
        fail: AtomicBool::new(false),
    });
    let tester = Arc::new(FakeTester {
        result: speed,
        runs: AtomicU32::new(0),
    });
    let monitor = Monitor::new(
        config,
        RecordingRenderer::default(),
        scanner.clone(),
        tester.clone(),
        Box::new(ScriptedLink {
            values: link.into(),
        }),
    );
    Harness {
        scanner,
        tester,
        monitor,
    }
}

fn harness(
    devices: Vec<Device>,
    speed: Option<SpeedTestResult>,
    link: Vec<f64>,
    export_dir: PathBuf,
) -> Harness {
    let config = MonitorConfig {
        tick_period: Duration::from_secs(3),
        export_dir,
        auto_scan: None,
        auto_test: None,
    };
    harness_with(config, devices, speed, link)
}

fn default_harness() -> Harness {
    harness(
        vec![device("hp-printer-1", "192.168.1.9"), device("router.local", "192.168.1.1")],
        Some(SpeedTestResult {
            download: 75.0,
            upload: 15.0,
            ping: 20.0,
        }),
        vec![620.0, 40.0, 300.0],
        temp_dir("unused"),
    )
}

#[test]
fn double_start_produces_one_tick_per_period() {
    let mut h = default_harness();
    let t0 = Instant::now();

    assert!(h.monitor.start_monitoring(t0).unwrap());
    assert!(!h.monitor.start_monitoring(t0).unwrap());

    let due = t0 + Duration::from_secs(3);
    assert!(h.monitor.tick(due).unwrap().sampled);
    assert!(!h.monitor.tick(due).unwrap().any());
    assert_eq!(h.monitor.state().series.len(), 1);

    assert!(h.monitor.stop_monitoring().unwrap());
    assert!(!h.monitor.stop_monitoring().unwrap());
    assert!(!h.monitor.tick(due + Duration::from_secs(30)).unwrap().any());

    let starts = h
        .monitor
        .state()
        .log
        .entries()
        .iter()
        .filter(|e| e.message.contains("monitoring started"))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn each_tick_appends_then_renders() {
    let mut h = default_harness();
    let t0 = Instant::now();
    h.monitor.toggle_monitoring(t0).unwrap();

    let before = h.monitor.renderer().frames.len();
    h.monitor.tick(t0 + Duration::from_secs(3)).unwrap();
    let frames = &h.monitor.renderer().frames;
    assert_eq!(frames.len(), before + 1);
    assert_eq!(frames.last().unwrap().2, 1);
    assert_eq!(h.monitor.state().series.latest(SeriesName::Local), 620.0);
}

#[test]
fn link_failure_is_logged_without_a_sample() {
    let mut h = harness(Vec::new(), None, Vec::new(), temp_dir("unused"));
    let t0 = Instant::now();
    h.monitor.start_monitoring(t0).unwrap();
    h.monitor.tick(t0 + Duration::from_secs(3)).unwrap();

    let state = h.monitor.state();
    assert!(state.series.is_empty());
    assert_eq!(state.log.last().unwrap().level, LogLevel::Error);
}

#[test]
fn scan_signals_scanning_then_replaces_registry() {
    let mut h = default_harness();
    h.monitor.scan_network().unwrap();

    assert_eq!(h.monitor.state().scan, ScanState::Scanning);
    assert_eq!(
        h.monitor.renderer().frames.last().unwrap().0,
        ScanState::Scanning
    );

    h.monitor.wait_pending().unwrap();
    assert_eq!(h.monitor.state().scan, ScanState::Complete);
    assert_eq!(h.monitor.state().registry.len(), 2);
    assert!(!h.monitor.has_pending());
}

#[test]
fn second_scan_while_pending_is_ignored() {
    let mut h = default_harness();
    h.monitor.scan_network().unwrap();
    h.monitor.scan_network().unwrap();

    assert_eq!(h.monitor.state().log.last().unwrap().level, LogLevel::Warn);
    h.monitor.wait_pending().unwrap();

    let found = h
        .monitor
        .state()
        .log
        .entries()
        .iter()
        .filter(|e| e.message.starts_with("Found"))
        .count();
    assert_eq!(found, 1);
}

#[test]
fn second_speed_test_while_pending_is_ignored() {
    let mut h = default_harness();
    h.monitor.run_speed_test().unwrap();
    h.monitor.run_speed_test().unwrap();

    let last = h.monitor.state().log.last().unwrap();
    assert_eq!(last.level, LogLevel::Warn);
    assert!(last.message.contains("already running"));

    h.monitor.wait_pending().unwrap();
    assert_eq!(h.tester.runs.load(Ordering::SeqCst), 1);
    assert_eq!(h.monitor.state().history.len(), 1);
    assert_eq!(
        h.monitor.state().series.latest(SeriesName::Download),
        75.0
    );
}

#[test]
fn failed_scan_keeps_previous_registry() {
    let mut h = default_harness();
    h.monitor.scan_network().unwrap();
    h.monitor.wait_pending().unwrap();

    h.scanner.fail.store(true, Ordering::SeqCst);
    h.monitor.scan_network().unwrap();
    h.monitor.wait_pending().unwrap();

    let state = h.monitor.state();
    assert_eq!(
        state.scan,
        ScanState::Failed("arp table unavailable".to_string())
    );
    assert_eq!(state.registry.len(), 2);
    assert!(state
        .log
        .last()
        .unwrap()
        .message
        .contains("Network scan failed: arp table unavailable"));
}

#[test]
fn empty_scan_is_not_a_failure() {
    let mut h = harness(Vec::new(), None, Vec::new(), temp_dir("unused"));
    h.monitor.scan_network().unwrap();
    h.monitor.wait_pending().unwrap();
    assert_eq!(h.monitor.state().scan, ScanState::Complete);
    assert!(h.monitor.state().registry.is_empty());
}

#[test]
fn poll_pending_eventually_applies_scan() {
    let mut h = default_harness();
    h.monitor.scan_network().unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while !h.monitor.poll_pending().unwrap() {
        assert!(Instant::now() < deadline, "scan never completed");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(h.monitor.state().registry.len(), 2);
}

#[test]
fn speed_test_records_result_and_grades() {
    let mut h = default_harness();
    h.monitor.run_speed_test().unwrap();
    assert_eq!(h.monitor.state().speed_test, SpeedTestState::Running);
    h.monitor.wait_pending().unwrap();

    let state = h.monitor.state();
    assert_eq!(state.speed_test, SpeedTestState::Complete);
    assert_eq!(state.series.latest(SeriesName::Download), 75.0);
    assert_eq!(state.series.latest(SeriesName::Ping), 20.0);
}

#[test]
fn failed_speed_test_writes_nothing() {
    let mut h = harness(Vec::new(), None, vec![100.0], temp_dir("unused"));
    let t0 = Instant::now();
    h.monitor.start_monitoring(t0).unwrap();
    h.monitor.tick(t0 + Duration::from_secs(3)).unwrap();

    h.monitor.run_speed_test().unwrap();
    h.monitor.wait_pending().unwrap();

    let state = h.monitor.state();
    assert!(matches!(state.speed_test, SpeedTestState::Failed(_)));
    assert!(state.series.last_speed_test().is_none());
    assert_eq!(state.series.points(SeriesName::Download), vec![None]);
}

#[test]
fn detect_connection_uses_latest_sample() {
    let mut h = default_harness();
    assert_eq!(
        h.monitor.detect_connection().unwrap(),
        ConnectionType::Ethernet
    );

    let t0 = Instant::now();
    h.monitor.start_monitoring(t0).unwrap();
    h.monitor.tick(t0 + Duration::from_secs(3)).unwrap();
    assert_eq!(
        h.monitor.detect_connection().unwrap(),
        ConnectionType::Gigabit
    );
    assert_eq!(h.monitor.state().connection, Some(ConnectionType::Gigabit));
}

#[test]
fn header_selection_toggles_direction() {
    let mut h = default_harness();
    let first = h.monitor.sort_by(SortField::Hostname).unwrap();
    let second = h.monitor.sort_by(SortField::Hostname).unwrap();
    let third = h.monitor.sort_by(SortField::Ip).unwrap();

    assert_eq!(first.direction, SortDirection::Asc);
    assert_eq!(second.direction, SortDirection::Desc);
    assert_eq!(third.direction, SortDirection::Asc);
}

#[test]
fn export_with_empty_registry_writes_nothing() {
    let dir = temp_dir("empty-export");
    let mut h = harness(Vec::new(), None, Vec::new(), dir.clone());

    assert_eq!(h.monitor.export_devices().unwrap(), None);
    assert!(!dir.exists());
    assert_eq!(h.monitor.state().log.last().unwrap().level, LogLevel::Warn);
}

#[test]
fn export_writes_displayed_rows() {
    let dir = temp_dir("export");
    let mut h = harness(
        vec![device("b-host", "192.168.1.9"), device("a-host", "192.168.1.8")],
        None,
        Vec::new(),
        dir.clone(),
    );
    h.monitor.scan_network().unwrap();
    h.monitor.wait_pending().unwrap();
    h.monitor.sort_by(SortField::Hostname).unwrap();

    let path = h.monitor.export_devices().unwrap().unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("network-devices-") && name.ends_with(".csv"));

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a-host,"));
    assert!(lines[2].starts_with("b-host,"));

    let _ = fs::remove_dir_all(&dir);
}

fn scheduled_config(auto_scan: Option<u64>, auto_test: Option<u64>) -> MonitorConfig {
    MonitorConfig {
        tick_period: Duration::from_secs(3),
        export_dir: temp_dir("unused"),
        auto_scan: auto_scan.map(Duration::from_secs),
        auto_test: auto_test.map(Duration::from_secs),
    }
}

#[test]
fn scheduled_rescan_runs_only_while_monitoring() {
    let mut h = harness_with(
        scheduled_config(Some(60), None),
        vec![device("router.local", "192.168.1.1")],
        None,
        vec![100.0; 40],
    );
    let t0 = Instant::now();
    assert!(!h.monitor.tick(t0 + Duration::from_secs(120)).unwrap().any());

    h.monitor.start_monitoring(t0).unwrap();
    let early = h.monitor.tick(t0 + Duration::from_secs(30)).unwrap();
    assert!(early.sampled);
    assert!(!early.rescan);

    let due = h.monitor.tick(t0 + Duration::from_secs(60)).unwrap();
    assert!(due.rescan);
    assert_eq!(h.monitor.state().scan, ScanState::Scanning);
    h.monitor.wait_pending().unwrap();
    assert_eq!(h.monitor.state().registry.len(), 1);

    h.monitor.stop_monitoring().unwrap();
    assert!(!h.monitor.tick(t0 + Duration::from_secs(600)).unwrap().any());
}

#[test]
fn scheduled_speed_tests_fill_history() {
    let mut h = harness_with(
        scheduled_config(None, Some(60)),
        Vec::new(),
        Some(SpeedTestResult {
            download: 90.0,
            upload: 30.0,
            ping: 15.0,
        }),
        vec![100.0; 40],
    );
    let t0 = Instant::now();
    h.monitor.start_monitoring(t0).unwrap();

    for minute in 1..=3u64 {
        let report = h.monitor.tick(t0 + Duration::from_secs(60 * minute)).unwrap();
        assert!(report.retest);
        h.monitor.wait_pending().unwrap();
    }

    let state = h.monitor.state();
    assert_eq!(state.history.len(), 3);
    assert_eq!(state.history.average().unwrap().download, 90.0);
    assert_eq!(h.tester.runs.load(Ordering::SeqCst), 3);
}

#[test]
fn scheduled_run_skips_quietly_while_manual_one_is_pending() {
    let mut h = harness_with(
        scheduled_config(Some(60), None),
        vec![device("router.local", "192.168.1.1")],
        None,
        vec![100.0; 40],
    );
    let t0 = Instant::now();
    h.monitor.start_monitoring(t0).unwrap();
    h.monitor.scan_network().unwrap();
    let logged = h.monitor.state().log.len();

    let report = h.monitor.tick(t0 + Duration::from_secs(60)).unwrap();
    assert!(!report.rescan);
    assert!(h
        .monitor
        .state()
        .log
        .entries()
        .iter()
        .skip(logged)
        .all(|entry| entry.level != LogLevel::Warn));
    h.monitor.wait_pending().unwrap();
}
