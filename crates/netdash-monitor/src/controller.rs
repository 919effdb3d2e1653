use crate::classify::{classify_connection_type, ConnectionType};
use crate::export::{atomic_write, devices_to_csv, export_file_name};
use crate::series::SeriesName;
use crate::state::{AppState, ScanState, SpeedTestState};
use crate::timer::{TimerLoop, DEFAULT_TICK};
use anyhow::Result;
use chrono::Local;
use netdash_model::{Device, SortField, SortState, SpeedTestResult};
use netdash_probe::{
    spawn_scan, spawn_speed_test, DeviceScanner, LinkProbe, Pending, ProbeSettings, SimulatedLink,
    SimulatedScanner, SimulatedSpeedTester, SpeedTester,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Presentation side of the dashboard. Called after every state change.
pub trait Renderer {
    fn render(&mut self, state: &AppState) -> Result<()>;
}

pub const DEFAULT_AUTO_SCAN: Duration = Duration::from_secs(60);
pub const DEFAULT_AUTO_TEST: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub tick_period: Duration,
    pub export_dir: PathBuf,
    /// Rescan the network this often while monitoring.
    pub auto_scan: Option<Duration>,
    /// Run a speed test this often while monitoring.
    pub auto_test: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK,
            export_dir: PathBuf::from("."),
            auto_scan: Some(DEFAULT_AUTO_SCAN),
            auto_test: Some(DEFAULT_AUTO_TEST),
        }
    }
}

/// What a call to [`Monitor::tick`] set off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub sampled: bool,
    pub rescan: bool,
    pub retest: bool,
}

impl TickReport {
    pub fn any(&self) -> bool {
        self.sampled || self.rescan || self.retest
    }
}

fn poll_schedule(timer: &mut Option<TimerLoop>, now: Instant) -> bool {
    timer.as_mut().map_or(false, |timer| timer.poll(now))
}

/// The single orchestrator: owns the application state, the measurement
/// sources and the renderer. All store writes happen here, on the caller's
/// thread.
pub struct Monitor<R: Renderer> {
    config: MonitorConfig,
    state: AppState,
    renderer: R,
    scanner: Arc<dyn DeviceScanner>,
    tester: Arc<dyn SpeedTester>,
    link: Box<dyn LinkProbe>,
    pending_scan: Option<Pending<Vec<Device>>>,
    pending_test: Option<Pending<SpeedTestResult>>,
}

impl<R: Renderer> Monitor<R> {
    pub fn new(
        config: MonitorConfig,
        renderer: R,
        scanner: Arc<dyn DeviceScanner>,
        tester: Arc<dyn SpeedTester>,
        link: Box<dyn LinkProbe>,
    ) -> Self {
        let mut state = AppState::new(config.tick_period);
        state.auto_scan = config.auto_scan.map(TimerLoop::new);
        state.auto_test = config.auto_test.map(TimerLoop::new);
        Self {
            config,
            state,
            renderer,
            scanner,
            tester,
            link,
            pending_scan: None,
            pending_test: None,
        }
    }

    pub fn simulated(config: MonitorConfig, probe: &ProbeSettings, renderer: R) -> Self {
        Self::new(
            config,
            renderer,
            Arc::new(SimulatedScanner::new(probe)),
            Arc::new(SimulatedSpeedTester::new(probe)),
            Box::new(SimulatedLink::new(probe.seed)),
        )
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn render(&mut self) -> Result<()> {
        self.renderer.render(&self.state)
    }

    pub fn toggle_monitoring(&mut self, now: Instant) -> Result<()> {
        if self.state.is_monitoring() {
            self.stop_monitoring()?;
        } else {
            self.start_monitoring(now)?;
        }
        Ok(())
    }

    /// No-op returning false when already running.
    pub fn start_monitoring(&mut self, now: Instant) -> Result<bool> {
        if !self.state.timer.start(now) {
            return Ok(false);
        }
        for schedule in [&mut self.state.auto_scan, &mut self.state.auto_test] {
            if let Some(timer) = schedule {
                timer.start(now);
            }
        }
        self.state.log.info("Live monitoring started");
        self.render()?;
        Ok(true)
    }

    /// No-op returning false when already idle.
    pub fn stop_monitoring(&mut self) -> Result<bool> {
        if !self.state.timer.stop() {
            return Ok(false);
        }
        for schedule in [&mut self.state.auto_scan, &mut self.state.auto_test] {
            if let Some(timer) = schedule {
                timer.stop();
            }
        }
        self.state.log.info("Monitoring stopped");
        self.render()?;
        Ok(true)
    }

    /// Runs whatever is due: the local-speed sample, a scheduled rescan, a
    /// scheduled speed test. Redraws once if anything ran. A scheduled run
    /// is skipped silently while the same operation is still pending.
    pub fn tick(&mut self, now: Instant) -> Result<TickReport> {
        let mut report = TickReport::default();

        if self.state.timer.poll(now) {
            self.measure_local_speed();
            report.sampled = true;
        }
        if poll_schedule(&mut self.state.auto_scan, now) && self.pending_scan.is_none() {
            self.begin_scan("Auto-refresh: scanning network for devices...");
            report.rescan = true;
        }
        if poll_schedule(&mut self.state.auto_test, now) && self.pending_test.is_none() {
            self.begin_speed_test("Scheduled speed test started");
            report.retest = true;
        }

        if report.any() {
            self.render()?;
        }
        Ok(report)
    }

    fn measure_local_speed(&mut self) {
        match self.link.sample() {
            Ok(value) => {
                self.state.series.record_local_sample(value, Local::now());
            }
            Err(err) => {
                self.state
                    .log
                    .error(format!("Error measuring local speed: {err}"));
            }
        }
    }

    pub fn run_speed_test(&mut self) -> Result<()> {
        if self.pending_test.is_some() {
            self.state.log.warn("Speed test already running; request ignored");
            return self.render();
        }

        self.begin_speed_test("Running internet speed test...");
        self.render()
    }

    fn begin_speed_test(&mut self, message: &str) {
        self.state.log.info(message);
        match spawn_speed_test(self.tester.clone()) {
            Ok(pending) => {
                self.pending_test = Some(pending);
                self.state.speed_test = SpeedTestState::Running;
            }
            Err(err) => self.apply_speed_test(Err(err)),
        }
    }

    pub fn scan_network(&mut self) -> Result<()> {
        if self.pending_scan.is_some() {
            self.state.log.warn("Scan already in progress; request ignored");
            return self.render();
        }

        self.begin_scan("Scanning network for devices...");
        self.render()
    }

    fn begin_scan(&mut self, message: &str) {
        self.state.log.info(message);
        match spawn_scan(self.scanner.clone()) {
            Ok(pending) => {
                self.pending_scan = Some(pending);
                self.state.scan = ScanState::Scanning;
            }
            Err(err) => self.apply_scan(Err(err)),
        }
    }

    /// Classifies the latest local-speed sample.
    pub fn detect_connection(&mut self) -> Result<ConnectionType> {
        let local = self.state.series.latest(SeriesName::Local);
        let connection = classify_connection_type(local);
        self.state.connection = Some(connection);
        self.state
            .log
            .info(format!("Connection type detected: {}", connection.label()));
        self.state
            .log
            .info(format!("Current local speed: {local:.2} Mbps"));
        self.render()?;
        Ok(connection)
    }

    pub fn sort_by(&mut self, field: SortField) -> Result<SortState> {
        let sort = self.state.registry.select_sort(field);
        self.render()?;
        Ok(sort)
    }

    /// Writes the displayed device table as CSV into the export directory.
    /// An empty registry produces no file and returns `None`.
    pub fn export_devices(&mut self) -> Result<Option<PathBuf>> {
        if self.state.registry.is_empty() {
            self.state.log.warn("No devices to export; run a scan first");
            self.render()?;
            return Ok(None);
        }

        let csv = devices_to_csv(self.state.registry.sorted());
        let path = self
            .config
            .export_dir
            .join(export_file_name(Local::now().date_naive()));

        match atomic_write(&path, csv.as_bytes()) {
            Ok(()) => {
                self.state.log.info(format!(
                    "Exported {} devices to {}",
                    self.state.registry.len(),
                    path.display()
                ));
                self.render()?;
                Ok(Some(path))
            }
            Err(err) => {
                self.state.log.error(format!("Export failed: {err}"));
                self.render()?;
                Err(err)
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending_scan.is_some() || self.pending_test.is_some()
    }

    /// Applies any completed scan or speed test. Returns true if something
    /// landed.
    pub fn poll_pending(&mut self) -> Result<bool> {
        let mut changed = false;

        let scan = self.pending_scan.as_ref().and_then(|p| p.try_take());
        if let Some(result) = scan {
            self.pending_scan = None;
            self.apply_scan(result);
            changed = true;
        }

        let test = self.pending_test.as_ref().and_then(|p| p.try_take());
        if let Some(result) = test {
            self.pending_test = None;
            self.apply_speed_test(result);
            changed = true;
        }

        if changed {
            self.render()?;
        }
        Ok(changed)
    }

    /// Blocks until every outstanding operation has completed and been
    /// applied.
    pub fn wait_pending(&mut self) -> Result<()> {
        if let Some(pending) = self.pending_scan.take() {
            self.apply_scan(pending.wait());
        }
        if let Some(pending) = self.pending_test.take() {
            self.apply_speed_test(pending.wait());
        }
        self.render()
    }

    fn apply_scan(&mut self, result: Result<Vec<Device>>) {
        match result {
            Ok(devices) => {
                let count = devices.len();
                self.state.registry.replace(devices);
                self.state.scan = ScanState::Complete;
                self.state
                    .log
                    .info(format!("Found {count} devices on the network"));
            }
            Err(err) => {
                let message = format!("{err:#}");
                self.state
                    .log
                    .error(format!("Network scan failed: {message}"));
                self.state.scan = ScanState::Failed(message);
            }
        }
    }

    fn apply_speed_test(&mut self, result: Result<SpeedTestResult>) {
        match result {
            Ok(result) => {
                self.state.series.record_speed_test(result);
                self.state.history.push(result, Local::now());
                self.state.speed_test = SpeedTestState::Complete;
                self.state.log.info(format!(
                    "Speed test complete: Download {:.2} Mbps, Upload {:.2} Mbps, Ping {:.2} ms",
                    result.download, result.upload, result.ping
                ));
            }
            Err(err) => {
                let message = format!("{err:#}");
                self.state
                    .log
                    .error(format!("Speed test failed: {message}"));
                self.state.speed_test = SpeedTestState::Failed(message);
            }
        }
    }
}
