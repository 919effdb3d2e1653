use crate::activity::ActivityLog;
use crate::classify::ConnectionType;
use crate::history::SpeedTestHistory;
use crate::registry::DeviceRegistry;
use crate::series::SpeedSeries;
use crate::timer::TimerLoop;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Complete,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedTestState {
    Idle,
    Running,
    Complete,
    Failed(String),
}

/// Everything the dashboard shows, owned by the [`Monitor`](crate::Monitor).
#[derive(Debug, Clone)]
pub struct AppState {
    pub timer: TimerLoop,
    /// Periodic rescan while monitoring; `None` when disabled.
    pub auto_scan: Option<TimerLoop>,
    /// Periodic speed test while monitoring; `None` when disabled.
    pub auto_test: Option<TimerLoop>,
    pub series: SpeedSeries,
    pub history: SpeedTestHistory,
    pub registry: DeviceRegistry,
    pub scan: ScanState,
    pub speed_test: SpeedTestState,
    /// Result of the last explicit detection request.
    pub connection: Option<ConnectionType>,
    pub log: ActivityLog,
}

impl AppState {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            timer: TimerLoop::new(tick_period),
            auto_scan: None,
            auto_test: None,
            series: SpeedSeries::new(),
            history: SpeedTestHistory::new(),
            registry: DeviceRegistry::new(),
            scan: ScanState::Idle,
            speed_test: SpeedTestState::Idle,
            connection: None,
            log: ActivityLog::new(),
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.timer.is_running()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::timer::DEFAULT_TICK)
    }
}
