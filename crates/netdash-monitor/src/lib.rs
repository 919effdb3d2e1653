//! Dashboard state, stores and the monitor controller.

pub mod activity;
pub mod classify;
pub mod controller;
pub mod export;
pub mod history;
pub mod registry;
pub mod series;
pub mod state;
pub mod timer;

pub use activity::{ActivityLog, LogEntry, LogLevel, ACTIVITY_LOG_TARGET};
pub use classify::{
    classify_connection_type, classify_download, classify_ping, classify_response_time,
    classify_upload, grade_speed_test, ConnectionType, LinkQuality, SpeedTestGrade, Tier,
};
pub use controller::{
    Monitor, MonitorConfig, Renderer, TickReport, DEFAULT_AUTO_SCAN, DEFAULT_AUTO_TEST,
};
pub use export::{atomic_write, csv_header, devices_to_csv, export_file_name, write_json};
pub use history::{SpeedTestHistory, TestRecord, HISTORY_CAPACITY};
pub use registry::{compare_devices, next_sort, sort_devices, DeviceRegistry, RegistrySummary};
pub use series::{SeriesName, SpeedSeries, WINDOW};
pub use state::{AppState, ScanState, SpeedTestState};
pub use timer::{TimerLoop, DEFAULT_TICK};
