use chrono::{DateTime, Local};
use netdash_model::{Sample, SpeedTestResult};

/// Rows kept in the rolling window.
pub const WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesName {
    Local,
    Download,
    Upload,
    Ping,
}

impl SeriesName {
    pub const ALL: [SeriesName; 4] = [
        SeriesName::Local,
        SeriesName::Download,
        SeriesName::Upload,
        SeriesName::Ping,
    ];
}

/// Rolling speed history. One row per local-speed tick; all columns share
/// the row index and are evicted together.
///
/// Download, upload and ping arrive on their own cadence, so each tick
/// carries the most recent speed-test result forward. A speed test that
/// completes between ticks overwrites the newest row.
#[derive(Debug, Clone, Default)]
pub struct SpeedSeries {
    labels: Vec<DateTime<Local>>,
    local: Vec<f64>,
    download: Vec<Option<f64>>,
    upload: Vec<Option<f64>>,
    ping: Vec<Option<f64>>,
    carried: Option<SpeedTestResult>,
}

impl SpeedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_local_sample(&mut self, value: f64, at: DateTime<Local>) -> Sample {
        let carried = self.carried;
        self.labels.push(at);
        self.local.push(value);
        self.download.push(carried.map(|r| r.download));
        self.upload.push(carried.map(|r| r.upload));
        self.ping.push(carried.map(|r| r.ping));

        if self.labels.len() > WINDOW {
            self.labels.remove(0);
            self.local.remove(0);
            self.download.remove(0);
            self.upload.remove(0);
            self.ping.remove(0);
        }

        Sample {
            timestamp: at,
            value,
        }
    }

    /// Stores a result under the newest existing label; with no rows yet it
    /// shows up on the next tick.
    pub fn record_speed_test(&mut self, result: SpeedTestResult) {
        self.carried = Some(result);
        if let Some(slot) = self.download.last_mut() {
            *slot = Some(result.download);
        }
        if let Some(slot) = self.upload.last_mut() {
            *slot = Some(result.upload);
        }
        if let Some(slot) = self.ping.last_mut() {
            *slot = Some(result.ping);
        }
    }

    /// Most recent value, zero when nothing was recorded.
    pub fn latest(&self, name: SeriesName) -> f64 {
        match name {
            SeriesName::Local => self.local.last().copied().unwrap_or(0.0),
            SeriesName::Download => self.carried.map(|r| r.download).unwrap_or(0.0),
            SeriesName::Upload => self.carried.map(|r| r.upload).unwrap_or(0.0),
            SeriesName::Ping => self.carried.map(|r| r.ping).unwrap_or(0.0),
        }
    }

    pub fn last_sample(&self) -> Option<Sample> {
        match (self.labels.last(), self.local.last()) {
            (Some(timestamp), Some(value)) => Some(Sample {
                timestamp: *timestamp,
                value: *value,
            }),
            _ => None,
        }
    }

    pub fn last_speed_test(&self) -> Option<SpeedTestResult> {
        self.carried
    }

    pub fn labels(&self) -> &[DateTime<Local>] {
        &self.labels
    }

    pub fn points(&self, name: SeriesName) -> Vec<Option<f64>> {
        match name {
            SeriesName::Local => self.local.iter().copied().map(Some).collect(),
            SeriesName::Download => self.download.clone(),
            SeriesName::Upload => self.upload.clone(),
            SeriesName::Ping => self.ping.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
