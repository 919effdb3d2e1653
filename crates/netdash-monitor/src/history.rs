use chrono::{DateTime, Local};
use netdash_model::SpeedTestResult;
use std::collections::VecDeque;

/// Completed speed tests kept for the session summary.
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestRecord {
    pub at: DateTime<Local>,
    pub result: SpeedTestResult,
}

/// Bounded record of completed speed tests, oldest first. Independent of the
/// 20-row chart window.
#[derive(Debug, Clone)]
pub struct SpeedTestHistory {
    records: VecDeque<TestRecord>,
    capacity: usize,
}

impl SpeedTestHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, result: SpeedTestResult, at: DateTime<Local>) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TestRecord { at, result });
    }

    pub fn records(&self) -> impl Iterator<Item = &TestRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TestRecord> {
        self.records.back()
    }

    /// Mean of every kept result, `None` when empty.
    pub fn average(&self) -> Option<SpeedTestResult> {
        if self.records.is_empty() {
            return None;
        }
        let n = self.records.len() as f64;
        let sum = self
            .records
            .iter()
            .fold(SpeedTestResult::default(), |acc, record| SpeedTestResult {
                download: acc.download + record.result.download,
                upload: acc.upload + record.result.upload,
                ping: acc.ping + record.result.ping,
            });
        Some(SpeedTestResult {
            download: sum.download / n,
            upload: sum.upload / n,
            ping: sum.ping / n,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SpeedTestHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(download: f64) -> SpeedTestResult {
        SpeedTestResult {
            download,
            upload: 20.0,
            ping: 30.0,
        }
    }

    #[test]
    fn oldest_record_is_dropped_at_capacity() {
        let mut history = SpeedTestHistory::with_capacity(3);
        for n in 0..5 {
            history.push(result(n as f64), Local::now());
        }
        let kept: Vec<f64> = history.records().map(|r| r.result.download).collect();
        assert_eq!(kept, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.last().unwrap().result.download, 4.0);
    }

    #[test]
    fn average_covers_kept_records() {
        let mut history = SpeedTestHistory::new();
        assert!(history.average().is_none());
        history.push(result(60.0), Local::now());
        history.push(result(100.0), Local::now());

        let avg = history.average().unwrap();
        assert_eq!(avg.download, 80.0);
        assert_eq!(avg.ping, 30.0);
    }

    #[test]
    fn default_capacity_is_fifty() {
        let mut history = SpeedTestHistory::default();
        for n in 0..60 {
            history.push(result(n as f64), Local::now());
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.records().next().unwrap().result.download, 10.0);
    }
}
