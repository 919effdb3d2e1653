use anyhow::Result;
use chrono::{DateTime, Local};
use netdash_monitor::{AppState, LogLevel, Renderer};
use std::io::Write;

/// Line-oriented renderer for headless runs. Each render prints only what
/// changed since the previous one: new activity entries and a fresh
/// local-speed sample.
pub struct PlainRenderer<W: Write> {
    out: W,
    printed_entries: usize,
    last_sample_at: Option<DateTime<Local>>,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_entries: 0,
            last_sample_at: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn render(&mut self, state: &AppState) -> Result<()> {
        for entry in state.log.entries().iter().skip(self.printed_entries) {
            let level = match entry.level {
                LogLevel::Info => "",
                LogLevel::Warn => "warning: ",
                LogLevel::Error => "error: ",
            };
            writeln!(
                self.out,
                "[{}] {level}{}",
                entry.at.format("%H:%M:%S"),
                entry.message
            )?;
        }
        self.printed_entries = state.log.len();

        if let Some(sample) = state.series.last_sample() {
            if self.last_sample_at != Some(sample.timestamp) {
                writeln!(
                    self.out,
                    "[{}] local speed {:.2} Mbps",
                    sample.timestamp.format("%H:%M:%S"),
                    sample.value
                )?;
                self.last_sample_at = Some(sample.timestamp);
            }
        }

        self.out.flush()?;
        Ok(())
    }
}
