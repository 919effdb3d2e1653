use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use netdash_model::SortField;
use netdash_monitor::{Monitor, Renderer};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleMonitoring,
    SpeedTest,
    Scan,
    Refresh,
    DetectConnection,
    Export,
    Sort(SortField),
    Quit,
}

pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('m') => Some(Action::ToggleMonitoring),
        KeyCode::Char('t') => Some(Action::SpeedTest),
        KeyCode::Char('s') => Some(Action::Scan),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('c') => Some(Action::DetectConnection),
        KeyCode::Char('e') => Some(Action::Export),
        KeyCode::Char(ch) => ch
            .to_digit(10)
            .and_then(|n| SortField::from_column(n as usize))
            .map(Action::Sort),
        _ => None,
    }
}

/// Applies one action. Returns false when the dashboard should exit.
pub fn dispatch<R: Renderer>(monitor: &mut Monitor<R>, action: Action, now: Instant) -> Result<bool> {
    match action {
        Action::Quit => return Ok(false),
        Action::ToggleMonitoring => monitor.toggle_monitoring(now)?,
        Action::SpeedTest => monitor.run_speed_test()?,
        Action::Scan | Action::Refresh => monitor.scan_network()?,
        Action::DetectConnection => {
            monitor.detect_connection()?;
        }
        Action::Sort(field) => {
            monitor.sort_by(field)?;
        }
        Action::Export => {
            if let Err(err) = monitor.export_devices() {
                log::debug!("export left to the activity log: {err:#}");
            }
        }
    }
    Ok(true)
}
