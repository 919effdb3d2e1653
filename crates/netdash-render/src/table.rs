use crate::text::{fit, Line, Span, UiOpts};
use chrono::Local;
use crossterm::style::Color;
use netdash_model::{Device, DeviceStatus, SortDirection, SortField, SortState};
use netdash_monitor::{classify_response_time, DeviceRegistry, LinkQuality, ScanState};

pub const SCANNING: &str = "Scanning network... Please wait.";
pub const SCAN_FAILED: &str = "Scan failed. Please try again.";
pub const NO_DEVICES: &str = "No devices found on the network.";
pub const NOT_SCANNED: &str = "No scan yet. Press [s] to scan the network.";

/// Trailing, unsortable column derived from the response time.
const LINK_TITLE: &str = "Link";
const LINK_WIDTH: usize = 9;

fn column_width(field: SortField) -> usize {
    match field {
        SortField::Hostname => 24,
        SortField::Ip => 15,
        SortField::Mac => 17,
        SortField::Type => 8,
        SortField::Manufacturer => 9,
        SortField::Os => 8,
        SortField::ResponseTimeMs => 7,
        SortField::LastSeen => 12,
        SortField::Status => 9,
    }
}

fn sort_marker(direction: SortDirection, opts: &UiOpts) -> &'static str {
    match (direction, opts.ascii_only) {
        (SortDirection::Asc, false) => "▲",
        (SortDirection::Desc, false) => "▼",
        (SortDirection::Asc, true) => "^",
        (SortDirection::Desc, true) => "v",
    }
}

/// Header cells are prefixed with the number key that sorts them.
pub fn header(sort: Option<SortState>, opts: &UiOpts) -> Line {
    let mut cells = Vec::new();
    for (idx, field) in SortField::ALL.iter().enumerate() {
        let mut title = format!("{}:{}", idx + 1, field.title());
        if let Some(state) = sort.filter(|state| state.field == *field) {
            title.push_str(sort_marker(state.direction, opts));
        }
        cells.push(fit(&title, column_width(*field)));
    }
    cells.push(fit(LINK_TITLE, LINK_WIDTH));
    vec![Span::colored(cells.join(" "), Color::Cyan)]
}

fn cell(device: &Device, field: SortField) -> String {
    match field {
        SortField::Hostname => device.hostname.clone(),
        SortField::Ip => device.ip.clone(),
        SortField::Mac => device.mac.clone(),
        SortField::Type => device.device_type.to_string(),
        SortField::Manufacturer => device.manufacturer.clone(),
        SortField::Os => device.os.clone(),
        SortField::ResponseTimeMs => format!("{}ms", device.response_time_ms),
        SortField::LastSeen => device
            .last_seen
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string(),
        SortField::Status => device.status.to_string(),
    }
}

pub fn row(device: &Device) -> Line {
    let mut line = Vec::new();
    for (idx, field) in SortField::ALL.iter().enumerate() {
        if idx > 0 {
            line.push(Span::raw(" "));
        }
        let text = fit(&cell(device, *field), column_width(*field));
        match (field, device.status) {
            (SortField::Status, DeviceStatus::Online) => line.push(Span::colored(text, Color::Green)),
            (SortField::Status, DeviceStatus::Offline) => line.push(Span::colored(text, Color::Red)),
            _ => line.push(Span::raw(text)),
        }
    }
    let quality = classify_response_time(device.response_time_ms);
    line.push(Span::raw(" "));
    line.push(Span::colored(
        fit(quality.label(), LINK_WIDTH),
        quality_color(quality),
    ));
    line
}

fn quality_color(quality: LinkQuality) -> Color {
    match quality {
        LinkQuality::Excellent => Color::Green,
        LinkQuality::Good => Color::Cyan,
        LinkQuality::Fair => Color::Yellow,
        LinkQuality::Slow => Color::Red,
    }
}

/// Table body for the current scan state, at most `max_rows` lines.
pub fn body(registry: &DeviceRegistry, scan: &ScanState, max_rows: usize) -> Vec<Line> {
    let placeholder = match scan {
        ScanState::Scanning => Some(Span::colored(SCANNING, Color::Yellow)),
        ScanState::Failed(_) => Some(Span::colored(SCAN_FAILED, Color::Red)),
        ScanState::Idle if registry.is_empty() => Some(Span::colored(NOT_SCANNED, Color::DarkGrey)),
        ScanState::Complete if registry.is_empty() => {
            Some(Span::colored(NO_DEVICES, Color::DarkGrey))
        }
        _ => None,
    };
    if let Some(span) = placeholder {
        return vec![vec![span]];
    }

    let devices = registry.sorted();
    let max_rows = max_rows.max(1);
    if devices.len() <= max_rows {
        return devices.into_iter().map(row).collect();
    }

    let shown = max_rows - 1;
    let mut lines: Vec<Line> = devices.iter().take(shown).map(|device| row(device)).collect();
    lines.push(vec![Span::colored(
        format!("... {} more", devices.len() - shown),
        Color::DarkGrey,
    )]);
    lines
}
