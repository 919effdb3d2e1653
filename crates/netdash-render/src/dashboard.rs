use crate::chart::{bar_chart, legend, line_chart, Bar, ChartSeries};
use crate::table;
use crate::text::{center, finish, line, Line, Span, UiOpts};
use crossterm::style::Color;
use netdash_monitor::{
    classify_download, classify_ping, classify_upload, AppState, LogLevel, SeriesName,
    SpeedTestState, Tier,
};

const TITLE: &str = "NETWORK MONITOR";
const CHART_HEIGHT: usize = 8;
const BAR_WIDTH: usize = 40;
const LOG_LINES: usize = 6;
const MIN_TABLE_ROWS: usize = 3;

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Excellent => Color::Green,
        Tier::Good => Color::DarkGreen,
        Tier::Acceptable => Color::Yellow,
        Tier::Poor => Color::Red,
    }
}

fn tier_span(tier: Tier, opts: &UiOpts) -> Span {
    let text = if opts.ascii_only {
        format!("[{}]", tier.label())
    } else {
        format!("{} {}", tier.mark(), tier.label())
    };
    Span::colored(text, tier_color(tier))
}

fn button_bar(state: &AppState) -> Line {
    let monitor = if state.is_monitoring() {
        Span::colored("[m] Stop Monitoring", Color::Red)
    } else {
        Span::colored("[m] Start Monitoring", Color::Green)
    };
    vec![
        monitor,
        Span::raw("  [t] Speed Test  [s] Scan Network  [c] Detect Connection  [r] Refresh Devices  [e] Export CSV  [q] Quit"),
    ]
}

fn speed_lines(state: &AppState, opts: &UiOpts) -> Vec<Line> {
    let local = match state.series.last_sample() {
        Some(sample) => format!("{:.2} Mbps", sample.value),
        None => "-- Mbps".to_string(),
    };
    let mut first: Line = vec![
        Span::raw("Local speed: "),
        Span::colored(local, Color::Green),
    ];
    let connection = match state.connection {
        Some(connection) => Span::colored(connection.label(), Color::Cyan),
        None => Span::colored("not detected ([c] to detect)", Color::DarkGrey),
    };
    first.push(Span::raw("    Connection: "));
    first.push(connection);

    let mut second: Line = Vec::new();
    match (&state.speed_test, state.series.last_speed_test()) {
        (SpeedTestState::Running, _) => {
            second.push(Span::colored("Speed test running...", Color::Yellow));
        }
        (_, Some(result)) => {
            second.push(Span::raw(format!("Download: {:.2} Mbps ", result.download)));
            second.push(tier_span(classify_download(result.download), opts));
            second.push(Span::raw(format!("   Upload: {:.2} Mbps ", result.upload)));
            second.push(tier_span(classify_upload(result.upload), opts));
            second.push(Span::raw(format!("   Ping: {:.2} ms ", result.ping)));
            second.push(tier_span(classify_ping(result.ping), opts));
        }
        (_, None) => {
            second.push(Span::raw("Download: -- Mbps   Upload: -- Mbps   Ping: -- ms"));
        }
    }
    if let SpeedTestState::Failed(message) = &state.speed_test {
        second.push(Span::colored(
            format!("   (last test failed: {message})"),
            Color::Red,
        ));
    }

    let status = if state.is_monitoring() {
        Span::colored("Status: monitoring", Color::Green)
    } else {
        Span::colored("Status: idle", Color::DarkGrey)
    };

    vec![first, second, vec![status, history_span(state)]]
}

fn history_span(state: &AppState) -> Span {
    match state.history.average() {
        Some(avg) => Span::raw(format!(
            "    Session tests: {} (avg {:.2} down, {:.2} up Mbps, {:.2} ms)",
            state.history.len(),
            avg.download,
            avg.upload,
            avg.ping
        )),
        None => Span::colored("    Session tests: none yet", Color::DarkGrey),
    }
}

fn chart_lines(state: &AppState) -> Vec<Line> {
    let local = state.series.points(SeriesName::Local);
    let download = state.series.points(SeriesName::Download);
    let upload = state.series.points(SeriesName::Upload);
    let series = [
        ChartSeries {
            name: "local",
            glyph: '*',
            color: Color::Green,
            points: &local,
        },
        ChartSeries {
            name: "download",
            glyph: 'd',
            color: Color::Blue,
            points: &download,
        },
        ChartSeries {
            name: "upload",
            glyph: 'u',
            color: Color::Yellow,
            points: &upload,
        },
    ];

    let labels = state.series.labels();
    let first = labels
        .first()
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let last = labels
        .last()
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    let mut title: Line = vec![Span::raw("Speed history (Mbps)   ")];
    title.extend(legend(&series));

    let mut lines = vec![title];
    lines.extend(line_chart(&series, (&first, &last), CHART_HEIGHT));
    lines
}

fn comparison_lines(state: &AppState, opts: &UiOpts) -> Vec<Line> {
    let bars = [
        Bar {
            label: "Local",
            value: state.series.latest(SeriesName::Local),
            unit: "Mbps",
            color: Color::Green,
        },
        Bar {
            label: "Download",
            value: state.series.latest(SeriesName::Download),
            unit: "Mbps",
            color: Color::Blue,
        },
        Bar {
            label: "Upload",
            value: state.series.latest(SeriesName::Upload),
            unit: "Mbps",
            color: Color::Yellow,
        },
    ];
    let mut lines = vec![line("Latest values")];
    lines.extend(bar_chart(&bars, BAR_WIDTH, opts.ascii_only));
    lines
}

fn device_heading(state: &AppState) -> Line {
    let summary = state.registry.summary();
    let mut heading = vec![
        Span::raw("Devices: "),
        Span::colored(summary.total.to_string(), Color::Cyan),
        Span::raw(format!(" ({} online)", summary.online)),
    ];
    if let Some(sort) = state.registry.sort() {
        heading.push(Span::raw(format!(
            "   sorted by {} {:?}",
            sort.field.key(),
            sort.direction
        )));
    }
    heading
}

fn log_lines(state: &AppState) -> Vec<Line> {
    let mut lines = vec![line("Activity")];
    for entry in state.log.tail(LOG_LINES) {
        let color = match entry.level {
            LogLevel::Info => Color::White,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        };
        lines.push(vec![
            Span::colored(format!("[{}] ", entry.at.format("%H:%M:%S")), Color::DarkGrey),
            Span::colored(entry.message.clone(), color),
        ]);
    }
    lines
}

/// Renders one full frame. Lines are clipped to `term_w`; the device table
/// takes whatever height the other panes leave over.
pub fn render_dashboard(state: &AppState, opts: &UiOpts, term_w: u16, term_h: u16) -> String {
    let width = term_w as usize;

    let mut top: Vec<Line> = vec![line(center(TITLE, width)), button_bar(state), Vec::new()];
    top.extend(speed_lines(state, opts));
    top.push(Vec::new());
    top.extend(chart_lines(state));
    top.push(Vec::new());
    top.extend(comparison_lines(state, opts));
    top.push(Vec::new());
    top.push(device_heading(state));
    top.push(table::header(state.registry.sort(), opts));

    let mut bottom: Vec<Line> = vec![Vec::new()];
    bottom.extend(log_lines(state));

    let fixed = top.len() + bottom.len();
    let table_rows = (term_h as usize).saturating_sub(fixed).max(MIN_TABLE_ROWS);
    let body = table::body(&state.registry, &state.scan, table_rows);

    top.into_iter()
        .chain(body)
        .chain(bottom)
        .map(|line| finish(&line, width, opts))
        .collect::<Vec<_>>()
        .join("\n")
}
