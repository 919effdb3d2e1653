mod tui;
mod watch;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use netdash_model::{SortDirection, SortField};
use netdash_monitor::{
    atomic_write, devices_to_csv, grade_speed_test, sort_devices, write_json, Monitor,
    MonitorConfig, ACTIVITY_LOG_TARGET,
};
use netdash_probe::{
    DeviceScanner, ProbeSettings, SimulatedScanner, SimulatedSpeedTester, SpeedTester,
};
use netdash_render::UiOpts;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tui::{event_loop, TerminalRenderer, Tui};
use watch::PlainRenderer;

const WATCH_POLL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(
    name = "netdash",
    version,
    about = "Network monitor dashboard (simulated telemetry)",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    dashboard: DashboardArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal dashboard (the default).
    Dashboard(DashboardArgs),
    /// Run one device scan and print or save the table.
    Scan(ScanArgs),
    /// Run one speed test and print the graded result.
    Speedtest(SpeedtestArgs),
    /// Headless live monitoring as plain text lines.
    Watch(WatchArgs),
}

#[derive(Args)]
struct DashboardArgs {
    #[arg(long)]
    plain: bool,

    #[arg(long)]
    ascii: bool,

    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(100..))]
    tick_ms: u64,

    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    #[arg(long)]
    seed: Option<u64>,

    /// Start live monitoring immediately.
    #[arg(long)]
    autostart: bool,

    #[arg(long, default_value = "netdash.log")]
    log_file: PathBuf,

    #[command(flatten)]
    schedule: ScheduleArgs,
}

/// Background work repeated while monitoring is on.
#[derive(Args)]
struct ScheduleArgs {
    /// Seconds between automatic device rescans.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(30..=300))]
    refresh_secs: u64,

    #[arg(long)]
    no_auto_refresh: bool,

    /// Seconds between automatic speed tests.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(10..))]
    test_interval_secs: u64,

    #[arg(long)]
    no_auto_test: bool,
}

impl ScheduleArgs {
    fn auto_scan(&self) -> Option<Duration> {
        (!self.no_auto_refresh).then(|| Duration::from_secs(self.refresh_secs))
    }

    fn auto_test(&self) -> Option<Duration> {
        (!self.no_auto_test).then(|| Duration::from_secs(self.test_interval_secs))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Args)]
struct ScanArgs {
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Column to sort by (hostname, ip, mac, type, manufacturer, os,
    /// responseTimeMs, lastSeen, status).
    #[arg(long)]
    sort: Option<SortField>,

    #[arg(long, requires = "sort")]
    desc: bool,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 2000)]
    latency_ms: u64,
}

#[derive(Args)]
struct SpeedtestArgs {
    #[arg(long)]
    json: bool,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 3000)]
    latency_ms: u64,
}

#[derive(Args)]
struct WatchArgs {
    /// Stop after this many local-speed ticks.
    #[arg(long)]
    ticks: Option<u32>,

    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(100..))]
    tick_ms: u64,

    #[arg(long)]
    seed: Option<u64>,

    /// Also scan the network once at startup.
    #[arg(long)]
    scan: bool,

    /// Also run a speed test at startup.
    #[arg(long)]
    speed_test: bool,

    #[command(flatten)]
    schedule: ScheduleArgs,
}

#[derive(Serialize)]
struct SpeedTestReport {
    download: f64,
    upload: f64,
    ping: f64,
    download_status: &'static str,
    upload_status: &'static str,
    ping_status: &'static str,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Dashboard(args)) => run_dashboard(args),
        Some(Commands::Scan(args)) => run_scan(args),
        Some(Commands::Speedtest(args)) => run_speedtest(args),
        Some(Commands::Watch(args)) => run_watch(args),
        None => run_dashboard(cli.dashboard),
    }
}

fn log_env() -> env_logger::Env<'static> {
    env_logger::Env::default().default_filter_or("info")
}

/// The dashboard owns the terminal, so log records go to a file.
fn init_file_logging(path: &Path) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| anyhow!("failed to open log file {:?}: {}", path, err))?;
    env_logger::Builder::from_env(log_env())
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Headless commands print activity to stdout themselves, so without
/// RUST_LOG the activity target is muted and stderr only carries warnings.
fn headless_logger(rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.format_timestamp_millis();
    match rust_log {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            builder
                .filter_level(LevelFilter::Warn)
                .filter_module(ACTIVITY_LOG_TARGET, LevelFilter::Off);
        }
    }
    builder
}

fn init_stderr_logging() {
    let rust_log = std::env::var("RUST_LOG").ok();
    headless_logger(rust_log.as_deref()).init();
}

fn run_dashboard(args: DashboardArgs) -> Result<()> {
    init_file_logging(&args.log_file)?;
    log::info!(
        "starting netdash v{} (tick {} ms, export dir {:?})",
        env!("CARGO_PKG_VERSION"),
        args.tick_ms,
        args.export_dir
    );

    let config = MonitorConfig {
        tick_period: Duration::from_millis(args.tick_ms),
        export_dir: args.export_dir,
        auto_scan: args.schedule.auto_scan(),
        auto_test: args.schedule.auto_test(),
    };
    let probe = ProbeSettings {
        seed: args.seed,
        ..ProbeSettings::default()
    };
    let opts = UiOpts {
        plain: args.plain,
        ascii_only: args.ascii,
    };

    let mut tui = Tui::setup()?;
    Tui::install_panic_hook();

    let mut monitor = Monitor::simulated(config, &probe, TerminalRenderer::new(opts));
    let result = drive_dashboard(&mut monitor, args.autostart);
    tui.teardown();

    log::info!("dashboard closed");
    result
}

fn drive_dashboard(monitor: &mut Monitor<TerminalRenderer>, autostart: bool) -> Result<()> {
    monitor.render()?;
    if autostart {
        monitor.start_monitoring(Instant::now())?;
    }
    event_loop(monitor)
}

fn run_scan(args: ScanArgs) -> Result<()> {
    init_stderr_logging();

    let probe = ProbeSettings {
        scan_latency: Duration::from_millis(args.latency_ms),
        seed: args.seed,
        ..ProbeSettings::default()
    };
    let mut devices = SimulatedScanner::new(&probe).scan()?;
    if let Some(field) = args.sort {
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        sort_devices(&mut devices, field, direction);
    }
    log::info!("scan found {} devices", devices.len());

    match (args.format, args.out) {
        (OutputFormat::Csv, Some(path)) => {
            atomic_write(&path, devices_to_csv(&devices).as_bytes())?;
            eprintln!("wrote {} devices to {:?}", devices.len(), path);
        }
        (OutputFormat::Json, Some(path)) => {
            write_json(&path, &devices)?;
            eprintln!("wrote {} devices to {:?}", devices.len(), path);
        }
        (OutputFormat::Csv, None) => print!("{}", devices_to_csv(&devices)),
        (OutputFormat::Json, None) => println!("{}", serde_json::to_string_pretty(&devices)?),
    }
    Ok(())
}

fn run_speedtest(args: SpeedtestArgs) -> Result<()> {
    init_stderr_logging();

    let probe = ProbeSettings {
        speed_test_latency: Duration::from_millis(args.latency_ms),
        seed: args.seed,
        ..ProbeSettings::default()
    };
    let result = SimulatedSpeedTester::new(&probe).run()?;
    let grade = grade_speed_test(&result);

    if args.json {
        let report = SpeedTestReport {
            download: result.download,
            upload: result.upload,
            ping: result.ping,
            download_status: grade.download.label(),
            upload_status: grade.upload.label(),
            ping_status: grade.ping.label(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Download: {:>7.2} Mbps  {}", result.download, grade.download.label());
        println!("Upload:   {:>7.2} Mbps  {}", result.upload, grade.upload.label());
        println!("Ping:     {:>7.2} ms    {}", result.ping, grade.ping.label());
    }
    Ok(())
}

fn run_watch(args: WatchArgs) -> Result<()> {
    init_stderr_logging();

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .map_err(|err| anyhow!("failed to install Ctrl-C handler: {err}"))?;
    }

    let config = MonitorConfig {
        tick_period: Duration::from_millis(args.tick_ms),
        auto_scan: args.schedule.auto_scan(),
        auto_test: args.schedule.auto_test(),
        ..MonitorConfig::default()
    };
    let probe = ProbeSettings {
        seed: args.seed,
        ..ProbeSettings::default()
    };
    let mut monitor = Monitor::simulated(config, &probe, PlainRenderer::new(io::stdout()));

    monitor.start_monitoring(Instant::now())?;
    if args.scan {
        monitor.scan_network()?;
    }
    if args.speed_test {
        monitor.run_speed_test()?;
    }

    let mut ticks = 0u32;
    while !stop.load(Ordering::SeqCst) {
        if args.ticks.is_some_and(|limit| ticks >= limit) {
            monitor.wait_pending()?;
            break;
        }
        sleep(WATCH_POLL);
        if monitor.tick(Instant::now())?.sampled {
            ticks += 1;
        }
        monitor.poll_pending()?;
    }

    monitor.stop_monitoring()?;
    Ok(())
}
