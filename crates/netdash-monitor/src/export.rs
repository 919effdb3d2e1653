use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, SecondsFormat};
use netdash_model::{Device, SortField};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn csv_header() -> String {
    SortField::ALL
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(",")
}

/// Values are joined verbatim; embedded commas are not escaped.
pub fn csv_row(device: &Device) -> String {
    [
        device.hostname.clone(),
        device.ip.clone(),
        device.mac.clone(),
        device.device_type.to_string(),
        device.manufacturer.clone(),
        device.os.clone(),
        device.response_time_ms.to_string(),
        device.last_seen.to_rfc3339_opts(SecondsFormat::Secs, true),
        device.status.to_string(),
    ]
    .join(",")
}

/// Header line then one line per device.
pub fn devices_to_csv<'a, I>(devices: I) -> String
where
    I: IntoIterator<Item = &'a Device>,
{
    let mut out = csv_header();
    out.push('\n');
    for device in devices {
        out.push_str(&csv_row(device));
        out.push('\n');
    }
    out
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("network-devices-{}.csv", date.format("%Y-%m-%d"))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &json)
}

/// Stages `data` in a hidden sibling file, renames it over `path`, then
/// syncs the directory so the rename survives a crash.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {:?}", dir))?;

    let staging = staging_path(dir, path);
    let staged = fs::File::create(&staging).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(err) = staged {
        let _ = fs::remove_file(&staging);
        return Err(anyhow!("failed to stage {:?}: {}", staging, err));
    }

    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(anyhow!("failed to move export into place {:?}: {}", path, err));
    }

    // not every platform lets a directory be opened for syncing
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
    Ok(())
}

fn staging_path(dir: &Path, path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("export");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    dir.join(format!(".{name}.{}-{nanos}.tmp", std::process::id()))
}
