//! Shared data structures for netdash.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One periodic local-speed reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SpeedTestResult {
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Computer,
    Phone,
    Router,
    Tablet,
    Iot,
    Printer,
}

impl DeviceType {
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Computer,
        DeviceType::Phone,
        DeviceType::Router,
        DeviceType::Tablet,
        DeviceType::Iot,
        DeviceType::Printer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Computer => "computer",
            DeviceType::Phone => "phone",
            DeviceType::Router => "router",
            DeviceType::Tablet => "tablet",
            DeviceType::Iot => "iot",
            DeviceType::Printer => "printer",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered host. Never mutated after creation; a scan replaces the
/// whole set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub ip: String,
    pub mac: String,
    pub hostname: String,
    pub manufacturer: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub os: String,
    pub response_time_ms: u32,
    pub last_seen: DateTime<Utc>,
    pub status: DeviceStatus,
}

/// Device table columns, in display and export order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Hostname,
    Ip,
    Mac,
    Type,
    Manufacturer,
    Os,
    ResponseTimeMs,
    LastSeen,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Hostname,
        SortField::Ip,
        SortField::Mac,
        SortField::Type,
        SortField::Manufacturer,
        SortField::Os,
        SortField::ResponseTimeMs,
        SortField::LastSeen,
        SortField::Status,
    ];

    /// Column key, used for the CSV header and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            SortField::Hostname => "hostname",
            SortField::Ip => "ip",
            SortField::Mac => "mac",
            SortField::Type => "type",
            SortField::Manufacturer => "manufacturer",
            SortField::Os => "os",
            SortField::ResponseTimeMs => "responseTimeMs",
            SortField::LastSeen => "lastSeen",
            SortField::Status => "status",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SortField::Hostname => "Hostname",
            SortField::Ip => "IP",
            SortField::Mac => "MAC",
            SortField::Type => "Type",
            SortField::Manufacturer => "Vendor",
            SortField::Os => "OS",
            SortField::ResponseTimeMs => "Resp",
            SortField::LastSeen => "Last Seen",
            SortField::Status => "Status",
        }
    }

    /// 1-based column number bound to the number keys.
    pub fn from_column(column: usize) -> Option<SortField> {
        column
            .checked_sub(1)
            .and_then(|idx| SortField::ALL.get(idx))
            .copied()
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .copied()
            .find(|field| field.key().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                let keys: Vec<&str> = SortField::ALL.iter().map(|field| field.key()).collect();
                format!("unknown sort field {value:?} (expected one of {})", keys.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn device() -> Device {
        Device {
            ip: "192.168.1.1".to_string(),
            mac: "AA:BB:CC:DD:EE:FF".to_string(),
            hostname: "router.local".to_string(),
            manufacturer: "TP-Link".to_string(),
            device_type: DeviceType::Router,
            os: "RouterOS".to_string(),
            response_time_ms: 1,
            last_seen: Utc.with_ymd_and_hms(2026, 2, 1, 12, 34, 56).unwrap(),
            status: DeviceStatus::Online,
        }
    }

    #[test]
    fn device_json_uses_column_keys() {
        let json = serde_json::to_value(device()).unwrap();

        assert_eq!(json["type"], "router");
        assert_eq!(json["status"], "online");
        assert_eq!(json["responseTimeMs"], 1);
        assert_eq!(json["lastSeen"], "2026-02-01T12:34:56Z");

        let decoded: Device = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, device());
    }

    #[test]
    fn sort_field_parses_keys_case_insensitively() {
        assert_eq!("ip".parse::<SortField>(), Ok(SortField::Ip));
        assert_eq!(
            "RESPONSETIMEMS".parse::<SortField>(),
            Ok(SortField::ResponseTimeMs)
        );
        assert!("speed".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_field_columns_are_one_based() {
        assert_eq!(SortField::from_column(0), None);
        assert_eq!(SortField::from_column(1), Some(SortField::Hostname));
        assert_eq!(SortField::from_column(9), Some(SortField::Status));
        assert_eq!(SortField::from_column(10), None);
    }
}
