use netdash_model::{Device, DeviceStatus, SortDirection, SortField, SortState};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    pub total: usize,
    pub online: usize,
}

/// Snapshot of the last successful scan plus the table's sort selection.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    sort: Option<SortState>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new scan wholesale; the sort selection survives.
    pub fn replace(&mut self, devices: Vec<Device>) {
        self.devices = devices;
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Header click: same column flips direction, another column starts
    /// ascending.
    pub fn select_sort(&mut self, field: SortField) -> SortState {
        let next = next_sort(self.sort, field);
        self.sort = Some(next);
        next
    }

    /// Devices in display order, recomputed from the current sort state.
    pub fn sorted(&self) -> Vec<&Device> {
        let mut view: Vec<&Device> = self.devices.iter().collect();
        if let Some(state) = self.sort {
            view.sort_by(|a, b| directed(compare_devices(a, b, state.field), state.direction));
        }
        view
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            total: self.devices.len(),
            online: self
                .devices
                .iter()
                .filter(|device| device.status == DeviceStatus::Online)
                .count(),
        }
    }
}

pub fn next_sort(current: Option<SortState>, field: SortField) -> SortState {
    match current {
        Some(state) if state.field == field => SortState {
            field,
            direction: state.direction.reversed(),
        },
        _ => SortState {
            field,
            direction: SortDirection::Asc,
        },
    }
}

/// Response time compares numerically, last-seen chronologically, all other
/// columns as case-sensitive strings.
pub fn compare_devices(a: &Device, b: &Device, field: SortField) -> Ordering {
    match field {
        SortField::Hostname => a.hostname.cmp(&b.hostname),
        SortField::Ip => a.ip.cmp(&b.ip),
        SortField::Mac => a.mac.cmp(&b.mac),
        SortField::Type => a.device_type.as_str().cmp(b.device_type.as_str()),
        SortField::Manufacturer => a.manufacturer.cmp(&b.manufacturer),
        SortField::Os => a.os.cmp(&b.os),
        SortField::ResponseTimeMs => a.response_time_ms.cmp(&b.response_time_ms),
        SortField::LastSeen => a.last_seen.cmp(&b.last_seen),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable in-place sort.
pub fn sort_devices(devices: &mut [Device], field: SortField, direction: SortDirection) {
    devices.sort_by(|a, b| directed(compare_devices(a, b, field), direction));
}
