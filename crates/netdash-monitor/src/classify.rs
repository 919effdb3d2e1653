use netdash_model::SpeedTestResult;

/// Display grade for a speed-test figure. Thresholds are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Acceptable => "Acceptable",
            Tier::Poor => "Poor",
        }
    }

    pub fn mark(&self) -> &'static str {
        match self {
            Tier::Excellent | Tier::Good => "✓",
            Tier::Acceptable => "⚠",
            Tier::Poor => "✗",
        }
    }
}

pub fn classify_download(mbps: f64) -> Tier {
    if mbps > 50.0 {
        Tier::Excellent
    } else if mbps > 25.0 {
        Tier::Good
    } else if mbps > 10.0 {
        Tier::Acceptable
    } else {
        Tier::Poor
    }
}

pub fn classify_upload(mbps: f64) -> Tier {
    if mbps > 20.0 {
        Tier::Excellent
    } else if mbps > 10.0 {
        Tier::Good
    } else if mbps > 5.0 {
        Tier::Acceptable
    } else {
        Tier::Poor
    }
}

pub fn classify_ping(ms: f64) -> Tier {
    if ms < 30.0 {
        Tier::Excellent
    } else if ms < 60.0 {
        Tier::Good
    } else if ms < 100.0 {
        Tier::Acceptable
    } else {
        Tier::Poor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTestGrade {
    pub download: Tier,
    pub upload: Tier,
    pub ping: Tier,
}

pub fn grade_speed_test(result: &SpeedTestResult) -> SpeedTestGrade {
    SpeedTestGrade {
        download: classify_download(result.download),
        upload: classify_upload(result.upload),
        ping: classify_ping(result.ping),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Gigabit,
    FastEthernet,
    Ethernet,
}

impl ConnectionType {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionType::Gigabit => "1000 Mbps (Gigabit Ethernet)",
            ConnectionType::FastEthernet => "100 Mbps (Fast Ethernet)",
            ConnectionType::Ethernet => "10 Mbps (Ethernet)",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ConnectionType::Gigabit => "gigabit",
            ConnectionType::FastEthernet => "fast-ethernet",
            ConnectionType::Ethernet => "ethernet",
        }
    }
}

pub fn classify_connection_type(local_mbps: f64) -> ConnectionType {
    if local_mbps > 500.0 {
        ConnectionType::Gigabit
    } else if local_mbps > 50.0 {
        ConnectionType::FastEthernet
    } else {
        ConnectionType::Ethernet
    }
}

/// Per-device link quality estimated from its response time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LinkQuality {
    Excellent,
    Good,
    Fair,
    Slow,
}

impl LinkQuality {
    pub fn label(&self) -> &'static str {
        match self {
            LinkQuality::Excellent => "excellent",
            LinkQuality::Good => "good",
            LinkQuality::Fair => "fair",
            LinkQuality::Slow => "slow",
        }
    }

    /// Link speed the response time suggests.
    pub fn estimated_speed(&self) -> &'static str {
        match self {
            LinkQuality::Excellent => "1000 Mbps",
            LinkQuality::Good => "100 Mbps",
            LinkQuality::Fair => "10 Mbps",
            LinkQuality::Slow => "<10 Mbps",
        }
    }
}

pub fn classify_response_time(response_time_ms: u32) -> LinkQuality {
    if response_time_ms < 10 {
        LinkQuality::Excellent
    } else if response_time_ms < 50 {
        LinkQuality::Good
    } else if response_time_ms < 100 {
        LinkQuality::Fair
    } else {
        LinkQuality::Slow
    }
}
