use std::fmt;

use serde::Serialize;

const MULTIPLIER: u16 = 8;
const MAX_FACILITY: u16 = 23;
const MAX_SEVERITY: u16 = 7;
const MAX_PRIORITY: u16 = MAX_FACILITY * MULTIPLIER + MAX_SEVERITY;

/// Facility names (RFC 5424 §6.2.1)
const FACILITY_NAMES: [&str; 24] = [
    "Kernel",
    "User-Level",
    "Mail",
    "System",
    "Security/authorization",
    "Internal",
    "Line printer",
    "Network news",
    "UUCP",
    "Clock daemon",
    "Security/authorization",
    "FTP daemon",
    "NTP",
    "Log audit",
    "Log alert",
    "Clock daemon 2",
    "Local 0",
    "Local 1",
    "Local 2",
    "Local 3",
    "Local 4",
    "Local 5",
    "Local 6",
    "Local 7",
];

/// Severity names (RFC 5424 §6.2.1)
const SEVERITY_NAMES: [&str; 8] = [
    "Emergency",
    "Alert",
    "Critical",
    "Error",
    "Warning",
    "Notice",
    "Informational",
    "Debug",
];

/// Raw `<PRI>` value of a syslog message: `facility * 8 + severity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Priority(pub u16);

impl Priority {
    /// Derives the facility. The result is not checked, see [`Facility::is_valid`].
    #[inline]
    pub fn facility(self) -> Facility {
        Facility(self.0 / MULTIPLIER)
    }

    /// Derives the severity. The result is not checked, see [`Severity::is_valid`].
    #[inline]
    pub fn severity(self) -> Severity {
        Severity(self.0 % MULTIPLIER)
    }

    /// Whether the priority lies within 0..=191.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= MAX_PRIORITY
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Combines a facility and severity into a priority.
#[inline]
pub fn calculate_priority(facility: Facility, severity: Severity) -> Priority {
    Priority(facility.0.wrapping_mul(MULTIPLIER).wrapping_add(severity.0))
}

/// Origin category of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Facility(pub u16);

impl Facility {
    pub const KERNEL: Facility = Facility(0);
    pub const USER_LEVEL: Facility = Facility(1);
    pub const MAIL: Facility = Facility(2);
    pub const SYSTEM: Facility = Facility(3);
    pub const SECURITY_AUTHORIZATION: Facility = Facility(4);
    pub const INTERNAL: Facility = Facility(5);
    pub const LINE_PRINTER: Facility = Facility(6);
    pub const NETWORK_NEWS: Facility = Facility(7);
    pub const UUCP: Facility = Facility(8);
    pub const CLOCK_DAEMON: Facility = Facility(9);
    pub const SECURITY_AUTHORIZATION2: Facility = Facility(10);
    pub const FTP_DAEMON: Facility = Facility(11);
    pub const NTP: Facility = Facility(12);
    pub const LOG_AUDIT: Facility = Facility(13);
    pub const LOG_ALERT: Facility = Facility(14);
    pub const CLOCK_DAEMON2: Facility = Facility(15);
    pub const LOCAL0: Facility = Facility(16);
    pub const LOCAL1: Facility = Facility(17);
    pub const LOCAL2: Facility = Facility(18);
    pub const LOCAL3: Facility = Facility(19);
    pub const LOCAL4: Facility = Facility(20);
    pub const LOCAL5: Facility = Facility(21);
    pub const LOCAL6: Facility = Facility(22);
    pub const LOCAL7: Facility = Facility(23);

    /// Whether the facility lies within 0..=23.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= MAX_FACILITY
    }

    /// Human readable name, `None` when out of range.
    pub fn name(self) -> Option<&'static str> {
        FACILITY_NAMES.get(usize::from(self.0)).copied()
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("Invalid"))
    }
}

/// Urgency level of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Severity(pub u16);

impl Severity {
    pub const EMERGENCY: Severity = Severity(0);
    pub const ALERT: Severity = Severity(1);
    pub const CRITICAL: Severity = Severity(2);
    pub const ERROR: Severity = Severity(3);
    pub const WARNING: Severity = Severity(4);
    pub const NOTICE: Severity = Severity(5);
    pub const INFORMATIONAL: Severity = Severity(6);
    pub const DEBUG: Severity = Severity(7);

    /// Whether the severity lies within 0..=7.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= MAX_SEVERITY
    }

    /// Human readable name, `None` when out of range.
    pub fn name(self) -> Option<&'static str> {
        SEVERITY_NAMES.get(usize::from(self.0)).copied()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("Invalid"))
    }
}
