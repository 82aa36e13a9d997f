use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Voltage range of the simulated battery pack.
pub const VOLTAGE_MIN: f64 = 8.0;
pub const VOLTAGE_MAX: f64 = 12.0;

/// One telemetry reading, immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub battery: Battery,
    pub sensors: Sensors,
    pub imu: Imu,
    pub gps: Gps,
    pub connection: Connection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battery {
    pub voltage: f64,
    pub percentage: f64,
}

impl Battery {
    /// Builds the battery record from the full-precision pack voltage.
    /// Percentage is derived here and nowhere else.
    pub fn from_voltage(voltage: f64) -> Self {
        let percentage = (voltage - VOLTAGE_MIN) / (VOLTAGE_MAX - VOLTAGE_MIN) * 100.0;
        Self {
            voltage: round_to(voltage, 2),
            percentage: round_to(percentage.clamp(0.0, 100.0), 1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensors {
    pub temperature: f64,
    pub altitude: f64,
}

impl Sensors {
    pub fn new(temperature: f64, altitude: f64) -> Self {
        Self {
            temperature: round_to(temperature, 1),
            altitude: round_to(altitude, 1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imu {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Imu {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            roll: round_to(roll, 2),
            pitch: round_to(pitch, 2),
            // Rounding can land exactly on 360.0; wrap to keep yaw in [0, 360).
            yaw: round_to(yaw, 2).rem_euclid(360.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gps {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Gps {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude: round_to(latitude, 6),
            longitude: round_to(longitude, 6),
            altitude: round_to(altitude, 1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub status: ConnectionStatus,
    pub signal_strength: u8,
}

impl Connection {
    /// Signal strength is a fixed function of the status, never set directly.
    pub fn from_status(status: ConnectionStatus) -> Self {
        Self {
            status,
            signal_strength: status.signal_strength(),
        }
    }
}

/// Link quality reported by the drone's radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "No Signal")]
    NoSignal,
}

impl ConnectionStatus {
    pub const ALL: [ConnectionStatus; 5] = [
        ConnectionStatus::Excellent,
        ConnectionStatus::Good,
        ConnectionStatus::Fair,
        ConnectionStatus::Poor,
        ConnectionStatus::NoSignal,
    ];

    pub fn signal_strength(self) -> u8 {
        match self {
            ConnectionStatus::Excellent => 95,
            ConnectionStatus::Good => 75,
            ConnectionStatus::Fair => 50,
            ConnectionStatus::Poor => 25,
            ConnectionStatus::NoSignal => 0,
        }
    }
}

/// Wire rounding only; simulation state keeps full precision.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
