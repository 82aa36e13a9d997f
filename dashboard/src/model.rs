use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One telemetry sample as published on the wire. Field layout must stay in
/// step with the transmitter's schema.
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
    /// Volts, nominal range 8.0 to 12.0
    pub voltage: f64,
    /// Percent of the nominal voltage range
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensors {
    /// Degrees Celsius
    pub temperature: f64,
    /// Meters above ground
    pub altitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imu {
    /// Degrees, about the forward axis
    pub roll: f64,
    /// Degrees, about the right axis
    pub pitch: f64,
    /// Degrees, heading in [0, 360)
    pub yaw: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gps {
    pub latitude: f64,
    pub longitude: f64,
    /// Duplicates the barometric altitude
    pub altitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub status: ConnectionStatus,
    /// Percent, fully determined by the status
    pub signal_strength: u8,
}

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
    /// Signal strength reported for this link quality, in percent.
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

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Excellent => "Excellent",
            ConnectionStatus::Good => "Good",
            ConnectionStatus::Fair => "Fair",
            ConnectionStatus::Poor => "Poor",
            ConnectionStatus::NoSignal => "No Signal",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Sample number `seq` of a synthetic feed. Values encode `seq` (altitude
    /// carries it verbatim, timestamps step by 100 ms) so ordering is
    /// checkable, and every derived field is consistent so validation passes.
    pub fn sample(seq: u32) -> Sample {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let voltage = 8.0 + f64::from(seq % 400) / 100.0;
        let altitude = f64::from(seq);
        Sample {
            timestamp: start + chrono::Duration::milliseconds(i64::from(seq) * 100),
            battery: Battery {
                voltage,
                percentage: (voltage - 8.0) / 4.0 * 100.0,
            },
            sensors: Sensors {
                temperature: 25.0,
                altitude,
            },
            imu: Imu {
                roll: f64::from(seq % 30),
                pitch: f64::from(seq % 20),
                yaw: f64::from(seq % 360),
            },
            gps: Gps {
                latitude: 37.7749 + f64::from(seq) * 1e-6,
                longitude: -122.4194 + f64::from(seq) * 1e-6,
                altitude,
            },
            connection: Connection {
                status: ConnectionStatus::Excellent,
                signal_strength: ConnectionStatus::Excellent.signal_strength(),
            },
        }
    }
}
