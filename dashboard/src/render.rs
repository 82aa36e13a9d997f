use chrono::{DateTime, Utc};

use crate::model::ConnectionStatus;
use crate::pose;
use crate::store::{Metric, Snapshot};

const ROLL_COLOR: &str = "#FF4136";
const PITCH_COLOR: &str = "#2ECC40";
const YAW_COLOR: &str = "#0074D9";
const ALTITUDE_COLOR: &str = "#FF851B";
const TEMPERATURE_COLOR: &str = "#B10DC9";

const NO_DATA_COLOR: &str = "#555555";
const DARK_TEXT: &str = "#000000";
const LIGHT_TEXT: &str = "#FFFFFF";

/// One plottable line: timestamped points in arrival order.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub name: &'static str,
    pub color: &'static str,
    /// Plot against the right-hand y-axis.
    pub secondary_axis: bool,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl ChartSeries {
    fn new(name: &'static str, color: &'static str, points: Vec<(DateTime<Utc>, f64)>) -> Self {
        Self {
            name,
            color,
            secondary_axis: false,
            points,
        }
    }
}

/// Colored chip for the indicator row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusIndicator {
    pub label: String,
    pub color: &'static str,
    pub text_color: &'static str,
}

impl StatusIndicator {
    fn no_data() -> Self {
        Self {
            label: "No Data".to_string(),
            color: NO_DATA_COLOR,
            text_color: LIGHT_TEXT,
        }
    }
}

/// Flight path for the map pane, oldest point first.
#[derive(Debug, Clone, Default)]
pub struct GpsTrack {
    pub path: Vec<(f64, f64)>,
    pub current: Option<(f64, f64)>,
}

/// One named part of the 3D drone wireframe.
#[derive(Debug, Clone)]
pub struct WirePart {
    pub name: &'static str,
    pub color: &'static str,
    pub vertices: Vec<[f64; 3]>,
}

/// Everything one refresh pass hands to the UI layer.
#[derive(Debug, Clone)]
pub struct DashboardFrame {
    pub imu: Vec<ChartSeries>,
    pub altitude_temperature: Vec<ChartSeries>,
    pub connection: StatusIndicator,
    pub battery: StatusIndicator,
    pub track: GpsTrack,
    pub orientation: Option<Vec<WirePart>>,
    pub readout: Vec<(&'static str, String)>,
}

/// One complete render pass over a snapshot.
pub fn frame(snapshot: &Snapshot) -> DashboardFrame {
    DashboardFrame {
        imu: imu_chart(snapshot),
        altitude_temperature: altitude_temperature_chart(snapshot),
        connection: connection_indicator(snapshot),
        battery: battery_indicator(snapshot),
        track: gps_track(snapshot),
        orientation: orientation(snapshot),
        readout: readout(snapshot),
    }
}

pub fn imu_chart(snapshot: &Snapshot) -> Vec<ChartSeries> {
    vec![
        ChartSeries::new("Roll", ROLL_COLOR, snapshot.series(Metric::Roll)),
        ChartSeries::new("Pitch", PITCH_COLOR, snapshot.series(Metric::Pitch)),
        ChartSeries::new("Yaw", YAW_COLOR, snapshot.series(Metric::Yaw)),
    ]
}

/// Altitude on the left axis, temperature on the right. The two live in
/// disjoint ranges, a shared axis would flatten one of them.
pub fn altitude_temperature_chart(snapshot: &Snapshot) -> Vec<ChartSeries> {
    let mut temperature = ChartSeries::new(
        "Temperature (°C)",
        TEMPERATURE_COLOR,
        snapshot.series(Metric::Temperature),
    );
    temperature.secondary_axis = true;

    vec![
        ChartSeries::new("Altitude (m)", ALTITUDE_COLOR, snapshot.series(Metric::Altitude)),
        temperature,
    ]
}

pub fn connection_indicator(snapshot: &Snapshot) -> StatusIndicator {
    let Some(latest) = snapshot.latest.as_ref() else {
        return StatusIndicator::no_data();
    };

    let status = latest.connection.status;
    let color = match status {
        ConnectionStatus::Excellent => "#4CAF50",
        ConnectionStatus::Good => "#8BC34A",
        ConnectionStatus::Fair => "#FFC107",
        ConnectionStatus::Poor => "#FF9800",
        ConnectionStatus::NoSignal => "#F44336",
    };
    // Light chips carry dark text and vice versa.
    let text_color = match status {
        ConnectionStatus::Excellent | ConnectionStatus::Good | ConnectionStatus::Fair => DARK_TEXT,
        ConnectionStatus::Poor | ConnectionStatus::NoSignal => LIGHT_TEXT,
    };

    StatusIndicator {
        label: status.to_string(),
        color,
        text_color,
    }
}

pub fn battery_indicator(snapshot: &Snapshot) -> StatusIndicator {
    let Some(latest) = snapshot.latest.as_ref() else {
        return StatusIndicator::no_data();
    };

    let percentage = latest.battery.percentage;
    let color = if percentage > 75.0 {
        "#4CAF50"
    } else if percentage > 50.0 {
        "#8BC34A"
    } else if percentage > 25.0 {
        "#FFC107"
    } else if percentage > 10.0 {
        "#FF9800"
    } else {
        "#F44336"
    };
    let text_color = if percentage > 25.0 { DARK_TEXT } else { LIGHT_TEXT };

    StatusIndicator {
        label: format!("{}V ({}%)", latest.battery.voltage, percentage),
        color,
        text_color,
    }
}

pub fn gps_track(snapshot: &Snapshot) -> GpsTrack {
    if snapshot.is_empty() {
        return GpsTrack::default();
    }

    let path: Vec<(f64, f64)> = snapshot
        .latitude
        .iter()
        .copied()
        .zip(snapshot.longitude.iter().copied())
        .collect();
    let current = path.last().copied();

    GpsTrack { path, current }
}

/// Colored wireframe for the 3D pane, None until a sample has arrived. The
/// arm colors mark which way the drone faces; the ring and axes parts are
/// the fixed reference.
pub fn orientation(snapshot: &Snapshot) -> Option<Vec<WirePart>> {
    let latest = snapshot.latest.as_ref()?;
    let frame = pose::pose_frame(latest.imu.roll, latest.imu.pitch, latest.imu.yaw);

    Some(vec![
        WirePart {
            name: "Body",
            color: "grey",
            vertices: frame.body,
        },
        WirePart {
            name: "Front Arm",
            color: "red",
            vertices: frame.arm_front,
        },
        WirePart {
            name: "Back Arm",
            color: "green",
            vertices: frame.arm_back,
        },
        WirePart {
            name: "Right Arm",
            color: "blue",
            vertices: frame.arm_right,
        },
        WirePart {
            name: "Left Arm",
            color: "yellow",
            vertices: frame.arm_left,
        },
        WirePart {
            name: "Ring",
            color: "red",
            vertices: frame.ring,
        },
        WirePart {
            name: "Forward Axis",
            color: "blue",
            vertices: frame.axis_forward.to_vec(),
        },
        WirePart {
            name: "Right Axis",
            color: "green",
            vertices: frame.axis_right.to_vec(),
        },
    ])
}

/// Label/value pairs for the live readout panel.
pub fn readout(snapshot: &Snapshot) -> Vec<(&'static str, String)> {
    let Some(latest) = snapshot.latest.as_ref() else {
        return Vec::new();
    };

    vec![
        (
            "Battery",
            format!("{}V ({}%)", latest.battery.voltage, latest.battery.percentage),
        ),
        ("Temperature", format!("{}°C", latest.sensors.temperature)),
        ("Altitude", format!("{}m", latest.sensors.altitude)),
        ("Roll", format!("{}°", latest.imu.roll)),
        ("Pitch", format!("{}°", latest.imu.pitch)),
        ("Yaw", format!("{}°", latest.imu.yaw)),
        (
            "GPS",
            format!("Lat: {}, Lon: {}", latest.gps.latitude, latest.gps.longitude),
        ),
        (
            "Connection",
            format!(
                "{} ({}%)",
                latest.connection.status, latest.connection.signal_strength
            ),
        ),
        (
            "Last Update",
            latest.timestamp.format("%H:%M:%S").to_string(),
        ),
    ]
}
