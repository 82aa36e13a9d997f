use crate::telemetry::{
    Battery, Connection, ConnectionStatus, Gps, Imu, Sample, Sensors, VOLTAGE_MAX, VOLTAGE_MIN,
};
use chrono::Utc;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Voltage drop per tick.
const DRAIN_PER_TICK: f64 = 0.001;
/// Step of the circular GPS drift, in degrees.
const GPS_DRIFT_RADIUS: f64 = 0.0001;
/// Chance per tick that the link quality changes.
const STATUS_CHANGE_CHANCE: f64 = 0.01;
/// Resample weights for Excellent/Good/Fair/Poor/No Signal.
const STATUS_WEIGHTS: [f64; 5] = [0.5, 0.3, 0.1, 0.07, 0.03];

/// Synthetic drone state advanced once per tick. State keeps full precision;
/// rounding happens only when a `Sample` is emitted.
pub struct DroneSimulator {
    rng: StdRng,
    status_dist: WeightedIndex<f64>,
    tick_secs: f64,
    elapsed: f64,
    voltage: f64,
    temperature: f64,
    altitude: f64,
    latitude: f64,
    longitude: f64,
    roll: f64,
    pitch: f64,
    yaw: f64,
    connection: ConnectionStatus,
}

impl DroneSimulator {
    pub fn new(tick_period: Duration) -> Self {
        Self::seeded(tick_period, rand::random())
    }

    pub fn seeded(tick_period: Duration, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            status_dist: WeightedIndex::new(STATUS_WEIGHTS).expect("static weights are valid"),
            tick_secs: tick_period.as_secs_f64(),
            elapsed: 0.0,
            voltage: 12.0,
            temperature: 25.0,
            altitude: 100.0,
            latitude: 37.7749,
            longitude: -122.4194,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            connection: ConnectionStatus::Excellent,
        }
    }

    /// Advances the model by one tick and emits the resulting sample.
    pub fn tick(&mut self) -> Sample {
        self.elapsed += self.tick_secs;
        let phase = self.elapsed;

        // Battery drains slowly with small fluctuations, held in range.
        self.voltage -= DRAIN_PER_TICK;
        self.voltage += self.rng.gen_range(-0.01..0.01);
        self.voltage = self.voltage.clamp(VOLTAGE_MIN, VOLTAGE_MAX);

        // Temperature drifts without bound.
        self.temperature += self.rng.gen_range(-0.1..0.1);

        self.roll = 15.0 * (phase / 5.0).sin() + self.rng.gen_range(-2.0..2.0);
        self.pitch = 10.0 * (phase / 7.0).cos() + self.rng.gen_range(-2.0..2.0);
        self.yaw = (self.yaw + 1.0 + self.rng.gen_range(-0.5..0.5)).rem_euclid(360.0);

        self.altitude = 100.0 + 10.0 * (phase / 15.0).sin() + self.rng.gen_range(-1.0..1.0);

        // Slow circle around the start position.
        self.latitude += GPS_DRIFT_RADIUS * (phase / 20.0).sin();
        self.longitude += GPS_DRIFT_RADIUS * (phase / 20.0).cos();

        if self.rng.gen_bool(STATUS_CHANGE_CHANCE) {
            self.connection = Self::weighted_status(&mut self.rng, &self.status_dist);
        }

        Sample {
            timestamp: Utc::now(),
            battery: Battery::from_voltage(self.voltage),
            sensors: Sensors::new(self.temperature, self.altitude),
            imu: Imu::new(self.roll, self.pitch, self.yaw),
            gps: Gps::new(self.latitude, self.longitude, self.altitude),
            connection: Connection::from_status(self.connection),
        }
    }

    fn weighted_status(rng: &mut StdRng, dist: &WeightedIndex<f64>) -> ConnectionStatus {
        ConnectionStatus::ALL[dist.sample(rng)]
    }
}
