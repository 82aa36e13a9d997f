use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::errors::{Error, Result};
use crate::model::Sample;

/// Value series kept by the store, one entry per retained sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Voltage,
    Temperature,
    Altitude,
    Roll,
    Pitch,
    Yaw,
    Latitude,
    Longitude,
    SignalStrength,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Voltage,
        Metric::Temperature,
        Metric::Altitude,
        Metric::Roll,
        Metric::Pitch,
        Metric::Yaw,
        Metric::Latitude,
        Metric::Longitude,
        Metric::SignalStrength,
    ];
}

/// Sliding window over the most recent samples, decomposed into parallel
/// per-metric series plus the latest full sample. Every series has the same
/// length at all times; once the window is full, each append evicts the
/// oldest entry of every series together.
#[derive(Debug)]
pub struct HistoryStore {
    capacity: usize,
    timestamps: VecDeque<DateTime<Utc>>,
    voltage: VecDeque<f64>,
    temperature: VecDeque<f64>,
    altitude: VecDeque<f64>,
    roll: VecDeque<f64>,
    pitch: VecDeque<f64>,
    yaw: VecDeque<f64>,
    latitude: VecDeque<f64>,
    longitude: VecDeque<f64>,
    signal_strength: VecDeque<f64>,
    latest: Option<Sample>,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::Config(
                "history capacity must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            timestamps: VecDeque::with_capacity(capacity),
            voltage: VecDeque::with_capacity(capacity),
            temperature: VecDeque::with_capacity(capacity),
            altitude: VecDeque::with_capacity(capacity),
            roll: VecDeque::with_capacity(capacity),
            pitch: VecDeque::with_capacity(capacity),
            yaw: VecDeque::with_capacity(capacity),
            latitude: VecDeque::with_capacity(capacity),
            longitude: VecDeque::with_capacity(capacity),
            signal_strength: VecDeque::with_capacity(capacity),
            latest: None,
        })
    }

    /// Appends one entry to every series, then trims oldest-first down to
    /// capacity.
    pub fn add(&mut self, sample: Sample) {
        self.timestamps.push_back(sample.timestamp);
        self.voltage.push_back(sample.battery.voltage);
        self.temperature.push_back(sample.sensors.temperature);
        self.altitude.push_back(sample.sensors.altitude);
        self.roll.push_back(sample.imu.roll);
        self.pitch.push_back(sample.imu.pitch);
        self.yaw.push_back(sample.imu.yaw);
        self.latitude.push_back(sample.gps.latitude);
        self.longitude.push_back(sample.gps.longitude);
        self.signal_strength
            .push_back(f64::from(sample.connection.signal_strength));
        self.latest = Some(sample);

        while self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
            self.voltage.pop_front();
            self.temperature.pop_front();
            self.altitude.pop_front();
            self.roll.pop_front();
            self.pitch.pop_front();
            self.yaw.pop_front();
            self.latitude.pop_front();
            self.longitude.pop_front();
            self.signal_strength.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.latest.as_ref()
    }

    /// Owned, self-consistent copy for a render pass.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timestamps: self.timestamps.iter().copied().collect(),
            voltage: self.voltage.iter().copied().collect(),
            temperature: self.temperature.iter().copied().collect(),
            altitude: self.altitude.iter().copied().collect(),
            roll: self.roll.iter().copied().collect(),
            pitch: self.pitch.iter().copied().collect(),
            yaw: self.yaw.iter().copied().collect(),
            latitude: self.latitude.iter().copied().collect(),
            longitude: self.longitude.iter().copied().collect(),
            signal_strength: self.signal_strength.iter().copied().collect(),
            latest: self.latest.clone(),
        }
    }
}

/// Point-in-time copy of the store, detached from later writes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timestamps: Vec<DateTime<Utc>>,
    pub voltage: Vec<f64>,
    pub temperature: Vec<f64>,
    pub altitude: Vec<f64>,
    pub roll: Vec<f64>,
    pub pitch: Vec<f64>,
    pub yaw: Vec<f64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub signal_strength: Vec<f64>,
    pub latest: Option<Sample>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Voltage => &self.voltage,
            Metric::Temperature => &self.temperature,
            Metric::Altitude => &self.altitude,
            Metric::Roll => &self.roll,
            Metric::Pitch => &self.pitch,
            Metric::Yaw => &self.yaw,
            Metric::Latitude => &self.latitude,
            Metric::Longitude => &self.longitude,
            Metric::SignalStrength => &self.signal_strength,
        }
    }

    /// Ordered (timestamp, value) pairs for one metric, oldest first.
    pub fn series(&self, metric: Metric) -> Vec<(DateTime<Utc>, f64)> {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values(metric).iter().copied())
            .collect()
    }
}

/// Cloneable handle shared by the ingest and render paths. Writers take the
/// lock per sample, readers per snapshot, so neither side holds it across an
/// await point.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<HistoryStore>>,
}

impl SharedStore {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(HistoryStore::new(capacity)?)),
        })
    }

    pub fn add(&self, sample: Sample) {
        self.inner.write().add(sample);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().snapshot()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.inner.read().latest.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(matches!(HistoryStore::new(0), Err(Error::Config(_))));
        assert!(SharedStore::new(0).is_err());
    }

    #[test]
    fn test_fills_up_to_capacity_without_eviction() {
        let mut store = HistoryStore::new(5).unwrap();
        for seq in 1..=3 {
            store.add(fixtures::sample(seq));
        }

        assert_eq!(store.len(), 3);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.values(Metric::Altitude), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_evicts_oldest_first_after_overflow() {
        let mut store = HistoryStore::new(5).unwrap();
        for seq in 1..=8 {
            store.add(fixtures::sample(seq));
        }

        // 8 adds into a window of 5: samples 1..=3 are gone, 4 is oldest.
        assert_eq!(store.len(), 5);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.values(Metric::Altitude), &[4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(snapshot.timestamps[0], fixtures::sample(4).timestamp);
    }

    #[test]
    fn test_all_series_stay_the_same_length() {
        let mut store = HistoryStore::new(4).unwrap();
        for seq in 1..=11 {
            store.add(fixtures::sample(seq));
            let snapshot = store.snapshot();
            for metric in Metric::ALL {
                assert_eq!(snapshot.values(metric).len(), snapshot.timestamps.len());
            }
        }
    }

    #[test]
    fn test_window_of_100_after_150_samples() {
        let mut store = HistoryStore::new(100).unwrap();
        for seq in 1..=150 {
            store.add(fixtures::sample(seq));
        }

        assert_eq!(store.len(), 100);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.values(Metric::Altitude)[0], 51.0);
        assert_eq!(snapshot.values(Metric::Altitude)[99], 150.0);

        let latest = snapshot.latest.as_ref().unwrap();
        assert_eq!(latest.sensors.altitude, 150.0);
        assert_eq!(latest.timestamp, *snapshot.timestamps.last().unwrap());
    }

    #[test]
    fn test_latest_tracks_newest_even_before_full() {
        let mut store = HistoryStore::new(100).unwrap();
        assert!(store.latest().is_none());

        store.add(fixtures::sample(7));
        assert_eq!(store.latest().unwrap().sensors.altitude, 7.0);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_adds() {
        let mut store = HistoryStore::new(10).unwrap();
        for seq in 1..=3 {
            store.add(fixtures::sample(seq));
        }

        let snapshot = store.snapshot();
        for seq in 4..=6 {
            store.add(fixtures::sample(seq));
        }

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.values(Metric::Altitude), &[1.0, 2.0, 3.0]);
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_series_pairs_timestamps_with_values() {
        let mut store = HistoryStore::new(10).unwrap();
        for seq in 1..=4 {
            store.add(fixtures::sample(seq));
        }

        let series = store.snapshot().series(Metric::Voltage);
        assert_eq!(series.len(), 4);
        for (i, (timestamp, value)) in series.iter().enumerate() {
            let expected = fixtures::sample(i as u32 + 1);
            assert_eq!(*timestamp, expected.timestamp);
            assert_eq!(*value, expected.battery.voltage);
        }
    }

    #[test]
    fn test_concurrent_writer_never_tears_a_snapshot() {
        let store = SharedStore::new(100).unwrap();

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for seq in 1..=2000 {
                    store.add(fixtures::sample(seq));
                }
            })
        };

        // Every observed snapshot must be internally consistent, whatever
        // point of the write stream it caught.
        loop {
            let snapshot = store.snapshot();
            let n = snapshot.len();
            assert!(n <= 100);
            for metric in Metric::ALL {
                assert_eq!(snapshot.values(metric).len(), n);
            }
            if let Some(latest) = snapshot.latest.as_ref() {
                assert_eq!(latest.timestamp, *snapshot.timestamps.last().unwrap());
            }

            if writer.is_finished() {
                break;
            }
        }
        writer.join().unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 100);
        assert_eq!(snapshot.latest.unwrap().sensors.altitude, 2000.0);
    }
}
