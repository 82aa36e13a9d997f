use crate::errors::{Error, Result};
use crate::model::Sample;

const MIN_VOLTAGE: f64 = 8.0;
const MAX_VOLTAGE: f64 = 12.0;
const MIN_PERCENTAGE: f64 = 0.0;
const MAX_PERCENTAGE: f64 = 100.0;
const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Checks a decoded sample before it is allowed into the store.
pub fn validate_sample(sample: &Sample) -> Result<()> {
    let voltage = sample.battery.voltage;
    if voltage < MIN_VOLTAGE || voltage > MAX_VOLTAGE {
        return Err(Error::Validation(format!(
            "Voltage {} out of range [{}, {}]",
            voltage, MIN_VOLTAGE, MAX_VOLTAGE
        )));
    }

    let percentage = sample.battery.percentage;
    if percentage < MIN_PERCENTAGE || percentage > MAX_PERCENTAGE {
        return Err(Error::Validation(format!(
            "Battery percentage {} out of range [{}, {}]",
            percentage, MIN_PERCENTAGE, MAX_PERCENTAGE
        )));
    }

    let yaw = sample.imu.yaw;
    if yaw < 0.0 || yaw >= 360.0 {
        return Err(Error::Validation(format!(
            "Yaw {} out of range [0, 360)",
            yaw
        )));
    }

    let latitude = sample.gps.latitude;
    if latitude < -MAX_LATITUDE || latitude > MAX_LATITUDE {
        return Err(Error::Validation(format!(
            "Latitude {} out of range [-{}, {}]",
            latitude, MAX_LATITUDE, MAX_LATITUDE
        )));
    }

    let longitude = sample.gps.longitude;
    if longitude < -MAX_LONGITUDE || longitude > MAX_LONGITUDE {
        return Err(Error::Validation(format!(
            "Longitude {} out of range [-{}, {}]",
            longitude, MAX_LONGITUDE, MAX_LONGITUDE
        )));
    }

    // Signal strength is not free-form, it is a function of the status.
    let expected = sample.connection.status.signal_strength();
    if sample.connection.signal_strength != expected {
        return Err(Error::Validation(format!(
            "Signal strength {} does not match status {} (expected {})",
            sample.connection.signal_strength, sample.connection.status, expected
        )));
    }

    Ok(())
}
