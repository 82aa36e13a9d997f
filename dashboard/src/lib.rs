//! Consumer side of the drone telemetry feed: MQTT ingest with a fixed-delay
//! reconnect policy, a bounded history store, and the chart and indicator
//! descriptors a dashboard UI renders from.

pub mod errors;
pub mod model;
pub mod mqtt;
pub mod pose;
pub mod render;
pub mod store;
pub mod validate;
