use clap::Parser;
use dashboard::errors::{Error, Result};
use dashboard::model::Sample;
use dashboard::mqtt;
use dashboard::render;
use dashboard::store::SharedStore;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// Refresh passes between heartbeat log lines (5 s at the default period).
const LOG_INTERVAL_REFRESHES: u64 = 50;

#[derive(Debug, Parser)]
#[command(about = "Live dashboard over simulated drone telemetry")]
struct Config {
    /// MQTT broker host
    #[arg(long, env = "MQTT_BROKER", default_value = "localhost")]
    broker: String,

    /// MQTT broker port
    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    port: u16,

    /// Topic the samples arrive on
    #[arg(long, env = "TELEMETRY_TOPIC", default_value = "drone/telemetry")]
    topic: String,

    /// Samples retained per series
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = 100)]
    history_capacity: usize,

    /// Milliseconds between render passes
    #[arg(long, env = "REFRESH_MS", default_value_t = 100)]
    refresh_ms: u64,

    /// Seconds between reconnect attempts after a link failure
    #[arg(long, env = "RECONNECT_SECS", default_value_t = 5)]
    reconnect_secs: u64,

    /// Inbound sample queue capacity
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 1024)]
    queue_capacity: usize,
}

/// Catches configurations the refresh loop or channel would otherwise
/// panic on.
fn check_config(config: &Config) -> Result<()> {
    if config.refresh_ms == 0 {
        return Err(Error::Config(
            "refresh period must be greater than zero".to_string(),
        ));
    }
    if config.queue_capacity == 0 {
        return Err(Error::Config(
            "queue capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt::init();

    info!("Starting drone telemetry dashboard");
    info!(
        "Broker: {}:{}, topic: {}, history: {} samples, refresh: {}ms",
        config.broker, config.port, config.topic, config.history_capacity, config.refresh_ms
    );

    if let Err(e) = check_config(&config) {
        error!("{}", e);
        std::process::exit(1);
    }

    let store = match SharedStore::new(config.history_capacity) {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let (tx, rx) = mpsc::channel::<Sample>(config.queue_capacity);
    let reconnect_delay = Duration::from_secs(config.reconnect_secs);

    let ingest_handle = tokio::spawn({
        let broker = config.broker.clone();
        let topic = config.topic.clone();
        let port = config.port;
        async move {
            let client_id = format!("dashboard-{}", uuid::Uuid::new_v4());
            loop {
                match mqtt::MqttStream::connect(&broker, port, &topic, &client_id).await {
                    Ok(stream) => {
                        if let Err(e) = mqtt::run_ingest(stream, reconnect_delay, tx.clone()).await
                        {
                            error!("Ingest stopped: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Broker unreachable: {}. Retrying in {:?}", e, reconnect_delay);
                        tokio::time::sleep(reconnect_delay).await;
                    }
                }
            }
        }
    });

    let refresh_period = Duration::from_millis(config.refresh_ms);
    let render_handle = tokio::spawn(run_dashboard(store.clone(), rx, refresh_period));

    tokio::select! {
        _ = ingest_handle => error!("Ingest task terminated"),
        _ = render_handle => error!("Render task terminated"),
        _ = tokio::signal::ctrl_c() => info!("Received shutdown signal"),
    }

    info!("Dashboard stopped");
}

/// Drains queued samples into the store, then derives one frame of chart and
/// indicator descriptors per refresh tick.
async fn run_dashboard(store: SharedStore, mut rx: mpsc::Receiver<Sample>, refresh: Duration) {
    let mut ticker = interval(refresh);
    let mut refreshes = 0u64;

    loop {
        ticker.tick().await;

        // Everything queued since the last pass, in arrival order.
        while let Ok(sample) = rx.try_recv() {
            store.add(sample);
        }

        let snapshot = store.snapshot();
        let frame = render::frame(&snapshot);

        refreshes += 1;
        if refreshes % LOG_INTERVAL_REFRESHES == 0 {
            info!(
                "{} | battery {} | {} samples | track {} points",
                frame.connection.label,
                frame.battery.label,
                snapshot.len(),
                frame.track.path.len()
            );
        } else {
            debug!(
                "Refresh {}: {} samples, {} readout lines",
                refreshes,
                snapshot.len(),
                frame.readout.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_refresh_period_is_rejected_at_startup() {
        let config = Config::parse_from(["dashboard", "--refresh-ms", "0"]);
        assert!(check_config(&config).is_err());
    }

    #[test]
    fn test_zero_queue_capacity_is_rejected_at_startup() {
        let config = Config::parse_from(["dashboard", "--queue-capacity", "0"]);
        assert!(check_config(&config).is_err());
    }

    #[test]
    fn test_default_periods_are_accepted() {
        let config =
            Config::parse_from(["dashboard", "--refresh-ms", "100", "--queue-capacity", "1024"]);
        assert!(check_config(&config).is_ok());
    }
}
