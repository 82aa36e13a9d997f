mod simulator;
mod telemetry;

use clap::Parser;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use simulator::DroneSimulator;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, warn};

/// Published samples between progress log lines (10 s at the default tick).
const LOG_INTERVAL_SAMPLES: u64 = 100;

#[derive(Debug, Parser)]
#[command(about = "Publishes simulated drone telemetry over MQTT")]
struct Config {
    /// MQTT broker host
    #[arg(long, env = "MQTT_BROKER", default_value = "localhost")]
    broker: String,

    /// MQTT broker port
    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    port: u16,

    /// Topic the samples are published on
    #[arg(long, env = "TELEMETRY_TOPIC", default_value = "drone/telemetry")]
    topic: String,

    /// Milliseconds between samples
    #[arg(long, env = "TICK_MS", default_value_t = 100)]
    tick_ms: u64,

    /// Fixed RNG seed for a reproducible flight
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,
}

/// Catches configurations the tick loop would otherwise panic on.
fn check_config(config: &Config) -> Result<(), String> {
    if config.tick_ms == 0 {
        return Err("tick period must be greater than zero".to_string());
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt::init();

    info!("Starting drone telemetry transmitter");
    info!(
        "Broker: {}:{}, topic: {}, tick: {}ms",
        config.broker, config.port, config.topic, config.tick_ms
    );

    if let Err(reason) = check_config(&config) {
        error!("Invalid configuration: {}", reason);
        std::process::exit(1);
    }

    let client_id = format!("drone-sim-{}", rand::random::<u32>());
    let mut mqtt_options = MqttOptions::new(&client_id, &config.broker, config.port);
    mqtt_options.set_keep_alive(Duration::from_secs(30));
    mqtt_options.set_clean_session(true);

    let (client, mut eventloop) = AsyncClient::new(mqtt_options, 1024);

    // Spawn eventloop handler; rumqttc reconnects on the next poll.
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(_) => {}
                Err(e) => {
                    error!("MQTT eventloop error: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    });

    let tick_period = Duration::from_millis(config.tick_ms);
    let mut drone = match config.seed {
        Some(seed) => DroneSimulator::seeded(tick_period, seed),
        None => DroneSimulator::new(tick_period),
    };

    let mut ticker = interval(tick_period);
    let mut published = 0u64;
    let mut dropped = 0u64;

    info!("Publishing one sample every {:?} as {}", tick_period, client_id);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let sample = drone.tick();
                let payload = match serde_json::to_string(&sample) {
                    Ok(p) => p,
                    Err(e) => {
                        error!("Failed to serialize sample: {}", e);
                        continue;
                    }
                };

                // Fire and forget: a full transport queue drops the frame
                // instead of stalling the tick loop.
                match client.try_publish(&config.topic, QoS::AtLeastOnce, false, payload) {
                    Ok(()) => {
                        published += 1;
                        if published % LOG_INTERVAL_SAMPLES == 0 {
                            info!("Published {} samples ({} dropped)", published, dropped);
                        }
                    }
                    Err(e) => {
                        dropped += 1;
                        warn!("Failed to queue sample: {}", e);
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Transmitter stopped after {} samples", published);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tick_period_is_rejected_at_startup() {
        let config = Config::parse_from(["transmitter", "--tick-ms", "0"]);
        assert!(check_config(&config).is_err());
    }

    #[test]
    fn test_default_tick_period_is_accepted() {
        let config = Config::parse_from(["transmitter", "--tick-ms", "100"]);
        assert!(check_config(&config).is_ok());
    }
}
