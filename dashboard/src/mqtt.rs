use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{Error, Result};
use crate::model::Sample;
use crate::validate::validate_sample;

/// Accepted samples between progress log lines.
const LOG_INTERVAL_SAMPLES: u64 = 100;

/// Ordered feed of raw telemetry frames. The broker connection sits behind
/// this seam so the ingest loop and its reconnect policy can run against a
/// scripted stream in tests.
#[async_trait]
pub trait TelemetryStream: Send {
    /// Waits for the next frame. An error means the link is down.
    async fn next_frame(&mut self) -> Result<Bytes>;
}

/// MQTT-backed stream: one JSON sample per publish on the telemetry topic.
pub struct MqttStream {
    eventloop: EventLoop,
    // Held so the subscription stays alive for the life of the stream.
    _client: AsyncClient,
}

impl MqttStream {
    pub async fn connect(broker: &str, port: u16, topic: &str, client_id: &str) -> Result<Self> {
        info!("Connecting to MQTT broker at {}:{}", broker, port);

        let mut options = MqttOptions::new(client_id, broker, port);
        options.set_keep_alive(Duration::from_secs(30));
        // Keep the session so the broker replays the subscription after a
        // reconnect instead of waiting for us to subscribe again.
        options.set_clean_session(false);

        let (client, eventloop) = AsyncClient::new(options, 10);
        client.subscribe(topic, QoS::AtLeastOnce).await?;

        info!("Subscribed to {} with QoS 1", topic);
        Ok(Self {
            eventloop,
            _client: client,
        })
    }
}

#[async_trait]
impl TelemetryStream for MqttStream {
    async fn next_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Event::Incoming(Packet::Publish(publish)) = self.eventloop.poll().await? {
                debug!(
                    "Received frame on {} ({} bytes)",
                    publish.topic,
                    publish.payload.len()
                );
                return Ok(publish.payload);
            }
        }
    }
}

/// Drives the stream into the inbound queue until the queue closes. A link
/// failure triggers a fixed-delay retry, forever; a malformed or invalid
/// frame is discarded without touching the queue.
pub async fn run_ingest<S: TelemetryStream>(
    mut stream: S,
    reconnect_delay: Duration,
    tx: mpsc::Sender<Sample>,
) -> Result<()> {
    let mut accepted = 0u64;
    let mut rejected = 0u64;

    loop {
        match stream.next_frame().await {
            Ok(payload) => match decode_frame(&payload) {
                Ok(sample) => {
                    forward(sample, &tx).await?;
                    accepted += 1;
                    if accepted % LOG_INTERVAL_SAMPLES == 0 {
                        info!("Ingested {} samples ({} rejected)", accepted, rejected);
                    }
                }
                Err(e) => {
                    rejected += 1;
                    warn!("Discarding bad frame: {}", e);
                }
            },
            Err(e) => {
                warn!(
                    "Telemetry link lost: {}. Retrying in {:?}",
                    e, reconnect_delay
                );
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}

fn decode_frame(payload: &[u8]) -> Result<Sample> {
    let sample: Sample = serde_json::from_slice(payload)?;
    validate_sample(&sample)?;
    Ok(sample)
}

/// Queues a sample for the render side. A full queue waits for space;
/// accepted samples are never dropped here.
async fn forward(sample: Sample, tx: &mpsc::Sender<Sample>) -> Result<()> {
    match tx.try_send(sample) {
        Ok(()) => Ok(()),
        Err(tokio::sync::mpsc::error::TrySendError::Full(sample)) => {
            debug!("Inbound queue full, waiting for space");
            tx.send(sample).await.map_err(|_| Error::ChannelSend)
        }
        Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => Err(Error::ChannelSend),
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// Plays back a fixed sequence of frames and link failures, then pends
    /// forever. Records the virtual instant each scripted event was pulled.
    pub struct ScriptedStream {
        script: VecDeque<Result<Bytes>>,
        pulls: Arc<Mutex<Vec<Instant>>>,
    }

    impl ScriptedStream {
        pub fn new(script: Vec<Result<Bytes>>) -> Self {
            Self {
                script: script.into(),
                pulls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn pulls(&self) -> Arc<Mutex<Vec<Instant>>> {
            self.pulls.clone()
        }
    }

    #[async_trait]
    impl TelemetryStream for ScriptedStream {
        async fn next_frame(&mut self) -> Result<Bytes> {
            match self.script.pop_front() {
                Some(event) => {
                    self.pulls.lock().unwrap().push(Instant::now());
                    event
                }
                None => std::future::pending().await,
            }
        }
    }
}
