//! Event Subscription
//!
//! Bridges the in-process notification hub onto JSON-RPC subscriptions.
//! Each subscriber sees the events published while it is attached; there
//! is no replay of anything earlier.

use jsonrpsee::server::SubscriptionMessage;
use jsonrpsee::PendingSubscriptionSink;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use taskflow_core::domain::TaskEvent;

/// Pump hub events into one subscription until either side goes away.
pub async fn forward_task_events(
    pending: PendingSubscriptionSink,
    mut events: broadcast::Receiver<TaskEvent>,
) {
    let sink = match pending.accept().await {
        Ok(sink) => sink,
        Err(_) => {
            debug!("Subscription was dropped before it became active");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = sink.closed() => break,
            event = events.recv() => match event {
                Ok(event) => {
                    let msg = match SubscriptionMessage::from_json(&event) {
                        Ok(msg) => msg,
                        Err(e) => {
                            warn!("Could not serialize task event: {}", e);
                            continue;
                        }
                    };
                    if sink.send(msg).await.is_err() {
                        // Subscriber went away mid-send
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // A slow subscriber loses what it missed and keeps going
                    warn!(skipped, "Subscriber lagged behind the event stream");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
