//! WebSocket transport for vehicle and observer channels.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::dispatch::{ChannelId, ChannelRegistry, ClientEvent, Outbound, handle_client_event};

use super::state::AppState;

/// Upgrade to a WebSocket and run the channel until it closes.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_channel(socket, state.registry))
}

async fn run_channel(socket: WebSocket, registry: Arc<ChannelRegistry>) {
    let (channel, outbound) = registry.connect();
    info!(%channel, "device connected");

    let (sink, stream) = socket.split();
    let writer = tokio::spawn(write_events(channel, sink, outbound));

    read_frames(&registry, channel, stream).await;

    // Dropping the channel's sender ends the writer.
    let cars = registry.disconnect(channel);
    info!(%channel, cars = cars.len(), "device disconnected");
    if let Err(e) = writer.await {
        debug!(%channel, error = %e, "writer task failed");
    }
}

/// Apply inbound frames until the peer closes or the read fails.
async fn read_frames<S, E>(registry: &ChannelRegistry, channel: ChannelId, mut stream: S)
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_frame(registry, channel, &text),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(%channel, error = %e, "socket read failed");
                break;
            }
        }
    }
}

fn handle_frame(registry: &ChannelRegistry, channel: ChannelId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => handle_client_event(registry, channel, event),
        Err(e) => warn!(%channel, error = %e, "ignoring malformed frame"),
    }
}

async fn write_events(
    channel: ChannelId,
    mut sink: futures::stream::SplitSink<WebSocket, Message>,
    mut outbound: Outbound,
) {
    while let Some(event) = outbound.recv().await {
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(e) => {
                warn!(%channel, event = event.name(), error = %e, "failed to encode event");
                continue;
            }
        };
        if sink.send(Message::Text(text)).await.is_err() {
            debug!(%channel, "socket closed while writing");
            break;
        }
    }
}
