//! WebSocket connection handler
//!
//! Each open tab holds one socket. Text frames carry inbound commands;
//! relay messages flow back as JSON text frames.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use shared::{component_debug, component_error, component_info, component_warn, ClientMessage, Component};
use tokio::sync::mpsc;

use crate::relay_impl::AppState;
use crate::traits::ClientRegistry;
use crate::worker::WorkerEvent;

/// Outgoing messages buffered per client before new ones are dropped
const CLIENT_CHANNEL_CAPACITY: usize = 100;

pub async fn websocket_handler(ws: WebSocketUpgrade, State(worker): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket(socket, worker))
}

/// Handle individual WebSocket connection
async fn handle_websocket(socket: WebSocket, worker: AppState) {
    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Clients that connect before activation stay uncontrolled until claimed
    let (tx, mut rx) = mpsc::channel::<ClientMessage>(CLIENT_CHANNEL_CAPACITY);
    let controlled = worker.is_activated().await;
    let client_id = worker.registry().register(tx, controlled).await;
    component_info!(Component::Server, "🔗 New WebSocket connection: {}", client_id);

    let outgoing_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let json = match message.to_json() {
                Ok(json) => json,
                Err(e) => {
                    component_error!(Component::Server, "Failed to serialize client message: {}", e);
                    continue;
                }
            };

            if let Err(e) = sender.send(Message::Text(json)).await {
                component_warn!(Component::Server, "Failed to send message to client {}: {}", client_id, e);
                break;
            }
        }

        component_debug!(Component::Server, "Outgoing message task ended for client {}", client_id);
    });

    while let Some(message) = receiver.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                component_warn!(Component::Server, "WebSocket error for client {}: {}", client_id, e);
                break;
            }
        };

        match message {
            Message::Text(text) => {
                component_debug!(Component::Server, "📨 Received from client {}: {}", client_id, text);
                match serde_json::from_str::<Value>(&text) {
                    Ok(value) => {
                        worker.dispatch(WorkerEvent::Message(value)).await;
                    }
                    Err(e) => {
                        component_warn!(Component::Server, "Ignoring unparsable message from {}: {}", client_id, e);
                    }
                }
            }
            Message::Binary(_) => {
                component_warn!(Component::Server, "Binary message from client {} not supported", client_id);
            }
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                component_debug!(Component::Server, "Client {} requested close", client_id);
                break;
            }
        }
    }

    outgoing_task.abort();
    worker.registry().unregister(client_id).await;
    component_info!(Component::Server, "👋 WebSocket connection closed: {}", client_id);
}
