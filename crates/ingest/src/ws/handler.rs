use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::IngestState;
use crate::ws::ingest::on_message;

/// What the receive loop does after one transport event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Stop,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// Messages above `max_message_bytes` are rejected by the transport.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<IngestState>) -> impl IntoResponse {
    let max = state.config.max_message_bytes;
    ws.max_message_size(max)
        .max_frame_size(max)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive a single ingest session.
///
/// Outbound control frames (keepalive pings, Close on eviction or shutdown)
/// flow through the `WsManager` channel into a sender task; inbound messages
/// are handled in order on the current task. Bad payloads never end the
/// session: only Close, end-of-stream, a transport error or eviction do.
async fn handle_socket(socket: WebSocket, state: IngestState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Client connected");

    let mut rx = state.ws_manager.add(conn_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    loop {
        let control = tokio::select! {
            _ = &mut send_task => {
                tracing::debug!(conn_id = %conn_id, "Session closed by server");
                LoopControl::Stop
            }
            event = stream.next() => on_transport_event(&state, &conn_id, event).await,
        };
        if control == LoopControl::Stop {
            break;
        }
    }

    // Evicted sessions are already gone from the registry.
    let session_secs = state
        .ws_manager
        .connected_at(&conn_id)
        .await
        .map(|at| (chrono::Utc::now() - at).num_seconds());
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, ?session_secs, "Client disconnected");
}

async fn on_transport_event(
    state: &IngestState,
    conn_id: &str,
    event: Option<Result<Message, axum::Error>>,
) -> LoopControl {
    let msg = match event {
        Some(Ok(msg)) => msg,
        Some(Err(e)) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "WebSocket receive error");
            return LoopControl::Stop;
        }
        None => {
            tracing::debug!(conn_id = %conn_id, "WebSocket stream ended");
            return LoopControl::Stop;
        }
    };

    state.ws_manager.touch(conn_id).await;

    match msg {
        Message::Text(text) => handle_payload(state, conn_id, text.as_str()).await,
        Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
            Ok(text) => handle_payload(state, conn_id, text).await,
            Err(e) => {
                tracing::warn!(conn_id = %conn_id, error = %e, "Binary message is not UTF-8");
                LoopControl::Continue
            }
        },
        Message::Ping(_) | Message::Pong(_) => {
            tracing::trace!(conn_id = %conn_id, "Keepalive frame received");
            LoopControl::Continue
        }
        Message::Close(frame) => {
            tracing::info!(conn_id = %conn_id, ?frame, "Client sent Close");
            LoopControl::Stop
        }
    }
}

async fn handle_payload(state: &IngestState, conn_id: &str, raw: &str) -> LoopControl {
    tracing::trace!(conn_id = %conn_id, bytes = raw.len(), "Received message");
    on_message(&state.frames, raw).await.log(conn_id);
    LoopControl::Continue
}
