use anyhow::Context;
use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{Extension, Query, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use globochat_core::{
    new_message_id, now_timestamp, validate_message, validate_username, ChatMessage, ClientEvent,
    HistoryParams, ServerEvent,
};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Handler for GET /api/messages — the most recent messages, oldest first,
/// as a bare JSON array.
pub async fn list_messages(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ChatMessage>>, (StatusCode, String)> {
    let messages = recent_messages(&state.pool, params.effective_limit())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("db error: {}", e)))?;
    Ok(Json(messages))
}

/// Fetches the most recent `limit` messages in chronological order.
pub async fn recent_messages(pool: &SqlitePool, limit: u32) -> sqlx::Result<Vec<ChatMessage>> {
    // rowid is insertion order, which is the ordering the wire promises
    let rows = sqlx::query(
        "SELECT id, username, message, timestamp FROM messages ORDER BY rowid DESC LIMIT ?",
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        messages.push(ChatMessage {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            message: row.try_get("message")?,
            timestamp: row.try_get("timestamp")?,
        });
    }
    // the query walks newest-first; flip to oldest-first for the response
    messages.reverse();
    Ok(messages)
}

/// What the server does in response to one inbound client event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Fan out to every registered connection, sender included.
    Broadcast(ServerEvent),
    /// Answer only the connection that sent the event.
    Reject(ServerEvent),
}

/// Authoritative handling of one client event: validate, persist if it is a
/// message, and decide how the result travels. Identity is client-chosen and
/// unauthenticated, so validation is all the server can hold the line on.
pub async fn handle_event(pool: &SqlitePool, event: ClientEvent) -> anyhow::Result<Reaction> {
    match event {
        ClientEvent::Message { username, message } => {
            let username = match validate_username(&username) {
                Ok(name) => name.to_string(),
                Err(e) => return Ok(Reaction::Reject(ServerEvent::Error { message: e.to_string() })),
            };
            let body = match validate_message(&message) {
                Ok(body) => body.to_string(),
                Err(e) => return Ok(Reaction::Reject(ServerEvent::Error { message: e.to_string() })),
            };

            let msg = ChatMessage {
                id: new_message_id(),
                username,
                message: body,
                timestamp: now_timestamp(),
            };
            sqlx::query("INSERT INTO messages (id, username, message, timestamp) VALUES (?, ?, ?, ?)")
                .bind(&msg.id)
                .bind(&msg.username)
                .bind(&msg.message)
                .bind(&msg.timestamp)
                .execute(pool)
                .await
                .context("insert message")?;

            Ok(Reaction::Broadcast(ServerEvent::Message(msg)))
        }
        ClientEvent::Typing { username, is_typing } => {
            // typing state is ephemeral: validated, broadcast, never stored
            let username = match validate_username(&username) {
                Ok(name) => name.to_string(),
                Err(e) => return Ok(Reaction::Reject(ServerEvent::Error { message: e.to_string() })),
            };
            Ok(Reaction::Broadcast(ServerEvent::Typing { username, is_typing }))
        }
    }
}

/// Handler for GET /api/ws
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Register a sender for this session. Clones of `tx` are what broadcast
    // uses to reach this client (server -> client direction).
    let conn_id = Uuid::new_v4();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    state.sessions.insert(conn_id, tx);
    tracing::info!("ws connection {} open ({} active)", conn_id, state.sessions.len());

    let (mut sender, mut receiver) = socket.split();

    // Task: forward queued frames from rx -> websocket sink
    let forward_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    // Read loop: every text frame is one JSON event
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => handle_frame(&state, conn_id, &text).await,
            Message::Binary(_) => send_to(
                &state,
                conn_id,
                &ServerEvent::Error { message: "expected text frames".to_string() },
            ),
            Message::Close(_) => break,
            // axum answers pings on its own
            _ => {}
        }
    }

    // Deregister; dropping the last sender ends the forward task
    state.sessions.remove(&conn_id);
    let _ = forward_task.await;
    tracing::info!("ws connection {} closed ({} active)", conn_id, state.sessions.len());
}

async fn handle_frame(state: &Arc<AppState>, conn_id: Uuid, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(ev) => ev,
        Err(e) => {
            tracing::warn!("connection {}: malformed frame: {}", conn_id, e);
            send_to(state, conn_id, &ServerEvent::Error { message: "malformed event".to_string() });
            return;
        }
    };

    match handle_event(&state.pool, event).await {
        Ok(Reaction::Broadcast(ev)) => broadcast(state, &ev),
        Ok(Reaction::Reject(ev)) => send_to(state, conn_id, &ev),
        Err(e) => {
            tracing::error!("connection {}: {:#}", conn_id, e);
            send_to(state, conn_id, &ServerEvent::Error { message: "internal error".to_string() });
        }
    }
}

/// Queues an event for every live connection, the sender included.
pub fn broadcast(state: &AppState, event: &ServerEvent) {
    let Some(frame) = encode(event) else { return };
    for entry in state.sessions.iter() {
        // a failed send means that session is tearing down; it cleans itself up
        let _ = entry.value().send(frame.clone());
    }
}

/// Queues an event for a single connection.
fn send_to(state: &AppState, conn_id: Uuid, event: &ServerEvent) {
    let Some(frame) = encode(event) else { return };
    if let Some(tx) = state.sessions.get(&conn_id) {
        let _ = tx.send(frame);
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!("serialize event: {}", e);
            None
        }
    }
}
