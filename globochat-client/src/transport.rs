//! Websocket plumbing: one connection per session, JSON text frames in both
//! directions, and deliberately no reconnect loop — when the socket drops,
//! the session stays disconnected.

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use globochat_core::{ClientEvent, ServerEvent};

/// What the socket tasks report back to the session loop.
#[derive(Debug)]
pub enum SocketUpdate {
    /// A parsed inbound event.
    Event(ServerEvent),
    /// The channel closed or failed, with the close reason if one was given.
    Closed(Option<String>),
}

/// A live connection: events go out through `outbound`, updates come back
/// through `updates`. Dropping either half tears the pumps down.
pub struct Connection {
    pub outbound: UnboundedSender<ClientEvent>,
    pub updates: UnboundedReceiver<SocketUpdate>,
}

/// Turns the backend base URL into the websocket endpoint, swapping the
/// scheme the way the browser client did.
pub fn ws_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/api/ws", ws)
}

/// Opens the websocket and spawns the outbound/inbound pump tasks.
pub async fn connect(base_url: &str) -> anyhow::Result<Connection> {
    let url = ws_endpoint(base_url);
    let (stream, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("connect to {}", url))?;
    let (mut sink, mut source) = stream.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientEvent>();
    let (upd_tx, upd_rx) = mpsc::unbounded_channel::<SocketUpdate>();

    // outbound pump: events -> text frames
    tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("serialize outbound event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(frame)).await.is_err() {
                // the inbound pump reports the closure
                break;
            }
        }
    });

    // inbound pump: text frames -> server events
    tokio::spawn(async move {
        loop {
            match source.next().await {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => {
                        if upd_tx.send(SocketUpdate::Event(event)).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("dropping unreadable frame: {}", e),
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame.map(|f| f.reason.to_string());
                    tracing::info!("server closed the channel");
                    let _ = upd_tx.send(SocketUpdate::Closed(reason));
                    break;
                }
                // pings are answered by tungstenite; binary frames are not
                // part of this wire
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let _ = upd_tx.send(SocketUpdate::Closed(Some(e.to_string())));
                    break;
                }
                None => {
                    let _ = upd_tx.send(SocketUpdate::Closed(None));
                    break;
                }
            }
        }
    });

    Ok(Connection { outbound: out_tx, updates: upd_rx })
}
