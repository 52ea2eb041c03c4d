use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::{sync::broadcast::error::RecvError, sync::mpsc, time};

use super::RoomRegistry;
use super::handler_trait::{BroadcastAction, WsHandler};
use super::runtime::WsContext;

pub struct WsServerOptions {
    pub ws_ping_sec: u64,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self { ws_ping_sec: 30 }
    }
}

/// Drives one WebSocket session that is a member of exactly one room.
///
/// Structure per connection: a writer task draining the outbound queue, a
/// pump task forwarding room broadcasts through `H::on_broadcast`, a WS-level
/// keepalive ping task, and the receive loop on the current task. Inbound
/// frames are dispatched one at a time, so handler calls for a single session
/// never overlap.
pub async fn serve_room<H: WsHandler>(
    socket: WebSocket,
    rooms: RoomRegistry,
    room: String,
    handler: Arc<H>,
    opts: WsServerOptions,
) {
    let mut rx = rooms.subscribe(&room).await;

    let (mut sink, mut socket_rx) = socket.split();

    // Outbound queue and writer task
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    let ctx = WsContext::new(room.clone(), rooms.clone(), out_tx.clone());

    // S→C: forward room broadcasts, letting the handler rewrite per session.
    // Dropping `rx` when this task ends is what removes the session from the
    // room, so membership is released as soon as the connection goes away.
    let forward_task = {
        let out_tx = out_tx.clone();
        let handler = Arc::clone(&handler);
        let room = room.clone();
        tokio::spawn(async move {
            loop {
                let text = match rx.recv().await {
                    Ok(text) => text,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Session on '{room}' lagged; dropped {skipped} messages");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                match handler.on_broadcast(&text) {
                    BroadcastAction::Forward => {
                        if out_tx.send(Message::Text(text.into())).await.is_err() {
                            tracing::info!("Client disconnected while sending to '{room}'");
                            break;
                        }
                    }
                    BroadcastAction::Rewrite(own) => {
                        if out_tx.send(Message::Text(own.into())).await.is_err() {
                            break;
                        }
                    }
                    BroadcastAction::RewriteAndClose(own) => {
                        let _ = out_tx.send(Message::Text(own.into())).await;
                        let _ = out_tx.send(Message::Close(None)).await;
                        break;
                    }
                    BroadcastAction::Skip => {}
                }
            }
        })
    };

    // WS-level periodic ping
    let ping_task = {
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            loop {
                time::sleep(std::time::Duration::from_secs(opts.ws_ping_sec)).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };
    drop(out_tx);

    // Let the feature handler know we're live
    handler.on_open(&ctx).await;

    // C→S: parse & dispatch, strictly sequential per connection
    while let Some(Ok(msg)) = socket_rx.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<H::In>(text.as_str()) {
                Ok(parsed) => handler.on_message(&ctx, parsed).await,
                Err(_) => handler.on_invalid(&ctx, text.as_str()).await,
            },
            Message::Ping(payload) => {
                let _ = ctx.reply_pong(payload).await;
            }
            Message::Pong(_) => {}
            Message::Binary(_) => {
                tracing::warn!("Ignoring binary frame on room '{}'", ctx.room);
            }
            Message::Close(_) => break,
        }
    }

    handler.on_close(&ctx).await;

    forward_task.abort();
    ping_task.abort();
    drop(ctx); // releases the last outbound sender so the writer drains and stops
    let _ = writer_task.await;
    tracing::info!("WS session ended for room '{room}'");
}
