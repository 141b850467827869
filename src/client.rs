// Websocket client: connects to the game server, runs the swarm tick by tick
// and reconnects whenever the stream goes away.

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::WebSocketStream;

use crate::config::Config;
use crate::engine::swarm::Swarm;
use crate::error::ClientError;
use crate::metrics;
use crate::protocol::{ClientMessage, Tick};

/// How a session ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the stream.
    Closed,
    /// Shutdown was requested locally.
    Shutdown,
}

/// Connect, play and reconnect until `shutdown` flips to true (or its sender
/// is dropped).
pub async fn run(config: Config, mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        tracing::info!("Connecting to {}", config.websocket_url);
        let connected = tokio::select! {
            result = tokio_tungstenite::connect_async(config.websocket_url.as_str()) => result,
            _ = shutdown.changed() => break,
        };

        match connected {
            Ok((ws_stream, _response)) => {
                tracing::info!("Connected to {}", config.websocket_url);
                metrics::CONNECTED.set(1);
                let result = run_session(ws_stream, &config, &mut shutdown).await;
                metrics::CONNECTED.set(0);
                metrics::LIVE_BOTS.set(0);
                match result {
                    Ok(SessionEnd::Shutdown) => break,
                    Ok(SessionEnd::Closed) => {
                        tracing::warn!(
                            "Connection closed by server, reconnecting in {:?}",
                            config.reconnect_delay
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Session failed: {}, reconnecting in {:?}",
                            e,
                            config.reconnect_delay
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect: {}, retrying in {:?}",
                    e,
                    config.reconnect_delay
                );
            }
        }

        metrics::RECONNECTS_TOTAL.inc();
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown.changed() => break,
        }
    }
    tracing::info!("Client stopped");
}

/// Drive one connection: handshake, spawn the bots, then one swarm step per tick.
///
/// Every session starts with an empty population; bots from an earlier
/// connection mean nothing to the server any more.
pub async fn run_session<S>(
    ws_stream: WebSocketStream<S>,
    config: &Config,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<SessionEnd, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let mut out = vec![ClientMessage::SessionList];
    flush(&mut ws_tx, &mut out).await?;

    let session_list = tokio::select! {
        frame = next_text(&mut ws_rx) => frame?.ok_or(ClientError::HandshakeClosed)?,
        _ = shutdown.changed() => {
            let _ = ws_tx.send(Message::Close(None)).await;
            return Ok(SessionEnd::Shutdown);
        }
    };
    match serde_json::from_str::<serde_json::Value>(&session_list) {
        Ok(sessions) => {
            tracing::info!("Got session list from server");
            tracing::debug!("Sessions: {}", sessions);
        }
        Err(e) => tracing::warn!("Session list is not valid JSON: {}", e),
    }

    let mut swarm = Swarm::from_entropy(config.swarm_settings());
    swarm.spawn(&mut out);
    flush(&mut ws_tx, &mut out).await?;

    loop {
        tokio::select! {
            frame = next_text(&mut ws_rx) => {
                let Some(text) = frame? else {
                    return Ok(SessionEnd::Closed);
                };
                match Tick::parse(&text).and_then(|tick| swarm.on_tick(&tick, &mut out)) {
                    Ok(report) => tracing::debug!(
                        "Tick: {} deaths, {} moves, {} joined",
                        report.deaths,
                        report.moves,
                        report.joined
                    ),
                    Err(e) if e.is_tick_local() => {
                        tracing::error!("Dropping tick: {}", e);
                        metrics::MALFORMED_TICKS_TOTAL.inc();
                    }
                    Err(e) => return Err(e),
                }
                flush(&mut ws_tx, &mut out).await?;
            }
            _ = shutdown.changed() => {
                tracing::info!("Shutting down, closing connection");
                let _ = ws_tx.send(Message::Close(None)).await;
                return Ok(SessionEnd::Shutdown);
            }
        }
    }
}

/// Next text frame, or `None` once the server closes the stream.
async fn next_text<R>(ws_rx: &mut R) -> Result<Option<String>, ClientError>
where
    R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = ws_rx.next().await {
        match frame? {
            Message::Text(text) => return Ok(Some(text.to_string())),
            Message::Close(_) => return Ok(None),
            // Pings are answered by tungstenite itself.
            _ => {}
        }
    }
    Ok(None)
}

/// Send every queued message, then flush the socket once.
async fn flush<W>(ws_tx: &mut W, out: &mut Vec<ClientMessage>) -> Result<(), ClientError>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    if out.is_empty() {
        return Ok(());
    }
    for msg in out.drain(..) {
        ws_tx.feed(Message::Text(msg.to_json()?.into())).await?;
    }
    ws_tx.flush().await?;
    Ok(())
}
