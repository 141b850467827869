// End-to-end tests against an in-process websocket server: handshake, joins,
// tick handling, reconnect and shutdown.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use snake_swarm::client;
use snake_swarm::config::Config;

const TIMEOUT: Duration = Duration::from_secs(10);

fn test_config(url: String, bots: usize) -> Config {
    Config {
        websocket_url: url,
        nr_bots: bots,
        session_id: "loopback".to_string(),
        rows: 20,
        cols: 20,
        reconnect_delay: Duration::from_millis(50),
        metrics_port: None,
    }
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = listener.accept().await.unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

async fn recv_json(ws: &mut WebSocketStream<TcpStream>) -> Value {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text.to_string()).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

async fn send_json(ws: &mut WebSocketStream<TcpStream>, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

/// Answer the session list request and collect the joins that follow.
async fn handshake(ws: &mut WebSocketStream<TcpStream>, bots: usize) -> Vec<String> {
    let first = recv_json(ws).await;
    assert_eq!(first, json!({ "type": "session_list" }));
    send_json(ws, json!({ "sessions": ["loopback"] })).await;

    let mut ids = Vec::new();
    for _ in 0..bots {
        let join = recv_json(ws).await;
        assert_eq!(join["type"], "join");
        assert_eq!(join["session_id"], "loopback");
        ids.push(join["user_id"].as_str().unwrap().to_string());
    }
    ids
}

#[tokio::test]
async fn test_tick_produces_moves_and_refill() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let client_task = tokio::spawn(client::run(test_config(url, 3), shutdown_rx));

    let mut ws = tokio::time::timeout(TIMEOUT, accept(&listener)).await.unwrap();
    let ids = tokio::time::timeout(TIMEOUT, handshake(&mut ws, 3)).await.unwrap();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3);

    // ids[0] faces the top wall; ids[1] died; ids[2] has not appeared yet.
    let tick = json!({
        "snakes": {
            ids[0].clone(): { "cells": [[1, 10], [0, 10]], "direction": "up" },
            "stranger": { "cells": [[15, 15], [15, 16]], "direction": "right" }
        },
        "apples": [[5, 5]],
        "deaths": [ids[1].clone(), "stranger-2"]
    });
    send_json(&mut ws, tick).await;

    let play = tokio::time::timeout(TIMEOUT, recv_json(&mut ws)).await.unwrap();
    assert_eq!(play["type"], "play");
    assert_eq!(play["user_id"], ids[0].as_str());
    let direction = play["direction"].as_str().unwrap();
    assert!(direction == "left" || direction == "right", "got {direction}");

    let join = tokio::time::timeout(TIMEOUT, recv_json(&mut ws)).await.unwrap();
    assert_eq!(join["type"], "join");
    let fresh = join["user_id"].as_str().unwrap();
    assert!(!ids.iter().any(|id| id == fresh));

    // A malformed tick is dropped without killing the connection.
    send_json(&mut ws, json!({ "snakes": { "x": { "cells": [[99, 99]], "direction": "up" } } })).await;
    send_json(&mut ws, json!({ "snakes": {}, "deaths": [ids[0].clone()] })).await;
    let join = tokio::time::timeout(TIMEOUT, recv_json(&mut ws)).await.unwrap();
    assert_eq!(join["type"], "join");

    shutdown_tx.send(true).unwrap();
    match tokio::time::timeout(TIMEOUT, ws.next()).await.unwrap() {
        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {}
        other => panic!("expected close, got {other:?}"),
    }
    tokio::time::timeout(TIMEOUT, client_task).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_reconnect_rejoins_with_new_bots() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let client_task = tokio::spawn(client::run(test_config(url, 2), shutdown_rx));

    let mut ws = tokio::time::timeout(TIMEOUT, accept(&listener)).await.unwrap();
    let first = tokio::time::timeout(TIMEOUT, handshake(&mut ws, 2)).await.unwrap();
    let _ = ws.close(None).await;
    drop(ws);

    let mut ws = tokio::time::timeout(TIMEOUT, accept(&listener)).await.unwrap();
    let second = tokio::time::timeout(TIMEOUT, handshake(&mut ws, 2)).await.unwrap();
    assert_eq!(second.len(), 2);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(TIMEOUT, client_task).await.unwrap().unwrap();

    // Each connection mints its own identifiers; a clash would need two equal
    // draws out of a billion.
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_shutdown_while_server_unreachable() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let client_task = tokio::spawn(client::run(
        test_config(format!("ws://{addr}"), 1),
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(TIMEOUT, client_task).await.unwrap().unwrap();
}
