use thiserror::Error;

/// Errors raised while talking to the game server or processing its ticks.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("json encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tick payload did not match the expected schema.
    #[error("malformed tick: {0}")]
    MalformedTick(#[source] serde_json::Error),

    /// Tick referenced a cell outside the board.
    #[error("cell ({row}, {col}) out of bounds")]
    CellOutOfBounds { row: i32, col: i32 },

    #[error("connection closed before the session list arrived")]
    HandshakeClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Errors that spoil a single tick but leave the connection usable.
    pub fn is_tick_local(&self) -> bool {
        matches!(
            self,
            ClientError::MalformedTick(_) | ClientError::CellOutOfBounds { .. }
        )
    }
}
