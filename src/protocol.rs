// Wire messages exchanged with the game server over the websocket.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::board::Cell;
use crate::engine::direction::Direction;
use crate::error::ClientError;

/// Messages sent from this client to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ask for the list of sessions. Sent once per connection.
    #[serde(rename = "session_list")]
    SessionList,
    /// Announce a new bot.
    #[serde(rename = "join")]
    Join { user_id: String, session_id: String },
    /// Change a bot's direction.
    #[serde(rename = "play")]
    Play {
        user_id: String,
        direction: Direction,
    },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A snake as reported in a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Body cells, tail first, head last.
    pub cells: Vec<Cell>,
    pub direction: Direction,
}

impl SnakeState {
    pub fn head(&self) -> Option<Cell> {
        self.cells.last().copied()
    }
}

/// Full board state broadcast by the server every tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub snakes: HashMap<String, SnakeState>,
    #[serde(default)]
    pub apples: Vec<Cell>,
    #[serde(default)]
    pub deaths: Vec<String>,
}

impl Tick {
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        serde_json::from_str(text).map_err(ClientError::MalformedTick)
    }
}
