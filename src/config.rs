// Application configuration, loaded from environment variables and CLI flags.

use std::time::Duration;

use crate::engine::config::{COLS, ROWS};
use crate::engine::swarm::SwarmSettings;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Websocket endpoint of the game server.
    pub websocket_url: String,
    /// Number of bots to keep alive.
    pub nr_bots: usize,
    /// Session the bots join.
    pub session_id: String,
    /// Board height in cells.
    pub rows: usize,
    /// Board width in cells.
    pub cols: usize,
    /// Pause between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Port for the `/health` and `/metrics` endpoints. Disabled when unset.
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            websocket_url: "ws://127.0.0.1:8080/ws".to_string(),
            nr_bots: 10,
            session_id: "test".to_string(),
            rows: ROWS,
            cols: COLS,
            reconnect_delay: Duration::from_millis(1000),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `WEBSOCKET_URL` - game server endpoint (default: `ws://127.0.0.1:8080/ws`)
    /// - `NR_BOTS` - number of bots to keep alive (default: 10)
    /// - `SESSION_ID` - session to join (default: `test`)
    /// - `BOARD_ROWS` / `BOARD_COLS` - board size (default: 50 x 100)
    /// - `RECONNECT_DELAY_MS` - pause between reconnects (default: 1000)
    /// - `METRICS_PORT` - serve `/health` and `/metrics` on this port
    ///
    /// CLI flags (take precedence over the environment):
    /// - `--url <URL>`
    /// - `--bots <N>`
    /// - `--session <ID>`
    /// - `--metrics-port <PORT>`
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Build a config from CLI arguments and an environment lookup.
    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let websocket_url = Self::parse_cli_value(args, "--url")
            .or_else(|| env("WEBSOCKET_URL"))
            .unwrap_or(defaults.websocket_url);

        // A swarm of zero bots would never join anything.
        let nr_bots = Self::parse_cli_value(args, "--bots")
            .and_then(|v| v.parse::<usize>().ok())
            .or_else(|| env("NR_BOTS").and_then(|v| v.parse().ok()))
            .unwrap_or(defaults.nr_bots)
            .max(1);

        let session_id = Self::parse_cli_value(args, "--session")
            .or_else(|| env("SESSION_ID"))
            .unwrap_or(defaults.session_id);

        let rows = env("BOARD_ROWS")
            .and_then(|v| v.parse().ok())
            .filter(|&v: &usize| v > 0)
            .unwrap_or(defaults.rows);
        let cols = env("BOARD_COLS")
            .and_then(|v| v.parse().ok())
            .filter(|&v: &usize| v > 0)
            .unwrap_or(defaults.cols);

        let reconnect_delay = env("RECONNECT_DELAY_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.reconnect_delay);

        let metrics_port = Self::parse_cli_value(args, "--metrics-port")
            .or_else(|| env("METRICS_PORT"))
            .and_then(|v| v.parse().ok());

        Config {
            websocket_url,
            nr_bots,
            session_id,
            rows,
            cols,
            reconnect_delay,
            metrics_port,
        }
    }

    /// Parse a CLI flag value like `--bots 20`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }

    /// The part of the configuration the tick driver needs.
    pub fn swarm_settings(&self) -> SwarmSettings {
        SwarmSettings {
            target_bots: self.nr_bots,
            session_id: self.session_id.clone(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}
