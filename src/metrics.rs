// Prometheus metrics definitions for the snake swarm client.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Bots currently alive on this connection.
    pub static ref LIVE_BOTS: IntGauge =
        IntGauge::new("snake_swarm_live_bots", "Bots currently alive").unwrap();

    /// 1 while a websocket session is established.
    pub static ref CONNECTED: IntGauge =
        IntGauge::new("snake_swarm_connected", "Whether a server session is open").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Total bots spawned (join requests queued).
    pub static ref BOTS_SPAWNED_TOTAL: IntCounter =
        IntCounter::new("snake_swarm_bots_spawned_total", "Total bots spawned").unwrap();

    /// Total bots reported dead by the server.
    pub static ref BOT_DEATHS_TOTAL: IntCounter =
        IntCounter::new("snake_swarm_bot_deaths_total", "Total bot deaths").unwrap();

    /// Total ticks processed successfully.
    pub static ref TICKS_PROCESSED_TOTAL: IntCounter =
        IntCounter::new("snake_swarm_ticks_processed_total", "Total ticks processed").unwrap();

    /// Ticks dropped because the payload was unusable.
    pub static ref MALFORMED_TICKS_TOTAL: IntCounter =
        IntCounter::new("snake_swarm_malformed_ticks_total", "Ticks dropped as malformed").unwrap();

    /// Total reconnect attempts after a lost or failed connection.
    pub static ref RECONNECTS_TOTAL: IntCounter =
        IntCounter::new("snake_swarm_reconnects_total", "Total reconnect attempts").unwrap();

    /// Total play messages queued, by direction.
    pub static ref MOVES_SENT_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("snake_swarm_moves_sent_total", "Total moves sent"),
        &["direction"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Per-tick processing time in milliseconds.
    pub static ref TICK_DURATION_MS: Histogram = Histogram::with_opts(
        HistogramOpts::new("snake_swarm_tick_duration_ms", "Per-tick processing time in ms")
            .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LIVE_BOTS.clone()),
        Box::new(CONNECTED.clone()),
        Box::new(BOTS_SPAWNED_TOTAL.clone()),
        Box::new(BOT_DEATHS_TOTAL.clone()),
        Box::new(TICKS_PROCESSED_TOTAL.clone()),
        Box::new(MALFORMED_TICKS_TOTAL.clone()),
        Box::new(RECONNECTS_TOTAL.clone()),
        Box::new(MOVES_SENT_TOTAL.clone()),
        Box::new(TICK_DURATION_MS.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("Failed to register metric: {}", e);
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
