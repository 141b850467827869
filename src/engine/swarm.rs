// Per-tick driver: deaths, board snapshot, one decision per bot, then top-up.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::board::Board;
use super::config::{COLS, ROWS};
use super::population::Population;
use super::rng::RandomSource;
use crate::error::ClientError;
use crate::metrics;
use crate::protocol::{ClientMessage, Tick};

/// Settings the swarm needs from the runtime configuration.
#[derive(Clone, Debug)]
pub struct SwarmSettings {
    pub target_bots: usize,
    pub session_id: String,
    pub rows: usize,
    pub cols: usize,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            target_bots: 10,
            session_id: "test".to_string(),
            rows: ROWS,
            cols: COLS,
        }
    }
}

/// What one tick produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub deaths: usize,
    pub moves: usize,
    pub joined: usize,
}

/// Everything this client controls within one connection.
pub struct Swarm<R = StdRng> {
    settings: SwarmSettings,
    population: Population,
    rng: R,
}

impl Swarm<StdRng> {
    /// Swarm seeded from OS entropy.
    pub fn from_entropy(settings: SwarmSettings) -> Self {
        Swarm::new(settings, StdRng::from_entropy())
    }
}

impl<R: RandomSource> Swarm<R> {
    pub fn new(settings: SwarmSettings, rng: R) -> Self {
        Self {
            settings,
            population: Population::new(),
            rng,
        }
    }

    pub fn settings(&self) -> &SwarmSettings {
        &self.settings
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Fill the population up to the target, queueing the joins.
    pub fn spawn(&mut self, out: &mut Vec<ClientMessage>) -> usize {
        self.population.top_up(
            self.settings.target_bots,
            &self.settings.session_id,
            &mut self.rng,
            out,
        )
    }

    /// React to one tick. Outbound messages are appended to `out`.
    ///
    /// If the board cannot be built the error is returned after deaths were
    /// applied; no moves or joins are queued for that tick.
    pub fn on_tick(
        &mut self,
        tick: &Tick,
        out: &mut Vec<ClientMessage>,
    ) -> Result<TickReport, ClientError> {
        let started = std::time::Instant::now();
        let mut report = TickReport {
            deaths: self.population.apply_deaths(&tick.deaths),
            ..TickReport::default()
        };

        let board = Board::from_snapshot(
            self.settings.rows,
            self.settings.cols,
            &tick.snakes,
            &tick.apples,
        )?;

        for bot in self.population.iter() {
            // A freshly joined bot shows up a tick later.
            let Some(snake) = tick.snakes.get(&bot.id) else {
                tracing::debug!("Bot {} not on the board yet", bot.id);
                continue;
            };
            if let Some(direction) = bot.decide(snake.direction, &snake.cells, &board, &mut self.rng)
            {
                tracing::debug!("Bot {} turns {} -> {}", bot.id, snake.direction, direction);
                metrics::MOVES_SENT_TOTAL
                    .with_label_values(&[direction.as_str()])
                    .inc();
                out.push(ClientMessage::Play {
                    user_id: bot.id.clone(),
                    direction,
                });
                report.moves += 1;
            }
        }

        report.joined = self.spawn(out);

        metrics::TICKS_PROCESSED_TOTAL.inc();
        metrics::TICK_DURATION_MS.observe(started.elapsed().as_secs_f64() * 1000.0);
        Ok(report)
    }
}
