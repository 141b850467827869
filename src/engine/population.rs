// Bot population: the live set of controlled snakes for one connection.

use std::collections::{BTreeMap, HashSet};

use super::bot::Bot;
use super::config::BOT_ID_MAX;
use super::rng::RandomSource;
use crate::metrics;
use crate::protocol::ClientMessage;

/// Owns every live bot. Bots leave only through `apply_deaths` and are only
/// created by `top_up`; an identifier is never handed out twice.
#[derive(Debug, Default)]
pub struct Population {
    bots: BTreeMap<String, Bot>,
    issued: HashSet<String>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bots.
    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bots.contains_key(id)
    }

    /// Live bots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Bot> {
        self.bots.values()
    }

    /// Drop every listed bot. Unknown and repeated identifiers are ignored.
    /// Returns how many bots were removed.
    pub fn apply_deaths<S: AsRef<str>>(&mut self, deaths: &[S]) -> usize {
        let mut removed = 0;
        for id in deaths {
            let id = id.as_ref();
            if self.bots.remove(id).is_some() {
                tracing::warn!("[BOT DEATH] {}", id);
                metrics::BOT_DEATHS_TOTAL.inc();
                removed += 1;
            }
        }
        metrics::LIVE_BOTS.set(self.bots.len() as i64);
        removed
    }

    /// Spawn bots until `target` are alive, queueing one `join` per new bot.
    /// Returns how many were spawned.
    pub fn top_up(
        &mut self,
        target: usize,
        session_id: &str,
        rng: &mut impl RandomSource,
        out: &mut Vec<ClientMessage>,
    ) -> usize {
        let mut spawned = 0;
        while self.bots.len() < target {
            let id = self.mint_id(rng);
            let bot = Bot::new(id.clone(), rng);
            tracing::info!(
                "Connected new bot {} (likes_to_move={}) to session {}",
                id,
                bot.likes_to_move,
                session_id
            );
            self.bots.insert(id.clone(), bot);
            out.push(ClientMessage::Join {
                user_id: id,
                session_id: session_id.to_string(),
            });
            metrics::BOTS_SPAWNED_TOTAL.inc();
            spawned += 1;
        }
        metrics::LIVE_BOTS.set(self.bots.len() as i64);
        spawned
    }

    fn mint_id(&mut self, rng: &mut impl RandomSource) -> String {
        loop {
            let id = rng.between(0, BOT_ID_MAX).to_string();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
