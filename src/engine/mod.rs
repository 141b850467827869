pub mod board;
pub mod bot;
pub mod config;
pub mod direction;
pub mod population;
pub mod rng;
pub mod swarm;
