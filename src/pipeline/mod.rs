//! The five REPET separation pipelines: `ORIGINAL`,
//! `EXTENDED`, `ADAPTIVE`, `SIM`, and `SIMONLINE`. Each accepts an `[N, C]`
//! audio signal and its sampling frequency and returns an equally-shaped
//! estimate of the repeating background.

mod adaptive;
mod common;
mod extended;
mod original;
mod sim;
mod sim_online;

pub use adaptive::{adaptive, adaptive_with_config};
pub use extended::{extended, extended_with_config};
pub use original::{original, original_with_config};
pub use sim::{sim, sim_with_config};
pub use sim_online::{sim_online, sim_online_with_config};
