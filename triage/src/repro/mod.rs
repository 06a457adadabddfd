//! Repro pack generation and persistence — the engineering handoff.

mod pack;
mod store;

pub use pack::{should_generate, ReproPack, ReproType, SystemContext};
pub use store::ReproPackStore;
