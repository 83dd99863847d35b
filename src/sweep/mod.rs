/// Sweep domain layer: option registry, presets, the combination grid,
/// the simulation seam and the run loop.
pub mod confirm;
pub mod errors;
pub mod grid;
pub mod preset;
pub mod prior;
pub mod registry;
pub mod runner;
pub mod simulate;

pub use confirm::confirm;
pub use errors::SweepError;
pub use grid::{Combination, SweepConfig};
pub use preset::PresetTable;
pub use prior::Prior;
pub use runner::{Outcome, RunOptions, RunRecord, run_sweep};
pub use simulate::{EngineCli, Simulator};
