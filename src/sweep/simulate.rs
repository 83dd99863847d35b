/// The seam between the sweep loop and the external simulation engine.
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::errors::SweepError;
use super::prior::Prior;

/// Default engine executable, looked up on `PATH`.
pub const DEFAULT_ENGINE: &str = "asreview";

/// Everything the engine needs for one simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest<'a> {
    pub dataset: &'a Path,
    pub classifier: &'a str,
    pub query: &'a str,
    pub balance: &'a str,
    pub feature_extraction: &'a str,
    pub prior: Prior,
    pub seed: u64,
    pub state_file: PathBuf,
    /// Label used in error messages.
    pub label: String,
}

/// Runs one active-learning simulation to completion.
pub trait Simulator {
    /// Run the simulation, blocking until the state file is written.
    ///
    /// # Errors
    ///
    /// Returns a `SweepError` when the simulation cannot be started or fails.
    fn simulate(&mut self, request: &SimulationRequest<'_>) -> Result<(), SweepError>;
}

/// Runs simulations through the engine's `simulate` subcommand.
#[derive(Debug, Clone)]
pub struct EngineCli {
    program: PathBuf,
}

impl EngineCli {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the engine invocation for a request.
    #[must_use]
    pub fn command(&self, request: &SimulationRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("simulate")
            .arg(request.dataset)
            .args(["-m", request.classifier])
            .args(["-q", request.query])
            .args(["-b", request.balance])
            .args(["-e", request.feature_extraction])
            .arg("--n_prior_included")
            .arg(request.prior.included.to_string())
            .arg("--n_prior_excluded")
            .arg(request.prior.excluded.to_string())
            .arg("--seed")
            .arg(request.seed.to_string())
            .arg("--state_file")
            .arg(&request.state_file);
        cmd
    }
}

impl Default for EngineCli {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl Simulator for EngineCli {
    fn simulate(&mut self, request: &SimulationRequest<'_>) -> Result<(), SweepError> {
        let mut cmd = self.command(request);
        debug!(command = ?cmd, "spawning simulation engine");

        let status = cmd.status().map_err(|source| SweepError::EngineSpawn {
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(SweepError::EngineFailed {
                label: request.label.clone(),
                status: status.to_string(),
            })
        }
    }
}
