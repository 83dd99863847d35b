/// Shared serializable output types for the plan and run summaries.
///
/// These types are what gets written to stdout — either as JSON or rendered
/// as a table. They are decoupled from the internal `Combination` /
/// `RunRecord` types.
use serde::{Deserialize, Serialize};

use crate::sweep::{Combination, Outcome, RunRecord, SweepError};

/// One planned simulation (`--dry-run`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRunOutput {
    /// 1-based position in the sweep.
    pub index: usize,
    pub classifier: String,
    pub query: String,
    pub balance: String,
    pub feature_extraction: String,
    /// Prior amounts as `INCLUDED,EXCLUDED`.
    pub prior: String,
    /// Repetition index when `n_instances > 1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<u32>,
    pub seed: u64,
    /// State file the engine will write.
    pub state_file: String,
    /// Whether the run will be skipped (unsupported model family).
    pub skip: bool,
}

impl PlannedRunOutput {
    #[must_use]
    pub fn new(index: usize, combination: &Combination, state_file: &std::path::Path) -> Self {
        Self {
            index,
            classifier: combination.classifier.clone(),
            query: combination.query.clone(),
            balance: combination.balance.clone(),
            feature_extraction: combination.feature_extraction.clone(),
            prior: combination.prior.to_string(),
            instance: combination.instance,
            seed: combination.seed,
            state_file: state_file.display().to_string(),
            skip: combination.is_unsupported(),
        }
    }
}

/// One finished iteration of the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecordOutput {
    /// 1-based position in the sweep.
    pub index: usize,
    /// Combination label (state file stem).
    pub label: String,
    pub seed: u64,
    /// "completed", "skipped" or "failed".
    pub status: String,
    /// Wall-clock seconds spent on the simulation.
    pub elapsed_secs: f64,
    pub state_file: String,
    /// Engine error message for failed runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecordOutput {
    #[must_use]
    pub fn new(index: usize, record: &RunRecord) -> Self {
        let error = match &record.outcome {
            Outcome::Failed(msg) => Some(msg.clone()),
            Outcome::Completed | Outcome::Skipped => None,
        };
        Self {
            index,
            label: record.combination.label(),
            seed: record.combination.seed,
            status: record.outcome.as_str().to_owned(),
            elapsed_secs: record.elapsed.as_secs_f64(),
            state_file: record.state_file.display().to_string(),
            error,
        }
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Accepted values, for unknown option or preset names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

impl ErrorOutput {
    /// Construct from a `SweepError`.
    #[must_use]
    pub fn from_sweep_error(err: &SweepError) -> Self {
        let (code, candidates) = match err {
            SweepError::DataNotFound { .. } => ("data_not_found", None),
            SweepError::InvalidPrior { .. } => ("invalid_prior", None),
            SweepError::UnknownOption { accepted, .. } => ("unknown_option", Some(accepted.clone())),
            SweepError::UnknownPreset { available, .. } => {
                ("unknown_preset", Some(available.clone()))
            }
            SweepError::InvalidPreset { .. } => ("invalid_preset", None),
            SweepError::PresetFile { .. } => ("preset_file", None),
            SweepError::Io { .. } => ("io_error", None),
            SweepError::EngineSpawn { .. } => ("engine_spawn", None),
            SweepError::EngineFailed { .. } => ("simulation_failed", None),
            SweepError::SimulationsFailed { .. } => ("simulations_failed", None),
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: err.to_string(),
                candidates,
            },
        }
    }
}
