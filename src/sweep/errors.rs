/// Errors from the sweep domain layer.
use std::path::PathBuf;

use thiserror::Error;

use super::registry::Axis;

/// Errors that can occur while planning or running a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The labelled dataset does not exist.
    #[error("Data file '{}' not found.", path.display())]
    DataNotFound {
        /// Path given on the command line.
        path: PathBuf,
    },

    /// A prior string is not two comma-separated non-negative integers.
    #[error("Invalid prior '{value}': {reason} (expected INCLUDED,EXCLUDED, e.g. 5,10)")]
    InvalidPrior {
        /// The raw prior string.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A model name the simulation engine does not know.
    #[error("Unknown {axis} '{value}'. Accepted: {}", accepted.join(", "))]
    UnknownOption {
        /// Which option list the name came from.
        axis: Axis,
        /// The rejected name.
        value: String,
        /// Every name accepted for this axis.
        accepted: Vec<String>,
    },

    /// `--preset` named a preset that does not exist.
    #[error("Unknown preset '{name}'. Valid presets: {}", available.join(", "))]
    UnknownPreset {
        /// The requested preset.
        name: String,
        /// Names of all known presets.
        available: Vec<String>,
    },

    /// A preset loaded from file holds a value that cannot be used.
    #[error("Preset '{name}' is invalid: {reason}")]
    InvalidPreset {
        /// The preset name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The presets file is not valid TOML or has the wrong shape.
    #[error("Failed to parse presets file '{}': {message}", path.display())]
    PresetFile {
        /// Path of the presets file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Filesystem or terminal I/O failed.
    #[error("I/O error: {context}")]
    Io {
        /// What was being done.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The simulation engine could not be started.
    #[error("Failed to start simulation engine '{}': {source}", program.display())]
    EngineSpawn {
        /// Engine executable.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The simulation engine ran but reported failure.
    #[error("Simulation '{label}' failed: engine exited with {status}")]
    EngineFailed {
        /// Combination label (same stem as the state file).
        label: String,
        /// Exit status description.
        status: String,
    },

    /// One or more simulations failed under `--keep-going`.
    #[error("{failed} of {total} simulations failed")]
    SimulationsFailed {
        /// Number of failed simulations.
        failed: usize,
        /// Number of simulations in the sweep.
        total: usize,
    },
}

impl SweepError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPrior { .. }
            | Self::UnknownOption { .. }
            | Self::UnknownPreset { .. }
            | Self::InvalidPreset { .. }
            | Self::PresetFile { .. } => 2,
            Self::DataNotFound { .. } => 4,
            Self::EngineSpawn { .. } | Self::EngineFailed { .. } | Self::SimulationsFailed { .. } => 5,
            Self::Io { .. } => 1,
        }
    }
}
