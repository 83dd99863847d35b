/// The sweep loop: one timed simulation per combination.
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use super::errors::SweepError;
use super::grid::{Combination, SweepConfig};
use super::simulate::{SimulationRequest, Simulator};

/// How one combination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Needs an unsupported model family; the engine was not called.
    Skipped,
    /// Engine error message (only recorded under keep-going).
    Failed(String),
}

impl Outcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// Result of one iteration of the sweep.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub combination: Combination,
    pub state_file: PathBuf,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

/// Loop behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Record simulation failures and continue instead of aborting.
    pub keep_going: bool,
}

/// Fail unless the dataset file exists.
///
/// # Errors
///
/// Returns `SweepError::DataNotFound` if nothing exists at `path`.
pub fn ensure_dataset(path: &Path) -> Result<(), SweepError> {
    if path.exists() {
        Ok(())
    } else {
        Err(SweepError::DataNotFound {
            path: path.to_owned(),
        })
    }
}

/// Create the output directory and any missing parents.
///
/// # Errors
///
/// Returns `SweepError::Io` if the directory cannot be created.
pub fn prepare_output_dir(path: &Path) -> Result<(), SweepError> {
    std::fs::create_dir_all(path).map_err(|e| {
        SweepError::io(format!("creating output directory '{}'", path.display()), e)
    })
}

/// Run every combination of `config` in order.
///
/// # Errors
///
/// Returns the first simulation error unless `opts.keep_going` is set, in
/// which case failures are recorded in the returned records instead.
pub fn run_sweep<S: Simulator + ?Sized>(
    config: &SweepConfig,
    simulator: &mut S,
    opts: RunOptions,
) -> Result<Vec<RunRecord>, SweepError> {
    let total = config.iteration_count();
    let mut records = Vec::new();

    info!("Running models");

    for (i, combination) in config.combinations().enumerate() {
        info!(
            "[{}/{total}] Classifier: '{}', feature extraction: '{}', query strategy: '{}', \
             balancing strategy: '{}', prior amounts: '{}'",
            i + 1,
            combination.classifier,
            combination.feature_extraction,
            combination.query,
            combination.balance,
            combination.prior,
        );

        let state_file = combination.state_file(&config.output_dir);
        let start = Instant::now();

        if combination.is_unsupported() {
            warn!("Skipping iteration because lstm models are not supported");
            records.push(RunRecord {
                combination,
                state_file,
                outcome: Outcome::Skipped,
                elapsed: start.elapsed(),
            });
            continue;
        }

        let request = SimulationRequest {
            dataset: &config.dataset,
            classifier: &combination.classifier,
            query: &combination.query,
            balance: &combination.balance,
            feature_extraction: &combination.feature_extraction,
            prior: combination.prior,
            seed: combination.seed,
            state_file: state_file.clone(),
            label: combination.label(),
        };

        let outcome = match simulator.simulate(&request) {
            Ok(()) => Outcome::Completed,
            Err(err) if opts.keep_going => {
                error!("{err}");
                Outcome::Failed(err.to_string())
            }
            Err(err) => return Err(err),
        };

        let elapsed = start.elapsed();
        if outcome == Outcome::Completed {
            info!("Finished in {:.3} seconds", elapsed.as_secs_f64());
        }

        records.push(RunRecord {
            combination,
            state_file,
            outcome,
            elapsed,
        });
    }

    Ok(records)
}

/// Number of failed records.
#[must_use]
pub fn failure_count(records: &[RunRecord]) -> usize {
    records
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::prior::Prior;
    use crate::sweep::simulate::testing::FakeSimulator;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|&n| n.to_owned()).collect()
    }

    fn config(classifiers: &[&str]) -> SweepConfig {
        SweepConfig {
            dataset: PathBuf::from("data.csv"),
            output_dir: PathBuf::from("out"),
            classifiers: owned(classifiers),
            query: owned(&["max"]),
            balance: owned(&["simple"]),
            feature_extraction: owned(&["tfidf"]),
            priors: vec![Prior::new(1, 1), Prior::new(5, 5)],
            n_instances: 1,
            seed: 0,
        }
    }

    #[test]
    fn test_runs_every_combination_in_order() {
        let mut sim = FakeSimulator::default();
        let records = run_sweep(&config(&["nb", "rf"]), &mut sim, RunOptions::default()).unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.outcome == Outcome::Completed));
        let labels: Vec<&str> = sim.calls.iter().map(|(l, _, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "nb-max-simple-tfidf-1,1",
                "nb-max-simple-tfidf-5,5",
                "rf-max-simple-tfidf-1,1",
                "rf-max-simple-tfidf-5,5",
            ]
        );
        let seeds: Vec<u64> = sim.calls.iter().map(|(_, s, _)| *s).collect();
        assert_eq!(seeds, vec![1, 2, 3, 4]);
        assert_eq!(sim.calls[0].2, PathBuf::from("out/nb-max-simple-tfidf-1,1.h5"));
    }

    #[test]
    fn test_lstm_combinations_never_reach_engine() {
        let mut sim = FakeSimulator::default();
        let records =
            run_sweep(&config(&["lstm-base", "nb"]), &mut sim, RunOptions::default()).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].outcome, Outcome::Skipped);
        assert_eq!(records[1].outcome, Outcome::Skipped);
        assert_eq!(sim.calls.len(), 2);
        assert!(sim.calls.iter().all(|(l, _, _)| l.starts_with("nb-")));
        // Skipped iterations still consume a seed.
        assert_eq!(sim.calls[0].1, 3);
    }

    #[test]
    fn test_failure_aborts_by_default() {
        let mut sim = FakeSimulator {
            fail_labels: vec!["nb-max-simple-tfidf-5,5".to_owned()],
            ..FakeSimulator::default()
        };
        let err = run_sweep(&config(&["nb", "rf"]), &mut sim, RunOptions::default()).unwrap_err();
        assert!(matches!(err, SweepError::EngineFailed { .. }));
        assert_eq!(sim.calls.len(), 2);
    }

    #[test]
    fn test_huge_sweep_runs_lazily_until_failure() {
        let cfg = SweepConfig {
            priors: vec![Prior::new(1, 1)],
            n_instances: u32::MAX,
            ..config(&["nb"])
        };
        let mut sim = FakeSimulator {
            fail_labels: vec!["nb-max-simple-tfidf-1,1-3".to_owned()],
            ..FakeSimulator::default()
        };
        let err = run_sweep(&cfg, &mut sim, RunOptions::default()).unwrap_err();
        assert!(matches!(err, SweepError::EngineFailed { .. }));
        assert_eq!(sim.calls.len(), 3);
        assert_eq!(sim.calls[2].1, 3);
    }

    #[test]
    fn test_keep_going_records_failures() {
        let mut sim = FakeSimulator {
            fail_labels: vec!["nb-max-simple-tfidf-5,5".to_owned()],
            ..FakeSimulator::default()
        };
        let records = run_sweep(
            &config(&["nb", "rf"]),
            &mut sim,
            RunOptions { keep_going: true },
        )
        .unwrap();
        assert_eq!(sim.calls.len(), 4);
        assert_eq!(failure_count(&records), 1);
        assert!(matches!(&records[1].outcome, Outcome::Failed(msg) if msg.contains("exit status: 1")));
    }

    #[test]
    fn test_ensure_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("labelled.csv");
        assert!(matches!(
            ensure_dataset(&data),
            Err(SweepError::DataNotFound { .. })
        ));
        std::fs::write(&data, "title,abstract,included\n").unwrap();
        assert!(ensure_dataset(&data).is_ok());
    }

    #[test]
    fn test_prepare_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        prepare_output_dir(&out).unwrap();
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }
}
