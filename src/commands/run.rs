/// Run the sweep: check inputs, confirm, then simulate every combination.
use std::io::{self, BufRead, Write};

use tracing::info;

use crate::cli::output::{PhaseTimer, write_summary};
use crate::cli::{Cli, OutputCtx};
use crate::sweep::runner::{ensure_dataset, failure_count, prepare_output_dir};
use crate::sweep::{
    EngineCli, RunOptions, RunRecord, Simulator, SweepConfig, SweepError, confirm, run_sweep,
};
use crate::types::RunRecordOutput;

/// Run every simulation in `config` through the configured engine.
///
/// The confirmation prompt goes to stderr so stdout carries only the summary.
///
/// # Errors
///
/// Returns `SweepError::DataNotFound` before prompting if the dataset is
/// missing, `SweepError::Io` if the prompt or output directory fails, the
/// first simulation error, or `SweepError::SimulationsFailed` when
/// `--keep-going` recorded failures.
pub fn run(cli: &Cli, config: &SweepConfig, ctx: &OutputCtx) -> Result<(), SweepError> {
    let mut engine = EngineCli::new(cli.engine.clone());
    let opts = RunOptions {
        keep_going: cli.keep_going,
    };
    let records = {
        let _t = PhaseTimer::start("run_sweep");
        sweep(
            config,
            opts,
            cli.yes,
            &mut io::stdin().lock(),
            &mut io::stderr(),
            &mut engine,
        )?
    };
    let Some(records) = records else {
        return Ok(());
    };

    let output: Vec<RunRecordOutput> = records
        .iter()
        .enumerate()
        .map(|(i, r)| RunRecordOutput::new(i + 1, r))
        .collect();
    write_summary(&output, ctx);

    let failed = failure_count(&records);
    info!("Sweep finished: {} runs, {failed} failed", records.len());
    if failed > 0 {
        return Err(SweepError::SimulationsFailed {
            failed,
            total: records.len(),
        });
    }
    Ok(())
}

/// Check the dataset, ask for confirmation unless `assume_yes`, prepare the
/// output directory and run the sweep.
///
/// Returns `Ok(None)` when the user declines; nothing is created or run.
///
/// # Errors
///
/// Same as [`run`], minus the keep-going summary error.
pub fn sweep<R: BufRead, W: Write>(
    config: &SweepConfig,
    opts: RunOptions,
    assume_yes: bool,
    input: &mut R,
    prompt: &mut W,
    simulator: &mut dyn Simulator,
) -> Result<Option<Vec<RunRecord>>, SweepError> {
    ensure_dataset(&config.dataset)?;

    if !assume_yes {
        let accepted = confirm(input, prompt, config.iteration_count())
            .map_err(|e| SweepError::io("reading confirmation", e))?;
        if !accepted {
            writeln!(prompt, "Exiting.").map_err(|e| SweepError::io("writing prompt", e))?;
            return Ok(None);
        }
    }

    prepare_output_dir(&config.output_dir)?;
    run_sweep(config, simulator, opts).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::sweep::Prior;
    use crate::sweep::simulate::testing::FakeSimulator;

    fn config(dir: &Path) -> SweepConfig {
        SweepConfig {
            dataset: dir.join("labelled.csv"),
            output_dir: dir.join("results"),
            classifiers: vec!["nb".to_owned(), "lstm-base".to_owned()],
            query: vec!["max".to_owned()],
            balance: vec!["simple".to_owned()],
            feature_extraction: vec!["tfidf".to_owned()],
            priors: vec![Prior::new(1, 1), Prior::new(5, 5)],
            n_instances: 1,
            seed: 0,
        }
    }

    fn with_dataset(dir: &Path) -> SweepConfig {
        let cfg = config(dir);
        std::fs::write(&cfg.dataset, "title,abstract,authors,included\n").unwrap();
        cfg
    }

    #[test]
    fn test_declining_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = with_dataset(dir.path());
        let mut sim = FakeSimulator::default();
        let mut input: &[u8] = b"n\n";
        let mut prompt = Vec::new();

        let records = sweep(&cfg, RunOptions::default(), false, &mut input, &mut prompt, &mut sim)
            .unwrap();

        assert!(records.is_none());
        assert!(sim.calls.is_empty());
        assert!(!cfg.output_dir.exists());
        let prompt = String::from_utf8(prompt).unwrap();
        assert!(prompt.contains("Model testing will take 4 iterations."));
        assert!(prompt.ends_with("Exiting.\n"));
    }

    #[test]
    fn test_missing_dataset_fails_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let mut sim = FakeSimulator::default();
        let mut input: &[u8] = b"y\n";
        let mut prompt = Vec::new();

        let err = sweep(&cfg, RunOptions::default(), false, &mut input, &mut prompt, &mut sim)
            .unwrap_err();

        assert!(matches!(err, SweepError::DataNotFound { .. }));
        assert_eq!(input, b"y\n");
        assert!(prompt.is_empty());
        assert!(sim.calls.is_empty());
        assert!(!cfg.output_dir.exists());
    }

    #[test]
    fn test_accepting_creates_output_and_runs() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = with_dataset(dir.path());
        let mut sim = FakeSimulator::default();
        let mut input: &[u8] = b"\n";
        let mut prompt = Vec::new();

        let records = sweep(&cfg, RunOptions::default(), false, &mut input, &mut prompt, &mut sim)
            .unwrap()
            .unwrap();

        assert_eq!(records.len(), 4);
        // The two lstm combinations are skipped.
        assert_eq!(sim.calls.len(), 2);
        assert!(cfg.output_dir.is_dir());
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = with_dataset(dir.path());
        let mut sim = FakeSimulator::default();
        let mut input: &[u8] = b"n\n";
        let mut prompt = Vec::new();

        let records = sweep(&cfg, RunOptions::default(), true, &mut input, &mut prompt, &mut sim)
            .unwrap();

        assert_eq!(records.map(|r| r.len()), Some(4));
        assert!(prompt.is_empty());
        assert_eq!(input, b"n\n");
    }
}
