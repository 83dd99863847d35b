/// Command dispatch: resolves the sweep configuration and routes to plan or run.
pub mod plan;
pub mod run;

use tracing::debug;

use crate::cli::output::PhaseTimer;
use crate::cli::{Cli, OutputCtx};
use crate::sweep::prior::DEFAULT_PRIORS;
use crate::sweep::registry::Axis;
use crate::sweep::{PresetTable, Prior, SweepConfig, SweepError};

/// Dispatch the parsed CLI to `plan` (`--dry-run`) or `run`.
///
/// # Errors
///
/// Returns `SweepError` on invalid configuration or any run failure.
pub fn dispatch(cli: &Cli, ctx: &OutputCtx) -> Result<(), SweepError> {
    let config = {
        let _t = PhaseTimer::start("resolve_config");
        resolve_config(cli)?
    };
    debug!(?config, "resolved sweep configuration");

    if cli.dry_run {
        plan::run(&config, ctx);
        Ok(())
    } else {
        run::run(cli, &config, ctx)
    }
}

/// Layer the configuration: registry defaults, then CLI values, then the preset.
///
/// # Errors
///
/// Returns `SweepError` for unreadable or invalid presets, unknown preset
/// names, and model names the engine does not accept.
pub fn resolve_config(cli: &Cli) -> Result<SweepConfig, SweepError> {
    let or_all = |given: &[String], axis: Axis| {
        if given.is_empty() {
            axis.defaults()
        } else {
            given.to_vec()
        }
    };
    let priors: Vec<Prior> = if cli.prior.is_empty() {
        DEFAULT_PRIORS.to_vec()
    } else {
        cli.prior.clone()
    };

    let mut config = SweepConfig {
        dataset: cli.filename.clone(),
        output_dir: cli.output.clone(),
        classifiers: or_all(&cli.classifiers, Axis::Classifier),
        query: or_all(&cli.query, Axis::Query),
        balance: or_all(&cli.balance, Axis::Balance),
        feature_extraction: or_all(&cli.feature_extraction, Axis::FeatureExtraction),
        priors,
        n_instances: cli.n_instances,
        seed: cli.seed,
    };

    let mut presets = PresetTable::builtin();
    if let Some(path) = &cli.presets {
        presets.load_file(path)?;
    }
    if let Some(preset) = presets.get(&cli.preset)? {
        debug!(preset = %cli.preset, "applying preset");
        config.apply_preset(preset);
    }

    config.dedup();
    config.validate()?;
    Ok(config)
}
