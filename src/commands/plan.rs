/// `--dry-run`: list every planned simulation without running anything.
use tracing::info;

use crate::cli::OutputCtx;
use crate::cli::output::write_plan;
use crate::sweep::SweepConfig;
use crate::types::PlannedRunOutput;

/// Print the sweep plan, streaming one run at a time.
pub fn run(config: &SweepConfig, ctx: &OutputCtx) {
    let total = config.iteration_count();
    info!(
        "Model testing would take {total} iterations ({} skipped as unsupported)",
        config.skipped_count()
    );

    let planned = config
        .combinations()
        .enumerate()
        .map(|(i, c)| PlannedRunOutput::new(i + 1, &c, &c.state_file(&config.output_dir)));
    write_plan(planned, total, ctx);
}
