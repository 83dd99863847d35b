/// Output formatting: JSON and table modes for the plan and run summary. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::{Serialize, Serializer as _};

use super::args::OutputFormat;
use crate::types::{ErrorOutput, PlannedRunOutput, RunRecordOutput};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }
}

// --- Plan ---

/// Rows rendered in the plan table; JSON formats always carry the full plan.
const PLAN_TABLE_MAX_ROWS: usize = 10_000;

/// Write the planned runs to stdout as they are produced.
///
/// `total` is the number of runs `runs` will yield.
pub fn write_plan<I>(runs: I, total: usize, ctx: &OutputCtx)
where
    I: Iterator<Item = PlannedRunOutput>,
{
    match ctx.format {
        OutputFormat::Json => print_json_seq(runs, true),
        OutputFormat::Compact => print_json_seq(runs, false),
        OutputFormat::Ndjson => {
            for run in runs {
                print_compact_json(&run);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let rows: Vec<PlannedRunOutput> = runs.take(PLAN_TABLE_MAX_ROWS).collect();
            println!("{}", plan_table(&rows, ctx.no_header));
            if total > rows.len() {
                println!(
                    "... {} more runs not shown (use --json for the full plan)",
                    total - rows.len()
                );
            }
        }
    }
}

fn plan_table(runs: &[PlannedRunOutput], no_header: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !no_header {
        table.set_header([
            "#",
            "CLASSIFIER",
            "QUERY",
            "BALANCE",
            "FEATURES",
            "PRIOR",
            "SEED",
            "STATE FILE",
            "SKIP",
        ]);
    }
    for r in runs {
        table.add_row([
            r.index.to_string().as_str(),
            &r.classifier,
            &r.query,
            &r.balance,
            &r.feature_extraction,
            &r.prior,
            &r.seed.to_string(),
            &r.state_file,
            if r.skip { "lstm" } else { "" },
        ]);
    }
    table
}

// --- Run summary ---

/// Write the per-run summary to stdout.
pub fn write_summary(records: &[RunRecordOutput], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Compact => print_compact_json(records),
        OutputFormat::Ndjson => print_ndjson(records),
        OutputFormat::Table | OutputFormat::Auto => {
            println!("{}", summary_table(records, ctx.no_header));
        }
    }
}

fn summary_table(records: &[RunRecordOutput], no_header: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !no_header {
        table.set_header(["#", "RUN", "SEED", "STATUS", "SECONDS", "STATE FILE"]);
    }
    for r in records {
        let status = match &r.error {
            Some(msg) => format!("{}: {msg}", r.status),
            None => r.status.clone(),
        };
        table.add_row([
            r.index.to_string().as_str(),
            &r.label,
            &r.seed.to_string(),
            &status,
            &format!("{:.1}", r.elapsed_secs),
            &r.state_file,
        ]);
    }
    table
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Phase timer ---

/// A RAII timer that logs elapsed milliseconds at debug level on drop.
///
/// Hold it in a named binding (`let _t = ...`) for the length of the phase.
pub struct PhaseTimer {
    label: &'static str,
    start: std::time::Instant,
}

impl PhaseTimer {
    #[must_use]
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(phase = self.label, "{ms:.2}ms");
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_json_seq<T: Serialize>(values: impl Iterator<Item = T>, pretty: bool) {
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    if let Err(e) = write_json_seq(&mut out, values, pretty) {
        eprintln!("JSON serialization error: {e}");
        return;
    }
    let _ = writeln!(out);
    let _ = out.flush();
}

/// Serialize an iterator as one JSON array without collecting it first.
fn write_json_seq<W, T>(
    out: W,
    values: impl Iterator<Item = T>,
    pretty: bool,
) -> serde_json::Result<()>
where
    W: Write,
    T: Serialize,
{
    if pretty {
        serde_json::Serializer::pretty(out).collect_seq(values)
    } else {
        serde_json::Serializer::new(out).collect_seq(values)
    }
}

fn print_ndjson<T: Serialize>(values: &[T]) {
    for v in values {
        match serde_json::to_string(v) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("JSON serialization error: {e}"),
        }
    }
}
