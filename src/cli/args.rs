/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::sweep::Prior;
use crate::sweep::simulate::DEFAULT_ENGINE;

/// alsweep — run active-learning simulations for every combination of model settings.
#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "alsweep",
    about = "Test many different active-learning models on one dataset to see which perform best",
    version
)]
pub struct Cli {
    /// Path to a labelled CSV of abstracts with "Title", "Abstract",
    /// "Authors" and "Included" columns.
    pub filename: PathBuf,

    /// Directory to write the results into. Created if necessary.
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Classifiers to test. Accepted: logistic, lstm-base, lstm-pool, nb,
    /// nn-2-layer, rf, svm [default: all]
    #[arg(short = 'c', long, value_name = "NAME", num_args = 1..)]
    pub classifiers: Vec<String>,

    /// Query strategies to test. Accepted: cluster, max, random, uncertainty
    /// [default: all]
    #[arg(short = 'q', long, value_name = "NAME", num_args = 1..)]
    pub query: Vec<String>,

    /// Balancing strategies to test. Accepted: double, simple, triple,
    /// undersample [default: all]
    #[arg(short = 'b', long, value_name = "NAME", num_args = 1..)]
    pub balance: Vec<String>,

    /// Feature extraction models to test. Accepted: doc2vec, embedding-idf,
    /// embedding-lstm, sbert, tfidf [default: all]
    #[arg(
        short = 'f',
        long = "feature_extraction",
        visible_alias = "feature-extraction",
        value_name = "NAME",
        num_args = 1..
    )]
    pub feature_extraction: Vec<String>,

    /// Numbers of prelabelled papers as INCLUDED,EXCLUDED pairs,
    /// e.g. --prior 1,1 5,5 5,10 [default: 1,1 5,5 5,10]
    #[arg(short = 'p', long, value_name = "INCLUDED,EXCLUDED", num_args = 1..)]
    pub prior: Vec<Prior>,

    /// Number of runs per combination.
    #[arg(
        short = 'n',
        long = "n_instances",
        visible_alias = "n-instances",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub n_instances: u32,

    /// Named preset replacing the option lists above. Built-in: default.
    #[arg(short = 'P', long, value_name = "NAME", default_value = "none")]
    pub preset: String,

    /// TOML file with additional presets, one table per preset name.
    #[arg(long, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Random seed for reproducibility; incremented before every run.
    #[arg(short = 's', long, value_name = "N", default_value_t = 0)]
    pub seed: u64,

    /// Simulation engine executable.
    #[arg(long, value_name = "PATH", env = "ALSWEEP_ENGINE", default_value = DEFAULT_ENGINE)]
    pub engine: PathBuf,

    /// Do not ask for confirmation before running.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the planned runs and exit without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Record failed simulations and continue with the rest.
    #[arg(long)]
    pub keep_going: bool,

    /// Format of the plan and the run summary. Auto-detects: table when TTY, json when piped.
    #[arg(long, value_name = "FORMAT", default_value = "auto")]
    pub format: OutputFormat,

    /// Shorthand for --format json.
    #[arg(long, conflicts_with = "format")]
    pub json: bool,

    /// Omit table headers.
    #[arg(long)]
    pub no_header: bool,

    /// Enable debug logging and phase timings on stderr.
    #[arg(long)]
    pub debug: bool,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one object per run).
    Ndjson,
    /// Aligned table with headers (human-readable).
    Table,
}
