/// Model names accepted by the simulation engine, per configuration axis.
///
/// These lists are the "all available" defaults used when an option list is
/// not given on the command line, and the whitelist every user-supplied name
/// is checked against before anything runs.
use std::fmt;

use super::errors::SweepError;

/// Classifier names.
pub const CLASSIFIERS: &[&str] = &[
    "logistic",
    "lstm-base",
    "lstm-pool",
    "nb",
    "nn-2-layer",
    "rf",
    "svm",
];

/// Query strategy names.
pub const QUERY_STRATEGIES: &[&str] = &["cluster", "max", "random", "uncertainty"];

/// Balance strategy names.
pub const BALANCE_STRATEGIES: &[&str] = &["double", "simple", "triple", "undersample"];

/// Feature extraction names.
pub const FEATURE_EXTRACTION: &[&str] = &[
    "doc2vec",
    "embedding-idf",
    "embedding-lstm",
    "sbert",
    "tfidf",
];

/// Marker for model families the engine cannot run without extra downloads.
const UNSUPPORTED_MARKER: &str = "lstm";

/// One of the four name-valued configuration axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Classifier,
    Query,
    Balance,
    FeatureExtraction,
}

impl Axis {
    /// Registered names for this axis.
    #[must_use]
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Classifier => CLASSIFIERS,
            Self::Query => QUERY_STRATEGIES,
            Self::Balance => BALANCE_STRATEGIES,
            Self::FeatureExtraction => FEATURE_EXTRACTION,
        }
    }

    /// Registered names as owned strings, for use as a default option list.
    #[must_use]
    pub fn defaults(self) -> Vec<String> {
        self.names().iter().map(|&n| n.to_owned()).collect()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classifier => "classifier",
            Self::Query => "query strategy",
            Self::Balance => "balance strategy",
            Self::FeatureExtraction => "feature extraction",
        })
    }
}

/// Check that every name is registered for `axis`.
///
/// # Errors
///
/// Returns `SweepError::UnknownOption` for the first unregistered name.
pub fn validate(axis: Axis, names: &[String]) -> Result<(), SweepError> {
    let known = axis.names();
    match names.iter().find(|n| !known.contains(&n.as_str())) {
        Some(bad) => Err(SweepError::UnknownOption {
            axis,
            value: bad.clone(),
            accepted: axis.defaults(),
        }),
        None => Ok(()),
    }
}

/// Whether a classifier/feature-extraction pair needs an unsupported model family.
#[must_use]
pub fn is_unsupported(classifier: &str, feature_extraction: &str) -> bool {
    classifier.contains(UNSUPPORTED_MARKER) || feature_extraction.contains(UNSUPPORTED_MARKER)
}
