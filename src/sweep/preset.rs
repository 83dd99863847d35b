/// Named bundles of option values that replace the command-line values.
///
/// The built-in table can be extended from a TOML file with one table per
/// preset:
///
/// ```toml
/// [quick]
/// classifiers = ["nb", "logistic"]
/// feature_extraction = ["tfidf"]
/// prior = ["1,1"]
/// ```
///
/// Fields left out of a preset keep whatever the command line gave.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::errors::SweepError;
use super::prior::Prior;

/// Preset name that applies nothing.
pub const NO_PRESET: &str = "none";

/// One named bundle of option values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub classifiers: Option<Vec<String>>,
    pub query: Option<Vec<String>>,
    pub balance: Option<Vec<String>>,
    pub feature_extraction: Option<Vec<String>>,
    pub prior: Option<Vec<Prior>>,
    pub n_instances: Option<u32>,
}

impl Preset {
    /// The `default` preset: the commonly compared non-LSTM models.
    #[must_use]
    pub fn default_bundle() -> Self {
        let owned = |names: &[&str]| -> Option<Vec<String>> {
            Some(names.iter().map(|&n| n.to_owned()).collect())
        };
        Self {
            classifiers: owned(&["logistic", "nb", "nn-2-layer", "rf", "svm"]),
            query: owned(&["max", "cluster"]),
            balance: owned(&["simple"]),
            feature_extraction: owned(&["tfidf", "sbert", "doc2vec"]),
            prior: Some(vec![Prior::new(1, 1), Prior::new(5, 5), Prior::new(10, 10)]),
            n_instances: Some(1),
        }
    }

    fn check(&self, name: &str) -> Result<(), SweepError> {
        let invalid = |reason: &str| SweepError::InvalidPreset {
            name: name.to_owned(),
            reason: reason.to_owned(),
        };
        if self.n_instances == Some(0) {
            return Err(invalid("n_instances must be at least 1"));
        }
        let lists = [
            ("classifiers", self.classifiers.as_ref().map(Vec::len)),
            ("query", self.query.as_ref().map(Vec::len)),
            ("balance", self.balance.as_ref().map(Vec::len)),
            ("feature_extraction", self.feature_extraction.as_ref().map(Vec::len)),
            ("prior", self.prior.as_ref().map(Vec::len)),
        ];
        if let Some((field, _)) = lists.iter().find(|(_, len)| *len == Some(0)) {
            return Err(invalid(&format!("'{field}' must not be empty")));
        }
        Ok(())
    }
}

/// All presets known to this run, keyed by name.
#[derive(Debug, Clone)]
pub struct PresetTable {
    presets: BTreeMap<String, Preset>,
}

impl PresetTable {
    /// The built-in presets.
    #[must_use]
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert("default".to_owned(), Preset::default_bundle());
        Self { presets }
    }

    /// Add presets from a TOML file, replacing built-ins with the same name.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::Io` if the file cannot be read,
    /// `SweepError::PresetFile` if it does not parse, and
    /// `SweepError::InvalidPreset` if a preset holds an unusable value.
    pub fn load_file(&mut self, path: &Path) -> Result<(), SweepError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SweepError::io(format!("reading presets file '{}'", path.display()), e)
        })?;
        self.merge_toml(&content).map_err(|err| match err {
            SweepError::PresetFile { message, .. } => SweepError::PresetFile {
                path: path.to_owned(),
                message,
            },
            other => other,
        })
    }

    /// Parse presets from TOML text and merge them into the table.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::PresetFile` (with an empty path) on parse failure
    /// and `SweepError::InvalidPreset` if a preset holds an unusable value.
    pub fn merge_toml(&mut self, content: &str) -> Result<(), SweepError> {
        let parsed: BTreeMap<String, Preset> =
            toml::from_str(content).map_err(|e| SweepError::PresetFile {
                path: PathBuf::new(),
                message: e.to_string(),
            })?;
        for (name, preset) in &parsed {
            if name == NO_PRESET {
                return Err(SweepError::InvalidPreset {
                    name: name.clone(),
                    reason: format!("'{NO_PRESET}' is reserved"),
                });
            }
            preset.check(name)?;
        }
        self.presets.extend(parsed);
        Ok(())
    }

    /// Look up a preset. `none` yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::UnknownPreset` for any other unknown name.
    pub fn get(&self, name: &str) -> Result<Option<&Preset>, SweepError> {
        if name == NO_PRESET {
            return Ok(None);
        }
        self.presets
            .get(name)
            .map(Some)
            .ok_or_else(|| SweepError::UnknownPreset {
                name: name.to_owned(),
                available: self.names(),
            })
    }

    /// Preset names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }
}
