/// The sweep grid: resolved option lists and the Cartesian product over them.
use std::path::{Path, PathBuf};

use super::errors::SweepError;
use super::preset::Preset;
use super::prior::Prior;
use super::registry::{self, Axis};

/// Extension of the state file the engine writes for each simulation.
const STATE_FILE_EXT: &str = "h5";

/// Fully resolved sweep configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Labelled dataset handed to every simulation.
    pub dataset: PathBuf,
    /// Directory receiving one state file per simulation.
    pub output_dir: PathBuf,
    pub classifiers: Vec<String>,
    pub query: Vec<String>,
    pub balance: Vec<String>,
    pub feature_extraction: Vec<String>,
    pub priors: Vec<Prior>,
    /// Repetitions of every combination.
    pub n_instances: u32,
    /// Base seed; each iteration uses the next value.
    pub seed: u64,
}

impl SweepConfig {
    /// Replace every option the preset sets.
    pub fn apply_preset(&mut self, preset: &Preset) {
        if let Some(v) = &preset.classifiers {
            self.classifiers.clone_from(v);
        }
        if let Some(v) = &preset.query {
            self.query.clone_from(v);
        }
        if let Some(v) = &preset.balance {
            self.balance.clone_from(v);
        }
        if let Some(v) = &preset.feature_extraction {
            self.feature_extraction.clone_from(v);
        }
        if let Some(v) = &preset.prior {
            self.priors.clone_from(v);
        }
        if let Some(n) = preset.n_instances {
            self.n_instances = n;
        }
    }

    /// Check every model name against the engine's registry.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::UnknownOption` for the first unregistered name.
    pub fn validate(&self) -> Result<(), SweepError> {
        registry::validate(Axis::Classifier, &self.classifiers)?;
        registry::validate(Axis::Query, &self.query)?;
        registry::validate(Axis::Balance, &self.balance)?;
        registry::validate(Axis::FeatureExtraction, &self.feature_extraction)?;
        Ok(())
    }

    /// Drop repeated names and priors, keeping first occurrences in order.
    ///
    /// Repeats would map to the same state file and overwrite each other.
    pub fn dedup(&mut self) {
        dedup_in_order(&mut self.classifiers);
        dedup_in_order(&mut self.query);
        dedup_in_order(&mut self.balance);
        dedup_in_order(&mut self.feature_extraction);
        dedup_in_order(&mut self.priors);
    }

    /// Number of simulations the sweep will run. Saturates instead of overflowing.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        self.per_classifier_feature()
            .saturating_mul(self.classifiers.len())
            .saturating_mul(self.feature_extraction.len())
    }

    /// Number of iterations that will be skipped as unsupported.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        let pairs = self
            .classifiers
            .iter()
            .flat_map(|c| {
                self.feature_extraction
                    .iter()
                    .filter(move |f| registry::is_unsupported(c, f))
            })
            .count();
        self.per_classifier_feature().saturating_mul(pairs)
    }

    fn per_classifier_feature(&self) -> usize {
        self.query
            .len()
            .saturating_mul(self.balance.len())
            .saturating_mul(self.priors.len())
            .saturating_mul(self.n_instances as usize)
    }

    /// Every simulation in run order, produced on demand.
    ///
    /// The classifier varies slowest and the prior fastest; repeated
    /// instances of one combination are adjacent. Seeds count up from
    /// `seed + 1`.
    pub fn combinations(&self) -> impl Iterator<Item = Combination> {
        let repeat = self.n_instances > 1;
        let n_instances = self.n_instances;

        self.classifiers
            .iter()
            .flat_map(move |classifier| {
                self.query.iter().flat_map(move |query| {
                    self.balance.iter().flat_map(move |balance| {
                        self.feature_extraction.iter().flat_map(move |feature_extraction| {
                            self.priors.iter().flat_map(move |&prior| {
                                (1..=n_instances).map(move |i| {
                                    (classifier, query, balance, feature_extraction, prior, i)
                                })
                            })
                        })
                    })
                })
            })
            .scan(self.seed, move |seed, (c, q, b, f, prior, instance)| {
                *seed = seed.wrapping_add(1);
                Some(Combination {
                    classifier: c.clone(),
                    query: q.clone(),
                    balance: b.clone(),
                    feature_extraction: f.clone(),
                    prior,
                    instance: repeat.then_some(instance),
                    seed: *seed,
                })
            })
    }
}

fn dedup_in_order<T: PartialEq>(items: &mut Vec<T>) {
    let mut i = 0;
    while i < items.len() {
        if items[..i].contains(&items[i]) {
            items.remove(i);
        } else {
            i += 1;
        }
    }
}

/// One simulation in the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub classifier: String,
    pub query: String,
    pub balance: String,
    pub feature_extraction: String,
    pub prior: Prior,
    /// 1-based repetition index; `None` when each combination runs once.
    pub instance: Option<u32>,
    /// Seed handed to the engine.
    pub seed: u64,
}

impl Combination {
    /// Option values joined with `-`, used as the state file stem.
    #[must_use]
    pub fn label(&self) -> String {
        let base = format!(
            "{}-{}-{}-{}-{}",
            self.classifier, self.query, self.balance, self.feature_extraction, self.prior
        );
        match self.instance {
            Some(i) => format!("{base}-{i}"),
            None => base,
        }
    }

    /// Where the engine writes this simulation's state.
    #[must_use]
    pub fn state_file(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.{STATE_FILE_EXT}", self.label()))
    }

    /// Whether the combination needs a model family the engine cannot run.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        registry::is_unsupported(&self.classifier, &self.feature_extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|&n| n.to_owned()).collect()
    }

    fn config() -> SweepConfig {
        SweepConfig {
            dataset: PathBuf::from("data.csv"),
            output_dir: PathBuf::from("out"),
            classifiers: owned(&["nb", "svm"]),
            query: owned(&["max"]),
            balance: owned(&["simple", "double"]),
            feature_extraction: owned(&["tfidf"]),
            priors: vec![Prior::new(1, 1), Prior::new(5, 10)],
            n_instances: 1,
            seed: 0,
        }
    }

    #[test]
    fn test_iteration_count_is_product() {
        let mut cfg = config();
        assert_eq!(cfg.iteration_count(), 2 * 2 * 2);
        cfg.n_instances = 3;
        assert_eq!(cfg.iteration_count(), 2 * 2 * 2 * 3);
        assert_eq!(cfg.combinations().count(), cfg.iteration_count());
    }

    #[test]
    fn test_empty_axis_means_no_iterations() {
        let mut cfg = config();
        cfg.query.clear();
        assert_eq!(cfg.iteration_count(), 0);
        assert_eq!(cfg.combinations().next(), None);
    }

    #[test]
    fn test_product_order_and_seeds() {
        let cfg = SweepConfig {
            seed: 10,
            ..config()
        };
        let combos: Vec<Combination> = cfg.combinations().collect();
        let labels: Vec<String> = combos.iter().map(Combination::label).collect();
        assert_eq!(
            labels,
            vec![
                "nb-max-simple-tfidf-1,1",
                "nb-max-simple-tfidf-5,10",
                "nb-max-double-tfidf-1,1",
                "nb-max-double-tfidf-5,10",
                "svm-max-simple-tfidf-1,1",
                "svm-max-simple-tfidf-5,10",
                "svm-max-double-tfidf-1,1",
                "svm-max-double-tfidf-5,10",
            ]
        );
        let seeds: Vec<u64> = combos.iter().map(|c| c.seed).collect();
        assert_eq!(seeds, (11..=18).collect::<Vec<u64>>());
    }

    #[test]
    fn test_instances_are_adjacent_and_numbered() {
        let cfg = SweepConfig {
            classifiers: owned(&["nb"]),
            balance: owned(&["simple"]),
            priors: vec![Prior::new(1, 1)],
            n_instances: 2,
            ..config()
        };
        let combos: Vec<Combination> = cfg.combinations().collect();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].label(), "nb-max-simple-tfidf-1,1-1");
        assert_eq!(combos[1].label(), "nb-max-simple-tfidf-1,1-2");
        assert_eq!(combos[0].seed, 1);
        assert_eq!(combos[1].seed, 2);
    }

    #[test]
    fn test_state_file_path() {
        let combo = config().combinations().next().unwrap();
        assert_eq!(
            combo.state_file(Path::new("results")),
            PathBuf::from("results/nb-max-simple-tfidf-1,1.h5")
        );
    }

    #[test]
    fn test_apply_preset_replaces_only_set_fields() {
        let mut cfg = config();
        let preset = Preset {
            query: Some(owned(&["cluster", "random"])),
            n_instances: Some(4),
            ..Preset::default()
        };
        cfg.apply_preset(&preset);
        assert_eq!(cfg.query, owned(&["cluster", "random"]));
        assert_eq!(cfg.n_instances, 4);
        assert_eq!(cfg.classifiers, owned(&["nb", "svm"]));
        assert_eq!(cfg.priors, vec![Prior::new(1, 1), Prior::new(5, 10)]);
    }

    #[test]
    fn test_apply_default_preset() {
        let mut cfg = config();
        cfg.apply_preset(&Preset::default_bundle());
        assert_eq!(cfg.classifiers.len(), 5);
        assert_eq!(cfg.iteration_count(), 5 * 2 * 3 * 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_name() {
        let mut cfg = config();
        cfg.classifiers.push("xgboost".to_owned());
        assert!(matches!(
            cfg.validate(),
            Err(SweepError::UnknownOption {
                axis: Axis::Classifier,
                ..
            })
        ));
    }

    #[test]
    fn test_unsupported_combination() {
        let cfg = SweepConfig {
            classifiers: owned(&["lstm-pool"]),
            ..config()
        };
        assert!(cfg.combinations().all(|c| c.is_unsupported()));
        assert!(!config().combinations().next().unwrap().is_unsupported());
        assert_eq!(cfg.skipped_count(), cfg.iteration_count());
        assert_eq!(config().skipped_count(), 0);
    }

    #[test]
    fn test_huge_instance_count_is_lazy() {
        let cfg = SweepConfig {
            classifiers: owned(&["nb"]),
            balance: owned(&["simple"]),
            priors: vec![Prior::new(1, 1)],
            n_instances: u32::MAX,
            ..config()
        };
        assert_eq!(cfg.iteration_count(), u32::MAX as usize);

        let first: Vec<Combination> = cfg.combinations().take(3).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].label(), "nb-max-simple-tfidf-1,1-3");
        assert_eq!(first[2].seed, 3);
    }

    #[test]
    fn test_skipped_count_mixed() {
        let cfg = SweepConfig {
            classifiers: owned(&["nb", "lstm-base"]),
            feature_extraction: owned(&["tfidf", "embedding-lstm"]),
            ..config()
        };
        // Three of the four classifier/feature pairs involve an lstm model.
        assert_eq!(cfg.skipped_count(), 3 * 2 * 2);
        assert_eq!(
            cfg.skipped_count(),
            cfg.combinations().filter(Combination::is_unsupported).count()
        );
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let mut cfg = SweepConfig {
            classifiers: owned(&["svm", "nb", "svm", "nb"]),
            priors: vec![Prior::new(5, 10), Prior::new(1, 1), Prior::new(5, 10)],
            ..config()
        };
        cfg.dedup();
        assert_eq!(cfg.classifiers, owned(&["svm", "nb"]));
        assert_eq!(cfg.priors, vec![Prior::new(5, 10), Prior::new(1, 1)]);

        let labels: Vec<String> = cfg.combinations().map(|c| c.label()).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }
}
