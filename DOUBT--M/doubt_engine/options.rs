use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    error::DoubtError,
    history::{HistoryStore, RingHistory, UnboundedHistory},
    levels::MAX_LEVEL,
};

/// How much analysis history the engine keeps for statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HistoryRetention {
    /// Keep every analysis for the lifetime of the engine.
    #[default]
    Unbounded,
    /// Keep only the most recent `capacity` analyses.
    Ring {
        /// Number of analyses retained.
        capacity: usize,
    },
}

impl HistoryRetention {
    /// Instantiates the matching store.
    #[must_use]
    pub fn build(self) -> Arc<dyn HistoryStore> {
        match self {
            Self::Unbounded => Arc::new(UnboundedHistory::new()),
            Self::Ring { capacity } => Arc::new(RingHistory::new(capacity)),
        }
    }
}

/// Engine configuration, usually read from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DoubtOptions {
    /// Deepest level an analysis may reach.
    pub max_depth: u8,
    /// Stability bound for convergence on both certainty and doubt.
    pub convergence_threshold: f64,
    /// Certainty above which assessments are banded high.
    pub certainty_threshold: f64,
    /// Whether fractal insights are computed.
    pub fractal_analysis: bool,
    /// History retention policy.
    pub history: HistoryRetention,
}

impl Default for DoubtOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_LEVEL,
            convergence_threshold: crate::convergence::DEFAULT_THRESHOLD,
            certainty_threshold: 0.8,
            fractal_analysis: true,
            history: HistoryRetention::Unbounded,
        }
    }
}

impl DoubtOptions {
    /// Loads and validates options from a TOML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading doubt config {}", path.display()))?;
        let options: Self =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        options
            .validate()
            .with_context(|| format!("validating {}", path.display()))?;
        Ok(options)
    }

    /// Checks ranges.
    pub fn validate(&self) -> Result<(), DoubtError> {
        if !(1..=MAX_LEVEL).contains(&self.max_depth) {
            return Err(DoubtError::Config(format!(
                "max_depth must be within 1..={MAX_LEVEL}, got {}",
                self.max_depth
            )));
        }
        for (name, value) in [
            ("convergence_threshold", self.convergence_threshold),
            ("certainty_threshold", self.certainty_threshold),
        ] {
            if value.is_nan() || value <= 0.0 || value > 1.0 {
                return Err(DoubtError::Config(format!(
                    "{name} must be within (0, 1], got {value}"
                )));
            }
        }
        if self.history == (HistoryRetention::Ring { capacity: 0 }) {
            return Err(DoubtError::Config("ring history capacity must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_validate() {
        let options = DoubtOptions::default();
        assert_eq!(options.max_depth, 7);
        assert!(options.fractal_analysis);
        assert_eq!(options.history, HistoryRetention::Unbounded);
        options.validate().unwrap();
    }

    #[test]
    fn loads_partial_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doubt.toml");
        fs::write(
            &path,
            "max_depth = 4\nfractal_analysis = false\n\n\
             [history]\nmode = \"ring\"\ncapacity = 32\n",
        )
        .unwrap();
        let options = DoubtOptions::load(&path).unwrap();
        assert_eq!(options.max_depth, 4);
        assert!(!options.fractal_analysis);
        assert!((options.convergence_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(options.history, HistoryRetention::Ring { capacity: 32 });
        assert_eq!(options.history.build().len(), 0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            DoubtOptions {
                max_depth: 0,
                ..DoubtOptions::default()
            },
            DoubtOptions {
                max_depth: 8,
                ..DoubtOptions::default()
            },
            DoubtOptions {
                convergence_threshold: 0.0,
                ..DoubtOptions::default()
            },
            DoubtOptions {
                certainty_threshold: 1.5,
                ..DoubtOptions::default()
            },
            DoubtOptions {
                certainty_threshold: f64::NAN,
                ..DoubtOptions::default()
            },
            DoubtOptions {
                history: HistoryRetention::Ring { capacity: 0 },
                ..DoubtOptions::default()
            },
        ];
        for options in bad {
            assert!(matches!(options.validate(), Err(DoubtError::Config(_))));
        }
    }

    #[test]
    fn load_reports_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doubt.toml");
        fs::write(&path, "max_depth = 9\n").unwrap();
        let err = DoubtOptions::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("max_depth"));
        assert!(DoubtOptions::load(dir.path().join("missing.toml")).is_err());
    }
}
