use crate::generator::plume::PlumeConfig;
use anyhow::Context;
use plumecore::prelude::{LocaliserConfig, SearchPattern};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub steps: usize,
    pub sample_interval_s: f64,
    pub start_timestamp: f64,
    /// Longest hop the simulated vehicle flies per command; unlimited if unset.
    pub max_leg_m: Option<f64>,
    pub localiser: LocaliserConfig,
    pub plume: PlumeConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            steps: 40,
            sample_interval_s: 10.0,
            start_timestamp: 1_700_000_000.0,
            max_leg_m: Some(60.0),
            localiser: LocaliserConfig::default(),
            plume: PlumeConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(steps: usize, pattern: Option<&str>) -> Self {
        let mut config = Self {
            steps,
            ..Default::default()
        };
        if let Some(name) = pattern {
            config.localiser.search_pattern = SearchPattern::from(name);
        }
        config
    }
}
