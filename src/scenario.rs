use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

fn default_edge() -> usize {
    10
}

fn default_years() -> u64 {
    400
}

fn default_lumberjack_density() -> f64 {
    0.10
}

fn default_tree_density() -> f64 {
    0.50
}

fn default_bear_density() -> f64 {
    0.02
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_edge")]
    pub edge: usize,
    #[serde(default = "default_years")]
    pub years: u64,
    #[serde(default)]
    pub seeding: SeedingConfig,
}

/// Per-cell probabilities used when the forest is first populated.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedingConfig {
    #[serde(default = "default_lumberjack_density")]
    pub lumberjack: f64,
    #[serde(default = "default_tree_density")]
    pub tree: f64,
    #[serde(default = "default_bear_density")]
    pub bear: f64,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            lumberjack: default_lumberjack_density(),
            tree: default_tree_density(),
            bear: default_bear_density(),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "forest".into(),
            description: None,
            seed: 0,
            edge: default_edge(),
            years: default_years(),
            seeding: SeedingConfig::default(),
        }
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.edge > 0, "scenario '{}' must have a positive edge", self.name);
        for (label, value) in [
            ("lumberjack", self.seeding.lumberjack),
            ("tree", self.seeding.tree),
            ("bear", self.seeding.bear),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{label} seeding density {value} is not a probability"
            );
        }
        Ok(())
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}
