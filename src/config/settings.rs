use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::filtering::types::Mode;

const DEFAULT_TRAINING_PATH: &str = "ua.base";
const DEFAULT_TEST_PATH: &str = "ua.test";
const DEFAULT_ITEM_NAMES_PATH: &str = "u.item";

pub struct DataSettings {
    pub training_path: PathBuf,
    pub test_path: PathBuf,
    pub item_names_path: PathBuf,
    pub rating_delimiter: u8,
    pub item_name_delimiter: u8,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            training_path: path_from_env("TRAINING_DATA_PATH", DEFAULT_TRAINING_PATH),
            test_path: path_from_env("TEST_DATA_PATH", DEFAULT_TEST_PATH),
            item_names_path: path_from_env("ITEM_NAMES_PATH", DEFAULT_ITEM_NAMES_PATH),
            rating_delimiter: b'\t',
            item_name_delimiter: b'|',
        }
    }
}

#[derive(Debug, Clone)]
pub struct PredictionSettings {
    pub mode: Mode,
    /// Maximum number of neighbors averaged per prediction
    pub k: usize,
    /// Minimum number of shared ratings between anchor and neighbor
    pub min_overlap: usize,
    /// Users with fewer test predictions are left out of the per-item error
    pub min_ratings_per_user: usize,
    pub parallel: bool,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            mode: Mode::User,
            k: 20,
            min_overlap: 0,
            min_ratings_per_user: 0,
            parallel: true,
        }
    }
}

impl PredictionSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::InvalidK);
        }
        Ok(())
    }
}

pub struct ReportSettings {
    /// How many items to list at each end of the error ranking
    pub top_n: usize,
    pub json_output: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            json_output: None,
        }
    }
}

#[derive(Default)]
pub struct AppConfig {
    pub data: DataSettings,
    pub prediction: PredictionSettings,
    pub report: ReportSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
