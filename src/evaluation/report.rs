use serde::{Deserialize, Serialize};

use super::frequency::rating_frequency;
use crate::config::settings::PredictionSettings;
use crate::filtering::types::{ErrorTable, FrequencyMap, ItemId, Mode};
use crate::store::RatingStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemError {
    pub item_id: ItemId,
    pub name: Option<String>,
    pub mean_absolute_error: f64,
    pub frequencies: FrequencyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub mode: Mode,
    pub k: usize,
    pub min_overlap: usize,
    pub min_ratings_per_user: usize,
}

impl From<&PredictionSettings> for RunParameters {
    fn from(settings: &PredictionSettings) -> Self {
        Self {
            mode: settings.mode,
            k: settings.k,
            min_overlap: settings.min_overlap,
            min_ratings_per_user: settings.min_ratings_per_user,
        }
    }
}

/// Result of one evaluation run, handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub parameters: RunParameters,
    /// Highest error first
    pub most_inaccurate: Vec<ItemError>,
    /// Lowest error first
    pub most_accurate: Vec<ItemError>,
    pub rmse: f64,
    pub predictions: usize,
}

impl Report {
    /// `store` must already be de-centered so frequencies are on the raw scale.
    pub fn build(
        parameters: RunParameters,
        errors: &ErrorTable,
        store: &RatingStore,
        rmse: f64,
        predictions: usize,
        top_n: usize,
    ) -> Self {
        let ranked = rank_by_error(errors);

        let describe = |&(item_id, error): &(ItemId, f64)| ItemError {
            item_id,
            name: store.item_name(item_id).map(str::to_string),
            mean_absolute_error: error,
            frequencies: rating_frequency(store.item_to_user(), item_id),
        };

        Self {
            parameters,
            most_inaccurate: ranked.iter().take(top_n).map(&describe).collect(),
            most_accurate: ranked.iter().rev().take(top_n).map(&describe).collect(),
            rmse,
            predictions,
        }
    }
}

/// Items by descending error, ties by ascending id.
fn rank_by_error(errors: &ErrorTable) -> Vec<(ItemId, f64)> {
    let mut ranked: Vec<(ItemId, f64)> = errors.iter().map(|(&id, &e)| (id, e)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
