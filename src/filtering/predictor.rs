use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;

use super::neighbors::{average_rating, rank_candidates, select_neighbors};
use super::types::{EntityId, ItemId, Mode, PredictionTable, RatingValue, Table, TestTable, UserId};
use crate::config::settings::PredictionSettings;

/// Centered prediction used when no neighbor qualifies. De-centers to the user's mean.
pub const FALLBACK_PREDICTION: RatingValue = 0.0;

/// Predicts centered ratings for every (user, item) pair of the test split.
pub struct Predictor<'a> {
    view: &'a Table,
    settings: &'a PredictionSettings,
}

struct AnchorPredictions {
    values: Vec<(UserId, ItemId, RatingValue)>,
    fallbacks: usize,
    /// Candidates left out of the ranking because their similarity is undefined
    undefined: usize,
}

impl<'a> Predictor<'a> {
    /// `view` must be the centered table matching `settings.mode`.
    pub fn new(view: &'a Table, settings: &'a PredictionSettings) -> Self {
        Self { view, settings }
    }

    pub fn predict(&self, test: &TestTable) -> PredictionTable {
        let mode = self.settings.mode;
        info!(
            "Predicting {} (k={}, min overlap={})",
            mode.as_str(),
            self.settings.k,
            self.settings.min_overlap
        );

        let groups: Vec<(EntityId, Vec<EntityId>)> = group_by_anchor(test, mode).into_iter().collect();

        let results: Vec<AnchorPredictions> = if self.settings.parallel {
            groups
                .par_iter()
                .map(|(anchor, targets)| self.predict_anchor(*anchor, targets))
                .collect()
        } else {
            groups
                .iter()
                .map(|(anchor, targets)| self.predict_anchor(*anchor, targets))
                .collect()
        };

        let mut predictions = PredictionTable::new();
        let mut fallbacks = 0;
        let mut undefined = 0;
        for result in results {
            fallbacks += result.fallbacks;
            undefined += result.undefined;
            for (user, item, value) in result.values {
                predictions.entry(user).or_default().insert(item, value);
            }
        }

        if undefined > 0 {
            warn!("Skipped {} candidate neighbors with undefined similarity", undefined);
        }
        if fallbacks > 0 {
            warn!("{} test pairs had no qualifying neighbors; predicted the user mean", fallbacks);
        }
        info!("  → Produced predictions for {} users", predictions.len());
        predictions
    }

    /// Predicts one centered rating. Returns `None` when no neighbor qualifies.
    pub fn predict_pair(&self, user: UserId, item: ItemId) -> Option<RatingValue> {
        let (anchor, target) = self.settings.mode.anchor_and_target(user, item);
        let ranked = rank_candidates(anchor, self.view);
        let neighbors = select_neighbors(
            &ranked,
            anchor,
            target,
            self.settings.k,
            self.view,
            self.settings.min_overlap,
        );
        average_rating(&neighbors)
    }

    /// All targets of one anchor share a single ranking.
    fn predict_anchor(&self, anchor: EntityId, targets: &[EntityId]) -> AnchorPredictions {
        let mode = self.settings.mode;
        let ranked = rank_candidates(anchor, self.view);
        let undefined = if self.view.contains_key(&anchor) {
            self.view.len() - ranked.len()
        } else {
            0
        };
        let mut fallbacks = 0;

        let values: Vec<_> = targets
            .iter()
            .map(|&target| {
                let neighbors = select_neighbors(
                    &ranked,
                    anchor,
                    target,
                    self.settings.k,
                    self.view,
                    self.settings.min_overlap,
                );
                let value = average_rating(&neighbors).unwrap_or_else(|| {
                    fallbacks += 1;
                    FALLBACK_PREDICTION
                });
                let (user, item) = mode.user_and_item(anchor, target);
                (user, item, value)
            })
            .collect();

        debug!("Anchor {}: {} targets, {} fallbacks", anchor, targets.len(), fallbacks);
        AnchorPredictions {
            values,
            fallbacks,
            undefined,
        }
    }
}

/// anchor → targets for every test pair
fn group_by_anchor(test: &TestTable, mode: Mode) -> BTreeMap<EntityId, Vec<EntityId>> {
    let mut groups: BTreeMap<EntityId, Vec<EntityId>> = BTreeMap::new();
    for (&user, items) in test {
        for &item in items.keys() {
            let (anchor, target) = mode.anchor_and_target(user, item);
            groups.entry(anchor).or_default().push(target);
        }
    }
    groups
}
