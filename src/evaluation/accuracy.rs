use std::collections::BTreeMap;

use crate::errors::EvaluationError;
use crate::filtering::types::{ErrorTable, ItemId, PredictionTable, RatingValue, TestTable, UserId};

/// Mean absolute error per item over de-centered predictions.
///
/// Users with fewer than `min_ratings_per_user` predictions are skipped
/// entirely. Items whose only raters were skipped do not appear in the result.
pub fn mean_absolute_error_per_item(
    predictions: &PredictionTable,
    test: &TestTable,
    min_ratings_per_user: usize,
) -> Result<ErrorTable, EvaluationError> {
    let mut totals: BTreeMap<ItemId, (f64, usize)> = BTreeMap::new();

    for (&user, items) in predictions {
        if items.len() < min_ratings_per_user {
            continue;
        }
        for (&item, &predicted) in items {
            let actual = actual_rating(test, user, item)?;
            let entry = totals.entry(item).or_insert((0.0, 0));
            entry.0 += (predicted - actual).abs();
            entry.1 += 1;
        }
    }

    Ok(totals
        .into_iter()
        .map(|(item, (total, count))| (item, total / count as f64))
        .collect())
}

/// Root-mean-square error over every prediction.
pub fn root_mean_square_error(
    predictions: &PredictionTable,
    test: &TestTable,
) -> Result<f64, EvaluationError> {
    let mut squared_sum = 0.0;
    let mut count = 0usize;

    for (&user, items) in predictions {
        for (&item, &predicted) in items {
            let actual = actual_rating(test, user, item)?;
            squared_sum += (predicted - actual).powi(2);
            count += 1;
        }
    }

    if count == 0 {
        return Err(EvaluationError::NoPredictions);
    }
    Ok((squared_sum / count as f64).sqrt())
}

fn actual_rating(test: &TestTable, user: UserId, item: ItemId) -> Result<RatingValue, EvaluationError> {
    test.get(&user)
        .and_then(|items| items.get(&item))
        .copied()
        .ok_or(EvaluationError::MissingTestRating { user, item })
}
