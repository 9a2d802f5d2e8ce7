use std::collections::HashMap;

use log::{info, warn};

use super::types::{Profile, RatingValue, Table, UserId, UserKey};
use crate::store::RatingStore;

/// Per-user mean of the original (uncentered) training ratings.
#[derive(Debug, Clone, Default)]
pub struct UserMeans {
    means: HashMap<UserId, RatingValue>,
    global: RatingValue,
}

impl UserMeans {
    pub fn compute(user_to_item: &Table) -> Self {
        let means: HashMap<UserId, RatingValue> = user_to_item
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(&user, items)| (user, profile_mean(items)))
            .collect();

        let global = calculate_mean(user_to_item.values().flat_map(|items| items.values().copied()));

        info!("Computed means for {} users (global mean {:.4})", means.len(), global);
        Self { means, global }
    }

    pub fn get(&self, user: UserId) -> Option<RatingValue> {
        self.means.get(&user).copied()
    }

    pub fn global(&self) -> RatingValue {
        self.global
    }

    /// Mean used to de-center a value belonging to `user`. Users that never
    /// appear in the training data fall back to the global mean.
    pub fn offset_for(&self, user: UserId) -> RatingValue {
        self.get(user).unwrap_or(self.global)
    }

    /// Subtracts each user's mean from all of their training ratings, in both views.
    /// Must run exactly once, before any similarity is computed.
    pub fn center(&self, store: &mut RatingStore) {
        self.shift_store(store, |value, mean| value - mean);
        info!("Centered {} training ratings", store.training_len());
    }

    /// Restores the raw rating scale of the store, in both views.
    pub fn decenter_store(&self, store: &mut RatingStore) {
        self.shift_store(store, |value, mean| value + mean);
    }

    /// Adds each user's mean back onto a two-level table. `user_key` says
    /// whether the user id is the outer key (predictions) or the inner one
    /// (item→user tables).
    pub fn decenter(&self, table: &mut Table, user_key: UserKey) {
        let mut unknown_users = 0usize;

        for (&outer, inner) in table.iter_mut() {
            for (&inner_key, value) in inner.iter_mut() {
                let user = match user_key {
                    UserKey::Outer => outer,
                    UserKey::Inner => inner_key,
                };
                if self.get(user).is_none() {
                    unknown_users += 1;
                }
                *value += self.offset_for(user);
            }
        }

        if unknown_users > 0 {
            warn!(
                "{} values belong to users without training ratings; used global mean {:.4}",
                unknown_users, self.global
            );
        }
    }

    fn shift_store<F>(&self, store: &mut RatingStore, shift: F)
    where
        F: Fn(RatingValue, RatingValue) -> RatingValue,
    {
        let ratings: Vec<_> = store.training_ratings().collect();
        for (user, item, value) in ratings {
            store.insert_rating(user, item, shift(value, self.offset_for(user)));
        }
    }
}

/// A user who gave every item the same rating gets that exact rating as
/// their mean, so centering leaves an all-zero vector.
fn profile_mean(items: &Profile) -> RatingValue {
    let mut values = items.values().copied();
    match values.next() {
        Some(first) if values.all(|v| v == first) => first,
        _ => calculate_mean(items.values().copied()),
    }
}

fn calculate_mean<I>(values: I) -> RatingValue
where
    I: Iterator<Item = RatingValue>,
{
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
