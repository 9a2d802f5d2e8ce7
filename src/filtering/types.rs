use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type EntityId = u32;
pub type UserId = EntityId;
pub type ItemId = EntityId;
pub type RatingValue = f64;

/// Sparse rating vector of one user (keyed by item) or one item (keyed by user).
/// Ordered so that dot products and sums are reproducible bit for bit.
pub type Profile = BTreeMap<EntityId, RatingValue>;

/// Outer key → profile. Used for both the user→item and item→user views.
pub type Table = BTreeMap<EntityId, Profile>;

/// user → item → rating, for test ratings and predictions alike.
pub type UserItemTable = BTreeMap<UserId, BTreeMap<ItemId, RatingValue>>;
pub type PredictionTable = UserItemTable;
pub type TestTable = UserItemTable;

/// item → aggregate error statistic
pub type ErrorTable = BTreeMap<ItemId, f64>;

/// rounded rating → number of ratings
pub type FrequencyMap = BTreeMap<i64, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Neighbors are users similar to the one being predicted for
    User,
    /// Neighbors are items similar to the one being predicted
    Item,
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::User => "user-based",
            Mode::Item => "item-based",
        }
    }

    /// Splits a test pair into (anchor, target) for this mode.
    pub fn anchor_and_target(&self, user: UserId, item: ItemId) -> (EntityId, EntityId) {
        match self {
            Mode::User => (user, item),
            Mode::Item => (item, user),
        }
    }

    /// Inverse of [`Mode::anchor_and_target`].
    pub fn user_and_item(&self, anchor: EntityId, target: EntityId) -> (UserId, ItemId) {
        match self {
            Mode::User => (anchor, target),
            Mode::Item => (target, anchor),
        }
    }
}

/// Which key of a two-level table holds the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKey {
    Outer,
    Inner,
}
