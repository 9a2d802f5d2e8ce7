use serde::{Deserialize, Serialize};

use crate::filtering::types::{ItemId, RatingValue, UserId};

/// One (user, item, rating) row of the training or test table.
/// Any trailing fields such as a timestamp are dropped at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: RatingValue,
}

impl RatingRow {
    pub fn new(user_id: UserId, item_id: ItemId, rating: RatingValue) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }
}

/// Item display name, keyed by the first field of its row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemNameRow {
    pub item_id: ItemId,
    pub name: String,
}
