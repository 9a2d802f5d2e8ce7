use std::collections::HashMap;

use log::info;

use crate::domain::{ItemNameRow, RatingRow};
use crate::filtering::types::{ItemId, Mode, RatingValue, Table, TestTable, UserId};

/// In-memory rating tables for one run.
///
/// The user→item and item→user views are mirror images of each other.
/// They are only ever written through [`RatingStore::insert_rating`],
/// which updates both sides together.
#[derive(Debug, Default, Clone)]
pub struct RatingStore {
    user_to_item: Table,
    item_to_user: Table,
    test: TestTable,
    item_names: HashMap<ItemId, String>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from already parsed rows.
    pub fn load(training: &[RatingRow], test: &[RatingRow], item_names: &[ItemNameRow]) -> Self {
        let mut store = Self::new();

        for row in training {
            store.insert_rating(row.user_id, row.item_id, row.rating);
        }
        for row in test {
            store.insert_test_rating(row.user_id, row.item_id, row.rating);
        }
        for row in item_names {
            store.item_names.insert(row.item_id, row.name.clone());
        }

        info!(
            "Loaded {} training ratings ({} users, {} items), {} test ratings, {} item names",
            training.len(),
            store.user_to_item.len(),
            store.item_to_user.len(),
            test.len(),
            store.item_names.len()
        );
        store
    }

    /// Sets a training rating in both views. Overwrites any previous value.
    pub fn insert_rating(&mut self, user: UserId, item: ItemId, value: RatingValue) {
        self.user_to_item.entry(user).or_default().insert(item, value);
        self.item_to_user.entry(item).or_default().insert(user, value);
    }

    /// Test ratings have no item→user view.
    pub fn insert_test_rating(&mut self, user: UserId, item: ItemId, value: RatingValue) {
        self.test.entry(user).or_default().insert(item, value);
    }

    pub fn user_to_item(&self) -> &Table {
        &self.user_to_item
    }

    pub fn item_to_user(&self) -> &Table {
        &self.item_to_user
    }

    /// The view neighbors are searched in for `mode`.
    pub fn view(&self, mode: Mode) -> &Table {
        match mode {
            Mode::User => &self.user_to_item,
            Mode::Item => &self.item_to_user,
        }
    }

    pub fn test_ratings(&self) -> &TestTable {
        &self.test
    }

    pub fn rating(&self, user: UserId, item: ItemId) -> Option<RatingValue> {
        self.user_to_item.get(&user)?.get(&item).copied()
    }

    pub fn item_name(&self, item: ItemId) -> Option<&str> {
        self.item_names.get(&item).map(String::as_str)
    }

    /// Every training rating as (user, item, value), ordered by user then item.
    pub fn training_ratings(&self) -> impl Iterator<Item = (UserId, ItemId, RatingValue)> + '_ {
        self.user_to_item.iter().flat_map(|(&user, items)| {
            items.iter().map(move |(&item, &value)| (user, item, value))
        })
    }

    pub fn training_len(&self) -> usize {
        self.user_to_item.values().map(|items| items.len()).sum()
    }

    pub fn test_len(&self) -> usize {
        self.test.values().map(|items| items.len()).sum()
    }
}
