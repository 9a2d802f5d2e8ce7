use crate::filtering::types::{FrequencyMap, ItemId, Table};

/// Histogram of an item's ratings, rounded half up to the nearest integer.
/// Expects the de-centered item→user view. Unknown items give an empty map.
pub fn rating_frequency(item_to_user: &Table, item: ItemId) -> FrequencyMap {
    let mut frequencies = FrequencyMap::new();
    if let Some(users) = item_to_user.get(&item) {
        for &rating in users.values() {
            *frequencies.entry(round_half_up(rating)).or_insert(0) += 1;
        }
    }
    frequencies
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::types::Profile;

    #[test]
    fn test_rating_frequency() {
        let mut table = Table::new();
        let users: Profile = [(1, 4.0), (2, 3.9999999999), (3, 2.0), (4, 2.5), (5, 1.49)]
            .into_iter()
            .collect();
        table.insert(10, users);

        let frequencies = rating_frequency(&table, 10);

        assert_eq!(frequencies.get(&4), Some(&2));
        assert_eq!(frequencies.get(&2), Some(&1));
        assert_eq!(frequencies.get(&3), Some(&1));
        assert_eq!(frequencies.get(&1), Some(&1));
        assert_eq!(frequencies.values().sum::<usize>(), 5);
    }

    #[test]
    fn test_unknown_item_has_empty_histogram() {
        assert!(rating_frequency(&Table::new(), 42).is_empty());
    }
}
