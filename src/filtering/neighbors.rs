use log::debug;

use super::similarity::{cosine_similarity, overlap};
use super::types::{EntityId, RatingValue, Table};

/// A candidate neighbor together with its similarity to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: EntityId,
    pub similarity: f64,
}

/// Average rating of the `k` nearest neighbors of `anchor` that rated `target`.
pub fn nearest_neighbors(
    anchor: EntityId,
    target: EntityId,
    k: usize,
    table: &Table,
    min_overlap: usize,
) -> Vec<(EntityId, RatingValue)> {
    let ranked = rank_candidates(anchor, table);
    select_neighbors(&ranked, anchor, target, k, table, min_overlap)
}

/// Ranks every entity in `table` by cosine similarity to `anchor`, most
/// similar first. Ties are broken by ascending id. Candidates with undefined
/// similarity are left out. Returns nothing if `anchor` is not in `table`.
pub fn rank_candidates(anchor: EntityId, table: &Table) -> Vec<Candidate> {
    let Some(anchor_profile) = table.get(&anchor) else {
        return Vec::new();
    };

    let mut ranked: Vec<Candidate> = table
        .iter()
        .filter_map(|(&id, profile)| {
            cosine_similarity(anchor_profile, profile)
                .ok()
                .map(|similarity| Candidate { id, similarity })
        })
        .collect();

    let excluded = table.len() - ranked.len();
    if excluded > 0 {
        debug!("Anchor {}: {} candidates with undefined similarity", anchor, excluded);
    }

    ranked.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

/// Walks a ranking and keeps up to `k` candidates that rated `target` and share
/// at least `min_overlap` ids with the anchor. Returns their ratings of `target`.
pub fn select_neighbors(
    ranked: &[Candidate],
    anchor: EntityId,
    target: EntityId,
    k: usize,
    table: &Table,
    min_overlap: usize,
) -> Vec<(EntityId, RatingValue)> {
    let Some(anchor_profile) = table.get(&anchor) else {
        return Vec::new();
    };

    ranked
        .iter()
        .filter_map(|candidate| {
            let profile = table.get(&candidate.id)?;
            let rating = *profile.get(&target)?;
            (overlap(anchor_profile, profile) >= min_overlap).then_some((candidate.id, rating))
        })
        .take(k)
        .collect()
}

/// Mean of the neighbor ratings, or `None` when there are no neighbors.
pub fn average_rating(neighbors: &[(EntityId, RatingValue)]) -> Option<RatingValue> {
    if neighbors.is_empty() {
        return None;
    }
    let sum: f64 = neighbors.iter().map(|(_, rating)| rating).sum();
    Some(sum / neighbors.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::types::Profile;

    fn table(rows: &[(EntityId, &[(EntityId, f64)])]) -> Table {
        rows.iter()
            .map(|&(id, entries)| (id, entries.iter().copied().collect::<Profile>()))
            .collect()
    }

    /// Centered user→item view. User 4 rated everything identically.
    fn sample() -> Table {
        table(&[
            (1, &[(10, 1.0), (11, -1.0), (12, 0.5)]),
            (2, &[(10, 0.9), (11, -0.8), (13, 1.0)]),
            (3, &[(10, -1.0), (11, 1.0), (13, -0.5)]),
            (4, &[(10, 0.0), (11, 0.0), (13, 0.0)]),
            (5, &[(11, -0.2), (13, 0.4)]),
        ])
    }

    #[test]
    fn test_missing_anchor_returns_empty() {
        let t = sample();
        assert!(rank_candidates(99, &t).is_empty());
        assert!(nearest_neighbors(99, 13, 5, &t, 0).is_empty());
    }

    #[test]
    fn test_ranking_is_descending_and_skips_undefined() {
        let t = sample();
        let ranked = rank_candidates(1, &t);

        assert_eq!(ranked[0].id, 1);
        assert!(ranked.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert!(ranked.iter().all(|c| c.id != 4));
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn test_ties_broken_by_ascending_id() {
        let t = table(&[
            (1, &[(10, 1.0)]),
            (7, &[(10, 2.0), (11, 3.0)]),
            (3, &[(10, 2.0), (11, 3.0)]),
            (5, &[(10, 2.0), (11, 3.0)]),
        ]);
        let ranked = rank_candidates(1, &t);
        let ids: Vec<EntityId> = ranked.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_close_similarities_keep_exact_order() {
        let t = table(&[
            (1, &[(10, 1.0), (11, 1.0)]),
            (2, &[(10, 1.0), (11, 0.9)]),
            (3, &[(10, 1.0), (11, 0.95)]),
        ]);
        let ranked = rank_candidates(1, &t);
        let ids: Vec<EntityId> = ranked.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_neighbors_must_rate_target() {
        let t = sample();
        let neighbors = nearest_neighbors(1, 13, 10, &t, 0);

        assert!(!neighbors.is_empty());
        for (id, rating) in &neighbors {
            assert_eq!(t[id].get(&13), Some(rating));
        }
        // The anchor has no rating for the target, so it never counts itself
        assert!(neighbors.iter().all(|(id, _)| *id != 1));
    }

    #[test]
    fn test_never_more_than_k() {
        let t = sample();
        for k in 1..=4 {
            assert!(nearest_neighbors(1, 13, k, &t, 0).len() <= k);
        }
        assert_eq!(nearest_neighbors(1, 13, 1, &t, 0), vec![(2, 1.0)]);
    }

    #[test]
    fn test_unbounded_k_returns_every_rater_of_target() {
        let t = sample();
        let mut ids: Vec<EntityId> = nearest_neighbors(1, 13, t.len(), &t, 0)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();

        // Every rater of item 13 except the zero-variance user 4
        assert_eq!(ids, vec![2, 3, 5]);
    }

    #[test]
    fn test_zero_variance_user_is_never_a_neighbor() {
        let t = sample();
        for anchor in [1, 2, 3, 5] {
            for target in [10, 11, 12, 13] {
                let neighbors = nearest_neighbors(anchor, target, 10, &t, 0);
                assert!(neighbors.iter().all(|(id, _)| *id != 4));
            }
        }
        assert!(rank_candidates(4, &t).is_empty());
    }

    #[test]
    fn test_min_overlap_filters_candidates() {
        let t = sample();

        // User 5 only shares item 11 with user 1
        let neighbors = nearest_neighbors(1, 13, 10, &t, 2);
        let ids: Vec<EntityId> = neighbors.iter().map(|(id, _)| *id).collect();

        assert!(ids.contains(&2));
        assert!(ids.contains(&3));
        assert!(!ids.contains(&5));
        assert!(nearest_neighbors(1, 13, 10, &t, 3).is_empty());
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[(1, 1.0), (2, -0.5)]), Some(0.25));
    }
}
