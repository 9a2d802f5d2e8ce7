use std::cmp::Ordering;

use super::types::{EntityId, Profile, RatingValue};
use crate::errors::SimilarityError;

/// Cosine similarity between two sparse rating vectors.
///
/// The dot product only covers ids present in both vectors, while each norm
/// covers the whole vector. A zero-norm vector has no direction, so the
/// result is [`SimilarityError::UndefinedSimilarity`] instead of NaN.
pub fn cosine_similarity(a: &Profile, b: &Profile) -> Result<f64, SimilarityError> {
    let norm_sq_a = squared_norm(a);
    let norm_sq_b = squared_norm(b);

    if norm_sq_a == 0.0 || norm_sq_b == 0.0 {
        return Err(SimilarityError::UndefinedSimilarity);
    }

    let dot: f64 = shared_entries(a, b).map(|(_, x, y)| x * y).sum();

    // sqrt of the product keeps sim(a, a) at exactly 1.0
    Ok(dot / (norm_sq_a * norm_sq_b).sqrt())
}

/// Number of ids rated in both vectors
pub fn overlap(a: &Profile, b: &Profile) -> usize {
    shared_entries(a, b).count()
}

fn squared_norm(profile: &Profile) -> f64 {
    profile.values().map(|v| v * v).sum()
}

/// Walks both ordered vectors in lockstep, yielding entries whose id is in both.
fn shared_entries<'a>(
    a: &'a Profile,
    b: &'a Profile,
) -> impl Iterator<Item = (EntityId, RatingValue, RatingValue)> + 'a {
    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();

    std::iter::from_fn(move || {
        loop {
            let (&id_a, &x) = *left.peek()?;
            let (&id_b, &y) = *right.peek()?;
            match id_a.cmp(&id_b) {
                Ordering::Less => {
                    left.next();
                }
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => {
                    left.next();
                    right.next();
                    return Some((id_a, x, y));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(entries: &[(EntityId, f64)]) -> Profile {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_self_similarity_is_exactly_one() {
        let vectors = [
            profile(&[(1, 1.0), (2, -1.0)]),
            profile(&[(1, 0.3), (5, -1.7), (9, 2.25)]),
            profile(&[(3, -0.6666666666666665), (4, 1.3333333333333335)]),
        ];
        for v in &vectors {
            assert_eq!(cosine_similarity(v, v), Ok(1.0));
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = profile(&[(1, 0.5), (2, -1.5), (3, 1.0), (7, 0.25)]);
        let b = profile(&[(2, 2.0), (3, -0.75), (4, 1.0)]);
        let c = profile(&[(1, -0.1), (7, 0.9)]);

        for (x, y) in [(&a, &b), (&a, &c), (&b, &c)] {
            assert_eq!(cosine_similarity(x, y), cosine_similarity(y, x));
        }
    }

    #[test]
    fn test_dot_uses_shared_ids_but_norm_uses_all() {
        let a = profile(&[(1, 1.0), (2, 1.0)]);
        let b = profile(&[(1, 1.0), (3, 1.0)]);

        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_vectors_have_zero_similarity() {
        let a = profile(&[(1, 1.0)]);
        let b = profile(&[(2, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), Ok(0.0));
    }

    #[test]
    fn test_opposite_vectors() {
        let a = profile(&[(1, 1.0), (2, -1.0)]);
        let b = profile(&[(1, -1.0), (2, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), Ok(-1.0));
    }

    #[test]
    fn test_zero_norm_is_undefined() {
        let flat = profile(&[(1, 0.0), (2, 0.0)]);
        let other = profile(&[(1, 1.0)]);

        assert_eq!(
            cosine_similarity(&flat, &other),
            Err(SimilarityError::UndefinedSimilarity)
        );
        assert_eq!(
            cosine_similarity(&other, &flat),
            Err(SimilarityError::UndefinedSimilarity)
        );
        assert_eq!(
            cosine_similarity(&Profile::new(), &other),
            Err(SimilarityError::UndefinedSimilarity)
        );
    }

    #[test]
    fn test_overlap_counts_shared_ids() {
        let a = profile(&[(1, 1.0), (2, 0.0), (4, 1.0)]);
        let b = profile(&[(2, 1.0), (3, 1.0), (4, 1.0), (5, 1.0)]);

        assert_eq!(overlap(&a, &b), 2);
        assert_eq!(overlap(&b, &a), 2);
        assert_eq!(overlap(&a, &Profile::new()), 0);
    }
}
