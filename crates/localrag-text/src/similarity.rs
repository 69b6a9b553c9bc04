use std::cmp::Ordering;

/// Sparse row: `(term id, weight)` pairs sorted by term id.
pub type SparseVector = Vec<(usize, f64)>;

pub fn l2_norm(v: &[(usize, f64)]) -> f64 {
    let mut sum = 0.0f64;
    for (_, x) in v {
        sum += x * x;
    }
    sum.sqrt()
}

/// Scale `v` to unit length; zero vectors are left untouched.
pub fn normalize(v: &mut [(usize, f64)]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for (_, x) in v.iter_mut() {
            *x /= norm;
        }
    }
}

pub fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0f64;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Cosine of the angle between two sparse vectors; 0 when either is zero.
pub fn cosine_similarity(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let denom = l2_norm(a) * l2_norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_only_counts_shared_ids() {
        let a = vec![(0, 1.0), (2, 2.0), (5, 3.0)];
        let b = vec![(1, 4.0), (2, 0.5), (5, 1.0)];
        assert!((dot(&a, &b) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[], &[(0, 1.0)]), 0.0);
    }

    #[test]
    fn cosine_is_scale_invariant() {
        let a = vec![(0, 1.0), (1, 1.0)];
        let b = vec![(0, 3.0), (1, 3.0)];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }
}
