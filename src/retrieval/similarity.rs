use crate::core::error::{MedRagError, Result};

/// Cosine similarity of two equal-length vectors. Unequal lengths are a
/// programming error (two different embedding models mixed in one call) and
/// fail hard rather than scoring 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MedRagError::DimensionMismatch { left: a.len(), right: b.len() });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (mag_a * mag_b)) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vec![0.3, -0.5, 0.8];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_negative_one() {
        let score = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let result = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(crate::MedRagError::DimensionMismatch { left: 2, right: 3 })
        ));
    }
}
