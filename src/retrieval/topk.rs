use super::models::ScoredCandidate;

/// Fixed-capacity top-K selection over one symptom's candidate stream.
///
/// Holds at most `k` candidates at any point. Below capacity every offer is
/// accepted; at capacity a new candidate replaces the current minimum only
/// when its score is strictly greater. Ties on drain keep insertion order.
#[derive(Debug)]
pub struct TopKSelector {
    k: usize,
    entries: Vec<(u64, ScoredCandidate)>,
    next_seq: u64,
}

impl TopKSelector {
    pub fn new(k: usize) -> Self {
        Self { k, entries: Vec::with_capacity(k), next_seq: 0 }
    }

    pub fn offer(&mut self, candidate: ScoredCandidate) {
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.entries.len() < self.k {
            self.entries.push((seq, candidate));
            return;
        }

        // At capacity: find the current minimum (earliest-inserted among
        // equal minima) and replace it only on a strictly greater score.
        let Some(min_idx) = self.min_index() else {
            // k == 0
            return;
        };
        if candidate.score > self.entries[min_idx].1.score {
            self.entries[min_idx] = (seq, candidate);
        }
    }

    /// Consume the selector, returning its candidates sorted by score
    /// descending, ties in insertion order.
    pub fn drain(mut self) -> Vec<ScoredCandidate> {
        self.entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(seq_a.cmp(seq_b))
        });
        self.entries.into_iter().map(|(_, c)| c).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn min_index(&self) -> Option<usize> {
        let mut min: Option<usize> = None;
        for (i, (_, candidate)) in self.entries.iter().enumerate() {
            match min {
                None => min = Some(i),
                Some(m) if candidate.score < self.entries[m].1.score => min = Some(i),
                _ => {}
            }
        }
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_scores(selector: &mut TopKSelector, scores: &[f64]) {
        for (i, &score) in scores.iter().enumerate() {
            selector.offer(ScoredCandidate::new(score, format!("concept-{i}")));
        }
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut selector = TopKSelector::new(3);
        for i in 0..20 {
            selector.offer(ScoredCandidate::new(i as f64, format!("c{i}")));
            assert!(selector.len() <= 3);
        }
    }

    #[test]
    fn test_keeps_highest_scores() {
        let mut selector = TopKSelector::new(3);
        offer_scores(&mut selector, &[0.1, 0.9, 0.3, 0.7, 0.5, 0.8, 0.2, 0.6]);
        let drained = selector.drain();
        let scores: Vec<f64> = drained.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.9, 0.8, 0.7]);
    }

    #[test]
    fn test_true_top_k_under_ascending_insertion() {
        // The order that trips a heap-root-only comparison.
        let mut selector = TopKSelector::new(2);
        offer_scores(&mut selector, &[0.1, 0.2, 0.3, 0.4, 0.5]);
        let scores: Vec<f64> = selector.drain().iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.5, 0.4]);
    }

    #[test]
    fn test_equal_score_does_not_replace() {
        let mut selector = TopKSelector::new(1);
        selector.offer(ScoredCandidate::new(0.5, "first"));
        selector.offer(ScoredCandidate::new(0.5, "second"));
        let drained = selector.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].description, "first");
    }

    #[test]
    fn test_ties_drain_in_insertion_order() {
        let mut selector = TopKSelector::new(3);
        selector.offer(ScoredCandidate::new(0.5, "a"));
        selector.offer(ScoredCandidate::new(0.5, "b"));
        selector.offer(ScoredCandidate::new(0.5, "c"));
        let drained = selector.drain();
        let names: Vec<&str> = drained.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fewer_than_k_returns_all_sorted() {
        let mut selector = TopKSelector::new(5);
        offer_scores(&mut selector, &[0.2, 0.8]);
        let scores: Vec<f64> = selector.drain().iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.8, 0.2]);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut selector = TopKSelector::new(0);
        selector.offer(ScoredCandidate::new(1.0, "x"));
        assert!(selector.is_empty());
        assert!(selector.drain().is_empty());
    }
}
