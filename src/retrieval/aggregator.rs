use std::collections::HashMap;

use super::models::ScoredCandidate;

/// Capacity-bounded, deduplicating fold across all symptoms of one call.
///
/// Keyed by description text: two candidates with identical descriptions are
/// the same concept no matter which symptom produced them, and only the
/// higher score survives. At capacity the globally lowest entry is evicted,
/// and only for a strictly greater newcomer. Both invariants (distinct keys,
/// size <= n) hold at every point, not just on `results()`.
#[derive(Debug)]
pub struct GlobalAggregator {
    n: usize,
    entries: HashMap<String, (u64, f64)>,
    next_seq: u64,
}

impl GlobalAggregator {
    pub fn new(n: usize) -> Self {
        Self { n, entries: HashMap::new(), next_seq: 0 }
    }

    pub fn fold(&mut self, candidate: ScoredCandidate) {
        if self.n == 0 {
            return;
        }

        if let Some(&(seq, existing)) = self.entries.get(&candidate.description) {
            // Known concept: keep the better score, never downgrade. The
            // original sequence number is kept so tie order stays first-seen.
            if candidate.score > existing {
                self.entries.insert(candidate.description, (seq, candidate.score));
            }
            return;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        if self.entries.len() < self.n {
            self.entries.insert(candidate.description, (seq, candidate.score));
            return;
        }

        // At capacity: evict the minimum only for a strictly better score.
        // Among equal minima the earliest-inserted goes.
        let Some((min_key, min_score)) = self
            .entries
            .iter()
            .min_by(|(_, (seq_a, score_a)), (_, (seq_b, score_b))| {
                score_a
                    .partial_cmp(score_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(seq_a.cmp(seq_b))
            })
            .map(|(k, (_, s))| (k.clone(), *s))
        else {
            return;
        };

        if candidate.score > min_score {
            self.entries.remove(&min_key);
            self.entries.insert(candidate.description, (seq, candidate.score));
        }
    }

    /// Ranked distinct concepts, score descending, ties by first-seen order.
    pub fn results(&self) -> Vec<ScoredCandidate> {
        let mut ranked: Vec<(&String, &(u64, f64))> = self.entries.iter().collect();
        ranked.sort_by(|(_, (seq_a, score_a)), (_, (seq_b, score_b))| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(seq_a.cmp(seq_b))
        });
        ranked
            .into_iter()
            .map(|(description, (_, score))| ScoredCandidate::new(*score, description.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_exceeds_capacity() {
        let mut agg = GlobalAggregator::new(5);
        for i in 0..50 {
            agg.fold(ScoredCandidate::new(i as f64 / 50.0, format!("disease-{i}")));
            assert!(agg.len() <= 5);
        }
    }

    #[test]
    fn test_no_duplicate_descriptions() {
        let mut agg = GlobalAggregator::new(5);
        agg.fold(ScoredCandidate::new(0.4, "influenza"));
        agg.fold(ScoredCandidate::new(0.7, "influenza"));
        agg.fold(ScoredCandidate::new(0.2, "influenza"));
        let results = agg.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].description, "influenza");
    }

    #[test]
    fn test_duplicate_keeps_higher_score() {
        let mut agg = GlobalAggregator::new(5);
        agg.fold(ScoredCandidate::new(0.4, "influenza"));
        agg.fold(ScoredCandidate::new(0.7, "influenza"));
        assert_eq!(agg.results()[0].score, 0.7);
    }

    #[test]
    fn test_duplicate_never_downgrades() {
        let mut agg = GlobalAggregator::new(5);
        agg.fold(ScoredCandidate::new(0.7, "influenza"));
        agg.fold(ScoredCandidate::new(0.4, "influenza"));
        assert_eq!(agg.results()[0].score, 0.7);
    }

    #[test]
    fn test_evicts_global_minimum() {
        let mut agg = GlobalAggregator::new(2);
        agg.fold(ScoredCandidate::new(0.3, "cold"));
        agg.fold(ScoredCandidate::new(0.8, "covid-19"));
        agg.fold(ScoredCandidate::new(0.5, "bronchitis"));
        let names: Vec<String> = agg.results().into_iter().map(|c| c.description).collect();
        assert_eq!(agg.len(), 2);
        assert!(!names.iter().any(|n| n == "cold"));
    }

    #[test]
    fn test_discards_at_capacity_without_better_score() {
        let mut agg = GlobalAggregator::new(2);
        agg.fold(ScoredCandidate::new(0.6, "cold"));
        agg.fold(ScoredCandidate::new(0.8, "covid-19"));
        agg.fold(ScoredCandidate::new(0.6, "bronchitis"));
        let results = agg.results();
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|c| c.description == "cold"));
        assert!(!results.iter().any(|c| c.description == "bronchitis"));
    }

    #[test]
    fn test_results_sorted_descending_ties_first_seen() {
        let mut agg = GlobalAggregator::new(5);
        agg.fold(ScoredCandidate::new(0.5, "cold"));
        agg.fold(ScoredCandidate::new(0.9, "covid-19"));
        agg.fold(ScoredCandidate::new(0.5, "bronchitis"));
        let names: Vec<String> =
            agg.results().into_iter().map(|c| c.description).collect();
        assert_eq!(names, vec!["covid-19", "cold", "bronchitis"]);
    }

    #[test]
    fn test_update_in_place_at_capacity() {
        let mut agg = GlobalAggregator::new(2);
        agg.fold(ScoredCandidate::new(0.3, "cold"));
        agg.fold(ScoredCandidate::new(0.8, "covid-19"));
        // Already present: updates in place even though capacity is full.
        agg.fold(ScoredCandidate::new(0.9, "cold"));
        let results = agg.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].description, "cold");
        assert_eq!(results[0].score, 0.9);
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut agg = GlobalAggregator::new(0);
        agg.fold(ScoredCandidate::new(0.9, "covid-19"));
        assert!(agg.is_empty());
        assert!(agg.results().is_empty());
    }
}
