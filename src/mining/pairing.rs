use crate::mining::cache::Cache;
use crate::mining::combos::bipartitions;
use crate::mining::mutual::Bipartition;
use crate::Count;
use crate::Ratio;
use std::collections::BTreeSet;

/// one attribute fixed to one of its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Modality {
    pub field: usize,
    pub value: usize,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

/// a joint modality under one bipartition, scored against its marginals.
///
/// score = (c + 1)(N + 2) / ((c_X + 1)(c_Y + 1)), a Laplace-smoothed
/// estimate of P(a, b) / (P(a) P(b)). Values near 1 are unremarkable;
/// the far ends of the sorted list are the under- and over-represented
/// joints. Swapping the two sides leaves the score unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    pub lhs: Vec<Modality>,
    pub rhs: Vec<Modality>,
    pub score: Ratio,
    pub cardinality: Count,
}

impl Pairing {
    /// combined modality set across both sides
    pub fn combined(&self) -> BTreeSet<Modality> {
        self.lhs.iter().chain(self.rhs.iter()).copied().collect()
    }
    /// whether every modality of self appears in other
    pub fn within(&self, other: &Self) -> bool {
        self.combined().is_subset(&other.combined())
    }
    pub fn level(&self) -> usize {
        self.lhs.len() + self.rhs.len()
    }
}

impl std::fmt::Display for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let side = |side: &[Modality]| {
            side.iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(
            f,
            "({}) ~ ({}) {:.6} x{}",
            side(&self.lhs),
            side(&self.rhs),
            self.score,
            self.cardinality
        )
    }
}

/// every pairing score at one cache level, for the bipartitions that
/// survived the mutual-information gate, sorted ascending.
///
/// Joint modalities whose marginals fall under the minimum support t_α
/// are dropped before scoring. The stable sort makes a pairing's index
/// its per-level rank.
pub struct Pairings {
    level: usize,
    t_alpha: Count,
    scores: Vec<Pairing>,
}

impl Pairings {
    pub fn new(cache: &Cache, level: usize, t_alpha: Count, keep: &[Bipartition]) -> Self {
        let mut scores = Vec::new();
        if cache.is_empty() {
            return Self { level, t_alpha, scores };
        }
        let n = cache.len();
        for (combo, table) in cache.level(level) {
            for (xs, ys) in bipartitions(level) {
                let lhs = xs.iter().map(|&p| combo[p]).collect::<Vec<usize>>();
                let rhs = ys.iter().map(|&p| combo[p]).collect::<Vec<usize>>();
                let split = Bipartition { lhs, rhs };
                if !keep.contains(&split) {
                    continue;
                }
                for (values, &c) in table {
                    let a = xs.iter().map(|&p| values[p]).collect::<Vec<usize>>();
                    let b = ys.iter().map(|&p| values[p]).collect::<Vec<usize>>();
                    let cx = cache.count(&split.lhs, &a);
                    let cy = cache.count(&split.rhs, &b);
                    if cx < t_alpha || cy < t_alpha {
                        continue;
                    }
                    let score = (c + 1) as Ratio * (n + 2) as Ratio
                        / ((cx + 1) as Ratio * (cy + 1) as Ratio);
                    scores.push(Pairing {
                        lhs: split
                            .lhs
                            .iter()
                            .zip(a.iter())
                            .map(|(&field, &value)| Modality { field, value })
                            .collect(),
                        rhs: split
                            .rhs
                            .iter()
                            .zip(b.iter())
                            .map(|(&field, &value)| Modality { field, value })
                            .collect(),
                        score,
                        cardinality: c,
                    });
                }
            }
        }
        scores.sort_by(|a, b| a.score.partial_cmp(&b.score).expect("finite score"));
        Self { level, t_alpha, scores }
    }

    pub fn level(&self) -> usize {
        self.level
    }
    pub fn t_alpha(&self) -> Count {
        self.t_alpha
    }
    /// ascending by score; index is the per-level rank
    pub fn scores(&self) -> &[Pairing] {
        &self.scores
    }
    /// head of the ranking
    pub fn top(&self, firsts_n: usize) -> &[Pairing] {
        &self.scores[..firsts_n.min(self.scores.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::table::RecordTable;
    use crate::tree::tree::AdTree;

    fn pairings(rows: Vec<Vec<usize>>, t_alpha: Count) -> Pairings {
        let ref table = RecordTable::new(vec![2, 2], rows).unwrap();
        let tree = AdTree::new(table).unwrap();
        let cache = Cache::new(&tree, 2).unwrap();
        let keep = vec![Bipartition { lhs: vec![0], rhs: vec![1] }];
        Pairings::new(&cache, 2, t_alpha, &keep)
    }

    #[test]
    fn uniform_scores_are_flat() {
        // every joint cell of the uniform table scores 12/9
        let scored = pairings(
            vec![vec![1, 1], vec![1, 2], vec![2, 1], vec![2, 2]],
            1,
        );
        assert_eq!(scored.scores().len(), 4);
        for pairing in scored.scores() {
            assert!((pairing.score - 12.0 / 9.0).abs() < 1e-12);
            assert_eq!(pairing.cardinality, 1);
        }
    }

    #[test]
    fn correlated_joints_score_two_and_absent_cells_never_appear() {
        let scored = pairings(
            vec![vec![1, 1], vec![1, 1], vec![2, 2], vec![2, 2]],
            1,
        );
        assert_eq!(scored.scores().len(), 2);
        for pairing in scored.scores() {
            assert!((pairing.score - 2.0).abs() < 1e-12);
            assert_eq!(pairing.cardinality, 2);
            assert_eq!(pairing.lhs[0].value, pairing.rhs[0].value);
        }
    }

    #[test]
    fn support_cutoff_drops_rare_marginals() {
        // marginals are all 2 or 3; t_alpha = 3 keeps only cells whose
        // both marginals reach 3
        let scored = pairings(
            vec![vec![1, 1], vec![1, 1], vec![2, 2], vec![2, 2], vec![1, 1]],
            3,
        );
        for pairing in scored.scores() {
            assert_eq!(pairing.lhs[0].value, 1);
            assert_eq!(pairing.rhs[0].value, 1);
        }
        assert_eq!(scored.scores().len(), 1);
    }

    #[test]
    fn score_is_symmetric_under_side_swap() {
        // recomputing each score with the marginal roles exchanged must
        // change nothing
        let ref table = RecordTable::new(
            vec![2, 2],
            vec![vec![1, 1], vec![1, 2], vec![2, 1], vec![1, 1]],
        )
        .unwrap();
        let tree = AdTree::new(table).unwrap();
        let cache = Cache::new(&tree, 2).unwrap();
        let keep = vec![Bipartition { lhs: vec![0], rhs: vec![1] }];
        let scored = Pairings::new(&cache, 2, 1, &keep);
        let n = cache.len();
        for pairing in scored.scores() {
            let cx = cache.count(&[pairing.lhs[0].field], &[pairing.lhs[0].value]);
            let cy = cache.count(&[pairing.rhs[0].field], &[pairing.rhs[0].value]);
            let swapped = (pairing.cardinality + 1) as f64 * (n + 2) as f64
                / ((cy + 1) as f64 * (cx + 1) as f64);
            assert_eq!(pairing.score, swapped);
        }
    }

    #[test]
    fn gated_bipartitions_produce_nothing() {
        let scored = {
            let ref table = RecordTable::new(vec![2, 2], vec![vec![1, 1], vec![2, 2]]).unwrap();
            let tree = AdTree::new(table).unwrap();
            let cache = Cache::new(&tree, 2).unwrap();
            Pairings::new(&cache, 2, 1, &[])
        };
        assert!(scored.scores().is_empty());
    }

    #[test]
    fn top_clamps_to_the_list() {
        let scored = pairings(vec![vec![1, 1], vec![2, 2]], 1);
        assert_eq!(scored.top(100).len(), scored.scores().len());
        assert_eq!(scored.top(1).len(), 1);
    }
}
