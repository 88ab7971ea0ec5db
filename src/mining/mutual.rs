use crate::mining::cache::Cache;
use crate::mining::combos::bipartitions;
use crate::mining::elbow::elbow;
use crate::Information;

/// ordered split of an attribute subset into two halves
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bipartition {
    pub lhs: Vec<usize>,
    pub rhs: Vec<usize>,
}

/// mutual information of every ordered bipartition of every subset at
/// one cache level, sorted ascending.
///
/// I(X; Y) = Σ (c / N) ln(N c / (c_X c_Y)) over the non-zero joint
/// cells; zero cells are absent from the cache and contribute nothing.
/// The sort is stable, so equal values keep their production order
/// (subsets lexicographic, bipartitions in mask order), which downstream
/// ranks treat as part of the contract.
pub struct MutualInfo {
    level: usize,
    scores: Vec<(Bipartition, Information)>,
}

impl MutualInfo {
    pub fn new(cache: &Cache, level: usize) -> Self {
        let mut scores = Vec::new();
        if cache.is_empty() {
            return Self { level, scores };
        }
        let n = cache.len() as f64;
        for (combo, table) in cache.level(level) {
            for (xs, ys) in bipartitions(level) {
                let lhs = xs.iter().map(|&p| combo[p]).collect::<Vec<usize>>();
                let rhs = ys.iter().map(|&p| combo[p]).collect::<Vec<usize>>();
                let mut info = 0.0;
                for (values, &c) in table {
                    let a = xs.iter().map(|&p| values[p]).collect::<Vec<usize>>();
                    let b = ys.iter().map(|&p| values[p]).collect::<Vec<usize>>();
                    let cx = cache.count(&lhs, &a) as f64;
                    let cy = cache.count(&rhs, &b) as f64;
                    info += (c as f64 / n) * ((n * c as f64) / (cx * cy)).ln();
                }
                scores.push((Bipartition { lhs, rhs }, info));
            }
        }
        scores.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("finite information"));
        Self { level, scores }
    }

    pub fn level(&self) -> usize {
        self.level
    }
    pub fn scores(&self) -> &[(Bipartition, Information)] {
        &self.scores
    }
    pub fn curve(&self) -> Vec<Information> {
        self.scores.iter().map(|(_, i)| *i).collect()
    }
    /// bipartitions whose information clears the threshold
    pub fn keep(&self, mu: Information) -> Vec<Bipartition> {
        self.scores
            .iter()
            .filter(|(_, i)| *i >= mu)
            .map(|(b, _)| b.clone())
            .collect()
    }
    /// threshold picked by the elbow of the sorted curve, if one exists
    pub fn threshold(&self, prominence: f64, separation: Option<usize>) -> Option<Information> {
        elbow(&self.curve(), prominence, separation).map(|i| self.scores[i].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::table::RecordTable;
    use crate::tree::tree::AdTree;

    fn mined(rows: Vec<Vec<usize>>) -> Cache {
        let ref table = RecordTable::new(vec![2, 2], rows).unwrap();
        let tree = AdTree::new(table).unwrap();
        Cache::new(&tree, 2).unwrap()
    }

    #[test]
    fn independence_scores_zero() {
        // uniform joint over two fair coins factorizes exactly
        let cache = mined(vec![vec![1, 1], vec![1, 2], vec![2, 1], vec![2, 2]]);
        let mutual = MutualInfo::new(&cache, 2);
        assert_eq!(mutual.scores().len(), 1);
        let (split, info) = &mutual.scores()[0];
        assert_eq!(split, &Bipartition { lhs: vec![0], rhs: vec![1] });
        assert!(info.abs() < 1e-12);
    }

    #[test]
    fn perfect_correlation_scores_ln_two() {
        let cache = mined(vec![vec![1, 1], vec![1, 1], vec![2, 2], vec![2, 2]]);
        let mutual = MutualInfo::new(&cache, 2);
        let (_, info) = &mutual.scores()[0];
        assert!((info - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn information_is_never_negative() {
        use crate::Arbitrary;
        for _ in 0..16 {
            let ref table = RecordTable::random();
            let tree = AdTree::new(table).unwrap();
            let cache = Cache::new(&tree, 2).unwrap();
            let mutual = MutualInfo::new(&cache, 2);
            for (_, info) in mutual.scores() {
                assert!(*info > -1e-9);
            }
        }
    }

    #[test]
    fn degenerate_arity_one_column_scores_zero() {
        let ref table = RecordTable::new(vec![1, 3], vec![vec![1, 1], vec![1, 2], vec![1, 3]]).unwrap();
        let tree = AdTree::new(table).unwrap();
        let cache = Cache::new(&tree, 2).unwrap();
        let mutual = MutualInfo::new(&cache, 2);
        for (_, info) in mutual.scores() {
            assert!(info.abs() < 1e-12);
        }
    }

    #[test]
    fn empty_dataset_produces_no_scores() {
        let cache = mined(vec![]);
        let mutual = MutualInfo::new(&cache, 2);
        assert!(mutual.scores().is_empty());
        assert!(mutual.keep(0.0).is_empty());
    }

    #[test]
    fn keep_respects_the_threshold() {
        let cache = mined(vec![vec![1, 1], vec![1, 1], vec![2, 2], vec![2, 2]]);
        let mutual = MutualInfo::new(&cache, 2);
        assert_eq!(mutual.keep(0.0).len(), 1);
        assert_eq!(mutual.keep(1.0).len(), 0);
    }
}
