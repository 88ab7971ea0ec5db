use crate::error::Error;
use crate::mining::combos::combinations;
use crate::mining::contingency::ContingencyTable;
use crate::records::source::Records;
use crate::tree::tree::AdTree;
use crate::Count;
use std::collections::BTreeMap;

/// sparse joint-count table of one attribute subset
pub type Table = BTreeMap<Vec<usize>, Count>;

/// every contingency table for every attribute subset up to a maximum
/// size, built level by level from the AD-tree and read-only afterwards.
///
/// Level k holds one table per k-combination of attributes, keyed by the
/// ascending combination, combinations in lexicographic order. For any
/// S' ⊆ S the counts of S sum exactly to the counts of S'; the scorers
/// lean on that identity for their marginals.
pub struct Cache {
    len: Count,
    fields: usize,
    levels: Vec<BTreeMap<Vec<usize>, Table>>,
}

impl Cache {
    pub fn new<R: Records>(tree: &AdTree<'_, R>, max_level: usize) -> Result<Self, Error> {
        if max_level == 0 {
            return Err(Error::Query("maximum level must be at least 1".into()));
        }
        let fields = tree.records().fields();
        let mut levels = Vec::with_capacity(max_level);
        for k in 1..=max_level {
            log::info!("{:<32}{:<32}", "building cache level", k);
            let mut level = BTreeMap::new();
            for combo in combinations(fields, k) {
                let table = ContingencyTable::new(tree, &combo)?.table();
                level.insert(combo, table);
            }
            levels.push(level);
        }
        Ok(Self {
            len: tree.len(),
            fields,
            levels,
        })
    }

    /// total record count N
    pub fn len(&self) -> Count {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn fields(&self) -> usize {
        self.fields
    }
    /// deepest cached level
    pub fn depth(&self) -> usize {
        self.levels.len()
    }
    /// all subsets of one size with their tables
    pub fn level(&self, k: usize) -> &BTreeMap<Vec<usize>, Table> {
        &self.levels[k - 1]
    }
    /// table of one subset, if cached; the key must be ascending
    pub fn table(&self, fields: &[usize]) -> Option<&Table> {
        self.levels
            .get(fields.len().wrapping_sub(1))
            .and_then(|level| level.get(fields))
    }
    /// cached joint count of one coordinate, 0 when absent
    pub fn count(&self, fields: &[usize], values: &[usize]) -> Count {
        self.table(fields)
            .and_then(|table| table.get(values))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::table::RecordTable;
    use crate::Arbitrary;

    fn uniform() -> RecordTable {
        RecordTable::new(
            vec![2, 2],
            vec![vec![1, 1], vec![1, 2], vec![2, 1], vec![2, 2]],
        )
        .unwrap()
    }

    #[test]
    fn uniform_marginals_and_joints() {
        let ref table = uniform();
        let tree = AdTree::new(table).unwrap();
        let cache = Cache::new(&tree, 2).unwrap();
        for f in 0..2 {
            for v in 1..=2 {
                assert_eq!(cache.count(&[f], &[v]), 2);
            }
        }
        for a in 1..=2 {
            for b in 1..=2 {
                assert_eq!(cache.count(&[0, 1], &[a, b]), 1);
            }
        }
        assert_eq!(cache.table(&[0]).unwrap().len(), 2);
        assert_eq!(cache.table(&[0, 1]).unwrap().len(), 4);
    }

    #[test]
    fn zero_cells_are_omitted() {
        // perfect correlation plus one extra (1, 1): the (2, 1) cell must
        // stay absent while every marginal identity still holds
        let ref table = RecordTable::new(
            vec![2, 2],
            vec![vec![1, 1], vec![1, 1], vec![2, 2], vec![2, 2], vec![1, 1]],
        )
        .unwrap();
        let tree = AdTree::new(table).unwrap();
        let cache = Cache::new(&tree, 2).unwrap();
        let joint = cache.table(&[0, 1]).unwrap();
        assert_eq!(joint.get(&vec![1, 1]), Some(&3));
        assert_eq!(joint.get(&vec![2, 2]), Some(&2));
        assert_eq!(joint.get(&vec![2, 1]), None);
        assert_eq!(joint.get(&vec![1, 2]), None);
        assert_eq!(cache.count(&[0], &[1]), 3);
        assert_eq!(cache.count(&[1], &[1]), 3);
    }

    #[test]
    fn every_level_sums_to_n() {
        for _ in 0..8 {
            let ref table = RecordTable::random();
            let tree = AdTree::new(table).unwrap();
            let cache = Cache::new(&tree, table.fields().min(3)).unwrap();
            for k in 1..=cache.depth() {
                for table_ in cache.level(k).values() {
                    let total: Count = table_.values().sum();
                    assert_eq!(total, cache.len());
                }
            }
        }
    }

    #[test]
    fn marginalization_is_exact() {
        // cache[S'][b] must equal the sum over cache[S] rows agreeing with b
        for _ in 0..8 {
            let ref table = RecordTable::random();
            let tree = AdTree::new(table).unwrap();
            let depth = table.fields().min(3);
            let cache = Cache::new(&tree, depth).unwrap();
            for k in 2..=depth {
                for (combo, joint) in cache.level(k) {
                    for (sub, marginal) in cache.level(k - 1) {
                        let positions = sub
                            .iter()
                            .map(|f| combo.iter().position(|g| g == f))
                            .collect::<Option<Vec<usize>>>();
                        let Some(positions) = positions else { continue };
                        for (values, count) in marginal {
                            let total: Count = joint
                                .iter()
                                .filter(|(coordinate, _)| {
                                    positions
                                        .iter()
                                        .zip(values.iter())
                                        .all(|(&p, &v)| coordinate[p] == v)
                                })
                                .map(|(_, c)| c)
                                .sum();
                            assert_eq!(total, *count);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn empty_dataset_caches_empty_tables() {
        let ref table = RecordTable::new(vec![2, 3], vec![]).unwrap();
        let tree = AdTree::new(table).unwrap();
        let cache = Cache::new(&tree, 2).unwrap();
        assert!(cache.is_empty());
        for k in 1..=2 {
            for table_ in cache.level(k).values() {
                assert!(table_.is_empty());
            }
        }
    }
}
