use crate::error::Error;
use crate::records::source::Records;
use crate::tree::tree::AdTree;
use crate::Count;
use std::collections::BTreeMap;

/// one cell of the ragged count tensor: a collapsed zero, a leaf count,
/// or the id of a nested row in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Zero,
    Count(Count),
    Nest(usize),
}

impl Cell {
    fn scalar(&self) -> Count {
        match self {
            Self::Zero => 0,
            Self::Count(c) => *c,
            Self::Nest(_) => unreachable!("scalar read on an interior cell"),
        }
    }
}

/// work items for the single stack-driven walk over the AD-tree
enum Frame {
    /// materialize an AD-node's counts into one row of cells
    Expand { ad: usize, depth: usize, row: usize },
    /// write an AD-node's count into a leaf cell
    Leaf { ad: usize, row: usize, cell: usize },
    /// scheduled before a row's children so it pops after all of them:
    /// subtract every non-MCV sibling from the MCV slot
    Fixup { row: usize, depth: usize, mcv: usize },
}

/// joint-count table over an ordered subset of attributes, materialized
/// from the AD-tree in one pass.
///
/// The walk runs over the ascending ordering of the attributes (a Vary
/// child for attribute j only exists in nodes whose subrange reaches j);
/// coordinates are re-mapped to the caller's order on every read, so any
/// permutation of the same subset yields the same counts.
pub struct ContingencyTable {
    fields: Vec<usize>,
    arities: Vec<usize>,
    asc: Vec<usize>,
    rows: Vec<Vec<Cell>>,
}

impl ContingencyTable {
    pub fn new<R: Records>(tree: &AdTree<'_, R>, fields: &[usize]) -> Result<Self, Error> {
        let records = tree.records();
        if fields.is_empty() {
            return Err(Error::Query("empty attribute subset".into()));
        }
        for (i, &f) in fields.iter().enumerate() {
            if f >= records.fields() {
                return Err(Error::Query(format!("unknown attribute {}", f)));
            }
            if fields[..i].contains(&f) {
                return Err(Error::Query(format!("duplicate attribute {}", f)));
            }
        }
        let k = fields.len();
        let mut asc = (0..k).collect::<Vec<usize>>();
        asc.sort_by_key(|&p| fields[p]);
        let walk = asc.iter().map(|&p| fields[p]).collect::<Vec<usize>>();
        let spans = walk.iter().map(|&f| records.arity(f)).collect::<Vec<usize>>();
        let mut rows = vec![vec![Cell::Zero; spans[0]]];
        if !tree.is_empty() {
            let mut stack = vec![Frame::Expand {
                ad: tree.root(),
                depth: 0,
                row: 0,
            }];
            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Expand { ad, depth, row } => {
                        let vary = tree.vary(ad, walk[depth]);
                        let mcv = vary.mcv;
                        stack.push(Frame::Fixup { row, depth, mcv });
                        // descending pushes pop back in ascending value order;
                        // the MCV slot receives this same node one level deeper
                        for v in (1..=spans[depth]).rev() {
                            let child = match v == mcv {
                                true => Some(ad),
                                false => tree.slot(vary, v),
                            };
                            if let Some(child) = child {
                                if depth + 1 < k {
                                    let nest = rows.len();
                                    rows.push(vec![Cell::Zero; spans[depth + 1]]);
                                    rows[row][v - 1] = Cell::Nest(nest);
                                    stack.push(Frame::Expand {
                                        ad: child,
                                        depth: depth + 1,
                                        row: nest,
                                    });
                                } else {
                                    stack.push(Frame::Leaf {
                                        ad: child,
                                        row,
                                        cell: v - 1,
                                    });
                                }
                            }
                        }
                    }
                    Frame::Leaf { ad, row, cell } => {
                        rows[row][cell] = Cell::Count(tree.count(ad));
                    }
                    Frame::Fixup { row, depth, mcv } => {
                        if depth + 1 == k {
                            let spill: Count = rows[row]
                                .iter()
                                .enumerate()
                                .filter(|(i, _)| *i != mcv - 1)
                                .map(|(_, c)| c.scalar())
                                .sum();
                            let rest = rows[row][mcv - 1].scalar() - spill;
                            rows[row][mcv - 1] = match rest {
                                0 => Cell::Zero,
                                c => Cell::Count(c),
                            };
                        } else {
                            for v in 1..=spans[depth] {
                                if v == mcv {
                                    continue;
                                }
                                if let (Cell::Nest(a), Cell::Nest(b)) =
                                    (rows[row][mcv - 1], rows[row][v - 1])
                                {
                                    if subtract(&mut rows, a, b, depth + 1, k) {
                                        rows[row][mcv - 1] = Cell::Zero;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(Self {
            fields: fields.to_vec(),
            arities: fields.iter().map(|&f| records.arity(f)).collect(),
            asc,
            rows,
        })
    }

    /// attribute subset in the caller's order
    pub fn fields(&self) -> &[usize] {
        &self.fields
    }
    pub fn arities(&self) -> &[usize] {
        &self.arities
    }

    /// joint count of one full coordinate, absent cells counting 0
    pub fn count(&self, query: &[usize]) -> Result<Count, Error> {
        if query.len() != self.fields.len() {
            return Err(Error::Query(format!(
                "{} coordinates for {} attributes",
                query.len(),
                self.fields.len()
            )));
        }
        for (i, &v) in query.iter().enumerate() {
            if v == 0 || v > self.arities[i] {
                return Err(Error::Query(format!(
                    "value {} outside 1..={}",
                    v, self.arities[i]
                )));
            }
        }
        let k = self.fields.len();
        let mut row = 0;
        for (p, &at) in self.asc.iter().enumerate() {
            match self.rows[row][query[at] - 1] {
                Cell::Zero => return Ok(0),
                Cell::Count(c) => {
                    debug_assert!(p + 1 == k);
                    return Ok(c);
                }
                Cell::Nest(nest) => row = nest,
            }
        }
        Ok(0)
    }

    /// sparse map from coordinates (caller's order) to non-zero counts
    pub fn table(&self) -> BTreeMap<Vec<usize>, Count> {
        let mut out = BTreeMap::new();
        let mut prefix = Vec::with_capacity(self.fields.len());
        self.collect(0, &mut prefix, &mut out);
        out
    }

    fn collect(
        &self,
        row: usize,
        prefix: &mut Vec<usize>,
        out: &mut BTreeMap<Vec<usize>, Count>,
    ) {
        for (i, cell) in self.rows[row].iter().enumerate() {
            match cell {
                Cell::Zero => {}
                Cell::Count(c) => {
                    prefix.push(i + 1);
                    let mut coordinate = vec![0; prefix.len()];
                    for (p, &at) in self.asc.iter().enumerate() {
                        coordinate[at] = prefix[p];
                    }
                    out.insert(coordinate, *c);
                    prefix.pop();
                }
                Cell::Nest(nest) => {
                    prefix.push(i + 1);
                    self.collect(*nest, prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}

/// elementwise subtraction of one subtree from its MCV sibling, returning
/// whether the MCV subtree is now entirely zero. A subtree that vanishes
/// collapses to the scalar zero so later lookups short-circuit.
fn subtract(rows: &mut Vec<Vec<Cell>>, a: usize, b: usize, depth: usize, k: usize) -> bool {
    let siblings = rows[b].clone();
    let mut vanished = true;
    for (i, other) in siblings.iter().enumerate() {
        if depth + 1 == k {
            let rest = rows[a][i].scalar() - other.scalar();
            rows[a][i] = match rest {
                0 => Cell::Zero,
                c => Cell::Count(c),
            };
            vanished &= rest == 0;
        } else {
            match (rows[a][i], *other) {
                (Cell::Zero, _) => {}
                (Cell::Nest(an), Cell::Nest(bn)) => {
                    let zero = subtract(rows, an, bn, depth + 1, k);
                    if zero {
                        rows[a][i] = Cell::Zero;
                    }
                    vanished &= zero;
                }
                // nothing to subtract; the aggregate still holds counts
                (Cell::Nest(_), Cell::Zero) => vanished = false,
                _ => unreachable!("leaf count above the leaf depth"),
            }
        }
    }
    vanished
}
