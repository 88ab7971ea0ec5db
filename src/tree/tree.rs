use crate::error::Error;
use crate::records::source::Records;
use crate::tree::node::AdNode;
use crate::tree::node::VaryNode;
use crate::Count;

/// sparse All-Dimensions tree over a record table.
///
/// Precomputes the count of every conjunctive query over ascending
/// attribute ranges, with the most common value of each partition elided
/// and reconstructed by subtraction at query time. Nodes are write-once
/// arena entries with children stored as contiguous index spans. Sealed
/// on return from `new`: the only handle is immutable, so queries can be
/// shared across threads freely.
pub struct AdTree<'a, R: Records> {
    records: &'a R,
    nodes: Vec<AdNode>,
    varys: Vec<VaryNode>,
    slots: Vec<Option<usize>>,
    root: usize,
}

impl<'a, R: Records> AdTree<'a, R> {
    pub fn new(records: &'a R) -> Result<Self, Error> {
        if records.fields() == 0 {
            return Err(Error::Construction("empty attribute list".into()));
        }
        if records.len() as u128 >= crate::RECORD_LIMIT {
            return Err(Error::Saturation(format!("{} records", records.len())));
        }
        for j in 0..records.fields() {
            if records.arity(j) == 0 {
                return Err(Error::Construction(format!("attribute {} has arity 0", j)));
            }
            if records.arity(j) >= crate::ARITY_LIMIT {
                return Err(Error::Saturation(format!(
                    "attribute {} arity {}",
                    j,
                    records.arity(j)
                )));
            }
        }
        let mut nodes = Vec::new();
        let mut varys = Vec::new();
        let mut slots = Vec::new();
        let root = match records.len() {
            // an empty dataset seals to a bare zero root with no Vary children
            0 => {
                nodes.push(AdNode {
                    count: 0,
                    start: 0,
                    varys: 0,
                });
                0
            }
            n => {
                let rows = (0..n).collect::<Vec<usize>>();
                grow(records, &mut nodes, &mut varys, &mut slots, 0, &rows)
            }
        };
        Ok(Self {
            records,
            nodes,
            varys,
            slots,
            root,
        })
    }

    pub fn records(&self) -> &R {
        self.records
    }
    /// total record count N
    pub fn len(&self) -> Count {
        self.nodes[self.root].count
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub(crate) fn root(&self) -> usize {
        self.root
    }
    pub(crate) fn count(&self, node: usize) -> Count {
        self.nodes[node].count
    }
    /// Vary child of a node for one of its free attributes
    pub(crate) fn vary(&self, node: usize, field: usize) -> &VaryNode {
        let node = &self.nodes[node];
        debug_assert!(field >= node.start && field < self.records.fields());
        &self.varys[node.varys + field - node.start]
    }
    /// AD child of a Vary node at one value; None is the zero node
    pub(crate) fn slot(&self, vary: &VaryNode, value: usize) -> Option<usize> {
        self.slots[vary.slots + value - 1]
    }
}

/// build one AD-node over `rows` with the free attributes start..; the
/// Vary span is reserved up front so each parent's children stay contiguous
fn grow<R: Records>(
    records: &R,
    nodes: &mut Vec<AdNode>,
    varys: &mut Vec<VaryNode>,
    slots: &mut Vec<Option<usize>>,
    start: usize,
    rows: &[usize],
) -> usize {
    let fields = records.fields();
    let id = nodes.len();
    let span = varys.len();
    nodes.push(AdNode {
        count: rows.len() as Count,
        start,
        varys: span,
    });
    for _ in start..fields {
        varys.push(VaryNode { mcv: 0, slots: 0 });
    }
    for j in start..fields {
        let arity = records.arity(j);
        let mut buckets = vec![Vec::new(); arity];
        for &row in rows {
            buckets[records.value(row, j) - 1].push(row);
        }
        // most common value, ties broken by the smallest value
        let mut mcv = 1;
        for (v, bucket) in buckets.iter().enumerate().skip(1) {
            if bucket.len() > buckets[mcv - 1].len() {
                mcv = v + 1;
            }
        }
        let offset = slots.len();
        slots.extend(std::iter::repeat(None).take(arity));
        varys[span + j - start] = VaryNode { mcv, slots: offset };
        for (v, bucket) in buckets.iter().enumerate() {
            if v + 1 != mcv && !bucket.is_empty() {
                let child = grow(records, nodes, varys, slots, j + 1, bucket);
                slots[offset + v] = Some(child);
            }
        }
    }
    id
}
