use crate::mining::pairing::Pairing;

/// pairings that share an underlying combined modality set, pulled
/// together across bipartitions and levels so one anomalous joint shows
/// up once in the report instead of once per partition.
#[derive(Debug, Clone)]
pub struct PairingGroup {
    /// members with their rank inside their own level's head
    pub members: Vec<(Pairing, usize)>,
    /// best (smallest) rank among the members
    pub score: usize,
}

/// collapse the top `firsts_n` pairings of each level into groups.
///
/// Levels are walked ascending. Each unconsumed pairing seeds a group,
/// absorbs every other unconsumed pairing of its level whose combined
/// modalities contain the seed's, then sweeps the higher levels the same
/// way; absorbed pairings never seed groups of their own. Groups come
/// back sorted by their best rank.
pub fn collapse(levels: &[(usize, &[Pairing])], firsts_n: usize) -> Vec<PairingGroup> {
    let mut pools = levels
        .iter()
        .map(|(level, scores)| {
            let head = scores
                .iter()
                .take(firsts_n)
                .cloned()
                .enumerate()
                .map(Some)
                .collect::<Vec<Option<(usize, Pairing)>>>();
            (*level, head)
        })
        .collect::<Vec<_>>();
    pools.sort_by_key(|(level, _)| *level);
    let mut groups = Vec::new();
    for i in 0..pools.len() {
        for s in 0..pools[i].1.len() {
            let Some((rank, seed)) = pools[i].1[s].take() else {
                continue;
            };
            let key = seed.combined();
            let mut members = vec![(seed, rank)];
            for pool in i..pools.len() {
                for slot in 0..pools[pool].1.len() {
                    if let Some((r, other)) = &pools[pool].1[slot] {
                        if key.is_subset(&other.combined()) {
                            members.push((other.clone(), *r));
                            pools[pool].1[slot] = None;
                        }
                    }
                }
            }
            let score = members.iter().map(|(_, r)| *r).min().unwrap_or(rank);
            groups.push(PairingGroup { members, score });
        }
    }
    groups.sort_by_key(|group| group.score);
    groups
}
