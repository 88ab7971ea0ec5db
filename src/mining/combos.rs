/// all k-subsets of 0..n in lexicographic order
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return Vec::new();
    }
    let mut all = Vec::new();
    let mut combo = (0..k).collect::<Vec<usize>>();
    loop {
        all.push(combo.clone());
        // advance the rightmost index that still has room
        let mut i = k;
        while i > 0 {
            i -= 1;
            if combo[i] + 1 <= n - k + i {
                combo[i] += 1;
                for j in i + 1..k {
                    combo[j] = combo[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                return all;
            }
        }
    }
}

/// every ordered bipartition of the positions 0..n into two non-empty
/// disjoint parts, position 0 always on the left so the X/Y symmetric
/// twin never appears. Enumerated by binary mask, mask ascending, the
/// most significant mask bit governing position 1. This production
/// order is the tie-break contract downstream sorts rely on.
pub fn bipartitions(n: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut all = Vec::new();
    if n < 2 {
        return all;
    }
    let width = n - 1;
    for mask in 1..(1usize << width) {
        let mut lhs = vec![0];
        let mut rhs = Vec::new();
        for position in 1..n {
            if mask >> (width - position) & 1 == 1 {
                rhs.push(position);
            } else {
                lhs.push(position);
            }
        }
        all.push((lhs, rhs));
    }
    all
}
