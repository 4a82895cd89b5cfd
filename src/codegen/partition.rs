//! Pair enumeration and clique partitioning.

use std::ops::Range;

/// Pairs `(i, j)` with `i < j < n`, in lexicographic order.
pub fn combinations(n: u64) -> impl Iterator<Item = (u64, u64)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Splits `0..n` into `k` contiguous groups whose sizes differ by at most one,
/// larger groups first.
pub fn groups(n: u64, k: u64) -> Vec<Range<u64>> {
    assert!(k > 0 && n >= k, "cannot split {n} slots into {k} groups");
    let base = n / k;
    let extra = n % k;
    (0..k)
        .map(|g| {
            let start = g * base + g.min(extra);
            let len = base + u64::from(g < extra);
            start..start + len
        })
        .collect()
}

/// Slot indices of every union of two groups; one clique per pair of groups.
///
/// Every pair of slots lands together in at least one clique, so the cliques
/// being pairwise distinct proves all `n` slots are.
pub fn cliques(n: u64, k: u64) -> Vec<Vec<u64>> {
    let groups = groups(n, k);
    combinations(k)
        .map(|(a, b)| {
            groups[a as usize]
                .clone()
                .chain(groups[b as usize].clone())
                .collect()
        })
        .collect()
}
