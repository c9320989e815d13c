use dagology_core::order::OrderMatrix;
use proptest::prelude::*;

/// Random acyclic relation on up to `max_n` elements.
///
/// Edges only go from lower to higher index, then the element labels are
/// permuted so index order does not imply causal order.
pub fn arb_order(max_n: usize) -> impl Strategy<Value = OrderMatrix> {
    (1..=max_n)
        .prop_flat_map(|n| {
            let pairs = n * (n - 1) / 2;
            (
                Just(n),
                proptest::collection::vec(prop::bool::weighted(0.3), pairs),
                Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            )
        })
        .prop_map(|(n, bits, labels)| {
            let mut relation = OrderMatrix::new(n);
            let mut bit = bits.into_iter();
            for i in 0..n {
                for j in i + 1..n {
                    if bit.next().unwrap_or(false) {
                        relation
                            .insert(labels[i], labels[j])
                            .expect("labels are a permutation");
                    }
                }
            }
            relation
        })
}

/// Chain `0 → 1 → … → n-1`.
#[allow(dead_code)]
pub fn chain(n: usize) -> OrderMatrix {
    OrderMatrix::from_edges(n, (0..n.saturating_sub(1)).map(|i| (i, i + 1))).expect("chain")
}
