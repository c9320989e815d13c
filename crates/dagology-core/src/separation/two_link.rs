//! Two-link spacelike distances (Rideout 2009).
//!
//! For an incomparable pair `(i, j)`:
//!
//! - `F` = elements one link above both (`LP[i, w] = LP[j, w] = 1`),
//! - `P` = the common past of `i` and `j`.
//!
//! For each `w ∈ F` take the smallest positive `LP[z, w]` over `z ∈ P`
//! (starting from `dmax`), then average over `F`. With `F` empty the
//! distance is `dmax`.

use tracing::instrument;

use crate::order::LongestPathMatrix;
use crate::separation::{CausalSets, SeparationMatrix, build_separations, intersection};

/// Build the two-link separation matrix from longest paths.
#[must_use]
#[instrument(skip(lp), fields(n = lp.len()))]
pub fn two_link_spacelike_matrix(lp: &LongestPathMatrix, dmax: Option<u32>) -> SeparationMatrix {
    let cap = dmax.unwrap_or_else(|| lp.diameter());
    let sets = CausalSets::new(lp);
    let links: Vec<_> = (0..lp.len()).map(|i| lp.link_future(i)).collect();

    build_separations(lp, |i, j| {
        let shared_links = intersection(&links[i], &links[j]);
        let link_count = shared_links.count_ones(..);
        if link_count == 0 {
            return f64::from(cap);
        }

        let common_past = intersection(&sets.past[i], &sets.past[j]);
        let total: f64 = shared_links
            .ones()
            .map(|w| {
                let nearest = common_past
                    .ones()
                    .map(|z| lp.get(z, w))
                    .filter(|&z_w| z_w > 0)
                    .fold(cap, u32::min);
                f64::from(nearest)
            })
            .sum();

        total / link_count as f64
    })
}
