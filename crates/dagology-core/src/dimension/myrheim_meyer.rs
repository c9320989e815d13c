//! Myrheim–Meyer dimension.
//!
//! # Algorithm
//!
//! For N elements sprinkled into an interval of D-dimensional Minkowski
//! space, the expected number of k-chains per `N^k` is
//!
//! ```text
//!            Γ(D/2) · Γ(D) · Γ(D+1)^(k-1)
//! f(D, k) = ─────────────────────────────────────────
//!           2^(k-1) · k · Γ(kD/2) · Γ((k+1)D/2)
//! ```
//!
//! which reduces to `Γ(D+1)Γ(D/2) / (4Γ(3D/2))` for k = 2. The estimate
//! inverts `f` by scanning `D = 1.00, 1.01, …, 9.99` and returning the
//! first grid point whose `f` drops below the observed fraction `S_k/N^k`,
//! or [`D_MAX`] when none does.

use tracing::{debug, instrument, warn};

use crate::cache::{D_MAX, LookupCache, LookupEntry, LookupTable};
use crate::error::{DagologyError, Result};
use crate::order::{OrderMatrix, count_chains, ordering_fraction};

const GRID_STEP: f64 = 0.01;
const GRID_POINTS: u32 = 900;

fn dimension_grid() -> impl Iterator<Item = f64> {
    (0..GRID_POINTS).map(|i| GRID_STEP.mul_add(f64::from(i), 1.0))
}

fn gamma(x: f64) -> f64 {
    libm::tgamma(x)
}

fn ln_gamma(x: f64) -> f64 {
    libm::lgamma(x)
}

/// Expected ordering fraction `S_k / N^k` in `d` dimensions.
///
/// Evaluated directly while the gamma products stay finite, otherwise in
/// log space.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidDimension`] for `d < 1` (or NaN) and
/// [`DagologyError::InvalidChainLength`] for `k < 2`.
pub fn myrheim_meyer_formula(d: f64, k: usize) -> Result<f64> {
    if d.is_nan() || d < 1.0 {
        return Err(DagologyError::InvalidDimension(d));
    }
    if k < 2 {
        return Err(DagologyError::InvalidChainLength(k));
    }

    let kf = k as f64;
    let extra = i32::try_from(k - 1).unwrap_or(i32::MAX);

    let top = gamma(d / 2.0) * gamma(d) * gamma(d + 1.0).powi(extra);
    let bottom = 2_f64.powi(extra) * kf * gamma(0.5 * kf * d) * gamma(0.5 * d * (kf + 1.0));
    let direct = top / bottom;
    if direct.is_finite() && direct > 0.0 {
        return Ok(direct);
    }

    let ln_top = ln_gamma(d / 2.0) + ln_gamma(d) + (kf - 1.0) * ln_gamma(d + 1.0);
    let ln_bottom = (kf - 1.0).mul_add(
        std::f64::consts::LN_2,
        kf.ln() + ln_gamma(0.5 * kf * d) + ln_gamma(0.5 * d * (kf + 1.0)),
    );
    Ok((ln_top - ln_bottom).exp())
}

/// Invert the formula for one fraction without building a table.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidChainLength`] for `k < 2`.
pub fn myrheim_meyer_lookup(fraction: f64, k: usize) -> Result<f64> {
    for d in dimension_grid() {
        if myrheim_meyer_formula(d, k)? < fraction {
            return Ok(d);
        }
    }
    Ok(D_MAX)
}

/// Evaluate the formula over the whole dimension grid.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidChainLength`] for `k < 2`.
#[instrument]
pub fn build_lookup_table(k: usize) -> Result<LookupTable> {
    let entries = dimension_grid()
        .map(|dimension| {
            myrheim_meyer_formula(dimension, k).map(|fraction| LookupEntry { dimension, fraction })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(k, points = entries.len(), "lookup table built");
    Ok(LookupTable::new(k, entries))
}

/// Read-through access to the table for `k`.
///
/// A miss, or an entry the backend reports as corrupt, is rebuilt and
/// written back. Failing to write back is logged, not returned.
///
/// # Errors
///
/// Backend read failures other than corruption, and invalid `k`.
pub fn cached_lookup_table(k: usize, cache: Option<&mut dyn LookupCache>) -> Result<LookupTable> {
    let Some(cache) = cache else {
        return build_lookup_table(k);
    };

    match cache.get(k) {
        Ok(Some(table)) => return Ok(table),
        Ok(None) => debug!(k, "lookup table cache miss"),
        Err(err @ DagologyError::CacheCorrupt { .. }) => {
            warn!(k, error = %err, code = %err.code(), "rebuilding corrupt lookup table");
        }
        Err(err) => return Err(err),
    }

    let table = build_lookup_table(k)?;
    if let Err(err) = cache.put(&table) {
        warn!(k, error = %err, "failed to persist lookup table");
    }
    Ok(table)
}

/// Myrheim–Meyer dimension of a causal set.
///
/// Chains are counted over descendant sets, so `relation` need not be
/// transitively closed. A relation without edges has dimension 0.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidChainLength`] for `k < 2`,
/// [`DagologyError::NotAcyclic`] for a cyclic relation, and cache read
/// failures.
#[instrument(skip(relation, cache), fields(n = relation.len()))]
pub fn myrheim_meyer_dimension(
    relation: &OrderMatrix,
    k: usize,
    cache: Option<&mut dyn LookupCache>,
) -> Result<f64> {
    if k < 2 {
        return Err(DagologyError::InvalidChainLength(k));
    }
    if relation.edge_count() == 0 {
        return Ok(0.0);
    }

    let chains = count_chains(relation, k)?;
    let fraction = ordering_fraction(chains as f64, relation.len(), k);
    let table = cached_lookup_table(k, cache)?;
    let dimension = table.lookup(fraction);
    debug!(chains, fraction, dimension, "myrheim-meyer estimate");
    Ok(dimension)
}

/// Dimension estimate from a raw k-chain count `chains` over `n` elements.
///
/// `n` is real so that expected (non-integral) counts can be inverted.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidChainLength`] for `k < 2`.
pub fn myrheim_meyer_estimate(chains: f64, k: usize, n: f64) -> Result<f64> {
    if n <= 0.0 {
        return Ok(0.0);
    }
    let fraction = chains / n.powi(i32::try_from(k).unwrap_or(i32::MAX));
    myrheim_meyer_lookup(fraction, k)
}

/// Variance of the 2-chain ordering fraction at dimension `d`.
///
/// ```text
/// Var = 2 f(D,3) (1 + 4Γ(3D/2) / (Γ(D/2)Γ(D+1))) + f(D,2)
/// ```
///
/// # Errors
///
/// Returns [`DagologyError::InvalidDimension`] for `d < 1`.
pub fn myrheim_meyer_variance(d: f64) -> Result<f64> {
    let f2 = myrheim_meyer_formula(d, 2)?;
    let f3 = myrheim_meyer_formula(d, 3)?;
    // 4Γ(3D/2) / (Γ(D/2)Γ(D+1)) is exactly 1/f(D, 2).
    Ok((2.0 * f3).mul_add(1.0 + 1.0 / f2, f2))
}
