//! Random coordinate generators ("sprinklings").
//!
//! Every generator returns an N×D matrix with one point per row and takes
//! the random source explicitly, so seeded runs are reproducible. Interval
//! generators sort rows by column 0 (time), which puts fixed endpoints
//! first and last.

use std::cmp::Ordering;
use std::f64::consts::PI;

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, instrument};

use crate::error::{DagologyError, Result};
use crate::geometry::{Geometry, Metric, cartesian_to_angular};

fn check_shape(n: usize, d: usize) -> Result<()> {
    if d == 0 {
        return Err(DagologyError::InvalidParameter(format!(
            "cannot sprinkle {n} points into 0 dimensions"
        )));
    }
    Ok(())
}

fn rows_sorted_by_time(rows: Vec<Vec<f64>>, d: usize) -> DMatrix<f64> {
    let mut rows = rows;
    rows.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(Ordering::Equal));
    DMatrix::from_fn(rows.len(), d, |i, j| rows[i][j])
}

fn unit_point<R: Rng + ?Sized>(d: usize, rng: &mut R) -> Vec<f64> {
    (0..d).map(|_| rng.gen_range(0.0..1.0)).collect()
}

/// Scatter `n` points uniformly in the causal interval between
/// `(0, ½, …, ½)` and `(1, ½, …, ½)` of D-dimensional Minkowski space.
///
/// Points are drawn in the unit cube and rejected until they lie in the
/// future of the start and the past of the end, so the cost grows roughly
/// like `2^D`. With `fix_ends` the two endpoints are included.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidParameter`] for `d = 0`.
#[instrument(skip(rng))]
pub fn minkowski_interval<R: Rng + ?Sized>(
    n: usize,
    d: usize,
    fix_ends: bool,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    check_shape(n, d)?;
    let metric = Geometry::Minkowski { c: 1.0 };
    let mut start = vec![0.5; d];
    let mut end = vec![0.5; d];
    start[0] = 0.0;
    end[0] = 1.0;

    let mut rows = Vec::with_capacity(n);
    if fix_ends {
        rows.extend([start.clone(), end.clone()].into_iter().take(n));
    }
    let mut rejected = 0_usize;
    while rows.len() < n {
        let p = unit_point(d, rng);
        if metric.separation(&start, &p) <= 0.0 && metric.separation(&p, &end) <= 0.0 {
            rows.push(p);
        } else {
            rejected += 1;
        }
    }
    debug!(rejected, "minkowski interval sprinkled");
    Ok(rows_sorted_by_time(rows, d))
}

/// `n` points uniform in the unit D-cube, ordered by the first coordinate.
/// With `fix_ends` the corners `0` and `1` are included.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidParameter`] for `d = 0`.
pub fn cube_space_interval<R: Rng + ?Sized>(
    n: usize,
    d: usize,
    fix_ends: bool,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    check_shape(n, d)?;
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(n);
    if fix_ends {
        rows.extend([vec![0.0; d], vec![1.0; d]].into_iter().take(n));
    }
    while rows.len() < n {
        rows.push(unit_point(d, rng));
    }
    Ok(rows_sorted_by_time(rows, d))
}

/// Scatter `n` points in a de Sitter interval with `K·T² = kt2`, in
/// conformally flat coordinates centred on the spatial origin.
///
/// Minkowski interval points are thinned with acceptance
/// `σ / σ_max` where `σ = (1 + ¼·kt2·s²)^(-D)` is the conformal volume
/// factor and `s²` the flat squared separation from the origin (Meyer 1988).
///
/// # Errors
///
/// Returns [`DagologyError::InvalidParameter`] unless `0 < kt2 < 4`, or for
/// `d = 0`.
#[instrument(skip(rng))]
pub fn de_sitter_interval<R: Rng + ?Sized>(
    n: usize,
    d: usize,
    kt2: f64,
    fix_ends: bool,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    check_shape(n, d)?;
    if !(kt2 > 0.0 && kt2 < 4.0) {
        return Err(DagologyError::InvalidParameter(format!(
            "K·T² must lie in (0, 4), got {kt2}"
        )));
    }

    let exponent = -i32::try_from(d).unwrap_or(i32::MAX);
    let sigma_max = (1.0 - 0.25 * kt2).powi(exponent);
    let mut accepted: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut batches = 0_usize;
    while accepted.len() < n {
        batches += 1;
        let batch = minkowski_interval(n, d, false, rng)?;
        for row in batch.row_iter() {
            let mut point: Vec<f64> = row.iter().copied().collect();
            for x in &mut point[1..] {
                *x -= 0.5;
            }
            let s2 = point[1..].iter().map(|x| x * x).sum::<f64>() - point[0] * point[0];
            let sigma = (0.25 * kt2).mul_add(s2, 1.0).powi(exponent);
            if rng.gen_range(0.0..sigma_max) < sigma {
                accepted.push(point);
            }
        }
    }
    accepted.truncate(n);

    if fix_ends {
        if let Some(first) = accepted.get_mut(0) {
            first.fill(0.0);
        }
        if let Some(second) = accepted.get_mut(1) {
            second.fill(0.0);
            second[0] = 1.0;
        }
    }
    debug!(batches, "de sitter interval sprinkled");
    Ok(rows_sorted_by_time(accepted, d))
}

/// `n` points uniform on the D-sphere, as unit vectors in `R^(D+1)`.
#[must_use]
pub fn sphere_surface_cartesian<R: Rng + ?Sized>(n: usize, d: usize, rng: &mut R) -> DMatrix<f64> {
    let mut points = DMatrix::<f64>::zeros(n, d + 1);
    for i in 0..n {
        let mut norm = 0.0;
        while norm == 0.0 {
            for j in 0..=d {
                points[(i, j)] = rng.sample(StandardNormal);
            }
            norm = points.row(i).norm();
        }
        for j in 0..=d {
            points[(i, j)] /= norm;
        }
    }
    points
}

/// `n` points uniform on the D-sphere in angular coordinates.
#[must_use]
pub fn sphere_surface_angular<R: Rng + ?Sized>(n: usize, d: usize, rng: &mut R) -> DMatrix<f64> {
    let cartesian = sphere_surface_cartesian(n, d, rng);
    let mut angles = DMatrix::<f64>::zeros(n, d);
    for (i, row) in cartesian.row_iter().enumerate() {
        let x: Vec<f64> = row.iter().copied().collect();
        for (j, angle) in cartesian_to_angular(&x).into_iter().enumerate() {
            angles[(i, j)] = angle;
        }
    }
    angles
}

/// `n` points uniform in a hyperbolic disk of radius `radius` and
/// curvature `-a²`, as native polar coordinates `(r, θ)`.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidParameter`] for non-positive `radius`
/// or `a`.
pub fn hyperbolic_disk<R: Rng + ?Sized>(
    n: usize,
    radius: f64,
    a: f64,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    if radius <= 0.0 || a <= 0.0 {
        return Err(DagologyError::InvalidParameter(format!(
            "hyperbolic disk needs positive radius and curvature, got {radius} and {a}"
        )));
    }
    let area_scale = (radius * a).cosh() - 1.0;
    let mut points = DMatrix::<f64>::zeros(n, 2);
    for i in 0..n {
        let u: f64 = rng.gen_range(0.0..1.0);
        points[(i, 0)] = u.mul_add(area_scale, 1.0).acosh() / a;
        points[(i, 1)] = rng.gen_range(0.0..(2.0 * PI));
    }
    Ok(points)
}
