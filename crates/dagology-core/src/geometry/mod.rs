//! Background geometries for synthetic causal sets.
//!
//! # Overview
//!
//! A [`Geometry`] is one of a closed set of spaces; each provides a squared
//! separation through the [`Metric`] trait. Lorentzian geometries use the
//! `-+++` convention, so timelike pairs have negative separation:
//!
//! | Geometry | `separation(x, y)` | Causal order |
//! |----------|--------------------|--------------|
//! | `Euclidean` | `Σ Δxᵢ²` | componentwise `<` (cube space) |
//! | `Minkowski { c }` | `-c²Δt² + Σ Δxᵢ²` | timelike, earlier time |
//! | `MinkowskiPeriodic` | as Minkowski, nearest image per periodic axis | timelike, earlier time |
//! | `DeSitter` | `ψ² - Δη²`, ψ the angle between spatial points | timelike, earlier time |
//! | `Hyperbolic { curvature }` | squared geodesic distance, native polar coords | none |
//! | `Spherical` | `ψ²` for angular coordinates | none |
//! | `Lp { p }` | `Σ |Δxᵢ|^p` | componentwise `<` |
//!
//! Coordinates are rows of an N×D matrix; column 0 is time for Lorentzian
//! geometries. [`sprinkle`] generates such matrices and [`causet`] turns
//! them into order relations.

pub mod causet;
pub mod sprinkle;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{DagologyError, Result};

pub use causet::{causal_set, random_dag};
pub use sprinkle::{
    cube_space_interval, de_sitter_interval, hyperbolic_disk, minkowski_interval,
    sphere_surface_angular, sphere_surface_cartesian,
};

/// Squared separation between two coordinate vectors.
pub trait Metric {
    fn separation(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Closed set of supported geometries.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Euclidean,
    /// Flat spacetime with speed of light `c`.
    Minkowski { c: f64 },
    /// Minkowski with optional periods on the spatial axes; `None` or a
    /// missing entry leaves that axis open.
    MinkowskiPeriodic { periods: Vec<Option<f64>> },
    /// de Sitter in conformal coordinates: conformal time, then angular
    /// coordinates on the spatial sphere.
    DeSitter,
    /// Hyperbolic plane in native polar coordinates `(r, θ...)`.
    Hyperbolic { curvature: f64 },
    /// Unit sphere in angular coordinates.
    Spherical,
    Lp { p: f64 },
}

impl Geometry {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Minkowski { .. } => "minkowski",
            Self::MinkowskiPeriodic { .. } => "minkowski-periodic",
            Self::DeSitter => "de-sitter",
            Self::Hyperbolic { .. } => "hyperbolic",
            Self::Spherical => "spherical",
            Self::Lp { .. } => "lp",
        }
    }

    /// Whether [`Geometry::precedes`] is defined.
    #[must_use]
    pub const fn has_causal_order(&self) -> bool {
        !matches!(self, Self::Hyperbolic { .. } | Self::Spherical)
    }

    /// Whether `x` is in the strict causal past of `y`.
    ///
    /// Lorentzian geometries require a timelike separation with earlier
    /// time at `x`; Euclidean and Lp geometries use the strict
    /// componentwise order of cube space.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::NoCausalOrder`] for Riemannian geometries.
    pub fn precedes(&self, x: &[f64], y: &[f64]) -> Result<bool> {
        match self {
            Self::Minkowski { .. } | Self::MinkowskiPeriodic { .. } | Self::DeSitter => {
                Ok(x[0] < y[0] && self.separation(x, y) < 0.0)
            }
            Self::Euclidean | Self::Lp { .. } => Ok(x.iter().zip(y).all(|(a, b)| a < b)),
            Self::Hyperbolic { .. } | Self::Spherical => Err(DagologyError::NoCausalOrder(self.name())),
        }
    }
}

impl Metric for Geometry {
    fn separation(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            Self::Euclidean => x.iter().zip(y).map(|(a, b)| (a - b).powi(2)).sum(),
            Self::Minkowski { c } => {
                let dt = c * (x[0] - y[0]);
                let space: f64 = x[1..].iter().zip(&y[1..]).map(|(a, b)| (a - b).powi(2)).sum();
                space - dt * dt
            }
            Self::MinkowskiPeriodic { periods } => {
                let dt = x[0] - y[0];
                let space: f64 = x[1..]
                    .iter()
                    .zip(&y[1..])
                    .enumerate()
                    .map(|(axis, (a, b))| {
                        let dx = a - b;
                        match periods.get(axis).copied().flatten() {
                            Some(period) => {
                                let wrapped = dx.abs() % period;
                                wrapped.min(period - wrapped).powi(2)
                            }
                            None => dx * dx,
                        }
                    })
                    .sum();
                space - dt * dt
            }
            Self::DeSitter => {
                let dt = x[0] - y[0];
                let dx = spherical_distance(&x[1..], &y[1..]);
                dx * dx - dt * dt
            }
            Self::Hyperbolic { curvature } => {
                let d = hyperbolic_distance(x, y, *curvature);
                d * d
            }
            Self::Spherical => spherical_distance(x, y).powi(2),
            Self::Lp { p } => x.iter().zip(y).map(|(a, b)| (a - b).abs().powf(*p)).sum(),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Geometry {
    type Err = DagologyError;

    /// Parse a geometry name with unit parameters (`c = 1`, curvature 1,
    /// `p = 2`, no periods).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "minkowski" => Ok(Self::Minkowski { c: 1.0 }),
            "minkowski-periodic" => Ok(Self::MinkowskiPeriodic { periods: Vec::new() }),
            "de-sitter" | "desitter" => Ok(Self::DeSitter),
            "hyperbolic" => Ok(Self::Hyperbolic { curvature: 1.0 }),
            "spherical" => Ok(Self::Spherical),
            "lp" => Ok(Self::Lp { p: 2.0 }),
            other => Err(DagologyError::UnknownGeometry(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Sphere coordinates
// ---------------------------------------------------------------------------

/// D angular coordinates to D+1 cartesian coordinates on the unit sphere.
///
/// The last angle ranges over `[0, 2π)`, the others over `[0, π]`.
#[must_use]
pub fn angular_to_cartesian(angles: &[f64]) -> Vec<f64> {
    let mut x = vec![1.0; angles.len() + 1];
    for (i, angle) in angles.iter().enumerate() {
        x[i] *= angle.cos();
        let sin = angle.sin();
        for value in &mut x[i + 1..] {
            *value *= sin;
        }
    }
    x
}

/// D cartesian coordinates on the unit sphere to D-1 angles.
#[must_use]
pub fn cartesian_to_angular(x: &[f64]) -> Vec<f64> {
    let d = x.len();
    if d < 2 {
        return Vec::new();
    }
    let mut angles: Vec<f64> = (0..d - 1)
        .map(|i| {
            let tail = x[i..].iter().map(|v| v * v).sum::<f64>().sqrt();
            if tail == 0.0 {
                0.0
            } else {
                (x[i] / tail).clamp(-1.0, 1.0).acos()
            }
        })
        .collect();
    if x[d - 1] < 0.0 {
        if let Some(last) = angles.last_mut() {
            *last = 2.0f64.mul_add(PI, -*last);
        }
    }
    angles
}

/// Great-circle angle between two points given in angular coordinates.
#[must_use]
pub fn spherical_distance(x: &[f64], y: &[f64]) -> f64 {
    if x == y {
        return 0.0;
    }
    if x.len() == 1 {
        let delta = (x[0] - y[0]).abs();
        return delta.min(2.0f64.mul_add(PI, -delta));
    }
    let (a, b) = (angular_to_cartesian(x), angular_to_cartesian(y));
    let cos_psi: f64 = a.iter().zip(&b).map(|(p, q)| p * q).sum();
    cos_psi.clamp(-1.0, 1.0).acos()
}

/// Geodesic distance in the hyperbolic space of curvature `-a²`, points in
/// native polar coordinates `(r, angles...)`.
#[must_use]
pub fn hyperbolic_distance(x: &[f64], y: &[f64], a: f64) -> f64 {
    if x == y {
        return 0.0;
    }
    let d_theta = spherical_distance(&x[1..], &y[1..]);
    let cosh_ad = (a * x[0]).cosh() * (a * y[0]).cosh()
        - (a * x[0]).sinh() * (a * y[0]).sinh() * d_theta.cos();
    cosh_ad.max(1.0).acosh() / a
}
