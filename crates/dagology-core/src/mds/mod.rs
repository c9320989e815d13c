//! Multidimensional scaling of squared-separation matrices.
//!
//! - [`classic`]: exact embedding from one N×N eigendecomposition.
//! - [`landmark`]: k landmarks embedded exactly, the rest triangulated.
//!
//! Both accept Euclidean input (all `ds² >= 0`) or Lorentzian input with
//! negative timelike entries, and return N×D coordinates with time in
//! column 0 under [`Signature::Lorentzian`].

pub mod classic;
pub mod landmark;

pub use classic::{Signature, mds};
pub use landmark::{LandmarkSelection, default_landmark_count, landmark_mds};
