use serde::{Deserialize, Serialize};

use crate::utils;

/// Traits that the Point type should implement for use by the Seeder and
/// the Refiner.
///
/// # Examples
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Clone, Debug)]
/// struct Point(Vec<f64>);
/// impl PointInterface for Point {
///     ...
/// }
/// ```
pub trait PointInterface: Clone + Sync {
  /// A function that returns the distance between two Points. The seeding
  /// and refinement loops expect the Euclidean distance.
  ///
  /// # Examples
  ///
  /// ```ignore
  /// fn distance(&self, other: &Self) -> f64 {
  ///     self.0
  ///         .iter()
  ///         .zip(other.0.iter())
  ///         .map(|(a, b)| {
  ///             let c = a - b;
  ///             c * c
  ///         })
  ///         .sum::<f64>()
  ///         .sqrt()
  /// }
  /// ```
  fn distance(&self, other: &Self) -> f64;

  /// The number of dimensions of a vector. Discovered once from the input,
  /// uniform across a run.
  fn dim(&self) -> usize;

  /// Addition of two Points. Used by the Refiner to accumulate cluster sums.
  fn add(&self, other: &Self) -> Self;

  /// Division of a Point. Used by the Refiner to turn a cluster sum into a
  /// mean.
  fn div(&self, divisor: &usize) -> Self;

  fn to_f64_vec(&self) -> Vec<f64>;

  fn from_f64_vec(a: Vec<f64>) -> Self;
}

/// Point type over a plain coordinate vector, used by the io module and the
/// CLI. Library users with their own point representation implement
/// [`PointInterface`] instead.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VecPoint(pub Vec<f64>);

impl PointInterface for VecPoint {
  fn distance(&self, other: &Self) -> f64 {
    utils::euclidean_distance(&self.0, &other.0)
  }

  fn dim(&self) -> usize {
    self.0.len()
  }

  fn add(&self, other: &Self) -> Self {
    VecPoint(utils::vector_sum(&self.0, &other.0))
  }

  fn div(&self, divisor: &usize) -> Self {
    VecPoint(utils::scalar_scale(&self.0, 1.0 / *divisor as f64))
  }

  fn to_f64_vec(&self) -> Vec<f64> {
    self.0.clone()
  }

  fn from_f64_vec(a: Vec<f64>) -> Self {
    VecPoint(a)
  }
}
