/*
    Kmeantune is a lightweight k-means clustering engine with deterministic
    k-means++ seeding, refined with Lloyd's algorithm.
*/

pub mod builder;
pub mod error;
pub mod io;
pub mod refiner;
pub mod seeder;
pub mod traits;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::builder::*;
pub use crate::error::{Error, Result};
pub use crate::refiner::{find_closest_centroid, Refined, Refiner};
pub use crate::seeder::Seeder;
pub use crate::traits::{PointInterface, VecPoint};

/// Runs one full clustering pass over a Point type that implements the
/// PointInterface trait: k-means++ seeding with the fixed default rng seed,
/// then Lloyd refinement with the default iteration cap and convergence
/// threshold.
///
/// # Examples
///
/// ```ignore
/// let output = kmeantune::fit(&points, 8)?;
/// ```
pub fn fit<P>(points: &[P], k: usize) -> Result<KMeansOutput<P>>
where
    P: PointInterface,
{
    KMeans::new(k).fit(points)
}
