use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::traits::PointInterface;
use crate::utils::squared_distance;

/// k-means++ seeding: picks initial centers with probability proportional to
/// the squared distance from the already-chosen centers, spreading them out.
///
/// All randomness comes from the caller-supplied rng, so a fixed seed gives
/// an identical index sequence on every run.
pub struct Seeder<'a, P> {
    rng: SmallRng,
    k: usize,
    points: &'a [P],
}

impl<'a, P> Seeder<'a, P>
where
    P: PointInterface,
{
    pub fn new(rng: SmallRng, k: usize, points: &'a [P]) -> Result<Self> {
        if k <= 1 {
            return Err(Error::InvalidArgument(format!(
                "k must be greater than 1, got {}",
                k
            )));
        }
        if k >= points.len() {
            return Err(Error::InvalidArgument(format!(
                "k must be strictly less than the number of points ({} >= {})",
                k,
                points.len()
            )));
        }

        Ok(Self { rng, k, points })
    }

    /// Selects k seed indices in selection order, together with the points
    /// they refer to.
    ///
    /// Every draw is taken over the full point set, with replacement; a point
    /// that coincides with a chosen center has zero weight and is effectively
    /// never re-picked, but the selection is not deduplicated. If the total
    /// weight is zero (all points coincide with chosen centers), the draw
    /// falls back to the uniform distribution.
    pub fn select(mut self) -> (Vec<u32>, Vec<P>) {
        let n = self.points.len();
        let vectors: Vec<Vec<f64>> = self.points.iter().map(|p| p.to_f64_vec()).collect();
        let uniform = vec![1.0 / n as f64; n];

        let mut selected: Vec<u32> = Vec::with_capacity(self.k);

        // The first center is drawn from an explicitly uniform distribution,
        // consuming one rng value like every later draw.
        let first = Self::weighted_draw(&mut self.rng, &uniform);
        selected.push(first as u32);

        while selected.len() < self.k {
            // Squared distance from each point to its nearest chosen center
            let weights: Vec<f64> = vectors
                .par_iter()
                .map(|v| {
                    selected
                        .iter()
                        .map(|&i| squared_distance(v, &vectors[i as usize]))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();

            let total: f64 = weights.iter().sum();
            let probabilities: Vec<f64> = if total == 0.0 {
                debug!(
                    "zero total weight on draw {}, falling back to uniform",
                    selected.len()
                );
                uniform.clone()
            } else {
                weights.iter().map(|&w| w / total).collect()
            };

            let next = Self::weighted_draw(&mut self.rng, &probabilities);
            selected.push(next as u32);
        }

        let centroids = selected
            .iter()
            .map(|&i| self.points[i as usize].clone())
            .collect();

        (selected, centroids)
    }

    // Inverse-CDF draw: uniform u in [0,1), running cumulative sum, first
    // index whose cumulative value strictly exceeds u. The last index absorbs
    // any shortfall the summation leaves below 1.0.
    fn weighted_draw(rng: &mut SmallRng, probabilities: &[f64]) -> usize {
        let u: f64 = rng.gen();
        let mut cumulative = 0.0;

        for (index, &probability) in probabilities.iter().enumerate() {
            cumulative += probability;
            if cumulative > u {
                return index;
            }
        }

        probabilities.len() - 1
    }
}
