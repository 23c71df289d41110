use rand::rngs::SmallRng;
use rand::SeedableRng;

#[cfg(feature = "progress-bar")]
use indicatif::ProgressBar;

use crate::error::Result;
use crate::refiner::Refiner;
use crate::seeder::Seeder;
use crate::traits::PointInterface;

pub const DEFAULT_MAX_ITER: usize = 300;
pub const DEFAULT_EPSILON: f64 = 0.001;
/// Fixed default seed, so repeated runs over the same input select the same
/// centers. Override with [`KMeans::set_rng_seed`] when spread matters more
/// than reproducibility.
pub const DEFAULT_RNG_SEED: u64 = 0;

/// KMeans is a structure and implementation for configuring one clustering
/// run: k-means++ seeding followed by Lloyd refinement.
///
// - `k` is the number of clusters; must satisfy 1 < k < N.
// - `max_iter` caps the refinement passes and is the sole safeguard against non-termination.
// - `epsilon` is the movement threshold below which the run is declared converged.
// - `rng_seed` fixes the seeding draws; identical seeds give identical index sequences.
///
/// # Examples
///
/// ```ignore
/// let output = KMeans::new(8)
///     .set_max_iter(100)
///     .set_epsilon(1e-4)
///     .fit(&points)?;
/// ```
#[derive(Clone)]
pub struct KMeans {
    k: usize,
    max_iter: usize,
    epsilon: f64,
    rng_seed: u64,

    #[cfg(feature = "progress-bar")]
    progress: Option<ProgressBar>,
}

/// Result of a full clustering run.
pub struct KMeansOutput<P> {
    /// Indices of the k-means++ seed points, in selection order.
    pub seed_indices: Vec<u32>,
    /// Final centroids, index = cluster label. Full precision; rounding is
    /// left to presentation (see `io::save_centroids`).
    pub centroids: Vec<P>,
    /// Cluster label of every point after the last pass.
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            epsilon: DEFAULT_EPSILON,
            rng_seed: DEFAULT_RNG_SEED,
            #[cfg(feature = "progress-bar")]
            progress: None,
        }
    }

    pub fn set_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
    pub fn set_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
    pub fn set_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn get_k(&self) -> usize {
        self.k
    }
    pub fn get_max_iter(&self) -> usize {
        self.max_iter
    }
    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }
    pub fn get_rng_seed(&self) -> u64 {
        self.rng_seed
    }

    #[cfg(feature = "progress-bar")]
    pub fn progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Runs k-means++ seeding only, returning the selected point indices in
    /// selection order.
    pub fn seed_indices<P: PointInterface>(&self, points: &[P]) -> Result<Vec<u32>> {
        let rng = SmallRng::seed_from_u64(self.rng_seed);
        let (indices, _) = Seeder::new(rng, self.k, points)?.select();
        Ok(indices)
    }

    /// Seeds with k-means++ and refines with Lloyd iteration.
    ///
    /// All parameters are validated before any numeric work starts.
    pub fn fit<P: PointInterface>(self, points: &[P]) -> Result<KMeansOutput<P>> {
        let refiner = Refiner::new(self.max_iter, self.epsilon, points)?;
        #[cfg(feature = "progress-bar")]
        let refiner = match self.progress {
            Some(bar) => refiner.progress(bar),
            None => refiner,
        };

        let rng = SmallRng::seed_from_u64(self.rng_seed);
        let (seed_indices, initial_centroids) = Seeder::new(rng, self.k, points)?.select();

        let refined = refiner.refine(initial_centroids)?;

        Ok(KMeansOutput {
            seed_indices,
            centroids: refined.centroids,
            assignments: refined.assignments,
            iterations: refined.iterations,
            converged: refined.converged,
        })
    }
}
