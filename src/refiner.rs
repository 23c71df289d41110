use log::debug;
use rayon::prelude::*;

#[cfg(feature = "progress-bar")]
use indicatif::ProgressBar;

use crate::error::{Error, Result};
use crate::traits::PointInterface;

/// Outcome of a refinement run. The terminal state is either convergence
/// (every centroid moved strictly less than epsilon) or the iteration cap.
pub struct Refined<P> {
    pub centroids: Vec<P>,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

/// Index of the centroid with the smallest Euclidean distance to `point`,
/// or `None` if there are no centroids. Ties resolve to the lowest cluster
/// index.
pub fn find_closest_centroid<P: PointInterface>(point: &P, centroids: &[P]) -> Option<usize> {
    let (first, rest) = centroids.split_first()?;

    let mut closest = 0;
    let mut min_distance = point.distance(first);

    for (index, centroid) in rest.iter().enumerate() {
        let distance = point.distance(centroid);
        if distance < min_distance {
            min_distance = distance;
            closest = index + 1;
        }
    }

    Some(closest)
}

/// Lloyd iteration: alternates point-to-nearest-centroid assignment and
/// centroid recomputation as per-cluster means until every centroid moves
/// strictly less than `epsilon`, or `max_iter` passes have run.
pub struct Refiner<'a, P> {
    max_iter: usize,
    epsilon: f64,
    points: &'a [P],

    #[cfg(feature = "progress-bar")]
    progress: Option<ProgressBar>,
}

impl<'a, P> Refiner<'a, P>
where
    P: PointInterface,
{
    pub fn new(max_iter: usize, epsilon: f64, points: &'a [P]) -> Result<Self> {
        if max_iter == 0 {
            return Err(Error::InvalidArgument("max_iter must be positive".to_string()));
        }
        if epsilon < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "epsilon must be non-negative, got {}",
                epsilon
            )));
        }
        if points.is_empty() {
            return Err(Error::InvalidArgument("point set is empty".to_string()));
        }

        Ok(Self {
            max_iter,
            epsilon,
            points,
            #[cfg(feature = "progress-bar")]
            progress: None,
        })
    }

    #[cfg(feature = "progress-bar")]
    pub fn progress(mut self, bar: ProgressBar) -> Self {
        bar.set_length(self.max_iter as u64);
        self.progress = Some(bar);
        self
    }

    /// Runs at most `max_iter` assignment/update passes from the given
    /// centroids.
    ///
    /// A cluster that receives no points during a pass keeps its previous
    /// centroid; the mean is never computed over an empty cluster.
    pub fn refine(self, initial_centroids: Vec<P>) -> Result<Refined<P>> {
        if initial_centroids.is_empty() {
            return Err(Error::InvalidArgument("no initial centroids".to_string()));
        }

        let dim = self.points[0].dim();
        if let Some(centroid) = initial_centroids.iter().find(|c| c.dim() != dim) {
            return Err(Error::InvalidArgument(format!(
                "dimension mismatch: points are {}-dimensional, centroid is {}-dimensional",
                dim,
                centroid.dim()
            )));
        }

        let mut centroids = initial_centroids;
        let mut assignments: Vec<usize> = Vec::new();

        for iteration in 1..=self.max_iter {
            // Find the closest centroid to each point. The centroid list is
            // checked non-empty above, so the lookup always succeeds.
            assignments = self
                .points
                .par_iter()
                .map(|point| find_closest_centroid(point, &centroids).unwrap())
                .collect();

            let new_centroids = self.update_centroids(&assignments, &centroids);

            let converged = new_centroids
                .iter()
                .zip(&centroids)
                .all(|(a, b)| a.distance(b) < self.epsilon);

            centroids = new_centroids;

            #[cfg(feature = "progress-bar")]
            if let Some(bar) = &self.progress {
                bar.inc(1);
            }

            if converged {
                debug!("converged on iteration {}", iteration);

                #[cfg(feature = "progress-bar")]
                if let Some(bar) = &self.progress {
                    bar.finish();
                }

                return Ok(Refined {
                    centroids,
                    assignments,
                    iterations: iteration,
                    converged: true,
                });
            }
        }

        debug!("iteration limit reached after {} iterations", self.max_iter);

        Ok(Refined {
            centroids,
            assignments,
            iterations: self.max_iter,
            converged: false,
        })
    }

    // New centroids as per-coordinate means of the assigned points. Empty
    // clusters carry their previous centroid forward.
    fn update_centroids(&self, assignments: &[usize], previous: &[P]) -> Vec<P> {
        let k = previous.len();
        let dim = self.points[0].dim();

        let mut sums: Vec<P> = (0..k).map(|_| P::from_f64_vec(vec![0.0; dim])).collect();
        let mut counts = vec![0usize; k];

        for (point, &assignment) in self.points.iter().zip(assignments.iter()) {
            sums[assignment] = sums[assignment].add(point);
            counts[assignment] += 1;
        }

        sums.into_iter()
            .zip(counts)
            .enumerate()
            .map(|(cluster, (sum, count))| {
                if count == 0 {
                    previous[cluster].clone()
                } else {
                    sum.div(&count)
                }
            })
            .collect()
    }
}
