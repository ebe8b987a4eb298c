use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{node::Point, Error, Result};

/// Relative centroid movement below which a run is considered converged.
const MOVEMENT_EPSILON: f64 = 1e-4;
const MIN_MOVEMENT_NORM: f64 = 1e-12;

/// Knobs for centroid-refinement clustering.
#[derive(Clone, Copy, Debug)]
pub struct ClusterConfig {
    /// Number of clusters.
    pub k: usize,
    /// Iteration cap per run; a run may stop earlier on convergence.
    pub max_iterations: usize,
    /// Randomized reruns; the lowest-variance result wins. Refinement
    /// converges to a local optimum dependent on initialization, so
    /// restarts are not optional decoration.
    pub restarts: usize,
    /// Base seed; per-restart seeds are derived from it.
    pub seed: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: 5,
            max_iterations: 500,
            restarts: 75,
            seed: 12_345,
        }
    }
}

/// One clustering outcome. Every input point carries exactly one label in
/// `assignments`; `centroids.len()` always equals the configured K.
#[derive(Clone, Debug)]
pub struct Clustering {
    pub centroids: Vec<Point>,
    pub assignments: Vec<usize>,
    /// Sum of squared point-to-centroid distances; lower is tighter.
    pub variance: f64,
}

/// Runs centroid refinement `restarts` times with derived seeds and keeps
/// the lowest-variance result.
pub fn cluster_with_restarts(points: &[Point], config: &ClusterConfig) -> Result<Clustering> {
    if config.k == 0 {
        return Err(Error::invalid_input("cluster count must be > 0"));
    }
    if points.is_empty() {
        return Err(Error::invalid_input("cannot cluster an empty point set"));
    }
    if config.k > points.len() {
        return Err(Error::invalid_input(format!(
            "cluster count {} exceeds point count {}",
            config.k,
            points.len()
        )));
    }

    let runs = config.restarts.max(1);
    let mut best: Option<Clustering> = None;

    let mut seed_rng = SmallRng::seed_from_u64(config.seed);
    for run in 0..runs {
        let mut rng = SmallRng::seed_from_u64(seed_rng.random::<u64>());
        let candidate = run_once(points, config.k, config.max_iterations, &mut rng);
        log::trace!(
            "kmeans: run={run} k={} variance={:.3}",
            config.k,
            candidate.variance
        );
        let better = match &best {
            Some(current) => candidate.variance < current.variance,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    let best = best.ok_or_else(|| Error::other("no clustering runs produced a result"))?;
    log::debug!(
        "kmeans: done k={} runs={runs} variance={:.3}",
        config.k,
        best.variance
    );
    Ok(best)
}

fn run_once(points: &[Point], k: usize, max_iterations: usize, rng: &mut SmallRng) -> Clustering {
    let mut centroids = sample_initial_centroids(points, k, rng);

    for _ in 0..max_iterations {
        let assignments: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(&centroids, p))
            .collect();

        let next = recompute_centroids(points, &assignments, &centroids);

        let movement: f64 = centroids
            .iter()
            .zip(&next)
            .map(|(old, new)| old.dist(new))
            .sum();
        let norm: f64 = centroids.iter().map(|c| c.magnitude()).sum();
        centroids = next;

        if movement / norm.max(MIN_MOVEMENT_NORM) < MOVEMENT_EPSILON {
            break;
        }
    }

    // Order by distance from the origin so equal-quality runs report
    // centroids deterministically regardless of initialization order.
    centroids.sort_by(|a, b| a.magnitude().total_cmp(&b.magnitude()));

    let assignments: Vec<usize> = points
        .iter()
        .map(|p| nearest_centroid(&centroids, p))
        .collect();
    let variance = points
        .iter()
        .zip(&assignments)
        .map(|(p, &c)| {
            let d = p.dist(&centroids[c]);
            d * d
        })
        .sum();

    Clustering {
        centroids,
        assignments,
        variance,
    }
}

/// Picks K distinct input points as the starting centroids. Sampling from
/// the data rather than the bounding box avoids empty clusters on skewed
/// inputs.
fn sample_initial_centroids(points: &[Point], k: usize, rng: &mut SmallRng) -> Vec<Point> {
    let mut idxs: Vec<usize> = (0..points.len()).collect();
    for i in 0..k {
        let j = rng.random_range(i..idxs.len());
        idxs.swap(i, j);
    }
    idxs[..k].iter().map(|&i| points[i]).collect()
}

fn nearest_centroid(centroids: &[Point], point: &Point) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = point.dist(c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Mean of each cluster's members. A cluster that attracted no points this
/// iteration keeps its previous centroid instead of dividing by zero.
fn recompute_centroids(points: &[Point], assignments: &[usize], previous: &[Point]) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![Point::default(); k];
    let mut counts = vec![0usize; k];

    for (p, &c) in points.iter().zip(assignments) {
        sums[c].x += p.x;
        sums[c].y += p.y;
        counts[c] += 1;
    }

    (0..k)
        .map(|c| {
            if counts[c] == 0 {
                previous[c]
            } else {
                Point::new(sums[c].x / counts[c] as f64, sums[c].y / counts[c] as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{cluster_with_restarts, ClusterConfig};
    use crate::node::Point;

    fn two_blobs() -> Vec<Point> {
        let mut points = Vec::new();
        for i in 0..6 {
            points.push(Point::new(i as f64 * 0.1, 0.0));
            points.push(Point::new(100.0 + i as f64 * 0.1, 50.0));
        }
        points
    }

    fn config(k: usize) -> ClusterConfig {
        ClusterConfig {
            k,
            max_iterations: 100,
            restarts: 10,
            seed: 42,
        }
    }

    #[test]
    fn every_point_gets_exactly_one_label_and_k_centroids_come_back() {
        let points = two_blobs();
        let clustering = cluster_with_restarts(&points, &config(3)).unwrap();
        assert_eq!(clustering.centroids.len(), 3);
        assert_eq!(clustering.assignments.len(), points.len());
        assert!(clustering.assignments.iter().all(|&c| c < 3));
    }

    #[test]
    fn separated_blobs_land_in_distinct_clusters() {
        let points = two_blobs();
        let clustering = cluster_with_restarts(&points, &config(2)).unwrap();
        let left = clustering.assignments[0];
        for i in 0..points.len() {
            if points[i].x < 50.0 {
                assert_eq!(clustering.assignments[i], left);
            } else {
                assert_ne!(clustering.assignments[i], left);
            }
        }
    }

    #[test]
    fn fixed_seed_makes_runs_reproducible() {
        let points = two_blobs();
        let a = cluster_with_restarts(&points, &config(2)).unwrap();
        let b = cluster_with_restarts(&points, &config(2)).unwrap();
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn more_iterations_never_worsen_the_variance() {
        let points = two_blobs();
        let short = cluster_with_restarts(
            &points,
            &ClusterConfig {
                max_iterations: 1,
                ..config(3)
            },
        )
        .unwrap();
        let long = cluster_with_restarts(&points, &config(3)).unwrap();
        assert!(long.variance <= short.variance + 1e-9);
    }

    #[test]
    fn rejects_degenerate_configurations() {
        let points = two_blobs();
        assert!(cluster_with_restarts(&points, &config(0)).is_err());
        assert!(cluster_with_restarts(&[], &config(2)).is_err());
        assert!(cluster_with_restarts(&points, &config(points.len() + 1)).is_err());
    }
}
