//! TSP solving over dense cost matrices: exact search (brute force, DFS,
//! branch-and-bound with a reduced-matrix lower bound) for small instances
//! and a cluster-based divide-and-conquer approximation for larger ones.

mod algo;
mod constants;
mod error;
mod io;
pub mod logging;
mod matrix;
mod node;
mod tour;

pub(crate) use io::options;

pub use algo::branch_bound::{branch_and_bound, BranchBoundConfig};
pub use algo::brute_force::brute_force;
pub use algo::dfs::depth_first;
pub use algo::divide::{divide_and_conquer, DivideConfig};
pub use algo::kmeans::{cluster_with_restarts, ClusterConfig, Clustering};
pub use constants::INF;
pub use error::{Error, Result};
pub use io::input::SolverInput;
pub use io::options::{LogFormat, LogLevel, SolverMode, SolverOptions};
pub use matrix::CostMatrix;
pub use node::Point;
pub use tour::Tour;

#[cfg(test)]
mod tests {
    use super::{
        branch_and_bound, brute_force, depth_first, BranchBoundConfig, CostMatrix,
    };
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn random_matrix(rng: &mut SmallRng, n: usize) -> CostMatrix {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            0.0
                        } else {
                            rng.random_range(1.0..100.0_f64).round()
                        }
                    })
                    .collect()
            })
            .collect();
        CostMatrix::from_rows(rows).unwrap()
    }

    /// Brute force, DFS, and branch-and-bound with a generous budget must
    /// report the same optimal cost; paths may differ among ties.
    #[test]
    fn solvers_agree_on_random_small_instances() {
        let mut rng = SmallRng::seed_from_u64(1);
        let unbounded = BranchBoundConfig {
            max_expansions: usize::MAX,
            frontier_cap: usize::MAX,
        };

        for n in 4..=7 {
            let matrix = random_matrix(&mut rng, n);

            let reference = brute_force(&matrix);
            let dfs = depth_first(&matrix);
            let bnb = branch_and_bound(&matrix, &unbounded);

            assert!((reference.cost - dfs.cost).abs() < 1e-9, "dfs n={n}");
            assert!((reference.cost - bnb.cost).abs() < 1e-9, "bnb n={n}");
            assert!(dfs.is_permutation_of(n));
            assert!(bnb.is_permutation_of(n));
        }
    }
}
