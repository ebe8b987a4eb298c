use crate::{
    algo::branch_bound::{branch_and_bound, BranchBoundConfig},
    algo::dfs::depth_first,
    algo::kmeans::{cluster_with_restarts, ClusterConfig},
    constants::MIN_TOUR_POINTS,
    matrix::CostMatrix,
    node::Point,
    tour::Tour,
    Error, Result,
};

const ERR_INVALID_POINT: &str = "input contains non-finite coordinates";

#[derive(Clone, Copy, Debug, Default)]
pub struct DivideConfig {
    pub cluster: ClusterConfig,
    pub branch_bound: BranchBoundConfig,
}

/// Approximate solver for instances too large for exact search: cluster
/// the points, order the clusters by solving a centroid-level TSP with
/// branch-and-bound, solve each cluster exactly with DFS, and splice the
/// sub-tours together. The returned cost is recomputed against the
/// original full matrix, never the centroid-level approximation.
///
/// On success the path is always a permutation of `0..N` starting at node
/// 0. Infeasibility anywhere (inter- or intra-cluster) propagates as the
/// sentinel cost rather than a silently shortened tour.
pub fn divide_and_conquer(
    points: &[Point],
    matrix: &CostMatrix,
    config: &DivideConfig,
) -> Result<Tour> {
    let n = points.len();
    if n != matrix.n() {
        return Err(Error::invalid_data(format!(
            "point count {n} does not match matrix size {}",
            matrix.n()
        )));
    }
    if n < MIN_TOUR_POINTS {
        return Err(Error::invalid_input(format!(
            "need at least {MIN_TOUR_POINTS} points for a cycle"
        )));
    }
    if points.iter().any(|p| !p.is_valid()) {
        return Err(Error::invalid_input(ERR_INVALID_POINT));
    }

    let mut cluster_config = config.cluster;
    if cluster_config.k > n {
        log::debug!("divide: clamping k={} to n={n}", cluster_config.k);
        cluster_config.k = n;
    }
    let k = cluster_config.k;

    let clustering = cluster_with_restarts(points, &cluster_config)?;

    // local index -> global index, per cluster
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (global, &cluster) in clustering.assignments.iter().enumerate() {
        members[cluster].push(global);
    }

    log::info!(
        "divide: clustered n={n} k={k} variance={:.3}",
        clustering.variance
    );

    let centroid_matrix = CostMatrix::from_points(&clustering.centroids);
    let inter = branch_and_bound(&centroid_matrix, &config.branch_bound);
    if !inter.is_feasible() {
        log::warn!("divide: inter-cluster ordering failed n={n} k={k}");
        return Ok(Tour::infeasible());
    }

    // The tour must start at node 0, so re-root the cluster ordering at
    // the cluster that holds it.
    let start_cluster = clustering.assignments[0];
    let cluster_order = rotate_to_front(&inter.path, start_cluster);

    let mut path: Vec<usize> = Vec::with_capacity(n);
    for &cluster in &cluster_order {
        let idxs = &members[cluster];
        if idxs.is_empty() {
            log::warn!("divide: cluster {cluster} is empty, skipping");
            continue;
        }
        if idxs.len() == 1 {
            path.push(idxs[0]);
            continue;
        }

        let sub_matrix = matrix.sub_matrix(idxs);
        let intra = depth_first(&sub_matrix);
        if !intra.is_feasible() {
            log::warn!(
                "divide: intra-cluster solve failed cluster={cluster} size={}",
                idxs.len()
            );
            return Ok(Tour::infeasible());
        }

        let mut global: Vec<usize> = intra.path.iter().map(|&local| idxs[local]).collect();
        if cluster == start_cluster {
            global = rotate_to_front(&global, 0);
        }
        path.extend(global);
    }

    let cost = matrix.tour_cost(&path);
    let tour = Tour::new(path, cost);
    if !tour.is_permutation_of(n) {
        return Err(Error::other(
            "stitched path is not a permutation of all nodes",
        ));
    }

    log::info!("divide: done n={n} k={k} cost={cost:.3}");
    Ok(tour)
}

/// Rotates a cyclic order so `target` leads, preserving adjacency.
fn rotate_to_front(order: &[usize], target: usize) -> Vec<usize> {
    let Some(pos) = order.iter().position(|&x| x == target) else {
        return order.to_vec();
    };
    let mut out = Vec::with_capacity(order.len());
    out.extend_from_slice(&order[pos..]);
    out.extend_from_slice(&order[..pos]);
    out
}
