pub(crate) mod branch_bound;
pub(crate) mod brute_force;
pub(crate) mod dfs;
pub(crate) mod divide;
pub(crate) mod kmeans;
