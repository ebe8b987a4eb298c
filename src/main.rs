use std::{fs::File, io::Write, time::Instant};

use log::info;

use tsp_dc_core::{
    branch_and_bound, brute_force, depth_first, divide_and_conquer, logging, CostMatrix, Error,
    Result, SolverInput, SolverMode, SolverOptions, Tour,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;

    info!(
        "input: n={} mode={:?} seed={}",
        input.n(),
        options.solver_mode,
        options.seed
    );

    let matrix = CostMatrix::from_points(input.points());
    let tour = solve(&input, &matrix, &options)?;

    if !tour.is_feasible() {
        return Err(Error::other(
            "no feasible tour found (search exhausted or budget spent)",
        ));
    }

    write_tour(&input, &tour, &options)?;
    tour.log_metrics(&matrix);

    info!(
        "output: n={} cost={:.3} time={:.2}s",
        tour.path.len(),
        tour.cost,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

fn solve(input: &SolverInput, matrix: &CostMatrix, options: &SolverOptions) -> Result<Tour> {
    match options.solver_mode {
        SolverMode::BruteForce => Ok(brute_force(matrix)),
        SolverMode::Dfs => Ok(depth_first(matrix)),
        SolverMode::BranchBound => Ok(branch_and_bound(matrix, &options.branch_bound_config())),
        SolverMode::DivideConquer => {
            divide_and_conquer(input.points(), matrix, &options.divide_config())
        }
    }
}

/// Writes the visited points in tour order, one `x,y` line each, to
/// `--output` or stdout.
fn write_tour(input: &SolverInput, tour: &Tour, options: &SolverOptions) -> Result<()> {
    match options.output_path() {
        Some(path) => {
            let mut file = File::create(path)?;
            for &idx in &tour.path {
                writeln!(file, "{}", input.get_point(idx))?;
            }
        }
        None => {
            for &idx in &tour.path {
                println!("{}", input.get_point(idx));
            }
        }
    }
    Ok(())
}
