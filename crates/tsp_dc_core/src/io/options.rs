use std::{env, iter::Peekable, path::Path};

use log::LevelFilter;

use crate::{
    algo::branch_bound::BranchBoundConfig,
    algo::divide::DivideConfig,
    algo::kmeans::ClusterConfig,
    Error, Result,
};

/// Runtime options for solver behavior and logging.
#[derive(Clone, Debug)]
pub struct SolverOptions {
    /// Solver strategy to run.
    pub solver_mode: SolverMode,
    /// Branch-and-bound: node-expansion budget before timing out.
    pub max_expansions: usize,
    /// Branch-and-bound: retained frontier nodes after each round.
    pub frontier_cap: usize,
    /// Divide-and-conquer: cluster count K.
    pub clusters: usize,
    /// Clusterer: convergence iteration cap per run.
    pub cluster_max_iterations: usize,
    /// Clusterer: randomized reruns, keeping the lowest-variance result.
    pub cluster_restarts: usize,
    /// Base random seed for clustering.
    pub seed: u64,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for points. Empty means stdin.
    pub input: String,
    /// Optional output file path for the ordered tour. Empty means stdout.
    pub output: String,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            solver_mode: SolverMode::BranchBound,
            max_expansions: 9_999,
            frontier_cap: 5_000,
            clusters: 5,
            cluster_max_iterations: 500,
            cluster_restarts: 75,
            seed: 12_345,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "solver-mode" => {
                    options.solver_mode = SolverMode::parse(&require_value(&name, value)?)?;
                }
                "max-expansions" => {
                    options.max_expansions = parse_usize(&name, &require_value(&name, value)?)?;
                }
                "frontier-cap" => {
                    options.frontier_cap = parse_usize(&name, &require_value(&name, value)?)?;
                }
                "clusters" => {
                    options.clusters = parse_usize(&name, &require_value(&name, value)?)?;
                }
                "cluster-max-iterations" => {
                    options.cluster_max_iterations =
                        parse_usize(&name, &require_value(&name, value)?)?;
                }
                "cluster-restarts" => {
                    options.cluster_restarts = parse_usize(&name, &require_value(&name, value)?)?;
                }
                "seed" => {
                    options.seed = parse_u64(&name, &require_value(&name, value)?)?;
                }
                "log-level" => {
                    options.log_level = LogLevel::parse(&require_value(&name, value)?)?;
                }
                "log-format" => {
                    options.log_format = LogFormat::parse(&require_value(&name, value)?)?;
                }
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                "log-output" => {
                    options.log_output = require_value(&name, value)?;
                }
                "input" => {
                    options.input = require_value(&name, value)?;
                }
                "output" => {
                    options.output = require_value(&name, value)?;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-dc [options] [--input points.txt]\n",
            "  tsp-dc [options] < points.txt\n\n",
            "Options:\n",
            "  --solver-mode <brute-force|dfs|branch-and-bound|divide-and-conquer>\n",
            "  --max-expansions <usize>\n",
            "  --frontier-cap <usize>\n",
            "  --clusters <usize>\n",
            "  --cluster-max-iterations <usize>\n",
            "  --cluster-restarts <usize>\n",
            "  --seed <u64>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-dc --solver-mode=branch-and-bound --max-expansions 50000 < points.txt\n",
            "  tsp-dc --solver-mode=divide-and-conquer --clusters 8 --seed 42 --input points.txt\n",
            "  tsp-dc --log-level=debug --log-format=pretty --log-output run.log < points.txt\n",
        )
    }

    pub fn branch_bound_config(&self) -> BranchBoundConfig {
        BranchBoundConfig {
            max_expansions: self.max_expansions,
            frontier_cap: self.frontier_cap,
        }
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            k: self.clusters,
            max_iterations: self.cluster_max_iterations,
            restarts: self.cluster_restarts,
            seed: self.seed,
        }
    }

    pub fn divide_config(&self) -> DivideConfig {
        DivideConfig {
            cluster: self.cluster_config(),
            branch_bound: self.branch_bound_config(),
        }
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }
}

fn non_empty_path(raw: &str) -> Option<&Path> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(Path::new(trimmed))
    }
}

/// Supports both `--name=value` and `--name value`.
fn split_arg<I>(raw_name: &str, args: &mut Peekable<I>) -> (String, Option<String>)
where
    I: Iterator<Item = String>,
{
    if let Some((name, value)) = raw_name.split_once('=') {
        return (name.to_owned(), Some(value.to_owned()));
    }

    let takes_next = args
        .peek()
        .map(|next| !next.starts_with("--"))
        .unwrap_or(false);
    if takes_next {
        (raw_name.to_owned(), args.next())
    } else {
        (raw_name.to_owned(), None)
    }
}

fn require_value(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Option --{name} requires a value")))
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::invalid_input(format!("Option --{name}: invalid number: {value}")))
}

fn parse_u64(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::invalid_input(format!("Option --{name}: invalid number: {value}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Option --{name}: invalid boolean: {value}"
        ))),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid --log-level: {value}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid --log-format: {value}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverMode {
    BruteForce,
    Dfs,
    BranchBound,
    DivideConquer,
}

impl SolverMode {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "brute-force" => Ok(Self::BruteForce),
            "dfs" => Ok(Self::Dfs),
            "branch-and-bound" => Ok(Self::BranchBound),
            "divide-and-conquer" => Ok(Self::DivideConquer),
            _ => Err(Error::invalid_input(format!(
                "Invalid --solver-mode: {value}"
            ))),
        }
    }
}
