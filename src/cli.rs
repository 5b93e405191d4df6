use clap::Parser;
use std::path::PathBuf;

/// Command-line surface for the RA* planner: load a map, plan
/// `--num-tests` random start/goal pairs against it, and report (or
/// persist) the resulting paths.
#[derive(Parser, Debug)]
#[command(version, about = "Parallel, speculation-augmented weighted A* path planning", long_about = None)]
pub struct Args {
    /// Input map file (see the crate's map file format).
    #[arg(long)]
    pub map: PathBuf,

    /// How many random start/goal pairs to plan.
    #[arg(long = "num-tests", default_value_t = 10)]
    pub num_tests: u32,

    /// Heuristic weight of the A* search. Must be >= 1.
    #[arg(long, default_value_t = 1.0, value_parser = parse_weight)]
    pub weight: f64,

    /// Worker pool size.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Expansion cap per plan.
    #[arg(long = "max-exps", default_value_t = 10_000)]
    pub max_exps: u64,

    /// Enable speculative prefetch of future collision checks.
    #[arg(long)]
    pub speculation: bool,

    /// Output path file. A path's direction indices are written one
    /// plan per line, space-separated. Discarded if omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Robot footprint length.
    #[arg(long = "robot-length", default_value_t = 10)]
    pub robot_length: u32,

    /// Robot footprint width.
    #[arg(long = "robot-width", default_value_t = 4)]
    pub robot_width: u32,

    /// RNG seed for random start/goal generation. Omit for an
    /// OS-seeded RNG.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_weight(s: &str) -> Result<f64, String> {
    let w: f64 = s.parse().map_err(|_| format!("`{s}` is not a valid number"))?;
    if w < 1.0 {
        return Err(format!("heuristic weight must be >= 1, got {w}"));
    }
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_threads() {
        let result = Args::try_parse_from(["ra_star", "--map", "m.map", "--threads", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_sub_unity_weight() {
        let result = Args::try_parse_from(["ra_star", "--map", "m.map", "--weight", "0.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn accepts_valid_threads_and_weight() {
        let args = Args::try_parse_from([
            "ra_star", "--map", "m.map", "--threads", "4", "--weight", "1.5",
        ])
        .unwrap();
        assert_eq!(args.threads, 4);
        assert_eq!(args.weight, 1.5);
    }

    #[test]
    fn defaults_satisfy_the_same_constraints() {
        let args = Args::try_parse_from(["ra_star", "--map", "m.map"]).unwrap();
        assert_eq!(args.threads, 1);
        assert_eq!(args.weight, 1.0);
    }
}
