use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ra_star::{cli::Args, load_map, PlanOutcome, Search};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let map = load_map(&args.map, args.robot_length, args.robot_width)
        .with_context(|| format!("loading map file {}", args.map.display()))?;
    info!(
        height = map.height(),
        width = map.width(),
        obstacles = map.obstacles().len(),
        "loaded map"
    );

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let generate_point = |rng: &mut SmallRng, map: &ra_star::MapStore| loop {
        let x = rng.random_range(0..map.width() as i32);
        let y = rng.random_range(0..map.height() as i32);
        if map.feasible(x, y) && map.free(x, y) {
            return (x, y);
        }
    };

    let mut search = Search::new(map, args.threads as usize);

    let mut sink: Option<std::io::BufWriter<std::fs::File>> = match &args.output {
        Some(path) => Some(std::io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?,
        )),
        None => None,
    };

    let mut total_elapsed = std::time::Duration::ZERO;
    for i in 0..args.num_tests {
        let start = generate_point(&mut rng, search.map());
        let goal = generate_point(&mut rng, search.map());
        info!(test = i, ?start, ?goal, weight = args.weight, threads = args.threads, speculation = args.speculation, "planning");

        let began = Instant::now();
        let result = search.plan(start, goal, args.weight, args.speculation, args.max_exps);
        let elapsed = began.elapsed();
        total_elapsed += elapsed;

        match result.outcome {
            PlanOutcome::Reached => info!(
                cost = result.cost,
                steps = result.path.len(),
                expansions = result.expansions,
                elapsed_ms = elapsed.as_secs_f64() * 1e3,
                "plan reached goal"
            ),
            PlanOutcome::Exhausted => debug!(
                expansions = result.expansions,
                elapsed_ms = elapsed.as_secs_f64() * 1e3,
                "plan exhausted without reaching goal"
            ),
        }

        if let Some(writer) = sink.as_mut() {
            let line = result
                .path
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line}")?;
        }
    }

    if let Some(mut writer) = sink {
        writer.flush()?;
    }

    if args.num_tests > 0 {
        let mean_elapsed_ms = total_elapsed.as_secs_f64() * 1e3 / args.num_tests as f64;
        info!(mean_elapsed_ms, num_tests = args.num_tests, "planning complete");
    }

    Ok(())
}
