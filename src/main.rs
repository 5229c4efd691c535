use anyhow::{Context, Result};
use clap::Parser;
use pathfinding_visualizer::comparison::{compare, run_one, summarize, AlgorithmRun};
use pathfinding_visualizer::config::{Config, OutputFormat};
use pathfinding_visualizer::playback::{self, CancelToken, Frame, PlaybackOutcome};
use pathfinding_visualizer::{Grid, Layout, Position, SearchResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufReader};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(config.quiet);

    let (grid, start, end) = build_grid(&config)?;
    let backend = config.backend();
    let algorithms = config.algorithm.algorithms();

    if !config.quiet && config.format == OutputFormat::Text {
        println!("Grid size: {}x{}", grid.rows(), grid.cols());
        println!("Walls: {}", grid.wall_count());
        println!("Start: {}, End: {}", start, end);
        println!("Backend: {}", backend.name());
        println!();
    }

    let runs = if algorithms.len() > 1 {
        compare(backend.as_ref(), &grid, start, end)?
    } else {
        algorithms
            .iter()
            .map(|&algorithm| run_one(backend.as_ref(), &grid, start, end, algorithm))
            .collect::<pathfinding_visualizer::Result<Vec<_>>>()?
    };

    match config.format {
        OutputFormat::Json => print_json(&runs)?,
        OutputFormat::Text => print_text(&config, &grid, start, end, &runs),
    }
    Ok(())
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the grid snapshot handed to the engine, from a layout file or at
/// random, and checks the endpoints before any search runs.
fn build_grid(config: &Config) -> Result<(Grid, Position, Position)> {
    let (mut grid, start, end) = match &config.grid_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read grid file {}", path.display()))?;
            let layout = Layout::parse(&text)
                .with_context(|| format!("failed to parse grid file {}", path.display()))?;
            let (default_start, default_end) =
                config.endpoints((layout.grid.rows(), layout.grid.cols()));
            let start = config.start.or(layout.start).unwrap_or(default_start);
            let end = config.end.or(layout.end).unwrap_or(default_end);
            (layout.grid, start, end)
        }
        None => {
            let (rows, cols) = config.grid_dimensions();
            if (rows, cols) != (config.rows, config.cols) {
                warn!(
                    requested_rows = config.rows,
                    requested_cols = config.cols,
                    rows,
                    cols,
                    "grid size clamped"
                );
            }
            let (start, end) = config.endpoints((rows, cols));
            let mut grid = Grid::new(rows, cols)?;

            let seed = config.seed.unwrap_or_else(rand::random::<u64>);
            info!(seed, "generating walls");
            let mut rng = StdRng::seed_from_u64(seed);
            grid.randomize_walls(&mut rng, config.wall_density, &[start, end]);
            (grid, start, end)
        }
    };

    config.apply_wall_edits(&mut grid, start, end)?;

    grid.check_endpoints(start, end)
        .context("invalid start or end cell")?;
    Ok((grid, start, end))
}

fn print_json(runs: &[AlgorithmRun]) -> Result<()> {
    let output = if let [run] = runs {
        serde_json::to_string_pretty(&run.result)?
    } else {
        let by_name: BTreeMap<&str, &SearchResult> = runs
            .iter()
            .map(|run| (run.algorithm.name(), &run.result))
            .collect();
        serde_json::to_string_pretty(&by_name)?
    };
    println!("{}", output);
    Ok(())
}

fn print_text(config: &Config, grid: &Grid, start: Position, end: Position, runs: &[AlgorithmRun]) {
    let token = CancelToken::new();
    if config.visualize() {
        token.cancel_on_line(BufReader::new(io::stdin()));
    }

    for run in runs {
        let animated = config.visualize()
            && !token.is_cancelled()
            && animate(grid, start, end, &run.result, config.delay_ms, &token)
                == PlaybackOutcome::Completed;
        if !animated && !config.quiet {
            println!("=== {} ===", run.algorithm);
            print!(
                "{}",
                grid.render(Some(start), Some(end), &run.result.visit_order, &run.result.path)
            );
        }

        if !config.quiet {
            println!("Status: {}", playback::status(&run.result));
            println!("{}", run.stats);
        }
    }

    if runs.len() > 1 {
        println!("=== ALGORITHM COMPARISON ===");
        println!("{}", summarize(runs));
    } else if config.quiet {
        if let Some(run) = runs.first() {
            match run.result.path_cost() {
                Some(cost) => println!("{}", cost),
                None => println!("no path"),
            }
        }
    }
}

/// Replays a result in the terminal, redrawing the grid for every frame.
/// A cancelled replay falls back to the static rendering.
fn animate(
    grid: &Grid,
    start: Position,
    end: Position,
    result: &SearchResult,
    delay_ms: u64,
    token: &CancelToken,
) -> PlaybackOutcome {
    let mut visited = Vec::with_capacity(result.visit_order.len());
    let mut path = Vec::with_capacity(result.path.len());

    playback::play(result, Duration::from_millis(delay_ms), token, |frame| {
        match frame {
            Frame::Visit(p) => visited.push(p),
            Frame::Path(p) => path.push(p),
        }
        clear_screen();
        println!(
            "Visited: {} | Path: {} | Last: {} | Enter skips",
            visited.len(),
            path.len(),
            frame.position()
        );
        print!("{}", grid.render(Some(start), Some(end), &visited, &path));
    })
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}
